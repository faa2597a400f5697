//! CoinGecko API client for loading market data.

use coinlens_core::{Period, RawOhlc};
use thiserror::Error;

use crate::records::{Category, CoinDetail, CoinMarket};

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Failure at the market-data boundary.
///
/// Transport, status and parse failures all collapse into one condition:
/// the caller keeps its last-known-good data and may retry on the next
/// user action.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("market data unavailable: {0}")]
    Unavailable(String),
}

/// CoinGecko REST client.
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Create a client against the public API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (tests, proxies).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, DataError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| DataError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| DataError::Unavailable(e.to_string()))?;
        response
            .json::<T>()
            .await
            .map_err(|e| DataError::Unavailable(e.to_string()))
    }

    /// Fetch the full OHLC series for a coin over the period's lookback.
    ///
    /// Returns wire tuples `[timestamp_ms, open, high, low, close]`; the
    /// caller converts them with an explicit millisecond unit.
    pub async fn ohlc(&self, coin_id: &str, period: Period) -> Result<Vec<RawOhlc>, DataError> {
        let days = period.config().lookback_days;
        self.get_json(
            &format!("/coins/{coin_id}/ohlc"),
            &[
                ("vs_currency", "usd".to_string()),
                ("days", days.to_string()),
            ],
        )
        .await
    }

    /// Fetch the detail record for one coin.
    pub async fn coin(&self, coin_id: &str) -> Result<CoinDetail, DataError> {
        self.get_json(&format!("/coins/{coin_id}"), &[]).await
    }

    /// Fetch one page of coins ordered by market cap.
    pub async fn markets(&self, page: u32, per_page: u32) -> Result<Vec<CoinMarket>, DataError> {
        self.get_json(
            "/coins/markets",
            &[
                ("vs_currency", "usd".to_string()),
                ("order", "market_cap_desc".to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
                ("sparkline", "false".to_string()),
                ("price_change_percentage", "24h".to_string()),
            ],
        )
        .await
    }

    /// Fetch all coin categories.
    pub async fn categories(&self) -> Result<Vec<Category>, DataError> {
        self.get_json("/coins/categories", &[]).await
    }
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CoinGeckoClient::with_base_url("http://localhost:9999/");
        assert_eq!(client.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_default_base_url() {
        let client = CoinGeckoClient::new();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }
}
