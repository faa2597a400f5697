//! Wire record types for the CoinGecko API.
//!
//! These are consumed as opaque validated records; the dashboard reads the
//! fields it displays and ignores the rest of the payload.

use serde::Deserialize;

/// One row of `/coins/markets`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: String,
    pub current_price: f64,
    pub market_cap: f64,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

/// Detail record from `/coins/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: CoinImage,
    pub market_data: MarketData,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinImage {
    pub large: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketData {
    pub current_price: CurrentPrice,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentPrice {
    pub usd: f64,
}

/// One row of `/coins/categories`.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub top_3_coins: Vec<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_change_24h: Option<f64>,
    #[serde(default)]
    pub volume_24h: Option<f64>,
}

/// Whether another markets page likely exists after this one.
///
/// A full page suggests more data; a short page is the last one.
pub fn has_more_pages(rows_returned: usize, per_page: u32) -> bool {
    rows_returned == per_page as usize
}

/// Estimate the total markets page count.
///
/// A guess, not a correctness guarantee: the API exposes no authoritative
/// total, so assume 100 pages until the current page reaches 100, then bump
/// the estimate in blocks of 100 ahead of the reader.
pub fn estimated_total_pages(current_page: u32) -> u32 {
    if current_page >= 100 {
        current_page.div_ceil(100) * 100 + 100
    } else {
        100
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinlens_core::RawOhlc;

    #[test]
    fn test_deserialize_coin_market_row() {
        let json = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://example.com/btc.png",
            "current_price": 64250.12,
            "market_cap": 1265000000000.0,
            "market_cap_rank": 1,
            "price_change_percentage_24h": -1.25,
            "total_volume": 30000000000.0
        }"#;
        let coin: CoinMarket = serde_json::from_str(json).unwrap();
        assert_eq!(coin.id, "bitcoin");
        assert_eq!(coin.market_cap_rank, Some(1));
        assert_eq!(coin.price_change_percentage_24h, Some(-1.25));
    }

    #[test]
    fn test_deserialize_coin_detail_nested_price() {
        let json = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": { "large": "https://example.com/btc-large.png" },
            "market_data": { "current_price": { "usd": 64250.12 } },
            "market_cap_rank": 1
        }"#;
        let coin: CoinDetail = serde_json::from_str(json).unwrap();
        assert_eq!(coin.market_data.current_price.usd, 64250.12);
        assert_eq!(coin.image.large, "https://example.com/btc-large.png");
    }

    #[test]
    fn test_deserialize_category_with_nulls() {
        let json = r#"{
            "name": "Layer 1",
            "top_3_coins": ["a.png", "b.png", "c.png"],
            "market_cap": null,
            "market_cap_change_24h": 2.5,
            "volume_24h": null
        }"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.top_3_coins.len(), 3);
        assert_eq!(category.market_cap, None);
        assert_eq!(category.market_cap_change_24h, Some(2.5));
    }

    #[test]
    fn test_deserialize_ohlc_tuples() {
        let json = "[[1700000000000, 100.0, 110.0, 90.0, 105.0], [1700000060000, 105.0, 108.0, 95.0, 98.0]]";
        let rows: Vec<RawOhlc> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], 1700000000000.0);
        assert_eq!(rows[1][4], 98.0);
    }

    #[test]
    fn test_has_more_pages() {
        assert!(has_more_pages(10, 10));
        assert!(!has_more_pages(7, 10));
        assert!(!has_more_pages(0, 10));
    }

    #[test]
    fn test_estimated_total_pages_below_threshold() {
        assert_eq!(estimated_total_pages(1), 100);
        assert_eq!(estimated_total_pages(99), 100);
    }

    #[test]
    fn test_estimated_total_pages_recomputes_past_threshold() {
        assert_eq!(estimated_total_pages(100), 200);
        assert_eq!(estimated_total_pages(150), 300);
        assert_eq!(estimated_total_pages(200), 300);
        assert_eq!(estimated_total_pages(201), 400);
    }
}
