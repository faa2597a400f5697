//! Live data feed for real-time candle updates.
//!
//! CoinGecko has no public websocket, so the feed polls the most recent
//! candle on an interval and emits it as a live tick. The consumer merges
//! ticks into its series (replace the still-open interval, append a new one).

use std::sync::Arc;
use std::time::Duration;

use coinlens_core::{convert_ohlc, Candle, Period, TimestampUnit};
use tokio::sync::mpsc;

use crate::coingecko::CoinGeckoClient;

/// Events emitted by the live feed.
#[derive(Debug, Clone)]
pub enum LiveEvent {
    /// Feed started polling.
    Connected,
    /// The most recent, possibly still-open, candle.
    Tick(Candle),
    /// Feed stopped.
    Disconnected,
    /// A poll failed; the feed keeps going.
    Error(String),
}

/// Polls the market-data API and forwards the latest candle as live ticks.
pub struct LiveFeed {
    coin_id: String,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl LiveFeed {
    /// Start polling the given coin.
    ///
    /// Returns the feed handle and a receiver for live events.
    pub fn subscribe(
        client: Arc<CoinGeckoClient>,
        coin_id: &str,
        poll_interval: Duration,
    ) -> (Self, mpsc::Receiver<LiveEvent>) {
        let (event_tx, event_rx) = mpsc::channel(16);
        let coin = coin_id.to_string();

        let task = tokio::spawn(async move {
            if event_tx.send(LiveEvent::Connected).await.is_err() {
                return;
            }
            let mut ticker = tokio::time::interval(poll_interval);
            loop {
                ticker.tick().await;
                let event = match client.ohlc(&coin, Period::Daily).await {
                    Ok(raw) => {
                        let converted = convert_ohlc(&raw, TimestampUnit::Milliseconds);
                        match converted.candles.last() {
                            Some(candle) => LiveEvent::Tick(*candle),
                            None => continue,
                        }
                    }
                    Err(e) => {
                        log::warn!("{coin}: live poll failed: {e}");
                        LiveEvent::Error(e.to_string())
                    }
                };
                if event_tx.send(event).await.is_err() {
                    break;
                }
            }
            let _ = event_tx.send(LiveEvent::Disconnected).await;
        });

        (
            Self {
                coin_id: coin_id.to_string(),
                task: Some(task),
            },
            event_rx,
        )
    }

    /// Stop polling and drop the background task.
    pub fn unsubscribe(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// The coin this feed is polling.
    pub fn coin_id(&self) -> &str {
        &self.coin_id
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_feed_reports_error_and_keeps_polling() {
        // Unroutable base URL so every poll fails fast.
        let client = Arc::new(CoinGeckoClient::with_base_url("http://127.0.0.1:1"));
        let (mut feed, mut rx) = LiveFeed::subscribe(client, "bitcoin", Duration::from_millis(10));
        assert_eq!(feed.coin_id(), "bitcoin");

        assert!(matches!(rx.recv().await, Some(LiveEvent::Connected)));
        assert!(matches!(rx.recv().await, Some(LiveEvent::Error(_))));
        assert!(matches!(rx.recv().await, Some(LiveEvent::Error(_))));

        feed.unsubscribe();
    }
}
