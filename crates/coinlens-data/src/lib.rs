//! Market-data access for coinlens.

pub mod coingecko;
pub mod fmt;
pub mod live;
pub mod records;

pub use coingecko::{CoinGeckoClient, DataError};
pub use live::{LiveEvent, LiveFeed};
pub use records::{Category, CoinDetail, CoinMarket};
