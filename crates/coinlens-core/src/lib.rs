//! Core types for the coinlens dashboard.
//!
//! This crate provides fundamental data structures with no external dependencies:
//! - `Candle` - one OHLC interval in normalized internal units
//! - `Period` - the catalog of selectable chart periods
//! - `convert` - wire-tuple to candle conversion

pub mod candle;
pub mod convert;
pub mod period;

pub use candle::Candle;
pub use convert::{convert_ohlc, Converted, RawOhlc, TimestampUnit};
pub use period::{Period, PeriodConfig, PeriodParseError};
