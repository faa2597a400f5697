//! Conversion from wire-format OHLC tuples to candles.

use crate::candle::Candle;

/// Wire-format OHLC record: `[timestamp, open, high, low, close]`.
pub type RawOhlc = [f64; 5];

/// Timestamp unit of the incoming tuples.
///
/// The unit is stated explicitly at every call site; it is never inferred
/// from magnitude, so data already in seconds is never double-converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampUnit {
    Milliseconds,
    Seconds,
}

/// Result of a conversion pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    /// Candles from well-formed tuples, in input order.
    pub candles: Vec<Candle>,
    /// Number of malformed tuples dropped.
    pub dropped: usize,
}

/// Convert a batch of wire tuples into candles.
///
/// Malformed tuples (OHLC invariant violated, or non-finite values) are
/// dropped and counted; the rest of the batch converts normally. Input
/// ordering is preserved.
pub fn convert_ohlc(raw: &[RawOhlc], unit: TimestampUnit) -> Converted {
    let mut candles = Vec::with_capacity(raw.len());
    let mut dropped = 0;

    for tuple in raw {
        let [ts, open, high, low, close] = *tuple;
        if !ts.is_finite() {
            dropped += 1;
            continue;
        }
        let timestamp = match unit {
            TimestampUnit::Milliseconds => (ts / 1000.0).floor() as i64,
            TimestampUnit::Seconds => ts.floor() as i64,
        };
        let candle = Candle::new(timestamp, open, high, low, close);
        if candle.is_well_formed() {
            candles.push(candle);
        } else {
            dropped += 1;
        }
    }

    Converted { candles, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millisecond_normalization() {
        let raw = vec![
            [0.0, 100.0, 110.0, 90.0, 105.0],
            [60000.0, 105.0, 108.0, 95.0, 98.0],
        ];
        let out = convert_ohlc(&raw, TimestampUnit::Milliseconds);
        assert_eq!(out.dropped, 0);
        assert_eq!(
            out.candles,
            vec![
                Candle::new(0, 100.0, 110.0, 90.0, 105.0),
                Candle::new(60, 105.0, 108.0, 95.0, 98.0),
            ]
        );
    }

    #[test]
    fn test_seconds_not_double_converted() {
        let raw = vec![[60.0, 105.0, 108.0, 95.0, 98.0]];
        let out = convert_ohlc(&raw, TimestampUnit::Seconds);
        assert_eq!(out.candles[0].timestamp, 60);
    }

    #[test]
    fn test_length_and_order_preserved() {
        let raw: Vec<RawOhlc> = (0..50)
            .map(|i| {
                let ts = (i * 60_000) as f64;
                [ts, 100.0, 110.0, 90.0, 105.0]
            })
            .collect();
        let out = convert_ohlc(&raw, TimestampUnit::Milliseconds);
        assert_eq!(out.candles.len(), raw.len());
        for pair in out.candles.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[test]
    fn test_malformed_tuple_dropped_not_fatal() {
        let raw = vec![
            [0.0, 100.0, 110.0, 90.0, 105.0],
            [60000.0, 105.0, 90.0, 95.0, 98.0], // high < low
            [120000.0, 98.0, 104.0, 96.0, 101.0],
        ];
        let out = convert_ohlc(&raw, TimestampUnit::Milliseconds);
        assert_eq!(out.dropped, 1);
        assert_eq!(out.candles.len(), 2);
        assert_eq!(out.candles[0].timestamp, 0);
        assert_eq!(out.candles[1].timestamp, 120);
    }

    #[test]
    fn test_non_finite_values_dropped() {
        let raw = vec![
            [f64::NAN, 100.0, 110.0, 90.0, 105.0],
            [60000.0, f64::INFINITY, 110.0, 90.0, 105.0],
        ];
        let out = convert_ohlc(&raw, TimestampUnit::Milliseconds);
        assert_eq!(out.dropped, 2);
        assert!(out.candles.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let out = convert_ohlc(&[], TimestampUnit::Milliseconds);
        assert!(out.candles.is_empty());
        assert_eq!(out.dropped, 0);
    }
}
