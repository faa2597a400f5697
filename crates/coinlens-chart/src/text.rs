//! Terminal text rendering backend.
//!
//! Draws the candle series with Unicode characters, row by row from the top
//! price down: full blocks for bodies, thin bars for wicks. One column per
//! candle, downsampled to the container width when the series is longer.

use chrono::{DateTime, Utc};
use coinlens_core::Candle;
use coinlens_data::fmt::format_currency;

use crate::surface::{SurfaceBackend, SurfaceConfig};

const BODY_BULL: char = '█';
const BODY_BEAR: char = '░';
const WICK: char = '│';

/// Approximate pixel height of one text row.
const ROW_PIXELS: u32 = 18;
/// Approximate pixel width of one text column.
const COLUMN_PIXELS: u32 = 8;

/// A [`SurfaceBackend`] that renders to stdout.
pub struct TextBackend {
    width: u32,
    height: u32,
    show_intraday_time: bool,
    series: Vec<Candle>,
    released: bool,
}

impl TextBackend {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            show_intraday_time: true,
            series: Vec::new(),
            released: false,
        }
    }

    fn rows(&self) -> usize {
        (self.height / ROW_PIXELS).clamp(6, 40) as usize
    }

    fn columns(&self) -> usize {
        (self.width / COLUMN_PIXELS).clamp(20, 160) as usize
    }

    /// Downsample the series to at most `columns` candles by merging
    /// neighbouring candles into one (first open, max high, min low, last close).
    fn visible_candles(&self) -> Vec<Candle> {
        let columns = self.columns();
        if self.series.len() <= columns {
            return self.series.clone();
        }
        let bucket = self.series.len().div_ceil(columns);
        self.series
            .chunks(bucket)
            .map(|chunk| {
                let first = chunk[0];
                let last = chunk[chunk.len() - 1];
                let high = chunk.iter().map(|c| c.high).fold(f64::MIN, f64::max);
                let low = chunk.iter().map(|c| c.low).fold(f64::MAX, f64::min);
                Candle::new(first.timestamp, first.open, high, low, last.close)
            })
            .collect()
    }

    fn time_label(&self, timestamp: i64) -> String {
        let stamp = DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_default();
        if self.show_intraday_time {
            stamp.format("%m-%d %H:%M").to_string()
        } else {
            stamp.format("%Y-%m-%d").to_string()
        }
    }

    fn render(&self) {
        let candles = self.visible_candles();
        if candles.is_empty() {
            println!("(no data)");
            return;
        }

        let max_price = candles.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let min_price = candles.iter().map(|c| c.low).fold(f64::MAX, f64::min);
        let range = (max_price - min_price).max(f64::EPSILON);
        let rows = self.rows();
        let row_height = range / rows as f64;

        for row in 0..rows {
            let row_top = max_price - row as f64 * row_height;
            let row_bottom = row_top - row_height;
            let mut line = String::with_capacity(candles.len());
            for candle in &candles {
                let body_top = candle.open.max(candle.close);
                let body_bottom = candle.open.min(candle.close);
                // Overlap tests against this row's price band.
                let ch = if body_top >= row_bottom && body_bottom <= row_top {
                    if candle.close >= candle.open {
                        BODY_BULL
                    } else {
                        BODY_BEAR
                    }
                } else if candle.high >= row_bottom && candle.low <= row_top {
                    WICK
                } else {
                    ' '
                };
                line.push(ch);
            }
            let label = if row == 0 {
                format_currency(max_price)
            } else if row == rows - 1 {
                format_currency(min_price)
            } else {
                String::new()
            };
            println!("{line} {label}");
        }

        let first = self.time_label(candles[0].timestamp);
        let last = self.time_label(candles[candles.len() - 1].timestamp);
        let gap = candles.len().saturating_sub(first.len() + last.len());
        println!("{first}{:gap$}{last}", "");
    }
}

impl Default for TextBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceBackend for TextBackend {
    fn init(&mut self, width: u32, config: &SurfaceConfig) {
        self.width = width;
        self.height = config.height;
        self.show_intraday_time = config.show_intraday_time;
    }

    fn apply_width(&mut self, width: u32) {
        self.width = width;
        self.render();
    }

    fn apply_series(&mut self, candles: &[Candle]) {
        self.series = candles.to_vec();
        self.render();
    }

    fn apply_time_axis(&mut self, show_intraday_time: bool) {
        self.show_intraday_time = show_intraday_time;
    }

    fn release(&mut self) {
        self.series.clear();
        self.released = true;
    }
}
