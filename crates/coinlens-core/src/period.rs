//! Period catalog: the fixed set of selectable chart periods.

use std::fmt;
use std::str::FromStr;

/// Chart period enumeration.
///
/// The domain is closed; values outside it cannot be constructed, so
/// `config()` is total and lookup can never fail at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Fetch parameters and display rules for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodConfig {
    /// Historical lookback, in days, passed to the data source.
    pub lookback_days: u32,
    /// Whether the surface's time axis shows clock time or date-only.
    /// A display hint threaded through to the surface; conversion never reads it.
    pub show_intraday_time: bool,
}

impl Period {
    /// Returns the fetch parameters and display rules for this period.
    pub fn config(&self) -> PeriodConfig {
        match self {
            Period::Daily => PeriodConfig {
                lookback_days: 1,
                show_intraday_time: true,
            },
            Period::Weekly => PeriodConfig {
                lookback_days: 7,
                show_intraday_time: true,
            },
            Period::Monthly => PeriodConfig {
                lookback_days: 30,
                show_intraday_time: true,
            },
            Period::Yearly => PeriodConfig {
                lookback_days: 365,
                show_intraday_time: false,
            },
        }
    }

    /// Returns a short label for this period.
    pub fn label(&self) -> &'static str {
        match self {
            Period::Daily => "1D",
            Period::Weekly => "1W",
            Period::Monthly => "1M",
            Period::Yearly => "1Y",
        }
    }

    /// Returns all available periods in selector order.
    pub fn all() -> &'static [Period] {
        &[
            Period::Daily,
            Period::Weekly,
            Period::Monthly,
            Period::Yearly,
        ]
    }
}

/// Error returned when parsing a period from text fails.
///
/// Construction-time validation: once a `Period` exists it is always valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodParseError(pub String);

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown period: {:?}", self.0)
    }
}

impl std::error::Error for PeriodParseError {}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" | "1d" => Ok(Period::Daily),
            "weekly" | "1w" => Ok(Period::Weekly),
            "monthly" | "1m" => Ok(Period::Monthly),
            "yearly" | "1y" => Ok(Period::Yearly),
            other => Err(PeriodParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_lookbacks() {
        assert_eq!(Period::Daily.config().lookback_days, 1);
        assert_eq!(Period::Weekly.config().lookback_days, 7);
        assert_eq!(Period::Monthly.config().lookback_days, 30);
        assert_eq!(Period::Yearly.config().lookback_days, 365);
    }

    #[test]
    fn test_intraday_time_hint() {
        assert!(Period::Daily.config().show_intraday_time);
        assert!(Period::Weekly.config().show_intraday_time);
        assert!(Period::Monthly.config().show_intraday_time);
        assert!(!Period::Yearly.config().show_intraday_time);
    }

    #[test]
    fn test_parse_labels_and_names() {
        assert_eq!("1d".parse::<Period>().unwrap(), Period::Daily);
        assert_eq!("weekly".parse::<Period>().unwrap(), Period::Weekly);
        assert_eq!("1M".parse::<Period>().unwrap(), Period::Monthly);
        assert_eq!("YEARLY".parse::<Period>().unwrap(), Period::Yearly);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("hourly".parse::<Period>().is_err());
        assert!("".parse::<Period>().is_err());
    }

    #[test]
    fn test_all_matches_labels() {
        let labels: Vec<_> = Period::all().iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["1D", "1W", "1M", "1Y"]);
    }
}
