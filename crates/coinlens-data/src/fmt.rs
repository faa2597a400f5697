//! Display formatting for prices and percentages.
//!
//! Handles f64 values with magnitude-based decimal places and thousands
//! separators, so sub-cent altcoin prices and twelve-digit market caps both
//! read naturally.

fn decimal_places(value: f64) -> usize {
    let abs = value.abs();
    if abs >= 100.0 {
        return 2;
    }
    if abs >= 1.0 || abs == 0.0 {
        return 2;
    }
    // Small prices: keep two significant digits past the leading zeros.
    let exponent = abs.log10().floor().abs() as usize;
    (exponent + 1).min(8)
}

fn group_thousands(formatted: &str) -> String {
    let (sign, rest) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let mut parts = rest.splitn(2, '.');
    let integer = parts.next().unwrap_or("");
    let fraction = parts.next();

    let grouped = integer
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",");

    match fraction {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Format a USD amount, e.g. `$64,250.12` or `$0.000042`.
pub fn format_currency(amount: f64) -> String {
    let formatted = format!("{:.*}", decimal_places(amount), amount);
    format!("${}", group_thousands(&formatted))
}

/// Format a percentage with two decimals, e.g. `1.25%`.
pub fn format_percentage(value: f64) -> String {
    format!("{value:.2}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_groups_thousands() {
        assert_eq!(format_currency(64250.12), "$64,250.12");
        assert_eq!(format_currency(1265000000000.0), "$1,265,000,000,000.00");
    }

    #[test]
    fn test_currency_small_prices_keep_precision() {
        assert_eq!(format_currency(0.000042), "$0.000042");
        assert_eq!(format_currency(0.5), "$0.50");
    }

    #[test]
    fn test_currency_negative() {
        assert_eq!(format_currency(-1234.5), "$-1,234.50");
    }

    #[test]
    fn test_currency_zero() {
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(format_percentage(1.2), "1.20%");
        assert_eq!(format_percentage(-3.456), "-3.46%");
    }
}
