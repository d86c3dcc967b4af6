use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace and drops
/// thousands separators (comma, space, no-break and narrow no-break space).
fn normalize_decimal_input(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '\u{a0}' | '\u{202f}'))
        .collect()
}

/// Returns `true` when `s` holds nothing but whitespace.
pub fn is_blank(s: &str) -> bool {
    normalize_decimal_input(s).is_empty()
}

/// Parses a string into a [`Decimal`].
///
/// Handles grouped input such as `"1,234.56"` or `"100 000"`. On input `.`
/// is always the decimal point, never a grouping separator, so
/// `"1.234.567"` is rejected and `"100.000"` reads as one hundred.
/// Blank input is an error; callers check [`is_blank`] first.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    normalize_decimal_input(s).parse::<Decimal>().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_accepts_space_grouping() {
        assert_eq!(parse_decimal("100 000").unwrap(), dec!(100000));
        assert_eq!(parse_decimal("100\u{202f}000").unwrap(), dec!(100000));
        assert_eq!(parse_decimal("100\u{a0}000").unwrap(), dec!(100000));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_blank_is_error() {
        assert!(parse_decimal("").is_err());
        assert!(parse_decimal("   ").is_err());
    }

    #[test]
    fn parse_decimal_dot_is_decimal_point() {
        assert_eq!(parse_decimal("100.000").unwrap(), dec!(100));
        assert!(parse_decimal("1.234.567").is_err());
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("12DH").is_err());
    }

    #[test]
    fn is_blank_detects_whitespace_only() {
        assert!(is_blank(" \t "));
        assert!(!is_blank(" 0 "));
    }
}
