//! Integer parsing for survey answers.

use crate::width::ascii_to_half_width;

/// Parses a cell as an integer.
///
/// Handles the formats respondents and sheet formatting produce:
/// - Full-width digits and signs: "３０", "－５"
/// - Thousands separators: "1,200"
/// - Decimal and scientific strings, truncated toward zero: "29.0", "1e3"
///
/// Returns `None` for empty or non-numeric text.
pub fn parse_integer(value: &str) -> Option<i64> {
    let folded = ascii_to_half_width(value);
    let cleaned: String = folded
        .trim()
        .chars()
        .filter(|ch| *ch != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(parsed) = cleaned.parse::<i64>() {
        return Some(parsed);
    }
    let parsed = cleaned.parse::<f64>().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    let truncated = parsed.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_integers() {
        assert_eq!(parse_integer("30"), Some(30));
        assert_eq!(parse_integer("-4"), Some(-4));
        assert_eq!(parse_integer(" 7 "), Some(7));
    }

    #[test]
    fn test_full_width_and_separators() {
        assert_eq!(parse_integer("３０"), Some(30));
        assert_eq!(parse_integer("－５"), Some(-5));
        assert_eq!(parse_integer("1,200"), Some(1200));
        assert_eq!(parse_integer("１，２００"), Some(1200));
    }

    #[test]
    fn test_decimal_truncation() {
        assert_eq!(parse_integer("29.0"), Some(29));
        assert_eq!(parse_integer("3.9"), Some(3));
        assert_eq!(parse_integer("-3.9"), Some(-3));
        assert_eq!(parse_integer("1e3"), Some(1000));
    }

    #[test]
    fn test_not_numeric() {
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(parse_integer("30歳"), None);
        assert_eq!(parse_integer("inf"), None);
        assert_eq!(parse_integer("NaN"), None);
    }
}
