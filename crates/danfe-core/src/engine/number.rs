//! Brazilian number normalization.
//!
//! Tokens coming out of PDF text extraction use `.` as thousands separator
//! and `,` as decimal separator. OCR/extraction noise in financial fields
//! must never abort a document, so the public entry point is total: it
//! returns a parsed decimal or the zero sentinel.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a Brazilian-formatted number (e.g. "1.234,56", "-0,18").
///
/// Returns `None` for anything that does not parse cleanly.
pub fn parse_brazilian_number(token: &str) -> Option<Decimal> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }

    // Strip thousands separators, then promote the decimal comma.
    let normalized = digits.replace('.', "").replace(',', ".");

    let value = Decimal::from_str(&normalized).ok()?;
    Some(if negative { -value } else { value })
}

/// Total wrapper around [`parse_brazilian_number`]: malformed input becomes
/// the zero sentinel instead of an error.
pub fn normalize(token: &str) -> Decimal {
    parse_brazilian_number(token).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_thousands_and_decimal_comma() {
        assert_eq!(parse_brazilian_number("1.234,56"), Some(dec!(1234.56)));
        assert_eq!(parse_brazilian_number("10,00"), Some(dec!(10.00)));
        assert_eq!(parse_brazilian_number("12.345.678,90"), Some(dec!(12345678.90)));
        assert_eq!(parse_brazilian_number("5102"), Some(dec!(5102)));
    }

    #[test]
    fn parses_negative_values() {
        assert_eq!(parse_brazilian_number("-0,18"), Some(dec!(-0.18)));
        assert_eq!(parse_brazilian_number("-1.000,00"), Some(dec!(-1000.00)));
    }

    #[test]
    fn rejects_garbage() {
        for token in ["", "--", "abc", "12a", "R$10", "1,2,3,", "-"] {
            assert_eq!(parse_brazilian_number(token), None, "{token:?}");
        }
    }

    #[test]
    fn normalize_is_total() {
        assert_eq!(normalize("1.234,56"), dec!(1234.56));
        assert_eq!(normalize("--"), Decimal::ZERO);
        assert_eq!(normalize(""), Decimal::ZERO);
    }
}
