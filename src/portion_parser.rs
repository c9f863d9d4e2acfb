//! # Portion Parser
//!
//! Extracts a leading amount and unit token from a free-text portion string
//! such as `"2 tbsp"`, `"1/4 cup"` or `"3.5 oz"`.
//!
//! Amounts are either a single unsigned decimal or a single `a/b` fraction.
//! Fractions are parsed as two plain numbers and divided; nothing else is
//! evaluated, so `"1/0 cup"` or `"2*3 cup"` are parse failures.
//!
//! ## Usage
//!
//! ```rust
//! use meal_nutrition::portion_parser::parse_portion;
//!
//! let portion = parse_portion("1/4 cup").unwrap();
//! assert_eq!(portion.amount, 0.25);
//! assert_eq!(portion.unit, "cup");
//!
//! assert!(parse_portion("some").is_err());
//! ```

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

const AMOUNT_PATTERN: &str =
    r"^\s*(?P<num>\d+(?:\.\d+)?|\.\d+)(?:\s*/\s*(?P<den>\d+(?:\.\d+)?|\.\d+))?";
const UNIT_PATTERN: &str = r"^\s*(?P<unit>[A-Za-z]+)";

lazy_static! {
    static ref AMOUNT_REGEX: Regex =
        Regex::new(AMOUNT_PATTERN).expect("Portion amount pattern should be valid");
    static ref UNIT_REGEX: Regex =
        Regex::new(UNIT_PATTERN).expect("Portion unit pattern should be valid");
}

/// A portion amount with its unit token as written
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPortion {
    /// Non-negative amount (fractions already divided out)
    pub amount: f64,
    /// Unit token exactly as it appeared, e.g. "Cups"
    pub unit: String,
}

/// Errors that can occur while parsing a portion string
#[derive(Debug, Clone, PartialEq)]
pub enum PortionError {
    /// The string does not start with a number or fraction
    NoLeadingQuantity,
    /// A quantity was found but no alphabetic unit follows it
    MissingUnit,
    /// A numeric token could not be read as a number
    InvalidNumber(String),
    /// Fraction with a zero denominator
    DivisionByZero,
}

impl std::fmt::Display for PortionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortionError::NoLeadingQuantity => write!(f, "Portion does not start with a quantity"),
            PortionError::MissingUnit => write!(f, "Portion quantity is not followed by a unit"),
            PortionError::InvalidNumber(token) => write!(f, "Invalid number format: {}", token),
            PortionError::DivisionByZero => write!(f, "Division by zero in fraction"),
        }
    }
}

impl std::error::Error for PortionError {}

fn parse_number(token: &str) -> Result<f64, PortionError> {
    token
        .parse::<f64>()
        .map_err(|_| PortionError::InvalidNumber(token.to_string()))
}

/// Parse the leading amount and unit of a portion string
///
/// Only the start of the string is examined; trailing text such as
/// `"1 cup (chopped)"` is ignored.
pub fn parse_portion(portion: &str) -> Result<ParsedPortion, PortionError> {
    let captures = AMOUNT_REGEX
        .captures(portion)
        .ok_or(PortionError::NoLeadingQuantity)?;

    let whole_match = captures.get(0).ok_or(PortionError::NoLeadingQuantity)?;
    let numerator = captures
        .name("num")
        .map(|m| m.as_str())
        .ok_or(PortionError::NoLeadingQuantity)?;

    let mut amount = parse_number(numerator)?;
    if let Some(denominator) = captures.name("den") {
        let denominator = parse_number(denominator.as_str())?;
        if denominator == 0.0 {
            debug!("Rejected portion '{}': zero denominator", portion);
            return Err(PortionError::DivisionByZero);
        }
        amount /= denominator;
    }

    let rest = &portion[whole_match.end()..];
    let unit = UNIT_REGEX
        .captures(rest)
        .and_then(|c| c.name("unit"))
        .map(|m| m.as_str().to_string())
        .ok_or(PortionError::MissingUnit)?;

    trace!("Parsed portion '{}' -> amount={}, unit='{}'", portion, amount, unit);
    Ok(ParsedPortion { amount, unit })
}

/// How `rescale_portion` applies its value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RescaleMode {
    /// Multiply the original amount by the value
    Multiply,
    /// Replace the original amount with the value
    Absolute,
}

/// Render an amount and unit compactly, e.g. `"1.5cup"`
pub fn format_portion(amount: f64, unit: &str) -> String {
    format!("{:.1}{}", amount, unit)
}

/// Derive a new portion string from an existing one, keeping its unit
///
/// Returns `None` when the original portion does not parse.
///
/// # Examples
///
/// ```rust
/// use meal_nutrition::portion_parser::{rescale_portion, RescaleMode};
///
/// assert_eq!(rescale_portion("2 cups", 1.5, RescaleMode::Multiply), Some("3.0cups".to_string()));
/// assert_eq!(rescale_portion("2 cups", 0.5, RescaleMode::Absolute), Some("0.5cups".to_string()));
/// assert_eq!(rescale_portion("a handful", 2.0, RescaleMode::Multiply), None);
/// ```
pub fn rescale_portion(original: &str, value: f64, mode: RescaleMode) -> Option<String> {
    let parsed = parse_portion(original).ok()?;
    let amount = match mode {
        RescaleMode::Multiply => parsed.amount * value,
        RescaleMode::Absolute => value,
    };
    Some(format_portion(amount, &parsed.unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_portion() {
        let portion = parse_portion("3.5 oz").unwrap();
        assert_eq!(portion.amount, 3.5);
        assert_eq!(portion.unit, "oz");
    }

    #[test]
    fn test_parse_fraction_portion() {
        let portion = parse_portion("1/4 cup").unwrap();
        assert_eq!(portion.amount, 0.25);
        assert_eq!(portion.unit, "cup");

        let portion = parse_portion("3 / 4 tsp").unwrap();
        assert_eq!(portion.amount, 0.75);
    }

    #[test]
    fn test_parse_without_space() {
        let portion = parse_portion("100g").unwrap();
        assert_eq!(portion.amount, 100.0);
        assert_eq!(portion.unit, "g");
    }

    #[test]
    fn test_unit_case_is_preserved() {
        let portion = parse_portion("2 Cups chopped").unwrap();
        assert_eq!(portion.unit, "Cups");
    }

    #[test]
    fn test_no_leading_quantity() {
        assert_eq!(parse_portion("some"), Err(PortionError::NoLeadingQuantity));
        assert_eq!(parse_portion("about 2 cups"), Err(PortionError::NoLeadingQuantity));
        assert_eq!(parse_portion(""), Err(PortionError::NoLeadingQuantity));
        assert_eq!(parse_portion("-2 cups"), Err(PortionError::NoLeadingQuantity));
    }

    #[test]
    fn test_missing_unit() {
        assert_eq!(parse_portion("2"), Err(PortionError::MissingUnit));
        assert_eq!(parse_portion("1.2.3 cup"), Err(PortionError::MissingUnit));
        assert_eq!(parse_portion("2*3 cup"), Err(PortionError::MissingUnit));
    }

    #[test]
    fn test_zero_denominator_is_rejected() {
        assert_eq!(parse_portion("1/0 cup"), Err(PortionError::DivisionByZero));
        assert_eq!(parse_portion("1/0.0 cup"), Err(PortionError::DivisionByZero));
    }

    #[test]
    fn test_format_and_rescale() {
        assert_eq!(format_portion(1.5, "cup"), "1.5cup");
        assert_eq!(format_portion(2.0, "tbsp"), "2.0tbsp");
        assert_eq!(
            rescale_portion("1/2 cup", 3.0, RescaleMode::Multiply),
            Some("1.5cup".to_string())
        );
        assert_eq!(rescale_portion("some", 3.0, RescaleMode::Absolute), None);
    }
}
