//! # Portion Scaler
//!
//! Converts the database's 100 g reference serving to the ingredient's
//! assumed portion.

use log::debug;

use crate::portion_parser::{parse_portion, ParsedPortion};
use crate::unit_conversions::PortionUnit;

/// Grams in the reference serving FoodData Central reports nutrients for
pub const REFERENCE_SERVING_GRAMS: f64 = 100.0;

/// Multiplier for an already parsed portion, `None` when the unit is unknown
pub fn multiplier_for(portion: &ParsedPortion) -> Option<f64> {
    let unit = PortionUnit::from_token(&portion.unit)?;
    Some(unit.grams_per_unit() * portion.amount / REFERENCE_SERVING_GRAMS)
}

/// Scale factor from the reference serving to `assumed_portion`
///
/// Falls back to exactly `1.0` (reference values pass through unchanged)
/// when the portion does not parse or its unit has no known conversion.
///
/// # Examples
///
/// ```rust
/// use meal_nutrition::portion_scaler::portion_multiplier;
///
/// assert!((portion_multiplier("1/4 cup") - 0.6).abs() < 1e-9);
/// assert_eq!(portion_multiplier("some"), 1.0);
/// assert_eq!(portion_multiplier("2 slices"), 1.0);
/// ```
pub fn portion_multiplier(assumed_portion: &str) -> f64 {
    let parsed = match parse_portion(assumed_portion) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Portion '{}' not scaled: {}", assumed_portion, e);
            return 1.0;
        }
    };

    match multiplier_for(&parsed) {
        Some(multiplier) => multiplier,
        None => {
            debug!("Portion '{}' not scaled: unknown unit '{}'", assumed_portion, parsed.unit);
            1.0
        }
    }
}
