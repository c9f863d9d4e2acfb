//! # Nutrient Extractor
//!
//! Maps a detail record's nutrient list onto calories and the three macros.
//! Only four nutrient codes are recognized; everything else is ignored.
//!
//! A code that is missing from the payload and a code present with amount 0
//! both yield zero.

use log::{debug, trace};

use crate::food_model::{FoodDetail, FoodNutrient, NutrientFacts};

/// Energy (kcal)
pub const ENERGY_KCAL: &str = "208";
/// Protein
pub const PROTEIN: &str = "203";
/// Carbohydrate, by difference
pub const CARBOHYDRATE: &str = "205";
/// Total lipid (fat)
pub const TOTAL_FAT: &str = "204";

/// Extract facts from an optional detail record; `None` yields all zeros
pub fn extract_nutrients(detail: Option<&FoodDetail>) -> NutrientFacts {
    match detail {
        Some(detail) => extract_from_list(&detail.food_nutrients),
        None => {
            debug!("No detail record available, nutrients default to zero");
            NutrientFacts::default()
        }
    }
}

/// Extract facts from a nutrient list in any order
///
/// Negative or missing amounts count as zero. When a code appears more than
/// once the last entry wins.
///
/// # Examples
///
/// ```rust
/// use meal_nutrition::food_model::FoodNutrient;
/// use meal_nutrition::nutrient_extractor::extract_from_list;
///
/// let facts = extract_from_list(&[
///     FoodNutrient::new("203", 31.0),
///     FoodNutrient::new("208", 165.0),
///     FoodNutrient::new("301", 11.0),
/// ]);
/// assert_eq!(facts.calories, 165.0);
/// assert_eq!(facts.macros.protein, 31.0);
/// assert_eq!(facts.macros.fat, 0.0);
/// ```
pub fn extract_from_list(nutrients: &[FoodNutrient]) -> NutrientFacts {
    let mut facts = NutrientFacts::default();

    for entry in nutrients {
        let Some(code) = entry.number() else {
            continue;
        };
        let amount = match entry.amount {
            Some(amount) if amount > 0.0 => amount,
            _ => 0.0,
        };

        let slot = match code {
            ENERGY_KCAL => &mut facts.calories,
            PROTEIN => &mut facts.macros.protein,
            CARBOHYDRATE => &mut facts.macros.carbs,
            TOTAL_FAT => &mut facts.macros.fat,
            _ => continue,
        };
        trace!("Nutrient {} -> {}", code, amount);
        *slot = amount;
    }

    facts
}
