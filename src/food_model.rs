//! # Food and Ingredient Data Model
//!
//! This module defines the ingredient records exchanged with the extraction and
//! meal-logging collaborators, and the typed shapes of FoodData Central
//! search and detail payloads.
//!
//! ## Core Concepts
//!
//! - **Ingredient**: A named food with an assumed portion, optionally enriched
//!   with calories and macros
//! - **FoodCandidate**: A search hit, scored against the query
//! - **FoodDetail**: The nutrient list of one database record
//! - **NutrientFacts**: Calories and macros per 100 g reference serving
//!
//! ## Usage
//!
//! ```rust
//! use meal_nutrition::food_model::Ingredient;
//!
//! let ingredient: Ingredient =
//!     serde_json::from_str(r#"{"name": "rolled oats", "assumedPortion": "1/2 cup"}"#).unwrap();
//! assert_eq!(ingredient.assumed_portion, "1/2 cup");
//! assert!(!ingredient.is_enriched());
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Value of `Ingredient::source` after enrichment
pub const USDA_SOURCE: &str = "USDA";

/// An ingredient as produced by the extraction step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Free-text name (e.g., "chicken breast", "olive oil")
    pub name: String,

    /// Free-text portion (e.g., "4 oz", "1/4 cup", "a handful")
    #[serde(default)]
    pub assumed_portion: String,

    /// Whole kilocalories for the assumed portion
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::calories"
    )]
    pub calories: Option<u32>,

    /// Macro grams for the assumed portion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macros: Option<Macros>,

    /// Provenance of the nutrition values ("USDA" once reconciled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// FoodData Central identifier of the matched record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usda_food_id: Option<u64>,

    /// Description of the matched record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_description: Option<String>,

    /// Upstream fields this crate does not interpret, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Macro grams rendered with one decimal place (e.g., "35.2")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    #[serde(default, deserialize_with = "lenient::decimal_string")]
    pub protein: String,
    #[serde(default, deserialize_with = "lenient::decimal_string")]
    pub carbs: String,
    #[serde(default, deserialize_with = "lenient::decimal_string")]
    pub fat: String,
}

impl Ingredient {
    /// Create an ingredient with just a name and assumed portion
    pub fn new(name: &str, assumed_portion: &str) -> Self {
        Self {
            name: name.to_string(),
            assumed_portion: assumed_portion.to_string(),
            calories: None,
            macros: None,
            source: None,
            usda_food_id: None,
            matched_description: None,
            extra: Map::new(),
        }
    }

    /// Whether the nutrition values come from a database match
    pub fn is_enriched(&self) -> bool {
        self.source.as_deref() == Some(USDA_SOURCE) && self.usda_food_id.is_some()
    }
}

impl Macros {
    /// Format gram amounts with one decimal place
    pub fn from_grams(protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            protein: format!("{:.1}", protein),
            carbs: format!("{:.1}", carbs),
            fat: format!("{:.1}", fat),
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.assumed_portion.is_empty() {
            write!(f, "{}", self.name)?;
        } else {
            write!(f, "{} {}", self.assumed_portion, self.name)?;
        }

        if let Some(calories) = self.calories {
            write!(f, " ({} kcal)", calories)?;
        }

        Ok(())
    }
}

/// A FoodData Central search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodCandidate {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_owner: Option<String>,
    pub fdc_id: u64,
    /// Relevance computed by the candidate scorer, not part of the API payload
    #[serde(default)]
    pub score: f64,
}

impl FoodCandidate {
    pub fn new(description: &str, fdc_id: u64) -> Self {
        Self {
            description: description.to_string(),
            brand_owner: None,
            fdc_id,
            score: 0.0,
        }
    }

    pub fn with_brand_owner(mut self, brand_owner: &str) -> Self {
        self.brand_owner = Some(brand_owner.to_string());
        self
    }

    /// Brand owner present and non-blank
    pub fn is_branded(&self) -> bool {
        self.brand_owner
            .as_deref()
            .is_some_and(|owner| !owner.trim().is_empty())
    }
}

/// Body of `GET /foods/search`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Hits that failed to decode are dropped, the rest are kept
    #[serde(default, deserialize_with = "lenient::candidates")]
    pub foods: Vec<FoodCandidate>,
    #[serde(default)]
    pub total_hits: Option<u64>,
}

/// Body of `GET /food/{fdcId}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDetail {
    #[serde(default)]
    pub fdc_id: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

/// One entry of a detail record's nutrient list
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FoodNutrient {
    #[serde(default)]
    pub nutrient: Option<NutrientInfo>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientInfo {
    /// Nutrient code, e.g. "208" for energy in kcal
    #[serde(default, deserialize_with = "lenient::code")]
    pub number: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit_name: Option<String>,
}

impl FoodNutrient {
    pub fn new(number: &str, amount: f64) -> Self {
        Self {
            nutrient: Some(NutrientInfo {
                number: Some(number.to_string()),
                ..Default::default()
            }),
            amount: Some(amount),
        }
    }

    pub fn number(&self) -> Option<&str> {
        self.nutrient.as_ref()?.number.as_deref()
    }
}

/// Calories and macro grams per reference serving
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutrientFacts {
    pub calories: f64,
    pub macros: MacroAmounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MacroAmounts {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Deserializers accepting the loosely typed values upstream producers emit
mod lenient {
    use super::*;
    use log::debug;

    fn as_f64(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(as_f64).filter(|v| v.is_finite()))
    }

    pub fn code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn calories<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        let amount = number(deserializer)?;
        Ok(amount.map(|v| v.max(0.0).round() as u32))
    }

    pub fn candidates<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<FoodCandidate>, D::Error> {
        let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<FoodCandidate>(value) {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    debug!("Skipping malformed search hit: {}", e);
                    None
                }
            })
            .collect())
    }

    pub fn decimal_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.as_f64().map(|v| format!("{:.1}", v)).unwrap_or_default(),
            _ => String::new(),
        })
    }
}
