//! # Unit Conversion Table
//!
//! Static mapping from portion unit spellings to grams per unit. Volume units
//! use a water-density approximation (1 cup = 240 g), matching how portion
//! sizes are estimated upstream.

use log::trace;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Portion units with a known gram equivalent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortionUnit {
    // Volume units
    /// Cups
    Cup,
    /// Tablespoons
    Tablespoon,
    /// Teaspoons
    Teaspoon,

    // Mass units
    /// Ounces (avoirdupois)
    Ounce,
    /// Grams
    Gram,
}

/// Unit spellings and their canonical unit, keyed in lower case
static UNIT_SPELLINGS: LazyLock<HashMap<&'static str, PortionUnit>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Volume units
    map.insert("cup", PortionUnit::Cup);
    map.insert("cups", PortionUnit::Cup);
    map.insert("tbsp", PortionUnit::Tablespoon);
    map.insert("tablespoon", PortionUnit::Tablespoon);
    map.insert("tablespoons", PortionUnit::Tablespoon);
    map.insert("tsp", PortionUnit::Teaspoon);
    map.insert("teaspoon", PortionUnit::Teaspoon);
    map.insert("teaspoons", PortionUnit::Teaspoon);

    // Mass units
    map.insert("oz", PortionUnit::Ounce);
    map.insert("ounce", PortionUnit::Ounce);
    map.insert("ounces", PortionUnit::Ounce);
    map.insert("g", PortionUnit::Gram);
    map.insert("gram", PortionUnit::Gram);
    map.insert("grams", PortionUnit::Gram);

    map
});

impl PortionUnit {
    /// Resolve a unit token, ignoring case
    ///
    /// Returns `None` when no conversion is known, which callers must keep
    /// distinct from a zero-gram unit.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use meal_nutrition::unit_conversions::PortionUnit;
    ///
    /// assert_eq!(PortionUnit::from_token("Cups"), Some(PortionUnit::Cup));
    /// assert_eq!(PortionUnit::from_token("slice"), None);
    /// ```
    pub fn from_token(token: &str) -> Option<Self> {
        let unit = UNIT_SPELLINGS.get(token.trim().to_lowercase().as_str()).copied();
        trace!("Resolved unit token '{}' -> {:?}", token, unit);
        unit
    }

    /// Grams represented by one of this unit
    pub fn grams_per_unit(&self) -> f64 {
        match self {
            PortionUnit::Cup => 240.0,
            PortionUnit::Tablespoon => 15.0,
            PortionUnit::Teaspoon => 5.0,
            PortionUnit::Ounce => 28.35,
            PortionUnit::Gram => 1.0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PortionUnit::Cup => "cup",
            PortionUnit::Tablespoon => "tbsp",
            PortionUnit::Teaspoon => "tsp",
            PortionUnit::Ounce => "oz",
            PortionUnit::Gram => "g",
        }
    }

    /// Check if this is a volume unit
    pub fn is_volume(&self) -> bool {
        matches!(
            self,
            PortionUnit::Cup | PortionUnit::Tablespoon | PortionUnit::Teaspoon
        )
    }

    /// Check if this is a mass unit
    pub fn is_mass(&self) -> bool {
        matches!(self, PortionUnit::Ounce | PortionUnit::Gram)
    }
}

impl fmt::Display for PortionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Grams per unit for a free-text unit token, `None` when the unit is unknown
pub fn grams_per_unit(token: &str) -> Option<f64> {
    PortionUnit::from_token(token).map(|unit| unit.grams_per_unit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_spellings() {
        assert_eq!(grams_per_unit("cup"), Some(240.0));
        assert_eq!(grams_per_unit("cups"), Some(240.0));
        assert_eq!(grams_per_unit("tbsp"), Some(15.0));
        assert_eq!(grams_per_unit("tablespoons"), Some(15.0));
        assert_eq!(grams_per_unit("tsp"), Some(5.0));
        assert_eq!(grams_per_unit("teaspoon"), Some(5.0));
        assert_eq!(grams_per_unit("oz"), Some(28.35));
        assert_eq!(grams_per_unit("ounces"), Some(28.35));
        assert_eq!(grams_per_unit("g"), Some(1.0));
        assert_eq!(grams_per_unit("grams"), Some(1.0));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(grams_per_unit("CUP"), Some(240.0));
        assert_eq!(grams_per_unit("Tbsp"), Some(15.0));
        assert_eq!(PortionUnit::from_token("OZ"), Some(PortionUnit::Ounce));
    }

    #[test]
    fn test_unknown_unit_is_not_zero() {
        assert_eq!(grams_per_unit("slice"), None);
        assert_eq!(grams_per_unit("pinch"), None);
        assert_eq!(grams_per_unit(""), None);
    }

    #[test]
    fn test_unit_properties() {
        assert!(PortionUnit::Cup.is_volume());
        assert!(!PortionUnit::Cup.is_mass());
        assert!(PortionUnit::Gram.is_mass());
        assert!(!PortionUnit::Ounce.is_volume());
        assert_eq!(PortionUnit::Tablespoon.to_string(), "tbsp");
    }
}
