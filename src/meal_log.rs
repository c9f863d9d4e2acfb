//! # Daily Meal Log
//!
//! State container for one day of logged food, grouped by meal category, with
//! an explicit load/save boundary to a JSON file.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::food_model::Ingredient;

/// Meal slots of a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealCategory {
    pub const ALL: [MealCategory; 4] = [
        MealCategory::Breakfast,
        MealCategory::Lunch,
        MealCategory::Dinner,
        MealCategory::Snacks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "breakfast",
            MealCategory::Lunch => "lunch",
            MealCategory::Dinner => "dinner",
            MealCategory::Snacks => "snacks",
        }
    }
}

impl fmt::Display for MealCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MealCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealCategory::Breakfast),
            "lunch" => Ok(MealCategory::Lunch),
            "dinner" => Ok(MealCategory::Dinner),
            "snack" | "snacks" => Ok(MealCategory::Snacks),
            other => Err(anyhow::anyhow!("Unknown meal category: {}", other)),
        }
    }
}

/// Summed nutrition of a set of logged items
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutritionTotals {
    pub calories: u64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutritionTotals {
    /// Sum items; missing calories and unparseable macro strings count as zero
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Ingredient>) -> Self {
        items.into_iter().fold(Self::default(), |mut acc, item| {
            acc.calories += u64::from(item.calories.unwrap_or(0));
            if let Some(macros) = &item.macros {
                acc.protein += parse_grams(&macros.protein);
                acc.carbs += parse_grams(&macros.carbs);
                acc.fat += parse_grams(&macros.fat);
            }
            acc
        })
    }
}

fn parse_grams(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(0.0)
}

/// Per-meal and whole-day totals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotals {
    /// Keyed in meal order: breakfast, lunch, dinner, snacks
    pub by_meal: BTreeMap<MealCategory, NutritionTotals>,
    pub daily: NutritionTotals,
}

/// One day of logged items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMeals {
    #[serde(default = "today")]
    pub date: NaiveDate,
    #[serde(default)]
    pub breakfast: Vec<Ingredient>,
    #[serde(default)]
    pub lunch: Vec<Ingredient>,
    #[serde(default)]
    pub dinner: Vec<Ingredient>,
    #[serde(default)]
    pub snacks: Vec<Ingredient>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl Default for DailyMeals {
    fn default() -> Self {
        Self::new(today())
    }
}

impl DailyMeals {
    /// Empty log for `date`
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            breakfast: Vec::new(),
            lunch: Vec::new(),
            dinner: Vec::new(),
            snacks: Vec::new(),
        }
    }

    /// Load a log from `path`; a missing file yields an empty log for today
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No meal log found, starting empty");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read meal log {}", path.display()))?;
        let meals: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse meal log {}", path.display()))?;

        info!(path = %path.display(), items = meals.item_count(), "Meal log loaded");
        Ok(meals)
    }

    /// Write the log to `path` via a temporary file and rename
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize meal log")?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write meal log {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to replace meal log {}", path.display()))?;

        info!(path = %path.display(), items = self.item_count(), "Meal log saved");
        Ok(())
    }

    pub fn items(&self, category: MealCategory) -> &[Ingredient] {
        match category {
            MealCategory::Breakfast => &self.breakfast,
            MealCategory::Lunch => &self.lunch,
            MealCategory::Dinner => &self.dinner,
            MealCategory::Snacks => &self.snacks,
        }
    }

    fn items_mut(&mut self, category: MealCategory) -> &mut Vec<Ingredient> {
        match category {
            MealCategory::Breakfast => &mut self.breakfast,
            MealCategory::Lunch => &mut self.lunch,
            MealCategory::Dinner => &mut self.dinner,
            MealCategory::Snacks => &mut self.snacks,
        }
    }

    /// Append items to a meal
    pub fn add_to_meal(&mut self, category: MealCategory, items: impl IntoIterator<Item = Ingredient>) {
        self.items_mut(category).extend(items);
    }

    /// Remove the item at `index`; out-of-range indices are ignored
    pub fn remove_from_meal(&mut self, category: MealCategory, index: usize) -> Option<Ingredient> {
        let items = self.items_mut(category);
        if index < items.len() {
            Some(items.remove(index))
        } else {
            None
        }
    }

    /// Clear one meal, or the whole day when `category` is `None`
    pub fn clear_meals(&mut self, category: Option<MealCategory>) {
        match category {
            Some(category) => self.items_mut(category).clear(),
            None => {
                for category in MealCategory::ALL {
                    self.items_mut(category).clear();
                }
            }
        }
    }

    pub fn item_count(&self) -> usize {
        MealCategory::ALL.iter().map(|c| self.items(*c).len()).sum()
    }

    pub fn meal_totals(&self, category: MealCategory) -> NutritionTotals {
        NutritionTotals::from_items(self.items(category))
    }

    pub fn daily_totals(&self) -> NutritionTotals {
        NutritionTotals::from_items(MealCategory::ALL.iter().flat_map(|c| self.items(*c)))
    }

    pub fn totals(&self) -> DailyTotals {
        DailyTotals {
            by_meal: MealCategory::ALL
                .iter()
                .map(|c| (*c, self.meal_totals(*c)))
                .collect(),
            daily: self.daily_totals(),
        }
    }
}
