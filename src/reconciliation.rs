//! # Reconciliation Pipeline
//!
//! Maps a free-text ingredient onto a FoodData Central record and rescales the
//! record's per-100 g nutrients to the ingredient's assumed portion.
//!
//! Enrichment is best-effort: every failure (missing key, transport error, no
//! candidate above the score threshold, even a panic inside the pipeline)
//! yields the input ingredient unchanged, so one bad lookup never aborts a
//! batch.

use futures_util::future::join_all;
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::food_model::{FoodCandidate, Ingredient, Macros, NutrientFacts, USDA_SOURCE};
use crate::nutrient_extractor::extract_nutrients;
use crate::portion_scaler::portion_multiplier;
use crate::usda_client::{FoodDatabase, UsdaClient};
use crate::usda_config::UsdaConfig;

/// Drives search, candidate selection, detail lookup and scaling
pub struct Reconciler<D: FoodDatabase> {
    database: D,
    min_score: f64,
}

impl Reconciler<UsdaClient> {
    /// Reconciler backed by the FoodData Central API
    pub fn from_config(config: UsdaConfig) -> anyhow::Result<Self> {
        let min_score = config.min_score;
        Ok(Self::new(UsdaClient::new(config)?, min_score))
    }
}

impl<D: FoodDatabase> Reconciler<D> {
    pub fn new(database: D, min_score: f64) -> Self {
        Self { database, min_score }
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    /// Enrich one ingredient, or return it unchanged
    pub async fn enhance(&self, ingredient: &Ingredient) -> Ingredient {
        match AssertUnwindSafe(self.try_enhance(ingredient))
            .catch_unwind()
            .await
        {
            Ok(Some(enhanced)) => enhanced,
            Ok(None) => ingredient.clone(),
            Err(_) => {
                error!(ingredient = %ingredient.name, "Enhancement panicked, keeping original values");
                ingredient.clone()
            }
        }
    }

    /// Enrich every ingredient concurrently, preserving input order
    pub async fn enhance_all(&self, ingredients: &[Ingredient]) -> Vec<Ingredient> {
        let enhanced = join_all(ingredients.iter().map(|ingredient| self.enhance(ingredient))).await;
        let matched = enhanced.iter().filter(|i| i.is_enriched()).count();
        info!(total = ingredients.len(), matched, "Batch enhancement completed");
        enhanced
    }

    /// Enrich one ingredient within `timeout`; expiry keeps the original
    pub async fn enhance_with_timeout(&self, ingredient: &Ingredient, timeout: Duration) -> Ingredient {
        match tokio::time::timeout(timeout, self.enhance(ingredient)).await {
            Ok(enhanced) => enhanced,
            Err(_) => {
                warn!(
                    ingredient = %ingredient.name,
                    timeout_ms = timeout.as_millis() as u64,
                    "Enhancement timed out, keeping original values"
                );
                ingredient.clone()
            }
        }
    }

    /// First candidate meeting the score threshold; candidates arrive ranked
    pub fn select_candidate<'a>(&self, candidates: &'a [FoodCandidate]) -> Option<&'a FoodCandidate> {
        candidates.iter().find(|c| c.score >= self.min_score)
    }

    async fn try_enhance(&self, ingredient: &Ingredient) -> Option<Ingredient> {
        debug!(ingredient = %ingredient.name, "Starting enhancement");

        let candidates = match self.database.search_foods(&ingredient.name).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(ingredient = %ingredient.name, error = %e, "Food search failed");
                return None;
            }
        };
        if candidates.is_empty() {
            debug!(ingredient = %ingredient.name, "No search results");
            return None;
        }

        let Some(candidate) = self.select_candidate(&candidates) else {
            info!(
                ingredient = %ingredient.name,
                best_score = candidates[0].score,
                min_score = self.min_score,
                "No candidate met the minimum score threshold"
            );
            return None;
        };
        info!(
            ingredient = %ingredient.name,
            matched = %candidate.description,
            score = candidate.score,
            "Matched USDA food"
        );

        let detail = match self.database.food_details(candidate.fdc_id).await {
            Ok(detail) => Some(detail),
            Err(e) => {
                warn!(
                    ingredient = %ingredient.name,
                    fdc_id = candidate.fdc_id,
                    error = %e,
                    "Food detail lookup failed, nutrients default to zero"
                );
                None
            }
        };

        let facts = extract_nutrients(detail.as_ref());
        let multiplier = portion_multiplier(&ingredient.assumed_portion);
        if !multiplier.is_finite() {
            error!(
                ingredient = %ingredient.name,
                portion = %ingredient.assumed_portion,
                "Portion multiplier is not finite, keeping original values"
            );
            return None;
        }
        debug!(ingredient = %ingredient.name, multiplier, "Portion multiplier computed");

        let enhanced = apply_nutrients(ingredient, candidate, &facts, multiplier);
        debug!(
            ingredient = %enhanced.name,
            calories = ?enhanced.calories,
            "Enhancement finished"
        );
        Some(enhanced)
    }
}

/// Copy `ingredient` with nutrients scaled by `multiplier` and match metadata
pub fn apply_nutrients(
    ingredient: &Ingredient,
    candidate: &FoodCandidate,
    facts: &NutrientFacts,
    multiplier: f64,
) -> Ingredient {
    let calories = (facts.calories * multiplier).round().max(0.0) as u32;

    Ingredient {
        calories: Some(calories),
        macros: Some(Macros::from_grams(
            facts.macros.protein * multiplier,
            facts.macros.carbs * multiplier,
            facts.macros.fat * multiplier,
        )),
        source: Some(USDA_SOURCE.to_string()),
        usda_food_id: Some(candidate.fdc_id),
        matched_description: Some(candidate.description.clone()),
        ..ingredient.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food_model::MacroAmounts;

    #[test]
    fn test_apply_nutrients_scales_and_formats() {
        let ingredient = Ingredient::new("chicken breast", "4 oz");
        let candidate = FoodCandidate::new("Chicken, breast, raw", 1);
        let facts = NutrientFacts {
            calories: 165.0,
            macros: MacroAmounts { protein: 31.0, carbs: 0.0, fat: 3.6 },
        };

        let enhanced = apply_nutrients(&ingredient, &candidate, &facts, 1.134);

        assert_eq!(enhanced.name, "chicken breast");
        assert_eq!(enhanced.assumed_portion, "4 oz");
        assert_eq!(enhanced.calories, Some(187));
        let macros = enhanced.macros.unwrap();
        assert_eq!(macros.protein, "35.2");
        assert_eq!(macros.carbs, "0.0");
        assert_eq!(macros.fat, "4.1");
        assert_eq!(enhanced.source.as_deref(), Some("USDA"));
        assert_eq!(enhanced.usda_food_id, Some(1));
        assert_eq!(enhanced.matched_description.as_deref(), Some("Chicken, breast, raw"));
    }

    #[test]
    fn test_apply_nutrients_overwrites_upstream_estimates() {
        let mut ingredient = Ingredient::new("rice", "1 cup");
        ingredient.calories = Some(999);
        ingredient.extra.insert("note".to_string(), serde_json::json!("from llm"));

        let enhanced = apply_nutrients(
            &ingredient,
            &FoodCandidate::new("Rice, white, cooked", 2),
            &NutrientFacts::default(),
            2.4,
        );

        assert_eq!(enhanced.calories, Some(0));
        assert_eq!(enhanced.macros.unwrap().protein, "0.0");
        assert_eq!(enhanced.extra.get("note"), Some(&serde_json::json!("from llm")));
    }
}
