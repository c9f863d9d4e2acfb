//! # Meal Nutrition
//!
//! Reconciles free-text meal ingredients with USDA FoodData Central records:
//! candidate search and scoring, nutrient extraction, and portion scaling,
//! plus a daily meal log that sums the enriched values.

pub mod candidate_scorer;
pub mod circuit_breaker;
pub mod food_model;
pub mod meal_log;
pub mod nutrient_extractor;
pub mod portion_parser;
pub mod portion_scaler;
pub mod reconciliation;
pub mod unit_conversions;
pub mod usda_client;
pub mod usda_config;
pub mod usda_errors;
