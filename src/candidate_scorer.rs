//! # Candidate Scorer
//!
//! Ranks FoodData Central search hits against a free-text ingredient name.
//!
//! ## Features
//!
//! - Query normalization: lower-casing, connector word and punctuation removal
//! - Additive scoring favouring short, unbranded, raw/basic descriptions
//! - Stable descending ranking (equal scores keep their input order)
//!
//! Scoring is a pure function of the query and the candidate text.

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

use crate::food_model::FoodCandidate;

/// Brevity bonus numerator: `BREVITY_WEIGHT / description length`
pub const BREVITY_WEIGHT: f64 = 10_000.0;
pub const UNBRANDED_BONUS: f64 = 30.0;
pub const EXACT_MATCH_BONUS: f64 = 100.0;
/// Bonus when every search term appears in the description
pub const TERM_COVERAGE_BONUS: f64 = 50.0;
pub const COMMA_PENALTY: f64 = 10.0;
pub const PREPARATION_PENALTY: f64 = 20.0;
pub const RAWNESS_BONUS: f64 = 15.0;

/// Words suggesting a composite or prepared food
pub const PREPARATION_TERMS: [&str; 6] =
    ["prepared", "processed", "recipe", "dish", "product", "restaurant"];
/// Words suggesting a basic ingredient
pub const RAWNESS_TERMS: [&str; 5] = ["raw", "fresh", "plain", "simple", "basic"];

const CONNECTOR_WORDS: [&str; 2] = ["with", "and"];

lazy_static! {
    static ref PUNCTUATION_REGEX: Regex =
        Regex::new(r"[^\p{L}\p{N}\s]+").expect("Punctuation pattern should be valid");
}

/// A normalized search query
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTerms {
    /// Normalized phrase, compared against descriptions for exact matches
    pub phrase: String,
    /// Individual terms longer than one character
    pub terms: Vec<String>,
}

impl SearchTerms {
    /// Normalize a free-text ingredient name
    ///
    /// # Examples
    ///
    /// ```rust
    /// use meal_nutrition::candidate_scorer::SearchTerms;
    ///
    /// let terms = SearchTerms::from_query("Rice with Beans, and Salsa!");
    /// assert_eq!(terms.phrase, "rice beans salsa");
    /// assert_eq!(terms.terms, vec!["rice", "beans", "salsa"]);
    /// assert_eq!(terms.api_query(), "rice AND beans AND salsa");
    /// ```
    pub fn from_query(query: &str) -> Self {
        let phrase = normalize_phrase(query);
        let terms = phrase
            .split(' ')
            .filter(|word| word.chars().count() > 1)
            .map(|word| word.to_string())
            .collect();

        trace!("Normalized query '{}' -> '{}'", query, phrase);
        Self { phrase, terms }
    }

    /// Query string sent to the search API
    ///
    /// Terms are AND-joined; when no term survives normalization the phrase is
    /// used as is.
    pub fn api_query(&self) -> String {
        if self.terms.is_empty() {
            self.phrase.clone()
        } else {
            self.terms.join(" AND ")
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phrase.is_empty()
    }
}

/// Lower-case, punctuation to spaces, connector words removed, single-spaced
fn normalize_phrase(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_punctuation = PUNCTUATION_REGEX.replace_all(&lowered, " ");

    without_punctuation
        .split_whitespace()
        .filter(|word| !CONNECTOR_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Score one description against the query
pub fn score_description(terms: &SearchTerms, description: &str, branded: bool) -> f64 {
    let description = description.to_lowercase();
    let length = description.chars().count();
    let mut score = 0.0;

    if length > 0 {
        score += BREVITY_WEIGHT / length as f64;
    }

    if !branded {
        score += UNBRANDED_BONUS;
    }

    // Both sides normalized alike, so "Low-fat milk" matches "low-fat milk"
    if !terms.phrase.is_empty() && normalize_phrase(&description) == terms.phrase {
        score += EXACT_MATCH_BONUS;
    }

    if !terms.terms.is_empty() {
        let matched = terms
            .terms
            .iter()
            .filter(|term| description.contains(term.as_str()))
            .count();
        score += matched as f64 / terms.terms.len() as f64 * TERM_COVERAGE_BONUS;
    }

    let commas = description.matches(',').count();
    score -= commas as f64 * COMMA_PENALTY;

    for term in PREPARATION_TERMS {
        if description.contains(term) {
            score -= PREPARATION_PENALTY;
        }
    }

    for term in RAWNESS_TERMS {
        if description.contains(term) {
            score += RAWNESS_BONUS;
        }
    }

    score
}

/// Score a candidate, taking its brand owner into account
pub fn score_candidate(terms: &SearchTerms, candidate: &FoodCandidate) -> f64 {
    score_description(terms, &candidate.description, candidate.is_branded())
}

/// Annotate candidates with scores and sort them best first
///
/// The sort is stable, so candidates with equal scores keep their input order.
pub fn rank_candidates(terms: &SearchTerms, candidates: Vec<FoodCandidate>) -> Vec<FoodCandidate> {
    let mut scored: Vec<FoodCandidate> = candidates
        .into_iter()
        .map(|mut candidate| {
            candidate.score = score_candidate(terms, &candidate);
            trace!("Score for '{}': {}", candidate.description, candidate.score);
            candidate
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    for candidate in scored.iter().take(3) {
        debug!(
            "Top match for '{}': '{}' (score {:.1})",
            terms.phrase, candidate.description, candidate.score
        );
    }

    scored
}
