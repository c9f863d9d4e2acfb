use meal_nutrition::candidate_scorer::{rank_candidates, score_candidate, SearchTerms};
use meal_nutrition::food_model::FoodCandidate;

fn candidates() -> Vec<FoodCandidate> {
    vec![
        FoodCandidate::new("Chicken breast sandwich, restaurant prepared", 10),
        FoodCandidate::new("Chicken, breast, meat only, cooked, roasted", 11),
        FoodCandidate::new("Chicken, broiler or fryers, breast, skinless, boneless, meat only, raw", 12),
        FoodCandidate::new("Chicken breast tenders, breaded", 13).with_brand_owner("Tyson Foods, Inc."),
        FoodCandidate::new("Chicken breast", 14),
    ]
}

#[test]
fn test_scoring_is_deterministic() {
    let terms = SearchTerms::from_query("chicken breast");
    let first = rank_candidates(&terms, candidates());
    let second = rank_candidates(&terms, candidates());
    assert_eq!(first, second);
}

#[test]
fn test_exact_match_ranks_first() {
    let terms = SearchTerms::from_query("Chicken Breast");
    let ranked = rank_candidates(&terms, candidates());
    assert_eq!(ranked[0].fdc_id, 14);
    assert!(ranked.windows(2).all(|pair| pair[0].score >= pair[1].score));
}

#[test]
fn test_exact_match_beats_equal_length_non_match() {
    let terms = SearchTerms::from_query("kale");
    let exact = FoodCandidate::new("Kale", 1);
    let other = FoodCandidate::new("Leek", 2);
    assert!(score_candidate(&terms, &exact) > score_candidate(&terms, &other));

    let ranked = rank_candidates(&terms, vec![other, exact]);
    assert_eq!(ranked[0].fdc_id, 1);
}

#[test]
fn test_branded_and_prepared_items_rank_lower() {
    let terms = SearchTerms::from_query("chicken breast");
    let ranked = rank_candidates(&terms, candidates());
    let position = |id: u64| ranked.iter().position(|c| c.fdc_id == id).unwrap();

    // Same term coverage, but restaurant/prepared penalties apply
    assert!(position(11) < position(10));
    assert!(ranked[position(13)].score < ranked[position(14)].score);
}

#[test]
fn test_ties_keep_input_order() {
    let terms = SearchTerms::from_query("tofu");
    let ranked = rank_candidates(
        &terms,
        vec![
            FoodCandidate::new("Tofu, firm", 5),
            FoodCandidate::new("Tofu, soft", 3),
            FoodCandidate::new("Tofu, silk", 4),
        ],
    );
    assert_eq!(ranked.iter().map(|c| c.fdc_id).collect::<Vec<_>>(), vec![5, 3, 4]);
}

#[test]
fn test_partial_term_coverage() {
    let terms = SearchTerms::from_query("brown rice");
    let both = FoodCandidate::new("Rice, brown, xxxx", 1);
    let one = FoodCandidate::new("Rice, white, xxxx", 2);
    let difference = score_candidate(&terms, &both) - score_candidate(&terms, &one);
    assert!((difference - 25.0).abs() < 1e-9);
}
