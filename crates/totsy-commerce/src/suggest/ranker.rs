//! Relevance scoring for catalog suggestions.

use crate::catalog::{Catalog, Product};
use crate::suggest::{SuggestionQuery, Suggestions};
use serde::{Deserialize, Serialize};

/// Place keywords that earn the location bonus by default.
pub const DEFAULT_LOCATION_KEYWORDS: &[&str] = &["seattle"];

/// Fixed bonuses added to a product's base score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    /// Per term found in the product name.
    pub name: f64,
    /// Per term found in the brand.
    pub brand: f64,
    /// Per term found in the category.
    pub category: f64,
    /// Once, when the location mentions a recognized place.
    pub location: f64,
    /// Once, when any due date is given.
    pub due_date: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            name: 0.05,
            brand: 0.03,
            category: 0.02,
            location: 0.01,
            due_date: 0.005,
        }
    }
}

/// Scores and orders a catalog for a query.
///
/// Ranking is pure: the catalog is never mutated and every product is
/// returned, so callers slice their own top-N view.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranker {
    weights: RankingWeights,
    location_keywords: Vec<String>,
}

impl Default for Ranker {
    fn default() -> Self {
        Self {
            weights: RankingWeights::default(),
            location_keywords: DEFAULT_LOCATION_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl Ranker {
    /// Create a ranker with default weights and keywords.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the bonus weights.
    pub fn with_weights(mut self, weights: RankingWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replace the recognized place keywords. Blank keywords are ignored.
    pub fn with_location_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.location_keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }

    /// The active weights.
    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    /// Return every catalog product with its query score, highest first.
    ///
    /// Products with equal scores keep their catalog order.
    pub fn rank(&self, catalog: &Catalog, query: &SuggestionQuery) -> Vec<Product> {
        let terms = query.normalized_terms();
        let context_bonus = self.context_bonus(query);

        let mut ranked: Vec<Product> = catalog
            .iter()
            .map(|product| {
                let mut scored = product.clone();
                scored.score = round_score(self.term_score(product, &terms) + context_bonus);
                scored
            })
            .collect();

        // Vec::sort_by is stable, which is what keeps ties in catalog order.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// Rank and wrap the result for top-N presentation.
    pub fn suggest(&self, catalog: &Catalog, query: &SuggestionQuery) -> Suggestions {
        Suggestions::new(self.rank(catalog, query))
    }

    /// Base score plus every term bonus. `terms` must already be lowercased.
    fn term_score(&self, product: &Product, terms: &[String]) -> f64 {
        let name = product.name.to_lowercase();
        let brand = product.brand.to_lowercase();
        let category = product.category.to_lowercase();

        terms.iter().fold(product.score, |score, term| {
            let mut score = score;
            if name.contains(term.as_str()) {
                score += self.weights.name;
            }
            if brand.contains(term.as_str()) {
                score += self.weights.brand;
            }
            if category.contains(term.as_str()) {
                score += self.weights.category;
            }
            score
        })
    }

    /// Bonuses that depend only on the query, identical for every product.
    fn context_bonus(&self, query: &SuggestionQuery) -> f64 {
        let mut bonus = 0.0;
        let location = query.location.to_lowercase();
        if self
            .location_keywords
            .iter()
            .any(|keyword| location.contains(keyword.as_str()))
        {
            bonus += self.weights.location;
        }
        if query.has_due_date() {
            bonus += self.weights.due_date;
        }
        bonus
    }
}

/// Rank with the default weights and keywords.
pub fn rank(catalog: &Catalog, query: &SuggestionQuery) -> Vec<Product> {
    Ranker::default().rank(catalog, query)
}

/// Round to 3 decimal places, halves away from zero.
///
/// Scores that round to zero come back as `0.0`, never `-0.0`, so they tie
/// with other zero scores under `total_cmp`.
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0 + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;

    const EPSILON: f64 = 1e-9;

    fn two_product_catalog() -> Catalog {
        Catalog::new(vec![
            Product::new("a", "Alpha", "Acme", "Misc", 10.0, 0.5),
            Product::new("b", "Beta", "Acme", "Misc", 10.0, 0.9),
        ])
        .unwrap()
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    fn score_of(products: &[Product], id: &str) -> f64 {
        products
            .iter()
            .find(|p| p.id == ProductId::new(id))
            .map(|p| p.score)
            .unwrap()
    }

    #[test]
    fn test_empty_query_sorts_by_base_score() {
        let ranked = rank(&two_product_catalog(), &SuggestionQuery::new());
        assert_eq!(ids(&ranked), vec!["b", "a"]);
        assert_eq!(score_of(&ranked, "a"), 0.5);
        assert_eq!(score_of(&ranked, "b"), 0.9);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = Catalog::new(vec![
            Product::new("first", "One", "X", "Y", 1.0, 0.7),
            Product::new("top", "Two", "X", "Y", 1.0, 0.8),
            Product::new("second", "Three", "X", "Y", 1.0, 0.7),
            Product::new("third", "Four", "X", "Y", 1.0, 0.7),
        ])
        .unwrap();

        let ranked = rank(&catalog, &SuggestionQuery::new());
        assert_eq!(ids(&ranked), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_scores_rounding_to_zero_tie_in_catalog_order() {
        let catalog = Catalog::new(vec![
            Product::new("a", "Alpha", "Acme", "Misc", 10.0, -0.0004),
            Product::new("b", "Beta", "Acme", "Misc", 10.0, 0.0),
        ])
        .unwrap();

        let ranked = rank(&catalog, &SuggestionQuery::new());
        assert_eq!(ids(&ranked), vec!["a", "b"]);
        assert_eq!(ranked[0].score, ranked[1].score);
        assert!(ranked[0].score.is_sign_positive());
        assert!(round_score(-0.0004).is_sign_positive());
    }

    #[test]
    fn test_nanit_term_boosts_name_and_brand() {
        let catalog = Catalog::builtin();
        let baseline = rank(&catalog, &SuggestionQuery::new());
        let boosted = rank(&catalog, &SuggestionQuery::new().with_term("nanit"));

        let lift = score_of(&boosted, "monitor-nanit") - score_of(&baseline, "monitor-nanit");
        assert!(lift >= 0.08 - EPSILON, "lift was {}", lift);
        assert_eq!(boosted[0].id.as_str(), "monitor-nanit");
    }

    #[test]
    fn test_bonuses_are_additive_across_fields() {
        let catalog = Catalog::new(vec![Product::new(
            "sleep", "Sleep Sack", "Sleepy", "Sleep", 30.0, 0.5,
        )])
        .unwrap();

        let ranked = rank(&catalog, &SuggestionQuery::new().with_term("SLEEP"));
        assert!((ranked[0].score - 0.6).abs() < EPSILON);
    }

    #[test]
    fn test_term_matching_full_name() {
        for product in Catalog::builtin().iter() {
            let query = SuggestionQuery::new().with_term(product.name.to_uppercase());
            let ranked = rank(&Catalog::builtin(), &query);
            assert!(score_of(&ranked, product.id.as_str()) >= product.score + 0.05 - EPSILON);
        }
    }

    #[test]
    fn test_location_and_due_date_bonus() {
        let query = SuggestionQuery::new()
            .with_location("Downtown SEATTLE, WA")
            .with_due_date("2025-03-01");
        let ranked = rank(&two_product_catalog(), &query);
        assert!((score_of(&ranked, "a") - 0.515).abs() < EPSILON);

        let elsewhere = SuggestionQuery::new().with_location("Portland, OR");
        let ranked = rank(&two_product_catalog(), &elsewhere);
        assert_eq!(score_of(&ranked, "a"), 0.5);
    }

    #[test]
    fn test_custom_keywords_and_weights() {
        let ranker = Ranker::new()
            .with_location_keywords(["Portland", "  "])
            .with_weights(RankingWeights {
                location: 0.1,
                ..RankingWeights::default()
            });

        let query = SuggestionQuery::new().with_location("portland, or");
        let ranked = ranker.rank(&two_product_catalog(), &query);
        assert!((score_of(&ranked, "a") - 0.6).abs() < EPSILON);
    }

    #[test]
    fn test_whitespace_terms_ignored() {
        let catalog = two_product_catalog();
        let ranked = rank(&catalog, &SuggestionQuery::new().with_term("   "));
        assert_eq!(ranked, rank(&catalog, &SuggestionQuery::new()));
    }

    #[test]
    fn test_duplicate_terms_counted_once() {
        let catalog = two_product_catalog();
        let once = rank(&catalog, &SuggestionQuery::new().with_term("alpha"));
        let twice = rank(
            &catalog,
            &SuggestionQuery::new().with_term("alpha").with_term("ALPHA"),
        );
        assert_eq!(once, twice);
    }

    #[test]
    fn test_catalog_not_mutated() {
        let catalog = Catalog::builtin();
        let before = catalog.clone();
        let _ = rank(&catalog, &SuggestionQuery::new().with_term("stroller"));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.12345), 0.123);
        assert_eq!(round_score(0.0625), 0.063);
        assert_eq!(round_score(-0.0625), -0.063);
    }
}
