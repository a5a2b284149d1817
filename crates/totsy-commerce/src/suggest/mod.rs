//! Suggestion module.
//!
//! Ranks the catalog against a parent's preferences, location and due date.

mod query;
mod ranker;
mod results;

pub use query::{split_terms, SuggestionQuery};
pub use ranker::{rank, round_score, Ranker, RankingWeights, DEFAULT_LOCATION_KEYWORDS};
pub use results::{Suggestions, DEFAULT_TOP_N};
