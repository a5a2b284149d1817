//! AI-generated shopping lists and recommendation explanations.
//!
//! The network call itself lives behind [`GenerationService`]; this module
//! builds the prompts, parses whatever comes back defensively, and turns
//! every failure into fallback content.

mod prompt;
mod response;
mod service;

pub use prompt::{build_explanation_prompt, build_list_prompt, MAX_ITEMS_PER_CATEGORY};
pub use response::{
    parse_generated_list, strip_code_fence, BudgetTier, CategoryBlock, GeneratedList,
    ListSummary, Priority, ProductItem,
};
pub use service::{
    Explanation, ExplanationRequest, GenerationOutcome, GenerationService, Generator,
    FALLBACK_EXPLANATION,
};
