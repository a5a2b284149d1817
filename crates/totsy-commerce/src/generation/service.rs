//! Generation service seam and the generator that wraps it.

use crate::error::GenerationError;
use crate::generation::prompt::{build_explanation_prompt, build_list_prompt};
use crate::generation::response::{parse_generated_list, CategoryBlock, GeneratedList, ProductItem};
use serde::{Deserialize, Serialize};
use totsy_observability::StructuredLogger;

/// Sentence shown when an explanation cannot be produced.
pub const FALLBACK_EXPLANATION: &str = "I recommended this product based on your specific needs and preferences. It offers good quality and value for your situation.";

/// A text-completion backend.
///
/// Implementations perform any I/O; the core only builds prompts and
/// interprets the text that comes back.
pub trait GenerationService {
    fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

impl<S: GenerationService + ?Sized> GenerationService for &S {
    fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).complete(prompt)
    }
}

impl<S: GenerationService + ?Sized> GenerationService for Box<S> {
    fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).complete(prompt)
    }
}

/// Input to the explanation collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationRequest {
    pub product_name: String,
    pub brand: String,
    pub category: String,
    pub user_input: String,
    pub why: String,
}

impl ExplanationRequest {
    /// Describe a generated item for the request it answered.
    pub fn for_item(item: &ProductItem, block: &CategoryBlock, user_input: &str) -> Self {
        Self {
            product_name: item.name.clone(),
            brand: item.brand.clone().unwrap_or_default(),
            category: block.category.clone(),
            user_input: user_input.to_string(),
            why: item.why.clone(),
        }
    }
}

/// Why a product was recommended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub explanation: String,
    /// Set when the text is the generic fallback.
    #[serde(skip)]
    pub is_fallback: bool,
}

impl Explanation {
    pub fn fallback() -> Self {
        Self {
            explanation: FALLBACK_EXPLANATION.to_string(),
            is_fallback: true,
        }
    }
}

/// Result of asking for a generated list.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Generated(GeneratedList),
    /// The service failed; `fallback` is an empty list whose disclaimer
    /// describes the failure.
    Failed {
        error: GenerationError,
        fallback: GeneratedList,
    },
}

impl GenerationOutcome {
    /// The list to present, generated or fallback.
    pub fn list(&self) -> &GeneratedList {
        match self {
            GenerationOutcome::Generated(list) => list,
            GenerationOutcome::Failed { fallback, .. } => fallback,
        }
    }

    pub fn into_list(self) -> GeneratedList {
        match self {
            GenerationOutcome::Generated(list) => list,
            GenerationOutcome::Failed { fallback, .. } => fallback,
        }
    }

    pub fn error(&self) -> Option<&GenerationError> {
        match self {
            GenerationOutcome::Generated(_) => None,
            GenerationOutcome::Failed { error, .. } => Some(error),
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, GenerationOutcome::Generated(_))
    }
}

/// Builds prompts, calls the service once, and interprets the answer.
pub struct Generator<S> {
    service: S,
    logger: StructuredLogger,
}

impl<S: GenerationService> Generator<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            logger: StructuredLogger::disabled(),
        }
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger.for_component("generation");
        self
    }

    /// Generate a categorized list for a free-text request.
    ///
    /// Never fails: service and parse errors produce
    /// [`GenerationOutcome::Failed`] carrying a fallback list.
    pub fn generate_list(&self, user_input: &str) -> GenerationOutcome {
        let prompt = build_list_prompt(user_input);
        let result = self
            .service
            .complete(&prompt)
            .and_then(|text| parse_generated_list(&text));

        match result {
            Ok(list) => {
                self.logger
                    .info_builder("list generated")
                    .field_i64("categories", list.categories.len() as i64)
                    .field_i64("items", list.item_count() as i64)
                    .emit();
                GenerationOutcome::Generated(list)
            }
            Err(error) => {
                self.logger
                    .error_builder("list generation failed")
                    .field("error", error.to_string())
                    .field_bool("credential_problem", error.is_credential_problem())
                    .emit();
                let fallback = GeneratedList::fallback(&error);
                GenerationOutcome::Failed { error, fallback }
            }
        }
    }

    /// Explain a recommendation, substituting the fallback sentence on any
    /// failure or empty answer.
    pub fn explain(&self, request: &ExplanationRequest) -> Explanation {
        let prompt = build_explanation_prompt(request);
        match self.service.complete(&prompt) {
            Ok(text) if !text.trim().is_empty() => Explanation {
                explanation: text.trim().to_string(),
                is_fallback: false,
            },
            Ok(_) => {
                self.logger
                    .warn_builder("empty explanation, using fallback")
                    .field("product", request.product_name.as_str())
                    .emit();
                Explanation::fallback()
            }
            Err(error) => {
                self.logger
                    .warn_builder("explanation failed, using fallback")
                    .field("product", request.product_name.as_str())
                    .field("error", error.to_string())
                    .emit();
                Explanation::fallback()
            }
        }
    }
}
