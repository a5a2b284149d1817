//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in TotsyList domain operations.
///
/// The list store itself never returns these to callers (unknown ids are
/// no-ops); they travel through the persistence port, the catalog loader and
/// share-link encoding.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Catalog contains the same product id twice.
    #[error("Duplicate product id in catalog: {0}")]
    DuplicateProduct(String),

    /// Product record fails validation.
    #[error("Invalid product {id}: {reason}")]
    InvalidProduct { id: String, reason: String },

    /// Persistence backend error.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<totsy_cache::CacheError> for CommerceError {
    fn from(e: totsy_cache::CacheError) -> Self {
        CommerceError::StorageError(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

/// Errors from the list-generation and explanation collaborators.
///
/// These never reach the presentation layer as failures: the generator
/// turns them into a fallback list or a fallback explanation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// The service could not be reached or returned an error.
    #[error("transport failure: {0}")]
    Transport(String),

    /// No API key or similar credential is configured.
    #[error("missing API credential: {0}")]
    MissingCredential(String),

    /// The service answered with nothing usable.
    #[error("empty response from generation service")]
    EmptyResponse,

    /// The response was not the expected JSON document.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl GenerationError {
    /// Whether the failure points at credentials rather than the service.
    pub fn is_credential_problem(&self) -> bool {
        match self {
            GenerationError::MissingCredential(_) => true,
            GenerationError::Transport(msg) => msg.to_ascii_lowercase().contains("api key"),
            _ => false,
        }
    }
}
