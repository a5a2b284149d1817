//! Lookup failures reported by CLI commands.
//!
//! The list store treats unknown ids as silent no-ops; the CLI checks first
//! so the user gets a clear message instead of nothing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Item {item} not found in list {list}")]
    ItemNotFound { list: String, item: String },

    #[error("Product not found in catalog: {0}")]
    ProductNotFound(String),

    #[error("No public list with share code {0}")]
    ShareCodeNotFound(String),
}
