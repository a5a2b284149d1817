//! Key-value persistence for TotsyList.
//!
//! Provides a small, synchronous API for keeping serialized snapshots in a
//! local store. Values are raw bytes; callers choose the encoding. Two
//! backends exist: an in-memory map (tests, ephemeral sessions) and a
//! directory of files (the CLI's client-local storage).
//!
//! # Example
//!
//! ```rust,ignore
//! use totsy_cache::Cache;
//!
//! let cache = Cache::open_dir("~/.local/share/totsylist")?;
//!
//! // Store a snapshot
//! cache.set_raw("totsylist-user-lists", &serde_json::to_vec(&lists)?)?;
//!
//! // Read it back
//! let bytes: Option<Vec<u8>> = cache.get_raw("totsylist-user-lists")?;
//! ```

mod error;
mod kv;

pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError};
}
