//! Domain types and logic for TotsyList.
//!
//! This crate holds the single-user core behind the TotsyList tools:
//!
//! - **Catalog**: The fixed baby-gear product records
//! - **Suggest**: Relevance ranking of the catalog for a parent's query
//! - **Lists**: User lists with items, votes, comments and share codes
//! - **Share**: Picks with purchase status and link-encoded share payloads
//! - **Generation**: Prompting and defensive parsing of AI-generated lists
//!
//! # Example
//!
//! ```rust,ignore
//! use totsy_commerce::prelude::*;
//! use totsy_cache::Cache;
//!
//! // Rank the catalog
//! let query = SuggestionQuery::new()
//!     .with_location("Seattle, WA")
//!     .with_terms_raw("compact, travel");
//! let suggestions = Ranker::new().suggest(&Catalog::builtin(), &query);
//!
//! // Save the best match into a list
//! let store = ListStore::open(Cache::open_dir("/tmp/totsylist")?);
//! let list = store.create_list(NewList::new("Shower"));
//! let item = store.add_item(&list, NewItem::from(&suggestions.top(1)[0]));
//!
//! // Vote on it
//! if let Some(item) = item {
//!     store.vote(&list, &item, Vote::Up);
//! }
//! ```

pub mod clock;
pub mod error;
pub mod ids;

pub mod catalog;
pub mod generation;
pub mod lists;
pub mod share;
pub mod suggest;

pub use error::{CommerceError, GenerationError};
pub use ids::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::error::{CommerceError, GenerationError};
    pub use crate::ids::*;

    // Catalog
    pub use crate::catalog::{Catalog, Product};

    // Suggestions
    pub use crate::suggest::{
        rank, split_terms, Ranker, RankingWeights, SuggestionQuery, Suggestions, DEFAULT_TOP_N,
    };

    // Lists
    pub use crate::lists::{
        Comment, ListStore, ListUpdate, NewItem, NewList, SavedListItem, SnapshotStore,
        Subscription, UserList, Vote, Votes,
    };

    // Share
    pub use crate::share::{Pick, PickBoard, PickStatus, ShareMode, SharePayload};

    // Generation
    pub use crate::generation::{
        Explanation, ExplanationRequest, GeneratedList, GenerationOutcome, GenerationService,
        Generator,
    };
}
