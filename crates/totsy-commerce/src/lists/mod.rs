//! User lists: creation, items, votes, comments and sharing.
//!
//! [`ListStore`] is the single owner of the list collection. It persists a
//! full snapshot through a [`SnapshotStore`] after every mutation and
//! notifies subscribers synchronously.

mod model;
mod persistence;
mod store;
mod subscribers;

pub use model::{
    Comment, ListUpdate, NewItem, NewList, SavedListItem, UserList, Vote, Votes,
    DEFAULT_COMMENT_AUTHOR, DEFAULT_LIST_AUTHOR,
};
pub use persistence::{SnapshotStore, DEFAULT_STORAGE_KEY};
pub use store::{ListStore, ListStoreBuilder};
pub use subscribers::Subscription;
