//! The collaborative list store.
//!
//! One store instance owns the whole list collection for a process. Every
//! successful mutation touches the owning list's `updated_at`, writes the
//! full collection to the snapshot store, and then notifies subscribers in
//! subscription order. Operations that name an unknown list, item or
//! comment target change nothing, persist nothing and notify no one.

use crate::clock::{Clock, SystemClock};
use crate::ids::{CommentId, IdGenerator, ItemId, ListId, MonotonicIds};
use crate::lists::model::{
    Comment, ListUpdate, NewItem, NewList, SavedListItem, UserList, Vote, DEFAULT_COMMENT_AUTHOR,
};
use crate::lists::persistence::{SnapshotStore, DEFAULT_STORAGE_KEY};
use crate::lists::subscribers::{Registry, Subscription};
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;
use totsy_observability::StructuredLogger;

/// In-process list store with snapshot persistence and change broadcast.
///
/// Methods take `&self`; subscribers may read the store (or subscribe and
/// unsubscribe) from inside a notification.
pub struct ListStore {
    lists: RefCell<Vec<UserList>>,
    persistence: Box<dyn SnapshotStore>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    logger: StructuredLogger,
    storage_key: String,
    subscribers: Rc<Registry>,
}

/// Configures and opens a [`ListStore`].
pub struct ListStoreBuilder {
    persistence: Box<dyn SnapshotStore>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    logger: StructuredLogger,
    storage_key: String,
}

impl ListStoreBuilder {
    /// Use a different identifier source.
    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Use a different time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Store the snapshot under a different key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Load any existing snapshot and return the ready store.
    ///
    /// A missing, unreadable or corrupt snapshot yields an empty store.
    pub fn open(self) -> ListStore {
        let logger = self.logger.for_component("lists");
        let lists = load_snapshot(self.persistence.as_ref(), &self.storage_key, &logger);

        for list in &lists {
            self.ids.observe(list.id.as_str());
            for item in &list.items {
                self.ids.observe(item.id.as_str());
                for comment in &item.comments {
                    self.ids.observe(comment.id.as_str());
                }
            }
        }

        logger
            .debug_builder("list store opened")
            .field("storage_key", self.storage_key.as_str())
            .field_i64("lists", lists.len() as i64)
            .emit();

        ListStore {
            lists: RefCell::new(lists),
            persistence: self.persistence,
            ids: self.ids,
            clock: self.clock,
            logger,
            storage_key: self.storage_key,
            subscribers: Rc::new(Registry::default()),
        }
    }
}

fn load_snapshot(
    persistence: &dyn SnapshotStore,
    key: &str,
    logger: &StructuredLogger,
) -> Vec<UserList> {
    let bytes = match persistence.load(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Vec::new(),
        Err(e) => {
            logger
                .warn_builder("list snapshot unreadable, starting empty")
                .field("error", e.to_string())
                .emit();
            return Vec::new();
        }
    };

    match serde_json::from_slice::<Vec<UserList>>(&bytes) {
        Ok(lists) => lists,
        Err(e) => {
            logger
                .warn_builder("discarding corrupt list snapshot")
                .field("storage_key", key)
                .field("error", e.to_string())
                .emit();
            Vec::new()
        }
    }
}

impl ListStore {
    /// Start configuring a store over `persistence` with monotonic ids,
    /// the system clock, a disabled logger and the default storage key.
    pub fn builder(persistence: impl SnapshotStore + 'static) -> ListStoreBuilder {
        ListStoreBuilder {
            persistence: Box::new(persistence),
            ids: Box::new(MonotonicIds::new()),
            clock: Box::new(SystemClock),
            logger: StructuredLogger::disabled(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    /// Open a store with default settings.
    pub fn open(persistence: impl SnapshotStore + 'static) -> Self {
        Self::builder(persistence).open()
    }

    // === Reads ===

    /// Snapshot of every list, in creation order.
    pub fn lists(&self) -> Vec<UserList> {
        self.lists.borrow().clone()
    }

    /// Snapshot of one list.
    pub fn list(&self, id: &ListId) -> Option<UserList> {
        self.lists.borrow().iter().find(|l| &l.id == id).cloned()
    }

    /// Find a public list by its share code.
    pub fn find_by_share_code(&self, code: &str) -> Option<UserList> {
        self.lists
            .borrow()
            .iter()
            .find(|l| l.share_code() == Some(code))
            .cloned()
    }

    /// Read-view path (`/shared/{code}`) of a public list.
    pub fn share_path(&self, id: &ListId) -> Option<String> {
        self.lists
            .borrow()
            .iter()
            .find(|l| &l.id == id)
            .and_then(UserList::share_path)
    }

    /// Number of lists.
    pub fn len(&self) -> usize {
        self.lists.borrow().len()
    }

    /// Check if there are no lists.
    pub fn is_empty(&self) -> bool {
        self.lists.borrow().is_empty()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    // === Mutations ===

    /// Create a list. A public list gets its share code immediately.
    pub fn create_list(&self, new: NewList) -> ListId {
        let now = self.clock.now();
        let id = ListId::new(self.ids.next_id());
        let share_code = new.is_public.then(|| self.ids.share_code());

        self.lists.borrow_mut().push(UserList {
            id: id.clone(),
            name: new.name,
            description: new.description,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
            is_public: new.is_public,
            share_code,
            author: new.author,
        });
        self.commit("create_list");
        id
    }

    /// Apply a partial update to a list's own fields.
    ///
    /// Making a list public for the first time assigns its share code; an
    /// existing code is kept through any later visibility changes.
    pub fn update_list(&self, id: &ListId, update: ListUpdate) -> bool {
        self.mutate("update_list", |lists, now| {
            let list = lists.iter_mut().find(|l| &l.id == id)?;
            if let Some(name) = update.name {
                list.name = name;
            }
            if let Some(description) = update.description {
                list.description = description;
            }
            if let Some(author) = update.author {
                list.author = author;
            }
            if let Some(is_public) = update.is_public {
                list.is_public = is_public;
                if is_public && list.share_code.is_none() {
                    list.share_code = Some(self.ids.share_code());
                }
            }
            list.updated_at = now;
            Some(())
        })
        .is_some()
    }

    /// Delete a list.
    pub fn delete_list(&self, id: &ListId) -> bool {
        self.mutate("delete_list", |lists, _| {
            let index = lists.iter().position(|l| &l.id == id)?;
            lists.remove(index);
            Some(())
        })
        .is_some()
    }

    /// Append an item with zero votes and no comments.
    ///
    /// Returns `None` (and changes nothing) if the list is unknown.
    pub fn add_item(&self, list_id: &ListId, item: NewItem) -> Option<ItemId> {
        self.mutate("add_item", |lists, now| {
            let list = lists.iter_mut().find(|l| &l.id == list_id)?;
            let id = ItemId::new(self.ids.next_id());
            list.items.push(SavedListItem::from_new(id.clone(), item));
            list.updated_at = now;
            Some(id)
        })
    }

    /// Remove an item from a list.
    pub fn remove_item(&self, list_id: &ListId, item_id: &ItemId) -> bool {
        self.mutate("remove_item", |lists, now| {
            let list = lists.iter_mut().find(|l| &l.id == list_id)?;
            let index = list.items.iter().position(|i| &i.id == item_id)?;
            list.items.remove(index);
            list.updated_at = now;
            Some(())
        })
        .is_some()
    }

    /// Make `vote` this client's active vote on an item.
    ///
    /// Re-voting the active direction is a no-op. Returns whether the
    /// tally changed.
    pub fn vote(&self, list_id: &ListId, item_id: &ItemId, vote: Vote) -> bool {
        self.mutate("vote", |lists, now| {
            let list = lists.iter_mut().find(|l| &l.id == list_id)?;
            let item = list.item_mut(item_id)?;
            if !item.votes.apply(vote) {
                return None;
            }
            list.updated_at = now;
            Some(())
        })
        .is_some()
    }

    /// Append a comment to an item.
    ///
    /// The text is trimmed; blank text is ignored. Without an author the
    /// comment is attributed to "Anonymous User".
    pub fn add_comment(
        &self,
        list_id: &ListId,
        item_id: &ItemId,
        text: &str,
        author: Option<&str>,
    ) -> Option<CommentId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let author = author
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_COMMENT_AUTHOR);

        self.mutate("add_comment", |lists, now| {
            let list = lists.iter_mut().find(|l| &l.id == list_id)?;
            let item = list.item_mut(item_id)?;
            let id = CommentId::new(self.ids.next_id());
            item.comments.push(Comment {
                id: id.clone(),
                text: text.to_string(),
                author: author.to_string(),
                timestamp: now,
            });
            list.updated_at = now;
            Some(id)
        })
    }

    // === Subscriptions ===

    /// Register a callback run after every successful mutation.
    ///
    /// Callbacks receive no payload; they re-read the store.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        let id = self.subscribers.add(Rc::new(callback));
        Subscription::new(id, &self.subscribers)
    }

    /// Number of registered callbacks.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // === Internals ===

    /// Run `change` against the collection. `None` means nothing changed.
    fn mutate<R>(
        &self,
        op: &str,
        change: impl FnOnce(&mut Vec<UserList>, DateTime<Utc>) -> Option<R>,
    ) -> Option<R> {
        let now = self.clock.now();
        let result = {
            let mut lists = self.lists.borrow_mut();
            change(&mut lists, now)
        };

        match result {
            Some(value) => {
                self.commit(op);
                Some(value)
            }
            None => {
                self.logger
                    .debug_builder("operation changed nothing")
                    .field("op", op)
                    .emit();
                None
            }
        }
    }

    fn commit(&self, op: &str) {
        self.persist(op);
        self.notify(op);
    }

    fn persist(&self, op: &str) {
        let bytes = match serde_json::to_vec(&*self.lists.borrow()) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.logger
                    .error_builder("failed to serialize lists")
                    .field("op", op)
                    .field("error", e.to_string())
                    .emit();
                return;
            }
        };

        if let Err(e) = self.persistence.save(&self.storage_key, &bytes) {
            self.logger
                .error_builder("failed to persist lists")
                .field("op", op)
                .field("storage_key", self.storage_key.as_str())
                .field("error", e.to_string())
                .emit();
        }
    }

    fn notify(&self, op: &str) {
        for (id, callback) in self.subscribers.snapshot() {
            // Skip callbacks removed earlier in this same delivery.
            if !self.subscribers.contains(id) {
                continue;
            }
            if catch_unwind(AssertUnwindSafe(|| callback())).is_err() {
                self.logger
                    .error_builder("subscriber panicked")
                    .field("op", op)
                    .field_i64("subscriber", id as i64)
                    .emit();
            }
        }
    }
}

impl std::fmt::Debug for ListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListStore")
            .field("lists", &self.len())
            .field("storage_key", &self.storage_key)
            .field("subscribers", &self.subscribers)
            .finish()
    }
}
