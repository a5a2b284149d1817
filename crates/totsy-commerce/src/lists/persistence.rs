//! Snapshot storage seam for the list store.

use crate::error::CommerceError;
use std::rc::Rc;
use totsy_cache::Cache;

/// Key the full list collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "totsylist-user-lists";

/// Persists the serialized list collection as one opaque value.
pub trait SnapshotStore {
    /// Read the snapshot stored at `key`, if any.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CommerceError>;

    /// Replace the snapshot stored at `key`.
    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), CommerceError>;
}

impl SnapshotStore for Cache {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CommerceError> {
        Ok(self.get_raw(key)?)
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), CommerceError> {
        Ok(self.set_raw(key, bytes)?)
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Rc<S> {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CommerceError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), CommerceError> {
        (**self).save(key, bytes)
    }
}
