//! Byte-oriented key-value store with memory and directory backends.

use crate::CacheError;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File extension used by the directory backend.
const ENTRY_EXTENSION: &str = "json";

/// Local key-value store holding opaque byte values.
///
/// Values are not interpreted here. Callers own the encoding so they can
/// decide for themselves what a corrupt entry means.
#[derive(Debug)]
pub struct Cache {
    backend: Backend,
}

#[derive(Debug)]
enum Backend {
    Memory(RefCell<BTreeMap<String, Vec<u8>>>),
    Directory(PathBuf),
}

impl Cache {
    /// Open an empty in-memory store.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::memory();
    /// ```
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory(RefCell::new(BTreeMap::new())),
        }
    }

    /// Open a store that keeps one file per key inside `dir`.
    ///
    /// The directory is created if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open_dir("/tmp/totsylist")?;
    /// ```
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .map_err(|e| CacheError::OpenError(format!("{}: {}", dir.display(), e)))?;
        Ok(Self {
            backend: Backend::Directory(dir.to_path_buf()),
        })
    }

    /// Directory backing this store, if any.
    pub fn dir(&self) -> Option<&Path> {
        match &self.backend {
            Backend::Memory(_) => None,
            Backend::Directory(dir) => Some(dir),
        }
    }

    /// Get the raw bytes stored under `key`.
    pub fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        validate_key(key)?;
        match &self.backend {
            Backend::Memory(map) => Ok(map.borrow().get(key).cloned()),
            Backend::Directory(dir) => match fs::read(entry_path(dir, key)) {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(CacheError::StoreError(format!("read {}: {}", key, e))),
            },
        }
    }

    /// Replace the raw bytes stored under `key`.
    ///
    /// The directory backend writes to a sibling temp file and renames it
    /// over the entry, so readers never observe a half-written value.
    pub fn set_raw(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError> {
        validate_key(key)?;
        match &self.backend {
            Backend::Memory(map) => {
                map.borrow_mut().insert(key.to_string(), bytes.to_vec());
                Ok(())
            }
            Backend::Directory(dir) => {
                let path = entry_path(dir, key);
                let tmp = path.with_extension(format!("{}.tmp", ENTRY_EXTENSION));
                fs::write(&tmp, bytes)
                    .map_err(|e| CacheError::StoreError(format!("write {}: {}", key, e)))?;
                fs::rename(&tmp, &path)
                    .map_err(|e| CacheError::StoreError(format!("commit {}: {}", key, e)))
            }
        }
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<(), CacheError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(CacheError::InvalidKey(key.to_string()))
    }
}

fn entry_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.{}", key, ENTRY_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_set_get() {
        let cache = Cache::memory();
        assert_eq!(cache.get_raw("lists").unwrap(), None);

        cache.set_raw("lists", b"[]").unwrap();
        assert_eq!(cache.get_raw("lists").unwrap(), Some(b"[]".to_vec()));

        cache.set_raw("lists", b"[1]").unwrap();
        assert_eq!(cache.get_raw("lists").unwrap(), Some(b"[1]".to_vec()));
        assert!(cache.dir().is_none());
    }

    #[test]
    fn test_directory_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let cache = Cache::open_dir(dir.path()).unwrap();
        cache.set_raw("totsylist-user-lists", b"[]").unwrap();

        let reopened = Cache::open_dir(dir.path()).unwrap();
        assert_eq!(
            reopened.get_raw("totsylist-user-lists").unwrap(),
            Some(b"[]".to_vec())
        );
        assert!(dir.path().join("totsylist-user-lists.json").is_file());
        assert!(!dir.path().join("totsylist-user-lists.json.tmp").exists());
    }

    #[test]
    fn test_directory_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::open_dir(dir.path()).unwrap();

        assert_eq!(cache.get_raw("absent").unwrap(), None);
    }

    #[test]
    fn test_corrupt_entry_is_returned_untouched() {
        let cache = Cache::memory();
        cache.set_raw("lists", b"{not json").unwrap();

        assert_eq!(cache.get_raw("lists").unwrap(), Some(b"{not json".to_vec()));
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let cache = Cache::memory();
        for key in ["", "../escape", ".hidden", "a/b", "with space"] {
            assert!(
                matches!(cache.get_raw(key), Err(CacheError::InvalidKey(_))),
                "key {:?} should be rejected",
                key
            );
            assert!(matches!(
                cache.set_raw(key, b"[]"),
                Err(CacheError::InvalidKey(_))
            ));
        }
    }
}
