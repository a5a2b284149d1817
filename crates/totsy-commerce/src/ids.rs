//! Newtype IDs and identifier generation.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., passing an ItemId where a ListId is expected.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;

/// Length of a list share code.
pub const SHARE_CODE_LEN: usize = 6;

/// Characters a share code is drawn from.
const SHARE_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(ListId);
define_id!(ItemId);
define_id!(CommentId);

/// Source of fresh identifiers and share codes for the list store.
pub trait IdGenerator {
    /// Produce an identifier never returned before by this generator.
    fn next_id(&self) -> String;

    /// Produce a 6-character uppercase alphanumeric share code.
    fn share_code(&self) -> String;

    /// Tell the generator about an identifier that already exists (e.g. one
    /// loaded from a snapshot) so it is never handed out again.
    fn observe(&self, _existing: &str) {}
}

impl<G: IdGenerator + ?Sized> IdGenerator for std::rc::Rc<G> {
    fn next_id(&self) -> String {
        (**self).next_id()
    }

    fn share_code(&self) -> String {
        (**self).share_code()
    }

    fn observe(&self, existing: &str) {
        (**self).observe(existing)
    }
}

/// Time-seeded monotonic identifiers.
///
/// Ids are decimal Unix milliseconds, bumped by one whenever the clock has
/// not advanced past the last issued id. Two creations inside the same
/// millisecond therefore still get distinct, creation-ordered ids.
#[derive(Debug, Default)]
pub struct MonotonicIds {
    last: Cell<u64>,
}

impl MonotonicIds {
    /// Create a generator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for MonotonicIds {
    fn next_id(&self) -> String {
        let now = current_millis();
        let next = now.max(self.last.get().saturating_add(1));
        self.last.set(next);
        next.to_string()
    }

    fn share_code(&self) -> String {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        (0..SHARE_CODE_LEN)
            .map(|_| SHARE_CODE_ALPHABET[rng.gen_range(0..SHARE_CODE_ALPHABET.len())] as char)
            .collect()
    }

    fn observe(&self, existing: &str) {
        if let Ok(value) = existing.parse::<u64>() {
            if value > self.last.get() {
                self.last.set(value);
            }
        }
    }
}

/// Deterministic identifiers: "1", "2", ... and share codes "S00001", ...
///
/// Used by tests and fixtures that need stable output.
#[derive(Debug, Default)]
pub struct SequentialIds {
    ids: Cell<u64>,
    codes: Cell<u64>,
}

impl SequentialIds {
    /// Create a generator starting at 1.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let next = self.ids.get() + 1;
        self.ids.set(next);
        next.to_string()
    }

    fn share_code(&self) -> String {
        let next = self.codes.get() + 1;
        self.codes.set(next);
        format!("S{:05}", next % 100_000)
    }

    fn observe(&self, existing: &str) {
        if let Ok(value) = existing.parse::<u64>() {
            if value > self.ids.get() {
                self.ids.set(value);
            }
        }
    }
}

/// Check whether a string has the shape of a share code.
pub fn is_share_code(code: &str) -> bool {
    code.len() == SHARE_CODE_LEN
        && code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

fn current_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
