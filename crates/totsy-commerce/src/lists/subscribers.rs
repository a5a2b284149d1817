//! Change subscriptions for the list store.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Callback = Rc<dyn Fn()>;

/// Ordered set of change callbacks.
#[derive(Default)]
pub(crate) struct Registry {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Callback)>>,
}

impl Registry {
    pub(crate) fn add(&self, callback: Callback) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.entries.borrow_mut().push((id, callback));
        id
    }

    pub(crate) fn remove(&self, id: u64) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Callbacks in subscription order, detached from the registry so they
    /// may subscribe or unsubscribe while being delivered.
    pub(crate) fn snapshot(&self) -> Vec<(u64, Callback)> {
        self.entries.borrow().clone()
    }

    pub(crate) fn contains(&self, id: u64) -> bool {
        self.entries.borrow().iter().any(|(entry_id, _)| *entry_id == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

/// Handle returned by [`ListStore::subscribe`](crate::lists::ListStore::subscribe).
///
/// Dropping the handle keeps the callback registered; call
/// [`unsubscribe`](Subscription::unsubscribe) to remove it.
#[must_use = "keep the subscription to be able to unsubscribe later"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    pub(crate) fn new(id: u64, registry: &Rc<Registry>) -> Self {
        Self {
            id,
            registry: Rc::downgrade(registry),
        }
    }

    /// Stop receiving change notifications.
    ///
    /// Returns `false` if the store is gone or the callback was already removed.
    pub fn unsubscribe(self) -> bool {
        self.registry
            .upgrade()
            .map_or(false, |registry| registry.remove(self.id))
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("subscribers", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let registry = Rc::new(Registry::default());
        let first = registry.add(Rc::new(|| {}));
        let second = registry.add(Rc::new(|| {}));
        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);

        let handle = Subscription::new(first, &registry);
        assert!(handle.unsubscribe());
        assert_eq!(registry.len(), 1);
        assert!(!Subscription::new(first, &registry).unsubscribe());
    }

    #[test]
    fn test_unsubscribe_after_registry_dropped() {
        let registry = Rc::new(Registry::default());
        let id = registry.add(Rc::new(|| {}));
        let handle = Subscription::new(id, &registry);
        drop(registry);
        assert!(!handle.unsubscribe());
    }
}
