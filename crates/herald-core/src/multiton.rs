//! Process-wide key → instance maps
//!
//! Each registry family (views, models) owns one `static` [`Multiton`].
//! Instances are created lazily on first lookup and live until removed.

use crate::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

type InstanceMap<T> = Mutex<HashMap<String, Arc<T>>>;

fn empty_map<T>() -> InstanceMap<T> {
    Mutex::new(HashMap::new())
}

/// A keyed set of shared instances
///
/// ```
/// use herald_core::Multiton;
///
/// struct Counter(&'static str);
/// static COUNTERS: Multiton<Counter> = Multiton::new("Counter");
///
/// let a = COUNTERS.get_or_create("doc-a", |_| Counter("first"));
/// let b = COUNTERS.get_or_create("doc-a", |_| Counter("second"));
/// assert_eq!(b.0, "first");
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
///
/// assert!(COUNTERS.try_create("doc-a", |_| Counter("third")).is_err());
/// COUNTERS.remove("doc-a");
/// assert!(!COUNTERS.contains("doc-a"));
/// ```
pub struct Multiton<T> {
    kind: &'static str,
    instances: LazyLock<InstanceMap<T>, fn() -> InstanceMap<T>>,
}

impl<T> Multiton<T> {
    /// Create an empty map; `kind` names the family in errors and logs
    pub const fn new(kind: &'static str) -> Self {
        Self {
            kind,
            instances: LazyLock::new(empty_map::<T>),
        }
    }

    /// Name of the registry family
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Return the instance for `key`, constructing it with `create` if absent
    ///
    /// `create` runs with the map locked and must not touch this multiton.
    pub fn get_or_create(&self, key: &str, create: impl FnOnce(&str) -> T) -> Arc<T> {
        let mut instances = self.instances.lock();
        if let Some(existing) = instances.get(key) {
            return Arc::clone(existing);
        }
        let instance = Arc::new(create(key));
        instances.insert(key.to_string(), Arc::clone(&instance));
        tracing::debug!(kind = self.kind, key, "multiton instance created");
        instance
    }

    /// Construct and store a new instance, failing if `key` is already live
    pub fn try_create(&self, key: &str, create: impl FnOnce(&str) -> T) -> Result<Arc<T>> {
        let mut instances = self.instances.lock();
        if instances.contains_key(key) {
            return Err(Error::duplicate_key(self.kind, key));
        }
        let instance = Arc::new(create(key));
        instances.insert(key.to_string(), Arc::clone(&instance));
        tracing::debug!(kind = self.kind, key, "multiton instance constructed");
        Ok(instance)
    }

    /// Look up an instance without creating it
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.instances.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.instances.lock().contains_key(key)
    }

    /// Discard the instance for `key`; absent keys are ignored
    ///
    /// Holders of the returned (or any other) `Arc` keep a working but
    /// orphaned instance; nothing inside it is torn down.
    pub fn remove(&self, key: &str) -> Option<Arc<T>> {
        let removed = self.instances.lock().remove(key);
        if removed.is_some() {
            tracing::debug!(kind = self.kind, key, "multiton instance removed");
        }
        removed
    }

    /// Number of live instances
    pub fn len(&self) -> usize {
        self.instances.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Slot(String);

    static SLOTS: Multiton<Slot> = Multiton::new("Slot");

    #[test]
    fn test_get_or_create_is_lazy_and_stable() {
        assert!(SLOTS.get("multiton-lazy").is_none());

        let first = SLOTS.get_or_create("multiton-lazy", |key| Slot(format!("{key}/1")));
        let again = SLOTS.get_or_create("multiton-lazy", |key| Slot(format!("{key}/2")));

        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(again.0, "multiton-lazy/1");
        assert!(SLOTS.contains("multiton-lazy"));
    }

    #[test]
    fn test_try_create_rejects_live_key() {
        SLOTS.try_create("multiton-dup", |_| Slot("a".into())).unwrap();
        let err = SLOTS.try_create("multiton-dup", |_| Slot("b".into())).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { kind: "Slot", ref key } if key == "multiton-dup"));
        assert_eq!(SLOTS.get("multiton-dup").unwrap().0, "a");
    }

    #[test]
    fn test_remove_then_recreate() {
        let old = SLOTS.get_or_create("multiton-remove", |_| Slot("old".into()));
        assert!(SLOTS.remove("multiton-remove").is_some());
        assert!(SLOTS.remove("multiton-remove").is_none());

        let new = SLOTS.get_or_create("multiton-remove", |_| Slot("new".into()));
        assert!(!Arc::ptr_eq(&old, &new));
        assert_eq!(old.0, "old");
        assert!(SLOTS.try_create("multiton-remove", |_| Slot("x".into())).is_err());
    }

    #[test]
    fn test_kind_and_len() {
        static LOCAL: Multiton<u8> = Multiton::new("Local");
        assert_eq!(LOCAL.kind(), "Local");
        assert!(LOCAL.is_empty());
        LOCAL.get_or_create("one", |_| 1);
        LOCAL.get_or_create("two", |_| 2);
        assert_eq!(LOCAL.len(), 2);
    }
}
