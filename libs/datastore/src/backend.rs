//! The transport seam between the client layer and a concrete datastore.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::entity::Entity;
use crate::error::DatastoreError;
use crate::key::Key;

/// Transport operations a concrete datastore must provide.
///
/// Network semantics (timeouts, retries, cancellation) are entirely the
/// implementor's concern; the client layer adds none of its own.
pub trait Backend: Send + Sync {
    /// Fetches the entity stored under a key, if any.
    ///
    /// Absence is `Ok(None)`; errors are reserved for transport failure.
    fn lookup(&self, key: &Key) -> Result<Option<Entity>, DatastoreError>;

    /// Stores an entity under its key, replacing any existing record.
    fn put(&self, entity: Entity) -> Result<(), DatastoreError>;
}

/// In-process backend over a sorted map.
///
/// Used by tests and local development.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: RwLock<BTreeMap<Key, Entity>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Backend for MemoryBackend {
    fn lookup(&self, key: &Key) -> Result<Option<Entity>, DatastoreError> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(key).cloned())
    }

    fn put(&self, entity: Entity) -> Result<(), DatastoreError> {
        if !entity.key().is_complete() {
            return Err(DatastoreError::Backend(
                "cannot store an entity under an incomplete key".to_string(),
            ));
        }
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.insert(entity.key().clone(), entity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use strata_resource_id::key_path;

    use super::*;

    #[test]
    fn test_put_then_lookup() {
        let backend = MemoryBackend::new();
        let key = Key::from_flat_path(key_path!["UserEntity", 1]).unwrap();

        assert_eq!(backend.lookup(&key).unwrap(), None);

        let mut entity = Entity::new(key.clone());
        entity.set("username", "test");
        backend.put(entity.clone()).unwrap();

        assert_eq!(backend.lookup(&key).unwrap(), Some(entity));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_put_replaces() {
        let backend = MemoryBackend::new();
        let key = Key::from_flat_path(key_path!["UserEntity", 1]).unwrap();

        let mut first = Entity::new(key.clone());
        first.set("username", "first");
        backend.put(first).unwrap();

        let mut second = Entity::new(key.clone());
        second.set("username", "second");
        backend.put(second.clone()).unwrap();

        assert_eq!(backend.lookup(&key).unwrap(), Some(second));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_put_rejects_incomplete_key() {
        let backend = MemoryBackend::new();
        let entity = Entity::new(Key::incomplete(key_path!["UserEntity"]));
        assert!(matches!(
            backend.put(entity),
            Err(DatastoreError::Backend(_))
        ));
    }
}
