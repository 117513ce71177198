//! The datastore client handle.

use std::fmt;
use std::sync::OnceLock;

use tracing::debug;

use strata_resource_id::PathComponent;

use crate::backend::{Backend, MemoryBackend};
use crate::config::ClientConfig;
use crate::entity::Entity;
use crate::error::DatastoreError;
use crate::key::Key;

static SHARED: OnceLock<Client> = OnceLock::new();

/// Handle to a datastore: ambient configuration plus a transport
/// [`Backend`].
///
/// One process normally holds a single shared client (see
/// [`Client::shared`]); standalone clients exist for tests that need
/// isolated state.
pub struct Client {
    config: ClientConfig,
    backend: Box<dyn Backend>,
}

impl Client {
    /// Creates a standalone client.
    pub fn new(config: ClientConfig, backend: impl Backend + 'static) -> Self {
        Client {
            config,
            backend: Box::new(backend),
        }
    }

    /// The process-wide shared client.
    ///
    /// The first call constructs the client from environment
    /// configuration with an in-process backend; every later call
    /// returns the same handle. Acquisition is idempotent: repeated
    /// calls never construct a second client.
    pub fn shared() -> &'static Client {
        SHARED.get_or_init(|| {
            debug!("initializing shared datastore client");
            Client::new(ClientConfig::from_env(), MemoryBackend::new())
        })
    }

    /// Installs a specific configuration and backend as the process-wide
    /// client.
    ///
    /// When a shared client already exists it is returned unchanged and
    /// the arguments are dropped.
    pub fn shared_with(config: ClientConfig, backend: impl Backend + 'static) -> &'static Client {
        SHARED.get_or_init(|| Client::new(config, backend))
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds a complete key from flattened path components, scoped to
    /// the client's project and namespace.
    ///
    /// # Errors
    ///
    /// Fails when the component list is empty, oddly paired, or holds an
    /// empty component.
    pub fn key<I>(&self, path: I) -> Result<Key, DatastoreError>
    where
        I: IntoIterator,
        I::Item: Into<PathComponent>,
    {
        let mut key = Key::from_flat_path(path)?;
        if let Some(project_id) = &self.config.project_id {
            key = key.with_project(project_id.clone());
        }
        if let Some(namespace) = &self.config.namespace {
            key = key.with_namespace(namespace.clone());
        }
        Ok(key)
    }

    /// Fetches the entity stored under a key.
    ///
    /// Absence is a plain `None`, never an error.
    pub fn get(&self, key: &Key) -> Result<Option<Entity>, DatastoreError> {
        let found = self.backend.lookup(key)?;
        debug!(key = %key, found = found.is_some(), "lookup");
        Ok(found)
    }

    /// Fetches the entity stored under a key, treating absence as an
    /// error.
    pub fn require(&self, key: &Key) -> Result<Entity, DatastoreError> {
        self.get(key)?.ok_or_else(|| DatastoreError::DoesNotExist {
            key: key.to_string(),
        })
    }

    /// Stores an entity, replacing any existing record under its key.
    pub fn put(&self, entity: Entity) -> Result<(), DatastoreError> {
        self.backend.put(entity)
    }

    /// Stores an entity under a key expected to be vacant.
    pub fn insert(&self, entity: Entity) -> Result<(), DatastoreError> {
        if self.backend.lookup(entity.key())?.is_some() {
            return Err(DatastoreError::EntityExists {
                key: entity.key().to_string(),
            });
        }
        self.backend.put(entity)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use strata_resource_id::key_path;

    use super::*;

    fn test_client() -> Client {
        Client::new(
            ClientConfig::default().with_project_id("arts-612"),
            MemoryBackend::new(),
        )
    }

    #[test]
    fn test_key_applies_config_scope() {
        let client = test_client();
        let key = client.key(key_path!["UserEntity", 1]).unwrap();
        assert_eq!(key.project(), Some("arts-612"));
        assert_eq!(key.namespace(), None);
    }

    #[test]
    fn test_get_absent_is_none() {
        let client = test_client();
        let key = client.key(key_path!["UserEntity", 1]).unwrap();
        assert_eq!(client.get(&key).unwrap(), None);
    }

    #[test]
    fn test_put_get_round_trip() {
        let client = test_client();
        let key = client.key(key_path!["UserEntity", 9999]).unwrap();

        let mut entity = Entity::new(key.clone());
        entity.set("username", "test");
        client.put(entity.clone()).unwrap();

        assert_eq!(client.get(&key).unwrap(), Some(entity));
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let client = test_client();
        let key = client.key(key_path!["UserEntity", 1]).unwrap();

        client.insert(Entity::new(key.clone())).unwrap();
        let err = client.insert(Entity::new(key)).unwrap_err();
        assert!(matches!(err, DatastoreError::EntityExists { .. }));
    }

    #[test]
    fn test_require_absent_is_an_error() {
        let client = test_client();
        let key = client.key(key_path!["UserEntity", 1]).unwrap();
        let err = client.require(&key).unwrap_err();
        assert!(matches!(err, DatastoreError::DoesNotExist { .. }));
    }
}
