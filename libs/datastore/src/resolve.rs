//! Resource id resolution against the datastore.
//!
//! Resource ids arrive from untrusted callers, so every internal failure
//! mode (bad base64, malformed key path, kind mismatch) collapses into
//! the single [`DatastoreError::InvalidId`] error before leaving this
//! module. Callers only ever distinguish "not a valid id" from "valid
//! id, no such record".

use tracing::debug;

use strata_resource_id as codec;

use crate::client::Client;
use crate::entity::Entity;
use crate::error::DatastoreError;
use crate::key::Key;

impl Client {
    /// Decodes a portable resource id into a key.
    ///
    /// Unlike [`entity_by_resource_id`](Client::entity_by_resource_id),
    /// this surfaces precise codec and pairing errors.
    pub fn key_from_resource_id(&self, resource_id: &str) -> Result<Key, DatastoreError> {
        let components = codec::decode(resource_id)?;
        self.key(components)
    }

    /// Fetches an entity by its portable resource id.
    ///
    /// The decoded key's leaf kind must equal `expected_kind`,
    /// case-sensitively. Any decode, key reconstruction, or kind failure
    /// is reported as [`DatastoreError::InvalidId`]; backend failures
    /// propagate unchanged; a missing record is `Ok(None)`.
    pub fn entity_by_resource_id(
        &self,
        expected_kind: &str,
        resource_id: &str,
    ) -> Result<Option<Entity>, DatastoreError> {
        let key = self.checked_key_from_resource_id(expected_kind, resource_id)?;
        self.get(&key)
    }

    /// Resolves and kind-checks a resource id, collapsing every failure
    /// into [`DatastoreError::InvalidId`].
    ///
    /// This is the one place the unification policy lives; nothing else
    /// may catch and rewrap resolution errors.
    fn checked_key_from_resource_id(
        &self,
        expected_kind: &str,
        resource_id: &str,
    ) -> Result<Key, DatastoreError> {
        let resolve = || -> Result<Key, DatastoreError> {
            if resource_id.is_empty() {
                return Err(DatastoreError::InvalidId {
                    resource_id: String::new(),
                });
            }
            let key = self.key_from_resource_id(resource_id)?;
            validate_kind(expected_kind, &key)?;
            Ok(key)
        };

        resolve().map_err(|err| {
            debug!(
                resource_id = resource_id,
                error = %err,
                "resource id failed to resolve"
            );
            DatastoreError::InvalidId {
                resource_id: resource_id.to_string(),
            }
        })
    }
}

/// Checks a key's leaf kind against an expected kind, case-sensitively.
pub(crate) fn validate_kind(expected_kind: &str, key: &Key) -> Result<(), DatastoreError> {
    if key.kind() == Some(expected_kind) {
        return Ok(());
    }
    let actual = match key.kind_component() {
        Some(component) => component.to_string(),
        None => "<none>".to_string(),
    };
    Err(DatastoreError::KindMismatch {
        expected: expected_kind.to_string(),
        actual,
    })
}
