//! Error types for the datastore client layer.

use strata_resource_id::ResourceIdError;
use thiserror::Error;

/// Errors that can occur in the datastore client layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DatastoreError {
    /// A key path or resource id failed codec validation.
    #[error(transparent)]
    Codec(#[from] ResourceIdError),

    /// A key's kind differs from the kind the caller expected.
    #[error("expected key of kind {expected} but found kind {actual} instead")]
    KindMismatch { expected: String, actual: String },

    /// A resource id could not be resolved to a key of the expected kind.
    ///
    /// This is the only error the resource id resolution path surfaces,
    /// no matter which internal step failed; it always carries the
    /// offending id for diagnostics.
    #[error("'{resource_id}' is not a valid resource id")]
    InvalidId { resource_id: String },

    /// A legacy key string is empty, truncated, or otherwise not
    /// parseable.
    #[error("invalid key string: {reason}")]
    InvalidKeyString { reason: String },

    /// An entity already exists under a key that was expected to be
    /// vacant.
    #[error("entity already exists for key {key}")]
    EntityExists { key: String },

    /// No entity exists under a key that was expected to be present.
    #[error("no entity found for key {key}")]
    DoesNotExist { key: String },

    /// The backing store failed.
    #[error("backend error: {0}")]
    Backend(String),
}
