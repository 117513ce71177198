//! Error types for resource id encoding and decoding.

use thiserror::Error;

/// Errors that can occur when encoding or decoding resource ids.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceIdError {
    /// The flattened key path is empty.
    #[error("key path cannot be empty")]
    EmptyPath,

    /// The flattened key path has an odd number of components, leaving a
    /// kind without its identifier.
    #[error("key must have an even number of positional components, got {0}")]
    UnpairedComponent(usize),

    /// A kind or identifier in the key path stringifies to nothing.
    #[error("key path pair {0} has an empty kind or identifier")]
    EmptyComponent(usize),

    /// A kind or identifier carries bytes the wire format cannot hold:
    /// one of the sentinel characters, or anything outside ASCII.
    #[error("key path component '{0}' contains unencodable bytes")]
    UnencodableComponent(String),

    /// The resource id is not decodable URL-safe base64.
    #[error("could not base64 decode resource id: {0}")]
    InvalidBase64(String),

    /// The decoded payload is not text.
    #[error("resource id payload is not valid UTF-8")]
    InvalidPayload,

    /// An integer-tagged token holds something other than a decimal
    /// integer in range.
    #[error("invalid integer identifier '{0}' in resource id")]
    InvalidIntegerId(String),
}

impl ResourceIdError {
    /// Returns true if this error describes a structurally invalid key
    /// path handed to [`encode`](crate::encode).
    pub fn is_malformed_key(&self) -> bool {
        matches!(
            self,
            ResourceIdError::EmptyPath
                | ResourceIdError::UnpairedComponent(_)
                | ResourceIdError::EmptyComponent(_)
                | ResourceIdError::UnencodableComponent(_)
        )
    }

    /// Returns true if this error describes a resource id that could not
    /// be decoded back into a key path.
    pub fn is_invalid_resource_id(&self) -> bool {
        matches!(
            self,
            ResourceIdError::InvalidBase64(_)
                | ResourceIdError::InvalidPayload
                | ResourceIdError::InvalidIntegerId(_)
        )
    }
}
