//! Hierarchical datastore keys.

use std::fmt;

use serde::{Deserialize, Serialize};
use strata_resource_id::{self as codec, PathComponent, ResourceIdError};

use crate::error::DatastoreError;

/// A hierarchical datastore key: ordered kind/identifier pairs,
/// optionally scoped to a project and namespace.
///
/// A key is *complete* when every kind has a paired identifier.
/// Incomplete keys (a trailing kind with no identifier) are valid only
/// prior to persistence and cannot produce a resource id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    flat_path: Vec<PathComponent>,
}

impl Key {
    /// Builds a complete key from flattened path components.
    ///
    /// Rejects an empty list, an odd component count (a kind with no
    /// identifier), and empty components, with the malformed-key class
    /// of [`ResourceIdError`].
    pub fn from_flat_path<I>(path: I) -> Result<Self, DatastoreError>
    where
        I: IntoIterator,
        I::Item: Into<PathComponent>,
    {
        let flat_path: Vec<PathComponent> = path.into_iter().map(Into::into).collect();

        if flat_path.is_empty() {
            return Err(ResourceIdError::EmptyPath.into());
        }
        if flat_path.len() % 2 != 0 {
            return Err(ResourceIdError::UnpairedComponent(flat_path.len()).into());
        }
        for (index, component) in flat_path.iter().enumerate() {
            if component.as_name().is_some_and(str::is_empty) {
                return Err(ResourceIdError::EmptyComponent(index / 2).into());
            }
        }

        Ok(Key {
            project: None,
            namespace: None,
            flat_path,
        })
    }

    /// Builds an incomplete key: ancestors plus a trailing kind with no
    /// identifier.
    ///
    /// Such a key is valid only prior to persistence; encoding it as a
    /// resource id fails.
    pub fn incomplete<I>(path: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PathComponent>,
    {
        Key {
            project: None,
            namespace: None,
            flat_path: path.into_iter().map(Into::into).collect(),
        }
    }

    /// Scopes the key to a project.
    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Scopes the key to a namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// The project the key belongs to, when known.
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// The namespace the key belongs to, when known.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The flattened path components.
    pub fn flat_path(&self) -> &[PathComponent] {
        &self.flat_path
    }

    /// True when every kind has a paired identifier.
    pub fn is_complete(&self) -> bool {
        !self.flat_path.is_empty() && self.flat_path.len() % 2 == 0
    }

    /// The leaf kind, when the leaf kind position holds a name.
    pub fn kind(&self) -> Option<&str> {
        self.kind_component()?.as_name()
    }

    /// The leaf integer identifier, when the key is complete and numeric.
    pub fn id(&self) -> Option<i64> {
        if self.is_complete() {
            self.flat_path.last()?.as_id()
        } else {
            None
        }
    }

    /// The leaf string identifier, when the key is complete and named.
    pub fn name(&self) -> Option<&str> {
        if self.is_complete() {
            self.flat_path.last()?.as_name()
        } else {
            None
        }
    }

    /// The component in the leaf kind position, whatever it holds.
    pub(crate) fn kind_component(&self) -> Option<&PathComponent> {
        let index = if self.is_complete() {
            self.flat_path.len() - 2
        } else {
            self.flat_path.len().checked_sub(1)?
        };
        self.flat_path.get(index)
    }

    /// Encodes this key as a portable resource id.
    ///
    /// # Errors
    ///
    /// Incomplete keys have no resource id; encoding one fails with the
    /// malformed-key class of [`ResourceIdError`].
    pub fn to_resource_id(&self) -> Result<String, ResourceIdError> {
        codec::encode(&self.flat_path)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key(")?;
        for (index, component) in self.flat_path.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            match component {
                PathComponent::Id(id) => write!(f, "{}", id)?,
                PathComponent::Name(name) => write!(f, "{:?}", name)?,
            }
        }
        write!(f, ")")
    }
}
