//! Ambient client configuration.

use std::env;

/// Environment variable naming the project keys belong to.
pub const PROJECT_ID_ENV: &str = "DATASTORE_PROJECT_ID";

/// Environment variable naming the namespace applied to keys.
pub const NAMESPACE_ENV: &str = "DATASTORE_NAMESPACE";

/// Ambient configuration for a [`Client`](crate::Client).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Project the client's keys belong to.
    pub project_id: Option<String>,
    /// Namespace applied to keys built by the client.
    pub namespace: Option<String>,
}

impl ClientConfig {
    /// Reads configuration from the environment.
    ///
    /// Unset or empty variables leave the corresponding field `None`.
    #[must_use]
    pub fn from_env() -> Self {
        ClientConfig {
            project_id: env::var(PROJECT_ID_ENV).ok().filter(|v| !v.is_empty()),
            namespace: env::var(NAMESPACE_ENV).ok().filter(|v| !v.is_empty()),
        }
    }

    /// Sets the project id.
    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let config = ClientConfig::default()
            .with_project_id("arts-612")
            .with_namespace("prod");
        assert_eq!(config.project_id.as_deref(), Some("arts-612"));
        assert_eq!(config.namespace.as_deref(), Some("prod"));
    }

    #[test]
    fn test_default_is_unscoped() {
        let config = ClientConfig::default();
        assert_eq!(config.project_id, None);
        assert_eq!(config.namespace, None);
    }
}
