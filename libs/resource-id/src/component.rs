//! Path components: the positional pieces of a flattened key path.

use serde::{Deserialize, Serialize};

/// One positional component of a flattened key path.
///
/// A flattened path alternates kind and identifier positions. Kinds are
/// always names; identifiers are either a numeric [`Id`](Self::Id) or a
/// string [`Name`](Self::Name). The distinction survives a resource id
/// round trip: an encoded integer decodes as an integer, never as a
/// numeric-looking string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathComponent {
    /// A numeric identifier.
    Id(i64),
    /// A kind name or string identifier.
    Name(String),
}

impl PathComponent {
    /// Returns the numeric identifier, if this component holds one.
    pub fn as_id(&self) -> Option<i64> {
        match self {
            PathComponent::Id(id) => Some(*id),
            PathComponent::Name(_) => None,
        }
    }

    /// Returns the string form, if this component is a name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            PathComponent::Id(_) => None,
            PathComponent::Name(name) => Some(name.as_str()),
        }
    }
}

impl std::fmt::Display for PathComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathComponent::Id(id) => write!(f, "{}", id),
            PathComponent::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<i64> for PathComponent {
    fn from(id: i64) -> Self {
        PathComponent::Id(id)
    }
}

impl From<&str> for PathComponent {
    fn from(name: &str) -> Self {
        PathComponent::Name(name.to_string())
    }
}

impl From<String> for PathComponent {
    fn from(name: String) -> Self {
        PathComponent::Name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(PathComponent::Id(7).as_id(), Some(7));
        assert_eq!(PathComponent::Id(7).as_name(), None);

        let name = PathComponent::from("Event");
        assert_eq!(name.as_name(), Some("Event"));
        assert_eq!(name.as_id(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(PathComponent::Id(42).to_string(), "42");
        assert_eq!(PathComponent::from("Venue").to_string(), "Venue");
    }

    #[test]
    fn test_json_shape() {
        let id = serde_json::to_string(&PathComponent::Id(5)).unwrap();
        assert_eq!(id, "5");

        let name = serde_json::to_string(&PathComponent::from("Venue")).unwrap();
        assert_eq!(name, "\"Venue\"");

        // The tag is recovered from the JSON shape, not lost to a string.
        let parsed: PathComponent = serde_json::from_str("5").unwrap();
        assert_eq!(parsed, PathComponent::Id(5));
        let parsed: PathComponent = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(parsed, PathComponent::Name("5".to_string()));
    }
}
