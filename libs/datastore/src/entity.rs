//! Datastore entities: a key plus named property values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::key::Key;

/// A datastore record: a [`Key`] plus named property values.
///
/// Properties are kept in sorted order for deterministic serialization.
/// The client layer attaches no further meaning to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    key: Key,
    #[serde(default)]
    properties: BTreeMap<String, Value>,
}

impl Entity {
    /// Creates an entity with no properties.
    #[must_use]
    pub fn new(key: Key) -> Self {
        Entity {
            key,
            properties: BTreeMap::new(),
        }
    }

    /// The entity's key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Sets a property value.
    ///
    /// Returns the previous value if the property existed.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(name.into(), value.into())
    }

    /// Gets a property value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Removes a property.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.properties.remove(name)
    }

    /// Iterates over properties in name order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// True when the entity has no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use strata_resource_id::key_path;

    use super::*;

    fn user_key() -> Key {
        Key::from_flat_path(key_path!["UserEntity", 1]).unwrap()
    }

    #[test]
    fn test_property_access() {
        let mut entity = Entity::new(user_key());
        assert!(entity.is_empty());

        assert_eq!(entity.set("username", "test"), None);
        assert_eq!(
            entity.set("username", "other"),
            Some(Value::from("test"))
        );
        assert_eq!(entity.get("username"), Some(&Value::from("other")));
        assert_eq!(entity.len(), 1);

        assert_eq!(entity.remove("username"), Some(Value::from("other")));
        assert!(entity.get("username").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let mut entity = Entity::new(user_key());
        entity.set("username", "test");
        entity.set("visits", 3);

        let json = serde_json::to_string(&entity).unwrap();
        let parsed: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entity);
    }
}
