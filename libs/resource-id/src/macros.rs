//! Macros for building key paths.

/// Builds a `Vec<PathComponent>` from mixed kind and identifier values.
///
/// # Example
///
/// ```ignore
/// let path = key_path!["Org", "acme", "UserEntity", 42];
/// let id = strata_resource_id::encode(&path)?;
/// ```
#[macro_export]
macro_rules! key_path {
    ($($component:expr),* $(,)?) => {
        vec![$($crate::PathComponent::from($component)),*]
    };
}
