//! Entity contract for synchronized collections

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Identifier assigned by the data source on creation
pub type EntityId = i64;

/// A uniquely identified record that a [`ListManager`](super::ListManager) can hold.
///
/// Implementors serialize to a JSON object with an `id` field plus the
/// fields listed in [`Entity::FIELDS`]. The field list is what patches are
/// validated against.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Human readable type name, used in error messages and logs
    const NAME: &'static str;

    /// Every serialized field name except `id`
    const FIELDS: &'static [&'static str];

    /// Source-assigned identifier
    fn id(&self) -> EntityId;

    /// Whether `field` is a patchable field of this entity
    fn has_field(field: &str) -> bool {
        Self::FIELDS.contains(&field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Named;

    #[test]
    fn test_has_field() {
        assert!(Named::has_field("name"));
        assert!(!Named::has_field("id"));
        assert!(!Named::has_field("nickname"));
    }
}
