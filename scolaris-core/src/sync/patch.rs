//! Field-update patches
//!
//! A [`Patch`] is a mapping from field name to new value, standing in for a
//! partial entity. Values are held as JSON so a patch can carry any subset of
//! fields; a `null` value clears an optional field. The full entity shape is
//! checked when the patch is validated, applied or built.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use serde_json::{Map, Value};

use super::entity::{Entity, EntityId};
use super::errors::PatchError;

/// Partial update for an entity of type `T`
pub struct Patch<T> {
    fields: Map<String, Value>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Patch<T> {
    /// Create an empty patch
    pub fn new() -> Self {
        Self { fields: Map::new(), _entity: PhantomData }
    }

    /// Set `field` to `value`
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Set `field` to any serializable value
    pub fn set_serialized<V: Serialize>(
        self,
        field: impl Into<String>,
        value: &V,
    ) -> Result<Self, PatchError> {
        let value = serde_json::to_value(value)
            .map_err(|source| PatchError::Shape { entity: T::NAME, source })?;
        Ok(self.set(field, value))
    }

    /// Clear an optional field
    pub fn clear(self, field: impl Into<String>) -> Self {
        self.set(field, Value::Null)
    }

    /// Patch carrying every field of `entity` (the id is left out)
    pub fn from_entity(entity: &T) -> Result<Self, PatchError> {
        let mut fields = to_object::<T>(entity)?;
        fields.remove("id");
        Ok(Self { fields, _entity: PhantomData })
    }

    /// Value set for `field`, if any
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Patched field names
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check every field name against the entity shape
    pub fn validate(&self) -> Result<(), PatchError> {
        for field in self.fields.keys() {
            if field == "id" {
                return Err(PatchError::IdNotPatchable);
            }
            if !T::has_field(field) {
                return Err(PatchError::UnknownField { field: field.clone(), entity: T::NAME });
            }
        }
        Ok(())
    }

    /// Merge the patch onto `base`, keeping the base id
    pub fn apply_to(&self, base: &T) -> Result<T, PatchError> {
        self.validate()?;
        let mut merged = to_object::<T>(base)?;
        for (field, value) in &self.fields {
            merged.insert(field.clone(), value.clone());
        }
        from_object(merged)
    }

    /// Materialize a new entity with a source-assigned id
    pub fn build(&self, id: EntityId) -> Result<T, PatchError> {
        self.validate()?;
        let mut object = self.fields.clone();
        object.insert("id".to_string(), Value::from(id));
        from_object(object)
    }
}

fn to_object<T: Entity>(entity: &T) -> Result<Map<String, Value>, PatchError> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(PatchError::Shape {
            entity: T::NAME,
            source: serde::de::Error::custom(format!("expected an object, got {other}")),
        }),
        Err(source) => Err(PatchError::Shape { entity: T::NAME, source }),
    }
}

fn from_object<T: Entity>(object: Map<String, Value>) -> Result<T, PatchError> {
    serde_json::from_value(Value::Object(object))
        .map_err(|source| PatchError::Shape { entity: T::NAME, source })
}

impl<T: Entity> Default for Patch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Patch<T> {
    fn clone(&self) -> Self {
        Self { fields: self.fields.clone(), _entity: PhantomData }
    }
}

impl<T> PartialEq for Patch<T> {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl<T> fmt::Debug for Patch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Patch").field(&self.fields).finish()
    }
}
