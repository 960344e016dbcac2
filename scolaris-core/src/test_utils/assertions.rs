//! Assertions over entity collections
//!
//! Panic messages list the ids involved, which is usually what a failing
//! sync test needs to show.

use std::collections::HashSet;

use crate::sync::{Entity, EntityId};

/// Ids in list order
pub fn ids_of<T: Entity>(items: &[T]) -> Vec<EntityId> {
    items.iter().map(T::id).collect()
}

/// Assert that items carry exactly `expected` ids, in order
pub fn assert_ids<T: Entity>(items: &[T], expected: &[EntityId]) {
    let actual = ids_of(items);
    if actual != expected {
        panic!("Expected ids {:?} in order, got {:?}", expected, actual);
    }
}

/// Assert that no id appears twice
pub fn assert_unique_ids<T: Entity>(items: &[T]) {
    let mut seen = HashSet::new();
    for id in ids_of(items) {
        if !seen.insert(id) {
            panic!("Duplicate id {} in {:?}", id, ids_of(items));
        }
    }
}
