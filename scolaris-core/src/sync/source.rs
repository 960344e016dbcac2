//! DataSource Trait - Abstraction over the remote collection
//!
//! A [`ListManager`](super::ListManager) never talks to a backend directly. It
//! is handed a `DataSource` once, at construction, and mirrors whatever that
//! source reports.
//!
//! # Architecture
//!
//! ```text
//! ListManager<T>
//!       |
//!       v
//! DataSource<T> (trait)
//!       |
//!       +---> MemorySource (in-process collection)
//!       |
//!       +---> FallbackSource (primary, then local on failure)
//!       |
//!       +---> ScriptedSource (for testing)
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use super::entity::{Entity, EntityId};
use super::errors::SourceResult;
use super::patch::Patch;

/// Result of a full fetch
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    /// Items in source order
    pub items: Vec<T>,
    /// Whether the items came from the authoritative remote
    pub from_api: bool,
}

impl<T> Fetched<T> {
    pub fn new(items: Vec<T>, from_api: bool) -> Self {
        Self { items, from_api }
    }
}

/// Result of a single-item write
#[derive(Debug, Clone, PartialEq)]
pub struct Synced<T> {
    /// The item as the source now holds it
    pub item: T,
    /// Whether the write was confirmed by the authoritative remote
    pub from_api: bool,
}

impl<T> Synced<T> {
    pub fn new(item: T, from_api: bool) -> Self {
        Self { item, from_api }
    }
}

/// The four operations a list manager mirrors
#[async_trait]
pub trait DataSource<T: Entity>: Send + Sync {
    /// Fetch the whole collection
    async fn fetch_all(&self) -> SourceResult<Fetched<T>>;

    /// Create an item from a patch
    ///
    /// The source assigns the id of the returned item.
    async fn create(&self, patch: Patch<T>) -> SourceResult<Synced<T>>;

    /// Apply a patch to the item with the given id
    async fn update_by_id(&self, id: EntityId, patch: Patch<T>) -> SourceResult<Synced<T>>;

    /// Delete the item with the given id
    async fn delete_by_id(&self, id: EntityId) -> SourceResult<()>;
}

#[async_trait]
impl<T: Entity, S: DataSource<T> + ?Sized> DataSource<T> for Arc<S> {
    async fn fetch_all(&self) -> SourceResult<Fetched<T>> {
        (**self).fetch_all().await
    }

    async fn create(&self, patch: Patch<T>) -> SourceResult<Synced<T>> {
        (**self).create(patch).await
    }

    async fn update_by_id(&self, id: EntityId, patch: Patch<T>) -> SourceResult<Synced<T>> {
        (**self).update_by_id(id, patch).await
    }

    async fn delete_by_id(&self, id: EntityId) -> SourceResult<()> {
        (**self).delete_by_id(id).await
    }
}

#[async_trait]
impl<T: Entity, S: DataSource<T> + ?Sized> DataSource<T> for Box<S> {
    async fn fetch_all(&self) -> SourceResult<Fetched<T>> {
        (**self).fetch_all().await
    }

    async fn create(&self, patch: Patch<T>) -> SourceResult<Synced<T>> {
        (**self).create(patch).await
    }

    async fn update_by_id(&self, id: EntityId, patch: Patch<T>) -> SourceResult<Synced<T>> {
        (**self).update_by_id(id, patch).await
    }

    async fn delete_by_id(&self, id: EntityId) -> SourceResult<()> {
        (**self).delete_by_id(id).await
    }
}
