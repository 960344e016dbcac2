//! List synchronization
//!
//! Keeps a local, ordered copy of a remote collection consistent with the
//! outcome of the fetch/create/update/delete calls made against it.
//!
//! ## Pieces
//!
//! - [`Entity`]: records with a source-assigned integer id
//! - [`Patch`]: field-update payloads, validated against the entity shape
//! - [`DataSource`]: the four remote operations, injected once
//! - [`ListManager`]: owns the collection plus the loading and origin flags

pub mod entity;
pub mod errors;
pub mod manager;
pub mod patch;
pub mod source;

pub use entity::{Entity, EntityId};
pub use errors::{PatchError, SourceError, SourceResult, SyncError, SyncResult};
pub use manager::{ListManager, ListState, SyncPhase};
pub use patch::Patch;
pub use source::{DataSource, Fetched, Synced};
