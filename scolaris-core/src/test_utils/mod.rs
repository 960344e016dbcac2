//! Test utilities and helpers for Scolaris
//!
//! A scripted data source, fixtures and assertions shared by the unit tests
//! and the integration tests under `tests/`.

pub mod assertions;
pub mod async_helpers;
pub mod fixtures;
pub mod scripted_source;

pub use assertions::*;
pub use async_helpers::*;
pub use fixtures::*;
pub use scripted_source::*;
