//! Scolaris core: list synchronization for school administration data
//!
//! A [`ListManager`] mirrors one remote collection (students, fees,
//! payments, stock items) and keeps it in step with a [`DataSource`].
//! Sources are swappable; [`sources`] provides an in-memory store and a
//! fallback wrapper that degrades to it when the remote is unreachable.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod sources;
pub mod sync;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{Config, ConfigError};
pub use logging::{init_logging, LogLevel};
pub use sync::{DataSource, Entity, EntityId, ListManager, Patch, SyncError, SyncPhase};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Ensure the main exports are accessible
        let _ = LogLevel::Info;
        let _ = SyncPhase::Loading;
        let _ = Config::default();
    }
}
