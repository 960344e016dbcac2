//! Concrete data sources
//!
//! - [`MemorySource`]: in-process collection, optionally seeded from JSON
//! - [`FallbackSource`]: remote-first, local on failure

use std::path::PathBuf;

use thiserror::Error;

use crate::config::SourceConfig;
use crate::sync::{DataSource, Entity, EntityId};

mod fallback;
mod memory;

pub use fallback::FallbackSource;
pub use memory::MemorySource;

/// Errors while loading seed data for a local source
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid seed file {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: InvalidSeed,
    },
}

/// Seed items a source refuses to hold
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSeed {
    #[error("id {0} appears more than once")]
    DuplicateId(EntityId),

    #[error("id {0} leaves no room for new ids")]
    IdSpaceExhausted(EntityId),
}

/// Wrap `primary` according to the source configuration
///
/// With `fallback_to_local` set, the primary is paired with a
/// [`MemorySource`] built from the same configuration.
pub fn from_config<T, P>(
    primary: P,
    config: &SourceConfig,
) -> Result<Box<dyn DataSource<T>>, SeedError>
where
    T: Entity,
    P: DataSource<T> + 'static,
{
    if config.fallback_to_local {
        let local = MemorySource::<T>::from_config(config)?;
        Ok(Box::new(FallbackSource::new(primary, local)))
    } else {
        Ok(Box::new(primary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{Fetched, SourceError};
    use crate::test_utils::{Named, ScriptedSource};
    use std::io::Write;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_from_config_without_fallback_is_primary() {
        let primary = Arc::new(ScriptedSource::<Named>::new());
        primary.on_fetch(Err(SourceError::remote("offline")));

        let config = SourceConfig { fallback_to_local: false, ..SourceConfig::default() };
        let source = from_config(Arc::clone(&primary), &config).unwrap();

        assert!(source.fetch_all().await.is_err());
    }

    #[tokio::test]
    async fn test_from_config_with_seeded_fallback() {
        let mut seed = tempfile::NamedTempFile::new().unwrap();
        write!(seed, r#"[{{"id": 1, "name": "seeded"}}]"#).unwrap();

        let primary = Arc::new(ScriptedSource::<Named>::new());
        primary.on_fetch(Err(SourceError::remote("offline")));

        let config = SourceConfig {
            fallback_to_local: true,
            seed_path: Some(seed.path().to_path_buf()),
            ..SourceConfig::default()
        };
        let source = from_config(Arc::clone(&primary), &config).unwrap();

        let fetched = source.fetch_all().await.unwrap();
        assert_eq!(fetched, Fetched::new(vec![Named::new(1, "seeded")], false));
    }

    #[test]
    fn test_from_config_reports_missing_seed() {
        let config = SourceConfig {
            fallback_to_local: true,
            seed_path: Some(PathBuf::from("/nonexistent/students.json")),
            ..SourceConfig::default()
        };
        let result = from_config(Arc::new(ScriptedSource::<Named>::new()), &config);
        assert!(matches!(result, Err(SeedError::Read { .. })));
    }
}
