//! In-process data source
//!
//! Holds the authoritative collection in memory and behaves the way the
//! remote API does from the manager's point of view: it assigns ids, rejects
//! writes to unknown ids, and answers every call with an origin flag.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{InvalidSeed, SeedError};
use crate::config::SourceConfig;
use crate::sync::{
    DataSource, Entity, EntityId, Fetched, Patch, SourceError, SourceResult, Synced,
};

struct Inner<T> {
    items: Vec<T>,
    /// `None` once the id space is used up
    next_id: Option<EntityId>,
}

/// Data source backed by an in-memory collection
pub struct MemorySource<T> {
    inner: RwLock<Inner<T>>,
    from_api: bool,
    latency: Duration,
}

impl<T: Entity> MemorySource<T> {
    /// Create an empty source
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), Some(1))
    }

    /// Create a source holding `items`; new ids continue after the largest one
    ///
    /// Ids must be unique, and the largest must leave room for at least one
    /// more.
    pub fn with_items(items: Vec<T>) -> Result<Self, InvalidSeed> {
        let mut seen = HashSet::with_capacity(items.len());
        if let Some(id) = items.iter().map(T::id).find(|id| !seen.insert(*id)) {
            return Err(InvalidSeed::DuplicateId(id));
        }

        let next_id = match items.iter().map(T::id).max() {
            Some(max) => max.checked_add(1).ok_or(InvalidSeed::IdSpaceExhausted(max))?,
            None => 1,
        };
        Ok(Self::from_parts(items, Some(next_id)))
    }

    fn from_parts(items: Vec<T>, next_id: Option<EntityId>) -> Self {
        Self {
            inner: RwLock::new(Inner { items, next_id }),
            from_api: false,
            latency: Duration::ZERO,
        }
    }

    /// Load items from a JSON array file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SeedError::Read { path: path.to_path_buf(), source: e })?;
        let items: Vec<T> = serde_json::from_str(&contents)
            .map_err(|e| SeedError::Parse { path: path.to_path_buf(), source: e })?;

        debug!(entity = T::NAME, count = items.len(), path = %path.display(), "Loaded seed items");
        Self::with_items(items).map_err(|e| SeedError::Invalid { path: path.to_path_buf(), source: e })
    }

    /// Build a source from configuration, loading the seed file if one is set
    pub fn from_config(config: &SourceConfig) -> Result<Self, SeedError> {
        let source = match &config.seed_path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::new(),
        };
        Ok(source.reporting_from_api(config.report_from_api).with_latency(config.simulated_latency))
    }

    /// Origin flag attached to every answer
    pub fn reporting_from_api(mut self, from_api: bool) -> Self {
        self.from_api = from_api;
        self
    }

    /// Delay every call by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Copy of the held items
    pub async fn snapshot(&self) -> Vec<T> {
        self.inner.read().await.items.clone()
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl<T: Entity> Default for MemorySource<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found<T: Entity>(id: EntityId) -> SourceError {
    SourceError::remote(format!("{} {} not found", T::NAME, id))
}

#[async_trait]
impl<T: Entity> DataSource<T> for MemorySource<T> {
    async fn fetch_all(&self) -> SourceResult<Fetched<T>> {
        self.delay().await;
        let inner = self.inner.read().await;
        Ok(Fetched::new(inner.items.clone(), self.from_api))
    }

    async fn create(&self, patch: Patch<T>) -> SourceResult<Synced<T>> {
        self.delay().await;
        let mut inner = self.inner.write().await;
        let id = inner
            .next_id
            .ok_or_else(|| SourceError::remote(format!("{} id space exhausted", T::NAME)))?;
        let item = patch.build(id)?;
        inner.next_id = id.checked_add(1);
        inner.items.push(item.clone());
        Ok(Synced::new(item, self.from_api))
    }

    async fn update_by_id(&self, id: EntityId, patch: Patch<T>) -> SourceResult<Synced<T>> {
        self.delay().await;
        let mut inner = self.inner.write().await;
        let slot = inner
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;
        let updated = patch.apply_to(slot)?;
        *slot = updated.clone();
        Ok(Synced::new(updated, self.from_api))
    }

    async fn delete_by_id(&self, id: EntityId) -> SourceResult<()> {
        self.delay().await;
        let mut inner = self.inner.write().await;
        let before = inner.items.len();
        inner.items.retain(|item| item.id() != id);
        if inner.items.len() == before {
            return Err(not_found::<T>(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Named;
    use std::io::Write;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let source = MemorySource::with_items(vec![Named::new(4, "D")]).unwrap();

        let first = source.create(Patch::new().set("name", "E")).await.unwrap();
        let second = source.create(Patch::new().set("name", "F")).await.unwrap();

        assert_eq!(first.item.id, 5);
        assert_eq!(second.item.id, 6);
        assert_eq!(source.snapshot().await.len(), 3);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let source = MemorySource::<Named>::new();
        let created = source.create(Patch::new().set("name", "A")).await.unwrap();
        source.delete_by_id(created.item.id).await.unwrap();

        let next = source.create(Patch::new().set("name", "B")).await.unwrap();
        assert_eq!(next.item.id, created.item.id + 1);
    }

    #[tokio::test]
    async fn test_incomplete_create_is_rejected() {
        let source = MemorySource::<Named>::new();
        assert!(source.create(Patch::new()).await.is_err());

        // A rejected create does not consume an id
        let created = source.create(Patch::new().set("name", "A")).await.unwrap();
        assert_eq!(created.item.id, 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id_fail() {
        let source = MemorySource::<Named>::new();

        let err = source.update_by_id(3, Patch::new().set("name", "C")).await.unwrap_err();
        assert_eq!(err, SourceError::remote("Named 3 not found"));

        assert!(source.delete_by_id(3).await.is_err());
    }

    #[tokio::test]
    async fn test_reports_configured_origin() {
        let source = MemorySource::with_items(vec![Named::new(1, "A")]).unwrap().reporting_from_api(true);
        let fetched = source.fetch_all().await.unwrap();
        assert!(fetched.from_api);

        let updated = source.update_by_id(1, Patch::new().set("name", "A2")).await.unwrap();
        assert!(updated.from_api);
        assert_eq!(updated.item, Named::new(1, "A2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_delays_calls() {
        let source = MemorySource::<Named>::new().with_latency(Duration::from_millis(250));
        let start = tokio::time::Instant::now();

        source.fetch_all().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(250));
    }

    #[test]
    fn test_seed_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 3, "name": "C"}}, {{"id": 8, "name": "H"}}]"#).unwrap();

        let source = MemorySource::<Named>::from_json_file(file.path()).unwrap();
        let items = futures::executor::block_on(source.snapshot());
        assert_eq!(items, vec![Named::new(3, "C"), Named::new(8, "H")]);
    }

    #[test]
    fn test_seed_errors() {
        let missing = MemorySource::<Named>::from_json_file("/nonexistent/seed.json");
        assert!(matches!(missing, Err(SeedError::Read { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let bad = MemorySource::<Named>::from_json_file(file.path());
        assert!(matches!(bad, Err(SeedError::Parse { .. })));
    }

    #[test]
    fn test_seed_with_repeated_id_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 1, "name": "a"}}, {{"id": 1, "name": "b"}}]"#).unwrap();

        let result = MemorySource::<Named>::from_json_file(file.path());
        assert!(matches!(
            result,
            Err(SeedError::Invalid { source: InvalidSeed::DuplicateId(1), .. })
        ));
    }

    #[test]
    fn test_seed_at_largest_id_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 9223372036854775807, "name": "a"}}]"#).unwrap();

        let result = MemorySource::<Named>::from_json_file(file.path());
        assert!(matches!(
            result,
            Err(SeedError::Invalid { source: InvalidSeed::IdSpaceExhausted(i64::MAX), .. })
        ));
    }

    #[tokio::test]
    async fn test_create_stops_when_id_space_is_exhausted() {
        let source = MemorySource::with_items(vec![Named::new(i64::MAX - 1, "a")]).unwrap();

        let last = source.create(Patch::new().set("name", "b")).await.unwrap();
        assert_eq!(last.item.id, i64::MAX);

        let err = source.create(Patch::new().set("name", "c")).await.unwrap_err();
        assert_eq!(err, SourceError::remote("Named id space exhausted"));
        assert_eq!(source.snapshot().await.len(), 2);
    }
}
