//! List synchronization manager
//!
//! [`ListManager`] owns an ordered in-memory collection and keeps it in step
//! with a [`DataSource`]. The collection is populated once, by a fetch that
//! starts as soon as the manager is built, then changed incrementally by the
//! outcome of each create/update/delete.
//!
//! Writes are not serialized against each other. Each mutation is applied in
//! one critical section, but overlapping calls land in the order their remote
//! calls complete, not the order they were issued.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};

use super::entity::{Entity, EntityId};
use super::errors::{SourceResult, SyncResult};
use super::patch::Patch;
use super::source::{DataSource, Fetched};
use crate::metrics::{record_items, Timer};

/// Lifecycle phase of a manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPhase {
    /// Initial fetch in flight
    Loading,
    /// Initial fetch resolved
    Ready,
    /// Initial fetch failed or panicked
    Failed(String),
}

/// State published by a manager
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    items: Vec<T>,
    from_api: bool,
    phase: SyncPhase,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self { items: Vec::new(), from_api: false, phase: SyncPhase::Loading }
    }
}

impl<T> ListState<T> {
    /// Items in insertion/fetch order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Sticky origin flag
    pub fn from_api(&self) -> bool {
        self.from_api
    }

    pub fn phase(&self) -> &SyncPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SyncPhase::Loading
    }
}

struct Shared<T: Entity> {
    source: Box<dyn DataSource<T>>,
    state: watch::Sender<ListState<T>>,
}

impl<T: Entity> Shared<T> {
    async fn initialize(&self) {
        let timer = Timer::start(T::NAME, "fetch_all");
        let outcome = track::<T, _>(timer, self.source.fetch_all().await);

        match outcome {
            Ok(Fetched { items, from_api }) => {
                info!(entity = T::NAME, count = items.len(), from_api, "Initial fetch complete");
                self.state.send_modify(|state| {
                    state.items = items;
                    state.from_api = from_api;
                    state.phase = SyncPhase::Ready;
                    record_items(T::NAME, state.items.len());
                });
            }
            Err(e) => self.fail(e.to_string()),
        }
    }

    /// Settle the initial fetch as failed
    ///
    /// Items and origin are left as they are: empty and false unless a write
    /// landed while loading.
    fn fail(&self, reason: String) {
        error!(entity = T::NAME, error = %reason, "Initial fetch failed");
        self.state.send_modify(|state| {
            state.phase = SyncPhase::Failed(reason);
            record_items(T::NAME, state.items.len());
        });
    }
}

/// Mirrors a remote collection of `T`
///
/// Building a manager spawns its initial fetch on the current tokio runtime,
/// so [`ListManager::new`] must be called from within one. Dropping the
/// manager aborts a fetch that has not resolved yet. A source that panics
/// during the fetch settles the manager in [`SyncPhase::Failed`].
pub struct ListManager<T: Entity> {
    shared: Arc<Shared<T>>,
    init_task: AbortHandle,
}

impl<T: Entity> ListManager<T> {
    /// Create a manager and start its initial fetch
    pub fn new<S>(source: S) -> Self
    where
        S: DataSource<T> + 'static,
    {
        let (state, _) = watch::channel(ListState::default());
        let shared = Arc::new(Shared { source: Box::new(source), state });

        let init = Arc::clone(&shared);
        let fetch = tokio::spawn(async move { init.initialize().await });
        let init_task = fetch.abort_handle();

        let watcher = Arc::clone(&shared);
        tokio::spawn(async move {
            if let Err(e) = fetch.await {
                if e.is_panic() {
                    watcher.fail("initial fetch panicked".to_string());
                }
            }
        });

        Self { shared, init_task }
    }

    /// Create an item through the source and append it
    ///
    /// The patch is checked against the entity shape first; an invalid patch
    /// never reaches the source. On failure the collection is unchanged.
    pub async fn create_item(&self, patch: Patch<T>) -> SyncResult<T> {
        patch.validate()?;

        let timer = Timer::start(T::NAME, "create");
        let synced = track::<T, _>(timer, self.shared.source.create(patch).await)?;
        debug!(entity = T::NAME, id = synced.item.id(), from_api = synced.from_api, "Created item");

        self.shared.state.send_modify(|state| {
            state.items.push(synced.item.clone());
            state.from_api |= synced.from_api;
            record_items(T::NAME, state.items.len());
        });

        Ok(synced.item)
    }

    /// Update an item through the source and replace it in place
    ///
    /// When no local entry has `id`, the collection is left as is and the
    /// updated item is still returned. Nothing is inserted.
    pub async fn update_item(&self, id: EntityId, patch: Patch<T>) -> SyncResult<T> {
        patch.validate()?;

        let timer = Timer::start(T::NAME, "update");
        let synced = track::<T, _>(timer, self.shared.source.update_by_id(id, patch).await)?;

        let mut replaced = false;
        self.shared.state.send_if_modified(|state| {
            if let Some(slot) = state.items.iter_mut().find(|item| item.id() == id) {
                *slot = synced.item.clone();
                replaced = true;
            }
            let was_from_api = state.from_api;
            state.from_api |= synced.from_api;
            replaced || state.from_api != was_from_api
        });

        if replaced {
            debug!(entity = T::NAME, id, from_api = synced.from_api, "Updated item");
        } else {
            warn!(entity = T::NAME, id, "Updated item is not held locally; collection unchanged");
        }

        Ok(synced.item)
    }

    /// Delete an item through the source and drop it locally
    pub async fn delete_item(&self, id: EntityId) -> SyncResult<()> {
        let timer = Timer::start(T::NAME, "delete");
        track::<T, _>(timer, self.shared.source.delete_by_id(id).await)?;

        let removed = {
            let mut removed = 0;
            self.shared.state.send_if_modified(|state| {
                let before = state.items.len();
                state.items.retain(|item| item.id() != id);
                removed = before - state.items.len();
                record_items(T::NAME, state.items.len());
                removed > 0
            });
            removed
        };
        debug!(entity = T::NAME, id, removed, "Deleted item");

        Ok(())
    }

    /// Snapshot of the held items
    pub fn items(&self) -> Vec<T> {
        self.shared.state.borrow().items.clone()
    }

    /// Held item with the given id
    pub fn get(&self, id: EntityId) -> Option<T> {
        self.shared.state.borrow().items.iter().find(|item| item.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.shared.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.state.borrow().items.is_empty()
    }

    /// True strictly while the initial fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().is_loading()
    }

    /// Whether held data has at some point been confirmed by the remote
    pub fn from_api(&self) -> bool {
        self.shared.state.borrow().from_api
    }

    pub fn phase(&self) -> SyncPhase {
        self.shared.state.borrow().phase.clone()
    }

    /// Full copy of the current state
    pub fn snapshot(&self) -> ListState<T> {
        self.shared.state.borrow().clone()
    }

    /// Receive a notification after every change
    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.shared.state.subscribe()
    }

    /// Wait until the initial fetch has settled and return the phase reached
    pub async fn wait_ready(&self) -> SyncPhase {
        let mut rx = self.shared.state.subscribe();
        let phase = match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.phase.clone(),
            // The sender lives as long as `self`
            Err(_) => self.phase(),
        };
        phase
    }
}

impl<T: Entity> Drop for ListManager<T> {
    fn drop(&mut self) {
        self.init_task.abort();
    }
}

fn track<T: Entity, R>(timer: Timer, result: SourceResult<R>) -> SourceResult<R> {
    let op = timer.op();
    timer.stop(result.is_ok());

    if let Err(e) = &result {
        debug!(entity = T::NAME, op, error = %e, "Source call failed");
    }
    result
}
