//! Scripted [`DataSource`] for driving a [`ListManager`](crate::sync::ListManager)
//! through exact sequences of responses
//!
//! Each operation has its own queue of responses, consumed in order. A
//! response can be gated so the call stays pending until the test opens the
//! gate, which is how completion order is controlled in concurrency tests.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::{oneshot, watch};

use crate::sync::{DataSource, Entity, EntityId, Fetched, Patch, SourceError, SourceResult, Synced};

/// A call received by a [`ScriptedSource`], in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchAll,
    Create,
    Update(EntityId),
    Delete(EntityId),
}

/// Holds a scripted response back until opened
///
/// Dropping the gate releases the response as well.
#[derive(Debug)]
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    pub fn open(self) {
        let _ = self.0.send(());
    }
}

struct Scripted<R> {
    result: SourceResult<R>,
    gate: Option<oneshot::Receiver<()>>,
}

struct Queues<T> {
    fetch: VecDeque<Scripted<Fetched<T>>>,
    create: VecDeque<Scripted<Synced<T>>>,
    update: VecDeque<Scripted<Synced<T>>>,
    delete: VecDeque<Scripted<()>>,
}

/// Data source that replays queued responses and records every call
pub struct ScriptedSource<T> {
    queues: Mutex<Queues<T>>,
    calls: Mutex<Vec<Call>>,
    call_count: watch::Sender<usize>,
}

impl<T: Entity> Default for ScriptedSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<G>(mutex: &Mutex<G>) -> MutexGuard<'_, G> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn gated<R>(result: SourceResult<R>) -> (Scripted<R>, Gate) {
    let (tx, rx) = oneshot::channel();
    (Scripted { result, gate: Some(rx) }, Gate(tx))
}

impl<T: Entity> ScriptedSource<T> {
    pub fn new() -> Self {
        let (call_count, _) = watch::channel(0);
        Self {
            queues: Mutex::new(Queues {
                fetch: VecDeque::new(),
                create: VecDeque::new(),
                update: VecDeque::new(),
                delete: VecDeque::new(),
            }),
            calls: Mutex::new(Vec::new()),
            call_count,
        }
    }

    pub fn on_fetch(&self, result: SourceResult<Fetched<T>>) {
        lock(&self.queues).fetch.push_back(Scripted { result, gate: None });
    }

    pub fn on_fetch_gated(&self, result: SourceResult<Fetched<T>>) -> Gate {
        let (scripted, gate) = gated(result);
        lock(&self.queues).fetch.push_back(scripted);
        gate
    }

    pub fn on_create(&self, result: SourceResult<Synced<T>>) {
        lock(&self.queues).create.push_back(Scripted { result, gate: None });
    }

    pub fn on_create_gated(&self, result: SourceResult<Synced<T>>) -> Gate {
        let (scripted, gate) = gated(result);
        lock(&self.queues).create.push_back(scripted);
        gate
    }

    pub fn on_update(&self, result: SourceResult<Synced<T>>) {
        lock(&self.queues).update.push_back(Scripted { result, gate: None });
    }

    pub fn on_update_gated(&self, result: SourceResult<Synced<T>>) -> Gate {
        let (scripted, gate) = gated(result);
        lock(&self.queues).update.push_back(scripted);
        gate
    }

    pub fn on_delete(&self, result: SourceResult<()>) {
        lock(&self.queues).delete.push_back(Scripted { result, gate: None });
    }

    pub fn on_delete_gated(&self, result: SourceResult<()>) -> Gate {
        let (scripted, gate) = gated(result);
        lock(&self.queues).delete.push_back(scripted);
        gate
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    /// Wait until at least `count` calls have been received
    pub async fn wait_for_calls(&self, count: usize) {
        let mut rx = self.call_count.subscribe();
        // The sender lives as long as `self`
        let _ = rx.wait_for(|received| *received >= count).await;
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
        self.call_count.send_modify(|received| *received += 1);
    }
}

async fn replay<R>(scripted: Option<Scripted<R>>, op: &str) -> SourceResult<R> {
    let Some(Scripted { result, gate }) = scripted else {
        return Err(SourceError::remote(format!("no scripted response for {op}")));
    };
    if let Some(gate) = gate {
        // A dropped gate counts as opened
        let _ = gate.await;
    }
    result
}

#[async_trait]
impl<T: Entity> DataSource<T> for ScriptedSource<T> {
    async fn fetch_all(&self) -> SourceResult<Fetched<T>> {
        self.record(Call::FetchAll);
        let next = lock(&self.queues).fetch.pop_front();
        match next {
            Some(scripted) => replay(Some(scripted), "fetch_all").await,
            None => Ok(Fetched::new(Vec::new(), false)),
        }
    }

    async fn create(&self, _fields: Patch<T>) -> SourceResult<Synced<T>> {
        self.record(Call::Create);
        let next = lock(&self.queues).create.pop_front();
        replay(next, "create").await
    }

    async fn update_by_id(&self, id: EntityId, _fields: Patch<T>) -> SourceResult<Synced<T>> {
        self.record(Call::Update(id));
        let next = lock(&self.queues).update.pop_front();
        replay(next, "update_by_id").await
    }

    async fn delete_by_id(&self, id: EntityId) -> SourceResult<()> {
        self.record(Call::Delete(id));
        let next = lock(&self.queues).delete.pop_front();
        replay(next, "delete_by_id").await
    }
}
