//! Async test helpers
//!
//! Timeout wrappers and helpers for observing [`ListState`] changes.

use std::future::Future;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time::{timeout, Duration};

use crate::sync::{Entity, ListState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WaitError {
    #[error("operation timed out")]
    Elapsed,
    #[error("state channel closed")]
    Closed,
}

/// Run a future with a timeout, returning Ok(result) or Err on timeout
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> Result<T, WaitError>
where
    F: Future<Output = T>,
{
    timeout(duration, future).await.map_err(|_| WaitError::Elapsed)
}

/// Helper to assert a future completes within duration
pub async fn assert_completes_within<F, T>(duration: Duration, future: F) -> T
where
    F: Future<Output = T>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => panic!("Future did not complete within {:?}", duration),
    }
}

/// Helper to assert a future does NOT complete within duration
pub async fn assert_times_out<F, T>(duration: Duration, future: F)
where
    F: Future<Output = T>,
{
    if timeout(duration, future).await.is_ok() {
        panic!("Expected future to timeout, but it completed within {:?}", duration);
    }
}

/// Wait for the next published state and return a copy of it
pub async fn next_state<T: Entity>(
    rx: &mut watch::Receiver<ListState<T>>,
    duration: Duration,
) -> Result<ListState<T>, WaitError> {
    with_timeout(duration, rx.changed())
        .await?
        .map_err(|_| WaitError::Closed)?;
    Ok(rx.borrow_and_update().clone())
}

/// Default timeout duration for tests (5 seconds)
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Short timeout for tests that should fail fast (100ms)
pub const SHORT_TEST_TIMEOUT: Duration = Duration::from_millis(100);
