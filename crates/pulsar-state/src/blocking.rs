//! Runs synchronous storage calls off the async executor.

use std::time::Duration;

use pulsar_storage::StorageError;

use crate::error::PersistenceFailure;

/// Runs `op` on tokio's blocking pool, optionally bounded by `timeout`.
///
/// A timed-out call is reported as [`PersistenceFailure::TimedOut`] but keeps
/// running to completion on its blocking thread; its result is dropped.
pub(crate) async fn run_blocking<T, F>(
    timeout: Option<Duration>,
    op: F,
) -> Result<T, PersistenceFailure>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    run_blocking_holding(timeout, (), op).await
}

/// Like [`run_blocking`], but keeps `guard` alive until `op` has really
/// returned, even when the caller already got `TimedOut`.
///
/// Passing an ordering lock's guard here keeps a timed-out write from
/// overlapping the next one.
pub(crate) async fn run_blocking_holding<T, F, G>(
    timeout: Option<Duration>,
    guard: G,
    op: F,
) -> Result<T, PersistenceFailure>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
    G: Send + 'static,
{
    let mut task = tokio::task::spawn_blocking(op);
    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, &mut task).await {
            Ok(joined) => joined,
            Err(_) => {
                tokio::spawn(async move {
                    let _ = task.await;
                    drop(guard);
                });
                return Err(PersistenceFailure::TimedOut(limit));
            }
        },
        None => task.await,
    };
    drop(guard);
    let result = joined.map_err(|e| PersistenceFailure::Aborted(e.to_string()))?;
    Ok(result?)
}
