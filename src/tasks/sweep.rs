//! Cache Sweep Task
//!
//! Periodically drops expired entries that are never read again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlCache;

/// Shortest pause between two sweeps
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

// == Sweep Task ==
/// Handle to a running sweep. The task stops on [`SweepTask::shutdown`] or
/// when the handle is dropped.
#[derive(Debug)]
pub struct SweepTask {
    handle: JoinHandle<()>,
}

impl SweepTask {
    /// Stops the sweep and waits for the task to finish.
    pub async fn shutdown(mut self) {
        self.handle.abort();
        // A cancelled JoinError is the expected outcome
        let _ = (&mut self.handle).await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SweepTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns a task that sweeps `cache` every `interval`.
///
/// Each sweep holds the cache lock only for the scan itself, so request
/// handling is not blocked between sweeps. Intervals shorter than
/// [`MIN_SWEEP_INTERVAL`] are raised to it.
///
/// # Example
/// ```ignore
/// let cache: TtlCache<serde_json::Value> = TtlCache::new(Duration::from_secs(60));
/// let sweep = spawn_sweep_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweep.shutdown().await;
/// ```
pub fn spawn_sweep_task<V>(cache: TtlCache<V>, interval: Duration) -> SweepTask
where
    V: Clone + Send + Sync + 'static,
{
    let interval = interval.max(MIN_SWEEP_INTERVAL);

    let handle = tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "starting cache sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.sweep().await;
            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }
    });

    SweepTask { handle }
}
