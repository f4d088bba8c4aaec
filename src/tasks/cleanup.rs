//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::TtlStore;

/// Spawns a background task that periodically sweeps expired entries.
///
/// Each tick takes the write lock, drops every expired entry (counted as
/// evictions) and refreshes the size metric. The loop ends as soon as the
/// `shutdown` sender fires or is dropped.
///
/// # Arguments
/// * `runtime` - runtime the task is spawned on
/// * `store` - shared store guarded by a reader/writer lock
/// * `interval` - period between sweeps, must be non-zero
/// * `shutdown` - one-shot stop signal
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(TtlStore::<u32>::new(ttl, 1000)));
/// let (stop_tx, stop_rx) = oneshot::channel();
/// let handle = spawn_cleanup_task(&Handle::current(), store, ttl / 2, stop_rx);
/// // Later, during shutdown:
/// let _ = stop_tx.send(());
/// ```
pub fn spawn_cleanup_task<V>(
    runtime: &Handle,
    store: Arc<RwLock<TtlStore<V>>>,
    interval: Duration,
    mut shutdown: oneshot::Receiver<()>,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    runtime.spawn(async move {
        debug!(interval_ms = interval.as_millis() as u64, "Starting TTL cleanup task");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let (removed, remaining) = {
                        let mut guard = store.write();
                        let removed = guard.purge_expired();
                        (removed, guard.len())
                    };

                    if removed > 0 {
                        info!(removed, remaining, "TTL cleanup: removed expired entries");
                    } else {
                        debug!(remaining, "TTL cleanup: no expired entries found");
                    }
                }
                _ = &mut shutdown => {
                    debug!("TTL cleanup task stopped");
                    break;
                }
            }
        }
    })
}
