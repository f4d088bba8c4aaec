//! TTL Cache Module
//!
//! Thread-safe handle over `TtlStore` that owns the background cleanup task.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::debug;

use crate::cache::{CacheMetrics, TtlStore, MAX_TTL};
use crate::error::CacheError;
use crate::tasks::spawn_cleanup_task;

// == TTL Cache ==
/// Size-bounded cache with a fixed TTL and a self-driven cleanup loop.
///
/// Reads share one lock; writes, deletes, clears and sweeps are exclusive.
/// The cleanup loop runs every `ttl / 2` until [`TtlCache::close`] is called
/// or the cache is dropped. Closing only stops the loop: data stays readable
/// and writable afterwards.
///
/// Values are cloned on `get`. Cache an `Arc<T>` to hand out shared handles
/// instead of copies.
///
/// # Example
/// ```ignore
/// let cache = TtlCache::new(Duration::from_secs(300), 1000)?;
/// cache.set("db_acme", Arc::new(config));
/// let hit = cache.get("db_acme");
/// cache.close();
/// ```
#[derive(Debug)]
pub struct TtlCache<V> {
    store: Arc<RwLock<TtlStore<V>>>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty cache and starts its cleanup task on the current
    /// tokio runtime.
    ///
    /// # Errors
    /// - `CacheError::InvalidTtl` for a zero TTL or one above `MAX_TTL`
    /// - `CacheError::InvalidMaxSize` for a zero capacity
    /// - `CacheError::NoRuntime` when called outside a tokio runtime
    pub fn new(ttl: Duration, max_size: usize) -> Result<Self, CacheError> {
        if ttl.is_zero() || ttl > MAX_TTL {
            return Err(CacheError::InvalidTtl);
        }
        if max_size == 0 {
            return Err(CacheError::InvalidMaxSize);
        }
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        let store = Arc::new(RwLock::new(TtlStore::new(ttl, max_size)));
        let (stop_tx, stop_rx) = oneshot::channel();

        // A 1ns TTL would otherwise give a zero period, which tokio rejects
        let period = (ttl / 2).max(Duration::from_millis(1));
        spawn_cleanup_task(&runtime, store.clone(), period, stop_rx);

        Ok(Self {
            store,
            shutdown: Mutex::new(Some(stop_tx)),
        })
    }

    // == Get ==
    /// Returns the live value for `key`, or `None` if absent or expired.
    pub fn get(&self, key: &str) -> Option<V> {
        self.store.read().get(key)
    }

    // == Set ==
    /// Stores `value` under `key` with a fresh expiry.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.store.write().set(key.into(), value);
    }

    // == Delete ==
    /// Removes `key`; absent keys are ignored.
    pub fn delete(&self, key: &str) {
        self.store.write().delete(key);
    }

    // == Clear ==
    /// Removes every entry without resetting cumulative counters.
    pub fn clear(&self) {
        self.store.write().clear();
    }

    // == Size ==
    /// Current entry count, including expired entries not yet swept.
    pub fn size(&self) -> usize {
        self.store.read().len()
    }

    // == Metrics ==
    /// Consistent snapshot of the cache counters.
    pub fn metrics(&self) -> CacheMetrics {
        self.store.read().metrics()
    }

    pub fn ttl(&self) -> Duration {
        self.store.read().ttl()
    }

    pub fn max_size(&self) -> usize {
        self.store.read().max_size()
    }
}

impl<V> TtlCache<V> {
    // == Close ==
    /// Stops the cleanup task. Safe to call any number of times.
    pub fn close(&self) {
        if let Some(stop_tx) = self.shutdown.lock().take() {
            // Receiver is gone only if the task already ended
            let _ = stop_tx.send(());
            debug!("TTL cache closed");
        }
    }

    /// Returns true once `close` has run.
    pub fn is_closed(&self) -> bool {
        self.shutdown.lock().is_none()
    }
}

impl<V> Drop for TtlCache<V> {
    fn drop(&mut self) {
        self.close();
    }
}
