//! Cache Store Module
//!
//! Storage engine: a HashMap of expiring entries with a hard
//! capacity bound. Callers wrap it in a reader/writer lock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::cache::metrics::MetricsRecorder;
use crate::cache::{CacheEntry, CacheMetrics, MAX_TTL};

// == TTL Store ==
/// Bounded key/value storage with a fixed TTL applied to every write.
#[derive(Debug)]
pub struct TtlStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Lifetime given to every new or overwritten entry
    ttl: Duration,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Effectiveness counters
    metrics: MetricsRecorder,
}

impl<V: Clone> TtlStore<V> {
    // == Constructor ==
    /// Creates an empty store. Policy values are validated by `TtlCache`;
    /// here the TTL is only clamped to `MAX_TTL` so expiry math cannot overflow.
    pub fn new(ttl: Duration, max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl: ttl.min(MAX_TTL),
            max_size,
            metrics: MetricsRecorder::default(),
        }
    }

    // == Get ==
    /// Returns the value for `key` if it is present and not expired.
    ///
    /// Expired entries are left in place; the cleanup sweep or capacity
    /// pressure reclaims them.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.metrics.record_hit();
                Some(entry.value.clone())
            }
            _ => {
                self.metrics.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Inserts or overwrites `key`, evicting first if the store is full.
    ///
    /// At capacity, expired entries go first; if that frees nothing, the entry
    /// with the earliest expiry is dropped.
    pub fn set(&mut self, key: String, value: V) {
        if self.entries.len() >= self.max_size {
            self.purge_expired();

            if self.entries.len() >= self.max_size {
                self.evict_earliest();
            }
        }

        let entry = CacheEntry::new(value, Instant::now(), self.ttl);
        self.entries.insert(key, entry);
        self.metrics.set_total_size(self.entries.len());
    }

    // == Delete ==
    /// Removes `key` if present. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.metrics.set_total_size(self.entries.len());
        removed
    }

    // == Clear ==
    /// Drops every entry. Cumulative counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.metrics.set_total_size(0);
    }

    // == Purge Expired ==
    /// Removes all expired entries, counting each as an eviction.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - self.entries.len();
        self.metrics.record_evictions(removed as u64);
        self.metrics.set_total_size(self.entries.len());
        removed
    }

    // == Evict Earliest ==
    /// Removes the entry closest to expiry. Ties are broken by map order.
    fn evict_earliest(&mut self) -> Option<String> {
        let key = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.expires_at)
            .map(|(key, _)| key.clone())?;

        self.entries.remove(&key);
        self.metrics.record_evictions(1);
        Some(key)
    }

    // == Metrics ==
    /// Returns a snapshot of the counters.
    pub fn metrics(&self) -> CacheMetrics {
        self.metrics.snapshot()
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    #[cfg(test)]
    pub(crate) fn expires_at(&self, key: &str) -> Option<Instant> {
        self.entries.get(key).map(|entry| entry.expires_at)
    }
}
