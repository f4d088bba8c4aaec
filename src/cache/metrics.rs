//! Cache Metrics Module
//!
//! Tracks cache effectiveness: hits, misses, evictions and current size.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Metrics ==
/// Point-in-time snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetrics {
    /// Reads that found a live entry
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Entries removed by expiry sweeps or capacity pressure
    pub evictions: u64,
    /// Total number of reads
    pub total_reads: u64,
    /// Number of entries at snapshot time
    pub total_size: u64,
}

impl CacheMetrics {
    // == Hit Rate ==
    /// Hit rate as a percentage of total reads, or 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        if self.total_reads == 0 {
            0.0
        } else {
            self.hits as f64 / self.total_reads as f64 * 100.0
        }
    }
}

// == Metrics Recorder ==
/// Live counters owned by the store.
///
/// Read-path counters are atomic so `get` can record under the shared lock.
/// `total_reads` is derived from hits and misses when a snapshot is taken.
#[derive(Debug, Default)]
pub(crate) struct MetricsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: u64,
    total_size: u64,
}

impl MetricsRecorder {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_evictions(&mut self, count: u64) {
        self.evictions += count;
    }

    pub(crate) fn set_total_size(&mut self, size: usize) {
        self.total_size = size as u64;
    }

    pub(crate) fn snapshot(&self) -> CacheMetrics {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        CacheMetrics {
            hits,
            misses,
            evictions: self.evictions,
            total_reads: hits + misses,
            total_size: self.total_size,
        }
    }
}
