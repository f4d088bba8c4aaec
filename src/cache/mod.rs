//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, capacity-bound eviction
//! and hit/miss/eviction metrics.

use std::time::Duration;

mod entry;
mod metrics;
mod store;
mod ttl_cache;


// Re-export public types
pub(crate) use entry::CacheEntry;
pub use metrics::CacheMetrics;
pub use store::TtlStore;
pub use ttl_cache::TtlCache;

// == Public Constants ==
/// Longest accepted TTL (100 years); keeps every expiry representable as an `Instant`
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);
