//! Tenant Cache - TTL-bounded tenant configuration cache
//!
//! Provides a thread-safe TTL cache with capacity-bound eviction, background
//! cleanup and metrics, and a read-through resolver for per-tenant database
//! credentials held in a secret store.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;
pub mod tenant;

pub use cache::{CacheMetrics, TtlCache};
pub use config::Config;
pub use error::{CacheError, TenantError};
pub use tenant::{MemorySecretStore, ResolverConfig, SecretStore, TenantConfigResolver};
