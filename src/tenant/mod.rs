//! Tenant Module
//!
//! Resolves per-tenant database configurations from a secret store, caching
//! results in a `TtlCache` to avoid repeated remote lookups.

mod database;
mod resolver;
mod secrets;

pub use database::{DatabaseConfig, OracleConfig, PoolConfig, QueryConfig, TlsConfig};
pub use resolver::{
    ResolverConfig, TenantConfigResolver, DEFAULT_CACHE_MAX_SIZE, DEFAULT_CACHE_TTL,
};
pub use secrets::{database_secret_name, MemorySecretStore, SecretStore};
