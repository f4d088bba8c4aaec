//! Error types for the tenant cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Construction errors for the TTL cache.
///
/// Reads, writes and evictions never fail; only an unusable policy is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// TTL must be a positive duration no longer than `MAX_TTL`
    #[error("Invalid TTL: must be greater than zero and at most 100 years")]
    InvalidTtl,

    /// Capacity must allow at least one entry
    #[error("Invalid max size: must be greater than zero")]
    InvalidMaxSize,

    /// Cleanup task needs a tokio runtime to run on
    #[error("No tokio runtime available for the cleanup task")]
    NoRuntime,
}

// == Tenant Error Enum ==
/// Errors raised while resolving a tenant's database configuration.
#[derive(Error, Debug)]
pub enum TenantError {
    /// Tenant id was empty
    #[error("Tenant ID cannot be empty")]
    EmptyTenantId,

    /// Secret prefix was empty
    #[error("Secret prefix cannot be empty")]
    EmptyPrefix,

    /// No secret exists for the tenant
    #[error("Secret not found for tenant {tenant_id} (secret: {secret})")]
    NotFound { tenant_id: String, secret: String },

    /// Secret exists but holds no value
    #[error("Secret value is empty for tenant {0}")]
    EmptySecret(String),

    /// Secret value is not a valid database configuration
    #[error("Failed to parse secret JSON for tenant {tenant_id}: {source}")]
    Parse {
        tenant_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The secret store itself failed
    #[error("Secret store error: {0}")]
    Store(String),

    /// Cache could not be built from the resolver settings
    #[error(transparent)]
    Cache(#[from] CacheError),
}

// == Result Type Alias ==
/// Convenience Result type for the tenant cache.
pub type Result<T> = std::result::Result<T, TenantError>;
