//! Secret Store Module
//!
//! The seam between the resolver and whatever holds tenant credentials, plus
//! an in-memory implementation for local runs and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{Result, TenantError};
use crate::tenant::{DatabaseConfig, OracleConfig, PoolConfig, QueryConfig};

// == Secret Store Trait ==
/// Read access to a remote secret store.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetches the secret string stored under `name`, or `None` if it does not exist.
    async fn get_secret(&self, name: &str) -> Result<Option<String>>;

    /// Lists the names of all secrets starting with `prefix`.
    async fn list_secrets(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Builds the secret name holding a tenant's database config.
pub fn database_secret_name(prefix: &str, tenant_id: &str) -> String {
    format!("{}/{}/database", prefix, tenant_id)
}

// == Memory Secret Store ==
/// In-memory secret store keyed by full secret name.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
    fetches: AtomicU64,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with three demo tenants under `prefix`.
    pub fn with_sample_tenants(prefix: &str) -> Result<Self> {
        let store = Self::new();
        for (tenant_id, config) in sample_tenants() {
            store.add_tenant(prefix, tenant_id, &config)?;
        }
        info!(
            tenant_count = store.secrets.read().len(),
            "Initialized memory secret store with sample tenants"
        );
        Ok(store)
    }

    /// Stores a raw secret value.
    pub fn insert_secret(&self, name: impl Into<String>, value: impl Into<String>) {
        self.secrets.write().insert(name.into(), value.into());
    }

    /// Stores a tenant's database config as JSON.
    pub fn add_tenant(&self, prefix: &str, tenant_id: &str, config: &DatabaseConfig) -> Result<()> {
        let value = serde_json::to_string(config)
            .map_err(|e| TenantError::Store(format!("failed to encode tenant {}: {}", tenant_id, e)))?;
        self.insert_secret(database_secret_name(prefix, tenant_id), value);
        info!(tenant_id, db_type = %config.db_type, "Added tenant configuration to memory store");
        Ok(())
    }

    /// Removes a tenant's database config. Returns whether it existed.
    pub fn remove_tenant(&self, prefix: &str, tenant_id: &str) -> bool {
        let removed = self
            .secrets
            .write()
            .remove(&database_secret_name(prefix, tenant_id))
            .is_some();
        info!(tenant_id, removed, "Removed tenant configuration from memory store");
        removed
    }

    /// Number of `get_secret` calls served so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_secret(&self, name: &str) -> Result<Option<String>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let secret = self.secrets.read().get(name).cloned();
        debug!(secret = name, found = secret.is_some(), "Memory secret lookup");
        Ok(secret)
    }

    async fn list_secrets(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .secrets
            .read()
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect();
        names.sort();
        Ok(names)
    }
}

// == Sample Data ==
fn sample_tenants() -> Vec<(&'static str, DatabaseConfig)> {
    vec![
        (
            "tenant1",
            DatabaseConfig {
                db_type: "postgresql".to_string(),
                host: "localhost".to_string(),
                port: 5433,
                database: "tenant1_db".to_string(),
                username: "tenant1_user".to_string(),
                password: "tenant1_pass".to_string(),
                pool: PoolConfig {
                    max_connections: Some(20),
                    idle_connections: Some(5),
                    idle_time_secs: Some(30 * 60),
                    max_lifetime_secs: None,
                },
                query: QueryConfig {
                    slow_threshold_ms: Some(200),
                    slow_enabled: true,
                    log_parameters: false,
                    log_max_length: Some(1000),
                },
                tls: None,
                oracle: None,
            },
        ),
        (
            "tenant2",
            DatabaseConfig {
                db_type: "postgresql".to_string(),
                host: "localhost".to_string(),
                port: 5434,
                database: "tenant2_db".to_string(),
                username: "tenant2_user".to_string(),
                password: "tenant2_pass".to_string(),
                pool: PoolConfig {
                    max_connections: Some(15),
                    idle_connections: Some(3),
                    idle_time_secs: Some(20 * 60),
                    max_lifetime_secs: None,
                },
                query: QueryConfig {
                    slow_threshold_ms: Some(300),
                    slow_enabled: true,
                    log_parameters: true,
                    log_max_length: Some(500),
                },
                tls: None,
                oracle: None,
            },
        ),
        (
            "tenant3",
            DatabaseConfig {
                db_type: "oracle".to_string(),
                host: "localhost".to_string(),
                port: 1522,
                database: "XE".to_string(),
                username: "tenant3_user".to_string(),
                password: "tenant3_pass".to_string(),
                pool: PoolConfig {
                    max_connections: Some(10),
                    idle_connections: Some(2),
                    idle_time_secs: Some(15 * 60),
                    max_lifetime_secs: None,
                },
                query: QueryConfig {
                    slow_threshold_ms: Some(500),
                    slow_enabled: true,
                    log_parameters: false,
                    log_max_length: Some(800),
                },
                tls: None,
                oracle: Some(OracleConfig {
                    service_name: Some("XE".to_string()),
                    sid: None,
                }),
            },
        ),
    ]
}
