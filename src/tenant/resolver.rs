//! Tenant Config Resolver
//!
//! Read-through resolution of per-tenant database configs: check the TTL
//! cache, fall back to the secret store on a miss, cache what came back.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::cache::{CacheMetrics, TtlCache};
use crate::config::Config;
use crate::error::{Result, TenantError};
use crate::tenant::secrets::database_secret_name;
use crate::tenant::{DatabaseConfig, SecretStore};

// == Defaults ==
/// TTL used when none is configured
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Capacity used when none is configured
pub const DEFAULT_CACHE_MAX_SIZE: usize = 1000;

const DATABASE_SUFFIX: &str = "/database";

// == Resolver Config ==
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Secret name prefix; tenant secrets live at `{prefix}/{tenant}/database`
    pub prefix: String,
    /// Cache TTL, zero means default
    pub cache_ttl: Duration,
    /// Cache capacity, zero means default
    pub cache_max_size: usize,
}

impl ResolverConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_max_size: DEFAULT_CACHE_MAX_SIZE,
        }
    }
}

impl From<&Config> for ResolverConfig {
    fn from(config: &Config) -> Self {
        Self {
            prefix: config.secrets_prefix.clone(),
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            cache_max_size: config.cache_max_size,
        }
    }
}

// == Tenant Config Resolver ==
/// Resolves tenant database configs through a TTL cache.
///
/// Concurrent misses for the same tenant may both hit the secret store; the
/// second write simply refreshes the entry.
pub struct TenantConfigResolver<S> {
    store: S,
    cache: TtlCache<Arc<DatabaseConfig>>,
    prefix: String,
}

impl<S: SecretStore> TenantConfigResolver<S> {
    // == Constructor ==
    /// Builds a resolver and its cache. Outside a tokio runtime this fails
    /// with `CacheError::NoRuntime`.
    pub fn new(store: S, config: ResolverConfig) -> Result<Self> {
        if config.prefix.is_empty() {
            return Err(TenantError::EmptyPrefix);
        }

        let ttl = if config.cache_ttl.is_zero() {
            DEFAULT_CACHE_TTL
        } else {
            config.cache_ttl
        };
        let max_size = if config.cache_max_size == 0 {
            DEFAULT_CACHE_MAX_SIZE
        } else {
            config.cache_max_size
        };

        info!(
            prefix = %config.prefix,
            cache_ttl_secs = ttl.as_secs_f64(),
            cache_max_size = max_size,
            "Initializing tenant config resolver"
        );

        Ok(Self {
            store,
            cache: TtlCache::new(ttl, max_size)?,
            prefix: config.prefix,
        })
    }

    // == DB Config ==
    /// Returns the database config for `tenant_id`, from cache when possible.
    ///
    /// Failed lookups are not cached.
    pub async fn db_config(&self, tenant_id: &str) -> Result<Arc<DatabaseConfig>> {
        if tenant_id.is_empty() {
            return Err(TenantError::EmptyTenantId);
        }

        let key = cache_key(tenant_id);
        if let Some(config) = self.cache.get(&key) {
            debug!(tenant_id, "Retrieved database config from cache");
            return Ok(config);
        }

        debug!(tenant_id, "Cache miss - fetching database config from secret store");

        let config = match self.fetch_database_config(tenant_id).await {
            Ok(config) => Arc::new(config),
            Err(err) => {
                error!(tenant_id, error = %err, "Failed to fetch database config");
                return Err(err);
            }
        };

        self.cache.set(key, config.clone());

        info!(
            tenant_id,
            db_type = %config.db_type,
            host = %config.host,
            port = config.port,
            "Retrieved and cached database config"
        );

        Ok(config)
    }

    async fn fetch_database_config(&self, tenant_id: &str) -> Result<DatabaseConfig> {
        let secret = database_secret_name(&self.prefix, tenant_id);

        let value = self
            .store
            .get_secret(&secret)
            .await?
            .ok_or_else(|| TenantError::NotFound {
                tenant_id: tenant_id.to_string(),
                secret: secret.clone(),
            })?;

        if value.trim().is_empty() {
            return Err(TenantError::EmptySecret(tenant_id.to_string()));
        }

        serde_json::from_str(&value).map_err(|source| TenantError::Parse {
            tenant_id: tenant_id.to_string(),
            source,
        })
    }

    // == List Tenants ==
    /// Lists tenant ids that have a database secret under the prefix.
    pub async fn list_tenants(&self) -> Result<Vec<String>> {
        let prefix = format!("{}/", self.prefix);
        let names = self.store.list_secrets(&prefix).await?;

        let tenants: Vec<String> = names
            .iter()
            .filter_map(|name| name.strip_prefix(&prefix)?.strip_suffix(DATABASE_SUFFIX))
            .filter(|tenant_id| !tenant_id.is_empty())
            .map(str::to_string)
            .collect();

        debug!(tenant_count = tenants.len(), tenants = %tenants.join(", "), "Listed tenants");
        Ok(tenants)
    }

    // == Invalidate ==
    /// Drops one tenant's cached config so the next lookup refetches it.
    pub fn invalidate(&self, tenant_id: &str) {
        self.cache.delete(&cache_key(tenant_id));
        debug!(tenant_id, "Invalidated tenant cache");
    }

    /// Drops every cached config.
    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!("Cleared all tenant cache");
    }

    pub fn cache_metrics(&self) -> CacheMetrics {
        self.cache.metrics()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> TenantConfigResolver<S> {
    // == Close ==
    /// Stops the cache's cleanup task. Cached configs remain usable.
    pub fn close(&self) {
        self.cache.close();
        debug!("Closed tenant config resolver");
    }
}

fn cache_key(tenant_id: &str) -> String {
    format!("db_{}", tenant_id)
}
