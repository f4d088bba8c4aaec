//! Integration Tests for the Tenant Resolver
//!
//! Exercises the read-through path end to end through the public API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tenant_cache::error::Result;
use tenant_cache::tenant::{database_secret_name, DatabaseConfig};
use tenant_cache::{MemorySecretStore, ResolverConfig, SecretStore, TenantConfigResolver, TenantError};
use tokio_test::{assert_err, assert_ok};

// == Helper Functions ==

const PREFIX: &str = "tenants";

fn short_lived(ttl: Duration, max_size: usize) -> ResolverConfig {
    ResolverConfig {
        prefix: PREFIX.to_string(),
        cache_ttl: ttl,
        cache_max_size: max_size,
    }
}

fn sample_resolver(config: ResolverConfig) -> TenantConfigResolver<MemorySecretStore> {
    let store = MemorySecretStore::with_sample_tenants(PREFIX).unwrap();
    TenantConfigResolver::new(store, config).unwrap()
}

/// Secret store that fails every call while `down` is set.
struct FlakyStore {
    inner: MemorySecretStore,
    down: AtomicBool,
}

#[async_trait]
impl SecretStore for FlakyStore {
    async fn get_secret(&self, name: &str) -> Result<Option<String>> {
        if self.down.load(Ordering::SeqCst) {
            return Err(TenantError::Store("connection refused".to_string()));
        }
        self.inner.get_secret(name).await
    }

    async fn list_secrets(&self, prefix: &str) -> Result<Vec<String>> {
        if self.down.load(Ordering::SeqCst) {
            return Err(TenantError::Store("connection refused".to_string()));
        }
        self.inner.list_secrets(prefix).await
    }
}

// == Read-through ==

#[tokio::test]
async fn test_resolves_all_sample_tenants() {
    let resolver = sample_resolver(ResolverConfig::new(PREFIX));

    let tenants = assert_ok!(resolver.list_tenants().await);
    assert_eq!(tenants.len(), 3);

    for tenant_id in &tenants {
        let config = assert_ok!(resolver.db_config(tenant_id).await);
        assert_eq!(config.username, format!("{}_user", tenant_id));
    }

    let oracle = assert_ok!(resolver.db_config("tenant3").await);
    assert_eq!(oracle.db_type, "oracle");

    let metrics = resolver.cache_metrics();
    assert_eq!(metrics.misses, 3);
    assert_eq!(metrics.hits, 1);
    assert_eq!(metrics.total_size, 3);
    assert_eq!(metrics.hit_rate(), 25.0);
    resolver.close();
}

#[tokio::test]
async fn test_expired_entry_is_refetched() {
    let resolver = sample_resolver(short_lived(Duration::from_millis(100), 10));

    assert_ok!(resolver.db_config("tenant1").await);
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_ok!(resolver.db_config("tenant1").await);

    assert_eq!(resolver.store().fetch_count(), 2);
    assert_eq!(resolver.cache_metrics().misses, 2);
}

#[tokio::test]
async fn test_updated_secret_visible_after_invalidate() {
    let resolver = sample_resolver(ResolverConfig::new(PREFIX));

    let before = assert_ok!(resolver.db_config("tenant1").await);
    let mut moved: DatabaseConfig = (*before).clone();
    moved.host = "db-replica.internal".to_string();
    resolver.store().add_tenant(PREFIX, "tenant1", &moved).unwrap();

    // Still cached
    let cached = assert_ok!(resolver.db_config("tenant1").await);
    assert_eq!(cached.host, "localhost");

    resolver.invalidate("tenant1");
    let fresh = assert_ok!(resolver.db_config("tenant1").await);
    assert_eq!(fresh.host, "db-replica.internal");
}

#[tokio::test]
async fn test_clear_cache_keeps_counters() {
    let resolver = sample_resolver(ResolverConfig::new(PREFIX));

    assert_ok!(resolver.db_config("tenant1").await);
    assert_ok!(resolver.db_config("tenant1").await);
    resolver.clear_cache();

    let metrics = resolver.cache_metrics();
    assert_eq!(metrics.total_size, 0);
    assert_eq!(metrics.hits, 1);
    assert_eq!(metrics.misses, 1);
}

#[tokio::test]
async fn test_capacity_bound_applies_to_tenants() {
    let resolver = sample_resolver(short_lived(Duration::from_secs(60), 2));

    for tenant_id in ["tenant1", "tenant2", "tenant3"] {
        assert_ok!(resolver.db_config(tenant_id).await);
    }

    let metrics = resolver.cache_metrics();
    assert_eq!(metrics.total_size, 2);
    assert_eq!(metrics.evictions, 1);
}

#[tokio::test]
async fn test_close_keeps_cache_usable() {
    let resolver = sample_resolver(ResolverConfig::new(PREFIX));

    assert_ok!(resolver.db_config("tenant2").await);
    resolver.close();
    resolver.close();

    assert_ok!(resolver.db_config("tenant2").await);
    assert_eq!(resolver.store().fetch_count(), 1);
}

// == Failures ==

#[tokio::test]
async fn test_unknown_tenant_is_not_found() {
    let resolver = sample_resolver(ResolverConfig::new(PREFIX));

    let err = assert_err!(resolver.db_config("ghost").await);
    match err {
        TenantError::NotFound { tenant_id, secret } => {
            assert_eq!(tenant_id, "ghost");
            assert_eq!(secret, "tenants/ghost/database");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(resolver.cache_metrics().total_size, 0);
}

#[tokio::test]
async fn test_malformed_and_empty_secrets() {
    let resolver = sample_resolver(ResolverConfig::new(PREFIX));
    resolver
        .store()
        .insert_secret(database_secret_name(PREFIX, "broken"), "{not json");
    resolver
        .store()
        .insert_secret(database_secret_name(PREFIX, "blank"), "  ");

    let err = assert_err!(resolver.db_config("broken").await);
    assert!(matches!(err, TenantError::Parse { .. }));

    let err = assert_err!(resolver.db_config("blank").await);
    assert!(matches!(err, TenantError::EmptySecret(ref id) if id == "blank"));

    // Failures are never cached
    assert_eq!(resolver.cache_metrics().total_size, 0);
}

#[tokio::test]
async fn test_store_outage_surfaces_and_recovers() {
    let store = FlakyStore {
        inner: MemorySecretStore::with_sample_tenants(PREFIX).unwrap(),
        down: AtomicBool::new(true),
    };
    let resolver = TenantConfigResolver::new(store, ResolverConfig::new(PREFIX)).unwrap();

    let err = assert_err!(resolver.db_config("tenant1").await);
    assert!(matches!(err, TenantError::Store(_)));
    assert!(matches!(resolver.list_tenants().await, Err(TenantError::Store(_))));

    resolver.store().down.store(false, Ordering::SeqCst);
    let config = assert_ok!(resolver.db_config("tenant1").await);
    assert_eq!(config.port, 5433);
}

#[tokio::test]
async fn test_concurrent_lookups_share_cached_value() {
    let resolver = Arc::new(sample_resolver(ResolverConfig::new(PREFIX)));
    let first = assert_ok!(resolver.db_config("tenant2").await);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.db_config("tenant2").await })
        })
        .collect();

    for handle in handles {
        let config = assert_ok!(handle.await.unwrap());
        assert!(Arc::ptr_eq(&config, &first));
    }
    assert_eq!(resolver.store().fetch_count(), 1);
}
