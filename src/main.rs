//! Tenant Cache - demo resolver process
//!
//! Resolves the sample tenants through the TTL cache and periodically reports
//! cache effectiveness until shut down.

use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tenant_cache::{CacheMetrics, Config, MemorySecretStore, ResolverConfig, TenantConfigResolver};

/// Periodic cache report, logged as JSON.
#[derive(Debug, Serialize)]
struct MetricsReport {
    timestamp: String,
    hit_rate: f64,
    #[serde(flatten)]
    metrics: CacheMetrics,
}

impl MetricsReport {
    fn new(metrics: CacheMetrics) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            hit_rate: metrics.hit_rate(),
            metrics,
        }
    }
}

/// Main entry point for the demo resolver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the secret store and resolver (starts the cache cleanup task)
/// 4. Resolve every listed tenant twice to warm the cache
/// 5. Report cache metrics on an interval
/// 6. Close the resolver on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tenant_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tenant config resolver");

    let config = Config::from_env();
    info!(
        cache_ttl_secs = config.cache_ttl_secs,
        cache_max_size = config.cache_max_size,
        secrets_prefix = %config.secrets_prefix,
        metrics_interval_secs = config.metrics_interval_secs,
        "Configuration loaded"
    );

    let store = MemorySecretStore::with_sample_tenants(&config.secrets_prefix)?;
    let resolver = TenantConfigResolver::new(store, ResolverConfig::from(&config))?;

    let tenants = resolver.list_tenants().await?;
    for tenant_id in &tenants {
        // First lookup misses, second is served from cache
        for _ in 0..2 {
            let db = resolver
                .db_config(tenant_id)
                .await
                .with_context(|| format!("resolving tenant {}", tenant_id))?;
            info!(tenant_id = %tenant_id, database = %db.database, "Resolved tenant");
        }
    }

    let period = Duration::from_secs(config.metrics_interval_secs.max(1));
    let mut ticker = tokio::time::interval(period);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = MetricsReport::new(resolver.cache_metrics());
                info!(report = %serde_json::to_string(&report)?, "Cache metrics");
            }
            _ = &mut shutdown => break,
        }
    }

    resolver.close();
    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
