//! Configuration Module
//!
//! Handles loading resolver and cache settings from environment variables.

use std::env;
use std::str::FromStr;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in seconds applied to every cached tenant config
    pub cache_ttl_secs: u64,
    /// Maximum number of cached tenant configs
    pub cache_max_size: usize,
    /// Secret name prefix for tenant secrets
    pub secrets_prefix: String,
    /// Interval in seconds between cache metrics reports
    pub metrics_interval_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_SECS` - Cache TTL in seconds (default: 300)
    /// - `CACHE_MAX_SIZE` - Maximum cached tenants (default: 1000)
    /// - `SECRETS_PREFIX` - Secret name prefix (default: tenants)
    /// - `METRICS_INTERVAL_SECS` - Metrics report frequency in seconds (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_ttl_secs: parse_var("CACHE_TTL_SECS").unwrap_or(defaults.cache_ttl_secs),
            cache_max_size: parse_var("CACHE_MAX_SIZE").unwrap_or(defaults.cache_max_size),
            secrets_prefix: env::var("SECRETS_PREFIX")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.secrets_prefix),
            metrics_interval_secs: parse_var("METRICS_INTERVAL_SECS")
                .unwrap_or(defaults.metrics_interval_secs),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            cache_max_size: 1000,
            secrets_prefix: "tenants".to_string(),
            metrics_interval_secs: 10,
        }
    }
}
