//! Tenant Database Configuration
//!
//! The value resolved per tenant and cached by the resolver. It is parsed from
//! the JSON document stored in the secret store:
//!
//! ```json
//! {
//!   "type": "postgresql",
//!   "host": "localhost",
//!   "port": 5433,
//!   "database": "tenant1_db",
//!   "username": "tenant1_user",
//!   "password": "tenant1_pass",
//!   "pool": { "max_connections": 20, "idle_connections": 5, "idle_time_secs": 1800 },
//!   "query": { "slow_threshold_ms": 200, "slow_enabled": true, "log_max_length": 1000 }
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// == Database Config ==
/// Connection parameters for one tenant's database.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database engine, e.g. `postgresql` or `oracle`
    #[serde(rename = "type")]
    pub db_type: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle: Option<OracleConfig>,
}

/// Connection pool sizing. Unset fields fall back to driver defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_connections: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_time_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lifetime_secs: Option<u64>,
}

impl PoolConfig {
    pub fn idle_time(&self) -> Option<Duration> {
        self.idle_time_secs.map(Duration::from_secs)
    }

    pub fn max_lifetime(&self) -> Option<Duration> {
        self.max_lifetime_secs.map(Duration::from_secs)
    }
}

/// Slow-query detection and query logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow_threshold_ms: Option<u64>,
    #[serde(default)]
    pub slow_enabled: bool,
    #[serde(default)]
    pub log_parameters: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_max_length: Option<usize>,
}

impl QueryConfig {
    pub fn slow_threshold(&self) -> Option<Duration> {
        self.slow_threshold_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<String>,
}

/// Oracle connects through either a service name or a SID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}

// Keeps credentials out of logs
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("db_type", &self.db_type)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"***")
            .field("pool", &self.pool)
            .field("query", &self.query)
            .field("tls", &self.tls)
            .field("oracle", &self.oracle)
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_secret() {
        let json = r#"{
            "type": "postgresql",
            "host": "db.internal",
            "port": 5432,
            "database": "acme",
            "username": "acme_user",
            "password": "s3cret"
        }"#;

        let config: DatabaseConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.db_type, "postgresql");
        assert_eq!(config.port, 5432);
        assert_eq!(config.pool, PoolConfig::default());
        assert!(config.tls.is_none());
        assert!(config.oracle.is_none());
    }

    #[test]
    fn test_parse_full_secret() {
        let json = r#"{
            "type": "oracle",
            "host": "localhost",
            "port": 1522,
            "database": "XE",
            "username": "u",
            "password": "p",
            "pool": { "max_connections": 10, "idle_time_secs": 900, "max_lifetime_secs": 3600 },
            "query": { "slow_threshold_ms": 500, "slow_enabled": true },
            "tls": { "mode": "require", "ca": "/etc/ca.pem" },
            "oracle": { "service_name": "XE" }
        }"#;

        let config: DatabaseConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.pool.max_connections, Some(10));
        assert_eq!(config.pool.idle_time(), Some(Duration::from_secs(900)));
        assert_eq!(config.pool.max_lifetime(), Some(Duration::from_secs(3600)));
        assert_eq!(config.query.slow_threshold(), Some(Duration::from_millis(500)));
        assert!(config.query.slow_enabled);
        assert_eq!(config.tls.unwrap().ca.as_deref(), Some("/etc/ca.pem"));
        assert_eq!(config.oracle.unwrap().service_name.as_deref(), Some("XE"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let json = r#"{"type":"postgresql","host":"h","port":1,"database":"d","username":"u","password":"topsecret"}"#;
        let config: DatabaseConfig = serde_json::from_str(json).unwrap();

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("topsecret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_missing_required_field_fails() {
        let json = r#"{"type":"postgresql","host":"h"}"#;
        assert!(serde_json::from_str::<DatabaseConfig>(json).is_err());
    }
}
