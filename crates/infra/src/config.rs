//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use thiserror::Error;

use battstock_accounting::DeferralPolicy;
use battstock_observability::LogFormat;

pub const BIND_ADDR: &str = "BATTSTOCK_BIND_ADDR";
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DB_MAX_CONNECTIONS: &str = "BATTSTOCK_DB_MAX_CONNECTIONS";
pub const LOG_FORMAT: &str = "BATTSTOCK_LOG_FORMAT";
pub const CUSTOMER_DEFERRED_METHODS: &str = "BATTSTOCK_CUSTOMER_DEFERRED_METHODS";
pub const SUPPLIER_DEFERRED_METHODS: &str = "BATTSTOCK_SUPPLIER_DEFERRED_METHODS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// When unset the server runs against an empty in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub log_format: LogFormat,
    pub deferral_policy: DeferralPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_url: None,
            db_max_connections: 5,
            log_format: LogFormat::Json,
            deferral_policy: DeferralPolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = get(BIND_ADDR) {
            config.bind_addr = v.trim().parse().map_err(|e: std::net::AddrParseError| {
                invalid(BIND_ADDR, &v, e.to_string())
            })?;
        }

        config.database_url = get(DATABASE_URL);

        if let Some(v) = get(DB_MAX_CONNECTIONS) {
            config.db_max_connections = match v.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                Ok(_) => return Err(invalid(DB_MAX_CONNECTIONS, &v, "must be at least 1")),
                Err(e) => return Err(invalid(DB_MAX_CONNECTIONS, &v, e.to_string())),
            };
        }

        if let Some(v) = get(LOG_FORMAT) {
            config.log_format = v.parse().map_err(|e: battstock_observability::UnknownLogFormat| {
                invalid(LOG_FORMAT, &v, e.to_string())
            })?;
        }

        if let Some(v) = get(CUSTOMER_DEFERRED_METHODS) {
            config.deferral_policy.customer_methods = DeferralPolicy::parse_methods(&v);
        }
        if let Some(v) = get(SUPPLIER_DEFERRED_METHODS) {
            config.deferral_policy.supplier_methods = DeferralPolicy::parse_methods(&v);
        }

        Ok(config)
    }
}

fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.into(),
    }
}
