//! Runtime configuration for the task backend.
//!
//! Configuration is read from environment variables:
//! - `TASKLANE_STORAGE` - Optional. `memory` or `postgres`. Defaults to `memory`.
//! - `DATABASE_URL` - Required when any backend is `postgres`.
//! - `TASKLANE_DB_POOL_SIZE` - Optional. Connection pool size. Defaults to `8`.
//! - `TASKLANE_IDEMPOTENCY_BACKEND` - Optional. `memory`, `postgres` or
//!   `redis`. Defaults to the storage backend.
//! - `REDIS_URL` - Optional. Used by the `redis` idempotency backend.
//!   Defaults to `redis://localhost:6379`.

use thiserror::Error;

/// Environment variable selecting the task storage backend.
pub const STORAGE_VAR: &str = "TASKLANE_STORAGE";
/// Environment variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Environment variable holding the connection pool size.
pub const POOL_SIZE_VAR: &str = "TASKLANE_DB_POOL_SIZE";
/// Environment variable selecting the idempotency store backend.
pub const IDEMPOTENCY_BACKEND_VAR: &str = "TASKLANE_IDEMPOTENCY_BACKEND";
/// Environment variable holding the Redis connection URL.
pub const REDIS_URL_VAR: &str = "REDIS_URL";

const DEFAULT_POOL_SIZE: u32 = 8;
/// Redis URL used when [`REDIS_URL_VAR`] is unset.
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A variable holds a value that cannot be used.
    #[error("invalid value for {var}: {value}")]
    InvalidValue {
        /// Offending variable.
        var: &'static str,
        /// Value found.
        value: String,
    },
}

/// Storage technology behind a port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Process-local storage; contents are lost on restart.
    #[default]
    Memory,
    /// `PostgreSQL` via a diesel connection pool.
    Postgres,
    /// Redis key-value store. Only the idempotency store supports it.
    Redis,
}

impl BackendKind {
    fn parse(var: &'static str, value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "redis" => Ok(Self::Redis),
            _ => Err(ConfigError::InvalidValue {
                var,
                value: value.to_owned(),
            }),
        }
    }
}

/// Task backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend for task records.
    pub storage: BackendKind,
    /// Backend for idempotency claims.
    pub idempotency: BackendKind,
    /// `PostgreSQL` connection URL.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// Redis connection URL for the `redis` idempotency backend.
    pub redis_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: BackendKind::Memory,
            idempotency: BackendKind::Memory,
            database_url: None,
            pool_size: DEFAULT_POOL_SIZE,
            redis_url: DEFAULT_REDIS_URL.to_owned(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is invalid or a required value
    /// is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is invalid or a required value
    /// is missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage = lookup(STORAGE_VAR)
            .map(|value| parse_storage_backend(&value))
            .transpose()?
            .unwrap_or_default();
        let idempotency = lookup(IDEMPOTENCY_BACKEND_VAR)
            .map(|value| BackendKind::parse(IDEMPOTENCY_BACKEND_VAR, &value))
            .transpose()?
            .unwrap_or(storage);
        let pool_size = lookup(POOL_SIZE_VAR)
            .map(|value| parse_pool_size(&value))
            .transpose()?
            .unwrap_or(DEFAULT_POOL_SIZE);
        let database_url = lookup(DATABASE_URL_VAR).filter(|url| !url.trim().is_empty());
        let redis_url = lookup(REDIS_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REDIS_URL.to_owned());

        let config = Self {
            storage,
            idempotency,
            database_url,
            pool_size,
            redis_url,
        };
        if config.requires_database() && config.database_url.is_none() {
            return Err(ConfigError::MissingVar(DATABASE_URL_VAR));
        }
        Ok(config)
    }

    /// Returns `true` when any port is backed by `PostgreSQL`.
    #[must_use]
    pub fn requires_database(&self) -> bool {
        self.storage == BackendKind::Postgres || self.idempotency == BackendKind::Postgres
    }
}

fn parse_storage_backend(value: &str) -> Result<BackendKind, ConfigError> {
    match BackendKind::parse(STORAGE_VAR, value)? {
        BackendKind::Redis => Err(ConfigError::InvalidValue {
            var: STORAGE_VAR,
            value: value.to_owned(),
        }),
        backend => Ok(backend),
    }
}

fn parse_pool_size(value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| ConfigError::InvalidValue {
            var: POOL_SIZE_VAR,
            value: value.to_owned(),
        })
}
