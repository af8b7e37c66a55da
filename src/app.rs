//! Composition root.
//!
//! Builds the adapters selected by [`AppConfig`], the listing strategy map
//! and the task service in one place at process start.

use crate::config::{AppConfig, BackendKind, ConfigError, DATABASE_URL_VAR, STORAGE_VAR};
use crate::task::{
    adapters::{
        memory::{InMemoryIdempotencyStore, InMemoryTaskRepository},
        postgres::{PostgresIdempotencyStore, PostgresTaskRepository, TaskPgPool},
        redis::RedisIdempotencyStore,
    },
    ports::{IdempotencyStore, TaskRepository},
    services::{
        MissingDefaultStrategy, TaskLifecycleService, TaskListingDispatcher,
        listing::builtin_strategies,
    },
};
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use mockable::DefaultClock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Task service over runtime-selected adapters.
pub type TaskService =
    TaskLifecycleService<dyn TaskRepository, dyn IdempotencyStore, DefaultClock>;

/// Startup failures.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is incomplete or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The connection pool could not be created.
    #[error("failed to create connection pool: {0}")]
    Pool(#[from] PoolError),
    /// The Redis client could not be created.
    #[error("failed to create redis client: {0}")]
    Redis(#[from] redis::RedisError),
    /// The listing strategy map is unusable.
    #[error(transparent)]
    Listing(#[from] MissingDefaultStrategy),
}

/// Builds the task service described by `config`.
///
/// # Errors
///
/// Returns [`AppError`] when configuration is inconsistent, the database
/// pool or Redis client cannot be created, or the listing strategies lack
/// the default.
pub fn build_service(config: &AppConfig) -> Result<TaskService, AppError> {
    let clock = Arc::new(DefaultClock);
    let pool = if config.requires_database() {
        let url = config
            .database_url
            .as_deref()
            .ok_or(ConfigError::MissingVar(DATABASE_URL_VAR))?;
        Some(connect(url, config.pool_size)?)
    } else {
        None
    };

    let repository: Arc<dyn TaskRepository> = match (config.storage, &pool) {
        (BackendKind::Postgres, Some(pool)) => Arc::new(PostgresTaskRepository::new(pool.clone())),
        (BackendKind::Postgres, None) => {
            return Err(ConfigError::MissingVar(DATABASE_URL_VAR).into());
        }
        (BackendKind::Redis, _) => {
            return Err(ConfigError::InvalidValue {
                var: STORAGE_VAR,
                value: "redis".to_owned(),
            }
            .into());
        }
        (BackendKind::Memory, _) => Arc::new(InMemoryTaskRepository::new()),
    };
    let idempotency_store: Arc<dyn IdempotencyStore> = match (config.idempotency, &pool) {
        (BackendKind::Postgres, Some(pool)) => Arc::new(PostgresIdempotencyStore::new(
            pool.clone(),
            Arc::clone(&clock),
        )),
        (BackendKind::Postgres, None) => {
            return Err(ConfigError::MissingVar(DATABASE_URL_VAR).into());
        }
        (BackendKind::Redis, _) => Arc::new(RedisIdempotencyStore::open(&config.redis_url)?),
        (BackendKind::Memory, _) => Arc::new(InMemoryIdempotencyStore::new()),
    };

    let service = assemble(repository, idempotency_store, clock)?;
    info!(
        storage = ?config.storage,
        idempotency = ?config.idempotency,
        "task service assembled"
    );
    Ok(service)
}

/// Builds a task service backed entirely by in-memory adapters.
///
/// # Errors
///
/// Returns [`AppError::Listing`] if the built-in strategies lack the default.
pub fn in_memory_service() -> Result<TaskService, AppError> {
    build_service(&AppConfig::default())
}

/// Wires the listing dispatcher and the service around the given ports.
///
/// # Errors
///
/// Returns [`MissingDefaultStrategy`] if the built-in strategy map has no
/// default entry.
pub fn assemble<R, S, C>(
    repository: Arc<R>,
    idempotency_store: Arc<S>,
    clock: Arc<C>,
) -> Result<TaskLifecycleService<R, S, C>, MissingDefaultStrategy>
where
    R: TaskRepository + ?Sized + 'static,
    S: IdempotencyStore + ?Sized,
    C: mockable::Clock + Send + Sync,
{
    let listing = TaskListingDispatcher::new(builtin_strategies(&repository))?;
    Ok(TaskLifecycleService::new(
        repository,
        idempotency_store,
        listing,
        clock,
    ))
}

fn connect(url: &str, pool_size: u32) -> Result<TaskPgPool, PoolError> {
    Pool::builder()
        .max_size(pool_size)
        .build(ConnectionManager::new(url))
}
