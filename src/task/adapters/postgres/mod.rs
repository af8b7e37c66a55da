//! `PostgreSQL` adapters for task lifecycle persistence.

mod idempotency;
mod models;
mod repository;
mod schema;

pub use idempotency::PostgresIdempotencyStore;
pub use repository::{PostgresTaskRepository, TaskPgPool};

use crate::task::ports::{IdempotencyStoreError, TaskRepositoryError};
use diesel::pg::PgConnection;

/// Port error types that can wrap an infrastructure failure.
trait PersistenceFailure: Send + 'static {
    fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

impl PersistenceFailure for TaskRepositoryError {
    fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for IdempotencyStoreError {
    fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// Runs a diesel operation on a pooled connection off the async runtime.
async fn run_blocking<F, T, E>(pool: &TaskPgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: PersistenceFailure,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(E::wrap)?;
        f(&mut connection)
    })
    .await
    .map_err(E::wrap)?
}
