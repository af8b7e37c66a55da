//! `PostgreSQL` idempotency store.

use super::{TaskPgPool, models::NewIdempotencyRow, run_blocking, schema::idempotency_entry};
use crate::task::ports::{
    IdempotencyRecord, IdempotencyStore, IdempotencyStoreError, IdempotencyStoreResult,
};
use async_trait::async_trait;
use diesel::prelude::*;
use mockable::Clock;
use std::sync::Arc;

/// `PostgreSQL`-backed idempotency store.
///
/// A claim is a single `INSERT .. ON CONFLICT DO NOTHING` against the
/// primary key, so the database decides which of two racing requests wins.
/// The claim time is read from the injected clock.
pub struct PostgresIdempotencyStore<C>
where
    C: Clock + Send + Sync,
{
    pool: TaskPgPool,
    clock: Arc<C>,
}

impl<C> Clone for PostgresIdempotencyStore<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> PostgresIdempotencyStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new store from a `PostgreSQL` connection pool and the clock
    /// used to stamp claims.
    #[must_use]
    pub const fn new(pool: TaskPgPool, clock: Arc<C>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl<C> IdempotencyStore for PostgresIdempotencyStore<C>
where
    C: Clock + Send + Sync,
{
    async fn try_claim(&self, record: &IdempotencyRecord) -> IdempotencyStoreResult<bool> {
        let row = NewIdempotencyRow {
            id_key: record.key.as_str().to_owned(),
            fingerprint: record.fingerprint.clone(),
            created_at: self.clock.utc(),
        };
        run_blocking(&self.pool, move |connection| {
            let inserted = diesel::insert_into(idempotency_entry::table)
                .values(&row)
                .on_conflict_do_nothing()
                .execute(connection)
                .map_err(IdempotencyStoreError::persistence)?;
            Ok(inserted == 1)
        })
        .await
    }
}
