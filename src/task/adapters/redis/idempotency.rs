//! Redis idempotency store.

use crate::task::ports::{
    IdempotencyRecord, IdempotencyStore, IdempotencyStoreError, IdempotencyStoreResult,
};
use ::redis::{Client, RedisError, Value, aio::MultiplexedConnection};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

/// Reply to `SET .. NX` that is neither `OK` nor nil.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("unexpected reply to SET NX: {0:?}")]
pub struct UnexpectedClaimReply(pub Value);

/// Interprets the reply to `SET key fingerprint NX`.
///
/// `OK` means the key was absent and is now claimed; nil means another
/// request holds it.
///
/// # Errors
///
/// Returns [`UnexpectedClaimReply`] for any other reply.
pub fn claim_from_reply(reply: Value) -> Result<bool, UnexpectedClaimReply> {
    match reply {
        Value::Okay => Ok(true),
        Value::SimpleString(status) if status.eq_ignore_ascii_case("OK") => Ok(true),
        Value::Nil => Ok(false),
        other => Err(UnexpectedClaimReply(other)),
    }
}

/// Redis-backed idempotency store.
///
/// A claim is one `SET key fingerprint NX`, so the server decides which of
/// two racing requests wins. Keys are stored exactly as supplied and never
/// expire. The connection is opened on first use and shared afterwards.
pub struct RedisIdempotencyStore {
    client: Client,
    connection: OnceCell<MultiplexedConnection>,
}

impl RedisIdempotencyStore {
    /// Creates a store for the server at `url` without connecting.
    ///
    /// # Errors
    ///
    /// Returns [`RedisError`] when `url` is not a valid Redis URL.
    pub fn open(url: &str) -> Result<Self, RedisError> {
        Ok(Self {
            client: Client::open(url)?,
            connection: OnceCell::new(),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, RedisError> {
        self.connection
            .get_or_try_init(|| self.client.get_multiplexed_async_connection())
            .await
            .cloned()
    }
}

#[async_trait]
impl IdempotencyStore for RedisIdempotencyStore {
    async fn try_claim(&self, record: &IdempotencyRecord) -> IdempotencyStoreResult<bool> {
        let mut connection = self
            .connection()
            .await
            .map_err(IdempotencyStoreError::persistence)?;
        let reply: Value = ::redis::cmd("SET")
            .arg(record.key.as_str())
            .arg(&record.fingerprint)
            .arg("NX")
            .query_async(&mut connection)
            .await
            .map_err(IdempotencyStoreError::persistence)?;
        let claimed = claim_from_reply(reply).map_err(IdempotencyStoreError::persistence)?;
        debug!(idempotency_key = %record.key, claimed, "redis claim attempted");
        Ok(claimed)
    }
}
