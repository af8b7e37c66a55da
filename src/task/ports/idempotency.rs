//! Idempotency-store port used to deduplicate retried task creation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for idempotency store operations.
pub type IdempotencyStoreResult<T> = Result<T, IdempotencyStoreError>;

/// Caller-supplied token scoping one logical create across retries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Interprets an optional raw header value.
    ///
    /// Returns `None` when the value is absent or blank, in which case the
    /// request bypasses the idempotency guard.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.filter(|value| !value.trim().is_empty())
            .map(|value| Self(value.to_owned()))
    }

    /// Returns the key as supplied by the caller.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A claimed key together with the fingerprint of the request that claimed
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdempotencyRecord {
    /// Claimed key.
    pub key: IdempotencyKey,
    /// Hex-encoded SHA-256 fingerprint of the claiming request.
    pub fingerprint: String,
}

/// Storage contract for idempotency claims.
#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    /// Atomically claims `record.key`.
    ///
    /// Returns `true` only for the first claim of a key. Implementations must
    /// make the check and the insert a single operation so that concurrent
    /// callers never both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`IdempotencyStoreError::Persistence`] when the backing store
    /// fails.
    async fn try_claim(&self, record: &IdempotencyRecord) -> IdempotencyStoreResult<bool>;
}

/// Errors returned by idempotency store implementations.
#[derive(Debug, Clone, Error)]
pub enum IdempotencyStoreError {
    /// Persistence-layer failure.
    #[error("idempotency store error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdempotencyStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
