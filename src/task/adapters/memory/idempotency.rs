//! In-memory idempotency store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex};

use crate::task::ports::{
    IdempotencyKey, IdempotencyRecord, IdempotencyStore, IdempotencyStoreError,
    IdempotencyStoreResult,
};

/// Thread-safe in-memory idempotency store.
///
/// The presence check and the insert happen under one lock acquisition.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdempotencyStore {
    claims: Arc<Mutex<HashMap<IdempotencyKey, String>>>,
}

impl InMemoryIdempotencyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the fingerprint stored for `key`, if it has been claimed.
    ///
    /// # Errors
    ///
    /// Returns [`IdempotencyStoreError::Persistence`] when the lock is
    /// poisoned.
    pub fn fingerprint_for(&self, key: &IdempotencyKey) -> IdempotencyStoreResult<Option<String>> {
        let claims = self.claims.lock().map_err(lock_error)?;
        Ok(claims.get(key).cloned())
    }
}

fn lock_error(err: impl std::fmt::Display) -> IdempotencyStoreError {
    IdempotencyStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl IdempotencyStore for InMemoryIdempotencyStore {
    async fn try_claim(&self, record: &IdempotencyRecord) -> IdempotencyStoreResult<bool> {
        let mut claims = self.claims.lock().map_err(lock_error)?;
        match claims.entry(record.key.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(record.fingerprint.clone());
                Ok(true)
            }
        }
    }
}
