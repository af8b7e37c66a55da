//! Idempotency guard for task creation.
//!
//! A create request carrying an idempotency key is reduced to a canonical
//! payload string, hashed with SHA-256, and claimed in the idempotency store.
//! Only the first claim of a key lets creation proceed. A later request with
//! the same key is refused whether or not its payload matches the original.

use crate::task::ports::{
    IdempotencyKey, IdempotencyRecord, IdempotencyStore, IdempotencyStoreResult,
};
use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// HTTP method recorded in every create fingerprint.
pub const CREATE_METHOD: &str = "POST";

/// Route recorded in every create fingerprint.
pub const CREATE_PATH: &str = "/tasks";

const NANOS_PER_SECOND: u32 = 1_000_000_000;
const NANOS_PER_MILLI: u32 = 1_000_000;
const NANOS_PER_MICRO: u32 = 1_000;

/// The create inputs covered by a fingerprint, exactly as the caller sent
/// them (before trimming).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatePayload<'a> {
    /// Raw title.
    pub title: &'a str,
    /// Raw description, if supplied.
    pub description: Option<&'a str>,
    /// Due timestamp, if supplied.
    pub due_at: Option<DateTime<FixedOffset>>,
}

/// Hex-encoded SHA-256 digest of a canonical create payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestFingerprint(String);

impl RequestFingerprint {
    /// Computes the fingerprint of `payload`.
    #[must_use]
    pub fn of(payload: &CreatePayload<'_>) -> Self {
        let digest = Sha256::digest(canonical_payload(payload).as_bytes());
        Self(format!("{digest:x}"))
    }

    /// Returns the 64-character lowercase hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the fingerprint, returning the hex digest.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Renders the canonical string that is hashed into a fingerprint.
///
/// The layout is fixed so that fingerprints stay comparable with those
/// already held by a store: method, path, title, description, due time, with
/// `null` for an absent description or due time.
#[must_use]
pub fn canonical_payload(payload: &CreatePayload<'_>) -> String {
    let due_at = payload
        .due_at
        .map_or_else(|| "null".to_owned(), |due| format!("\"{}\"", iso_offset_timestamp(&due)));
    format!(
        "{{\"method\":\"{CREATE_METHOD}\",\"path\":\"{CREATE_PATH}\",\"title\":{},\"description\":{},\"dueAt\":{}}}",
        quote_or_null(Some(payload.title)),
        quote_or_null(payload.description),
        due_at,
    )
}

fn quote_or_null(value: Option<&str>) -> String {
    value.map_or_else(
        || "null".to_owned(),
        |text| format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\"")),
    )
}

/// Formats a timestamp as the shortest ISO-8601 local date-time plus offset.
///
/// Seconds are omitted when both they and the fraction are zero; the
/// fraction uses 3, 6 or 9 digits; a zero offset is written as `Z`.
#[must_use]
pub fn iso_offset_timestamp(at: &DateTime<FixedOffset>) -> String {
    let local = at.naive_local();
    let mut rendered = match local.year() {
        year if year > 9999 => format!("+{year}"),
        year if year < 0 => format!("-{:04}", year.unsigned_abs()),
        year => format!("{year:04}"),
    };
    rendered.push_str(&format!(
        "-{:02}-{:02}T{:02}:{:02}",
        local.month(),
        local.day(),
        local.hour(),
        local.minute()
    ));

    let second = local.second();
    let nanos = local.nanosecond().rem_euclid(NANOS_PER_SECOND);
    if second > 0 || nanos > 0 {
        rendered.push_str(&format!(":{second:02}"));
    }
    if nanos > 0 {
        let fraction = if nanos.rem_euclid(NANOS_PER_MILLI) == 0 {
            format!(".{:03}", nanos.div_euclid(NANOS_PER_MILLI))
        } else if nanos.rem_euclid(NANOS_PER_MICRO) == 0 {
            format!(".{:06}", nanos.div_euclid(NANOS_PER_MICRO))
        } else {
            format!(".{nanos:09}")
        };
        rendered.push_str(&fraction);
    }

    rendered.push_str(&offset_id(at.offset().local_minus_utc()));
    rendered
}

fn offset_id(total_seconds: i32) -> String {
    if total_seconds == 0 {
        return "Z".to_owned();
    }
    let sign = if total_seconds < 0 { '-' } else { '+' };
    let magnitude = total_seconds.unsigned_abs();
    let hours = magnitude.div_euclid(3600);
    let minutes = magnitude.div_euclid(60).rem_euclid(60);
    let seconds = magnitude.rem_euclid(60);
    if seconds == 0 {
        format!("{sign}{hours:02}:{minutes:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Outcome of passing a create request through the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// No usable key was supplied; the guard did not run.
    Bypassed,
    /// This request claimed the key and may proceed.
    Claimed(IdempotencyRecord),
    /// The key had already been claimed; the request must not proceed.
    Duplicate(IdempotencyKey),
}

/// Deduplicates retried create requests through an [`IdempotencyStore`].
pub struct IdempotencyGuard<S>
where
    S: IdempotencyStore + ?Sized,
{
    store: Arc<S>,
}

impl<S> Clone for IdempotencyGuard<S>
where
    S: IdempotencyStore + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> IdempotencyGuard<S>
where
    S: IdempotencyStore + ?Sized,
{
    /// Creates a guard backed by `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Decides whether a create request may proceed.
    ///
    /// Makes exactly one claim attempt when a key is present and none
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::task::ports::IdempotencyStoreError`] when the store
    /// fails.
    pub async fn admit(
        &self,
        key: Option<&IdempotencyKey>,
        payload: &CreatePayload<'_>,
    ) -> IdempotencyStoreResult<Admission> {
        let Some(key) = key else {
            return Ok(Admission::Bypassed);
        };

        let record = IdempotencyRecord {
            key: key.clone(),
            fingerprint: RequestFingerprint::of(payload).into_inner(),
        };
        if self.store.try_claim(&record).await? {
            Ok(Admission::Claimed(record))
        } else {
            Ok(Admission::Duplicate(record.key))
        }
    }
}
