//! Redis adapters for task lifecycle ports.

mod idempotency;

pub use idempotency::{RedisIdempotencyStore, UnexpectedClaimReply, claim_from_reply};
