//! Task lifecycle management.
//!
//! This module covers creating tasks, enforcing the `OPEN -> IN_PROGRESS ->
//! DONE` lifecycle, deduplicating retried creates through idempotency keys,
//! and listing tasks with a named ordering. It follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
