//! Tasklane: task-management backend core.
//!
//! This crate provides the task lifecycle and request-safety engine behind a
//! task-management API: a status state machine, an idempotent-creation guard
//! and a pluggable listing-strategy dispatcher, together with the use cases
//! that orchestrate them.
//!
//! # Architecture
//!
//! Tasklane follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (PostgreSQL, Redis, memory)
//!
//! # Modules
//!
//! - [`task`]: Task domain, ports, adapters and services
//! - [`config`]: Environment-driven backend selection
//! - [`app`]: Composition root wiring adapters into a service

pub mod app;
pub mod config;
pub mod task;
