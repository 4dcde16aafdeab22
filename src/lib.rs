//! Taskboard: task lifecycle service for projects and their members.
//!
//! This crate creates, lists, edits and deletes tasks that belong to
//! projects and may be assigned to users. Mutations on assigned tasks raise
//! notifications through a pluggable dispatcher, and every operation answers
//! with a uniform result envelope.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and notification
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Lifecycle orchestration returning result envelopes
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, persistence and notification

pub mod task;
