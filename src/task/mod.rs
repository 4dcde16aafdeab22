//! Task lifecycle management.
//!
//! Tasks belong to projects and may be assigned to users. The module
//! validates lifecycle commands, enforces referential and uniqueness
//! invariants through repository ports, and notifies assignees about
//! changes. It follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
