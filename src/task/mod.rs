//! Task lifecycle management for Gantt.
//!
//! This module implements the task state machine
//! (`Pending → Assigned → Accepted → InProgress → Done`), the role- and
//! ownership-gated transitions operating on it, and the manager cleanup batch
//! that releases tasks whose assignee has vanished. Every mutation is an
//! optimistic read-modify-write: stale preconditions fail instead of
//! overwriting concurrent transitions. The module follows hexagonal
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
