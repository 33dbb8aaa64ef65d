//! Notification fan-out for Gantt.
//!
//! On every accepted task transition the dispatcher persists a notification
//! row for the affected recipient and then publishes best-effort to that
//! recipient's real-time channel. Delivery is at-least-once: a missed live
//! push is recovered from the persisted row on the next read. The module
//! follows hexagonal architecture:
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
