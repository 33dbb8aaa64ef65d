//! Identity resolution and role administration for Gantt.
//!
//! This module maps external authenticated subjects to internal user records
//! (provisioned lazily with the default `Client` role on first contact),
//! applies manager-gated role changes, and reconciles stored roles back into
//! the identity provider's profile claims. The module follows hexagonal
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
