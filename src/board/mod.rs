//! Project board: ordered columns, swimlanes and task placement.
//!
//! The module keeps column positions and task positions sequential under
//! concurrent mutation and exposes the polling protocol board clients use to
//! stay in sync. It follows hexagonal architecture:
//!
//! - Domain types and pure ordering algorithms in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
