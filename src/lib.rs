//! Boardwalk: kanban board positioning core.
//!
//! This crate keeps the columns of a project and the tasks inside each
//! (column, swimlane) bucket in a gap-free order while several clients move
//! them concurrently, and serves the polling protocol those clients use to
//! notice each other's changes.
//!
//! # Architecture
//!
//! Boardwalk follows hexagonal architecture principles:
//!
//! - **Domain**: Pure ordering and placement logic with no infrastructure
//!   dependencies
//! - **Ports**: Abstract trait interfaces for board persistence
//! - **Adapters**: In-memory and `PostgreSQL` stores plus the axum HTTP
//!   surface
//!
//! # Modules
//!
//! - [`board`]: Columns, task placement, board assembly and sync protocol
//! - [`config`]: Runtime settings loaded from the environment
//! - [`telemetry`]: Tracing subscriber initialisation

pub mod board;
pub mod config;
pub mod telemetry;
