//! `PostgreSQL` adapter for board persistence.

mod models;
mod repository;
mod schema;

pub use repository::{BoardPgPool, PostgresBoardStore};
