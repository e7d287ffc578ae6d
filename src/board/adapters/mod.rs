//! Adapter implementations of the board ports and the HTTP surface.

pub mod http;
pub mod memory;
pub mod postgres;
