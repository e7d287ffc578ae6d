//! Unit tests for the board module.
//!
//! Domain tests exercise validation and the pure ordering algorithms; the
//! service tests drive the in-memory store through the public services, and
//! the conflict tests script store failures with a mocked store.

mod helpers;
mod ordering_tests;
