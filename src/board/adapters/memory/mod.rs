//! In-memory adapter implementing every board port.

mod store;

pub use store::InMemoryBoardStore;
