//! Port contracts for board persistence.
//!
//! Services depend on [`BoardStore`], which bundles every port so that one
//! adapter can apply column and task writes under the same per-project
//! revision.

mod board_reader;
mod column_repository;
mod error;
mod position_store;
mod swimlane_repository;
mod task_repository;

pub use board_reader::BoardReader;
pub use column_repository::ColumnRepository;
pub use error::{BoardErrorKind, BoardStoreError, BoardStoreResult};
pub use position_store::{PositionContainer, PositionStore};
pub use swimlane_repository::SwimlaneRepository;
pub use task_repository::TaskPlacementRepository;

/// Complete board persistence: positions, columns, tasks, swimlanes and
/// snapshot reads.
pub trait BoardStore:
    PositionStore
    + ColumnRepository
    + TaskPlacementRepository
    + SwimlaneRepository
    + BoardReader
{
}

impl<T> BoardStore for T where
    T: PositionStore
        + ColumnRepository
        + TaskPlacementRepository
        + SwimlaneRepository
        + BoardReader
{
}
