//! Orchestration services for the board.
//!
//! Read-plan-write operations read the project's board revision first, plan
//! in memory and write with a guarded [`crate::board::domain::ChangeStamp`],
//! retrying with a fresh read when another writer got there first.

mod board_assembler;
mod board_sync;
mod column_manager;
mod task_placement;

pub use board_assembler::BoardAssembler;
pub use board_sync::{
    BoardCheck, BoardSnapshot, BoardSyncError, BoardSyncResult, BoardSyncService, MoveRequest,
};
pub use column_manager::{ColumnManager, ColumnManagerError, ColumnManagerResult};
pub use task_placement::{
    MoveOutcome, TaskMove, TaskPlacementError, TaskPlacementResult, TaskPlacementService,
};
