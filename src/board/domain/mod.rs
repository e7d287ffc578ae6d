//! Domain model for the project board.
//!
//! Columns are ordered within a project, tasks are ordered within a
//! (column, swimlane) bucket, and every committed change advances the
//! project's board revision. Nothing in this module touches storage.

mod board;
mod column;
mod column_form;
mod error;
mod ids;
mod ordering;
mod placement;
mod revision;

pub use board::{
    Board, BoardColumn, BoardContents, BoardLane, DEFAULT_SWIMLANE_NAME, Swimlane,
};
pub use column::{
    Column, ColumnSpec, ColumnTaskCount, ColumnTitle, ColumnUpdate, MAX_COLUMN_TITLE_LENGTH,
    PersistedColumnData, TaskLimit,
};
pub use column_form::{
    ColumnBulkUpdate, ColumnField, ColumnFieldError, ColumnFormEntry, ColumnFormError,
};
pub use error::BoardDomainError;
pub use ids::{ColumnId, Position, ProjectId, SwimlaneId, TaskId};
pub use ordering::{Direction, OrderedIds, PositionEntry, PositionSwap, plan_swap};
pub use placement::{BucketKey, MovePlan, TaskCard, TaskPlacement, TaskRelocation, plan_move};
pub use revision::{BoardRevision, BoardState, BoardVersion, ChangeStamp};
