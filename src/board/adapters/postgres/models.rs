//! Diesel row models for board persistence.

use super::schema::{board_columns, board_tasks, project_boards, swimlanes};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for project board revisions.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = project_boards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BoardRow {
    /// Owning project.
    pub project_id: i64,
    /// Number of committed board changes.
    pub revision: i64,
    /// Time of the last committed change.
    pub modified_at: Option<DateTime<Utc>>,
}

/// Query result row for columns.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = board_columns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ColumnRow {
    /// Column identifier.
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Column title.
    pub title: String,
    /// One-based position within the project.
    pub position: i32,
    /// Advisory task limit.
    pub task_limit: i32,
}

/// Insert model for columns.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = board_columns)]
pub struct NewColumnRow {
    /// Owning project.
    pub project_id: i64,
    /// Column title.
    pub title: String,
    /// One-based position within the project.
    pub position: i32,
    /// Advisory task limit.
    pub task_limit: i32,
}

/// Query result row for stored swimlanes.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = swimlanes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SwimlaneRow {
    /// Swimlane identifier.
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Swimlane name.
    pub name: String,
    /// Rank among the project's stored swimlanes.
    pub position: i32,
}

/// Insert model for swimlanes.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = swimlanes)]
pub struct NewSwimlaneRow {
    /// Owning project.
    pub project_id: i64,
    /// Swimlane name.
    pub name: String,
    /// Rank among the project's stored swimlanes.
    pub position: i32,
}

/// Query result row for task placements.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = board_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Column holding the task.
    pub column_id: i64,
    /// Swimlane holding the task.
    pub swimlane_id: i64,
    /// One-based position within the bucket.
    pub position: i32,
    /// Task title.
    pub title: String,
    /// Whether the task is open.
    pub is_active: bool,
}

/// Insert model for task placements.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = board_tasks)]
pub struct NewTaskRow {
    /// Owning project.
    pub project_id: i64,
    /// Column holding the task.
    pub column_id: i64,
    /// Swimlane holding the task.
    pub swimlane_id: i64,
    /// One-based position within the bucket.
    pub position: i32,
    /// Task title.
    pub title: String,
    /// Whether the task is open.
    pub is_active: bool,
}
