//! Repository port for project columns.

use super::BoardStoreResult;
use crate::board::domain::{
    ChangeStamp, Column, ColumnId, ColumnSpec, ColumnTaskCount, ColumnUpdate, ProjectId,
};
use async_trait::async_trait;

/// Column persistence contract.
#[async_trait]
pub trait ColumnRepository: Send + Sync {
    /// Appends columns after the project's highest position, in order.
    ///
    /// Either every column is stored or none is.
    async fn insert_columns(
        &self,
        project_id: ProjectId,
        specs: &[ColumnSpec],
        stamp: ChangeStamp,
    ) -> BoardStoreResult<Vec<Column>>;

    /// Replaces title and task limit of existing columns without touching
    /// their positions.
    ///
    /// # Errors
    ///
    /// Returns [`super::BoardStoreError::ColumnNotFound`] when any column is
    /// missing from the project; no column is updated in that case.
    async fn update_columns(
        &self,
        project_id: ProjectId,
        updates: &[ColumnUpdate],
        stamp: ChangeStamp,
    ) -> BoardStoreResult<Vec<Column>>;

    /// Deletes a column with all of its tasks and renumbers the remaining
    /// columns `1..=N`.
    ///
    /// # Errors
    ///
    /// Returns [`super::BoardStoreError::ColumnNotFound`] when the column is
    /// missing from the project.
    async fn remove_column(
        &self,
        project_id: ProjectId,
        column_id: ColumnId,
        stamp: ChangeStamp,
    ) -> BoardStoreResult<Column>;

    /// Finds a column by identifier.
    async fn find_column(&self, column_id: ColumnId) -> BoardStoreResult<Option<Column>>;

    /// Lists a project's columns in ascending position order.
    async fn list_columns(&self, project_id: ProjectId) -> BoardStoreResult<Vec<Column>>;

    /// Counts active tasks per column across all swimlanes, in column order.
    ///
    /// Columns without tasks report zero.
    async fn column_stats(&self, project_id: ProjectId) -> BoardStoreResult<Vec<ColumnTaskCount>>;
}
