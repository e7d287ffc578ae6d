//! Repository port for task placement.

use super::BoardStoreResult;
use crate::board::domain::{BucketKey, ChangeStamp, ProjectId, TaskCard, TaskId, TaskRelocation};
use async_trait::async_trait;

/// Task placement persistence contract.
///
/// Only identity, title, placement and the active flag are visible here;
/// every other task attribute is owned elsewhere.
#[async_trait]
pub trait TaskPlacementRepository: Send + Sync {
    /// Finds a task by identifier.
    async fn find_task(&self, task_id: TaskId) -> BoardStoreResult<Option<TaskCard>>;

    /// Lists the active tasks of a bucket in ascending position order.
    async fn list_bucket(
        &self,
        project_id: ProjectId,
        bucket: BucketKey,
    ) -> BoardStoreResult<Vec<TaskCard>>;

    /// Stores a new active task at the end of its bucket.
    async fn append_task(
        &self,
        project_id: ProjectId,
        bucket: BucketKey,
        title: &str,
        stamp: ChangeStamp,
    ) -> BoardStoreResult<TaskCard>;

    /// Persists new placements for a set of tasks in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`super::BoardStoreError::TaskNotFound`] when a task is missing
    /// from the project; nothing is written in that case.
    async fn relocate(
        &self,
        project_id: ProjectId,
        relocations: &[TaskRelocation],
        stamp: ChangeStamp,
    ) -> BoardStoreResult<()>;
}
