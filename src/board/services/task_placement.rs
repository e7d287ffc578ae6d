//! Moving tasks between and within (column, swimlane) buckets.

use crate::board::{
    domain::{
        BoardDomainError, BucketKey, ChangeStamp, ColumnId, Position, ProjectId, SwimlaneId,
        TaskCard, TaskId, TaskPlacement, plan_move,
    },
    ports::{BoardErrorKind, BoardStore, BoardStoreError},
};
use crate::config::BoardConfig;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for task placement.
#[derive(Debug, Error)]
pub enum TaskPlacementError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The task is closed and has no board position.
    #[error("task {0} is closed")]
    TaskClosed(TaskId),

    /// The destination column is not part of the task's project.
    #[error("column {column_id} not found in project {project_id}")]
    ColumnNotFound {
        /// Project of the task.
        project_id: ProjectId,
        /// Requested column.
        column_id: ColumnId,
    },

    /// The destination swimlane is not part of the task's project.
    #[error("swimlane {swimlane_id} not found in project {project_id}")]
    SwimlaneNotFound {
        /// Project of the task.
        project_id: ProjectId,
        /// Requested swimlane.
        swimlane_id: SwimlaneId,
    },

    /// Concurrent writers kept changing the board.
    #[error("task {task_id} could not be moved after {attempts} attempts")]
    Conflict {
        /// Task that was being moved.
        task_id: TaskId,
        /// Attempts made.
        attempts: u32,
    },

    /// Repository operation failed.
    #[error(transparent)]
    Store(#[from] BoardStoreError),
}

impl TaskPlacementError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> BoardErrorKind {
        match self {
            Self::Domain(_) | Self::TaskClosed(_) => BoardErrorKind::Validation,
            Self::TaskNotFound(_) | Self::ColumnNotFound { .. } | Self::SwimlaneNotFound { .. } => {
                BoardErrorKind::NotFound
            }
            Self::Conflict { .. } => BoardErrorKind::ConcurrencyConflict,
            Self::Store(err) => err.kind(),
        }
    }
}

/// Result type for task placement operations.
pub type TaskPlacementResult<T> = Result<T, TaskPlacementError>;

/// Requested destination of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskMove {
    task_id: TaskId,
    column_id: ColumnId,
    swimlane_id: SwimlaneId,
    position: i64,
}

impl TaskMove {
    /// Creates a move into the first slot of the default swimlane of a
    /// column.
    #[must_use]
    pub const fn new(task_id: TaskId, column_id: ColumnId) -> Self {
        Self {
            task_id,
            column_id,
            swimlane_id: SwimlaneId::DEFAULT,
            position: 1,
        }
    }

    /// Sets the destination swimlane.
    #[must_use]
    pub const fn with_swimlane(mut self, swimlane_id: SwimlaneId) -> Self {
        self.swimlane_id = swimlane_id;
        self
    }

    /// Sets the requested one-based position.
    #[must_use]
    pub const fn with_position(mut self, position: i64) -> Self {
        self.position = position;
        self
    }

    /// Returns the task to move.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }
}

/// Result of a task move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The task already sat at the effective destination; nothing was
    /// written.
    Unchanged(TaskPlacement),
    /// The task and its neighbours were renumbered.
    Moved {
        /// Final placement of the task.
        placement: TaskPlacement,
        /// Number of tasks whose placement changed, the moved task included.
        relocated: usize,
    },
}

impl MoveOutcome {
    /// Returns the final placement of the task.
    #[must_use]
    pub const fn placement(&self) -> TaskPlacement {
        match self {
            Self::Unchanged(placement) | Self::Moved { placement, .. } => *placement,
        }
    }
}

/// Task move orchestration service.
#[derive(Clone)]
pub struct TaskPlacementService<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: Arc<BoardConfig>,
}

impl<S, C> TaskPlacementService<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task placement service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>, config: Arc<BoardConfig>) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Moves a task to a column, swimlane and position.
    ///
    /// The position is clamped to `[1, destination_count + 1]`. Source and
    /// destination buckets are renumbered densely and written in one
    /// transaction. Column task limits are advisory and never block a move.
    ///
    /// # Errors
    ///
    /// Returns [`TaskPlacementError::Domain`] for a position below 1, a
    /// not-found variant for unknown references, or
    /// [`TaskPlacementError::Conflict`] when concurrent writers exhausted the
    /// retry budget.
    pub async fn move_task(&self, request: TaskMove) -> TaskPlacementResult<MoveOutcome> {
        let position = Position::from_requested(request.position)?;
        let attempts = self.config.max_move_attempts();

        for attempt in 1..=attempts {
            match self.try_move(request, position).await {
                Err(TaskPlacementError::Store(err)) if err.is_conflict() => {
                    tracing::debug!(
                        task_id = %request.task_id,
                        attempt,
                        "task move raced another writer, retrying"
                    );
                }
                result => return result,
            }
        }

        tracing::warn!(
            task_id = %request.task_id,
            attempts,
            "task move gave up after repeated conflicts"
        );
        Err(TaskPlacementError::Conflict {
            task_id: request.task_id,
            attempts,
        })
    }

    async fn try_move(
        &self,
        request: TaskMove,
        position: Position,
    ) -> TaskPlacementResult<MoveOutcome> {
        // The revision is read before the rows the plan depends on, so any
        // later writer makes the guarded write below fail.
        let project_id = self.load_active_task(request.task_id).await?.project_id();
        let state = self.store.board_state(project_id).await?;
        let task = self.load_active_task(request.task_id).await?;

        let target = TaskPlacement::new(request.column_id, request.swimlane_id, position);
        self.ensure_destination(project_id, target.bucket()).await?;

        let source_bucket = task.placement().bucket();
        let source = self.store.list_bucket(project_id, source_bucket).await?;
        let destination = if source_bucket == target.bucket() {
            Vec::new()
        } else {
            self.store.list_bucket(project_id, target.bucket()).await?
        };

        let plan = plan_move(&task, &source, &destination, target);
        if plan.is_noop() {
            tracing::debug!(task_id = %task.id(), "task already at destination");
            return Ok(MoveOutcome::Unchanged(plan.placement));
        }

        let stamp = ChangeStamp::guarded(state.revision, &*self.clock);
        self.store
            .relocate(project_id, &plan.relocations, stamp)
            .await?;
        tracing::info!(
            project_id = %project_id,
            task_id = %task.id(),
            column_id = %plan.placement.column_id,
            swimlane_id = %plan.placement.swimlane_id,
            position = %plan.placement.position,
            relocated = plan.relocations.len(),
            "task moved"
        );
        Ok(MoveOutcome::Moved {
            placement: plan.placement,
            relocated: plan.relocations.len(),
        })
    }

    /// Creates an active task at the end of a bucket.
    ///
    /// # Errors
    ///
    /// Returns [`TaskPlacementError::Domain`] for a blank title or a not-found
    /// variant when the column or swimlane is not part of the project.
    pub async fn place_new_task(
        &self,
        project_id: ProjectId,
        bucket: BucketKey,
        title: &str,
    ) -> TaskPlacementResult<TaskCard> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyTaskTitle.into());
        }
        self.ensure_destination(project_id, bucket).await?;

        let task = self
            .store
            .append_task(project_id, bucket, trimmed, ChangeStamp::unguarded(&*self.clock))
            .await?;
        tracing::info!(
            project_id = %project_id,
            task_id = %task.id(),
            position = %task.placement().position,
            "task placed"
        );
        Ok(task)
    }

    async fn load_active_task(&self, task_id: TaskId) -> TaskPlacementResult<TaskCard> {
        let task = self
            .store
            .find_task(task_id)
            .await?
            .ok_or(TaskPlacementError::TaskNotFound(task_id))?;
        if !task.is_active() {
            return Err(TaskPlacementError::TaskClosed(task_id));
        }
        Ok(task)
    }

    async fn ensure_destination(
        &self,
        project_id: ProjectId,
        bucket: BucketKey,
    ) -> TaskPlacementResult<()> {
        let column_owned = self
            .store
            .find_column(bucket.column_id)
            .await?
            .is_some_and(|column| column.project_id() == project_id);
        if !column_owned {
            return Err(TaskPlacementError::ColumnNotFound {
                project_id,
                column_id: bucket.column_id,
            });
        }

        let swimlanes = self.store.list_swimlanes(project_id).await?;
        if !swimlanes
            .iter()
            .any(|swimlane| swimlane.id() == bucket.swimlane_id)
        {
            return Err(TaskPlacementError::SwimlaneNotFound {
                project_id,
                swimlane_id: bucket.swimlane_id,
            });
        }
        Ok(())
    }
}
