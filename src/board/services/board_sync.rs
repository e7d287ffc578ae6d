//! Client-facing board protocol: fetch, change check and move submission.

use super::{BoardAssembler, MoveOutcome, TaskMove, TaskPlacementError, TaskPlacementService};
use crate::board::{
    domain::{BoardLane, BoardVersion, ColumnId, ProjectId, SwimlaneId, TaskId},
    ports::{BoardErrorKind, BoardStore, BoardStoreError},
};
use crate::config::BoardConfig;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for the board protocol.
#[derive(Debug, Error)]
pub enum BoardSyncError {
    /// The submitted task is not part of the addressed project.
    #[error("task {task_id} not found in project {project_id}")]
    TaskNotInProject {
        /// Project the client addressed.
        project_id: ProjectId,
        /// Submitted task.
        task_id: TaskId,
    },

    /// The move itself failed.
    #[error(transparent)]
    Placement(#[from] TaskPlacementError),

    /// Reading the board failed.
    #[error(transparent)]
    Store(#[from] BoardStoreError),
}

impl BoardSyncError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> BoardErrorKind {
        match self {
            Self::TaskNotInProject { .. } => BoardErrorKind::NotFound,
            Self::Placement(err) => err.kind(),
            Self::Store(err) => err.kind(),
        }
    }
}

/// Result type for board protocol operations.
pub type BoardSyncResult<T> = Result<T, BoardSyncError>;

/// Move submitted by a board client after a drag and drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Task being moved.
    pub task_id: TaskId,
    /// Destination column.
    pub column_id: ColumnId,
    /// Destination swimlane; the default swimlane when omitted.
    #[serde(default)]
    pub swimlane_id: SwimlaneId,
    /// Requested one-based position in the destination bucket.
    pub position: i64,
}

impl From<MoveRequest> for TaskMove {
    fn from(request: MoveRequest) -> Self {
        Self::new(request.task_id, request.column_id)
            .with_swimlane(request.swimlane_id)
            .with_position(request.position)
    }
}

/// Fully assembled board plus the metadata polling clients need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Project the board belongs to.
    pub project_id: ProjectId,
    /// Version token to send back with the next check.
    pub version: BoardVersion,
    /// Time of the last committed change, if any.
    pub modified_at: Option<DateTime<Utc>>,
    /// Seconds between client checks; zero disables polling.
    pub poll_interval_secs: u64,
    /// Columns whose active task count exceeds their advisory limit.
    pub columns_over_limit: Vec<ColumnId>,
    /// Swimlanes in order, each with its ordered columns and tasks.
    pub swimlanes: Vec<BoardLane>,
}

/// Answer to a change check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCheck {
    /// The client's version is current.
    Unchanged,
    /// The board changed; the fresh snapshot is attached.
    Changed(Box<BoardSnapshot>),
}

/// Board protocol service shared by all polling clients.
#[derive(Clone)]
pub struct BoardSyncService<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    assembler: BoardAssembler<S>,
    placement: TaskPlacementService<S, C>,
    config: Arc<BoardConfig>,
}

impl<S, C> BoardSyncService<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    /// Creates a new board protocol service.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, config: Arc<BoardConfig>) -> Self {
        Self {
            assembler: BoardAssembler::new(Arc::clone(&store)),
            placement: TaskPlacementService::new(Arc::clone(&store), clock, Arc::clone(&config)),
            store,
            config,
        }
    }

    /// Returns the full board with its current version.
    ///
    /// The version and the board come from the same store snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSyncError::Store`] when the read fails.
    pub async fn fetch(&self, project_id: ProjectId) -> BoardSyncResult<BoardSnapshot> {
        let (state, board) = self.assembler.assemble(project_id).await?;
        Ok(BoardSnapshot {
            project_id,
            version: BoardVersion::of(project_id, state.revision),
            modified_at: state.modified_at,
            poll_interval_secs: self.config.poll_interval_secs(),
            columns_over_limit: board.columns_over_limit(),
            swimlanes: board.lanes,
        })
    }

    /// Reports whether the board changed since `client_version`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSyncError::Store`] when a read fails.
    pub async fn check(
        &self,
        project_id: ProjectId,
        client_version: &BoardVersion,
    ) -> BoardSyncResult<BoardCheck> {
        let state = self.store.board_state(project_id).await?;
        if BoardVersion::of(project_id, state.revision) == *client_version {
            return Ok(BoardCheck::Unchanged);
        }
        tracing::debug!(project_id = %project_id, "board changed since client version");
        Ok(BoardCheck::Changed(Box::new(self.fetch(project_id).await?)))
    }

    /// Applies a client move and returns the board afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`BoardSyncError::TaskNotInProject`] when the task belongs to
    /// another project, or [`BoardSyncError::Placement`] when the move fails.
    pub async fn submit_move(
        &self,
        project_id: ProjectId,
        request: MoveRequest,
    ) -> BoardSyncResult<BoardSnapshot> {
        let in_project = self
            .store
            .find_task(request.task_id)
            .await?
            .is_some_and(|task| task.project_id() == project_id);
        if !in_project {
            return Err(BoardSyncError::TaskNotInProject {
                project_id,
                task_id: request.task_id,
            });
        }

        let outcome = self.placement.move_task(request.into()).await?;
        if matches!(outcome, MoveOutcome::Unchanged(_)) {
            tracing::debug!(
                project_id = %project_id,
                task_id = %request.task_id,
                "move submission changed nothing"
            );
        }
        self.fetch(project_id).await
    }
}
