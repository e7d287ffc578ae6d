//! Port for ordered collections keyed by container and item.

use super::BoardStoreResult;
use crate::board::domain::{
    BoardState, BucketKey, ChangeStamp, PositionEntry, PositionSwap, ProjectId,
};
use async_trait::async_trait;
use std::fmt;

/// Ordered collection whose items carry a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionContainer {
    /// Columns of a project; item ids are column ids.
    ProjectColumns(ProjectId),
    /// Active tasks of one bucket; item ids are task ids.
    TaskBucket {
        /// Project owning the bucket.
        project_id: ProjectId,
        /// Column and swimlane of the bucket.
        bucket: BucketKey,
    },
}

impl PositionContainer {
    /// Returns the project the container belongs to.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        match self {
            Self::ProjectColumns(project_id) | Self::TaskBucket { project_id, .. } => *project_id,
        }
    }
}

impl fmt::Display for PositionContainer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProjectColumns(project_id) => write!(formatter, "columns of project {project_id}"),
            Self::TaskBucket { project_id, bucket } => write!(
                formatter,
                "bucket (column {}, swimlane {}) of project {project_id}",
                bucket.column_id, bucket.swimlane_id
            ),
        }
    }
}

/// Positional persistence contract.
///
/// Every mutating call is atomic: it either applies all of its writes and
/// advances the project's board revision once, or changes nothing.
#[async_trait]
pub trait PositionStore: Send + Sync {
    /// Returns the project's current board revision.
    ///
    /// A project that was never changed reports the initial revision.
    async fn board_state(&self, project_id: ProjectId) -> BoardStoreResult<BoardState>;

    /// Lists `(id, position)` pairs of a container in ascending position
    /// order.
    async fn list_ordered(
        &self,
        container: PositionContainer,
    ) -> BoardStoreResult<Vec<PositionEntry<i64>>>;

    /// Writes both sides of a position swap.
    ///
    /// # Errors
    ///
    /// Returns [`super::BoardStoreError::ItemNotInContainer`] when either item
    /// is missing from the container or
    /// [`super::BoardStoreError::RevisionConflict`] when the stamp is stale.
    async fn swap_positions(
        &self,
        container: PositionContainer,
        swap: PositionSwap<i64>,
        stamp: ChangeStamp,
    ) -> BoardStoreResult<()>;

    /// Assigns positions `1..=N` to `ordered_ids` in order.
    ///
    /// # Errors
    ///
    /// Returns [`super::BoardStoreError::RenumberMismatch`] when the ids are
    /// not exactly the items of the container.
    async fn bulk_renumber(
        &self,
        container: PositionContainer,
        ordered_ids: &[i64],
        stamp: ChangeStamp,
    ) -> BoardStoreResult<()>;
}
