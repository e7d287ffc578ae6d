//! Errors shared by every board persistence port.

use crate::board::domain::{BoardDomainError, BoardRevision, ColumnId, ProjectId, TaskId};
use std::sync::Arc;
use thiserror::Error;

/// Result type for board store operations.
pub type BoardStoreResult<T> = Result<T, BoardStoreError>;

/// Coarse classification of board failures reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardErrorKind {
    /// Bad input; nothing was attempted.
    Validation,
    /// An unknown project, column, swimlane or task was referenced.
    NotFound,
    /// A concurrent writer changed the board first; retrying may succeed.
    ConcurrencyConflict,
    /// Storage failed and the transaction was rolled back.
    Persistence,
}

impl BoardErrorKind {
    /// Returns a stable machine-readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::ConcurrencyConflict => "conflict",
            Self::Persistence => "persistence",
        }
    }
}

/// Errors returned by board store implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardStoreError {
    /// A stored value failed domain validation.
    #[error(transparent)]
    Invalid(#[from] BoardDomainError),

    /// The column does not exist or belongs to another project.
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),

    /// The task does not exist or belongs to another project.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// An item referenced by a positional write is not part of the container.
    #[error("item {item_id} is not part of {container}")]
    ItemNotInContainer {
        /// Human-readable container description.
        container: String,
        /// Raw identifier of the missing item.
        item_id: i64,
    },

    /// A renumbering did not list exactly the items of the container.
    #[error("renumbering of {container} lists {supplied} items, the container holds {stored}")]
    RenumberMismatch {
        /// Human-readable container description.
        container: String,
        /// Number of distinct identifiers supplied.
        supplied: usize,
        /// Number of items stored in the container.
        stored: usize,
    },

    /// The board changed after the caller read it.
    #[error("board of project {project_id} is at {actual}, change was planned against {expected}")]
    RevisionConflict {
        /// Project whose board changed.
        project_id: ProjectId,
        /// Revision the change was planned against.
        expected: BoardRevision,
        /// Revision found in storage.
        actual: BoardRevision,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> BoardErrorKind {
        match self {
            Self::ColumnNotFound(_) | Self::TaskNotFound(_) => BoardErrorKind::NotFound,
            Self::Invalid(_) | Self::ItemNotInContainer { .. } | Self::RenumberMismatch { .. } => {
                BoardErrorKind::Validation
            }
            Self::RevisionConflict { .. } => BoardErrorKind::ConcurrencyConflict,
            Self::Persistence(_) => BoardErrorKind::Persistence,
        }
    }

    /// Returns `true` for optimistic concurrency failures.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::RevisionConflict { .. })
    }
}
