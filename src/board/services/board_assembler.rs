//! Assembly of the swimlanes × columns board read model.

use crate::board::{
    domain::{Board, BoardState, ProjectId},
    ports::{BoardStore, BoardStoreResult},
};
use std::sync::Arc;

/// Builds board views straight from the store, without caching.
#[derive(Clone)]
pub struct BoardAssembler<S>
where
    S: BoardStore,
{
    store: Arc<S>,
}

impl<S> BoardAssembler<S>
where
    S: BoardStore,
{
    /// Creates a new board assembler.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Assembles the board of a project.
    ///
    /// Each (swimlane, column) cell holds the active tasks of its bucket in
    /// position order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::board::ports::BoardStoreError`] when the read fails.
    pub async fn get_board(&self, project_id: ProjectId) -> BoardStoreResult<Board> {
        Ok(self.assemble(project_id).await?.1)
    }

    /// Assembles the board together with the state it was read at.
    ///
    /// Both come from one store snapshot, so the revision describes exactly
    /// the returned board.
    ///
    /// # Errors
    ///
    /// Returns [`crate::board::ports::BoardStoreError`] when the read fails.
    pub async fn assemble(&self, project_id: ProjectId) -> BoardStoreResult<(BoardState, Board)> {
        let contents = self.store.read_board(project_id).await?;
        let state = contents.state;
        let board = contents.into_board(project_id);

        tracing::debug!(
            project_id = %project_id,
            revision = %state.revision,
            lanes = board.lanes.len(),
            "board assembled"
        );
        Ok((state, board))
    }
}
