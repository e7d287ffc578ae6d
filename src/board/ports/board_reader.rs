//! Snapshot read port for assembling whole boards.

use super::BoardStoreResult;
use crate::board::domain::{BoardContents, ProjectId};
use async_trait::async_trait;

/// Reads everything a board view needs in one consistent pass.
#[async_trait]
pub trait BoardReader: Send + Sync {
    /// Returns the project's board state, swimlanes, columns and active
    /// tasks as they stood at a single point in time.
    ///
    /// A concurrent writer never leaves the result half applied: the
    /// revision always matches the rows returned with it.
    async fn read_board(&self, project_id: ProjectId) -> BoardStoreResult<BoardContents>;
}
