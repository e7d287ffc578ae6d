//! Repository port for project swimlanes.

use super::BoardStoreResult;
use crate::board::domain::{ChangeStamp, ProjectId, Swimlane};
use async_trait::async_trait;

/// Swimlane lookup contract.
#[async_trait]
pub trait SwimlaneRepository: Send + Sync {
    /// Lists the project's swimlanes, the default swimlane first and the
    /// stored swimlanes after it in position order.
    async fn list_swimlanes(&self, project_id: ProjectId) -> BoardStoreResult<Vec<Swimlane>>;

    /// Stores a swimlane after the project's last one.
    async fn add_swimlane(
        &self,
        project_id: ProjectId,
        name: &str,
        stamp: ChangeStamp,
    ) -> BoardStoreResult<Swimlane>;
}
