//! Shared world state for board move BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use boardwalk::board::{
    adapters::memory::InMemoryBoardStore,
    domain::{BoardVersion, ColumnId, ProjectId, TaskId},
    services::{BoardSyncService, ColumnManager, ColumnManagerError},
};
use boardwalk::config::BoardConfig;
use mockable::DefaultClock;
use rstest::fixture;

/// Project every scenario works on.
pub const PROJECT: ProjectId = ProjectId::new(1);

/// Column service used by the BDD world.
pub type TestColumns = ColumnManager<InMemoryBoardStore, DefaultClock>;

/// Board protocol service used by the BDD world.
pub type TestSync = BoardSyncService<InMemoryBoardStore, DefaultClock>;

/// Scenario world for board move behaviour tests.
pub struct BoardWorld {
    pub store: Arc<InMemoryBoardStore>,
    pub columns: TestColumns,
    pub sync: TestSync,
    pub column_ids: HashMap<String, ColumnId>,
    pub task_ids: HashMap<String, TaskId>,
    pub client_version: Option<BoardVersion>,
    pub last_column_move: Option<Result<bool, ColumnManagerError>>,
}

impl BoardWorld {
    /// Creates a world around an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryBoardStore::new());
        let config = Arc::new(BoardConfig::default());
        let clock = Arc::new(DefaultClock);
        Self {
            columns: ColumnManager::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                Arc::clone(&config),
            ),
            sync: BoardSyncService::new(Arc::clone(&store), clock, config),
            store,
            column_ids: HashMap::new(),
            task_ids: HashMap::new(),
            client_version: None,
            last_column_move: None,
        }
    }

    /// Looks up a column created by an earlier step.
    pub fn column(&self, title: &str) -> Result<ColumnId, eyre::Report> {
        self.column_ids
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown column '{title}' in scenario world"))
    }

    /// Looks up a task created by an earlier step.
    pub fn task(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.task_ids
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown task '{title}' in scenario world"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Splits a comma separated step argument into trimmed names.
pub fn names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
