//! Shared fixtures for board unit tests.

use std::sync::Arc;

use crate::board::{
    adapters::memory::InMemoryBoardStore,
    domain::{
        Column, ColumnTitle, Position, ProjectId, SwimlaneId, TaskCard, TaskLimit, TaskPlacement,
    },
    ports::{ColumnRepository, PositionStore},
    services::{BoardSyncService, ColumnManager, TaskPlacementService},
};
use crate::config::BoardConfig;
use mockable::DefaultClock;
use rstest::fixture;

pub type TestManager = ColumnManager<InMemoryBoardStore, DefaultClock>;
pub type TestPlacement = TaskPlacementService<InMemoryBoardStore, DefaultClock>;
pub type TestSync = BoardSyncService<InMemoryBoardStore, DefaultClock>;

pub const PROJECT: ProjectId = ProjectId::new(7);
pub const OTHER_PROJECT: ProjectId = ProjectId::new(8);

#[fixture]
pub fn store() -> Arc<InMemoryBoardStore> {
    Arc::new(InMemoryBoardStore::new())
}

pub fn config() -> Arc<BoardConfig> {
    Arc::new(BoardConfig::default())
}

pub fn manager(store: &Arc<InMemoryBoardStore>) -> TestManager {
    ColumnManager::new(Arc::clone(store), Arc::new(DefaultClock), config())
}

pub fn placement(store: &Arc<InMemoryBoardStore>) -> TestPlacement {
    TaskPlacementService::new(Arc::clone(store), Arc::new(DefaultClock), config())
}

pub fn sync(store: &Arc<InMemoryBoardStore>) -> TestSync {
    BoardSyncService::new(Arc::clone(store), Arc::new(DefaultClock), config())
}

pub fn position(value: u32) -> Position {
    Position::new(value).expect("valid position")
}

/// Seeds a column at an explicit position, gaps allowed.
pub fn seed_column(store: &InMemoryBoardStore, project_id: ProjectId, title: &str, at: u32) -> Column {
    store
        .seed_column(
            project_id,
            ColumnTitle::new(title).expect("valid title"),
            position(at),
            TaskLimit::UNLIMITED,
        )
        .expect("seed column")
}

/// Seeds an active task in the default swimlane of `column`.
pub fn seed_task(store: &InMemoryBoardStore, column: &Column, title: &str, at: u32) -> TaskCard {
    store
        .seed_task(
            column.project_id(),
            title,
            TaskPlacement::new(column.id(), SwimlaneId::DEFAULT, position(at)),
            true,
        )
        .expect("seed task")
}

/// Returns `(title, position)` pairs of the project's columns in order.
pub async fn column_layout(store: &InMemoryBoardStore, project_id: ProjectId) -> Vec<(String, u32)> {
    store
        .list_columns(project_id)
        .await
        .expect("list columns")
        .iter()
        .map(|column| (column.title().as_str().to_owned(), column.position().value()))
        .collect()
}

/// Returns the project's current revision number.
pub async fn revision(store: &InMemoryBoardStore, project_id: ProjectId) -> u64 {
    store
        .board_state(project_id)
        .await
        .expect("board state")
        .revision
        .value()
}
