//! Read model of an assembled board.

use super::{
    BoardDomainError, BoardState, BucketKey, Column, ColumnId, ColumnTaskCount, ProjectId,
    SwimlaneId, TaskCard, TaskId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name shown for the implicit default swimlane.
pub const DEFAULT_SWIMLANE_NAME: &str = "Default swimlane";

/// Horizontal grouping of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swimlane {
    id: SwimlaneId,
    project_id: ProjectId,
    name: String,
    position: u32,
}

impl Swimlane {
    /// Creates a named swimlane.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptySwimlaneName`] when the trimmed name is
    /// empty.
    pub fn new(
        id: SwimlaneId,
        project_id: ProjectId,
        name: impl Into<String>,
        position: u32,
    ) -> Result<Self, BoardDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptySwimlaneName);
        }
        Ok(Self {
            id,
            project_id,
            name: trimmed.to_owned(),
            position,
        })
    }

    /// Returns the implicit swimlane listed first on every board.
    #[must_use]
    pub fn default_lane(project_id: ProjectId) -> Self {
        Self {
            id: SwimlaneId::DEFAULT,
            project_id,
            name: DEFAULT_SWIMLANE_NAME.to_owned(),
            position: 0,
        }
    }

    /// Returns the swimlane identifier.
    #[must_use]
    pub const fn id(&self) -> SwimlaneId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the swimlane name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the swimlane rank; the default swimlane ranks 0.
    #[must_use]
    pub const fn position(&self) -> u32 {
        self.position
    }
}

/// One (swimlane, column) cell of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardColumn {
    /// Column definition.
    pub column: Column,
    /// Active tasks of the cell ordered by position.
    pub tasks: Vec<TaskCard>,
    /// Number of tasks in the cell.
    pub task_count: usize,
}

impl BoardColumn {
    /// Creates a cell, counting its tasks.
    #[must_use]
    pub fn new(column: Column, tasks: Vec<TaskCard>) -> Self {
        let task_count = tasks.len();
        Self {
            column,
            tasks,
            task_count,
        }
    }
}

/// One swimlane of the board with its ordered columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLane {
    /// Swimlane definition.
    pub swimlane: Swimlane,
    /// Cells in column order.
    pub columns: Vec<BoardColumn>,
    /// Number of columns in the lane.
    pub column_count: usize,
}

impl BoardLane {
    /// Creates a lane, counting its columns.
    #[must_use]
    pub fn new(swimlane: Swimlane, columns: Vec<BoardColumn>) -> Self {
        let column_count = columns.len();
        Self {
            swimlane,
            columns,
            column_count,
        }
    }
}

/// Swimlanes × columns view of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Project the board belongs to.
    pub project_id: ProjectId,
    /// Lanes in swimlane order.
    pub lanes: Vec<BoardLane>,
}

impl Board {
    /// Returns the total task count of each column across all lanes, in
    /// column order.
    #[must_use]
    pub fn column_totals(&self) -> Vec<ColumnTaskCount> {
        let Some(first_lane) = self.lanes.first() else {
            return Vec::new();
        };
        first_lane
            .columns
            .iter()
            .map(|cell| ColumnTaskCount {
                column_id: cell.column.id(),
                total: self.column_total(cell.column.id()),
            })
            .collect()
    }

    /// Returns the total task count of one column across all lanes.
    #[must_use]
    pub fn column_total(&self, column_id: ColumnId) -> usize {
        self.lanes
            .iter()
            .flat_map(|lane| lane.columns.iter())
            .filter(|cell| cell.column.id() == column_id)
            .map(|cell| cell.task_count)
            .sum()
    }

    /// Returns ids of columns whose task total exceeds their advisory limit.
    #[must_use]
    pub fn columns_over_limit(&self) -> Vec<ColumnId> {
        let Some(first_lane) = self.lanes.first() else {
            return Vec::new();
        };
        first_lane
            .columns
            .iter()
            .filter(|cell| {
                cell.column
                    .task_limit()
                    .is_exceeded_by(self.column_total(cell.column.id()))
            })
            .map(|cell| cell.column.id())
            .collect()
    }

    /// Finds a task anywhere on the board.
    #[must_use]
    pub fn find_task(&self, task_id: TaskId) -> Option<&TaskCard> {
        self.lanes
            .iter()
            .flat_map(|lane| lane.columns.iter())
            .flat_map(|cell| cell.tasks.iter())
            .find(|card| card.id() == task_id)
    }
}

/// Rows of one project read from a single consistent view of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardContents {
    /// Revision and modification time at the moment of the read.
    pub state: BoardState,
    /// Swimlanes in display order, the default swimlane first.
    pub swimlanes: Vec<Swimlane>,
    /// Columns in position order.
    pub columns: Vec<Column>,
    /// Active tasks of the project in any order.
    pub tasks: Vec<TaskCard>,
}

impl BoardContents {
    /// Arranges the rows into the swimlanes × columns view.
    ///
    /// Tasks whose bucket names no listed swimlane or column are left out.
    #[must_use]
    pub fn into_board(self, project_id: ProjectId) -> Board {
        let mut buckets: HashMap<BucketKey, Vec<TaskCard>> = HashMap::new();
        for task in self.tasks {
            buckets.entry(task.placement().bucket()).or_default().push(task);
        }

        let lanes = self
            .swimlanes
            .into_iter()
            .map(|swimlane| {
                let cells = self
                    .columns
                    .iter()
                    .map(|column| {
                        let bucket = BucketKey::new(column.id(), swimlane.id());
                        let mut tasks = buckets.remove(&bucket).unwrap_or_default();
                        tasks.sort_by_key(|task| (task.placement().position, task.id()));
                        BoardColumn::new(column.clone(), tasks)
                    })
                    .collect();
                BoardLane::new(swimlane, cells)
            })
            .collect();
        Board { project_id, lanes }
    }
}
