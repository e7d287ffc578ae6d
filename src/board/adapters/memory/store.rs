//! In-memory board store for tests and embedders.
//!
//! Every mutation validates its whole input under the write lock before it
//! touches any row, which gives each call the all-or-nothing behaviour of a
//! database transaction.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{
    domain::{
        BoardContents, BoardState, BucketKey, ChangeStamp, Column, ColumnId, ColumnSpec,
        ColumnTaskCount, ColumnTitle, ColumnUpdate, PersistedColumnData, Position, PositionEntry,
        PositionSwap, ProjectId, Swimlane, SwimlaneId, TaskCard, TaskId, TaskLimit,
        TaskPlacement, TaskRelocation,
    },
    ports::{
        BoardReader, BoardStoreError, BoardStoreResult, ColumnRepository, PositionContainer,
        PositionStore, SwimlaneRepository, TaskPlacementRepository,
    },
};

/// Thread-safe in-memory implementation of every board port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardStore {
    state: Arc<RwLock<InMemoryBoardState>>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    last_column_id: i64,
    last_task_id: i64,
    last_swimlane_id: i64,
    boards: HashMap<ProjectId, BoardState>,
    columns: HashMap<ColumnId, Column>,
    tasks: HashMap<TaskId, TaskCard>,
    swimlanes: HashMap<SwimlaneId, Swimlane>,
}

impl InMemoryBoardState {
    fn board(&self, project_id: ProjectId) -> BoardState {
        self.boards.get(&project_id).copied().unwrap_or_default()
    }

    fn admit(&self, project_id: ProjectId, stamp: &ChangeStamp) -> BoardStoreResult<()> {
        let actual = self.board(project_id).revision;
        match stamp.expected() {
            Some(expected) if expected != actual => Err(BoardStoreError::RevisionConflict {
                project_id,
                expected,
                actual,
            }),
            _ => Ok(()),
        }
    }

    fn commit(&mut self, project_id: ProjectId, stamp: &ChangeStamp) {
        let advanced = self.board(project_id).advanced(stamp.at());
        self.boards.insert(project_id, advanced);
    }

    fn project_columns(&self, project_id: ProjectId) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self
            .columns
            .values()
            .filter(|column| column.project_id() == project_id)
            .collect();
        columns.sort_by_key(|column| (column.position(), column.id()));
        columns
    }

    fn bucket_tasks(&self, project_id: ProjectId, bucket: BucketKey) -> Vec<&TaskCard> {
        let mut tasks: Vec<&TaskCard> = self
            .tasks
            .values()
            .filter(|task| {
                task.is_active()
                    && task.project_id() == project_id
                    && task.placement().bucket() == bucket
            })
            .collect();
        tasks.sort_by_key(|task| (task.placement().position, task.id()));
        tasks
    }

    fn project_swimlanes(&self, project_id: ProjectId) -> Vec<Swimlane> {
        let mut stored: Vec<Swimlane> = self
            .swimlanes
            .values()
            .filter(|swimlane| swimlane.project_id() == project_id)
            .cloned()
            .collect();
        stored.sort_by_key(|swimlane| (swimlane.position(), swimlane.id()));

        let mut swimlanes = Vec::with_capacity(stored.len() + 1);
        swimlanes.push(Swimlane::default_lane(project_id));
        swimlanes.extend(stored);
        swimlanes
    }

    fn container_ids(&self, container: PositionContainer) -> Vec<i64> {
        match container {
            PositionContainer::ProjectColumns(project_id) => self
                .project_columns(project_id)
                .into_iter()
                .map(|column| column.id().value())
                .collect(),
            PositionContainer::TaskBucket { project_id, bucket } => self
                .bucket_tasks(project_id, bucket)
                .into_iter()
                .map(|task| task.id().value())
                .collect(),
        }
    }

    fn set_position(&mut self, container: PositionContainer, item_id: i64, position: Position) {
        match container {
            PositionContainer::ProjectColumns(_) => {
                if let Some(column) = self.columns.get_mut(&ColumnId::new(item_id)) {
                    column.reposition(position);
                }
            }
            PositionContainer::TaskBucket { .. } => {
                if let Some(task) = self.tasks.get_mut(&TaskId::new(item_id)) {
                    let placement = task.placement();
                    task.relocate(TaskPlacement::new(
                        placement.column_id,
                        placement.swimlane_id,
                        position,
                    ));
                }
            }
        }
    }

    fn last_column_position(&self, project_id: ProjectId) -> u32 {
        self.columns
            .values()
            .filter(|column| column.project_id() == project_id)
            .map(|column| column.position().value())
            .max()
            .unwrap_or(0)
    }

    fn owned_column(&self, project_id: ProjectId, column_id: ColumnId) -> BoardStoreResult<&Column> {
        self.columns
            .get(&column_id)
            .filter(|column| column.project_id() == project_id)
            .ok_or(BoardStoreError::ColumnNotFound(column_id))
    }
}

impl InMemoryBoardStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BoardStoreResult<RwLockReadGuard<'_, InMemoryBoardState>> {
        self.state
            .read()
            .map_err(|err| BoardStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> BoardStoreResult<RwLockWriteGuard<'_, InMemoryBoardState>> {
        self.state
            .write()
            .map_err(|err| BoardStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    /// Stores a column at an explicit position without advancing the board
    /// revision.
    ///
    /// Intended for seeding fixtures, including boards with position gaps.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the store lock is
    /// poisoned.
    pub fn seed_column(
        &self,
        project_id: ProjectId,
        title: ColumnTitle,
        position: Position,
        task_limit: TaskLimit,
    ) -> BoardStoreResult<Column> {
        let mut state = self.write()?;
        state.last_column_id += 1;
        let column = Column::from_persisted(PersistedColumnData {
            id: ColumnId::new(state.last_column_id),
            project_id,
            title,
            position,
            task_limit,
        });
        state.columns.insert(column.id(), column.clone());
        Ok(column)
    }

    /// Stores a task at an explicit placement without advancing the board
    /// revision.
    ///
    /// Intended for seeding fixtures, including closed tasks and buckets with
    /// position gaps.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Persistence`] when the store lock is
    /// poisoned.
    pub fn seed_task(
        &self,
        project_id: ProjectId,
        title: impl Into<String>,
        placement: TaskPlacement,
        is_active: bool,
    ) -> BoardStoreResult<TaskCard> {
        let mut state = self.write()?;
        state.last_task_id += 1;
        let task = TaskCard::from_persisted(
            TaskId::new(state.last_task_id),
            project_id,
            title.into(),
            placement,
            is_active,
        );
        state.tasks.insert(task.id(), task.clone());
        Ok(task)
    }
}

#[async_trait]
impl PositionStore for InMemoryBoardStore {
    async fn board_state(&self, project_id: ProjectId) -> BoardStoreResult<BoardState> {
        Ok(self.read()?.board(project_id))
    }

    async fn list_ordered(
        &self,
        container: PositionContainer,
    ) -> BoardStoreResult<Vec<PositionEntry<i64>>> {
        let state = self.read()?;
        let entries = match container {
            PositionContainer::ProjectColumns(project_id) => state
                .project_columns(project_id)
                .into_iter()
                .map(|column| PositionEntry::new(column.id().value(), column.position()))
                .collect(),
            PositionContainer::TaskBucket { project_id, bucket } => state
                .bucket_tasks(project_id, bucket)
                .into_iter()
                .map(|task| PositionEntry::new(task.id().value(), task.placement().position))
                .collect(),
        };
        Ok(entries)
    }

    async fn swap_positions(
        &self,
        container: PositionContainer,
        swap: PositionSwap<i64>,
        stamp: ChangeStamp,
    ) -> BoardStoreResult<()> {
        let project_id = container.project_id();
        let mut state = self.write()?;
        state.admit(project_id, &stamp)?;

        let members = state.container_ids(container);
        for item_id in [swap.moved.id, swap.displaced.id] {
            if !members.contains(&item_id) {
                return Err(BoardStoreError::ItemNotInContainer {
                    container: container.to_string(),
                    item_id,
                });
            }
        }

        state.set_position(container, swap.moved.id, swap.moved.position);
        state.set_position(container, swap.displaced.id, swap.displaced.position);
        state.commit(project_id, &stamp);
        Ok(())
    }

    async fn bulk_renumber(
        &self,
        container: PositionContainer,
        ordered_ids: &[i64],
        stamp: ChangeStamp,
    ) -> BoardStoreResult<()> {
        let project_id = container.project_id();
        let mut state = self.write()?;
        state.admit(project_id, &stamp)?;

        let members: HashSet<i64> = state.container_ids(container).into_iter().collect();
        let supplied: HashSet<i64> = ordered_ids.iter().copied().collect();
        if supplied.len() != ordered_ids.len() || supplied != members {
            return Err(BoardStoreError::RenumberMismatch {
                container: container.to_string(),
                supplied: supplied.len(),
                stored: members.len(),
            });
        }

        for (index, item_id) in ordered_ids.iter().enumerate() {
            state.set_position(container, *item_id, Position::from_index(index));
        }
        state.commit(project_id, &stamp);
        Ok(())
    }
}

#[async_trait]
impl ColumnRepository for InMemoryBoardStore {
    async fn insert_columns(
        &self,
        project_id: ProjectId,
        specs: &[ColumnSpec],
        stamp: ChangeStamp,
    ) -> BoardStoreResult<Vec<Column>> {
        let mut state = self.write()?;
        state.admit(project_id, &stamp)?;
        if specs.is_empty() {
            return Ok(Vec::new());
        }

        let last_position = state.last_column_position(project_id) as usize;
        let mut created = Vec::with_capacity(specs.len());
        for (offset, spec) in specs.iter().enumerate() {
            state.last_column_id += 1;
            let column = Column::from_persisted(PersistedColumnData {
                id: ColumnId::new(state.last_column_id),
                project_id,
                title: spec.title().clone(),
                position: Position::from_index(last_position + offset),
                task_limit: spec.task_limit(),
            });
            state.columns.insert(column.id(), column.clone());
            created.push(column);
        }
        state.commit(project_id, &stamp);
        Ok(created)
    }

    async fn update_columns(
        &self,
        project_id: ProjectId,
        updates: &[ColumnUpdate],
        stamp: ChangeStamp,
    ) -> BoardStoreResult<Vec<Column>> {
        let mut state = self.write()?;
        state.admit(project_id, &stamp)?;
        for update in updates {
            state.owned_column(project_id, update.column_id)?;
        }
        if updates.is_empty() {
            return Ok(Vec::new());
        }

        let mut updated = Vec::with_capacity(updates.len());
        for update in updates {
            if let Some(column) = state.columns.get_mut(&update.column_id) {
                column.apply(update.spec.clone());
                updated.push(column.clone());
            }
        }
        state.commit(project_id, &stamp);
        Ok(updated)
    }

    async fn remove_column(
        &self,
        project_id: ProjectId,
        column_id: ColumnId,
        stamp: ChangeStamp,
    ) -> BoardStoreResult<Column> {
        let mut state = self.write()?;
        state.admit(project_id, &stamp)?;
        let removed = state.owned_column(project_id, column_id)?.clone();

        state.columns.remove(&column_id);
        state
            .tasks
            .retain(|_, task| task.placement().column_id != column_id);

        let remaining: Vec<ColumnId> = state
            .project_columns(project_id)
            .into_iter()
            .map(Column::id)
            .collect();
        for (index, remaining_id) in remaining.into_iter().enumerate() {
            if let Some(column) = state.columns.get_mut(&remaining_id) {
                column.reposition(Position::from_index(index));
            }
        }
        state.commit(project_id, &stamp);
        Ok(removed)
    }

    async fn find_column(&self, column_id: ColumnId) -> BoardStoreResult<Option<Column>> {
        Ok(self.read()?.columns.get(&column_id).cloned())
    }

    async fn list_columns(&self, project_id: ProjectId) -> BoardStoreResult<Vec<Column>> {
        let state = self.read()?;
        Ok(state
            .project_columns(project_id)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn column_stats(&self, project_id: ProjectId) -> BoardStoreResult<Vec<ColumnTaskCount>> {
        let state = self.read()?;
        let stats = state
            .project_columns(project_id)
            .into_iter()
            .map(|column| ColumnTaskCount {
                column_id: column.id(),
                total: state
                    .tasks
                    .values()
                    .filter(|task| task.is_active() && task.placement().column_id == column.id())
                    .count(),
            })
            .collect();
        Ok(stats)
    }
}

#[async_trait]
impl TaskPlacementRepository for InMemoryBoardStore {
    async fn find_task(&self, task_id: TaskId) -> BoardStoreResult<Option<TaskCard>> {
        Ok(self.read()?.tasks.get(&task_id).cloned())
    }

    async fn list_bucket(
        &self,
        project_id: ProjectId,
        bucket: BucketKey,
    ) -> BoardStoreResult<Vec<TaskCard>> {
        let state = self.read()?;
        Ok(state
            .bucket_tasks(project_id, bucket)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn append_task(
        &self,
        project_id: ProjectId,
        bucket: BucketKey,
        title: &str,
        stamp: ChangeStamp,
    ) -> BoardStoreResult<TaskCard> {
        let mut state = self.write()?;
        state.admit(project_id, &stamp)?;
        state.owned_column(project_id, bucket.column_id)?;

        let count = state.bucket_tasks(project_id, bucket).len();
        state.last_task_id += 1;
        let task = TaskCard::from_persisted(
            TaskId::new(state.last_task_id),
            project_id,
            title.to_owned(),
            TaskPlacement::new(
                bucket.column_id,
                bucket.swimlane_id,
                Position::from_index(count),
            ),
            true,
        );
        state.tasks.insert(task.id(), task.clone());
        state.commit(project_id, &stamp);
        Ok(task)
    }

    async fn relocate(
        &self,
        project_id: ProjectId,
        relocations: &[TaskRelocation],
        stamp: ChangeStamp,
    ) -> BoardStoreResult<()> {
        let mut state = self.write()?;
        state.admit(project_id, &stamp)?;
        for relocation in relocations {
            let owned = state
                .tasks
                .get(&relocation.task_id)
                .is_some_and(|task| task.project_id() == project_id);
            if !owned {
                return Err(BoardStoreError::TaskNotFound(relocation.task_id));
            }
            state.owned_column(project_id, relocation.placement.column_id)?;
        }
        if relocations.is_empty() {
            return Ok(());
        }

        for relocation in relocations {
            if let Some(task) = state.tasks.get_mut(&relocation.task_id) {
                task.relocate(relocation.placement);
            }
        }
        state.commit(project_id, &stamp);
        Ok(())
    }
}

#[async_trait]
impl SwimlaneRepository for InMemoryBoardStore {
    async fn list_swimlanes(&self, project_id: ProjectId) -> BoardStoreResult<Vec<Swimlane>> {
        Ok(self.read()?.project_swimlanes(project_id))
    }

    async fn add_swimlane(
        &self,
        project_id: ProjectId,
        name: &str,
        stamp: ChangeStamp,
    ) -> BoardStoreResult<Swimlane> {
        let mut state = self.write()?;
        state.admit(project_id, &stamp)?;

        let position = state
            .swimlanes
            .values()
            .filter(|swimlane| swimlane.project_id() == project_id)
            .map(Swimlane::position)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        let id = SwimlaneId::new(state.last_swimlane_id + 1);
        let swimlane = Swimlane::new(id, project_id, name, position)?;

        state.last_swimlane_id += 1;
        state.swimlanes.insert(swimlane.id(), swimlane.clone());
        state.commit(project_id, &stamp);
        Ok(swimlane)
    }
}

#[async_trait]
impl BoardReader for InMemoryBoardStore {
    async fn read_board(&self, project_id: ProjectId) -> BoardStoreResult<BoardContents> {
        let state = self.read()?;
        Ok(BoardContents {
            state: state.board(project_id),
            swimlanes: state.project_swimlanes(project_id),
            columns: state
                .project_columns(project_id)
                .into_iter()
                .cloned()
                .collect(),
            tasks: state
                .tasks
                .values()
                .filter(|task| task.is_active() && task.project_id() == project_id)
                .cloned()
                .collect(),
        })
    }
}
