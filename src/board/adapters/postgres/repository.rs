//! `PostgreSQL` implementation of every board port.
//!
//! Each mutation runs in one transaction that first locks the project's
//! `project_boards` row. Writers of the same project therefore serialise on
//! that row while other projects proceed independently. Position uniqueness
//! is enforced by deferred constraints, so intermediate states inside the
//! transaction are allowed. Whole-board reads use one read-only
//! `REPEATABLE READ` transaction so the revision matches the rows.

use super::{
    models::{
        BoardRow, ColumnRow, NewColumnRow, NewSwimlaneRow, NewTaskRow, SwimlaneRow, TaskRow,
    },
    schema::{board_columns, board_tasks, project_boards, swimlanes},
};
use crate::board::{
    domain::{
        BoardContents, BoardRevision, BoardState, BucketKey, ChangeStamp, Column, ColumnId,
        ColumnSpec, ColumnTaskCount, ColumnTitle, ColumnUpdate, PersistedColumnData, Position,
        PositionEntry, PositionSwap, ProjectId, Swimlane, SwimlaneId, TaskCard, TaskId, TaskLimit,
        TaskPlacement, TaskRelocation,
    },
    ports::{
        BoardReader, BoardStoreError, BoardStoreResult, ColumnRepository, PositionContainer,
        PositionStore, SwimlaneRepository, TaskPlacementRepository,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use std::collections::{BTreeSet, HashMap};

/// `PostgreSQL` connection pool type used by the board store.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

impl From<diesel::result::Error> for BoardStoreError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed board store.
#[derive(Debug, Clone)]
pub struct PostgresBoardStore {
    pool: BoardPgPool,
}

impl PostgresBoardStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> BoardStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BoardStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BoardStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BoardStoreError::persistence)?
    }

    /// Runs `f` in a transaction holding the project's board lock, then
    /// advances the revision when `f` reports a change.
    async fn mutate<F, T>(
        &self,
        project_id: ProjectId,
        stamp: ChangeStamp,
        f: F,
    ) -> BoardStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BoardStoreResult<(T, bool)> + Send + 'static,
        T: Send + 'static,
    {
        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardStoreError, _>(|tx| {
                let state = lock_board(tx, project_id, &stamp)?;
                let (value, changed) = f(tx)?;
                if changed {
                    advance_board(tx, project_id, state, &stamp)?;
                }
                Ok(value)
            })
        })
        .await
    }
}

fn lock_board(
    connection: &mut PgConnection,
    project_id: ProjectId,
    stamp: &ChangeStamp,
) -> BoardStoreResult<BoardState> {
    diesel::insert_into(project_boards::table)
        .values(project_boards::project_id.eq(project_id.value()))
        .on_conflict_do_nothing()
        .execute(connection)?;
    let row = project_boards::table
        .find(project_id.value())
        .select(BoardRow::as_select())
        .for_update()
        .first::<BoardRow>(connection)?;
    let state = row_to_state(&row)?;

    match stamp.expected() {
        Some(expected) if expected != state.revision => Err(BoardStoreError::RevisionConflict {
            project_id,
            expected,
            actual: state.revision,
        }),
        _ => Ok(state),
    }
}

fn advance_board(
    connection: &mut PgConnection,
    project_id: ProjectId,
    state: BoardState,
    stamp: &ChangeStamp,
) -> BoardStoreResult<()> {
    let advanced = state.advanced(stamp.at());
    let revision =
        i64::try_from(advanced.revision.value()).map_err(BoardStoreError::persistence)?;
    diesel::update(project_boards::table.find(project_id.value()))
        .set((
            project_boards::revision.eq(revision),
            project_boards::modified_at.eq(advanced.modified_at),
        ))
        .execute(connection)?;
    Ok(())
}

fn row_to_state(row: &BoardRow) -> BoardStoreResult<BoardState> {
    let revision = u64::try_from(row.revision).map_err(BoardStoreError::persistence)?;
    Ok(BoardState {
        revision: BoardRevision::new(revision),
        modified_at: row.modified_at,
    })
}

fn position_from_db(value: i32) -> BoardStoreResult<Position> {
    Ok(Position::from_requested(i64::from(value))?)
}

fn position_to_db(position: Position) -> BoardStoreResult<i32> {
    i32::try_from(position.value()).map_err(BoardStoreError::persistence)
}

fn limit_to_db(limit: TaskLimit) -> BoardStoreResult<i32> {
    i32::try_from(limit.value()).map_err(BoardStoreError::persistence)
}

fn row_to_column(row: ColumnRow) -> BoardStoreResult<Column> {
    let ColumnRow {
        id,
        project_id,
        title,
        position,
        task_limit,
    } = row;
    Ok(Column::from_persisted(PersistedColumnData {
        id: ColumnId::new(id),
        project_id: ProjectId::new(project_id),
        title: ColumnTitle::new(title)?,
        position: position_from_db(position)?,
        task_limit: TaskLimit::from_requested(i64::from(task_limit))?,
    }))
}

fn row_to_task(row: TaskRow) -> BoardStoreResult<TaskCard> {
    let placement = TaskPlacement::new(
        ColumnId::new(row.column_id),
        SwimlaneId::new(row.swimlane_id),
        position_from_db(row.position)?,
    );
    Ok(TaskCard::from_persisted(
        TaskId::new(row.id),
        ProjectId::new(row.project_id),
        row.title,
        placement,
        row.is_active,
    ))
}

fn row_to_swimlane(row: SwimlaneRow) -> BoardStoreResult<Swimlane> {
    let position = u32::try_from(row.position).map_err(BoardStoreError::persistence)?;
    Ok(Swimlane::new(
        SwimlaneId::new(row.id),
        ProjectId::new(row.project_id),
        row.name,
        position,
    )?)
}

fn to_new_column_row(
    project_id: ProjectId,
    spec: &ColumnSpec,
    position: Position,
) -> BoardStoreResult<NewColumnRow> {
    Ok(NewColumnRow {
        project_id: project_id.value(),
        title: spec.title().as_str().to_owned(),
        position: position_to_db(position)?,
        task_limit: limit_to_db(spec.task_limit())?,
    })
}

fn load_state(
    connection: &mut PgConnection,
    project_id: ProjectId,
) -> BoardStoreResult<BoardState> {
    let row = project_boards::table
        .find(project_id.value())
        .select(BoardRow::as_select())
        .first::<BoardRow>(connection)
        .optional()?;
    row.as_ref()
        .map_or_else(|| Ok(BoardState::default()), row_to_state)
}

fn load_swimlanes(
    connection: &mut PgConnection,
    project_id: ProjectId,
) -> BoardStoreResult<Vec<Swimlane>> {
    let rows = swimlanes::table
        .filter(swimlanes::project_id.eq(project_id.value()))
        .order((swimlanes::position.asc(), swimlanes::id.asc()))
        .select(SwimlaneRow::as_select())
        .load::<SwimlaneRow>(connection)?;
    let mut lanes = Vec::with_capacity(rows.len() + 1);
    lanes.push(Swimlane::default_lane(project_id));
    for row in rows {
        lanes.push(row_to_swimlane(row)?);
    }
    Ok(lanes)
}

fn load_project_columns(
    connection: &mut PgConnection,
    project_id: ProjectId,
) -> BoardStoreResult<Vec<ColumnRow>> {
    Ok(board_columns::table
        .filter(board_columns::project_id.eq(project_id.value()))
        .order((board_columns::position.asc(), board_columns::id.asc()))
        .select(ColumnRow::as_select())
        .load::<ColumnRow>(connection)?)
}

fn load_bucket(
    connection: &mut PgConnection,
    project_id: ProjectId,
    bucket: BucketKey,
) -> BoardStoreResult<Vec<TaskRow>> {
    Ok(board_tasks::table
        .filter(board_tasks::project_id.eq(project_id.value()))
        .filter(board_tasks::column_id.eq(bucket.column_id.value()))
        .filter(board_tasks::swimlane_id.eq(bucket.swimlane_id.value()))
        .filter(board_tasks::is_active.eq(true))
        .order((board_tasks::position.asc(), board_tasks::id.asc()))
        .select(TaskRow::as_select())
        .load::<TaskRow>(connection)?)
}

fn load_container(
    connection: &mut PgConnection,
    container: PositionContainer,
) -> BoardStoreResult<Vec<(i64, i32)>> {
    match container {
        PositionContainer::ProjectColumns(project_id) => Ok(load_project_columns(
            connection, project_id,
        )?
        .into_iter()
        .map(|row| (row.id, row.position))
        .collect()),
        PositionContainer::TaskBucket { project_id, bucket } => Ok(load_bucket(
            connection, project_id, bucket,
        )?
        .into_iter()
        .map(|row| (row.id, row.position))
        .collect()),
    }
}

fn write_position(
    connection: &mut PgConnection,
    container: PositionContainer,
    item_id: i64,
    position: Position,
) -> BoardStoreResult<()> {
    let value = position_to_db(position)?;
    match container {
        PositionContainer::ProjectColumns(_) => {
            diesel::update(board_columns::table.find(item_id))
                .set(board_columns::position.eq(value))
                .execute(connection)?;
        }
        PositionContainer::TaskBucket { .. } => {
            diesel::update(board_tasks::table.find(item_id))
                .set(board_tasks::position.eq(value))
                .execute(connection)?;
        }
    }
    Ok(())
}

fn ensure_column_owned(
    connection: &mut PgConnection,
    project_id: ProjectId,
    column_id: ColumnId,
) -> BoardStoreResult<ColumnRow> {
    board_columns::table
        .find(column_id.value())
        .filter(board_columns::project_id.eq(project_id.value()))
        .select(ColumnRow::as_select())
        .first::<ColumnRow>(connection)
        .optional()?
        .ok_or(BoardStoreError::ColumnNotFound(column_id))
}

#[async_trait]
impl PositionStore for PostgresBoardStore {
    async fn board_state(&self, project_id: ProjectId) -> BoardStoreResult<BoardState> {
        self.run_blocking(move |connection| load_state(connection, project_id)).await
    }

    async fn list_ordered(
        &self,
        container: PositionContainer,
    ) -> BoardStoreResult<Vec<PositionEntry<i64>>> {
        self.run_blocking(move |connection| {
            load_container(connection, container)?
                .into_iter()
                .map(|(id, position)| Ok(PositionEntry::new(id, position_from_db(position)?)))
                .collect()
        })
        .await
    }

    async fn swap_positions(
        &self,
        container: PositionContainer,
        swap: PositionSwap<i64>,
        stamp: ChangeStamp,
    ) -> BoardStoreResult<()> {
        self.mutate(container.project_id(), stamp, move |connection| {
            let members = load_container(connection, container)?;
            for item_id in [swap.moved.id, swap.displaced.id] {
                if !members.iter().any(|(id, _)| *id == item_id) {
                    return Err(BoardStoreError::ItemNotInContainer {
                        container: container.to_string(),
                        item_id,
                    });
                }
            }
            write_position(connection, container, swap.moved.id, swap.moved.position)?;
            write_position(
                connection,
                container,
                swap.displaced.id,
                swap.displaced.position,
            )?;
            Ok(((), true))
        })
        .await
    }

    async fn bulk_renumber(
        &self,
        container: PositionContainer,
        ordered_ids: &[i64],
        stamp: ChangeStamp,
    ) -> BoardStoreResult<()> {
        let ids = ordered_ids.to_vec();
        self.mutate(container.project_id(), stamp, move |connection| {
            let members: BTreeSet<i64> = load_container(connection, container)?
                .into_iter()
                .map(|(id, _)| id)
                .collect();
            let supplied: BTreeSet<i64> = ids.iter().copied().collect();
            if supplied.len() != ids.len() || supplied != members {
                return Err(BoardStoreError::RenumberMismatch {
                    container: container.to_string(),
                    supplied: supplied.len(),
                    stored: members.len(),
                });
            }
            for (index, item_id) in ids.iter().enumerate() {
                write_position(connection, container, *item_id, Position::from_index(index))?;
            }
            Ok(((), true))
        })
        .await
    }
}

#[async_trait]
impl ColumnRepository for PostgresBoardStore {
    async fn insert_columns(
        &self,
        project_id: ProjectId,
        specs: &[ColumnSpec],
        stamp: ChangeStamp,
    ) -> BoardStoreResult<Vec<Column>> {
        let owned_specs = specs.to_vec();
        self.mutate(project_id, stamp, move |connection| {
            if owned_specs.is_empty() {
                return Ok((Vec::new(), false));
            }
            let last_position: Option<i32> = board_columns::table
                .filter(board_columns::project_id.eq(project_id.value()))
                .select(diesel::dsl::max(board_columns::position))
                .first(connection)?;
            let base = usize::try_from(last_position.unwrap_or(0))
                .map_err(BoardStoreError::persistence)?;

            let rows = owned_specs
                .iter()
                .enumerate()
                .map(|(offset, spec)| {
                    to_new_column_row(project_id, spec, Position::from_index(base + offset))
                })
                .collect::<BoardStoreResult<Vec<_>>>()?;
            let inserted = diesel::insert_into(board_columns::table)
                .values(&rows)
                .returning(ColumnRow::as_returning())
                .get_results::<ColumnRow>(connection)?;

            let mut columns = inserted
                .into_iter()
                .map(row_to_column)
                .collect::<BoardStoreResult<Vec<_>>>()?;
            columns.sort_by_key(Column::position);
            Ok((columns, true))
        })
        .await
    }

    async fn update_columns(
        &self,
        project_id: ProjectId,
        updates: &[ColumnUpdate],
        stamp: ChangeStamp,
    ) -> BoardStoreResult<Vec<Column>> {
        let owned_updates = updates.to_vec();
        self.mutate(project_id, stamp, move |connection| {
            for update in &owned_updates {
                ensure_column_owned(connection, project_id, update.column_id)?;
            }
            let mut updated = Vec::with_capacity(owned_updates.len());
            for update in &owned_updates {
                let row = diesel::update(board_columns::table.find(update.column_id.value()))
                    .set((
                        board_columns::title.eq(update.spec.title().as_str()),
                        board_columns::task_limit.eq(limit_to_db(update.spec.task_limit())?),
                    ))
                    .returning(ColumnRow::as_returning())
                    .get_result::<ColumnRow>(connection)?;
                updated.push(row_to_column(row)?);
            }
            let changed = !updated.is_empty();
            Ok((updated, changed))
        })
        .await
    }

    async fn remove_column(
        &self,
        project_id: ProjectId,
        column_id: ColumnId,
        stamp: ChangeStamp,
    ) -> BoardStoreResult<Column> {
        self.mutate(project_id, stamp, move |connection| {
            let removed = row_to_column(ensure_column_owned(connection, project_id, column_id)?)?;
            diesel::delete(board_tasks::table.filter(board_tasks::column_id.eq(column_id.value())))
                .execute(connection)?;
            diesel::delete(board_columns::table.find(column_id.value())).execute(connection)?;

            let container = PositionContainer::ProjectColumns(project_id);
            let remaining = load_project_columns(connection, project_id)?;
            for (index, row) in remaining.iter().enumerate() {
                write_position(connection, container, row.id, Position::from_index(index))?;
            }
            Ok((removed, true))
        })
        .await
    }

    async fn find_column(&self, column_id: ColumnId) -> BoardStoreResult<Option<Column>> {
        self.run_blocking(move |connection| {
            board_columns::table
                .find(column_id.value())
                .select(ColumnRow::as_select())
                .first::<ColumnRow>(connection)
                .optional()?
                .map(row_to_column)
                .transpose()
        })
        .await
    }

    async fn list_columns(&self, project_id: ProjectId) -> BoardStoreResult<Vec<Column>> {
        self.run_blocking(move |connection| {
            load_project_columns(connection, project_id)?
                .into_iter()
                .map(row_to_column)
                .collect()
        })
        .await
    }

    async fn column_stats(&self, project_id: ProjectId) -> BoardStoreResult<Vec<ColumnTaskCount>> {
        self.run_blocking(move |connection| {
            let columns = load_project_columns(connection, project_id)?;
            let counts: HashMap<i64, i64> = board_tasks::table
                .filter(board_tasks::project_id.eq(project_id.value()))
                .filter(board_tasks::is_active.eq(true))
                .group_by(board_tasks::column_id)
                .select((board_tasks::column_id, diesel::dsl::count_star()))
                .load::<(i64, i64)>(connection)?
                .into_iter()
                .collect();

            columns
                .iter()
                .map(|row| {
                    let total = counts.get(&row.id).copied().unwrap_or(0);
                    Ok(ColumnTaskCount {
                        column_id: ColumnId::new(row.id),
                        total: usize::try_from(total).map_err(BoardStoreError::persistence)?,
                    })
                })
                .collect()
        })
        .await
    }
}

#[async_trait]
impl TaskPlacementRepository for PostgresBoardStore {
    async fn find_task(&self, task_id: TaskId) -> BoardStoreResult<Option<TaskCard>> {
        self.run_blocking(move |connection| {
            board_tasks::table
                .find(task_id.value())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?
                .map(row_to_task)
                .transpose()
        })
        .await
    }

    async fn list_bucket(
        &self,
        project_id: ProjectId,
        bucket: BucketKey,
    ) -> BoardStoreResult<Vec<TaskCard>> {
        self.run_blocking(move |connection| {
            load_bucket(connection, project_id, bucket)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }

    async fn append_task(
        &self,
        project_id: ProjectId,
        bucket: BucketKey,
        title: &str,
        stamp: ChangeStamp,
    ) -> BoardStoreResult<TaskCard> {
        let owned_title = title.to_owned();
        self.mutate(project_id, stamp, move |connection| {
            ensure_column_owned(connection, project_id, bucket.column_id)?;
            let count = load_bucket(connection, project_id, bucket)?.len();
            let row = NewTaskRow {
                project_id: project_id.value(),
                column_id: bucket.column_id.value(),
                swimlane_id: bucket.swimlane_id.value(),
                position: position_to_db(Position::from_index(count))?,
                title: owned_title,
                is_active: true,
            };
            let inserted = diesel::insert_into(board_tasks::table)
                .values(&row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)?;
            Ok((row_to_task(inserted)?, true))
        })
        .await
    }

    async fn relocate(
        &self,
        project_id: ProjectId,
        relocations: &[TaskRelocation],
        stamp: ChangeStamp,
    ) -> BoardStoreResult<()> {
        let owned = relocations.to_vec();
        self.mutate(project_id, stamp, move |connection| {
            for relocation in &owned {
                let owned_task = board_tasks::table
                    .find(relocation.task_id.value())
                    .filter(board_tasks::project_id.eq(project_id.value()))
                    .count()
                    .get_result::<i64>(connection)?;
                if owned_task == 0 {
                    return Err(BoardStoreError::TaskNotFound(relocation.task_id));
                }
                ensure_column_owned(connection, project_id, relocation.placement.column_id)?;
            }
            for relocation in &owned {
                let placement = relocation.placement;
                diesel::update(board_tasks::table.find(relocation.task_id.value()))
                    .set((
                        board_tasks::column_id.eq(placement.column_id.value()),
                        board_tasks::swimlane_id.eq(placement.swimlane_id.value()),
                        board_tasks::position.eq(position_to_db(placement.position)?),
                    ))
                    .execute(connection)?;
            }
            Ok(((), !owned.is_empty()))
        })
        .await
    }
}

#[async_trait]
impl SwimlaneRepository for PostgresBoardStore {
    async fn list_swimlanes(&self, project_id: ProjectId) -> BoardStoreResult<Vec<Swimlane>> {
        self.run_blocking(move |connection| load_swimlanes(connection, project_id)).await
    }

    async fn add_swimlane(
        &self,
        project_id: ProjectId,
        name: &str,
        stamp: ChangeStamp,
    ) -> BoardStoreResult<Swimlane> {
        let owned_name = name.trim().to_owned();
        self.mutate(project_id, stamp, move |connection| {
            let last_position: Option<i32> = swimlanes::table
                .filter(swimlanes::project_id.eq(project_id.value()))
                .select(diesel::dsl::max(swimlanes::position))
                .first(connection)?;
            let row = NewSwimlaneRow {
                project_id: project_id.value(),
                name: owned_name,
                position: last_position.unwrap_or(0).saturating_add(1),
            };
            let inserted = diesel::insert_into(swimlanes::table)
                .values(&row)
                .returning(SwimlaneRow::as_returning())
                .get_result::<SwimlaneRow>(connection)?;
            Ok((row_to_swimlane(inserted)?, true))
        })
        .await
    }
}

#[async_trait]
impl BoardReader for PostgresBoardStore {
    async fn read_board(&self, project_id: ProjectId) -> BoardStoreResult<BoardContents> {
        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .read_only()
                .repeatable_read()
                .run::<_, BoardStoreError, _>(|tx| {
                    let state = load_state(tx, project_id)?;
                    let swimlanes = load_swimlanes(tx, project_id)?;
                    let columns = load_project_columns(tx, project_id)?
                        .into_iter()
                        .map(row_to_column)
                        .collect::<BoardStoreResult<Vec<_>>>()?;
                    let tasks = board_tasks::table
                        .filter(board_tasks::project_id.eq(project_id.value()))
                        .filter(board_tasks::is_active.eq(true))
                        .select(TaskRow::as_select())
                        .load::<TaskRow>(tx)?
                        .into_iter()
                        .map(row_to_task)
                        .collect::<BoardStoreResult<Vec<_>>>()?;
                    Ok(BoardContents {
                        state,
                        swimlanes,
                        columns,
                        tasks,
                    })
                })
        })
        .await
    }
}
