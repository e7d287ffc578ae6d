//! Column lifecycle and reordering for a project.

use crate::board::{
    domain::{
        BoardDomainError, ChangeStamp, Column, ColumnBulkUpdate, ColumnFormError, ColumnId,
        ColumnSpec, ColumnTitle, ColumnUpdate, Direction, OrderedIds, ProjectId, plan_swap,
    },
    ports::{BoardErrorKind, BoardStore, BoardStoreError, PositionContainer},
};
use crate::config::BoardConfig;
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for column operations.
#[derive(Debug, Error)]
pub enum ColumnManagerError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// The bulk column form was invalid.
    #[error(transparent)]
    Form(#[from] ColumnFormError),

    /// The column does not belong to the project.
    #[error("column {column_id} not found in project {project_id}")]
    ColumnNotFound {
        /// Project the caller addressed.
        project_id: ProjectId,
        /// Missing column.
        column_id: ColumnId,
    },

    /// Concurrent writers kept changing the board.
    #[error("column {column_id} could not be moved after {attempts} attempts")]
    Conflict {
        /// Column that was being moved.
        column_id: ColumnId,
        /// Attempts made.
        attempts: u32,
    },

    /// Repository operation failed.
    #[error(transparent)]
    Store(#[from] BoardStoreError),
}

impl ColumnManagerError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> BoardErrorKind {
        match self {
            Self::Domain(_) | Self::Form(_) => BoardErrorKind::Validation,
            Self::ColumnNotFound { .. } => BoardErrorKind::NotFound,
            Self::Conflict { .. } => BoardErrorKind::ConcurrencyConflict,
            Self::Store(err) => err.kind(),
        }
    }
}

/// Result type for column manager operations.
pub type ColumnManagerResult<T> = Result<T, ColumnManagerError>;

/// Column lifecycle orchestration service.
#[derive(Clone)]
pub struct ColumnManager<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: Arc<BoardConfig>,
}

impl<S, C> ColumnManager<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    /// Creates a new column manager.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>, config: Arc<BoardConfig>) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Creates the given columns for a project, in order, in one transaction.
    ///
    /// A project without columns receives positions `1..=N`.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError::Domain`] when `specs` is empty or
    /// [`ColumnManagerError::Store`] when persistence fails, in which case no
    /// column was created.
    pub async fn create(
        &self,
        project_id: ProjectId,
        specs: &[ColumnSpec],
    ) -> ColumnManagerResult<Vec<Column>> {
        if specs.is_empty() {
            return Err(BoardDomainError::EmptyColumnTemplate.into());
        }
        let columns = self
            .store
            .insert_columns(project_id, specs, ChangeStamp::unguarded(&*self.clock))
            .await?;
        tracing::info!(
            project_id = %project_id,
            count = columns.len(),
            "columns created"
        );
        Ok(columns)
    }

    /// Creates the configured default columns for a project.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError`] when the template is invalid or
    /// persistence fails.
    pub async fn create_default(&self, project_id: ProjectId) -> ColumnManagerResult<Vec<Column>> {
        let specs = self.config.default_column_specs()?;
        self.create(project_id, &specs).await
    }

    /// Appends a column after the project's last position.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError::Domain`] for an invalid title or limit.
    pub async fn add_column(
        &self,
        project_id: ProjectId,
        title: &str,
        task_limit: i64,
    ) -> ColumnManagerResult<Column> {
        let spec = ColumnSpec::parse(title, task_limit)?;
        let created = self
            .store
            .insert_columns(
                project_id,
                std::slice::from_ref(&spec),
                ChangeStamp::unguarded(&*self.clock),
            )
            .await?;
        let column = created.into_iter().next().ok_or_else(|| {
            BoardStoreError::persistence(std::io::Error::other("column insert returned no row"))
        })?;
        tracing::info!(
            project_id = %project_id,
            column_id = %column.id(),
            position = %column.position(),
            "column added"
        );
        Ok(column)
    }

    /// Replaces title and task limit of one column.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError::Domain`] for invalid input or
    /// [`ColumnManagerError::ColumnNotFound`] when the column is not part of
    /// the project.
    pub async fn update_column(
        &self,
        project_id: ProjectId,
        column_id: ColumnId,
        title: &str,
        task_limit: i64,
    ) -> ColumnManagerResult<Column> {
        let update = ColumnUpdate {
            column_id,
            spec: ColumnSpec::parse(title, task_limit)?,
        };
        let mut updated = self
            .apply_updates(project_id, std::slice::from_ref(&update))
            .await?;
        updated
            .pop()
            .ok_or(ColumnManagerError::ColumnNotFound {
                project_id,
                column_id,
            })
    }

    /// Applies the bulk column form in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError::Form`] listing every invalid field, or
    /// [`ColumnManagerError::ColumnNotFound`] when an entry references a
    /// column outside the project. Nothing is written in either case.
    pub async fn bulk_update(
        &self,
        project_id: ProjectId,
        form: &ColumnBulkUpdate,
    ) -> ColumnManagerResult<Vec<Column>> {
        let updates = form.validate()?;
        let updated = self.apply_updates(project_id, &updates).await?;
        tracing::info!(
            project_id = %project_id,
            count = updated.len(),
            "columns updated"
        );
        Ok(updated)
    }

    async fn apply_updates(
        &self,
        project_id: ProjectId,
        updates: &[ColumnUpdate],
    ) -> ColumnManagerResult<Vec<Column>> {
        self.store
            .update_columns(project_id, updates, ChangeStamp::unguarded(&*self.clock))
            .await
            .map_err(|err| match err {
                BoardStoreError::ColumnNotFound(column_id) => ColumnManagerError::ColumnNotFound {
                    project_id,
                    column_id,
                },
                other => other.into(),
            })
    }

    /// Moves a column one step towards position 1.
    ///
    /// Returns `false` when the column is already first.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError::ColumnNotFound`] for an unknown column or
    /// [`ColumnManagerError::Conflict`] when concurrent writers exhausted the
    /// retry budget.
    pub async fn move_up(
        &self,
        project_id: ProjectId,
        column_id: ColumnId,
    ) -> ColumnManagerResult<bool> {
        self.move_column(project_id, column_id, Direction::Up).await
    }

    /// Moves a column one step towards the last position.
    ///
    /// Returns `false` when the column is already last.
    ///
    /// # Errors
    ///
    /// See [`Self::move_up`].
    pub async fn move_down(
        &self,
        project_id: ProjectId,
        column_id: ColumnId,
    ) -> ColumnManagerResult<bool> {
        self.move_column(project_id, column_id, Direction::Down).await
    }

    async fn move_column(
        &self,
        project_id: ProjectId,
        column_id: ColumnId,
        direction: Direction,
    ) -> ColumnManagerResult<bool> {
        let container = PositionContainer::ProjectColumns(project_id);
        let attempts = self.config.max_move_attempts();

        for attempt in 1..=attempts {
            let state = self.store.board_state(project_id).await?;
            let entries = self.store.list_ordered(container).await?;
            if !entries.iter().any(|entry| entry.id == column_id.value()) {
                return Err(ColumnManagerError::ColumnNotFound {
                    project_id,
                    column_id,
                });
            }

            let Some(swap) = plan_swap(&entries, column_id.value(), direction) else {
                tracing::debug!(
                    project_id = %project_id,
                    column_id = %column_id,
                    ?direction,
                    "column already at boundary"
                );
                return Ok(false);
            };

            let stamp = ChangeStamp::guarded(state.revision, &*self.clock);
            match self.store.swap_positions(container, swap, stamp).await {
                Ok(()) => {
                    tracing::info!(
                        project_id = %project_id,
                        column_id = %column_id,
                        position = %swap.moved.position,
                        "column moved"
                    );
                    return Ok(true);
                }
                Err(err) if err.is_conflict() => {
                    tracing::debug!(
                        project_id = %project_id,
                        column_id = %column_id,
                        attempt,
                        "column move raced another writer, retrying"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::warn!(
            project_id = %project_id,
            column_id = %column_id,
            attempts,
            "column move gave up after repeated conflicts"
        );
        Err(ColumnManagerError::Conflict {
            column_id,
            attempts,
        })
    }

    /// Deletes a column together with its tasks and renumbers the remaining
    /// columns.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError::ColumnNotFound`] when the column is not
    /// part of the project.
    pub async fn remove_column(
        &self,
        project_id: ProjectId,
        column_id: ColumnId,
    ) -> ColumnManagerResult<Column> {
        let removed = self
            .store
            .remove_column(project_id, column_id, ChangeStamp::unguarded(&*self.clock))
            .await
            .map_err(|err| match err {
                BoardStoreError::ColumnNotFound(missing) => ColumnManagerError::ColumnNotFound {
                    project_id,
                    column_id: missing,
                },
                other => other.into(),
            })?;
        tracing::info!(project_id = %project_id, column_id = %column_id, "column removed");
        Ok(removed)
    }

    /// Copies the ordered columns of one project onto another.
    ///
    /// The destination receives fresh ids and positions `1..=N` whatever
    /// gaps the source has.
    ///
    /// A source without columns leaves the destination untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError::Store`] when persistence fails.
    pub async fn duplicate(
        &self,
        from_project_id: ProjectId,
        to_project_id: ProjectId,
    ) -> ColumnManagerResult<Vec<Column>> {
        let specs: Vec<ColumnSpec> = self
            .store
            .list_columns(from_project_id)
            .await?
            .iter()
            .map(Column::spec)
            .collect();
        if specs.is_empty() {
            tracing::debug!(
                from_project_id = %from_project_id,
                to_project_id = %to_project_id,
                "source project has no columns to duplicate"
            );
            return Ok(Vec::new());
        }
        let columns = self.create(to_project_id, &specs).await?;
        tracing::info!(
            from_project_id = %from_project_id,
            to_project_id = %to_project_id,
            "columns duplicated"
        );
        Ok(columns)
    }

    /// Rewrites column positions to `1..=N` when they contain gaps or
    /// duplicates.
    ///
    /// Returns `false` when the positions were already sequential.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError::Store`] when persistence fails or the
    /// board changed while the renumbering was planned.
    pub async fn compact_positions(&self, project_id: ProjectId) -> ColumnManagerResult<bool> {
        let container = PositionContainer::ProjectColumns(project_id);
        let state = self.store.board_state(project_id).await?;
        let entries = self.store.list_ordered(container).await?;
        let order = OrderedIds::from_entries(&entries);
        if order.renumbered().eq(entries.iter().copied()) {
            return Ok(false);
        }

        let stamp = ChangeStamp::guarded(state.revision, &*self.clock);
        self.store
            .bulk_renumber(container, order.as_slice(), stamp)
            .await?;
        tracing::info!(project_id = %project_id, count = order.len(), "column positions compacted");
        Ok(true)
    }

    /// Counts active tasks per column across all swimlanes.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError::Store`] when persistence fails.
    pub async fn column_stats(
        &self,
        project_id: ProjectId,
    ) -> ColumnManagerResult<BTreeMap<ColumnId, usize>> {
        let stats = self.store.column_stats(project_id).await?;
        Ok(stats
            .into_iter()
            .map(|count| (count.column_id, count.total))
            .collect())
    }

    /// Lists a project's columns in position order.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError::Store`] when persistence fails.
    pub async fn list_columns(&self, project_id: ProjectId) -> ColumnManagerResult<Vec<Column>> {
        Ok(self.store.list_columns(project_id).await?)
    }

    /// Finds a column of the project.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError::Store`] when persistence fails.
    pub async fn find_column(
        &self,
        project_id: ProjectId,
        column_id: ColumnId,
    ) -> ColumnManagerResult<Option<Column>> {
        let found = self.store.find_column(column_id).await?;
        Ok(found.filter(|column| column.project_id() == project_id))
    }

    /// Returns the column at the lowest position.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError::Store`] when persistence fails.
    pub async fn first_column(&self, project_id: ProjectId) -> ColumnManagerResult<Option<Column>> {
        Ok(self.list_columns(project_id).await?.into_iter().next())
    }

    /// Returns `(id, title)` pairs in position order.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError::Store`] when persistence fails.
    pub async fn columns_list(
        &self,
        project_id: ProjectId,
    ) -> ColumnManagerResult<Vec<(ColumnId, ColumnTitle)>> {
        Ok(self
            .list_columns(project_id)
            .await?
            .into_iter()
            .map(|column| (column.id(), column.title().clone()))
            .collect())
    }

    /// Counts the project's columns.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError::Store`] when persistence fails.
    pub async fn count_columns(&self, project_id: ProjectId) -> ColumnManagerResult<usize> {
        Ok(self.list_columns(project_id).await?.len())
    }

    /// Returns the highest column position, or zero without columns.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnManagerError::Store`] when persistence fails.
    pub async fn last_column_position(&self, project_id: ProjectId) -> ColumnManagerResult<u32> {
        Ok(self
            .list_columns(project_id)
            .await?
            .iter()
            .map(|column| column.position().value())
            .max()
            .unwrap_or(0))
    }
}
