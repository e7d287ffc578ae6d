//! Column aggregate and its validated attributes.

use super::{BoardDomainError, ColumnId, Position, ProjectId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of characters in a column title.
pub const MAX_COLUMN_TITLE_LENGTH: usize = 50;

/// Validated, trimmed column title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnTitle(String);

impl ColumnTitle {
    /// Creates a validated column title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyColumnTitle`] when the trimmed title
    /// is empty or [`BoardDomainError::ColumnTitleTooLong`] when it exceeds
    /// [`MAX_COLUMN_TITLE_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyColumnTitle);
        }

        let length = trimmed.chars().count();
        if length > MAX_COLUMN_TITLE_LENGTH {
            return Err(BoardDomainError::ColumnTitleTooLong {
                length,
                max: MAX_COLUMN_TITLE_LENGTH,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ColumnTitle {
    type Error = BoardDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ColumnTitle> for String {
    fn from(title: ColumnTitle) -> Self {
        title.0
    }
}

impl AsRef<str> for ColumnTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ColumnTitle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Work-in-progress limit of a column.
///
/// Zero means unlimited. A non-zero limit is advisory: it is reported on the
/// board but never blocks a task move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskLimit(u32);

impl TaskLimit {
    /// A column without a limit.
    pub const UNLIMITED: Self = Self(0);

    /// Wraps a raw limit value, where zero means unlimited.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Validates a limit supplied when creating or editing a single column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidTaskLimit`] for negative values or
    /// values beyond `u32::MAX`.
    pub fn from_requested(value: i64) -> Result<Self, BoardDomainError> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| BoardDomainError::InvalidTaskLimit(value))
    }

    /// Validates a limit override submitted through the bulk column form.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::TaskLimitOverrideNotPositive`] when the
    /// value is zero or negative.
    pub fn from_override(value: i64) -> Result<Self, BoardDomainError> {
        if value <= 0 {
            return Err(BoardDomainError::TaskLimitOverrideNotPositive(value));
        }
        Self::from_requested(value)
    }

    /// Returns the raw limit value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns `true` when the column has no limit.
    #[must_use]
    pub const fn is_unlimited(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` when `task_count` exceeds a configured limit.
    #[must_use]
    pub fn is_exceeded_by(self, task_count: usize) -> bool {
        !self.is_unlimited()
            && u32::try_from(task_count)
                .ok()
                .is_none_or(|count| count > self.0)
    }
}

/// Column attributes that callers choose; the store assigns id and position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    title: ColumnTitle,
    task_limit: TaskLimit,
}

impl ColumnSpec {
    /// Creates a column specification.
    #[must_use]
    pub const fn new(title: ColumnTitle, task_limit: TaskLimit) -> Self {
        Self { title, task_limit }
    }

    /// Validates raw title and limit input.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError`] when the title or limit is invalid.
    pub fn parse(title: impl Into<String>, task_limit: i64) -> Result<Self, BoardDomainError> {
        Ok(Self::new(
            ColumnTitle::new(title)?,
            TaskLimit::from_requested(task_limit)?,
        ))
    }

    /// Builds an unlimited column template from a list of titles.
    ///
    /// Blank titles are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ColumnTitleTooLong`] when a title is too
    /// long or [`BoardDomainError::EmptyColumnTemplate`] when no titles remain.
    pub fn template<I, T>(titles: I) -> Result<Vec<Self>, BoardDomainError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let specs = titles
            .into_iter()
            .filter(|title| !title.as_ref().trim().is_empty())
            .map(|title| {
                ColumnTitle::new(title.as_ref()).map(|valid| Self::new(valid, TaskLimit::UNLIMITED))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if specs.is_empty() {
            return Err(BoardDomainError::EmptyColumnTemplate);
        }
        Ok(specs)
    }

    /// Returns the column title.
    #[must_use]
    pub const fn title(&self) -> &ColumnTitle {
        &self.title
    }

    /// Returns the column task limit.
    #[must_use]
    pub const fn task_limit(&self) -> TaskLimit {
        self.task_limit
    }
}

/// Board column owned by a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    id: ColumnId,
    project_id: ProjectId,
    title: ColumnTitle,
    position: Position,
    task_limit: TaskLimit,
}

/// Parameter object for reconstructing a persisted column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedColumnData {
    /// Persisted column identifier.
    pub id: ColumnId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Persisted title.
    pub title: ColumnTitle,
    /// Persisted position within the project.
    pub position: Position,
    /// Persisted task limit.
    pub task_limit: TaskLimit,
}

impl Column {
    /// Reconstructs a column from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedColumnData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            title: data.title,
            position: data.position,
            task_limit: data.task_limit,
        }
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the column title.
    #[must_use]
    pub const fn title(&self) -> &ColumnTitle {
        &self.title
    }

    /// Returns the column position within its project.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns the column task limit.
    #[must_use]
    pub const fn task_limit(&self) -> TaskLimit {
        self.task_limit
    }

    /// Returns the user-editable attributes of this column.
    #[must_use]
    pub fn spec(&self) -> ColumnSpec {
        ColumnSpec::new(self.title.clone(), self.task_limit)
    }

    /// Applies new attributes without touching the position.
    pub fn apply(&mut self, spec: ColumnSpec) {
        self.title = spec.title;
        self.task_limit = spec.task_limit;
    }

    /// Moves the column to a new position.
    pub const fn reposition(&mut self, position: Position) {
        self.position = position;
    }
}

/// Field update for an existing column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnUpdate {
    /// Column to update.
    pub column_id: ColumnId,
    /// Replacement attributes.
    pub spec: ColumnSpec,
}

/// Number of active tasks in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTaskCount {
    /// Column the count belongs to.
    pub column_id: ColumnId,
    /// Active tasks across every swimlane of the column.
    pub total: usize,
}
