//! Typed representation of the bulk column edit form.
//!
//! The form submits parallel `title[<column_id>]` and
//! `task_limit[<column_id>]` fields. They are folded into one entry per
//! column and every entry is validated by the same rules.

use super::{BoardDomainError, ColumnId, ColumnSpec, ColumnTitle, ColumnUpdate, TaskLimit};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Field of a bulk column form entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnField {
    /// The `title[<id>]` field.
    Title,
    /// The `task_limit[<id>]` field.
    TaskLimit,
}

impl ColumnField {
    /// Returns the form field prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::TaskLimit => "task_limit",
        }
    }
}

/// Raw values submitted for one column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnFormEntry {
    /// Submitted title, if any.
    pub title: Option<String>,
    /// Submitted task limit override, if any.
    pub task_limit: Option<String>,
}

/// Validation failure for one field of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFieldError {
    /// Column whose entry failed validation.
    pub column_id: ColumnId,
    /// Field that failed validation.
    pub field: ColumnField,
    /// Validation error.
    pub error: BoardDomainError,
}

impl fmt::Display for ColumnFieldError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}[{}]: {}",
            self.field.as_str(),
            self.column_id,
            self.error
        )
    }
}

/// Errors raised while reading or validating the bulk column form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ColumnFormError {
    /// A field key carried a column id that is not an integer.
    #[error("malformed column form field '{0}'")]
    MalformedKey(String),

    /// The form did not reference any column.
    #[error("column form is empty")]
    Empty,

    /// One or more entries failed validation.
    #[error("invalid column form: {}", join_errors(.0))]
    InvalidFields(Vec<ColumnFieldError>),
}

fn join_errors(errors: &[ColumnFieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Bulk update of column titles and task limits, keyed by column id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnBulkUpdate {
    entries: BTreeMap<ColumnId, ColumnFormEntry>,
}

impl ColumnBulkUpdate {
    /// Creates an empty bulk update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the entry for a column.
    #[must_use]
    pub fn with_entry(
        mut self,
        column_id: ColumnId,
        title: impl Into<String>,
        task_limit: impl Into<String>,
    ) -> Self {
        self.entries.insert(
            column_id,
            ColumnFormEntry {
                title: Some(title.into()),
                task_limit: Some(task_limit.into()),
            },
        );
        self
    }

    /// Folds urlencoded form pairs into per-column entries.
    ///
    /// Keys other than `title[<id>]` and `task_limit[<id>]` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnFormError::MalformedKey`] when a recognised key carries
    /// a non-integer column id.
    pub fn from_form_pairs<I, K, V>(pairs: I) -> Result<Self, ColumnFormError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut update = Self::new();
        for (key, value) in pairs {
            let Some((field, column_id)) = parse_field_key(key.as_ref())? else {
                continue;
            };
            let entry = update.entries.entry(column_id).or_default();
            match field {
                ColumnField::Title => entry.title = Some(value.into()),
                ColumnField::TaskLimit => entry.task_limit = Some(value.into()),
            }
        }
        Ok(update)
    }

    /// Returns the referenced column ids in ascending order.
    pub fn column_ids(&self) -> impl Iterator<Item = ColumnId> + '_ {
        self.entries.keys().copied()
    }

    /// Returns `true` when no column is referenced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validates every entry and converts the form into column updates.
    ///
    /// Titles are required and limited to 50 characters. A submitted task
    /// limit must be an integer greater than zero; an absent or blank limit
    /// leaves the column unlimited. All failures are collected.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnFormError::Empty`] for an empty form or
    /// [`ColumnFormError::InvalidFields`] listing every invalid field.
    pub fn validate(&self) -> Result<Vec<ColumnUpdate>, ColumnFormError> {
        if self.entries.is_empty() {
            return Err(ColumnFormError::Empty);
        }

        let mut updates = Vec::with_capacity(self.entries.len());
        let mut errors = Vec::new();
        for (&column_id, entry) in &self.entries {
            let title = ColumnTitle::new(entry.title.clone().unwrap_or_default()).map_err(|error| {
                ColumnFieldError {
                    column_id,
                    field: ColumnField::Title,
                    error,
                }
            });
            let task_limit = parse_limit_override(entry.task_limit.as_deref()).map_err(|error| {
                ColumnFieldError {
                    column_id,
                    field: ColumnField::TaskLimit,
                    error,
                }
            });

            match (title, task_limit) {
                (Ok(valid_title), Ok(valid_limit)) => updates.push(ColumnUpdate {
                    column_id,
                    spec: ColumnSpec::new(valid_title, valid_limit),
                }),
                (title_result, limit_result) => {
                    errors.extend(title_result.err());
                    errors.extend(limit_result.err());
                }
            }
        }

        if errors.is_empty() {
            Ok(updates)
        } else {
            Err(ColumnFormError::InvalidFields(errors))
        }
    }
}

fn parse_limit_override(raw: Option<&str>) -> Result<TaskLimit, BoardDomainError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(TaskLimit::UNLIMITED);
    };
    let parsed = value
        .parse::<i64>()
        .map_err(|_| BoardDomainError::TaskLimitNotInteger(value.to_owned()))?;
    TaskLimit::from_override(parsed)
}

fn parse_field_key(key: &str) -> Result<Option<(ColumnField, ColumnId)>, ColumnFormError> {
    let Some((prefix, rest)) = key.split_once('[') else {
        return Ok(None);
    };
    let field = match prefix {
        "title" => ColumnField::Title,
        "task_limit" => ColumnField::TaskLimit,
        _ => return Ok(None),
    };
    let raw_id = rest
        .strip_suffix(']')
        .ok_or_else(|| ColumnFormError::MalformedKey(key.to_owned()))?;
    let column_id = raw_id
        .parse::<i64>()
        .map_err(|_| ColumnFormError::MalformedKey(key.to_owned()))?;
    Ok(Some((field, ColumnId::new(column_id))))
}
