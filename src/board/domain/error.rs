//! Error types for board domain validation.

use thiserror::Error;

/// Errors returned while constructing board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The column title is empty after trimming.
    #[error("column title is required")]
    EmptyColumnTitle,

    /// The column title exceeds the storage limit.
    #[error("column title is {length} characters long, the maximum is {max}")]
    ColumnTitleTooLong {
        /// Length of the rejected title in characters.
        length: usize,
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// A task limit was negative or out of range.
    #[error("invalid task limit {0}, expected a non-negative integer")]
    InvalidTaskLimit(i64),

    /// A task limit override was not strictly positive.
    #[error("task limit override {0} must be greater than 0")]
    TaskLimitOverrideNotPositive(i64),

    /// A task limit value could not be parsed as an integer.
    #[error("task limit '{0}' must be an integer")]
    TaskLimitNotInteger(String),

    /// A requested position was below 1 or out of range.
    #[error("invalid position {0}, expected a positive integer")]
    InvalidPosition(i64),

    /// A column template contained no columns.
    #[error("a board needs at least one column")]
    EmptyColumnTemplate,

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// The swimlane name is empty after trimming.
    #[error("swimlane name must not be empty")]
    EmptySwimlaneName,
}
