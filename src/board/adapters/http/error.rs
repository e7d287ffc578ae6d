//! Mapping of board errors onto HTTP responses.

use crate::board::{
    ports::BoardErrorKind,
    services::{BoardSyncError, ColumnManagerError, TaskPlacementError},
};
use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// JSON error body returned by every board route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error class.
    pub error: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// Error response of a board route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    status: StatusCode,
    body: ErrorBody,
}

impl HttpError {
    /// Builds an error response for a classified failure.
    #[must_use]
    pub fn new(kind: BoardErrorKind, message: impl Into<String>) -> Self {
        let status = match kind {
            BoardErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            BoardErrorKind::NotFound => StatusCode::NOT_FOUND,
            BoardErrorKind::ConcurrencyConflict => StatusCode::CONFLICT,
            BoardErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            body: ErrorBody {
                error: kind.as_str(),
                message: message.into(),
            },
        }
    }

    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Keeps the status an axum extractor chose for malformed input.
    const fn rejected(status: StatusCode, message: String) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: BoardErrorKind::Validation.as_str(),
                message,
            },
        }
    }

    fn classified(kind: BoardErrorKind, err: &dyn std::error::Error) -> Self {
        if kind == BoardErrorKind::Persistence {
            tracing::error!(error = %err, "board persistence failure");
            return Self::new(kind, "board storage failed");
        }
        Self::new(kind, err.to_string())
    }
}

impl From<ColumnManagerError> for HttpError {
    fn from(err: ColumnManagerError) -> Self {
        Self::classified(err.kind(), &err)
    }
}

impl From<TaskPlacementError> for HttpError {
    fn from(err: TaskPlacementError) -> Self {
        Self::classified(err.kind(), &err)
    }
}

impl From<BoardSyncError> for HttpError {
    fn from(err: BoardSyncError) -> Self {
        Self::classified(err.kind(), &err)
    }
}

impl From<PathRejection> for HttpError {
    fn from(rejection: PathRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<FormRejection> for HttpError {
    fn from(rejection: FormRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Result type for board route handlers.
pub type HttpResult<T> = Result<T, HttpError>;
