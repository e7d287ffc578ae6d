//! Board revisions, optimistic change stamps and client version tokens.

use super::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Monotonic counter of committed changes to a project's board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardRevision(u64);

impl BoardRevision {
    /// Revision of a board that was never changed.
    pub const INITIAL: Self = Self(0);

    /// Wraps a persisted revision number.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw revision number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the revision that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for BoardRevision {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "r{}", self.0)
    }
}

/// Current revision of a board and when it was last modified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    /// Current revision.
    pub revision: BoardRevision,
    /// Time of the last committed change, if any.
    pub modified_at: Option<DateTime<Utc>>,
}

impl BoardState {
    /// Returns the state after committing one more change at `at`.
    #[must_use]
    pub const fn advanced(self, at: DateTime<Utc>) -> Self {
        Self {
            revision: self.revision.next(),
            modified_at: Some(at),
        }
    }
}

/// Metadata attached to every board mutation.
///
/// A guarded stamp carries the revision the caller read before planning the
/// change; the store refuses to apply it when the board has moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeStamp {
    expected: Option<BoardRevision>,
    at: DateTime<Utc>,
}

impl ChangeStamp {
    /// Creates a stamp that applies regardless of the current revision.
    #[must_use]
    pub fn unguarded(clock: &impl Clock) -> Self {
        Self {
            expected: None,
            at: clock.utc(),
        }
    }

    /// Creates a stamp that only applies while the board is at `expected`.
    #[must_use]
    pub fn guarded(expected: BoardRevision, clock: &impl Clock) -> Self {
        Self {
            expected: Some(expected),
            at: clock.utc(),
        }
    }

    /// Returns the revision the change was planned against, if guarded.
    #[must_use]
    pub const fn expected(&self) -> Option<BoardRevision> {
        self.expected
    }

    /// Returns the modification timestamp.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Returns `true` when the stamp may be applied at `current`.
    #[must_use]
    pub fn admits(&self, current: BoardRevision) -> bool {
        self.expected.is_none_or(|expected| expected == current)
    }
}

/// Opaque board version handed to polling clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardVersion(String);

impl BoardVersion {
    /// Derives the version token of a project board at a revision.
    #[must_use]
    pub fn of(project_id: ProjectId, revision: BoardRevision) -> Self {
        let digest = Sha256::digest(format!("{project_id}:{}", revision.value()));
        let token = digest
            .iter()
            .flat_map(|byte| [byte >> 4, byte & 0x0f])
            .filter_map(|nibble| char::from_digit(u32::from(nibble), 16))
            .collect();
        Self(token)
    }

    /// Wraps a token supplied by a client.
    #[must_use]
    pub fn from_client(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_owned())
    }

    /// Returns the token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardVersion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
