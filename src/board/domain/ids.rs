//! Identifier and position types for the board domain.
//!
//! Identifiers are the integer keys used on the wire and in storage. They are
//! wrapped so a column id can never be passed where a task id is expected.

use super::BoardDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! board_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a persisted integer identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the persisted integer identifier.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

board_id!(
    /// Identifier of the project that owns a board.
    ProjectId
);

board_id!(
    /// Identifier of a board column.
    ColumnId
);

board_id!(
    /// Identifier of a swimlane.
    SwimlaneId
);

board_id!(
    /// Identifier of a task placed on the board.
    TaskId
);

impl Default for SwimlaneId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl SwimlaneId {
    /// Identifier of the implicit swimlane every project has.
    pub const DEFAULT: Self = Self(0);

    /// Returns `true` for the implicit default swimlane.
    #[must_use]
    pub const fn is_default(self) -> bool {
        self.0 == Self::DEFAULT.0
    }
}

/// One-based rank of an item inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Position(u32);

impl Position {
    /// The first position of any container.
    pub const FIRST: Self = Self(1);

    /// Creates a validated position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidPosition`] when `value` is zero.
    pub const fn new(value: u32) -> Result<Self, BoardDomainError> {
        if value == 0 {
            return Err(BoardDomainError::InvalidPosition(0));
        }
        Ok(Self(value))
    }

    /// Validates a position received from a client or from storage.
    ///
    /// Values beyond `u32::MAX` saturate; callers clamp them to the end of
    /// their container.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidPosition`] when `value` is below 1.
    pub fn from_requested(value: i64) -> Result<Self, BoardDomainError> {
        if value < 1 {
            return Err(BoardDomainError::InvalidPosition(value));
        }
        Ok(Self(u32::try_from(value).unwrap_or(u32::MAX)))
    }

    /// Returns the position occupied by the item at a zero-based index.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).map_or(u32::MAX, |value| value.saturating_add(1)))
    }

    /// Returns the zero-based index matching this position.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Returns the raw one-based value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the position directly after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl TryFrom<u32> for Position {
    type Error = BoardDomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Position> for u32 {
    fn from(position: Position) -> Self {
        position.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}
