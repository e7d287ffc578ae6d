//! Ordered-list abstraction behind column reordering and task moves.
//!
//! Positions are derived from list indices, so reordering is expressed as
//! list edits (`swap`, `remove`, `insert_clamped`) and persistence only has to
//! write the resulting `(id, position)` pairs.

use super::Position;

/// Item identifier paired with its stored position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionEntry<T> {
    /// Item identifier.
    pub id: T,
    /// Stored position of the item.
    pub position: Position,
}

impl<T> PositionEntry<T> {
    /// Creates an entry.
    #[must_use]
    pub const fn new(id: T, position: Position) -> Self {
        Self { id, position }
    }
}

/// Direction of a single-step reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards position 1.
    Up,
    /// Towards the last position.
    Down,
}

impl Direction {
    /// Returns the neighbouring index, or `None` at the boundary.
    const fn neighbour(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Self::Up if index > 0 => Some(index - 1),
            Self::Down if index + 1 < len => Some(index + 1),
            _ => None,
        }
    }
}

/// Two position writes that exchange the positions of neighbouring items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionSwap<T> {
    /// The item that was asked to move, with its new position.
    pub moved: PositionEntry<T>,
    /// The neighbour it traded places with, with its new position.
    pub displaced: PositionEntry<T>,
}

/// Sequence of identifiers whose order defines their positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedIds<T> {
    items: Vec<T>,
}

impl<T> Default for OrderedIds<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Copy + Eq> OrderedIds<T> {
    /// Creates a list from identifiers already in display order.
    #[must_use]
    pub const fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Creates a list ordered by stored position.
    ///
    /// Entries sharing a position keep their input order.
    #[must_use]
    pub fn from_entries(entries: &[PositionEntry<T>]) -> Self {
        let mut sorted = entries.to_vec();
        sorted.sort_by_key(|entry| entry.position);
        Self {
            items: sorted.into_iter().map(|entry| entry.id).collect(),
        }
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when the list holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the identifiers in order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Returns the identifier at a zero-based index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.get(index).copied()
    }

    /// Returns the zero-based index of an identifier.
    #[must_use]
    pub fn index_of(&self, id: T) -> Option<usize> {
        self.items.iter().position(|item| *item == id)
    }

    /// Returns the position an identifier currently occupies.
    #[must_use]
    pub fn position_of(&self, id: T) -> Option<Position> {
        self.index_of(id).map(Position::from_index)
    }

    /// Exchanges the items at two indices.
    ///
    /// Returns `false` and leaves the list untouched when either index is out
    /// of bounds.
    pub fn swap(&mut self, first: usize, second: usize) -> bool {
        if first >= self.items.len() || second >= self.items.len() {
            return false;
        }
        self.items.swap(first, second);
        true
    }

    /// Removes an identifier and returns its former index.
    pub fn remove(&mut self, id: T) -> Option<usize> {
        let index = self.index_of(id)?;
        self.items.remove(index);
        Some(index)
    }

    /// Inserts an identifier at `position`, clamped to `[1, len + 1]`.
    ///
    /// Returns the position actually used.
    pub fn insert_clamped(&mut self, id: T, position: Position) -> Position {
        let index = position.index().min(self.items.len());
        self.items.insert(index, id);
        Position::from_index(index)
    }

    /// Returns every identifier paired with its dense position `1..=len`.
    pub fn renumbered(&self) -> impl Iterator<Item = PositionEntry<T>> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(|(index, id)| PositionEntry::new(*id, Position::from_index(index)))
    }
}

/// Plans a single-step reorder of `id` within `entries`.
///
/// The item trades places with its neighbour in display order and the two
/// items exchange their stored position values, so the positions of every
/// other item are untouched. Returns `None` when `id` is absent or already at
/// the boundary in `direction`.
#[must_use]
pub fn plan_swap<T: Copy + Eq>(
    entries: &[PositionEntry<T>],
    id: T,
    direction: Direction,
) -> Option<PositionSwap<T>> {
    let mut order = OrderedIds::from_entries(entries);
    let mut slots: Vec<Position> = entries.iter().map(|entry| entry.position).collect();
    slots.sort_unstable();

    let index = order.index_of(id)?;
    let neighbour = direction.neighbour(index, order.len())?;
    if !order.swap(index, neighbour) {
        return None;
    }

    let displaced_id = order.get(index)?;
    Some(PositionSwap {
        moved: PositionEntry::new(id, *slots.get(neighbour)?),
        displaced: PositionEntry::new(displaced_id, *slots.get(index)?),
    })
}
