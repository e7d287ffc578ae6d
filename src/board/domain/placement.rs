//! Task placement within (column, swimlane) buckets and move planning.

use super::{ColumnId, OrderedIds, Position, PositionEntry, ProjectId, SwimlaneId, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cell of the board shared by tasks with the same column and swimlane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketKey {
    /// Column of the bucket.
    pub column_id: ColumnId,
    /// Swimlane of the bucket.
    pub swimlane_id: SwimlaneId,
}

impl BucketKey {
    /// Creates a bucket key.
    #[must_use]
    pub const fn new(column_id: ColumnId, swimlane_id: SwimlaneId) -> Self {
        Self {
            column_id,
            swimlane_id,
        }
    }
}

/// Column, swimlane and rank of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskPlacement {
    /// Column holding the task.
    pub column_id: ColumnId,
    /// Swimlane holding the task.
    pub swimlane_id: SwimlaneId,
    /// Rank of the task inside its bucket.
    pub position: Position,
}

impl TaskPlacement {
    /// Creates a placement.
    #[must_use]
    pub const fn new(column_id: ColumnId, swimlane_id: SwimlaneId, position: Position) -> Self {
        Self {
            column_id,
            swimlane_id,
            position,
        }
    }

    /// Returns the bucket this placement belongs to.
    #[must_use]
    pub const fn bucket(&self) -> BucketKey {
        BucketKey::new(self.column_id, self.swimlane_id)
    }
}

/// Task as seen by the board: identity, title and placement.
///
/// Every other task attribute belongs to the task entity and is never read
/// here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCard {
    id: TaskId,
    project_id: ProjectId,
    title: String,
    #[serde(flatten)]
    placement: TaskPlacement,
    is_active: bool,
}

impl TaskCard {
    /// Reconstructs a task card from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: TaskId,
        project_id: ProjectId,
        title: String,
        placement: TaskPlacement,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            project_id,
            title,
            placement,
            is_active,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task placement.
    #[must_use]
    pub const fn placement(&self) -> TaskPlacement {
        self.placement
    }

    /// Returns `true` while the task is open.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Replaces the placement.
    pub const fn relocate(&mut self, placement: TaskPlacement) {
        self.placement = placement;
    }
}

/// New placement for one task produced by a move plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRelocation {
    /// Task to update.
    pub task_id: TaskId,
    /// Placement to persist.
    pub placement: TaskPlacement,
}

/// Writes required to move one task, plus its final placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    /// Every task whose placement changes, the moved task included.
    pub relocations: Vec<TaskRelocation>,
    /// Placement of the moved task after the plan is applied.
    pub placement: TaskPlacement,
}

impl MovePlan {
    /// Returns `true` when applying the plan would change nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.relocations.is_empty()
    }
}

/// Plans moving `task` to `target`.
///
/// `source` lists the tasks of the task's current bucket and `destination`
/// the tasks of the target bucket (ignored when both buckets are the same).
/// The task is excised from its source ordering and inserted into the
/// destination ordering at `target.position`, clamped to
/// `[1, destination_count + 1]`. Both buckets are renumbered densely and only
/// tasks whose placement differs from their current one are returned.
#[must_use]
pub fn plan_move(
    task: &TaskCard,
    source: &[TaskCard],
    destination: &[TaskCard],
    target: TaskPlacement,
) -> MovePlan {
    let source_bucket = task.placement().bucket();
    let target_bucket = target.bucket();
    let same_bucket = source_bucket == target_bucket;

    let current: HashMap<TaskId, TaskPlacement> = source
        .iter()
        .chain(destination.iter())
        .map(|card| (card.id(), card.placement()))
        .chain(std::iter::once((task.id(), task.placement())))
        .collect();

    let mut source_order = ordered_bucket(source);
    source_order.remove(task.id());

    let mut relocations = Vec::new();
    let placed_at = if same_bucket {
        let placed = source_order.insert_clamped(task.id(), target.position);
        collect_changes(&source_order, source_bucket, &current, &mut relocations);
        placed
    } else {
        let mut destination_order = ordered_bucket(destination);
        destination_order.remove(task.id());
        let placed = destination_order.insert_clamped(task.id(), target.position);
        collect_changes(&source_order, source_bucket, &current, &mut relocations);
        collect_changes(&destination_order, target_bucket, &current, &mut relocations);
        placed
    };

    MovePlan {
        relocations,
        placement: TaskPlacement::new(target.column_id, target.swimlane_id, placed_at),
    }
}

fn ordered_bucket(cards: &[TaskCard]) -> OrderedIds<TaskId> {
    let entries: Vec<PositionEntry<TaskId>> = cards
        .iter()
        .map(|card| PositionEntry::new(card.id(), card.placement().position))
        .collect();
    OrderedIds::from_entries(&entries)
}

fn collect_changes(
    order: &OrderedIds<TaskId>,
    bucket: BucketKey,
    current: &HashMap<TaskId, TaskPlacement>,
    relocations: &mut Vec<TaskRelocation>,
) {
    for entry in order.renumbered() {
        let placement = TaskPlacement::new(bucket.column_id, bucket.swimlane_id, entry.position);
        if current.get(&entry.id) != Some(&placement) {
            relocations.push(TaskRelocation {
                task_id: entry.id,
                placement,
            });
        }
    }
}
