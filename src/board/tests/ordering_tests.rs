//! Tests for the pure reordering algorithms.

use crate::board::domain::{
    ColumnId, Direction, OrderedIds, Position, PositionEntry, PositionSwap, ProjectId, SwimlaneId,
    TaskCard, TaskId, TaskPlacement, plan_move, plan_swap,
};
use rstest::rstest;

fn at(value: u32) -> Position {
    Position::new(value).expect("valid position")
}

fn entries(pairs: &[(char, u32)]) -> Vec<PositionEntry<char>> {
    pairs
        .iter()
        .map(|&(id, position)| PositionEntry::new(id, at(position)))
        .collect()
}

// ============================================================================
// Single-step swaps
// ============================================================================

#[test]
fn moving_up_trades_places_with_previous_item() {
    let swap = plan_swap(&entries(&[('A', 1), ('B', 2), ('C', 3)]), 'C', Direction::Up);

    assert_eq!(
        swap,
        Some(PositionSwap {
            moved: PositionEntry::new('C', at(2)),
            displaced: PositionEntry::new('B', at(3)),
        })
    );
}

#[test]
fn swap_exchanges_stored_values_across_gaps() {
    let swap = plan_swap(&entries(&[('A', 2), ('B', 5), ('C', 9)]), 'A', Direction::Down);

    assert_eq!(
        swap,
        Some(PositionSwap {
            moved: PositionEntry::new('A', at(5)),
            displaced: PositionEntry::new('B', at(2)),
        })
    );
}

#[test]
fn swap_orders_by_position_not_input_order() {
    let swap = plan_swap(&entries(&[('C', 3), ('A', 1), ('B', 2)]), 'B', Direction::Up);

    assert_eq!(swap.map(|planned| planned.displaced.id), Some('A'));
}

#[rstest]
#[case('A', Direction::Up)]
#[case('C', Direction::Down)]
#[case('Z', Direction::Up)]
fn swap_at_boundary_or_for_unknown_item_is_none(#[case] id: char, #[case] direction: Direction) {
    assert_eq!(
        plan_swap(&entries(&[('A', 1), ('B', 2), ('C', 3)]), id, direction),
        None
    );
}

#[test]
fn single_item_cannot_move() {
    let single = entries(&[('A', 1)]);
    assert_eq!(plan_swap(&single, 'A', Direction::Up), None);
    assert_eq!(plan_swap(&single, 'A', Direction::Down), None);
}

// ============================================================================
// Ordered lists
// ============================================================================

#[test]
fn insert_clamps_to_end_of_list() {
    let mut order = OrderedIds::new(vec![1, 2]);

    assert_eq!(order.insert_clamped(9, at(40)), at(3));
    assert_eq!(order.as_slice(), [1, 2, 9]);
}

#[test]
fn renumbering_is_dense_from_one() {
    let order = OrderedIds::from_entries(&entries(&[('B', 7), ('A', 3)]));
    let renumbered: Vec<PositionEntry<char>> = order.renumbered().collect();

    assert_eq!(renumbered, entries(&[('A', 1), ('B', 2)]));
}

#[test]
fn swap_out_of_bounds_leaves_list_untouched() {
    let mut order = OrderedIds::new(vec!['A', 'B']);
    assert!(!order.swap(0, 2));
    assert_eq!(order.as_slice(), ['A', 'B']);
}

// ============================================================================
// Task moves
// ============================================================================

const PROJECT: ProjectId = ProjectId::new(1);
const COLUMN_A: ColumnId = ColumnId::new(10);
const COLUMN_C: ColumnId = ColumnId::new(30);

fn task(id: i64, column_id: ColumnId, position: u32) -> TaskCard {
    TaskCard::from_persisted(
        TaskId::new(id),
        PROJECT,
        format!("t{id}"),
        TaskPlacement::new(column_id, SwimlaneId::DEFAULT, at(position)),
        true,
    )
}

fn target(column_id: ColumnId, position: u32) -> TaskPlacement {
    TaskPlacement::new(column_id, SwimlaneId::DEFAULT, at(position))
}

#[test]
fn move_into_empty_bucket_clamps_and_closes_gap() {
    let source = vec![task(1, COLUMN_A, 1), task(2, COLUMN_A, 2)];
    let moved = &source[0];

    let plan = plan_move(moved, &source, &[], target(COLUMN_C, 2));

    assert_eq!(plan.placement, target(COLUMN_C, 1));
    let placements: Vec<(i64, TaskPlacement)> = plan
        .relocations
        .iter()
        .map(|relocation| (relocation.task_id.value(), relocation.placement))
        .collect();
    assert_eq!(
        placements,
        [(2, target(COLUMN_A, 1)), (1, target(COLUMN_C, 1))]
    );
}

#[test]
fn move_within_bucket_shifts_neighbours() {
    let bucket = vec![
        task(1, COLUMN_A, 1),
        task(2, COLUMN_A, 2),
        task(3, COLUMN_A, 3),
    ];

    let plan = plan_move(&bucket[2], &bucket, &[], target(COLUMN_A, 1));

    let order: Vec<(i64, u32)> = plan
        .relocations
        .iter()
        .map(|relocation| {
            (
                relocation.task_id.value(),
                relocation.placement.position.value(),
            )
        })
        .collect();
    assert_eq!(order, [(3, 1), (1, 2), (2, 3)]);
}

#[test]
fn move_to_current_slot_is_a_noop() {
    let bucket = vec![task(1, COLUMN_A, 1), task(2, COLUMN_A, 2)];

    let plan = plan_move(&bucket[1], &bucket, &[], target(COLUMN_A, 2));

    assert!(plan.is_noop());
    assert_eq!(plan.placement, target(COLUMN_A, 2));
}

#[test]
fn past_end_request_in_same_bucket_is_a_noop_for_last_task() {
    let bucket = vec![task(1, COLUMN_A, 1), task(2, COLUMN_A, 2)];

    let plan = plan_move(&bucket[1], &bucket, &[], target(COLUMN_A, 50));

    assert!(plan.is_noop());
}

#[test]
fn move_heals_gaps_in_both_buckets() {
    let source = vec![task(1, COLUMN_A, 2), task(2, COLUMN_A, 6)];
    let destination = vec![task(3, COLUMN_C, 4)];

    let plan = plan_move(&source[1], &source, &destination, target(COLUMN_C, 1));

    let mut placements: Vec<(i64, TaskPlacement)> = plan
        .relocations
        .iter()
        .map(|relocation| (relocation.task_id.value(), relocation.placement))
        .collect();
    placements.sort_by_key(|(id, _)| *id);
    assert_eq!(
        placements,
        [
            (1, target(COLUMN_A, 1)),
            (2, target(COLUMN_C, 1)),
            (3, target(COLUMN_C, 2)),
        ]
    );
}

#[test]
fn swimlane_change_in_same_column_is_a_bucket_move() {
    let lane = SwimlaneId::new(4);
    let source = vec![task(1, COLUMN_A, 1)];
    let requested = TaskPlacement::new(COLUMN_A, lane, at(1));

    let plan = plan_move(&source[0], &source, &[], requested);

    assert_eq!(plan.placement, requested);
    assert_eq!(plan.relocations.len(), 1);
}
