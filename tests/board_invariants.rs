//! Ordering invariants under sequences of operations and concurrent writers.
//!
//! Every test ends by checking that column positions and the task positions
//! of every (column, swimlane) bucket are exactly `1..=N`, and that no task
//! was lost or duplicated.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use std::collections::BTreeMap;
use std::sync::Arc;

use boardwalk::board::{
    adapters::memory::InMemoryBoardStore,
    domain::{BucketKey, ColumnId, ColumnSpec, ProjectId, SwimlaneId, TaskId},
    ports::{ColumnRepository, SwimlaneRepository, TaskPlacementRepository},
    services::{ColumnManager, TaskMove, TaskPlacementService},
};
use boardwalk::config::BoardConfig;
use eyre::{Result, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

const PROJECT: ProjectId = ProjectId::new(1);

struct Harness {
    store: Arc<InMemoryBoardStore>,
    columns: Arc<ColumnManager<InMemoryBoardStore, DefaultClock>>,
    tasks: Arc<TaskPlacementService<InMemoryBoardStore, DefaultClock>>,
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemoryBoardStore::new());
    let config = Arc::new(BoardConfig::default().with_max_move_attempts(200));
    let clock = Arc::new(DefaultClock);
    Harness {
        columns: Arc::new(ColumnManager::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            Arc::clone(&config),
        )),
        tasks: Arc::new(TaskPlacementService::new(Arc::clone(&store), clock, config)),
        store,
    }
}

impl Harness {
    async fn column_ids(&self) -> Vec<ColumnId> {
        self.store
            .list_columns(PROJECT)
            .await
            .expect("list columns")
            .iter()
            .map(|column| column.id())
            .collect()
    }

    async fn seed(&self, columns: usize, tasks_per_column: usize) -> Vec<TaskId> {
        let titles: Vec<String> = (1..=columns).map(|index| format!("Column {index}")).collect();
        let specs = ColumnSpec::template(&titles).expect("column template");
        let created = self
            .columns
            .create(PROJECT, &specs)
            .await
            .expect("create columns");

        let mut task_ids = Vec::new();
        for column in &created {
            for index in 0..tasks_per_column {
                let bucket = BucketKey::new(column.id(), SwimlaneId::DEFAULT);
                let card = self
                    .tasks
                    .place_new_task(PROJECT, bucket, &format!("{} #{index}", column.title()))
                    .await
                    .expect("place task");
                task_ids.push(card.id());
            }
        }
        task_ids
    }

    async fn assert_sequential(&self, expected_tasks: usize) -> Result<()> {
        let columns = self.store.list_columns(PROJECT).await?;
        for (index, column) in columns.iter().enumerate() {
            ensure!(
                column.position().index() == index,
                "column {} sits at {} but is number {} in order",
                column.id(),
                column.position(),
                index + 1
            );
        }

        let mut seen = BTreeMap::new();
        for swimlane in self.store.list_swimlanes(PROJECT).await? {
            for column in &columns {
                let bucket = BucketKey::new(column.id(), swimlane.id());
                let cards = self.store.list_bucket(PROJECT, bucket).await?;
                for (index, card) in cards.iter().enumerate() {
                    ensure!(
                        card.placement().position.index() == index,
                        "bucket {bucket:?} has a gap or duplicate at task {}",
                        card.id()
                    );
                    ensure!(
                        seen.insert(card.id(), bucket).is_none(),
                        "task {} appears twice",
                        card.id()
                    );
                }
            }
        }
        ensure!(
            seen.len() == expected_tasks,
            "expected {expected_tasks} tasks, found {}",
            seen.len()
        );
        Ok(())
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mixed_sequence_keeps_positions_sequential(harness: Harness) -> Result<()> {
    let tasks = harness.seed(4, 3).await;
    let columns = harness.column_ids().await;
    let (first, last) = (columns[0], columns[3]);

    harness.columns.move_down(PROJECT, first).await?;
    harness.columns.move_up(PROJECT, last).await?;
    harness
        .tasks
        .move_task(TaskMove::new(tasks[0], last).with_position(1))
        .await?;
    harness
        .tasks
        .move_task(TaskMove::new(tasks[5], first).with_position(99))
        .await?;
    harness.columns.remove_column(PROJECT, columns[1]).await?;

    // The removed column still held two of its three tasks.
    harness.assert_sequential(tasks.len() - 2).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_task_moves_preserve_ordering(harness: Harness) -> Result<()> {
    let tasks = harness.seed(3, 4).await;
    let columns = harness.column_ids().await;

    let requests = tasks
        .iter()
        .copied()
        .cycle()
        .zip(columns.iter().copied().cycle())
        .zip([1_i64, 3, 5, 2, 4].into_iter().cycle())
        .take(48);

    let mut handles = Vec::new();
    for ((task_id, column_id), position) in requests {
        let service = Arc::clone(&harness.tasks);
        handles.push(tokio::spawn(async move {
            service
                .move_task(TaskMove::new(task_id, column_id).with_position(position))
                .await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    harness.assert_sequential(tasks.len()).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_column_moves_keep_a_permutation(harness: Harness) -> Result<()> {
    harness.seed(6, 0).await;
    let columns = harness.column_ids().await;

    let mut handles = Vec::new();
    let requests = columns
        .iter()
        .copied()
        .cycle()
        .zip([true, false].into_iter().cycle())
        .take(36);
    for (column_id, upwards) in requests {
        let service = Arc::clone(&harness.columns);
        handles.push(tokio::spawn(async move {
            if upwards {
                service.move_up(PROJECT, column_id).await
            } else {
                service.move_down(PROJECT, column_id).await
            }
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let mut after = harness.column_ids().await;
    after.sort_unstable();
    let mut before = columns;
    before.sort_unstable();
    ensure!(after == before, "column set changed during reordering");
    harness.assert_sequential(0).await
}
