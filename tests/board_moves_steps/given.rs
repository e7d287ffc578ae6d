//! Given steps for board move BDD scenarios.

use super::world::{BoardWorld, PROJECT, names, run_async};
use boardwalk::board::domain::{BucketKey, ColumnSpec, SwimlaneId};
use boardwalk::board::services::TaskPlacementService;
use boardwalk::config::BoardConfig;
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use std::sync::Arc;

#[given(r#"a board with columns "{titles}""#)]
fn board_with_columns(world: &mut BoardWorld, titles: String) -> Result<(), eyre::Report> {
    let specs = ColumnSpec::template(names(&titles)).wrap_err("build column template")?;
    let created = run_async(world.columns.create(PROJECT, &specs)).wrap_err("create columns")?;
    for column in created {
        world
            .column_ids
            .insert(column.title().as_str().to_owned(), column.id());
    }
    Ok(())
}

#[given(r#"tasks "{titles}" in column "{column}""#)]
fn tasks_in_column(
    world: &mut BoardWorld,
    titles: String,
    column: String,
) -> Result<(), eyre::Report> {
    let bucket = BucketKey::new(world.column(&column)?, SwimlaneId::DEFAULT);
    let placement = TaskPlacementService::new(
        Arc::clone(&world.store),
        Arc::new(DefaultClock),
        Arc::new(BoardConfig::default()),
    );
    for title in names(&titles) {
        let card = run_async(placement.place_new_task(PROJECT, bucket, &title))
            .wrap_err_with(|| format!("place task '{title}'"))?;
        world.task_ids.insert(title, card.id());
    }
    Ok(())
}

#[given("a client has fetched the board")]
fn client_fetched_board(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let snapshot = run_async(world.sync.fetch(PROJECT)).wrap_err("fetch board")?;
    world.client_version = Some(snapshot.version);
    Ok(())
}
