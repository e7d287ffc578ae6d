//! Then steps for board move BDD scenarios.

use super::world::{BoardWorld, PROJECT, names, run_async};
use boardwalk::board::{
    domain::{BucketKey, SwimlaneId},
    ports::TaskPlacementRepository,
    services::BoardCheck,
};
use eyre::WrapErr;
use rstest_bdd_macros::then;

#[then(r#"the columns read "{titles}""#)]
fn columns_read(world: &BoardWorld, titles: String) -> Result<(), eyre::Report> {
    let columns = run_async(world.columns.list_columns(PROJECT)).wrap_err("list columns")?;
    let actual: Vec<String> = columns
        .iter()
        .map(|column| column.title().as_str().to_owned())
        .collect();
    if actual != names(&titles) {
        return Err(eyre::eyre!("expected columns {titles}, found {actual:?}"));
    }

    let positions: Vec<u32> = columns.iter().map(|column| column.position().value()).collect();
    let dense: Vec<u32> = (1..=u32::try_from(columns.len())?).collect();
    if positions != dense {
        return Err(eyre::eyre!("column positions {positions:?} are not sequential"));
    }
    Ok(())
}

#[then("the column move is reported as a no-op")]
fn column_move_noop(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_column_move
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing column move result in scenario world"))?;
    match result {
        Ok(false) => Ok(()),
        Ok(true) => Err(eyre::eyre!("expected the column to stay in place")),
        Err(err) => Err(eyre::eyre!("unexpected column move failure: {err}")),
    }
}

#[then(r#"column "{column}" holds "{titles}""#)]
fn column_holds(world: &BoardWorld, column: String, titles: String) -> Result<(), eyre::Report> {
    let bucket = BucketKey::new(world.column(&column)?, SwimlaneId::DEFAULT);
    let cards = run_async(world.store.list_bucket(PROJECT, bucket)).wrap_err("list bucket")?;
    let actual: Vec<(String, u32)> = cards
        .iter()
        .map(|card| (card.title().to_owned(), card.placement().position.value()))
        .collect();
    let expected: Vec<(String, u32)> = names(&titles)
        .into_iter()
        .zip(1..)
        .collect();
    if actual != expected {
        return Err(eyre::eyre!(
            "expected {expected:?} in column {column}, found {actual:?}"
        ));
    }
    Ok(())
}

#[then("the client's board version is reported as changed")]
fn client_sees_change(world: &BoardWorld) -> Result<(), eyre::Report> {
    match check(world)? {
        BoardCheck::Changed(_) => Ok(()),
        BoardCheck::Unchanged => Err(eyre::eyre!("expected the board to be reported as changed")),
    }
}

#[then("the client's board version is reported as unchanged")]
fn client_sees_no_change(world: &BoardWorld) -> Result<(), eyre::Report> {
    match check(world)? {
        BoardCheck::Unchanged => Ok(()),
        BoardCheck::Changed(_) => Err(eyre::eyre!("expected the board to be unchanged")),
    }
}

fn check(world: &BoardWorld) -> Result<BoardCheck, eyre::Report> {
    let version = world
        .client_version
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing client version in scenario world"))?;
    run_async(world.sync.check(PROJECT, version)).wrap_err("check board version")
}
