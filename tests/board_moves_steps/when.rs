//! When steps for board move BDD scenarios.

use super::world::{BoardWorld, PROJECT, run_async};
use boardwalk::board::{domain::SwimlaneId, services::MoveRequest};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"column "{title}" is moved up"#)]
fn column_moved_up(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let column_id = world.column(&title)?;
    world.last_column_move = Some(run_async(world.columns.move_up(PROJECT, column_id)));
    Ok(())
}

#[when(r#"task "{task}" is moved to column "{column}" at position {position:i64}"#)]
fn task_moved(
    world: &mut BoardWorld,
    task: String,
    column: String,
    position: i64,
) -> Result<(), eyre::Report> {
    let request = MoveRequest {
        task_id: world.task(&task)?,
        column_id: world.column(&column)?,
        swimlane_id: SwimlaneId::DEFAULT,
        position,
    };
    run_async(world.sync.submit_move(PROJECT, request)).wrap_err("submit move")?;
    Ok(())
}
