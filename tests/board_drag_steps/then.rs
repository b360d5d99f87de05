//! Then steps for board drag BDD scenarios.

use super::given::parse_status;
use super::world::BoardDragWorld;
use rstest_bdd_macros::then;
use taskboard::board::services::{DragOutcome, ReconcileError};

#[then("the move is confirmed")]
fn move_is_confirmed(world: &BoardDragWorld) -> Result<(), eyre::Report> {
    let outcome = world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing drag outcome"))?;
    if !matches!(outcome, Ok(DragOutcome::Moved(_))) {
        return Err(eyre::eyre!("expected a confirmed move, got {outcome:?}"));
    }
    Ok(())
}

#[then(r#"the task sits in the board "{status}" column"#)]
fn task_sits_in_board_column(
    world: &BoardDragWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let column = parse_status(&status)?;
    let columns = world.board_columns();
    let task_id = world.task_id()?;
    if !columns.column(column).contains(&task_id) {
        return Err(eyre::eyre!(
            "task not in board {column} column: {columns:?}"
        ));
    }
    Ok(())
}

#[then(r#"the task is archived in the "{status}" archive column"#)]
fn task_is_archived_in_column(
    world: &BoardDragWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let column = parse_status(&status)?;
    let task = world.current_task()?;
    if !task.is_archived() {
        return Err(eyre::eyre!("task is not archived"));
    }
    if task.archived_status() != Some(column) {
        return Err(eyre::eyre!(
            "expected archived status {column}, got {:?}",
            task.archived_status()
        ));
    }
    let columns = world.archive_columns();
    if !columns.column(column).contains(&task.id()) {
        return Err(eyre::eyre!("task not in archive {column} column"));
    }
    Ok(())
}

#[then("the task has no stage")]
fn task_has_no_stage(world: &BoardDragWorld) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    if task.active_stage().is_some() {
        return Err(eyre::eyre!(
            "expected no stage, got {:?}",
            task.active_stage()
        ));
    }
    Ok(())
}

#[then("the completion instant is recorded")]
fn completion_instant_recorded(world: &BoardDragWorld) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    if task.moved_to_done_at().is_none() {
        return Err(eyre::eyre!("completion instant was not recorded"));
    }
    Ok(())
}

#[then("the drag fails")]
fn drag_fails(world: &BoardDragWorld) -> Result<(), eyre::Report> {
    let outcome = world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing drag outcome"))?;
    if !matches!(outcome, Err(ReconcileError::Store(_))) {
        return Err(eyre::eyre!("expected a store failure, got {outcome:?}"));
    }
    Ok(())
}

#[then("the board is unchanged")]
fn board_is_unchanged(world: &BoardDragWorld) -> Result<(), eyre::Report> {
    let before_columns = world
        .board_before
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing pre-drag board snapshot"))?;
    let before_task = world
        .task_before
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing pre-drag task snapshot"))?;

    let after_columns = world.board_columns();
    if &after_columns != before_columns {
        return Err(eyre::eyre!(
            "board changed after rollback: {before_columns:?} -> {after_columns:?}"
        ));
    }
    let after_task = world.current_task()?;
    if after_task != before_task {
        return Err(eyre::eyre!("task changed after rollback"));
    }
    Ok(())
}
