//! Given steps for board drag BDD scenarios.

use super::world::{BoardDragWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskboard::board::domain::{Board, NewTaskData, TaskStage, TaskStatus};

#[given(r#"a project board called "{name}""#)]
fn project_board(world: &mut BoardDragWorld, name: String) -> Result<(), eyre::Report> {
    let board = Board::from_parts(world.board, name, Vec::new());
    world
        .store
        .insert_board(board)
        .wrap_err("register scenario board")?;
    Ok(())
}

#[given(r#"a task titled "{title}" on the board and in my tasks"#)]
fn seeded_task(world: &mut BoardDragWorld, title: String) -> Result<(), eyre::Report> {
    let data = NewTaskData::new(title)
        .with_board(world.board)
        .with_assignee(world.user)
        .with_show_in_my_tasks(true);
    let task = run_async(world.service.create_task(&mut world.workspace, data))
        .wrap_err("create scenario task")?;
    world.task_id = Some(task.id());
    Ok(())
}

#[given(r#"the task has been dragged on the board from "{from}" to "{to}""#)]
fn task_already_dragged(
    world: &mut BoardDragWorld,
    from: String,
    to: String,
) -> Result<(), eyre::Report> {
    let from_status = parse_status(&from)?;
    let to_status = parse_status(&to)?;
    world.perform_board_drag(from_status, to_status)?;
    let outcome = world
        .last_outcome
        .take()
        .ok_or_else(|| eyre::eyre!("missing drag outcome in scenario setup"))?;
    outcome.wrap_err("drag in scenario setup")?;
    Ok(())
}

#[given(r#"the task stage is "{stage}""#)]
fn task_stage_is(world: &mut BoardDragWorld, stage: String) -> Result<(), eyre::Report> {
    let parsed = TaskStage::try_from(stage.as_str())
        .map_err(|err| eyre::eyre!("invalid stage in scenario: {err}"))?;
    let task_id = world.task_id()?;
    run_async(
        world
            .service
            .set_stage(&mut world.workspace, task_id, Some(parsed)),
    )
    .wrap_err("select stage in scenario setup")?;
    Ok(())
}

#[given("the next store write will fail")]
fn next_write_fails(world: &mut BoardDragWorld) {
    world.store.fail_next_update();
}

/// Parses a column token from the feature file.
pub fn parse_status(token: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(token).map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))
}
