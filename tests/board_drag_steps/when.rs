//! When steps for board drag BDD scenarios.

use super::given::parse_status;
use super::world::BoardDragWorld;
use rstest_bdd_macros::when;

#[when(r#"the task is dragged on the board from "{from}" to "{to}""#)]
fn drag_on_board(
    world: &mut BoardDragWorld,
    from: String,
    to: String,
) -> Result<(), eyre::Report> {
    let from_status = parse_status(&from)?;
    let to_status = parse_status(&to)?;
    world.snapshot_before_drag()?;
    world.perform_board_drag(from_status, to_status)
}

#[when(r#"the task is dragged on the my-tasks page from active "{from}" to archive "{to}""#)]
fn drag_into_archive(
    world: &mut BoardDragWorld,
    from: String,
    to: String,
) -> Result<(), eyre::Report> {
    let from_status = parse_status(&from)?;
    let to_status = parse_status(&to)?;
    world.snapshot_before_drag()?;
    world.perform_archive_drag(from_status, to_status)
}
