//! Full lifecycle flows across the board and my-tasks views.

use crate::in_memory::helpers::{Harness, harness, seeded_task};
use rstest::rstest;
use taskboard::board::domain::{ContainerId, TaskStage, TaskStatus};
use taskboard::board::ports::{TaskFilter, TaskStore};
use taskboard::board::services::{DragGesture, DragOutcome, ViewQuery, project};

/// Drags the given task between two columns of the harness board.
async fn drag_on_board(
    harness: &mut Harness,
    task_id: taskboard::board::domain::TaskId,
    from: TaskStatus,
    to: TaskStatus,
) -> DragOutcome {
    let board = harness.board;
    let gesture = DragGesture::new(task_id, ContainerId::Board { board, status: from })
        .dropped_on(ContainerId::Board { board, status: to });
    harness
        .reconciler
        .resolve_drop(
            &mut harness.workspace,
            ViewQuery::Board { board }.scope(),
            gesture,
        )
        .await
        .expect("drag should reconcile")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_drag_walks_a_task_through_its_lifecycle(mut harness: Harness) {
    let task = seeded_task(&mut harness, "Assemble gearbox batch").await;

    let outcome =
        drag_on_board(&mut harness, task.id(), TaskStatus::Todo, TaskStatus::InProgress).await;
    assert!(matches!(outcome, DragOutcome::Moved(_)));

    let columns = project(&harness.workspace, ViewQuery::Board { board: harness.board });
    assert_eq!(columns.column(TaskStatus::InProgress), &[task.id()]);
    assert!(columns.column(TaskStatus::Todo).is_empty());

    let outcome =
        drag_on_board(&mut harness, task.id(), TaskStatus::InProgress, TaskStatus::Done).await;
    let DragOutcome::Moved(done) = outcome else {
        panic!("expected a confirmed move");
    };
    assert!(done.moved_to_done_at().is_some());

    // The store holds the same authoritative state the workspace shows.
    let stored = harness
        .store
        .list(TaskFilter::new().with_board(harness.board))
        .await
        .expect("listing should succeed");
    assert_eq!(stored.len(), 1);
    assert_eq!(
        stored.first().map(|task| task.status()),
        Some(TaskStatus::Done)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_move_is_visible_in_every_view_holding_the_task(mut harness: Harness) {
    let task = seeded_task(&mut harness, "Lay out cable trays").await;

    drag_on_board(&mut harness, task.id(), TaskStatus::Todo, TaskStatus::Done).await;

    // One reconciliation, two views: both re-resolve the same collection.
    let board_columns = project(&harness.workspace, ViewQuery::Board { board: harness.board });
    let my_columns = project(&harness.workspace, ViewQuery::MyActive { user: harness.user });

    assert_eq!(board_columns.column(TaskStatus::Done), &[task.id()]);
    assert_eq!(my_columns.column(TaskStatus::Done), &[task.id()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archive_drag_moves_a_task_between_my_tasks_regions(mut harness: Harness) {
    let task = seeded_task(&mut harness, "Write induction notes").await;
    drag_on_board(&mut harness, task.id(), TaskStatus::Todo, TaskStatus::InProgress).await;
    harness
        .service
        .set_stage(&mut harness.workspace, task.id(), Some(TaskStage::Solution))
        .await
        .expect("stage selection should succeed");

    let gesture = DragGesture::new(
        task.id(),
        ContainerId::MyActive {
            status: TaskStatus::InProgress,
        },
    )
    .dropped_on(ContainerId::MyArchive {
        status: TaskStatus::InProgress,
    });
    let outcome = harness
        .reconciler
        .resolve_drop(
            &mut harness.workspace,
            ViewQuery::MyActive { user: harness.user }.scope(),
            gesture,
        )
        .await
        .expect("archive drag should reconcile");

    let DragOutcome::Moved(archived) = outcome else {
        panic!("expected a confirmed move");
    };
    assert!(archived.is_archived());
    assert_eq!(archived.archived_status(), Some(TaskStatus::InProgress));
    assert_eq!(archived.active_stage(), None);

    let archive_columns =
        project(&harness.workspace, ViewQuery::MyArchive { user: harness.user });
    let board_columns = project(&harness.workspace, ViewQuery::Board { board: harness.board });
    assert_eq!(archive_columns.column(TaskStatus::InProgress), &[task.id()]);
    assert!(board_columns.is_empty(), "archived tasks leave active boards");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unarchive_restores_the_retained_column(mut harness: Harness) {
    let task = seeded_task(&mut harness, "Repaint loading bay lines").await;
    drag_on_board(&mut harness, task.id(), TaskStatus::Todo, TaskStatus::InProgress).await;
    harness
        .service
        .archive_task(&mut harness.workspace, task.id())
        .await
        .expect("archive should succeed");

    let restored = harness
        .service
        .unarchive_task(&mut harness.workspace, task.id())
        .await
        .expect("unarchive should succeed");

    assert!(!restored.is_archived());
    assert_eq!(restored.status(), TaskStatus::InProgress);
    assert_eq!(restored.archived_status(), None);
    assert_eq!(restored.archived_at(), None);

    let board_columns = project(&harness.workspace, ViewQuery::Board { board: harness.board });
    assert_eq!(board_columns.column(TaskStatus::InProgress), &[task.id()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deletion_requires_archival_and_empties_the_store(mut harness: Harness) {
    let task = seeded_task(&mut harness, "Shred obsolete drawings").await;

    harness
        .service
        .archive_task(&mut harness.workspace, task.id())
        .await
        .expect("archive should succeed");
    harness
        .service
        .delete_task(&mut harness.workspace, task.id())
        .await
        .expect("delete should succeed after archival");

    let stored = harness
        .store
        .list(TaskFilter::new())
        .await
        .expect("listing should succeed");
    assert!(stored.is_empty());
    assert!(harness.workspace.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refreshing_a_view_pulls_store_state_into_the_workspace(mut harness: Harness) {
    let task = seeded_task(&mut harness, "Check fire extinguishers").await;

    // A second client with an empty workspace sees the same board.
    let mut other_workspace = taskboard::board::services::BoardWorkspace::new();
    harness
        .service
        .refresh_view(&mut other_workspace, ViewQuery::Board { board: harness.board })
        .await
        .expect("refresh should succeed");

    let columns = project(&other_workspace, ViewQuery::Board { board: harness.board });
    assert_eq!(columns.column(TaskStatus::Todo), &[task.id()]);
}
