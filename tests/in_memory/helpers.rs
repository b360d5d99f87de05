//! Shared test helpers for in-memory board integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use taskboard::board::adapters::memory::InMemoryTaskStore;
use taskboard::board::domain::{BoardId, NewTaskData, Task, UserId};
use taskboard::board::services::{BoardWorkspace, DragReconciler, TaskBoardService};

/// Store type used across the integration suites.
pub type MemoryStore = InMemoryTaskStore<DefaultClock>;

/// Everything a flow test needs: one store, both services, one workspace.
pub struct Harness {
    /// Shared in-memory store.
    pub store: Arc<MemoryStore>,
    /// Direct-edit service over the store.
    pub service: TaskBoardService<MemoryStore, DefaultClock>,
    /// Drag reconciler over the store.
    pub reconciler: DragReconciler<MemoryStore, DefaultClock>,
    /// Client-side working set.
    pub workspace: BoardWorkspace,
    /// Board the scenario renders.
    pub board: BoardId,
    /// User whose "my tasks" views the scenario renders.
    pub user: UserId,
}

/// Provides a fresh harness for each test.
#[fixture]
pub fn harness() -> Harness {
    let clock = Arc::new(DefaultClock);
    let store = Arc::new(InMemoryTaskStore::new(Arc::clone(&clock)));
    Harness {
        service: TaskBoardService::new(Arc::clone(&store), Arc::clone(&clock)),
        reconciler: DragReconciler::new(Arc::clone(&store), clock),
        store,
        workspace: BoardWorkspace::new(),
        board: BoardId::new(),
        user: UserId::new(),
    }
}

/// Creates a task on the harness board, assigned to the harness user and
/// visible in "my tasks".
pub async fn seeded_task(harness: &mut Harness, title: &str) -> Task {
    let data = NewTaskData::new(title)
        .with_board(harness.board)
        .with_assignee(harness.user)
        .with_show_in_my_tasks(true);
    harness
        .service
        .create_task(&mut harness.workspace, data)
        .await
        .expect("task creation should succeed")
}
