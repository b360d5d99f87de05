//! Shared fixtures and helpers for board engine unit tests.

use crate::board::domain::{
    ArchiveState, Board, BoardId, NewTaskData, PersistedTaskData, StageHistory, Task, TaskId,
    TaskStatus, UserId,
};
use crate::board::ports::{TaskFilter, TaskPatch, TaskStore, TaskStoreResult};
use chrono::{DateTime, TimeZone, Utc};
use mockable::DefaultClock;
use std::collections::BTreeSet;

mockall::mock! {
    /// Scripted task store for reconciliation and service tests.
    pub Store {}

    #[async_trait::async_trait]
    impl TaskStore for Store {
        async fn list(&self, filter: TaskFilter) -> TaskStoreResult<Vec<Task>>;
        async fn create(&self, data: NewTaskData) -> TaskStoreResult<Task>;
        async fn update(&self, patch: TaskPatch) -> TaskStoreResult<Task>;
        async fn archive(&self, id: TaskId, archived: bool) -> TaskStoreResult<Task>;
        async fn delete(&self, id: TaskId) -> TaskStoreResult<()>;
        async fn find_board(&self, id: BoardId) -> TaskStoreResult<Option<Board>>;
    }
}

/// Creates a task in its initial lifecycle position.
pub fn fresh_task(clock: &DefaultClock) -> Task {
    Task::new(NewTaskData::new("Fit rotor guard"), clock).expect("valid task data")
}

/// Creates an active in-progress task.
pub fn in_progress_task(clock: &DefaultClock) -> Task {
    let mut task = fresh_task(clock);
    task.set_status(TaskStatus::InProgress, clock)
        .expect("active task accepts status change");
    task
}

/// A fixed reference instant for timestamp-sensitive assertions.
pub fn reference_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0)
        .single()
        .expect("valid reference instant")
}

/// Reconstructs a task at an explicit position and `updated_at`, for
/// projection-ordering tests that need full control over timestamps.
pub fn persisted_task(
    title: &str,
    status: TaskStatus,
    archive: ArchiveState,
    assignee: Option<UserId>,
    updated_at: DateTime<Utc>,
) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        title: title.to_owned(),
        description: None,
        status,
        archive,
        active_stage: None,
        stage_history: StageHistory::default(),
        checklist: Vec::new(),
        board_ids: BTreeSet::new(),
        show_in_my_tasks: assignee.is_some(),
        assignee_id: assignee,
        priority: None,
        complexity: None,
        due_date: None,
        self_assigned: false,
        cached_coefficient: None,
        moved_to_done_at: None,
        created_at: updated_at,
        updated_at,
    })
}

/// Asserts the two lifecycle invariants that must hold after every
/// transition: the archived status exists exactly when the task is
/// archived, and a stage only exists on an active in-progress task.
pub fn assert_lifecycle_invariants(task: &Task) {
    assert_eq!(task.is_archived(), task.archived_status().is_some());
    assert_eq!(task.is_archived(), task.archived_at().is_some());
    if task.status() != TaskStatus::InProgress || task.is_archived() {
        assert_eq!(task.active_stage(), None);
    }
}
