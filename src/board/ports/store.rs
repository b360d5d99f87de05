//! Task store port: the contract with the backing task collection.
//!
//! The store is an external collaborator reached through a request and
//! response API; any transport satisfying these signatures (in-process
//! call, HTTP, RPC) is sufficient. Listing carries no ordering guarantee;
//! the view projector re-sorts.

use crate::board::domain::{
    ArchiveState, Board, BoardId, ChecklistItem, Complexity, NewTaskData, Priority, StageNote,
    Task, TaskId, TaskStage, TaskStatus, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Scope filter for listing tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Restrict to tasks on this board.
    pub board: Option<BoardId>,
    /// Restrict to tasks assigned to this user.
    pub assignee: Option<UserId>,
    /// Restrict by archival state.
    pub archived: Option<bool>,
    /// Restrict by "my tasks" visibility.
    pub in_my_tasks: Option<bool>,
}

impl TaskFilter {
    /// Creates an unrestricted filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to tasks on the given board.
    #[must_use]
    pub const fn with_board(mut self, board: BoardId) -> Self {
        self.board = Some(board);
        self
    }

    /// Restricts to tasks assigned to the given user.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Restricts by archival state.
    #[must_use]
    pub const fn with_archived(mut self, archived: bool) -> Self {
        self.archived = Some(archived);
        self
    }

    /// Restricts by "my tasks" visibility.
    #[must_use]
    pub const fn with_in_my_tasks(mut self, in_my_tasks: bool) -> Self {
        self.in_my_tasks = Some(in_my_tasks);
        self
    }

    /// Returns `true` when the task satisfies every restriction.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.board.is_none_or(|board| task.is_on_board(board))
            && self
                .assignee
                .is_none_or(|assignee| task.assignee_id() == Some(assignee))
            && self
                .archived
                .is_none_or(|archived| task.is_archived() == archived)
            && self
                .in_my_tasks
                .is_none_or(|shown| task.show_in_my_tasks() == shown)
    }
}

/// A stage history entry to append as part of a partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageNoteAppend {
    /// Log the note belongs to.
    pub stage: TaskStage,
    /// The note to append.
    pub note: StageNote,
}

/// A partial task mutation carrying exactly the changed fields.
///
/// `Some` means "write this value"; `None` means "leave untouched". Fields
/// that are themselves optional on the task nest a second `Option` so a
/// clear can be expressed. Stage history entries are append-only and
/// therefore merge without conflict detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPatch {
    /// Task to mutate.
    pub id: TaskId,
    /// New active status.
    pub status: Option<TaskStatus>,
    /// New archival position.
    pub archive: Option<ArchiveState>,
    /// New stage selection (outer `Some(None)` resets the stage).
    pub active_stage: Option<Option<TaskStage>>,
    /// First-completion instant; set once, never cleared.
    pub moved_to_done_at: Option<DateTime<Utc>>,
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New assignee.
    pub assignee_id: Option<Option<UserId>>,
    /// New priority.
    pub priority: Option<Option<Priority>>,
    /// New complexity.
    pub complexity: Option<Option<Complexity>>,
    /// New due date.
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// New self-assignment flag.
    pub self_assigned: Option<bool>,
    /// New "my tasks" visibility.
    pub show_in_my_tasks: Option<bool>,
    /// Replacement board memberships.
    pub board_ids: Option<BTreeSet<BoardId>>,
    /// Replacement checklist.
    pub checklist: Option<Vec<ChecklistItem>>,
    /// Stage history entries to append.
    pub stage_notes: Vec<StageNoteAppend>,
}

impl TaskPatch {
    /// Creates an empty patch for the given task.
    #[must_use]
    pub const fn new(id: TaskId) -> Self {
        Self {
            id,
            status: None,
            archive: None,
            active_stage: None,
            moved_to_done_at: None,
            title: None,
            description: None,
            assignee_id: None,
            priority: None,
            complexity: None,
            due_date: None,
            self_assigned: None,
            show_in_my_tasks: None,
            board_ids: None,
            checklist: None,
            stage_notes: Vec::new(),
        }
    }

    /// Builds the patch describing a column move: exactly the lifecycle
    /// fields that differ between the pre-move snapshot and the moved
    /// task.
    #[must_use]
    pub fn move_diff(before: &Task, after: &Task) -> Self {
        let mut patch = Self::new(after.id());
        if before.status() != after.status() {
            patch.status = Some(after.status());
        }
        if before.archive_state() != after.archive_state() {
            patch.archive = Some(after.archive_state());
        }
        if before.active_stage() != after.active_stage() {
            patch.active_stage = Some(after.active_stage());
        }
        if before.moved_to_done_at() != after.moved_to_done_at() {
            patch.moved_to_done_at = after.moved_to_done_at();
        }
        patch
    }
}

/// Task persistence contract.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns tasks matching the scope filter, in no guaranteed order.
    async fn list(&self, filter: TaskFilter) -> TaskStoreResult<Vec<Task>>;

    /// Creates a task in its initial lifecycle state and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Constraint`] when a field violates a
    /// store-side constraint.
    async fn create(&self, data: NewTaskData) -> TaskStoreResult<Task>;

    /// Applies a partial mutation and returns the full authoritative task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist,
    /// or [`TaskStoreError::Constraint`] when a field violates a
    /// store-side constraint.
    async fn update(&self, patch: TaskPatch) -> TaskStoreResult<Task>;

    /// Archives or restores a task and returns the authoritative task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn archive(&self, id: TaskId, archived: bool) -> TaskStoreResult<Task>;

    /// Permanently removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DeleteRequiresArchive`] when the task is
    /// not archived, or [`TaskStoreError::NotFound`] when it does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskStoreResult<()>;

    /// Finds a board by identifier.
    ///
    /// Board membership and access rules are consumed read-only; board
    /// CRUD is outside this contract.
    async fn find_board(&self, id: BoardId) -> TaskStoreResult<Option<Board>>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Deletion was attempted on a task that is not archived.
    #[error("task {0} must be archived before deletion")]
    DeleteRequiresArchive(TaskId),

    /// A field violated a store-side constraint.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Transport-layer failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Builds a constraint violation from a message.
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint(message.into())
    }
}
