//! Write-through direct-edit operations on tasks.
//!
//! Everything that is not a drag gesture goes through here: creation,
//! detail edits, stage selection, stage notes, checklist changes, board
//! membership, archival buttons, and deletion. Direct edits validate
//! against the workspace copy first — invariant violations are rejected
//! synchronously and never reach the store — then write through and
//! replace the local copy with the store's authoritative echo.

use super::{BoardWorkspace, ViewQuery};
use crate::board::domain::{
    BoardDomainError, BoardId, ChecklistItemId, Complexity, NewTaskData, Priority, StageNote,
    Task, TaskId, TaskStage, UserId,
};
use crate::board::ports::{StageNoteAppend, TaskPatch, TaskStore, TaskStoreError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for direct task operations.
#[derive(Debug, Clone, Error)]
pub enum BoardServiceError {
    /// The task is not present in the workspace.
    #[error("task not present in workspace: {0}")]
    UnknownTask(TaskId),

    /// Domain validation failed; nothing was sent to the store.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for direct task operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Request payload for editing task details.
///
/// Unset fields are left untouched; optional task fields nest a second
/// `Option` so a clear can be requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTaskRequest {
    task_id: TaskId,
    title: Option<String>,
    description: Option<Option<String>>,
    assignee: Option<Option<UserId>>,
    priority: Option<Option<Priority>>,
    complexity: Option<Option<Complexity>>,
    due_date: Option<Option<DateTime<Utc>>>,
    self_assigned: Option<bool>,
    show_in_my_tasks: Option<bool>,
    boards: Option<BTreeSet<BoardId>>,
}

impl EditTaskRequest {
    /// Creates an empty edit for the given task.
    #[must_use]
    pub const fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            title: None,
            description: None,
            assignee: None,
            priority: None,
            complexity: None,
            due_date: None,
            self_assigned: None,
            show_in_my_tasks: None,
            boards: None,
        }
    }

    /// Renames the task.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces or clears the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Replaces or clears the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: Option<UserId>) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Replaces or clears the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces or clears the complexity.
    #[must_use]
    pub const fn with_complexity(mut self, complexity: Option<Complexity>) -> Self {
        self.complexity = Some(complexity);
        self
    }

    /// Replaces or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Replaces the self-assignment flag.
    #[must_use]
    pub const fn with_self_assigned(mut self, self_assigned: bool) -> Self {
        self.self_assigned = Some(self_assigned);
        self
    }

    /// Replaces the "my tasks" visibility.
    #[must_use]
    pub const fn with_show_in_my_tasks(mut self, show: bool) -> Self {
        self.show_in_my_tasks = Some(show);
        self
    }

    /// Replaces the board memberships.
    #[must_use]
    pub fn with_boards(mut self, boards: BTreeSet<BoardId>) -> Self {
        self.boards = Some(boards);
        self
    }
}

/// Direct task operation service.
#[derive(Clone)]
pub struct TaskBoardService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskBoardService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task board service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Fetches a view's tasks from the store into the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Store`] when the listing fails.
    pub async fn refresh_view(
        &self,
        workspace: &mut BoardWorkspace,
        query: ViewQuery,
    ) -> BoardServiceResult<()> {
        let tasks = self.store.list(query.filter()).await?;
        debug!(count = tasks.len(), "hydrating workspace from store");
        workspace.hydrate(tasks);
        Ok(())
    }

    /// Creates a task and adds it to the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Store`] when the store rejects the
    /// creation.
    pub async fn create_task(
        &self,
        workspace: &mut BoardWorkspace,
        data: NewTaskData,
    ) -> BoardServiceResult<Task> {
        let task = self.store.create(data).await?;
        info!(task = %task.id(), "task created");
        workspace.upsert(task.clone());
        Ok(task)
    }

    /// Selects, changes, or resets the stage of a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when the task is not active
    /// and in progress, [`BoardServiceError::UnknownTask`] when it is not
    /// in the workspace, or [`BoardServiceError::Store`] when the write
    /// fails.
    pub async fn set_stage(
        &self,
        workspace: &mut BoardWorkspace,
        task_id: TaskId,
        stage: Option<TaskStage>,
    ) -> BoardServiceResult<Task> {
        let mut candidate = snapshot(workspace, task_id)?;
        candidate.set_stage(stage, &*self.clock)?;

        let mut patch = TaskPatch::new(task_id);
        patch.active_stage = Some(stage);
        self.write_through(workspace, patch).await
    }

    /// Appends a note to one of a task's stage history logs.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when the task is not active
    /// and in progress or the body is empty, [`BoardServiceError::UnknownTask`]
    /// when it is not in the workspace, or [`BoardServiceError::Store`]
    /// when the write fails.
    pub async fn append_stage_note(
        &self,
        workspace: &mut BoardWorkspace,
        task_id: TaskId,
        stage: TaskStage,
        author: UserId,
        body: &str,
    ) -> BoardServiceResult<Task> {
        let mut candidate = snapshot(workspace, task_id)?;
        candidate.append_stage_note(stage, author, body, &*self.clock)?;

        let mut patch = TaskPatch::new(task_id);
        patch.stage_notes = vec![StageNoteAppend {
            stage,
            note: StageNote::new(author, body.trim(), self.clock.utc()),
        }];
        self.write_through(workspace, patch).await
    }

    /// Edits task details (title, description, planning fields, board
    /// membership, visibility).
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when a field fails validation,
    /// [`BoardServiceError::UnknownTask`] when the task is not in the
    /// workspace, or [`BoardServiceError::Store`] when the write fails.
    pub async fn edit_task(
        &self,
        workspace: &mut BoardWorkspace,
        request: EditTaskRequest,
    ) -> BoardServiceResult<Task> {
        let mut candidate = snapshot(workspace, request.task_id)?;
        if let Some(title) = &request.title {
            candidate.rename(title, &*self.clock)?;
        }

        let mut patch = TaskPatch::new(request.task_id);
        patch.title = request.title;
        patch.description = request.description;
        patch.assignee_id = request.assignee;
        patch.priority = request.priority;
        patch.complexity = request.complexity;
        patch.due_date = request.due_date;
        patch.self_assigned = request.self_assigned;
        patch.show_in_my_tasks = request.show_in_my_tasks;
        patch.board_ids = request.boards;
        self.write_through(workspace, patch).await
    }

    /// Adds an unchecked checklist item and returns the authoritative task
    /// with the new item's identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when the body is empty,
    /// [`BoardServiceError::UnknownTask`] when the task is not in the
    /// workspace, or [`BoardServiceError::Store`] when the write fails.
    pub async fn add_checklist_item(
        &self,
        workspace: &mut BoardWorkspace,
        task_id: TaskId,
        body: &str,
    ) -> BoardServiceResult<(Task, ChecklistItemId)> {
        let mut candidate = snapshot(workspace, task_id)?;
        let item_id = candidate.add_checklist_item(body, &*self.clock)?;

        let mut patch = TaskPatch::new(task_id);
        patch.checklist = Some(candidate.checklist().to_vec());
        let task = self.write_through(workspace, patch).await?;
        Ok((task, item_id))
    }

    /// Checks or unchecks a checklist item.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when the item does not exist,
    /// [`BoardServiceError::UnknownTask`] when the task is not in the
    /// workspace, or [`BoardServiceError::Store`] when the write fails.
    pub async fn set_checklist_item_done(
        &self,
        workspace: &mut BoardWorkspace,
        task_id: TaskId,
        item_id: ChecklistItemId,
        done: bool,
    ) -> BoardServiceResult<Task> {
        let mut candidate = snapshot(workspace, task_id)?;
        candidate.set_checklist_item_done(item_id, done, &*self.clock)?;

        let mut patch = TaskPatch::new(task_id);
        patch.checklist = Some(candidate.checklist().to_vec());
        self.write_through(workspace, patch).await
    }

    /// Archives a task from a non-drag surface (context menu, detail
    /// pane).
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when the task is already
    /// archived, [`BoardServiceError::UnknownTask`] when it is not in the
    /// workspace, or [`BoardServiceError::Store`] when the write fails.
    pub async fn archive_task(
        &self,
        workspace: &mut BoardWorkspace,
        task_id: TaskId,
    ) -> BoardServiceResult<Task> {
        let mut candidate = snapshot(workspace, task_id)?;
        candidate.archive(&*self.clock)?;

        let task = self.store.archive(task_id, true).await?;
        workspace.upsert(task.clone());
        Ok(task)
    }

    /// Restores an archived task to its retained column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when the task is not
    /// archived, [`BoardServiceError::UnknownTask`] when it is not in the
    /// workspace, or [`BoardServiceError::Store`] when the write fails.
    pub async fn unarchive_task(
        &self,
        workspace: &mut BoardWorkspace,
        task_id: TaskId,
    ) -> BoardServiceResult<Task> {
        let mut candidate = snapshot(workspace, task_id)?;
        candidate.unarchive(&*self.clock)?;

        let task = self.store.archive(task_id, false).await?;
        workspace.upsert(task.clone());
        Ok(task)
    }

    /// Permanently removes an archived task.
    ///
    /// Deletion is irreversible and requires prior archival; the store
    /// enforces the same rule for tasks the workspace has not seen.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when the workspace copy is
    /// not archived, or [`BoardServiceError::Store`] when the store
    /// rejects the deletion.
    pub async fn delete_task(
        &self,
        workspace: &mut BoardWorkspace,
        task_id: TaskId,
    ) -> BoardServiceResult<()> {
        if workspace.get(task_id).is_some_and(|task| !task.is_archived()) {
            return Err(BoardDomainError::NotArchived(task_id).into());
        }

        self.store.delete(task_id).await?;
        info!(task = %task_id, "task deleted");
        workspace.remove(task_id);
        Ok(())
    }

    /// Applies a patch through the store and replaces the workspace copy
    /// with the authoritative echo.
    async fn write_through(
        &self,
        workspace: &mut BoardWorkspace,
        patch: TaskPatch,
    ) -> BoardServiceResult<Task> {
        let task = self.store.update(patch).await?;
        workspace.upsert(task.clone());
        Ok(task)
    }
}

/// Clones the workspace copy of a task for client-side validation.
fn snapshot(workspace: &BoardWorkspace, task_id: TaskId) -> BoardServiceResult<Task> {
    workspace
        .get(task_id)
        .cloned()
        .ok_or(BoardServiceError::UnknownTask(task_id))
}
