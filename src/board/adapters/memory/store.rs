//! In-memory task store standing in for the remote mock API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::domain::{
    Board, BoardId, NewTaskData, PersistedTaskData, Task, TaskId,
};
use crate::board::ports::{TaskFilter, TaskPatch, TaskStore, TaskStoreError, TaskStoreResult};

/// Thread-safe in-memory task store.
///
/// Applies partial updates the way the remote store would: the patch is
/// merged over the stored task, `updated_at` is stamped authoritatively
/// from the store's clock, and the full resulting task is echoed back.
pub struct InMemoryTaskStore<C> {
    state: Arc<RwLock<InMemoryState>>,
    clock: Arc<C>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    tasks: HashMap<TaskId, Task>,
    boards: HashMap<BoardId, Board>,
}

impl<C> InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryState::default())),
            clock,
        }
    }

    /// Registers a board for read-only consumption.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transport`] when the store lock is
    /// poisoned.
    pub fn insert_board(&self, board: Board) -> TaskStoreResult<()> {
        let mut state = write_locked(&self.state)?;
        state.boards.insert(board.id(), board);
        Ok(())
    }
}

impl<C> Clone for InMemoryTaskStore<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

fn write_locked(
    state: &Arc<RwLock<InMemoryState>>,
) -> TaskStoreResult<std::sync::RwLockWriteGuard<'_, InMemoryState>> {
    state
        .write()
        .map_err(|err| TaskStoreError::transport(std::io::Error::other(err.to_string())))
}

fn read_locked(
    state: &Arc<RwLock<InMemoryState>>,
) -> TaskStoreResult<std::sync::RwLockReadGuard<'_, InMemoryState>> {
    state
        .read()
        .map_err(|err| TaskStoreError::transport(std::io::Error::other(err.to_string())))
}

/// Merges a patch over a stored task, stamping `updated_at` from the
/// store's clock.
fn apply_patch(task: &Task, patch: TaskPatch, now: DateTime<Utc>) -> Task {
    let mut stage_history = task.stage_history().clone();
    for append in patch.stage_notes {
        stage_history.append(append.stage, append.note);
    }

    Task::from_persisted(PersistedTaskData {
        id: task.id(),
        title: patch.title.unwrap_or_else(|| task.title().to_owned()),
        description: patch
            .description
            .unwrap_or_else(|| task.description().map(ToOwned::to_owned)),
        status: patch.status.unwrap_or_else(|| task.status()),
        archive: patch.archive.unwrap_or_else(|| task.archive_state()),
        active_stage: patch.active_stage.unwrap_or_else(|| task.active_stage()),
        stage_history,
        checklist: patch
            .checklist
            .unwrap_or_else(|| task.checklist().to_vec()),
        board_ids: patch
            .board_ids
            .unwrap_or_else(|| task.board_ids().clone()),
        show_in_my_tasks: patch.show_in_my_tasks.unwrap_or_else(|| task.show_in_my_tasks()),
        assignee_id: patch.assignee_id.unwrap_or_else(|| task.assignee_id()),
        priority: patch.priority.unwrap_or_else(|| task.priority()),
        complexity: patch.complexity.unwrap_or_else(|| task.complexity()),
        due_date: patch.due_date.unwrap_or_else(|| task.due_date()),
        self_assigned: patch.self_assigned.unwrap_or_else(|| task.self_assigned()),
        cached_coefficient: task.cached_coefficient(),
        // Set once on the first completion, never cleared afterwards.
        moved_to_done_at: task.moved_to_done_at().or(patch.moved_to_done_at),
        created_at: task.created_at(),
        updated_at: now,
    })
}

#[async_trait]
impl<C> TaskStore for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    async fn list(&self, filter: TaskFilter) -> TaskStoreResult<Vec<Task>> {
        let state = read_locked(&self.state)?;
        Ok(state
            .tasks
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }

    async fn create(&self, data: NewTaskData) -> TaskStoreResult<Task> {
        let task = Task::new(data, &*self.clock)
            .map_err(|err| TaskStoreError::constraint(err.to_string()))?;
        let mut state = write_locked(&self.state)?;
        state.tasks.insert(task.id(), task.clone());
        Ok(task)
    }

    async fn update(&self, patch: TaskPatch) -> TaskStoreResult<Task> {
        let now = self.clock.utc();
        let mut state = write_locked(&self.state)?;
        let task = state
            .tasks
            .get(&patch.id)
            .ok_or(TaskStoreError::NotFound(patch.id))?;
        let updated = apply_patch(task, patch, now);
        state.tasks.insert(updated.id(), updated.clone());
        Ok(updated)
    }

    async fn archive(&self, id: TaskId, archived: bool) -> TaskStoreResult<Task> {
        let mut state = write_locked(&self.state)?;
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or(TaskStoreError::NotFound(id))?;
        if task.is_archived() != archived {
            let result = if archived {
                task.archive(&*self.clock)
            } else {
                task.unarchive(&*self.clock)
            };
            result.map_err(|err| TaskStoreError::constraint(err.to_string()))?;
        }
        Ok(task.clone())
    }

    async fn delete(&self, id: TaskId) -> TaskStoreResult<()> {
        let mut state = write_locked(&self.state)?;
        let task = state
            .tasks
            .get(&id)
            .ok_or(TaskStoreError::NotFound(id))?;
        if !task.is_archived() {
            return Err(TaskStoreError::DeleteRequiresArchive(id));
        }
        state.tasks.remove(&id);
        Ok(())
    }

    async fn find_board(&self, id: BoardId) -> TaskStoreResult<Option<Board>> {
        let state = read_locked(&self.state)?;
        Ok(state.boards.get(&id).cloned())
    }
}
