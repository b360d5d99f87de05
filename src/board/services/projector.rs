//! View projection: filtering and partitioning the task set per view.

use super::BoardWorkspace;
use crate::board::domain::{BoardId, Task, TaskId, TaskStatus, UserId, ViewScope};
use crate::board::ports::TaskFilter;
use serde::{Deserialize, Serialize};

/// Descriptor of a rendered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewQuery {
    /// A single project board: its tasks, active only.
    Board {
        /// Board being rendered.
        board: BoardId,
    },
    /// The user's active tasks across all boards.
    MyActive {
        /// User whose tasks are rendered.
        user: UserId,
    },
    /// The user's archived tasks, partitioned by archived status.
    MyArchive {
        /// User whose archive is rendered.
        user: UserId,
    },
}

impl ViewQuery {
    /// Returns the page scope drops against this view are validated with.
    #[must_use]
    pub const fn scope(self) -> ViewScope {
        match self {
            Self::Board { board } => ViewScope::Board(board),
            Self::MyActive { .. } | Self::MyArchive { .. } => ViewScope::MyTasks,
        }
    }

    /// Returns the store filter fetching this view's tasks.
    #[must_use]
    pub fn filter(self) -> TaskFilter {
        match self {
            Self::Board { board } => TaskFilter::new().with_board(board).with_archived(false),
            Self::MyActive { user } => TaskFilter::new()
                .with_assignee(user)
                .with_in_my_tasks(true)
                .with_archived(false),
            Self::MyArchive { user } => TaskFilter::new()
                .with_assignee(user)
                .with_in_my_tasks(true)
                .with_archived(true),
        }
    }

    /// Returns `true` when the task belongs in this view.
    #[must_use]
    pub fn admits(self, task: &Task) -> bool {
        self.filter().matches(task)
    }
}

/// The three standard columns of a projected view.
///
/// Columns hold task ids, most recently touched first; callers resolve
/// them against the workspace when rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardColumns {
    todo: Vec<TaskId>,
    in_progress: Vec<TaskId>,
    done: Vec<TaskId>,
}

impl BoardColumns {
    /// Returns the ordered ids of the given column.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[TaskId] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    /// Returns the total number of tasks across all columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    /// Returns `true` when every column is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todo.is_empty() && self.in_progress.is_empty() && self.done.is_empty()
    }

    /// Returns `true` when any column holds the task.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.todo.contains(&id) || self.in_progress.contains(&id) || self.done.contains(&id)
    }

    fn push(&mut self, status: TaskStatus, id: TaskId) {
        match status {
            TaskStatus::Todo => self.todo.push(id),
            TaskStatus::InProgress => self.in_progress.push(id),
            TaskStatus::Done => self.done.push(id),
        }
    }
}

/// Projects the workspace into the ordered columns of a view.
///
/// Tasks are filtered per the view descriptor, partitioned into the three
/// standard columns (archive views partition by the status frozen at
/// archival time), and ordered by `updated_at` descending within each
/// column. The ordering is a presentation contract, not a persisted
/// order; equal timestamps fall back to id order so projection is
/// deterministic.
#[must_use]
pub fn project(workspace: &BoardWorkspace, query: ViewQuery) -> BoardColumns {
    let mut admitted: Vec<&Task> = workspace
        .tasks()
        .filter(|task| query.admits(task))
        .collect();
    admitted.sort_by(|a, b| {
        b.updated_at()
            .cmp(&a.updated_at())
            .then_with(|| a.id().cmp(&b.id()))
    });

    let mut columns = BoardColumns::default();
    for task in admitted {
        columns.push(task.column_status(), task.id());
    }
    columns
}
