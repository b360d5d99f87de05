//! Error types for board domain validation and parsing.

use super::{ChecklistItemId, TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// A stage operation was attempted on a task that is not active and
    /// in progress.
    #[error(
        "stage operations require an active in-progress task, \
         task {task_id} is {status} (archived: {archived})"
    )]
    StageRequiresActiveInProgress {
        /// Task the operation targeted.
        task_id: TaskId,
        /// Status of the task at the time of the attempt.
        status: TaskStatus,
        /// Whether the task was archived at the time of the attempt.
        archived: bool,
    },

    /// A stage note body is empty after trimming.
    #[error("stage note body must not be empty")]
    EmptyStageNote,

    /// A checklist item body is empty after trimming.
    #[error("checklist item body must not be empty")]
    EmptyChecklistItem,

    /// The referenced checklist item does not exist on the task.
    #[error("checklist item {item_id} not found on task {task_id}")]
    ChecklistItemNotFound {
        /// Task the lookup targeted.
        task_id: TaskId,
        /// Checklist item that was not found.
        item_id: ChecklistItemId,
    },

    /// The task is already archived.
    #[error("task {0} is already archived")]
    AlreadyArchived(TaskId),

    /// The task is not archived.
    #[error("task {0} is not archived")]
    NotArchived(TaskId),

    /// A status change was attempted on an archived task outside the
    /// composite move path.
    #[error("cannot change status of archived task {0}")]
    StatusChangeOnArchived(TaskId),
}

/// Error returned while parsing task statuses from their wire form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task stages from their wire form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task stage: {0}")]
pub struct ParseTaskStageError(pub String);

/// Error returned while parsing drop-target container identifiers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed container id: {0}")]
pub struct ParseContainerIdError(pub String);
