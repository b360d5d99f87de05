//! Task status, stage, and archival position types.

use super::{ParseTaskStageError, ParseTaskStatusError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Active lifecycle position of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    Todo,
    /// Work is underway.
    InProgress,
    /// Work is finished.
    Done,
}

impl TaskStatus {
    /// The three standard columns in display order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Returns the upper-case column token used in container identifiers.
    #[must_use]
    pub const fn column_token(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Working sub-state of an active in-progress task.
///
/// A stage only has meaning while the owning task is active and
/// [`TaskStatus::InProgress`]; every transition out of that position clears
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStage {
    /// Gathering possible directions.
    Potential,
    /// Working through conflicting requirements.
    Contradictions,
    /// Converging on the final answer.
    Solution,
}

impl TaskStage {
    /// The three stages in workflow order.
    pub const ALL: [Self; 3] = [Self::Potential, Self::Contradictions, Self::Solution];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Potential => "potential",
            Self::Contradictions => "contradictions",
            Self::Solution => "solution",
        }
    }
}

impl TryFrom<&str> for TaskStage {
    type Error = ParseTaskStageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "potential" => Ok(Self::Potential),
            "contradictions" => Ok(Self::Contradictions),
            "solution" => Ok(Self::Solution),
            _ => Err(ParseTaskStageError(value.to_owned())),
        }
    }
}

impl std::fmt::Display for TaskStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Archival position of a task.
///
/// Archived tasks carry the status frozen at archival time so the archive
/// view can mirror the three active columns and restoration returns the
/// task to the column it left. Modelling the frozen status inside the
/// variant makes an archived task without an archived status, or an active
/// task with one, unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ArchiveState {
    /// The task appears on active boards.
    Active,
    /// The task is retired from active boards.
    Archived {
        /// Status frozen at archival time.
        status: TaskStatus,
        /// Instant the task was archived.
        at: DateTime<Utc>,
    },
}

impl ArchiveState {
    /// Returns `true` when the task is archived.
    #[must_use]
    pub const fn is_archived(self) -> bool {
        matches!(self, Self::Archived { .. })
    }

    /// Returns the status frozen at archival time, if archived.
    #[must_use]
    pub const fn archived_status(self) -> Option<TaskStatus> {
        match self {
            Self::Active => None,
            Self::Archived { status, .. } => Some(status),
        }
    }

    /// Returns the archival instant, if archived.
    #[must_use]
    pub const fn archived_at(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Active => None,
            Self::Archived { at, .. } => Some(at),
        }
    }
}
