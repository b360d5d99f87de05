//! Typed drop-target container identifiers.
//!
//! Drop targets arrive from the view layer as opaque strings such as
//! `board-{id}-IN_PROGRESS`, `my-active-TODO`, or `my-archive-DONE`. They
//! are parsed exactly once, at the view boundary, into a typed descriptor;
//! everything past that boundary works with [`ContainerId`] values, so an
//! illegal destination (an archived column on a project board, say) cannot
//! be expressed at all.

use super::{BoardId, MoveTarget, ParseContainerIdError, TaskStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Wire prefix of "my tasks" active columns.
const MY_ACTIVE_PREFIX: &str = "my-active-";
/// Wire prefix of "my tasks" archive columns.
const MY_ARCHIVE_PREFIX: &str = "my-archive-";
/// Wire prefix of project board columns.
const BOARD_PREFIX: &str = "board-";

/// The page a container is rendered on.
///
/// A drop is only meaningful when its destination belongs to the page the
/// gesture started on; the active and archive regions of the "my tasks"
/// page share one scope so tasks can be dragged between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewScope {
    /// A single project board page.
    Board(BoardId),
    /// The user-scoped "my tasks" page (active columns plus archive).
    MyTasks,
}

/// A drop-target container: a view scope paired with a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "container", rename_all = "snake_case")]
pub enum ContainerId {
    /// A status column on a project board.
    Board {
        /// Owning board.
        board: BoardId,
        /// Column status.
        status: TaskStatus,
    },
    /// An active status column on the "my tasks" page.
    MyActive {
        /// Column status.
        status: TaskStatus,
    },
    /// An archive column on the "my tasks" page.
    MyArchive {
        /// Column status the archive column mirrors.
        status: TaskStatus,
    },
}

impl ContainerId {
    /// Returns the page scope the container belongs to.
    #[must_use]
    pub const fn scope(self) -> ViewScope {
        match self {
            Self::Board { board, .. } => ViewScope::Board(board),
            Self::MyActive { .. } | Self::MyArchive { .. } => ViewScope::MyTasks,
        }
    }

    /// Returns the column status the container displays.
    #[must_use]
    pub const fn status(self) -> TaskStatus {
        match self {
            Self::Board { status, .. }
            | Self::MyActive { status }
            | Self::MyArchive { status } => status,
        }
    }

    /// Returns `true` when the container sits in an archive region.
    #[must_use]
    pub const fn is_archived(self) -> bool {
        matches!(self, Self::MyArchive { .. })
    }

    /// Returns the column position a task lands in when dropped here.
    #[must_use]
    pub const fn move_target(self) -> MoveTarget {
        MoveTarget {
            status: self.status(),
            archived: self.is_archived(),
        }
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Board { board, status } => {
                write!(f, "{BOARD_PREFIX}{board}-{}", status.column_token())
            }
            Self::MyActive { status } => {
                write!(f, "{MY_ACTIVE_PREFIX}{}", status.column_token())
            }
            Self::MyArchive { status } => {
                write!(f, "{MY_ARCHIVE_PREFIX}{}", status.column_token())
            }
        }
    }
}

impl TryFrom<&str> for ContainerId {
    type Error = ParseContainerIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let malformed = || ParseContainerIdError(value.to_owned());

        if let Some(token) = value.strip_prefix(MY_ACTIVE_PREFIX) {
            let status = TaskStatus::try_from(token).map_err(|_| malformed())?;
            return Ok(Self::MyActive { status });
        }
        if let Some(token) = value.strip_prefix(MY_ARCHIVE_PREFIX) {
            let status = TaskStatus::try_from(token).map_err(|_| malformed())?;
            return Ok(Self::MyArchive { status });
        }
        if let Some(rest) = value.strip_prefix(BOARD_PREFIX) {
            let (board_part, token) = rest.rsplit_once('-').ok_or_else(malformed)?;
            let board = Uuid::parse_str(board_part).map_err(|_| malformed())?;
            let status = TaskStatus::try_from(token).map_err(|_| malformed())?;
            return Ok(Self::Board {
                board: BoardId::from_uuid(board),
                status,
            });
        }
        Err(malformed())
    }
}
