//! Application services for the board engine.

mod board;
mod projector;
mod reconciler;
mod workspace;

pub use board::{BoardServiceError, BoardServiceResult, EditTaskRequest, TaskBoardService};
pub use projector::{BoardColumns, ViewQuery, project};
pub use reconciler::{DragGesture, DragOutcome, DragReconciler, ReconcileError};
pub use workspace::BoardWorkspace;
