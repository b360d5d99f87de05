//! Drag-and-drop reconciliation with optimistic mutation and rollback.

use super::BoardWorkspace;
use crate::board::domain::{ContainerId, Task, TaskId, ViewScope};
use crate::board::ports::{TaskPatch, TaskStore, TaskStoreError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// A drag gesture: the task picked up, where it came from, and where it
/// was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragGesture {
    task_id: TaskId,
    source: ContainerId,
    destination: Option<ContainerId>,
}

impl DragGesture {
    /// Creates a gesture dropped outside any valid target.
    ///
    /// A cancelled drag (pointer released outside any droppable, or an
    /// explicit cancel) takes this form.
    #[must_use]
    pub const fn new(task_id: TaskId, source: ContainerId) -> Self {
        Self {
            task_id,
            source,
            destination: None,
        }
    }

    /// Sets the container the task was dropped on.
    #[must_use]
    pub const fn dropped_on(mut self, destination: ContainerId) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Returns the dragged task's id.
    #[must_use]
    pub const fn task_id(self) -> TaskId {
        self.task_id
    }

    /// Returns the container the drag started from.
    #[must_use]
    pub const fn source(self) -> ContainerId {
        self.source
    }

    /// Returns the drop destination, if the gesture had one.
    #[must_use]
    pub const fn destination(self) -> Option<ContainerId> {
        self.destination
    }
}

/// Outcome of a reconciled drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// The gesture had no valid destination in the rendered scope; nothing
    /// was mutated and no error is surfaced.
    Ignored,
    /// The destination matched the task's current position; no transition
    /// was needed and no write was issued.
    Unchanged,
    /// The move was confirmed; the carried task is the store's
    /// authoritative copy.
    Moved(Task),
}

/// Errors surfaced by drag reconciliation.
#[derive(Debug, Clone, Error)]
pub enum ReconcileError {
    /// The dragged task is not present in the workspace.
    #[error("task not present in workspace: {0}")]
    UnknownTask(TaskId),

    /// The store rejected the write; the optimistic mutation has already
    /// been rolled back when this is returned.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Reconciles drag gestures against the task store.
///
/// The optimistic mutation is applied synchronously before the write is
/// issued, so the acting client reads its own move immediately. Each
/// reconciliation only ever touches its own task id; concurrent gestures
/// on different tasks cannot corrupt each other. When the same task is
/// moved twice in quick succession the second write overwrites the first
/// store-side (last writer wins) — observed behaviour, not a guarantee.
#[derive(Clone)]
pub struct DragReconciler<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> DragReconciler<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new reconciler.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Resolves a drop, applies it optimistically, and reconciles with the
    /// store.
    ///
    /// A gesture without a destination, or with a destination outside the
    /// rendered scope, is ignored: the task visually snaps back and no
    /// state changes. A destination matching the source container (or the
    /// task's current position) needs no transition. Otherwise the
    /// composite transition implied by the destination is applied to the
    /// workspace immediately, the changed fields are written to the store,
    /// and the authoritative task replaces the optimistic one on success.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::UnknownTask`] when the task is not in the
    /// workspace, or [`ReconcileError::Store`] when the write fails — in
    /// which case the pre-transition snapshot has been restored and no
    /// partial state is retained.
    pub async fn resolve_drop(
        &self,
        workspace: &mut BoardWorkspace,
        rendered: ViewScope,
        gesture: DragGesture,
    ) -> Result<DragOutcome, ReconcileError> {
        let Some(destination) = gesture.destination() else {
            debug!(task = %gesture.task_id(), "drag cancelled, no destination");
            return Ok(DragOutcome::Ignored);
        };
        if destination.scope() != rendered {
            debug!(
                task = %gesture.task_id(),
                destination = %destination,
                "drop outside rendered scope ignored"
            );
            return Ok(DragOutcome::Ignored);
        }
        if destination == gesture.source() {
            return Ok(DragOutcome::Unchanged);
        }

        let snapshot = workspace
            .get(gesture.task_id())
            .ok_or(ReconcileError::UnknownTask(gesture.task_id()))?
            .clone();

        let mut moved = snapshot.clone();
        if !moved.move_to(destination.move_target(), &*self.clock) {
            return Ok(DragOutcome::Unchanged);
        }

        let patch = TaskPatch::move_diff(&snapshot, &moved);
        workspace.upsert(moved);
        debug!(
            task = %gesture.task_id(),
            destination = %destination,
            "optimistic move applied, writing to store"
        );

        match self.store.update(patch).await {
            Ok(authoritative) => {
                workspace.upsert(authoritative.clone());
                Ok(DragOutcome::Moved(authoritative))
            }
            Err(err) => {
                warn!(
                    task = %gesture.task_id(),
                    error = %err,
                    "store rejected move, rolling back optimistic mutation"
                );
                workspace.upsert(snapshot);
                Err(ReconcileError::Store(err))
            }
        }
    }
}
