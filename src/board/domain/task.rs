//! Task aggregate root and its lifecycle state machine.

use super::scoring::{self, Complexity, Priority, ScoreInputs};
use super::{
    ArchiveState, BoardDomainError, BoardId, ChecklistItemId, TaskId, TaskStage, TaskStatus, UserId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A column position a task can occupy: a status plus the archived flag.
///
/// Drop targets resolve to a `MoveTarget`; the composite move transition
/// consumes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveTarget {
    /// Column status at the target.
    pub status: TaskStatus,
    /// Whether the target is in the archive region.
    pub archived: bool,
}

/// A single immutable entry in a stage history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageNote {
    author: UserId,
    body: String,
    recorded_at: DateTime<Utc>,
}

impl StageNote {
    /// Creates a note attributed to `author` at `recorded_at`.
    #[must_use]
    pub fn new(author: UserId, body: impl Into<String>, recorded_at: DateTime<Utc>) -> Self {
        Self {
            author,
            body: body.into(),
            recorded_at,
        }
    }

    /// Returns the authoring user.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the note body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the instant the note was recorded.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Append-only history logs, one per stage.
///
/// Entries are never mutated or removed once written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageHistory {
    potential: Vec<StageNote>,
    contradictions: Vec<StageNote>,
    solution: Vec<StageNote>,
}

impl StageHistory {
    /// Returns the log for the given stage, oldest entry first.
    #[must_use]
    pub fn log(&self, stage: TaskStage) -> &[StageNote] {
        match stage {
            TaskStage::Potential => &self.potential,
            TaskStage::Contradictions => &self.contradictions,
            TaskStage::Solution => &self.solution,
        }
    }

    /// Returns `true` when no stage has any entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.potential.is_empty() && self.contradictions.is_empty() && self.solution.is_empty()
    }

    /// Appends a note to the given stage's log.
    ///
    /// Appending is the only legal mutation; existing entries are never
    /// touched.
    pub fn append(&mut self, stage: TaskStage, note: StageNote) {
        match stage {
            TaskStage::Potential => self.potential.push(note),
            TaskStage::Contradictions => self.contradictions.push(note),
            TaskStage::Solution => self.solution.push(note),
        }
    }
}

/// A single checklist entry on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    id: ChecklistItemId,
    body: String,
    done: bool,
}

impl ChecklistItem {
    /// Creates an unchecked item with a fresh identifier.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            id: ChecklistItemId::new(),
            body: body.into(),
            done: false,
        }
    }

    /// Reconstructs a persisted item.
    #[must_use]
    pub fn from_parts(id: ChecklistItemId, body: impl Into<String>, done: bool) -> Self {
        Self {
            id,
            body: body.into(),
            done,
        }
    }

    /// Returns the item identifier.
    #[must_use]
    pub const fn id(&self) -> ChecklistItemId {
        self.id
    }

    /// Returns the item body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns `true` when the item is checked off.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }
}

/// Field values for creating a task.
///
/// The store assigns the identifier and the initial lifecycle position
/// (`Todo`, active, no stage).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    title: String,
    description: Option<String>,
    assignee_id: Option<UserId>,
    board_ids: BTreeSet<BoardId>,
    show_in_my_tasks: bool,
    priority: Option<Priority>,
    complexity: Option<Complexity>,
    due_date: Option<DateTime<Utc>>,
    self_assigned: bool,
}

impl NewTaskData {
    /// Creates task data with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            assignee_id: None,
            board_ids: BTreeSet::new(),
            show_in_my_tasks: false,
            priority: None,
            complexity: None,
            due_date: None,
            self_assigned: false,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee_id = Some(assignee);
        self
    }

    /// Adds a board membership.
    #[must_use]
    pub fn with_board(mut self, board: BoardId) -> Self {
        self.board_ids.insert(board);
        self
    }

    /// Controls inclusion in the user-scoped "my tasks" views.
    #[must_use]
    pub const fn with_show_in_my_tasks(mut self, show: bool) -> Self {
        self.show_in_my_tasks = show;
        self
    }

    /// Sets the planner priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the estimated complexity.
    #[must_use]
    pub const fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = Some(complexity);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Marks the task as picked up by its assignee.
    #[must_use]
    pub const fn with_self_assigned(mut self, self_assigned: bool) -> Self {
        self.self_assigned = self_assigned;
        self
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    archive: ArchiveState,
    active_stage: Option<TaskStage>,
    stage_history: StageHistory,
    checklist: Vec<ChecklistItem>,
    board_ids: BTreeSet<BoardId>,
    show_in_my_tasks: bool,
    assignee_id: Option<UserId>,
    priority: Option<Priority>,
    complexity: Option<Complexity>,
    due_date: Option<DateTime<Utc>>,
    self_assigned: bool,
    cached_coefficient: Option<i64>,
    moved_to_done_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted active lifecycle status.
    pub status: TaskStatus,
    /// Persisted archival position.
    pub archive: ArchiveState,
    /// Persisted stage, if any.
    pub active_stage: Option<TaskStage>,
    /// Persisted stage history logs.
    pub stage_history: StageHistory,
    /// Persisted checklist entries.
    pub checklist: Vec<ChecklistItem>,
    /// Persisted board memberships.
    pub board_ids: BTreeSet<BoardId>,
    /// Persisted "my tasks" visibility flag.
    pub show_in_my_tasks: bool,
    /// Persisted assignee, if any.
    pub assignee_id: Option<UserId>,
    /// Persisted priority, if any.
    pub priority: Option<Priority>,
    /// Persisted complexity, if any.
    pub complexity: Option<Complexity>,
    /// Persisted due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted self-assignment flag.
    pub self_assigned: bool,
    /// Persisted cached coefficient, if any.
    pub cached_coefficient: Option<i64>,
    /// Persisted first-completion instant, if any.
    pub moved_to_done_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task in its initial lifecycle position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the title is empty
    /// after trimming.
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Result<Self, BoardDomainError> {
        let title = validated_title(&data.title)?;
        let timestamp = clock.utc();

        Ok(Self {
            id: TaskId::new(),
            title,
            description: data.description,
            status: TaskStatus::Todo,
            archive: ArchiveState::Active,
            active_stage: None,
            stage_history: StageHistory::default(),
            checklist: Vec::new(),
            board_ids: data.board_ids,
            show_in_my_tasks: data.show_in_my_tasks,
            assignee_id: data.assignee_id,
            priority: data.priority,
            complexity: data.complexity,
            due_date: data.due_date,
            self_assigned: data.self_assigned,
            cached_coefficient: None,
            moved_to_done_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            archive: data.archive,
            active_stage: data.active_stage,
            stage_history: data.stage_history,
            checklist: data.checklist,
            board_ids: data.board_ids,
            show_in_my_tasks: data.show_in_my_tasks,
            assignee_id: data.assignee_id,
            priority: data.priority,
            complexity: data.complexity,
            due_date: data.due_date,
            self_assigned: data.self_assigned,
            cached_coefficient: data.cached_coefficient,
            moved_to_done_at: data.moved_to_done_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the active lifecycle status.
    ///
    /// For archived tasks this is the status retained for restoration, not
    /// the displayed archive column; see [`Self::column_status`].
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the archival position.
    #[must_use]
    pub const fn archive_state(&self) -> ArchiveState {
        self.archive
    }

    /// Returns `true` when the task is archived.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.archive.is_archived()
    }

    /// Returns the status frozen at archival time, if archived.
    #[must_use]
    pub const fn archived_status(&self) -> Option<TaskStatus> {
        self.archive.archived_status()
    }

    /// Returns the archival instant, if archived.
    #[must_use]
    pub const fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archive.archived_at()
    }

    /// Returns the status of the column the task is displayed in.
    ///
    /// Active tasks partition by [`Self::status`]; archived tasks partition
    /// by the status frozen at archival time.
    #[must_use]
    pub const fn column_status(&self) -> TaskStatus {
        match self.archive.archived_status() {
            Some(frozen) => frozen,
            None => self.status,
        }
    }

    /// Returns the column position the task currently occupies.
    #[must_use]
    pub const fn position(&self) -> MoveTarget {
        MoveTarget {
            status: self.column_status(),
            archived: self.is_archived(),
        }
    }

    /// Returns the current stage, if any.
    #[must_use]
    pub const fn active_stage(&self) -> Option<TaskStage> {
        self.active_stage
    }

    /// Returns the stage history logs.
    #[must_use]
    pub const fn stage_history(&self) -> &StageHistory {
        &self.stage_history
    }

    /// Returns the checklist entries in insertion order.
    #[must_use]
    pub fn checklist(&self) -> &[ChecklistItem] {
        &self.checklist
    }

    /// Returns the board memberships.
    #[must_use]
    pub const fn board_ids(&self) -> &BTreeSet<BoardId> {
        &self.board_ids
    }

    /// Returns `true` when the task belongs to the given board.
    #[must_use]
    pub fn is_on_board(&self, board: BoardId) -> bool {
        self.board_ids.contains(&board)
    }

    /// Returns `true` when the task is listed in the "my tasks" views.
    #[must_use]
    pub const fn show_in_my_tasks(&self) -> bool {
        self.show_in_my_tasks
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the planner priority, if any.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the estimated complexity, if any.
    #[must_use]
    pub const fn complexity(&self) -> Option<Complexity> {
        self.complexity
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns `true` when the assignee picked the task up themselves.
    #[must_use]
    pub const fn self_assigned(&self) -> bool {
        self.self_assigned
    }

    /// Returns the cached coefficient, if one has been computed.
    ///
    /// The cache is derived state, never authoritative; recompute through
    /// [`Self::refresh_score`] whenever the value is displayed and absent.
    #[must_use]
    pub const fn cached_coefficient(&self) -> Option<i64> {
        self.cached_coefficient
    }

    /// Returns the instant the task first entered `Done`, if it ever has.
    #[must_use]
    pub const fn moved_to_done_at(&self) -> Option<DateTime<Utc>> {
        self.moved_to_done_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the task to a column position, combining status change and
    /// archive or unarchive in one atomic step.
    ///
    /// Any move that changes position clears the stage: entering
    /// `InProgress` from elsewhere requires the stage to be re-selected
    /// deliberately, leaving `InProgress` retires it, and archived tasks
    /// never carry one. The first entry into a `Done` column stamps
    /// [`Self::moved_to_done_at`]; later completions leave the original
    /// instant in place.
    ///
    /// Returns `true` when the position changed, `false` for a
    /// same-position target (which mutates nothing).
    pub fn move_to(&mut self, target: MoveTarget, clock: &impl Clock) -> bool {
        if self.position() == target {
            return false;
        }

        let entering_done = target.status == TaskStatus::Done
            && self.column_status() != TaskStatus::Done;

        self.status = target.status;
        self.archive = if target.archived {
            ArchiveState::Archived {
                status: target.status,
                at: clock.utc(),
            }
        } else {
            ArchiveState::Active
        };
        self.active_stage = None;
        if entering_done && self.moved_to_done_at.is_none() {
            self.moved_to_done_at = Some(clock.utc());
        }
        self.touch(clock);
        true
    }

    /// Changes the status of an active task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::StatusChangeOnArchived`] when the task
    /// is archived; archived tasks only move through
    /// [`Self::move_to`] or [`Self::unarchive`].
    pub fn set_status(
        &mut self,
        to: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        if self.is_archived() {
            return Err(BoardDomainError::StatusChangeOnArchived(self.id));
        }
        self.move_to(
            MoveTarget {
                status: to,
                archived: false,
            },
            clock,
        );
        Ok(())
    }

    /// Selects, changes, or explicitly resets the stage.
    ///
    /// Setting the stage it already has is idempotent and mutates nothing,
    /// including the `updated_at` timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::StageRequiresActiveInProgress`] unless
    /// the task is active and `InProgress`.
    pub fn set_stage(
        &mut self,
        stage: Option<TaskStage>,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        self.ensure_stage_operable()?;
        if self.active_stage == stage {
            return Ok(());
        }
        self.active_stage = stage;
        self.touch(clock);
        Ok(())
    }

    /// Appends an entry to the given stage's history log.
    ///
    /// Entries are immutable once written and survive every later
    /// transition, including archival and reopening.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::StageRequiresActiveInProgress`] unless
    /// the task is active and `InProgress`, or
    /// [`BoardDomainError::EmptyStageNote`] when the body is empty after
    /// trimming.
    pub fn append_stage_note(
        &mut self,
        stage: TaskStage,
        author: UserId,
        body: &str,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        self.ensure_stage_operable()?;
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyStageNote);
        }
        self.stage_history
            .append(stage, StageNote::new(author, trimmed, clock.utc()));
        self.touch(clock);
        Ok(())
    }

    /// Retires the task from active boards.
    ///
    /// Freezes the current status as the archive column, stamps the
    /// archival instant, and clears the stage. The status field itself is
    /// retained so the task can later be restored to the same column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::AlreadyArchived`] when the task is
    /// already archived.
    pub fn archive(&mut self, clock: &impl Clock) -> Result<(), BoardDomainError> {
        if self.is_archived() {
            return Err(BoardDomainError::AlreadyArchived(self.id));
        }
        self.move_to(
            MoveTarget {
                status: self.status,
                archived: true,
            },
            clock,
        );
        Ok(())
    }

    /// Restores the task to the active boards in its retained status.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NotArchived`] when the task is not
    /// archived.
    pub fn unarchive(&mut self, clock: &impl Clock) -> Result<(), BoardDomainError> {
        if !self.is_archived() {
            return Err(BoardDomainError::NotArchived(self.id));
        }
        self.move_to(
            MoveTarget {
                status: self.status,
                archived: false,
            },
            clock,
        );
        Ok(())
    }

    /// Renames the task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the title is empty
    /// after trimming.
    pub fn rename(&mut self, title: &str, clock: &impl Clock) -> Result<(), BoardDomainError> {
        let validated = validated_title(title)?;
        if self.title == validated {
            return Ok(());
        }
        self.title = validated;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: Option<String>, clock: &impl Clock) {
        if self.description == description {
            return;
        }
        self.description = description;
        self.touch(clock);
    }

    /// Replaces the assignee.
    pub fn set_assignee(&mut self, assignee: Option<UserId>, clock: &impl Clock) {
        if self.assignee_id == assignee {
            return;
        }
        self.assignee_id = assignee;
        self.touch(clock);
    }

    /// Replaces the planner priority.
    pub fn set_priority(&mut self, priority: Option<Priority>, clock: &impl Clock) {
        if self.priority == priority {
            return;
        }
        self.priority = priority;
        self.touch(clock);
    }

    /// Replaces the estimated complexity.
    pub fn set_complexity(&mut self, complexity: Option<Complexity>, clock: &impl Clock) {
        if self.complexity == complexity {
            return;
        }
        self.complexity = complexity;
        self.touch(clock);
    }

    /// Replaces the due date.
    pub fn set_due_date(&mut self, due: Option<DateTime<Utc>>, clock: &impl Clock) {
        if self.due_date == due {
            return;
        }
        self.due_date = due;
        self.touch(clock);
    }

    /// Replaces the self-assignment flag.
    pub fn set_self_assigned(&mut self, self_assigned: bool, clock: &impl Clock) {
        if self.self_assigned == self_assigned {
            return;
        }
        self.self_assigned = self_assigned;
        self.touch(clock);
    }

    /// Controls inclusion in the user-scoped "my tasks" views.
    pub fn set_show_in_my_tasks(&mut self, show: bool, clock: &impl Clock) {
        if self.show_in_my_tasks == show {
            return;
        }
        self.show_in_my_tasks = show;
        self.touch(clock);
    }

    /// Replaces the board memberships.
    pub fn set_boards(&mut self, boards: BTreeSet<BoardId>, clock: &impl Clock) {
        if self.board_ids == boards {
            return;
        }
        self.board_ids = boards;
        self.touch(clock);
    }

    /// Adds an unchecked checklist item and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyChecklistItem`] when the body is
    /// empty after trimming.
    pub fn add_checklist_item(
        &mut self,
        body: &str,
        clock: &impl Clock,
    ) -> Result<ChecklistItemId, BoardDomainError> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyChecklistItem);
        }
        let item = ChecklistItem::new(trimmed);
        let item_id = item.id();
        self.checklist.push(item);
        self.touch(clock);
        Ok(item_id)
    }

    /// Checks or unchecks a checklist item.
    ///
    /// Setting the state an item already has is idempotent and mutates
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::ChecklistItemNotFound`] when no item
    /// with the identifier exists on the task.
    pub fn set_checklist_item_done(
        &mut self,
        item_id: ChecklistItemId,
        done: bool,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        let item = self
            .checklist
            .iter_mut()
            .find(|item| item.id() == item_id)
            .ok_or(BoardDomainError::ChecklistItemNotFound {
                task_id: self.id,
                item_id,
            })?;
        if item.done == done {
            return Ok(());
        }
        item.done = done;
        self.touch(clock);
        Ok(())
    }

    /// Returns the attributes that feed the coefficient.
    #[must_use]
    pub const fn score_inputs(&self) -> ScoreInputs {
        ScoreInputs {
            complexity: self.complexity,
            priority: self.priority,
            due_date: self.due_date,
            self_assigned: self.self_assigned,
        }
    }

    /// Computes the coefficient at the given instant without caching.
    #[must_use]
    pub fn score_at(&self, at: DateTime<Utc>) -> i64 {
        scoring::coefficient(&self.score_inputs(), at)
    }

    /// Recomputes and caches the coefficient at the current clock time.
    ///
    /// Refreshing the cache is a display concern, not a mutation: it does
    /// not advance `updated_at` and therefore never reorders views.
    pub fn refresh_score(&mut self, clock: &impl Clock) -> i64 {
        let value = self.score_at(clock.utc());
        self.cached_coefficient = Some(value);
        value
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }

    fn ensure_stage_operable(&self) -> Result<(), BoardDomainError> {
        if self.is_archived() || self.status != TaskStatus::InProgress {
            return Err(BoardDomainError::StageRequiresActiveInProgress {
                task_id: self.id,
                status: self.status,
                archived: self.is_archived(),
            });
        }
        Ok(())
    }
}

/// Validates and normalises a task title.
fn validated_title(title: &str) -> Result<String, BoardDomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(BoardDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}
