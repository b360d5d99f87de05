//! Deterministic task scoring.
//!
//! The coefficient is the single scoring value shared by the board engine
//! and downstream compensation and reputation consumers. It is a pure
//! function of a task's attributes and the evaluation instant; no I/O, no
//! hidden clock reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Points awarded per complexity step.
const COMPLEXITY_WEIGHT: i64 = 5;
/// Bonus for a task the assignee picked up themselves.
const SELF_ASSIGNED_BONUS: i64 = 3;
/// Bonus when the due date is at most this many days away.
const URGENT_WINDOW_DAYS: i64 = 3;
/// Bonus points inside the urgent window.
const URGENT_BONUS: i64 = 8;
/// Bonus when the due date is at most this many days away.
const SOON_WINDOW_DAYS: i64 = 7;
/// Bonus points inside the soon window.
const SOON_BONUS: i64 = 4;
/// Every coefficient is at least this value.
const MINIMUM_COEFFICIENT: i64 = 1;

/// Task priority as recorded by planners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Highest priority.
    #[serde(rename = "1")]
    P1,
    /// Elevated priority.
    #[serde(rename = "2")]
    P2,
    /// Normal priority.
    #[serde(rename = "3")]
    P3,
}

impl Priority {
    /// Returns the scoring bonus for this priority.
    #[must_use]
    pub const fn bonus(self) -> i64 {
        match self {
            Self::P1 => 10,
            Self::P2 => 5,
            Self::P3 => 2,
        }
    }
}

/// Estimated task complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    /// Routine work.
    Low,
    /// Non-trivial work.
    Medium,
    /// Demanding work.
    High,
}

impl Complexity {
    /// Returns the base point count for this complexity.
    #[must_use]
    pub const fn points(self) -> i64 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

/// Snapshot of the task attributes that feed the coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreInputs {
    /// Estimated complexity, if recorded.
    pub complexity: Option<Complexity>,
    /// Planner priority, if recorded.
    pub priority: Option<Priority>,
    /// Due date, if recorded.
    pub due_date: Option<DateTime<Utc>>,
    /// Whether the assignee picked the task up themselves.
    pub self_assigned: bool,
}

/// Computes the coefficient for a task snapshot at the given instant.
///
/// The result is the sum of the complexity base, priority bonus, urgency
/// bonus, and self-assignment bonus, floored at one. Repeated calls with
/// unchanged inputs and the same instant always return the same value.
#[must_use]
pub fn coefficient(inputs: &ScoreInputs, at: DateTime<Utc>) -> i64 {
    let base = inputs
        .complexity
        .map_or(0, |complexity| complexity.points() * COMPLEXITY_WEIGHT);
    let priority = inputs.priority.map_or(0, Priority::bonus);
    let urgency = inputs.due_date.map_or(0, |due| {
        let days_left = due.signed_duration_since(at).num_days();
        if days_left <= URGENT_WINDOW_DAYS {
            URGENT_BONUS
        } else if days_left <= SOON_WINDOW_DAYS {
            SOON_BONUS
        } else {
            0
        }
    });
    let self_assigned = if inputs.self_assigned {
        SELF_ASSIGNED_BONUS
    } else {
        0
    };

    (base + priority + urgency + self_assigned).max(MINIMUM_COEFFICIENT)
}
