//! Reputation scoring for compensation and HR consumers.
//!
//! The reputation score folds tenure, the average coefficient of a
//! member's completed tasks, and achievement weighting together, then
//! subtracts disciplinary and absence penalties and clamps the result to
//! `[0, 100]`. It deliberately reuses the board engine's coefficient
//! definition — the two subsystems must never disagree about what a task
//! was worth.

use crate::board::domain::{Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Points per full year of service.
const TENURE_POINTS_PER_YEAR: i64 = 1;
/// Tenure contribution ceiling.
const MAX_TENURE_POINTS: i64 = 10;
/// Months in a year, for tenure bucketing.
const MONTHS_PER_YEAR: u32 = 12;
/// Lower clamp of the final score.
const MIN_SCORE: i64 = 0;
/// Upper clamp of the final score.
const MAX_SCORE: i64 = 100;

/// A weighted achievement on a member's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    label: String,
    weight: i64,
}

impl Achievement {
    /// Creates an achievement with the given weight.
    #[must_use]
    pub fn new(label: impl Into<String>, weight: i64) -> Self {
        Self {
            label: label.into(),
            weight,
        }
    }

    /// Returns the achievement label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the achievement weight.
    #[must_use]
    pub const fn weight(&self) -> i64 {
        self.weight
    }
}

/// A member's reputation-relevant record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationProfile {
    tenure_months: u32,
    achievements: Vec<Achievement>,
    disciplinary_points: i64,
    absence_points: i64,
}

impl ReputationProfile {
    /// Creates a profile with the given tenure and a clean record.
    #[must_use]
    pub const fn new(tenure_months: u32) -> Self {
        Self {
            tenure_months,
            achievements: Vec::new(),
            disciplinary_points: 0,
            absence_points: 0,
        }
    }

    /// Adds an achievement.
    #[must_use]
    pub fn with_achievement(mut self, achievement: Achievement) -> Self {
        self.achievements.push(achievement);
        self
    }

    /// Sets accumulated disciplinary penalty points.
    #[must_use]
    pub const fn with_disciplinary_points(mut self, points: i64) -> Self {
        self.disciplinary_points = points;
        self
    }

    /// Sets accumulated absence penalty points.
    #[must_use]
    pub const fn with_absence_points(mut self, points: i64) -> Self {
        self.absence_points = points;
        self
    }

    /// Returns the tenure in months.
    #[must_use]
    pub const fn tenure_months(&self) -> u32 {
        self.tenure_months
    }

    /// Returns the achievements.
    #[must_use]
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }
}

/// Computes a member's reputation score at the given instant.
///
/// Completed tasks are those currently sitting in a done column, active
/// or archived; their coefficients are evaluated at `at` with the board
/// engine's scoring function and averaged.
#[must_use]
pub fn reputation_score(profile: &ReputationProfile, tasks: &[Task], at: DateTime<Utc>) -> i64 {
    let tenure_years = i64::from(
        profile
            .tenure_months
            .checked_div(MONTHS_PER_YEAR)
            .unwrap_or_default(),
    );
    let tenure = (tenure_years * TENURE_POINTS_PER_YEAR).min(MAX_TENURE_POINTS);

    let completed: Vec<i64> = tasks
        .iter()
        .filter(|task| task.column_status() == TaskStatus::Done)
        .map(|task| task.score_at(at))
        .collect();
    let coefficient_total: i64 = completed.iter().sum();
    let completed_count = i64::try_from(completed.len()).unwrap_or(i64::MAX);
    let average_coefficient = coefficient_total
        .checked_div(completed_count)
        .unwrap_or_default();

    let achievement_weighting: i64 = profile
        .achievements
        .iter()
        .map(Achievement::weight)
        .sum();

    let raw = tenure + average_coefficient + achievement_weighting
        - profile.disciplinary_points
        - profile.absence_points;
    raw.clamp(MIN_SCORE, MAX_SCORE)
}
