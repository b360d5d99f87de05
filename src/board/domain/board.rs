//! Board container and access rules.

use super::{BoardId, UserId};
use serde::{Deserialize, Serialize};

/// An access grant on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity_type", content = "entity_id", rename_all = "snake_case")]
pub enum AccessRule {
    /// Grants access to a single user.
    User(UserId),
    /// Grants access to every holder of a named role.
    Role(String),
}

/// A named grouping of tasks with access control.
///
/// Board membership is independent of a task's lifecycle state; the board
/// itself knows nothing about columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    id: BoardId,
    name: String,
    access_rules: Vec<AccessRule>,
}

impl Board {
    /// Creates a board with no access rules.
    ///
    /// A board without rules is open to everyone.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BoardId::new(),
            name: name.into(),
            access_rules: Vec::new(),
        }
    }

    /// Reconstructs a persisted board.
    #[must_use]
    pub fn from_parts(
        id: BoardId,
        name: impl Into<String>,
        access_rules: Vec<AccessRule>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            access_rules,
        }
    }

    /// Adds an access rule.
    #[must_use]
    pub fn with_rule(mut self, rule: AccessRule) -> Self {
        self.access_rules.push(rule);
        self
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn id(&self) -> BoardId {
        self.id
    }

    /// Returns the board name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the access rules.
    #[must_use]
    pub fn access_rules(&self) -> &[AccessRule] {
        &self.access_rules
    }

    /// Returns `true` when the user, or any of their roles, is granted
    /// access. Boards without rules are open to everyone.
    #[must_use]
    pub fn allows(&self, user: UserId, roles: &[String]) -> bool {
        if self.access_rules.is_empty() {
            return true;
        }
        self.access_rules.iter().any(|rule| match rule {
            AccessRule::User(granted) => *granted == user,
            AccessRule::Role(role) => roles.contains(role),
        })
    }
}
