//! Project lifecycle state machine.
//!
//! This module is the single source of truth for workflow legality: every
//! mutation of a project's status anywhere in the system must go through
//! [`validate_transition`] (the repository layer additionally guards the
//! `UPDATE` with the expected current status, so a bypassing write cannot
//! slip through a race either).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CODE_INVALID_STATUS_TRANSITION};

/// Project lifecycle status.
///
/// ```text
/// PENDING -> ASSIGNED -> IN_PROGRESS -> REVIEW -> COMPLETED
///    |          |            |            |  \
///    v          v            v            |   '-> IN_PROGRESS (rework)
/// CANCELLED  CANCELLED   CANCELLED    CANCELLED
/// ```
///
/// `COMPLETED` and `CANCELLED` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Pending,
    Assigned,
    InProgress,
    Review,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    /// The wire/database representation (SCREAMING_SNAKE_CASE).
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Pending => "PENDING",
            ProjectStatus::Assigned => "ASSIGNED",
            ProjectStatus::InProgress => "IN_PROGRESS",
            ProjectStatus::Review => "REVIEW",
            ProjectStatus::Completed => "COMPLETED",
            ProjectStatus::Cancelled => "CANCELLED",
        }
    }

    /// Returns the set of valid target statuses reachable from `self`.
    ///
    /// Terminal states return an empty slice because no further transitions
    /// are allowed. A client rejecting a delivery sends the project from
    /// `Review` back to `InProgress` for rework.
    pub fn valid_transitions(self) -> &'static [ProjectStatus] {
        use ProjectStatus::*;
        match self {
            Pending => &[Assigned, Cancelled],
            Assigned => &[InProgress, Cancelled],
            InProgress => &[Review, Cancelled],
            Review => &[Completed, Cancelled, InProgress],
            Completed | Cancelled => &[],
        }
    }

    /// Whether this status permits no further transitions.
    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ProjectStatus::Pending),
            "ASSIGNED" => Ok(ProjectStatus::Assigned),
            "IN_PROGRESS" => Ok(ProjectStatus::InProgress),
            "REVIEW" => Ok(ProjectStatus::Review),
            "COMPLETED" => Ok(ProjectStatus::Completed),
            "CANCELLED" => Ok(ProjectStatus::Cancelled),
            other => Err(CoreError::Internal(format!(
                "Unknown project status '{other}' in database"
            ))),
        }
    }
}

/// Check whether a transition from `from` to `to` is legal.
///
/// A transition to the same status is always illegal: callers must be
/// explicit about why nothing changed instead of issuing no-op writes.
pub fn can_transition(from: ProjectStatus, to: ProjectStatus) -> bool {
    from != to && from.valid_transitions().contains(&to)
}

/// Validate a status transition, returning a structured business-rule
/// rejection naming the current status and the full legal-target set.
pub fn validate_transition(from: ProjectStatus, to: ProjectStatus) -> Result<(), CoreError> {
    if can_transition(from, to) {
        return Ok(());
    }
    let allowed = from
        .valid_transitions()
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let message = if allowed.is_empty() {
        format!("Cannot transition from {from} to {to}: {from} is a terminal status")
    } else {
        format!("Cannot transition from {from} to {to}. Allowed targets: {allowed}")
    };
    Err(CoreError::business_rule(
        CODE_INVALID_STATUS_TRANSITION,
        message,
    ))
}

/// Project priority levels, lowest to highest.
pub const VALID_PRIORITIES: &[&str] = &["low", "medium", "high", "urgent"];

/// Default priority for new projects.
pub const DEFAULT_PRIORITY: &str = "medium";

/// Validate that a priority string is one of the accepted values.
pub fn validate_priority(priority: &str) -> Result<(), CoreError> {
    if VALID_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid priority '{priority}'. Must be one of: {}",
            VALID_PRIORITIES.join(", ")
        )))
    }
}
