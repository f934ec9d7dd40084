//! Assignment-history entity model.
//!
//! `project_assignments` is append-only: a record is created on every
//! assignment or reassignment, closed (`status = completed`) when
//! superseded, and never mutated otherwise.

use atelier_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Assignment record status: currently holds the project.
pub const ASSIGNMENT_STATUS_ACTIVE: &str = "active";

/// Assignment record status: superseded or finished.
pub const ASSIGNMENT_STATUS_COMPLETED: &str = "completed";

/// A row from the `project_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectAssignment {
    pub id: DbId,
    pub project_id: DbId,
    /// `None` for a first assignment; the outgoing designer on reassignment.
    pub previous_designer_id: Option<DbId>,
    pub new_designer_id: DbId,
    pub reason: Option<String>,
    pub status: String,
    pub assigned_at: Timestamp,
    pub reassigned_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
