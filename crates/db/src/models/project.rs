//! Project entity model and DTOs.

use atelier_core::types::{DbId, Timestamp};
use atelier_core::workflow::ProjectStatus;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub client_id: DbId,
    pub assigned_designer_id: Option<DbId>,
    pub assigned_by_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub completion_rate: i32,
    pub delivery_link: Option<String>,
    pub assigned_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Parse the stored status string into the domain enum.
    ///
    /// The column carries a CHECK constraint, so a parse failure means the
    /// database was modified out-of-band and surfaces as an internal error.
    pub fn status(&self) -> Result<ProjectStatus, atelier_core::error::CoreError> {
        ProjectStatus::from_str(&self.status)
    }
}

/// DTO for client project intake.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<String>,
}

/// DTO for updating mutable project fields outside the workflow
/// (completion percentage, recorded hours). Status is never set here.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProjectProgress {
    pub completion_rate: Option<i32>,
    pub actual_hours: Option<f64>,
}
