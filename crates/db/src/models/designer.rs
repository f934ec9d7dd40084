//! Designer entity model and DTOs.

use atelier_core::types::{DbId, Timestamp};
use atelier_core::workload::Availability;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A designer row from the `designers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Designer {
    pub id: DbId,
    pub user_id: DbId,
    pub display_name: String,
    pub current_load: i32,
    pub max_capacity: i32,
    pub status: String,
    pub leave_from: Option<Timestamp>,
    pub leave_to: Option<Timestamp>,
    pub total_projects: i32,
    pub average_completion_hours: Option<f64>,
    pub rating: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Designer {
    /// The availability view the capacity check operates on.
    pub fn availability(&self) -> Availability<'_> {
        Availability {
            current_load: self.current_load,
            max_capacity: self.max_capacity,
            status: &self.status,
            leave_from: self.leave_from,
            leave_to: self.leave_to,
        }
    }
}

/// DTO for onboarding a new designer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDesigner {
    pub user_id: DbId,
    pub display_name: String,
    /// Defaults to 3 if omitted.
    pub max_capacity: Option<i32>,
}

/// DTO for updating a designer's availability envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDesigner {
    pub display_name: Option<String>,
    pub max_capacity: Option<i32>,
    pub status: Option<String>,
    pub leave_from: Option<Timestamp>,
    pub leave_to: Option<Timestamp>,
}
