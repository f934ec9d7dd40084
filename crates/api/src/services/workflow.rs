//! Admin-driven status transitions.
//!
//! Everything funnels through [`apply_transition`]: the status machine
//! validates the move, the conditional update applies it, and side
//! effects (load release, assignment closure) ride the same transaction.
//! Assignment, delivery, and approval have their own dedicated paths;
//! this gate covers cancellation and sending reviewed work back for
//! rework.

use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_core::workflow::{validate_transition, ProjectStatus};
use atelier_db::models::project::Project;
use atelier_db::repositories::{AssignmentRepo, DesignerRepo, ProjectRepo};
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::notifications::KIND_PROJECT_CANCELLED;
use crate::state::AppState;

/// Transitions the generic admin endpoint may request. The other moves
/// have dedicated operations with their own side effects (assignment,
/// delivery, approval), so they are rejected here.
const ADMIN_TARGETS: &[ProjectStatus] = &[ProjectStatus::InProgress, ProjectStatus::Cancelled];

/// Apply an admin-requested status transition to a project.
pub async fn apply_transition(
    state: &AppState,
    _admin: &AuthUser,
    project_id: DbId,
    target: ProjectStatus,
) -> AppResult<Project> {
    if !ADMIN_TARGETS.contains(&target) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Status {target} cannot be set directly; use the dedicated operation"
        ))));
    }

    let now = Utc::now();
    let mut tx = state.pool.begin().await?;

    let project = ProjectRepo::find_by_id_for_update(&mut tx, project_id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project_id))?;
    let status = project.status()?;
    validate_transition(status, target)?;

    let updated = ProjectRepo::set_status(&mut tx, project_id, status, target)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Project was modified concurrently".into(),
            ))
        })?;

    // Cancelling an assigned project releases the designer's slot and
    // closes the active assignment record.
    if target == ProjectStatus::Cancelled {
        if let Some(designer_id) = updated.assigned_designer_id {
            DesignerRepo::decrement_load(&mut tx, designer_id).await?;
        }
        if let Some(active) = AssignmentRepo::find_active_by_project(&mut *tx, project_id).await? {
            AssignmentRepo::close(&mut tx, active.id, now).await?;
        }
    }

    tx.commit().await?;

    if target == ProjectStatus::Cancelled {
        state.notifier.notify(
            updated.client_id,
            KIND_PROJECT_CANCELLED,
            "Project cancelled",
            &format!("Project '{}' has been cancelled", updated.name),
        );
    }
    Ok(updated)
}
