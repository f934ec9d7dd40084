//! Assignment coordinator: first assignment and reassignment.
//!
//! Both operations lock the project row, then the designer row(s), check
//! capacity against the locked rows, write the assignment history record,
//! move the project, and adjust loads, all in one transaction. Load
//! changes are net-zero on reassignment and exactly +1 on assignment.
//!
//! Lock order is project first, then designers in ascending id order.
//! Cancellation and approval take their locks the same way, so no pair
//! of coordinators can deadlock on the same project.

use atelier_core::error::{
    CoreError, CODE_PROJECT_ALREADY_ASSIGNED, CODE_PROJECT_NOT_ASSIGNED_TO_DESIGNER,
};
use atelier_core::types::DbId;
use atelier_core::workflow::{self, ProjectStatus};
use atelier_core::workload;
use atelier_db::models::project::Project;
use atelier_db::repositories::{AssignmentRepo, DesignerRepo, ProjectRepo};
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::notifications::{Notifier, KIND_PROJECT_ASSIGNED, KIND_PROJECT_REASSIGNED};
use crate::state::AppState;

/// Assign a pending, unassigned project to a designer.
///
/// The designer row is locked before the capacity check so a concurrent
/// assignment to the same designer waits for this one to commit.
pub async fn assign(
    state: &AppState,
    admin: &AuthUser,
    designer_id: DbId,
    project_id: DbId,
    estimated_hours: Option<f64>,
) -> AppResult<Project> {
    let now = Utc::now();
    let mut tx = state.pool.begin().await?;

    let project = ProjectRepo::find_by_id_for_update(&mut tx, project_id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project_id))?;

    let designer = DesignerRepo::find_by_id_for_update(&mut tx, designer_id)
        .await?
        .ok_or_else(|| AppError::not_found("Designer", designer_id))?;
    workload::check_can_assign(&designer.availability(), now)?;

    if project.assigned_designer_id.is_some() {
        return Err(AppError::Core(CoreError::business_rule(
            CODE_PROJECT_ALREADY_ASSIGNED,
            "Project is already assigned to a designer",
        )));
    }
    workflow::validate_transition(project.status()?, ProjectStatus::Assigned)?;

    AssignmentRepo::create(&mut tx, project_id, None, designer_id, None, now).await?;
    let updated = ProjectRepo::assign(
        &mut tx,
        project_id,
        designer_id,
        admin.user_id,
        estimated_hours,
        now,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Project was modified concurrently".into(),
        ))
    })?;
    DesignerRepo::increment_load(&mut tx, designer_id).await?;

    tx.commit().await?;

    notify_assigned(&state.notifier, designer.user_id, &updated);
    Ok(updated)
}

/// Move a project from its current designer to another.
///
/// The project keeps its workflow status; the active assignment record is
/// closed and a new one opened with the operator's reason. Terminal
/// projects cannot be reassigned.
pub async fn reassign(
    state: &AppState,
    _admin: &AuthUser,
    from_designer_id: DbId,
    to_designer_id: DbId,
    project_id: DbId,
    reason: Option<&str>,
) -> AppResult<Project> {
    if from_designer_id == to_designer_id {
        return Err(AppError::Core(CoreError::Validation(
            "Source and target designer are the same".into(),
        )));
    }

    let now = Utc::now();
    let mut tx = state.pool.begin().await?;

    let project = ProjectRepo::find_by_id_for_update(&mut tx, project_id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project_id))?;

    // Lock both designer rows in ascending id order so two concurrent
    // reassignments between the same pair cannot deadlock.
    let (first, second) = if from_designer_id < to_designer_id {
        (from_designer_id, to_designer_id)
    } else {
        (to_designer_id, from_designer_id)
    };
    let first_row = DesignerRepo::find_by_id_for_update(&mut tx, first)
        .await?
        .ok_or_else(|| AppError::not_found("Designer", first))?;
    let second_row = DesignerRepo::find_by_id_for_update(&mut tx, second)
        .await?
        .ok_or_else(|| AppError::not_found("Designer", second))?;
    let (from_designer, to_designer) = if first == from_designer_id {
        (first_row, second_row)
    } else {
        (second_row, first_row)
    };

    if project.assigned_designer_id != Some(from_designer_id) {
        return Err(AppError::Core(CoreError::business_rule(
            CODE_PROJECT_NOT_ASSIGNED_TO_DESIGNER,
            "Project is not assigned to the named source designer",
        )));
    }
    let status = project.status()?;
    if status.is_terminal() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot reassign a project in terminal status {status}"
        ))));
    }

    workload::check_can_assign(&to_designer.availability(), now)?;

    if let Some(active) = AssignmentRepo::find_active_by_project(&mut *tx, project_id).await? {
        AssignmentRepo::close(&mut tx, active.id, now).await?;
    }
    AssignmentRepo::create(
        &mut tx,
        project_id,
        Some(from_designer_id),
        to_designer_id,
        reason,
        now,
    )
    .await?;

    let updated = ProjectRepo::transfer(&mut tx, project_id, from_designer_id, to_designer_id, now)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Project was modified concurrently".into(),
            ))
        })?;

    DesignerRepo::decrement_load(&mut tx, from_designer_id).await?;
    DesignerRepo::increment_load(&mut tx, to_designer_id).await?;

    tx.commit().await?;

    notify_reassigned(
        &state.notifier,
        from_designer.user_id,
        to_designer.user_id,
        &updated,
    );
    Ok(updated)
}

fn notify_assigned(notifier: &Notifier, designer_user_id: DbId, project: &Project) {
    notifier.notify(
        designer_user_id,
        KIND_PROJECT_ASSIGNED,
        "New project assigned",
        &format!("You have been assigned to project '{}'", project.name),
    );
    notifier.notify(
        project.client_id,
        KIND_PROJECT_ASSIGNED,
        "Designer assigned",
        &format!("A designer has been assigned to your project '{}'", project.name),
    );
}

fn notify_reassigned(
    notifier: &Notifier,
    from_user_id: DbId,
    to_user_id: DbId,
    project: &Project,
) {
    notifier.notify(
        from_user_id,
        KIND_PROJECT_REASSIGNED,
        "Project reassigned",
        &format!("Project '{}' has been moved to another designer", project.name),
    );
    notifier.notify(
        to_user_id,
        KIND_PROJECT_REASSIGNED,
        "New project assigned",
        &format!("You have been assigned to project '{}'", project.name),
    );
    notifier.notify(
        project.client_id,
        KIND_PROJECT_REASSIGNED,
        "Designer changed",
        &format!("Your project '{}' has a new designer", project.name),
    );
}
