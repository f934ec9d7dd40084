//! Delivery and acceptance: the designer hands work over for review, the
//! client accepts it.
//!
//! Acceptance folds the project into the designer's long-run statistics
//! (total projects, load, running completion-time average) in the same
//! transaction that moves the status, so the stats can never disagree
//! with the project table.

use atelier_core::error::{CoreError, CODE_INVALID_STATUS_TRANSITION, CODE_NO_DELIVERY};
use atelier_core::types::DbId;
use atelier_core::workflow::ProjectStatus;
use atelier_db::models::designer::Designer;
use atelier_db::models::project::Project;
use atelier_db::repositories::{AssignmentRepo, DesignerRepo, ProjectRepo};
use chrono::Utc;
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::notifications::{KIND_PROJECT_COMPLETED, KIND_PROJECT_DELIVERED};
use crate::state::AppState;

/// The assignee starts work: ASSIGNED -> IN_PROGRESS.
pub async fn start_work(
    state: &AppState,
    designer_user: &AuthUser,
    project_id: DbId,
) -> AppResult<Project> {
    let mut tx = state.pool.begin().await?;

    let designer = require_designer_profile(&mut tx, designer_user.user_id).await?;
    let project = require_own_project(&mut tx, project_id, designer.id).await?;

    let status = project.status()?;
    if status != ProjectStatus::Assigned {
        return Err(AppError::Core(CoreError::business_rule(
            CODE_INVALID_STATUS_TRANSITION,
            format!("Work can only be started on an ASSIGNED project (current status: {status})"),
        )));
    }

    let updated = ProjectRepo::set_status(
        &mut tx,
        project_id,
        ProjectStatus::Assigned,
        ProjectStatus::InProgress,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Project was modified concurrently".into(),
        ))
    })?;

    tx.commit().await?;
    Ok(updated)
}

/// The assignee delivers the work: store the link and move to REVIEW.
///
/// Delivery is allowed from ASSIGNED as well as IN_PROGRESS, so a
/// designer who never pressed "start" can still hand work over.
pub async fn deliver(
    state: &AppState,
    designer_user: &AuthUser,
    project_id: DbId,
    delivery_link: &str,
) -> AppResult<Project> {
    let delivery_link = delivery_link.trim();
    if delivery_link.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Delivery link must not be empty".into(),
        )));
    }

    let now = Utc::now();
    let mut tx = state.pool.begin().await?;

    let designer = require_designer_profile(&mut tx, designer_user.user_id).await?;
    let project = require_own_project(&mut tx, project_id, designer.id).await?;

    let status = project.status()?;
    match status {
        ProjectStatus::Assigned | ProjectStatus::InProgress => {}
        other => {
            return Err(AppError::Core(CoreError::business_rule(
                CODE_INVALID_STATUS_TRANSITION,
                format!("Cannot deliver a project in status {other}"),
            )));
        }
    }

    let updated = ProjectRepo::mark_delivered(&mut tx, project_id, status, delivery_link, now)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Project was modified concurrently".into(),
            ))
        })?;

    tx.commit().await?;

    state.notifier.notify(
        updated.client_id,
        KIND_PROJECT_DELIVERED,
        "Project delivered",
        &format!("Project '{}' is ready for your review", updated.name),
    );
    Ok(updated)
}

/// The owning client accepts the delivered work: REVIEW -> COMPLETED.
///
/// Also records the completion on the designer (total projects up one,
/// load down one, running average updated with the project's recorded
/// hours) within the same transaction.
pub async fn approve(
    state: &AppState,
    client: &AuthUser,
    project_id: DbId,
) -> AppResult<Project> {
    let now = Utc::now();
    let mut tx = state.pool.begin().await?;

    let project = ProjectRepo::find_by_id_for_update(&mut tx, project_id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project_id))?;
    if project.client_id != client.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only approve your own projects".into(),
        )));
    }

    let status = project.status()?;
    if status != ProjectStatus::Review {
        return Err(AppError::Core(CoreError::business_rule(
            CODE_INVALID_STATUS_TRANSITION,
            format!("Only projects in REVIEW can be approved (current status: {status})"),
        )));
    }
    if project.delivery_link.is_none() {
        return Err(AppError::Core(CoreError::business_rule(
            CODE_NO_DELIVERY,
            "Project has no recorded delivery to approve",
        )));
    }

    let updated = ProjectRepo::mark_approved(&mut tx, project_id, now)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Project was modified concurrently".into(),
            ))
        })?;

    let mut designer_user_id = None;
    if let Some(designer_id) = updated.assigned_designer_id {
        let designer =
            DesignerRepo::record_completion(&mut tx, designer_id, updated.actual_hours).await?;
        designer_user_id = Some(designer.user_id);
    }
    if let Some(active) = AssignmentRepo::find_active_by_project(&mut *tx, project_id).await? {
        AssignmentRepo::close(&mut tx, active.id, now).await?;
    }

    tx.commit().await?;

    if let Some(user_id) = designer_user_id {
        state.notifier.notify(
            user_id,
            KIND_PROJECT_COMPLETED,
            "Project approved",
            &format!("Project '{}' has been approved by the client", updated.name),
        );
    }
    Ok(updated)
}

/// Resolve the caller's designer profile or reject.
async fn require_designer_profile(
    conn: &mut PgConnection,
    user_id: DbId,
) -> AppResult<Designer> {
    DesignerRepo::find_by_user_id(&mut *conn, user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "No designer profile exists for this account".into(),
            ))
        })
}

/// Lock the project and verify it is assigned to `designer_id`.
async fn require_own_project(
    conn: &mut PgConnection,
    project_id: DbId,
    designer_id: DbId,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id_for_update(conn, project_id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project_id))?;
    if project.assigned_designer_id != Some(designer_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Project is not assigned to you".into(),
        )));
    }
    Ok(project)
}
