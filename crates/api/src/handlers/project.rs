//! Handlers for the `/projects` resource and the designer-facing
//! project dashboard.

use atelier_core::error::CoreError;
use atelier_core::roles::ROLE_ADMIN;
use atelier_core::types::DbId;
use atelier_core::workflow::ProjectStatus;
use atelier_db::models::designer::Designer;
use atelier_db::models::project::{CreateProject, UpdateProjectProgress};
use atelier_db::repositories::{AssignmentRepo, DesignerRepo, ProjectRepo};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::{AuthUser, RequireAdmin, RequireClient, RequireDesigner};
use crate::response::DataResponse;
use crate::services;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `POST /designer/projects/{id}/deliver`.
#[derive(Debug, Deserialize)]
pub struct DeliverRequest {
    pub delivery_link: String,
}

/// Body for `PATCH /admin/projects/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: ProjectStatus,
}

// ---------------------------------------------------------------------------
// Client endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/projects
///
/// Create a project for the authenticated client. Intake is gated by the
/// client's subscription credits.
pub async fn create_project(
    RequireClient(client): RequireClient,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    let project = services::credits::admit_project(&state, &client, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(project))))
}

/// GET /api/v1/projects
///
/// List the authenticated client's projects, most recent first.
pub async fn list_my_projects(
    RequireClient(client): RequireClient,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let projects = ProjectRepo::list_by_client(&state.pool, client.user_id).await?;
    Ok(Json(DataResponse::new(projects)))
}

/// GET /api/v1/projects/{id}
///
/// Fetch a single project. Visible to admins, the owning client, and the
/// assigned designer.
pub async fn get_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project_id))?;

    let visible = auth.role == ROLE_ADMIN
        || project.client_id == auth.user_id
        || is_assignee(&state, &auth, project.assigned_designer_id).await?;
    if !visible {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this project".into(),
        )));
    }

    Ok(Json(DataResponse::new(project)))
}

/// POST /api/v1/projects/{id}/approve
///
/// The owning client accepts a delivered project (REVIEW -> COMPLETED).
pub async fn approve_project(
    RequireClient(client): RequireClient,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = services::delivery::approve(&state, &client, project_id).await?;
    Ok(Json(DataResponse::new(project)))
}

// ---------------------------------------------------------------------------
// Designer endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/designer/projects
///
/// List the projects currently assigned to the authenticated designer.
pub async fn list_assigned_projects(
    RequireDesigner(designer_user): RequireDesigner,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let designer = require_profile(&state, &designer_user).await?;
    let projects = ProjectRepo::list_by_designer(&state.pool, designer.id).await?;
    Ok(Json(DataResponse::new(projects)))
}

/// POST /api/v1/designer/projects/{id}/start
///
/// The assignee starts work: ASSIGNED -> IN_PROGRESS.
pub async fn start_work(
    RequireDesigner(designer_user): RequireDesigner,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = services::delivery::start_work(&state, &designer_user, project_id).await?;
    Ok(Json(DataResponse::new(project)))
}

/// POST /api/v1/designer/projects/{id}/deliver
///
/// The assignee hands the work over for client review.
pub async fn deliver_project(
    RequireDesigner(designer_user): RequireDesigner,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<DeliverRequest>,
) -> AppResult<impl IntoResponse> {
    let project =
        services::delivery::deliver(&state, &designer_user, project_id, &input.delivery_link)
            .await?;
    Ok(Json(DataResponse::new(project)))
}

/// PATCH /api/v1/designer/projects/{id}/progress
///
/// The assignee records progress (completion percentage, hours spent) on
/// a non-terminal project.
pub async fn update_progress(
    RequireDesigner(designer_user): RequireDesigner,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<UpdateProjectProgress>,
) -> AppResult<impl IntoResponse> {
    if let Some(rate) = input.completion_rate {
        if !(0..=100).contains(&rate) {
            return Err(AppError::Core(CoreError::Validation(
                "completion_rate must be between 0 and 100".into(),
            )));
        }
    }
    if let Some(hours) = input.actual_hours {
        if hours < 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "actual_hours must not be negative".into(),
            )));
        }
    }

    let designer = require_profile(&state, &designer_user).await?;
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", project_id))?;
    if project.assigned_designer_id != Some(designer.id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Project is not assigned to you".into(),
        )));
    }

    let updated = ProjectRepo::update_progress(&state.pool, project_id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Progress cannot be recorded on a completed or cancelled project".into(),
            ))
        })?;
    Ok(Json(DataResponse::new(updated)))
}

// ---------------------------------------------------------------------------
// Admin endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/projects/pending
///
/// The intake queue: unassigned projects, oldest first.
pub async fn list_pending(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let projects = ProjectRepo::list_pending(&state.pool).await?;
    Ok(Json(DataResponse::new(projects)))
}

/// PATCH /api/v1/admin/projects/{id}/status
///
/// Apply a status transition through the workflow gate. Only CANCELLED
/// and IN_PROGRESS (rework) may be requested here; the other moves have
/// dedicated endpoints.
pub async fn set_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<SetStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let project =
        services::workflow::apply_transition(&state, &admin, project_id, input.status).await?;
    Ok(Json(DataResponse::new(project)))
}

/// GET /api/v1/projects/{id}/assignments
///
/// Full assignment history for a project, oldest first (admin only).
pub async fn list_assignments(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if ProjectRepo::find_by_id(&state.pool, project_id).await?.is_none() {
        return Err(AppError::not_found("Project", project_id));
    }
    let history = AssignmentRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse::new(history)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the caller's designer profile or reject with 403.
async fn require_profile(state: &AppState, user: &AuthUser) -> AppResult<Designer> {
    DesignerRepo::find_by_user_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "No designer profile exists for this account".into(),
            ))
        })
}

/// Whether the caller's designer profile (if any) holds the assignment.
async fn is_assignee(
    state: &AppState,
    auth: &AuthUser,
    assigned_designer_id: Option<DbId>,
) -> AppResult<bool> {
    let Some(designer_id) = assigned_designer_id else {
        return Ok(false);
    };
    let profile = DesignerRepo::find_by_user_id(&state.pool, auth.user_id).await?;
    Ok(profile.map(|d| d.id) == Some(designer_id))
}
