//! Handlers for admin designer management: onboarding, availability,
//! the workload dashboard, and assignment operations.

use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_core::workload;
use atelier_db::models::designer::{CreateDesigner, Designer, UpdateDesigner};
use atelier_db::repositories::DesignerRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::RequireAdmin;
use crate::response::DataResponse;
use crate::services;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /admin/designers/{id}/assign-project`.
#[derive(Debug, Deserialize)]
pub struct AssignProjectRequest {
    pub project_id: DbId,
    pub estimated_hours: Option<f64>,
}

/// Body for `POST /admin/designers/{id}/reassign-project`.
#[derive(Debug, Deserialize)]
pub struct ReassignProjectRequest {
    pub project_id: DbId,
    pub to_designer_id: DbId,
    pub reason: Option<String>,
}

/// One row of the workload dashboard.
#[derive(Debug, Serialize)]
pub struct WorkloadEntry {
    pub id: DbId,
    pub display_name: String,
    pub status: String,
    pub current_load: i32,
    pub max_capacity: i32,
    /// Load as a percentage of capacity, rounded.
    pub utilization: i32,
    /// `current_load * average_completion_hours`; `None` until the
    /// designer has completed a project with recorded hours.
    pub estimated_backlog_hours: Option<f64>,
}

impl From<&Designer> for WorkloadEntry {
    fn from(d: &Designer) -> Self {
        WorkloadEntry {
            id: d.id,
            display_name: d.display_name.clone(),
            status: d.status.clone(),
            current_load: d.current_load,
            max_capacity: d.max_capacity,
            utilization: workload::utilization(d.current_load, d.max_capacity),
            estimated_backlog_hours: d
                .average_completion_hours
                .map(|avg| d.current_load as f64 * avg),
        }
    }
}

// ---------------------------------------------------------------------------
// Designer CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/designers
///
/// Onboard a new designer profile.
pub async fn create_designer(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateDesigner>,
) -> AppResult<impl IntoResponse> {
    if input.display_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "display_name must not be empty".into(),
        )));
    }
    validate_capacity(input.max_capacity)?;

    let designer = DesignerRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(designer))))
}

/// GET /api/v1/admin/designers
///
/// List all designers, heaviest load first.
pub async fn list_designers(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let designers = DesignerRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(designers)))
}

/// GET /api/v1/admin/designers/workload
///
/// Per-designer load, capacity, utilization, and estimated backlog hours.
pub async fn workload_dashboard(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let designers = DesignerRepo::list(&state.pool).await?;
    let entries: Vec<WorkloadEntry> = designers.iter().map(WorkloadEntry::from).collect();
    Ok(Json(DataResponse::new(entries)))
}

/// GET /api/v1/admin/designers/{id}
pub async fn get_designer(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(designer_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let designer = DesignerRepo::find_by_id(&state.pool, designer_id)
        .await?
        .ok_or_else(|| AppError::not_found("Designer", designer_id))?;
    Ok(Json(DataResponse::new(designer)))
}

/// PUT /api/v1/admin/designers/{id}
///
/// Update a designer's availability envelope (name, capacity, status,
/// leave window). Only fields present in the body are applied.
pub async fn update_designer(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(designer_id): Path<DbId>,
    Json(input): Json<UpdateDesigner>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &input.status {
        workload::validate_designer_status(status)?;
    }
    validate_capacity(input.max_capacity)?;
    if let (Some(from), Some(to)) = (input.leave_from, input.leave_to) {
        if from > to {
            return Err(AppError::Core(CoreError::Validation(
                "leave_from must not be after leave_to".into(),
            )));
        }
    }

    let designer = DesignerRepo::update(&state.pool, designer_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Designer", designer_id))?;
    Ok(Json(DataResponse::new(designer)))
}

// ---------------------------------------------------------------------------
// Assignment operations
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/designers/{id}/assign-project
///
/// Assign a pending project to this designer, subject to capacity and
/// availability.
pub async fn assign_project(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(designer_id): Path<DbId>,
    Json(input): Json<AssignProjectRequest>,
) -> AppResult<impl IntoResponse> {
    if let Some(hours) = input.estimated_hours {
        if hours < 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "estimated_hours must not be negative".into(),
            )));
        }
    }
    let project = services::assignment::assign(
        &state,
        &admin,
        designer_id,
        input.project_id,
        input.estimated_hours,
    )
    .await?;
    Ok(Json(DataResponse::new(project)))
}

/// POST /api/v1/admin/designers/{id}/reassign-project
///
/// Move a project from this designer to another. The path id is the
/// current holder; the target comes from the body.
pub async fn reassign_project(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(designer_id): Path<DbId>,
    Json(input): Json<ReassignProjectRequest>,
) -> AppResult<impl IntoResponse> {
    let project = services::assignment::reassign(
        &state,
        &admin,
        designer_id,
        input.to_designer_id,
        input.project_id,
        input.reason.as_deref(),
    )
    .await?;
    Ok(Json(DataResponse::new(project)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_capacity(max_capacity: Option<i32>) -> AppResult<()> {
    if let Some(capacity) = max_capacity {
        if capacity < 1 {
            return Err(AppError::Core(CoreError::Validation(
                "max_capacity must be at least 1".into(),
            )));
        }
    }
    Ok(())
}
