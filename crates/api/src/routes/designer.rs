//! Route definitions for the designer-facing dashboard.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/designer`.
///
/// ```text
/// GET    /projects                -> list_assigned_projects
/// POST   /projects/{id}/start     -> start_work
/// POST   /projects/{id}/deliver   -> deliver_project
/// PATCH  /projects/{id}/progress  -> update_progress
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(project::list_assigned_projects))
        .route("/projects/{id}/start", post(project::start_work))
        .route("/projects/{id}/deliver", post(project::deliver_project))
        .route("/projects/{id}/progress", patch(project::update_progress))
}
