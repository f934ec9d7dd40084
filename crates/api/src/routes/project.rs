//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// POST   /                  -> create_project (client)
/// GET    /                  -> list_my_projects (client)
/// GET    /{id}              -> get_project
/// POST   /{id}/approve      -> approve_project (client)
/// GET    /{id}/assignments  -> list_assignments (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(project::create_project).get(project::list_my_projects))
        .route("/{id}", get(project::get_project))
        .route("/{id}/approve", post(project::approve_project))
        .route("/{id}/assignments", get(project::list_assignments))
}
