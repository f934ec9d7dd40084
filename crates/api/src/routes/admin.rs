//! Route definitions for admin operations: designer management, the
//! workload dashboard, the intake queue, and workflow transitions.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::{designer, project};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST   /designers                        -> create_designer
/// GET    /designers                        -> list_designers
/// GET    /designers/workload               -> workload_dashboard
/// GET    /designers/{id}                   -> get_designer
/// PUT    /designers/{id}                   -> update_designer
/// POST   /designers/{id}/assign-project    -> assign_project
/// POST   /designers/{id}/reassign-project  -> reassign_project
///
/// GET    /projects/pending                 -> list_pending
/// PATCH  /projects/{id}/status             -> set_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/designers",
            post(designer::create_designer).get(designer::list_designers),
        )
        .route("/designers/workload", get(designer::workload_dashboard))
        .route(
            "/designers/{id}",
            get(designer::get_designer).put(designer::update_designer),
        )
        .route(
            "/designers/{id}/assign-project",
            post(designer::assign_project),
        )
        .route(
            "/designers/{id}/reassign-project",
            post(designer::reassign_project),
        )
        .route("/projects/pending", get(project::list_pending))
        .route("/projects/{id}/status", patch(project::set_status))
}
