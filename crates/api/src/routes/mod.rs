pub mod admin;
pub mod designer;
pub mod health;
pub mod notification;
pub mod project;
pub mod subscription;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                 create (client), list own (client)
/// /projects/{id}                            detail (admin / owner / assignee)
/// /projects/{id}/approve                    accept delivery (owner)
/// /projects/{id}/assignments                assignment history (admin)
///
/// /designer/projects                        assigned projects (designer)
/// /designer/projects/{id}/start             ASSIGNED -> IN_PROGRESS (assignee)
/// /designer/projects/{id}/deliver           hand over for review (assignee)
/// /designer/projects/{id}/progress          record progress (assignee)
///
/// /admin/designers                          onboard, list (admin)
/// /admin/designers/workload                 workload dashboard (admin)
/// /admin/designers/{id}                     detail, update (admin)
/// /admin/designers/{id}/assign-project      assign pending project (admin)
/// /admin/designers/{id}/reassign-project    move project to another designer (admin)
/// /admin/projects/pending                   intake queue (admin)
/// /admin/projects/{id}/status               generic workflow transition (admin)
///
/// /subscriptions/usage                      credit usage this period (client)
/// /subscriptions/plans                      plan catalogue (any authenticated)
///
/// /notifications                            list own
/// /notifications/read-all                   mark all read
/// /notifications/{id}/read                  mark one read
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/designer", designer::router())
        .nest("/admin", admin::router())
        .nest("/subscriptions", subscription::router())
        .nest("/notifications", notification::router())
}
