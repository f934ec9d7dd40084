//! Route definitions for the `/subscriptions` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::subscription;
use crate::state::AppState;

/// Routes mounted at `/subscriptions`.
///
/// ```text
/// GET    /usage  -> usage (client)
/// GET    /plans  -> list_plans
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/usage", get(subscription::usage))
        .route("/plans", get(subscription::list_plans))
}
