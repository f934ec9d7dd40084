//! Handlers for the `/subscriptions` resource.

use atelier_db::repositories::SubscriptionRepo;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::{AuthUser, RequireClient};
use crate::response::DataResponse;
use crate::services;
use crate::state::AppState;

/// GET /api/v1/subscriptions/usage
///
/// Credit usage for the authenticated client's current billing period.
pub async fn usage(
    RequireClient(client): RequireClient,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let report = services::credits::usage(&state, &client).await?;
    Ok(Json(DataResponse::new(report)))
}

/// GET /api/v1/subscriptions/plans
///
/// List all subscription plans, cheapest first.
pub async fn list_plans(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let plans = SubscriptionRepo::list_plans(&state.pool).await?;
    Ok(Json(DataResponse::new(plans)))
}
