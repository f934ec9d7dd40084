//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use atelier_core::types::DbId;
use atelier_db::repositories::NotificationRepo;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/notifications
///
/// List the authenticated user's notifications, most recent first.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let notifications = NotificationRepo::list_by_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(notifications)))
}

/// POST /api/v1/notifications/{id}/read
///
/// Mark a single notification as read. Returns 404 if the notification
/// does not exist, is already read, or belongs to someone else.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let notification = NotificationRepo::mark_read(&state.pool, notification_id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Notification", notification_id))?;
    Ok(Json(DataResponse::new(notification)))
}

/// POST /api/v1/notifications/read-all
///
/// Mark all of the authenticated user's notifications as read, returning
/// the number that were marked.
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let count = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    Ok(Json(serde_json::json!({
        "data": { "marked_read": count }
    })))
}
