//! Fire-and-forget notification dispatch.
//!
//! Notifications are a side effect of workflow events, never part of the
//! transaction that produced them: a failed insert is logged and dropped
//! so it cannot roll back an assignment or a delivery.

use atelier_core::types::DbId;
use atelier_db::models::notification::CreateNotification;
use atelier_db::repositories::NotificationRepo;
use atelier_db::DbPool;

/// Notification kind for assignment events.
pub const KIND_PROJECT_ASSIGNED: &str = "project_assigned";

/// Notification kind for reassignment events.
pub const KIND_PROJECT_REASSIGNED: &str = "project_reassigned";

/// Notification kind for delivery events.
pub const KIND_PROJECT_DELIVERED: &str = "project_delivered";

/// Notification kind for approval events.
pub const KIND_PROJECT_COMPLETED: &str = "project_completed";

/// Notification kind for cancellation events.
pub const KIND_PROJECT_CANCELLED: &str = "project_cancelled";

/// Dispatches notifications on a background task after the triggering
/// transaction has committed.
pub struct Notifier {
    pool: DbPool,
}

impl Notifier {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Queue a notification for `user_id`. Returns immediately; the insert
    /// runs on a spawned task and failures are only logged.
    pub fn notify(&self, user_id: DbId, kind: &str, title: &str, body: &str) {
        let pool = self.pool.clone();
        let input = CreateNotification {
            user_id,
            kind: kind.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        };
        tokio::spawn(async move {
            if let Err(err) = NotificationRepo::create(&pool, &input).await {
                tracing::error!(
                    user_id = input.user_id,
                    kind = %input.kind,
                    error = %err,
                    "failed to persist notification"
                );
            }
        });
    }
}
