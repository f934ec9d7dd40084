//! Subscription-credit gating of project intake.
//!
//! Intake is a saga, not a single transaction: check credits, create the
//! project, then re-validate under a subscription row lock and delete the
//! project if the ledger no longer admits it. Usage is derived from
//! project rows rather than stored, so the creation itself is the
//! deduction; the locked re-check closes the window between the optimistic
//! pre-check and the insert.

use atelier_core::credits::{self, CreditCheck};
use atelier_core::error::{CoreError, CODE_INSUFFICIENT_CREDITS, CODE_NO_ACTIVE_SUBSCRIPTION};
use atelier_core::types::{DbId, Timestamp};
use atelier_core::workflow;
use atelier_db::models::project::{CreateProject, Project};
use atelier_db::models::subscription::Subscription;
use atelier_db::repositories::{ProjectRepo, SubscriptionRepo};
use chrono::Utc;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Credit usage for the client's current billing period.
#[derive(Debug, Serialize)]
pub struct UsageReport {
    pub plan_name: String,
    /// Plan quota. 0 means unlimited.
    pub quota: i32,
    pub used: i64,
    /// `None` for unlimited plans.
    pub remaining: Option<i64>,
    pub period_start: Timestamp,
}

/// Report the client's credit usage for the current period.
pub async fn usage(state: &AppState, client: &AuthUser) -> AppResult<UsageReport> {
    let now = Utc::now();
    let subscription = require_subscription(state, client.user_id, now).await?;
    let period_start = credits::period_start(subscription.start_date, now);
    let used = ProjectRepo::count_created_since(&state.pool, client.user_id, period_start).await?;
    let remaining = if subscription.max_projects == credits::QUOTA_UNLIMITED {
        None
    } else {
        Some((subscription.max_projects as i64 - used).max(0))
    };
    Ok(UsageReport {
        plan_name: subscription.plan_name,
        quota: subscription.max_projects,
        used,
        remaining,
        period_start,
    })
}

/// Admit a new project for the client, gated by subscription credits.
///
/// Steps: optimistic credit check, insert the project in `PENDING`, then
/// re-validate under the subscription row lock. If the re-check fails
/// (another intake won the race), the just-created project is hard
/// deleted as the compensating action and the caller sees the same
/// insufficient-credits rejection the pre-check would have given.
pub async fn admit_project(
    state: &AppState,
    client: &AuthUser,
    input: &CreateProject,
) -> AppResult<Project> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project name must not be empty".into(),
        )));
    }
    if let Some(priority) = &input.priority {
        workflow::validate_priority(priority)?;
    }

    let now = Utc::now();
    let subscription = require_subscription(state, client.user_id, now).await?;

    let check = check_credits(state, client.user_id, &subscription, now).await?;
    if !check.available {
        return Err(insufficient(check));
    }

    let project = ProjectRepo::create(&state.pool, client.user_id, input).await?;

    match deduct_credits(state, client.user_id, subscription.id, now).await {
        Ok(()) => Ok(project),
        Err(deduct_err) => {
            // Compensating action: the project must not survive a failed
            // deduction.
            match ProjectRepo::hard_delete(&state.pool, project.id).await {
                Ok(_) => Err(deduct_err),
                Err(delete_err) => {
                    tracing::error!(
                        project_id = project.id,
                        deduct_error = %deduct_err,
                        delete_error = %delete_err,
                        "credit deduction and compensating delete both failed"
                    );
                    Err(AppError::InternalError(format!(
                        "Credit deduction failed and the project could not be removed: {deduct_err}"
                    )))
                }
            }
        }
    }
}

/// Find the client's usable subscription or reject with the machine code.
async fn require_subscription(
    state: &AppState,
    client_id: DbId,
    now: Timestamp,
) -> AppResult<Subscription> {
    SubscriptionRepo::find_active_for_client(&state.pool, client_id, now)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::business_rule(
                CODE_NO_ACTIVE_SUBSCRIPTION,
                "No active subscription. An active or trialing subscription is required to create projects",
            ))
        })
}

/// Optimistic pre-check against the current period's usage.
async fn check_credits(
    state: &AppState,
    client_id: DbId,
    subscription: &Subscription,
    now: Timestamp,
) -> AppResult<CreditCheck> {
    let period_start = credits::period_start(subscription.start_date, now);
    let used = ProjectRepo::count_created_since(&state.pool, client_id, period_start).await?;
    Ok(credits::evaluate(subscription.max_projects, used, 1))
}

/// Re-validate the intake under the subscription row lock.
///
/// The count here includes the project created just before, so the
/// request is checked as `used - 1` plus one more. Two concurrent intakes
/// racing for the last credit serialize on the lock and exactly one of
/// them fails here.
async fn deduct_credits(
    state: &AppState,
    client_id: DbId,
    subscription_id: DbId,
    now: Timestamp,
) -> AppResult<()> {
    let mut tx = state.pool.begin().await?;

    let subscription = SubscriptionRepo::find_by_id_for_update(&mut tx, subscription_id)
        .await?
        .ok_or_else(|| AppError::not_found("Subscription", subscription_id))?;
    if !credits::is_subscription_usable(&subscription.status, subscription.end_date, now) {
        return Err(AppError::Core(CoreError::business_rule(
            CODE_NO_ACTIVE_SUBSCRIPTION,
            "Subscription is no longer active",
        )));
    }

    let period_start = credits::period_start(subscription.start_date, now);
    let used = ProjectRepo::count_created_since(&mut *tx, client_id, period_start).await?;
    let check = credits::evaluate(subscription.max_projects, used.saturating_sub(1), 1);
    if !check.available {
        return Err(insufficient(check));
    }

    tx.commit().await?;
    Ok(())
}

fn insufficient(check: CreditCheck) -> AppError {
    AppError::Core(CoreError::business_rule(
        CODE_INSUFFICIENT_CREDITS,
        check
            .message
            .unwrap_or_else(|| "Insufficient credits for this period".to_string()),
    ))
}
