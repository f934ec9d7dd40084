//! Repository for the `subscriptions` and `subscription_plans` tables.
//!
//! Subscriptions are read-only input to the credit ledger; nothing here
//! mutates them.

use atelier_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::subscription::{Subscription, SubscriptionPlan};

/// Column list for subscription-with-plan queries.
const COLUMNS: &str = "\
    s.id, s.client_id, s.plan_id, s.status, s.start_date, s.end_date, \
    p.name AS plan_name, p.max_projects";

/// Provides read operations for subscriptions and plans.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Find the client's most recent usable subscription at `now`
    /// (`active` or `trialing`, unexpired), joined with its plan quota.
    pub async fn find_active_for_client<'e>(
        executor: impl PgExecutor<'e>,
        client_id: DbId,
        now: Timestamp,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}
             FROM subscriptions s
             JOIN subscription_plans p ON p.id = s.plan_id
             WHERE s.client_id = $1
               AND s.status IN ('active', 'trialing')
               AND s.end_date >= $2
             ORDER BY s.created_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(client_id)
            .bind(now)
            .fetch_optional(executor)
            .await
    }

    /// Find a subscription by ID, joined with its plan quota.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}
             FROM subscriptions s
             JOIN subscription_plans p ON p.id = s.plan_id
             WHERE s.id = $1"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a subscription by ID and lock its row for the transaction.
    ///
    /// Used by credit deduction so two concurrent deductions against the
    /// same subscription serialize their usage counts.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}
             FROM subscriptions s
             JOIN subscription_plans p ON p.id = s.plan_id
             WHERE s.id = $1
             FOR UPDATE OF s"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List all plans (pricing page / admin seed inspection).
    pub async fn list_plans(pool: &PgPool) -> Result<Vec<SubscriptionPlan>, sqlx::Error> {
        sqlx::query_as::<_, SubscriptionPlan>(
            "SELECT id, name, max_projects, price_cents, created_at, updated_at
             FROM subscription_plans
             ORDER BY price_cents ASC",
        )
        .fetch_all(pool)
        .await
    }
}
