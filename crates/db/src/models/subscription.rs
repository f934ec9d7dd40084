//! Subscription and plan models.
//!
//! These are read-only inputs to the credit ledger; the core never
//! processes payments or mutates subscription state.

use atelier_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A plan row from the `subscription_plans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubscriptionPlan {
    pub id: DbId,
    pub name: String,
    /// 0 means unlimited projects per period.
    pub max_projects: i32,
    pub price_cents: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A subscription joined with its plan quota, as the credit ledger
/// consumes it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub client_id: DbId,
    pub plan_id: DbId,
    pub status: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub plan_name: String,
    /// 0 means unlimited projects per period.
    pub max_projects: i32,
}
