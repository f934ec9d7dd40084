//! Subscription credit accounting.
//!
//! A subscription's quota is the number of projects its plan allows per
//! billing period. Usage is derived, not stored: it is the count of
//! projects the client created since the period anchor. The anchor is the
//! later of the subscription start date and the first day of the current
//! calendar month, so upgrades and renewals never retroactively count
//! stale usage.

use chrono::{Datelike, TimeZone, Utc};

use crate::types::Timestamp;

/// Subscription status: paid and current.
pub const SUBSCRIPTION_STATUS_ACTIVE: &str = "active";

/// Subscription status: in a trial period, treated as active for gating.
pub const SUBSCRIPTION_STATUS_TRIALING: &str = "trialing";

/// Plan quota value meaning "unlimited projects".
pub const QUOTA_UNLIMITED: i32 = 0;

/// Result of a credit availability check.
#[derive(Debug, Clone)]
pub struct CreditCheck {
    pub available: bool,
    /// Remaining credits in the current period. `None` for unlimited plans.
    pub remaining: Option<i64>,
    pub message: Option<String>,
}

/// Whether a subscription admits new work at `now`.
pub fn is_subscription_usable(status: &str, end_date: Timestamp, now: Timestamp) -> bool {
    (status == SUBSCRIPTION_STATUS_ACTIVE || status == SUBSCRIPTION_STATUS_TRIALING)
        && end_date >= now
}

/// The usage-counting anchor for the current billing period: the later of
/// the subscription start date and the first day of the current month.
pub fn period_start(subscription_start: Timestamp, now: Timestamp) -> Timestamp {
    let month_start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now);
    subscription_start.max(month_start)
}

/// Evaluate whether `requested` more credits fit within `quota` given
/// `used` credits already consumed this period.
pub fn evaluate(quota: i32, used: i64, requested: i64) -> CreditCheck {
    if quota == QUOTA_UNLIMITED {
        return CreditCheck {
            available: true,
            remaining: None,
            message: None,
        };
    }
    let remaining = (quota as i64 - used).max(0);
    if remaining >= requested {
        CreditCheck {
            available: true,
            remaining: Some(remaining),
            message: None,
        }
    } else {
        CreditCheck {
            available: false,
            remaining: Some(remaining),
            message: Some(format!(
                "Insufficient credits: {remaining} remaining this period, {requested} requested"
            )),
        }
    }
}
