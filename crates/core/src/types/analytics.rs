//! Analytics snapshot served by the analytics endpoint.
//!
//! Every field is computed server-side on each request. The console renders
//! it as-is and never patches it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire::null_as_default;

/// Aggregate figures over all withdrawal requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_withdrawals: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pending_count: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub approved_count: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rejected_count: i64,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub total_amount: Decimal,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub approved_amount: Decimal,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub avg_amount: Decimal,
}

impl WithdrawalStats {
    /// Share of requests that were approved, in percent.
    ///
    /// `None` when there are no requests at all.
    #[must_use]
    pub fn approval_rate(&self) -> Option<Decimal> {
        percent_of(self.approved_count, self.total_withdrawals)
    }
}

/// Request count and volume for one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyVolume {
    pub month: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: i64,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub total: Decimal,
}

/// Request count and volume for one payment channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodBreakdown {
    pub method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: i64,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub total: Decimal,
}

/// A user ranked by withdrawal volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUser {
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub withdrawal_count: i64,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub total_amount: Decimal,
}

/// Everything the analytics tab shows, fetched in one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub stats: WithdrawalStats,
    /// Most recent month first, as the service orders it.
    #[serde(default)]
    pub monthly: Vec<MonthlyVolume>,
    #[serde(default)]
    pub by_method: Vec<MethodBreakdown>,
    /// Ranked by total amount, largest first.
    #[serde(default)]
    pub top_users: Vec<TopUser>,
}

impl AnalyticsSnapshot {
    /// Whether there is any per-method data worth charting.
    #[must_use]
    pub fn has_method_breakdown(&self) -> bool {
        !self.by_method.is_empty()
    }

    /// Share of all requests that went through `method`, in percent.
    #[must_use]
    pub fn method_share(&self, method: &MethodBreakdown) -> Option<Decimal> {
        let total: i64 = self.by_method.iter().map(|m| m.count).sum();
        percent_of(method.count, total)
    }

    /// The month with the largest withdrawal volume.
    #[must_use]
    pub fn peak_month(&self) -> Option<&MonthlyVolume> {
        self.monthly.iter().max_by(|a, b| a.total.cmp(&b.total))
    }
}

fn percent_of(part: i64, whole: i64) -> Option<Decimal> {
    if whole <= 0 {
        return None;
    }
    let rate = Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole);
    Some(rate.round_dp(1))
}
