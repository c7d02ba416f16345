//! Withdrawal request as served by the withdrawals endpoint.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::WithdrawalId;
use super::status::WithdrawalStatus;
use super::wire::null_as_default;

/// A user-initiated request to move funds out of the platform.
///
/// The remote service owns this record. The console only ever holds a copy
/// taken from the latest list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub id: WithdrawalId,
    /// Display name of the requesting user.
    pub user: String,
    pub email: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub status: WithdrawalStatus,
    /// Payment channel label (card, e-wallet, ...).
    pub method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_details: String,
    /// Creation date.
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When an operator decided the request (`YYYY-MM-DD HH:MM`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<String>,
}

impl WithdrawalRequest {
    /// Whether approve/reject controls may be offered for this request.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        self.status.is_pending()
    }

    /// Operator notes, if any were written.
    ///
    /// The service stores an empty string when a decision carried no notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.trim().is_empty())
    }
}
