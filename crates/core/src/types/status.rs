//! Withdrawal request status.
//!
//! A request starts out `pending` and moves exactly once, to either
//! `approved` or `rejected`. The remote service is the authority on the
//! current value; the helpers here only decide what the console offers.

use serde::{Deserialize, Serialize};

/// Status of a withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    /// Awaiting an operator decision.
    #[default]
    Pending,
    /// Paid out.
    Approved,
    /// Declined by an operator.
    Rejected,
}

impl WithdrawalStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    /// Whether the request still awaits a decision.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether a request in this status may be moved to `target`.
    ///
    /// Only `pending -> approved` and `pending -> rejected` are allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Approved | Self::Rejected)
        )
    }

    /// Wire value used by the withdrawals endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Human-readable badge label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WithdrawalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("invalid withdrawal status: {s}")),
        }
    }
}

/// Filter accepted by the withdrawals list endpoint (`?status=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Every request regardless of status.
    #[default]
    All,
    /// Only requests in one status.
    Only(WithdrawalStatus),
}

impl StatusFilter {
    /// Query-string value for the filter.
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}
