//! Domain types for the PayFlow admin console.
//!
//! These mirror the JSON contracts of the remote services.

pub mod analytics;
pub mod id;
pub mod money;
pub mod profile;
pub mod status;
pub mod wire;
pub mod withdrawal;

pub use analytics::{AnalyticsSnapshot, MethodBreakdown, MonthlyVolume, TopUser, WithdrawalStats};
pub use id::*;
pub use money::{CURRENCY_SIGN, format_rub, format_rub_compact};
pub use profile::AdminProfile;
pub use status::{StatusFilter, WithdrawalStatus};
pub use withdrawal::WithdrawalRequest;
