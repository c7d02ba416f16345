//! Unified error handling for the console.
//!
//! Every remote call resolves to a [`ClientError`]. The variants follow how
//! the console reacts: auth problems send the operator back to login, network
//! and server problems become a notification while the screen keeps showing
//! what it already had.

use payflow_core::{WithdrawalId, WithdrawalStatus};
use thiserror::Error;

use crate::session::SessionStoreError;

/// Generic message shown when the login endpoint gives no reason.
pub const GENERIC_AUTH_FAILURE: &str = "Invalid credentials";

/// Generic message shown when a failing endpoint gives no reason.
pub const GENERIC_SERVER_FAILURE: &str = "The service could not complete the request";

/// Errors returned by the API client and session handling.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Bad credentials, or a missing, expired or invalid token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// No session token was available, so no request was sent.
    #[error("Not signed in")]
    MissingToken,

    /// The request never reached the service.
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message from the `error` field, or a generic one.
        message: String,
    },

    /// The service answered, but the body was not what we expected.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Input rejected before any request was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Reading or writing local state failed.
    #[error("Local storage error: {0}")]
    Storage(#[from] SessionStoreError),

    /// Writing an exported report failed.
    #[error("Could not save report: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Whether the operator has to sign in again.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::MissingToken)
    }

    /// Whether the failure is worth reporting to error tracking.
    ///
    /// Operator mistakes and expired sessions are not.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        matches!(
            self,
            Self::Server { .. } | Self::Decode(_) | Self::Storage(_) | Self::Io(_)
        )
    }

    /// Short message suitable for a notification body.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(message) | Self::Server { message, .. } => message.clone(),
            Self::MissingToken => "Please sign in first".to_string(),
            Self::Network(_) => "Could not connect to the server".to_string(),
            Self::Decode(_) => GENERIC_SERVER_FAILURE.to_string(),
            Self::InvalidInput(message) => message.clone(),
            Self::Storage(e) => e.to_string(),
            Self::Io(e) => e.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Errors from the approval workflow that never reach the network.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The request is not in the loaded list.
    #[error("Withdrawal {0} is not in the current list")]
    UnknownWithdrawal(WithdrawalId),

    /// The request already left `pending`.
    #[error("Withdrawal {id} is {status}; only pending requests can be decided")]
    NotPending {
        id: WithdrawalId,
        status: WithdrawalStatus,
    },

    /// The target status is not a decision.
    #[error("Cannot move a withdrawal to {0}")]
    InvalidTarget(WithdrawalStatus),
}
