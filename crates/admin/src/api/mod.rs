//! Client for the PayFlow remote services.
//!
//! Three endpoints sit behind this module:
//!
//! | Endpoint | Calls |
//! |---|---|
//! | auth | `POST` login, `GET` token check |
//! | withdrawals | `GET` list (optionally `?status=`), `PUT {id, status}` |
//! | analytics | `GET` snapshot, `GET ?format=excel` report |
//!
//! Authenticated calls send the session token in the `X-Auth-Token` header.
//! A session without a token fails with [`ClientError::MissingToken`] before
//! anything is sent. Nothing is retried.
//!
//! View-models talk to the [`AdminApi`] trait so they can be driven by a
//! fake in tests; [`PayflowClient`] is the HTTP implementation.

mod client;
mod types;

use std::future::Future;

use payflow_core::{AdminProfile, AnalyticsSnapshot, StatusFilter, WithdrawalRequest};
use secrecy::SecretString;

pub use client::{AUTH_HEADER, PayflowClient};
pub use types::{ExcelReport, StatusUpdate, report_file_name};

use crate::error::ClientError;
use crate::session::Session;

/// Operations the console needs from the remote services.
pub trait AdminApi: Send + Sync {
    /// Exchange credentials for a session. Unauthenticated.
    fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<Session, ClientError>> + Send;

    /// Check that the session token is still accepted.
    fn verify_session(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<AdminProfile, ClientError>> + Send;

    /// Fetch the full withdrawal list.
    fn fetch_withdrawals(
        &self,
        session: &Session,
        filter: StatusFilter,
    ) -> impl Future<Output = Result<Vec<WithdrawalRequest>, ClientError>> + Send;

    /// Record a decision on a withdrawal request.
    fn update_withdrawal_status(
        &self,
        session: &Session,
        update: &StatusUpdate,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Fetch the analytics snapshot.
    fn fetch_analytics(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<AnalyticsSnapshot, ClientError>> + Send;

    /// Download the analytics spreadsheet.
    fn export_analytics_excel(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<ExcelReport, ClientError>> + Send;
}
