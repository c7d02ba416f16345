//! Request and response bodies of the remote endpoints.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use payflow_core::{AdminProfile, WithdrawalId, WithdrawalRequest, WithdrawalStatus};
use serde::{Deserialize, Serialize};

/// `POST {auth}` body.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// `POST {auth}` success body.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
    pub user: AdminProfile,
}

/// `GET {auth}` success body.
#[derive(Debug, Deserialize)]
pub(crate) struct VerifyResponse {
    #[serde(default)]
    pub valid: bool,
    pub user: AdminProfile,
}

/// `GET {withdrawals}` success body.
#[derive(Debug, Deserialize)]
pub(crate) struct WithdrawalsResponse {
    pub withdrawals: Vec<WithdrawalRequest>,
}

/// `PUT {withdrawals}` success body.
#[derive(Debug, Deserialize)]
pub(crate) struct UpdateStatusResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of any non-success response.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

/// A decision on a withdrawal request, sent as `PUT {withdrawals}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub id: WithdrawalId,
    pub status: WithdrawalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StatusUpdate {
    /// Decision without operator notes.
    #[must_use]
    pub const fn new(id: WithdrawalId, status: WithdrawalStatus) -> Self {
        Self {
            id,
            status,
            notes: None,
        }
    }

    /// Attach operator notes; blank notes are dropped.
    #[must_use]
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.filter(|n| !n.trim().is_empty());
        self
    }
}

/// A downloaded analytics spreadsheet.
#[derive(Clone, PartialEq, Eq)]
pub struct ExcelReport {
    /// `analytics_YYYYMMDD.xlsx`, dated on the client.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ExcelReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExcelReport")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ExcelReport {
    /// Report named for `date`.
    #[must_use]
    pub fn dated(date: NaiveDate, bytes: Vec<u8>) -> Self {
        Self {
            file_name: report_file_name(date),
            bytes,
        }
    }

    /// Write the report into `dir`, replacing any report of the same day.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub async fn save_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

/// File name for a report exported on `date`.
#[must_use]
pub fn report_file_name(date: NaiveDate) -> String {
    format!("analytics_{}.xlsx", date.format("%Y%m%d"))
}
