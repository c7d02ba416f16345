//! Analytics tab: the server-computed snapshot plus the Excel export.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use payflow_core::AnalyticsSnapshot;
use tracing::{info, instrument, warn};

use super::snapshot::Snapshot;
use crate::api::AdminApi;
use crate::error::ClientError;
use crate::session::Session;

/// Whether an export is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Exporting,
}

/// Result of an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The report was written to this path.
    Saved(PathBuf),
    /// Another export was already running; nothing was sent.
    AlreadyRunning,
}

/// Allows one export at a time.
#[derive(Debug, Default)]
pub struct ExportControl {
    running: AtomicBool,
}

impl ExportControl {
    #[must_use]
    pub fn state(&self) -> ExportState {
        if self.running.load(Ordering::Acquire) {
            ExportState::Exporting
        } else {
            ExportState::Idle
        }
    }

    fn try_begin(&self) -> Option<ExportGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportGuard(&self.running))
    }
}

/// Clears the running flag when the export ends, however it ends.
struct ExportGuard<'a>(&'a AtomicBool);

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// State behind the analytics tab.
#[derive(Debug, Default)]
pub struct AnalyticsModel {
    snapshot: Snapshot<AnalyticsSnapshot>,
    export: ExportControl,
}

impl AnalyticsModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the snapshot and replace the current one with it.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous snapshot stays in place.
    #[instrument(skip_all)]
    pub async fn reload<A: AdminApi>(
        &mut self,
        api: &A,
        session: &Session,
    ) -> Result<(), ClientError> {
        self.snapshot.begin();
        let outcome = api.fetch_analytics(session).await;
        if let Err(e) = &outcome {
            warn!(error = %e, "Failed to load analytics");
        }
        self.snapshot.finish(outcome)
    }

    /// Download the spreadsheet and save it under `dir`.
    ///
    /// While one export runs, further calls return
    /// [`ExportOutcome::AlreadyRunning`] without contacting the service.
    ///
    /// # Errors
    ///
    /// Returns error if the download fails or the file cannot be written.
    #[instrument(skip(self, api, session))]
    pub async fn export<A: AdminApi>(
        &self,
        api: &A,
        session: &Session,
        dir: &Path,
    ) -> Result<ExportOutcome, ClientError> {
        let Some(_guard) = self.export.try_begin() else {
            info!("Export already running");
            return Ok(ExportOutcome::AlreadyRunning);
        };

        let report = api.export_analytics_excel(session).await?;
        let path = report.save_to(dir).await?;
        info!(path = %path.display(), bytes = report.bytes.len(), "Analytics report saved");
        Ok(ExportOutcome::Saved(path))
    }

    #[must_use]
    pub fn export_state(&self) -> ExportState {
        self.export.state()
    }

    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot<AnalyticsSnapshot> {
        &self.snapshot
    }

    /// The current analytics, if any have loaded.
    #[must_use]
    pub const fn data(&self) -> Option<&AnalyticsSnapshot> {
        self.snapshot.data()
    }
}
