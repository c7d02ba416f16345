//! Navigation and the admin screen.
//!
//! [`AdminScreen::mount`] is the only way into the admin tabs. It reads the
//! stored session first and sends the operator to login, without touching
//! the network, when there is none.

use std::path::Path;

use payflow_core::WithdrawalId;
use tracing::{info, instrument, warn};

use crate::api::AdminApi;
use crate::error::{ClientError, WorkflowError};
use crate::notify::{Notice, Notifications};
use crate::session::{Session, SessionStore, SessionStoreError};
use crate::viewmodel::{AnalyticsModel, ExportOutcome, TransitionReport, WithdrawalListModel};

/// Tabs of the admin screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    #[default]
    Dashboard,
    Withdrawals,
    Analytics,
    Builder,
}

impl AdminTab {
    pub const ALL: [Self; 4] = [
        Self::Dashboard,
        Self::Withdrawals,
        Self::Analytics,
        Self::Builder,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Withdrawals => "withdrawals",
            Self::Analytics => "analytics",
            Self::Builder => "builder",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Withdrawals => "Withdrawal requests",
            Self::Analytics => "Analytics",
            Self::Builder => "Page builder",
        }
    }
}

impl std::str::FromStr for AdminTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str() == s)
            .ok_or_else(|| format!("invalid tab: {s}"))
    }
}

/// Screen the console should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Admin(AdminTab),
}

/// Result of entering the admin screen.
#[derive(Debug)]
pub enum Mount<'a, A, S> {
    Admin(Box<AdminScreen<'a, A, S>>),
    /// No usable session; show this route instead.
    Redirect(Route),
}

/// Outcome of the concurrent fetch of both view-models.
#[derive(Debug)]
pub struct RefreshReport {
    pub withdrawals: Result<(), ClientError>,
    pub analytics: Result<(), ClientError>,
}

impl RefreshReport {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.withdrawals.is_ok() && self.analytics.is_ok()
    }

    fn errors(&self) -> impl Iterator<Item = &ClientError> {
        self.withdrawals
            .as_ref()
            .err()
            .into_iter()
            .chain(self.analytics.as_ref().err())
    }
}

/// The admin screen: session, both view-models and queued notices.
#[derive(Debug)]
pub struct AdminScreen<'a, A, S> {
    api: &'a A,
    store: &'a S,
    session: Session,
    tab: AdminTab,
    withdrawals: WithdrawalListModel,
    analytics: AnalyticsModel,
    notices: Notifications,
    session_expired: bool,
}

impl<'a, A: AdminApi, S: SessionStore> AdminScreen<'a, A, S> {
    /// Enter the admin screen on `tab`.
    ///
    /// Redirects to login when no session is stored or the stored one cannot
    /// be read. No request is made either way; call [`Self::refresh`] to
    /// load data.
    pub fn mount(api: &'a A, store: &'a S, tab: AdminTab) -> Mount<'a, A, S> {
        let session = match store.load() {
            Ok(Some(session)) => session,
            Ok(None) => {
                info!("No session stored, redirecting to login");
                return Mount::Redirect(Route::Login);
            }
            Err(e) => {
                warn!(error = %e, "Stored session unreadable, redirecting to login");
                return Mount::Redirect(Route::Login);
            }
        };

        Mount::Admin(Box::new(Self {
            api,
            store,
            session,
            tab,
            withdrawals: WithdrawalListModel::new(),
            analytics: AnalyticsModel::new(),
            notices: Notifications::new(),
            session_expired: false,
        }))
    }

    /// Fetch withdrawals and analytics concurrently.
    ///
    /// Each view-model only reflects its own outcome: one failing leaves the
    /// other's data in place. An auth failure marks the session expired.
    #[instrument(skip_all)]
    pub async fn refresh(&mut self) -> RefreshReport {
        let api = self.api;
        let (withdrawals, analytics) = tokio::join!(
            self.withdrawals.reload(api, &self.session),
            self.analytics.reload(api, &self.session),
        );
        let report = RefreshReport {
            withdrawals,
            analytics,
        };

        if let Err(e) = &report.withdrawals {
            self.notices
                .push(Notice::from_client_error("Could not load withdrawals", e));
        }
        if let Err(e) = &report.analytics {
            self.notices
                .push(Notice::from_client_error("Could not load analytics", e));
        }
        if report.errors().any(ClientError::is_auth) {
            self.expire_session();
        }
        report
    }

    /// Reload only the withdrawal list.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after queueing a notice for it.
    pub async fn reload_withdrawals(&mut self) -> Result<(), ClientError> {
        let result = self.withdrawals.reload(self.api, &self.session).await;
        if let Err(e) = &result {
            self.notices
                .push(Notice::from_client_error("Could not load withdrawals", e));
            if e.is_auth() {
                self.expire_session();
            }
        }
        result
    }

    /// Approve a pending request and reload the list.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError` when the decision is refused locally.
    pub async fn approve(
        &mut self,
        id: WithdrawalId,
        notes: Option<String>,
    ) -> Result<TransitionReport, WorkflowError> {
        let report = self
            .withdrawals
            .approve(self.api, &self.session, id, notes, &mut self.notices)
            .await?;
        self.after_transition(&report);
        Ok(report)
    }

    /// Reject a pending request and reload the list.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError` when the decision is refused locally.
    pub async fn reject(
        &mut self,
        id: WithdrawalId,
        notes: Option<String>,
    ) -> Result<TransitionReport, WorkflowError> {
        let report = self
            .withdrawals
            .reject(self.api, &self.session, id, notes, &mut self.notices)
            .await?;
        self.after_transition(&report);
        Ok(report)
    }

    fn after_transition(&mut self, report: &TransitionReport) {
        let auth_failed = [&report.update, &report.reload]
            .into_iter()
            .any(|r| r.as_ref().is_err_and(ClientError::is_auth));
        if auth_failed {
            self.expire_session();
        }
    }

    /// Export the analytics spreadsheet into `dir`.
    ///
    /// # Errors
    ///
    /// Returns the download or write error after queueing a notice for it.
    pub async fn export(&mut self, dir: &Path) -> Result<ExportOutcome, ClientError> {
        match self.analytics.export(self.api, &self.session, dir).await {
            Ok(ExportOutcome::Saved(path)) => {
                self.notices.push(Notice::success(
                    "Report exported",
                    format!("Saved to {}", path.display()),
                ));
                Ok(ExportOutcome::Saved(path))
            }
            Ok(ExportOutcome::AlreadyRunning) => Ok(ExportOutcome::AlreadyRunning),
            Err(e) => {
                self.notices
                    .push(Notice::from_client_error("Export failed", &e));
                if e.is_auth() {
                    self.expire_session();
                }
                Err(e)
            }
        }
    }

    /// Sign out: forget the stored session and go to login.
    ///
    /// # Errors
    ///
    /// Returns error if the session store cannot be cleared.
    pub fn logout(self) -> Result<Route, SessionStoreError> {
        self.store.clear_session()?;
        info!(user = %self.session.user.username, "Signed out");
        Ok(Route::Login)
    }

    fn expire_session(&mut self) {
        if self.session_expired {
            return;
        }
        self.session_expired = true;
        warn!("Session rejected by the service");
        if let Err(e) = self.store.clear_session() {
            warn!(error = %e, "Failed to clear expired session");
        }
    }

    /// Where the console should be now.
    #[must_use]
    pub const fn route(&self) -> Route {
        if self.session_expired {
            Route::Login
        } else {
            Route::Admin(self.tab)
        }
    }

    #[must_use]
    pub const fn tab(&self) -> AdminTab {
        self.tab
    }

    pub const fn set_tab(&mut self, tab: AdminTab) {
        self.tab = tab;
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn session_expired(&self) -> bool {
        self.session_expired
    }

    #[must_use]
    pub const fn withdrawals(&self) -> &WithdrawalListModel {
        &self.withdrawals
    }

    pub const fn withdrawals_mut(&mut self) -> &mut WithdrawalListModel {
        &mut self.withdrawals
    }

    #[must_use]
    pub const fn analytics(&self) -> &AnalyticsModel {
        &self.analytics
    }

    #[must_use]
    pub const fn notices(&self) -> &Notifications {
        &self.notices
    }

    pub const fn notices_mut(&mut self) -> &mut Notifications {
        &mut self.notices
    }
}
