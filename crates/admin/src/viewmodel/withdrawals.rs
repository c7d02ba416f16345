//! Withdrawal approval queue.
//!
//! The list is a snapshot of the withdrawals endpoint. Decisions go to the
//! service and are followed by a full reload; rows are never edited in
//! place, so what the operator sees is always what the service returned.

use std::cmp::Ordering;

use payflow_core::{StatusFilter, WithdrawalId, WithdrawalRequest, WithdrawalStatus};
use tracing::{info, instrument, warn};

use super::snapshot::Snapshot;
use crate::api::{AdminApi, StatusUpdate};
use crate::error::{ClientError, WorkflowError};
use crate::notify::{Notice, Notifications};
use crate::session::Session;

/// A control offered on a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Approve,
    Reject,
}

impl RowAction {
    /// Status the action moves the request to.
    #[must_use]
    pub const fn target(self) -> WithdrawalStatus {
        match self {
            Self::Approve => WithdrawalStatus::Approved,
            Self::Reject => WithdrawalStatus::Rejected,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

const PENDING_ACTIONS: &[RowAction] = &[RowAction::Approve, RowAction::Reject];

/// Controls to offer for `request`: both decisions while pending, none after.
#[must_use]
pub fn row_actions(request: &WithdrawalRequest) -> &'static [RowAction] {
    if request.is_actionable() {
        PENDING_ACTIONS
    } else {
        &[]
    }
}

/// Column the table is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Id,
    #[default]
    Date,
    Amount,
    User,
    Status,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            "user" => Ok(Self::User),
            "status" => Ok(Self::Status),
            _ => Err(format!("invalid sort column: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Table ordering. Defaults to newest first, matching the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableSort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl TableSort {
    #[must_use]
    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Header click: flip direction on the same column, else sort the new
    /// column ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            *self = Self::new(key, SortDirection::Ascending);
        }
    }

    fn compare(self, a: &WithdrawalRequest, b: &WithdrawalRequest) -> Ordering {
        let ordering = match self.key {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Amount => a.amount.cmp(&b.amount),
            SortKey::User => a.user.to_lowercase().cmp(&b.user.to_lowercase()),
            SortKey::Status => a.status.cmp(&b.status),
        }
        .then_with(|| a.id.cmp(&b.id));

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// What happened when a decision was submitted.
#[derive(Debug)]
pub struct TransitionReport {
    pub id: WithdrawalId,
    pub target: WithdrawalStatus,
    /// Outcome of the `PUT`.
    pub update: Result<(), ClientError>,
    /// Outcome of the reload that always follows.
    pub reload: Result<(), ClientError>,
}

impl TransitionReport {
    /// Whether the service accepted the decision.
    #[must_use]
    pub const fn applied(&self) -> bool {
        self.update.is_ok()
    }
}

/// State behind the withdrawals tab.
#[derive(Debug, Default)]
pub struct WithdrawalListModel {
    snapshot: Snapshot<Vec<WithdrawalRequest>>,
    filter: StatusFilter,
    sort: TableSort,
}

impl WithdrawalListModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Model listing only requests matching `filter`.
    #[must_use]
    pub fn with_filter(filter: StatusFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Fetch the list and replace the current rows with it.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous rows stay in place.
    #[instrument(skip_all, fields(filter = self.filter.as_query()))]
    pub async fn reload<A: AdminApi>(
        &mut self,
        api: &A,
        session: &Session,
    ) -> Result<(), ClientError> {
        self.snapshot.begin();
        let outcome = api.fetch_withdrawals(session, self.filter).await;
        if let Err(e) = &outcome {
            warn!(error = %e, "Failed to load withdrawals");
        }
        self.snapshot.finish(outcome)
    }

    /// Submit a decision, then reload the list.
    ///
    /// The request must be in the loaded list and still pending; otherwise
    /// nothing is sent. Once sent, a success or failure notice is queued and
    /// exactly one reload follows whatever the outcome. The local row is not
    /// touched before that reload.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError` when the decision is refused locally.
    #[instrument(skip(self, api, session, notes, notices))]
    pub async fn transition<A: AdminApi>(
        &mut self,
        api: &A,
        session: &Session,
        id: WithdrawalId,
        target: WithdrawalStatus,
        notes: Option<String>,
        notices: &mut Notifications,
    ) -> Result<TransitionReport, WorkflowError> {
        if target.is_pending() {
            return Err(WorkflowError::InvalidTarget(target));
        }

        let current = self
            .get(id)
            .ok_or(WorkflowError::UnknownWithdrawal(id))?
            .status;
        if !current.can_transition_to(target) {
            return Err(WorkflowError::NotPending {
                id,
                status: current,
            });
        }

        let update = StatusUpdate::new(id, target).with_notes(notes);
        let result = api.update_withdrawal_status(session, &update).await;

        match &result {
            Ok(()) => {
                info!(%id, status = %target, "Withdrawal decision accepted");
                notices.push(Notice::success(
                    format!("Withdrawal {}", target.label().to_lowercase()),
                    format!("Request #{id} was marked {target}"),
                ));
            }
            Err(e) => {
                warn!(%id, error = %e, "Withdrawal decision failed");
                notices.push(Notice::from_client_error("Update failed", e));
            }
        }

        let reload = self.reload(api, session).await;
        if let Err(e) = &reload {
            notices.push(Notice::from_client_error("Could not refresh withdrawals", e));
        }

        Ok(TransitionReport {
            id,
            target,
            update: result,
            reload,
        })
    }

    /// Approve a pending request. See [`Self::transition`].
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError` when the decision is refused locally.
    pub async fn approve<A: AdminApi>(
        &mut self,
        api: &A,
        session: &Session,
        id: WithdrawalId,
        notes: Option<String>,
        notices: &mut Notifications,
    ) -> Result<TransitionReport, WorkflowError> {
        self.transition(api, session, id, WithdrawalStatus::Approved, notes, notices)
            .await
    }

    /// Reject a pending request. See [`Self::transition`].
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError` when the decision is refused locally.
    pub async fn reject<A: AdminApi>(
        &mut self,
        api: &A,
        session: &Session,
        id: WithdrawalId,
        notes: Option<String>,
        notices: &mut Notifications,
    ) -> Result<TransitionReport, WorkflowError> {
        self.transition(api, session, id, WithdrawalStatus::Rejected, notes, notices)
            .await
    }

    /// Rows in table order.
    #[must_use]
    pub fn rows(&self) -> Vec<&WithdrawalRequest> {
        let mut rows: Vec<_> = self.snapshot.data().map_or_else(Vec::new, |d| d.iter().collect());
        let sort = self.sort;
        rows.sort_by(|a, b| sort.compare(a, b));
        rows
    }

    #[must_use]
    pub fn get(&self, id: WithdrawalId) -> Option<&WithdrawalRequest> {
        self.snapshot.data()?.iter().find(|w| w.id == id)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.snapshot
            .data()
            .map_or(0, |d| d.iter().filter(|w| w.is_actionable()).count())
    }

    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot<Vec<WithdrawalRequest>> {
        &self.snapshot
    }

    #[must_use]
    pub const fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// Change the status filter. Takes effect on the next reload.
    pub const fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    #[must_use]
    pub const fn sort(&self) -> TableSort {
        self.sort
    }

    pub const fn set_sort(&mut self, sort: TableSort) {
        self.sort = sort;
    }

    /// Header click on `key`.
    pub fn sort_by(&mut self, key: SortKey) {
        self.sort.toggle(key);
    }
}
