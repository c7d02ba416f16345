//! Screen state that sits between the API client and the views.
//!
//! Each model owns a [`Snapshot`] of one endpoint. Snapshots are only ever
//! replaced whole by a fetch; nothing edits them in place.

mod analytics;
mod builder;
mod snapshot;
mod withdrawals;

pub use analytics::{AnalyticsModel, ExportControl, ExportOutcome, ExportState};
pub use builder::{BuilderDialog, BuilderDraft, FieldSpec};
pub use snapshot::{LoadPhase, Snapshot};
pub use withdrawals::{
    RowAction, SortDirection, SortKey, TableSort, TransitionReport, WithdrawalListModel,
    row_actions,
};
