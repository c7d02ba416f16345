//! Read-only tabs: `dashboard`, `withdrawals` and `analytics`.

use std::io::Write;

use payflow_admin::AdminTab;
use payflow_admin::viewmodel::{SortDirection, SortKey, TableSort};
use payflow_core::StatusFilter;

use super::{CommandError, Context, finish};

/// Render `tab` after fetching both data sets.
async fn show(ctx: &Context, tab: AdminTab, out: &mut impl Write) -> Result<(), CommandError> {
    let mut screen = ctx.mount(tab)?;
    let report = screen.refresh().await;
    finish(out, &screen, report.withdrawals.and(report.analytics))
}

/// # Errors
///
/// Returns error when nobody is signed in, the session has expired or a
/// fetch failed. The screen is rendered first either way.
pub async fn dashboard(ctx: &Context, out: &mut impl Write) -> Result<(), CommandError> {
    show(ctx, AdminTab::Dashboard, out).await
}

/// # Errors
///
/// Returns error when nobody is signed in, the session has expired or a
/// fetch failed. The screen is rendered first either way.
pub async fn analytics(ctx: &Context, out: &mut impl Write) -> Result<(), CommandError> {
    show(ctx, AdminTab::Analytics, out).await
}

/// The withdrawal table, filtered and sorted.
///
/// # Errors
///
/// Returns error when nobody is signed in, the session has expired or a
/// fetch failed. The screen is rendered first either way.
pub async fn withdrawals(
    ctx: &Context,
    filter: StatusFilter,
    sort: SortKey,
    ascending: bool,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let mut screen = ctx.mount(AdminTab::Withdrawals)?;
    let direction = if ascending {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };
    let list = screen.withdrawals_mut();
    list.set_filter(filter);
    list.set_sort(TableSort::new(sort, direction));

    let outcome = screen.reload_withdrawals().await;
    finish(out, &screen, outcome)
}
