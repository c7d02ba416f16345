//! `approve` and `reject`.

use std::io::Write;

use payflow_admin::views::render_notices;
use payflow_admin::{AdminTab, WorkflowError};
use payflow_core::{WithdrawalId, WithdrawalStatus};

use super::{CommandError, Context, finish};

/// Decide on a pending request.
///
/// The list is loaded first so a request that already left `pending` is
/// refused without sending anything.
///
/// # Errors
///
/// Returns the refusal, the update error when the service rejected the
/// decision, or the reload error. The table is rendered either way.
pub async fn decide(
    ctx: &Context,
    id: WithdrawalId,
    target: WithdrawalStatus,
    notes: Option<String>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let mut screen = ctx.mount(AdminTab::Withdrawals)?;

    if let Err(e) = screen.reload_withdrawals().await {
        render_notices(out, screen.notices())?;
        if screen.session_expired() {
            return Err(CommandError::SessionExpired);
        }
        return Err(e.into());
    }

    let report = match target {
        WithdrawalStatus::Approved => screen.approve(id, notes).await?,
        WithdrawalStatus::Rejected => screen.reject(id, notes).await?,
        WithdrawalStatus::Pending => return Err(WorkflowError::InvalidTarget(target).into()),
    };

    finish(out, &screen, report.update.and(report.reload))
}
