use std::io::{self, Write};

use payflow_core::{AnalyticsSnapshot, format_rub, format_rub_compact};

use super::{bar, load_banner, stale_warning, subheading};
use crate::viewmodel::{AnalyticsModel, WithdrawalListModel};

/// Dashboard tab: stat cards and the monthly volume chart.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn render_dashboard(
    out: &mut impl Write,
    withdrawals: &WithdrawalListModel,
    analytics: &AnalyticsModel,
) -> io::Result<()> {
    if let Some(banner) = load_banner(analytics.snapshot()) {
        writeln!(out, "{banner}")?;
        return Ok(());
    }
    stale_warning(out, analytics.snapshot())?;
    let Some(snapshot) = analytics.data() else {
        return Ok(());
    };

    render_cards(out, snapshot, withdrawals.pending_count())?;
    render_monthly(out, snapshot)
}

fn render_cards(
    out: &mut impl Write,
    snapshot: &AnalyticsSnapshot,
    queued: usize,
) -> io::Result<()> {
    let stats = &snapshot.stats;
    let approval = stats
        .approval_rate()
        .map_or_else(|| "n/a".to_string(), |rate| format!("{rate}%"));

    writeln!(out, "Total withdrawals  {}", stats.total_withdrawals)?;
    writeln!(
        out,
        "Pending            {} ({queued} in the current list)",
        stats.pending_count
    )?;
    writeln!(
        out,
        "Paid out           {} of {}",
        format_rub_compact(stats.approved_amount),
        format_rub_compact(stats.total_amount)
    )?;
    writeln!(out, "Average amount     {}", format_rub(stats.avg_amount))?;
    writeln!(out, "Approval rate      {approval}")
}

/// Monthly volume bars, in the order the service sent them.
pub(super) fn render_monthly(out: &mut impl Write, snapshot: &AnalyticsSnapshot) -> io::Result<()> {
    subheading(out, "Monthly volume")?;
    if snapshot.monthly.is_empty() {
        return writeln!(out, "No data yet");
    }

    let max = snapshot
        .monthly
        .iter()
        .map(|m| m.total)
        .max()
        .unwrap_or_default();
    let width = snapshot
        .monthly
        .iter()
        .map(|m| m.month.chars().count())
        .max()
        .unwrap_or(0);

    for month in &snapshot.monthly {
        writeln!(
            out,
            "{:<width$}  {} {} ({} requests)",
            month.month,
            bar(month.total, max),
            format_rub_compact(month.total),
            month.count,
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, analytics, session};
    use crate::views::render_to_string;

    #[test]
    fn test_loading_before_first_fetch() {
        let text = render_to_string(|out| {
            render_dashboard(out, &WithdrawalListModel::new(), &AnalyticsModel::new())
        });
        assert_eq!(text, "Loading...\n");
    }

    #[tokio::test]
    async fn test_cards_and_chart() {
        let api = FakeApi::default();
        api.set_analytics(analytics());
        let mut model = AnalyticsModel::new();
        model.reload(&api, &session()).await.unwrap();

        let text =
            render_to_string(|out| render_dashboard(out, &WithdrawalListModel::new(), &model));

        assert!(text.contains("Total withdrawals  4"));
        assert!(text.contains("Paid out           ₽30K of ₽45K"));
        assert!(text.contains("Average amount     ₽11,250"));
        assert!(text.contains("Approval rate      50%"));
        assert!(text.contains("2026-02  ████████████████████████████████ ₽40K (3 requests)"));
    }
}
