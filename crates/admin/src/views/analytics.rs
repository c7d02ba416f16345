use std::io::{self, Write};

use payflow_core::{AnalyticsSnapshot, format_rub, format_rub_compact};

use super::dashboard::render_monthly;
use super::table::{TableColumn, TextTable};
use super::{bar, load_banner, stale_warning, subheading};
use crate::viewmodel::{AnalyticsModel, ExportState};

/// Analytics tab: monthly chart, method distribution, top users and the
/// export control.
///
/// The method distribution is left out entirely when the service reports
/// no per-method data.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn render_analytics(out: &mut impl Write, model: &AnalyticsModel) -> io::Result<()> {
    let export = match model.export_state() {
        ExportState::Idle => "Export to Excel: ready (`payflow export`)",
        ExportState::Exporting => "Export to Excel: exporting...",
    };
    writeln!(out, "{export}")?;
    writeln!(out)?;

    if let Some(banner) = load_banner(model.snapshot()) {
        return writeln!(out, "{banner}");
    }
    stale_warning(out, model.snapshot())?;
    let Some(snapshot) = model.data() else {
        return Ok(());
    };

    let stats = &snapshot.stats;
    writeln!(
        out,
        "{} requests: {} pending, {} approved, {} rejected",
        stats.total_withdrawals, stats.pending_count, stats.approved_count, stats.rejected_count
    )?;
    writeln!(
        out,
        "Volume {} total, {} approved, {} average",
        format_rub(stats.total_amount),
        format_rub(stats.approved_amount),
        format_rub(stats.avg_amount)
    )?;

    render_monthly(out, snapshot)?;
    if snapshot.has_method_breakdown() {
        render_methods(out, snapshot)?;
    }
    render_top_users(out, snapshot)
}

fn render_methods(out: &mut impl Write, snapshot: &AnalyticsSnapshot) -> io::Result<()> {
    subheading(out, "By method")?;
    let max = snapshot
        .by_method
        .iter()
        .map(|m| m.total)
        .max()
        .unwrap_or_default();
    let width = snapshot
        .by_method
        .iter()
        .map(|m| m.method.chars().count())
        .max()
        .unwrap_or(0);

    for method in &snapshot.by_method {
        let share = snapshot
            .method_share(method)
            .map_or_else(String::new, |s| format!(", {s}%"));
        writeln!(
            out,
            "{:<width$}  {} {} ({}{share})",
            method.method,
            bar(method.total, max),
            format_rub_compact(method.total),
            method.count,
        )?;
    }
    Ok(())
}

fn render_top_users(out: &mut impl Write, snapshot: &AnalyticsSnapshot) -> io::Result<()> {
    subheading(out, "Top users")?;
    let mut table = TextTable::new()
        .column(TableColumn::new("rank", "#").right())
        .column(TableColumn::new("name", "Name"))
        .column(TableColumn::new("email", "Email"))
        .column(TableColumn::new("count", "Requests").right())
        .column(TableColumn::new("total", "Total").right())
        .empty_state("No data yet");

    for (rank, user) in snapshot.top_users.iter().enumerate() {
        table.row(vec![
            (rank + 1).to_string(),
            user.name.clone(),
            user.email.clone(),
            user.withdrawal_count.to_string(),
            format_rub(user.total_amount),
        ]);
    }
    table.render(out)
}
