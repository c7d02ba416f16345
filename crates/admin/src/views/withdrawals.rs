use std::io::{self, Write};

use payflow_core::{StatusFilter, WithdrawalStatus, format_rub};

use super::table::{TableColumn, TextTable};
use super::{load_banner, stale_warning};
use crate::viewmodel::{RowAction, SortDirection, SortKey, WithdrawalListModel, row_actions};

const fn sort_column(key: SortKey) -> &'static str {
    match key {
        SortKey::Id => "id",
        SortKey::Date => "date",
        SortKey::Amount => "amount",
        SortKey::User => "user",
        SortKey::Status => "status",
    }
}

/// Status badge, e.g. `[Pending]`.
fn badge(status: WithdrawalStatus) -> String {
    format!("[{}]", status.label())
}

fn actions_cell(actions: &[RowAction]) -> String {
    actions
        .iter()
        .map(|a| a.label())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Withdrawals tab: the approval queue table.
///
/// Approve and reject are listed only on pending rows.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn render_withdrawals(out: &mut impl Write, model: &WithdrawalListModel) -> io::Result<()> {
    if let Some(banner) = load_banner(model.snapshot()) {
        return writeln!(out, "{banner}");
    }
    stale_warning(out, model.snapshot())?;

    let rows = model.rows();
    let filter = match model.filter() {
        StatusFilter::All => String::new(),
        StatusFilter::Only(status) => format!(", showing {status} only"),
    };
    writeln!(
        out,
        "{} request(s), {} pending{filter}",
        rows.len(),
        model.pending_count()
    )?;
    writeln!(out)?;

    let sort = model.sort();
    let mut table = TextTable::new()
        .column(TableColumn::sortable("id", "ID").right())
        .column(TableColumn::sortable("user", "User"))
        .column(TableColumn::new("email", "Email"))
        .column(TableColumn::sortable("amount", "Amount").right())
        .column(TableColumn::new("method", "Method"))
        .column(TableColumn::sortable("date", "Date"))
        .column(TableColumn::sortable("status", "Status"))
        .column(TableColumn::new("actions", "Actions"))
        .sorted_by(
            sort_column(sort.key),
            sort.direction == SortDirection::Ascending,
        )
        .empty_state("No withdrawal requests");

    for request in rows {
        table.row(vec![
            request.id.to_string(),
            request.user.clone(),
            request.email.clone(),
            format_rub(request.amount),
            request.method.clone(),
            request.date.to_string(),
            badge(request.status),
            actions_cell(row_actions(request)),
        ]);
    }
    table.render(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, session, withdrawal};
    use crate::views::render_to_string;

    #[tokio::test]
    async fn test_actions_only_on_pending_rows() {
        let api = FakeApi::with_withdrawals(vec![
            withdrawal(1, WithdrawalStatus::Pending, 5000),
            withdrawal(3, WithdrawalStatus::Approved, 3500),
        ]);
        let mut model = WithdrawalListModel::new();
        model.reload(&api, &session()).await.unwrap();

        let text = render_to_string(|out| render_withdrawals(out, &model));

        let row = |id: &str| {
            text.lines()
                .find(|l| l.trim_start().starts_with(id))
                .unwrap()
                .to_string()
        };
        assert!(row("1 ").contains("[Pending]"));
        assert!(row("1 ").ends_with("approve | reject"));
        assert!(row("3 ").contains("[Approved]"));
        assert!(!row("3 ").contains("approve"));
        assert!(text.contains("₽5,000"));
        assert!(text.contains("Date ▼"));
        assert!(text.starts_with("2 request(s), 1 pending\n"));
    }

    #[tokio::test]
    async fn test_failed_first_load() {
        let api = FakeApi::default();
        api.fail_withdrawals(true);
        let mut model = WithdrawalListModel::new();
        assert!(model.reload(&api, &session()).await.is_err());

        let text = render_to_string(|out| render_withdrawals(out, &model));
        assert_eq!(text, "Failed to load: boom\n");
    }
}
