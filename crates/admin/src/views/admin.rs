use std::io::{self, Write};

use super::{
    render_analytics, render_builder, render_dashboard, render_notices, render_withdrawals,
};
use crate::api::AdminApi;
use crate::controller::{AdminScreen, AdminTab};
use crate::session::SessionStore;

/// The admin screen: header, tab bar, the selected tab and queued notices.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn render_admin<A: AdminApi, S: SessionStore>(
    out: &mut impl Write,
    screen: &AdminScreen<'_, A, S>,
) -> io::Result<()> {
    writeln!(
        out,
        "PayFlow admin | signed in as {}",
        screen.session().user.username
    )?;

    let tabs: Vec<String> = AdminTab::ALL
        .into_iter()
        .map(|tab| {
            if tab == screen.tab() {
                format!("[{}]", tab.title())
            } else {
                tab.title().to_string()
            }
        })
        .collect();
    writeln!(out, "{}", tabs.join("  "))?;
    writeln!(out)?;

    match screen.tab() {
        AdminTab::Dashboard => {
            render_dashboard(out, screen.withdrawals(), screen.analytics())?;
        }
        AdminTab::Withdrawals => render_withdrawals(out, screen.withdrawals())?,
        AdminTab::Analytics => render_analytics(out, screen.analytics())?,
        AdminTab::Builder => render_builder(out)?,
    }

    if !screen.notices().is_empty() {
        writeln!(out)?;
        render_notices(out, screen.notices())?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::controller::Mount;
    use crate::session::MemorySessionStore;
    use crate::testing::{FakeApi, session};
    use crate::views::render_to_string;

    #[tokio::test]
    async fn test_header_and_tabs() {
        let api = FakeApi::default();
        let store = MemorySessionStore::with_session(session());
        let Mount::Admin(mut screen) = AdminScreen::mount(&api, &store, AdminTab::Builder) else {
            panic!("expected the admin screen");
        };
        screen.refresh().await;

        let text = render_to_string(|out| render_admin(out, &*screen));

        assert!(text.starts_with("PayFlow admin | signed in as admin\n"));
        assert!(text.contains("Dashboard  Withdrawal requests  Analytics  [Page builder]"));
        assert!(text.contains("Home page (home)"));
    }
}
