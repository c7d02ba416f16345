//! `export`.

use std::io::Write;
use std::path::Path;

use payflow_admin::AdminTab;
use payflow_admin::viewmodel::ExportOutcome;
use payflow_admin::views::render_notices;

use super::{CommandError, Context};

/// Download the analytics report into `dir` and print where it went.
///
/// # Errors
///
/// Returns error if the download fails or the file cannot be written.
pub async fn export(ctx: &Context, dir: &Path, out: &mut impl Write) -> Result<(), CommandError> {
    let mut screen = ctx.mount(AdminTab::Analytics)?;

    let outcome = screen.export(dir).await;
    render_notices(out, screen.notices())?;

    match outcome {
        Ok(ExportOutcome::Saved(path)) => {
            writeln!(out, "{}", path.display())?;
            Ok(())
        }
        Ok(ExportOutcome::AlreadyRunning) => Ok(()),
        Err(_) if screen.session_expired() => Err(CommandError::SessionExpired),
        Err(e) => Err(e.into()),
    }
}
