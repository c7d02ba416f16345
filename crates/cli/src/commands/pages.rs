//! `landing` and `builder`.

use std::io::Write;

use payflow_admin::AdminTab;
use payflow_admin::viewmodel::{BuilderDialog, BuilderDraft};
use payflow_admin::views::{render_admin, render_dialog, render_landing, render_notices};

use super::{CommandError, Context};

/// # Errors
///
/// Returns error if output cannot be written.
pub fn landing(out: &mut impl Write) -> Result<(), CommandError> {
    render_landing(out)?;
    Ok(())
}

/// Show the builder tab, or fill in and optionally save one dialog.
///
/// # Errors
///
/// Returns `NotSignedIn` without a session and `Usage` for fields the
/// dialog does not have.
pub fn builder(
    ctx: &Context,
    dialog: Option<BuilderDialog>,
    fields: &[(String, String)],
    save: bool,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let mut screen = ctx.mount(AdminTab::Builder)?;

    let Some(dialog) = dialog else {
        if !fields.is_empty() || save {
            return Err(CommandError::Usage(
                "choose a dialog (home or settings) to edit".to_string(),
            ));
        }
        render_admin(out, &screen)?;
        return Ok(());
    };

    let mut draft = BuilderDraft::new(dialog);
    for (key, value) in fields {
        if !draft.set(key, value.as_str()) {
            let known: Vec<_> = dialog.fields().iter().map(|f| f.key).collect();
            return Err(CommandError::Usage(format!(
                "{} has no field `{key}` (expected one of: {})",
                dialog.title(),
                known.join(", ")
            )));
        }
    }

    render_dialog(out, &draft)?;
    if save {
        draft.save(screen.notices_mut());
        writeln!(out)?;
        render_notices(out, screen.notices())?;
    }
    Ok(())
}
