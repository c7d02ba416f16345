use std::io::{self, Write};

use super::{heading, subheading};
use crate::viewmodel::{BuilderDialog, BuilderDraft};

/// Builder tab: the two dialogs on offer.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn render_builder(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Edit the content and structure of the site.")?;
    writeln!(out)?;
    for dialog in BuilderDialog::ALL {
        writeln!(
            out,
            "* {} ({}): {}",
            dialog.title(),
            dialog.as_str(),
            dialog.description()
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Open one with `payflow builder <dialog>`.")
}

/// An open dialog with its current values.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn render_dialog(out: &mut impl Write, draft: &BuilderDraft) -> io::Result<()> {
    let dialog = draft.dialog();
    heading(out, dialog.title())?;
    writeln!(out, "{}", dialog.description())?;

    for (field, value) in draft.entries() {
        subheading(out, field.label)?;
        if value.is_empty() {
            writeln!(out, "({})", field.placeholder)?;
        } else if field.multiline {
            for line in value.lines() {
                writeln!(out, "  {line}")?;
            }
        } else {
            writeln!(out, "{value}")?;
        }
    }
    writeln!(out)?;
    writeln!(out, "[{}]", dialog.save_label())
}
