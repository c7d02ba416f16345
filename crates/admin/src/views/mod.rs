//! Console rendering.
//!
//! Every view writes plain text to any [`Write`], so the CLI prints to stdout
//! and tests render into a `Vec<u8>`. Views only read state; they never call
//! the API.

mod admin;
mod analytics;
mod builder;
mod dashboard;
mod landing;
mod login;
mod table;
mod withdrawals;

use std::io::{self, Write};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

pub use admin::render_admin;
pub use analytics::render_analytics;
pub use builder::{render_builder, render_dialog};
pub use dashboard::render_dashboard;
pub use landing::render_landing;
pub use login::render_login;
pub use table::{Align, TableColumn, TextTable};
pub use withdrawals::render_withdrawals;

use crate::notify::{NoticeVariant, Notifications};
use crate::viewmodel::{LoadPhase, Snapshot};

/// Width of the longest chart bar, in cells.
const BAR_WIDTH: usize = 32;

/// Section heading with an underline.
fn heading(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(title.chars().count()))
}

fn subheading(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))
}

/// A horizontal bar scaled against `max`.
fn bar(value: Decimal, max: Decimal) -> String {
    if max <= Decimal::ZERO || value <= Decimal::ZERO {
        return String::new();
    }
    let cells = (value / max * Decimal::from(BAR_WIDTH))
        .round()
        .to_usize()
        .unwrap_or(0)
        .clamp(1, BAR_WIDTH);
    "█".repeat(cells)
}

/// Line describing a snapshot that has nothing to show yet, or `None` when
/// the data should be drawn.
fn load_banner<T>(snapshot: &Snapshot<T>) -> Option<String> {
    match (snapshot.phase(), snapshot.data()) {
        (LoadPhase::Idle | LoadPhase::Loading, None) => Some("Loading...".to_string()),
        (LoadPhase::LoadError(message), None) => Some(format!("Failed to load: {message}")),
        _ => None,
    }
}

/// Warning shown above stale data after a failed reload.
fn stale_warning<T>(out: &mut impl Write, snapshot: &Snapshot<T>) -> io::Result<()> {
    if let (Some(message), Some(_)) = (snapshot.error(), snapshot.data()) {
        writeln!(out, "! Refresh failed ({message}); showing earlier data")?;
    }
    Ok(())
}

/// Print queued notices, errors marked with `!`.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn render_notices(out: &mut impl Write, notices: &Notifications) -> io::Result<()> {
    for notice in notices.pending() {
        let marker = match notice.variant {
            NoticeVariant::Success => '✓',
            NoticeVariant::Error => '!',
        };
        writeln!(out, "{marker} {}: {}", notice.title, notice.description)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn render_to_string(render: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
    let mut buf = Vec::new();
    render(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}
