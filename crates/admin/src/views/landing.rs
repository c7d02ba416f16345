use std::io::{self, Write};

use super::heading;

const FEATURES: &[(&str, &str)] = &[
    (
        "Request handling",
        "Approve or reject withdrawal requests in a couple of keystrokes.",
    ),
    (
        "Detailed analytics",
        "Monthly volume, payment method mix and top users at a glance.",
    ),
    (
        "Excel export",
        "Download full reports for accounting and further analysis.",
    ),
    (
        "Security",
        "Token authentication against protected APIs.",
    ),
];

const HIGHLIGHTS: &[&str] = &[
    "Monthly volume charts",
    "Breakdown by withdrawal method",
    "Top users by volume",
];

/// The product landing screen.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn render_landing(out: &mut impl Write) -> io::Result<()> {
    heading(out, "PayFlow")?;
    writeln!(out, "Withdrawal management, simpler and faster.")?;
    writeln!(
        out,
        "A modern platform for processing withdrawal requests with full analytics."
    )?;
    writeln!(out)?;

    for (title, description) in FEATURES {
        writeln!(out, "* {title}: {description}")?;
    }
    writeln!(out)?;

    writeln!(out, "Full control over your payouts:")?;
    for line in HIGHLIGHTS {
        writeln!(out, "  + {line}")?;
    }
    writeln!(out)?;
    writeln!(out, "Ready to start? Run `payflow login` to sign in.")
}
