use std::io::{self, Write};

use super::{heading, render_notices};
use crate::notify::Notifications;

/// The login screen: a title, then whatever the last attempt queued.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn render_login(out: &mut impl Write, notices: &Notifications) -> io::Result<()> {
    heading(out, "PayFlow admin sign-in")?;
    writeln!(out, "Enter your administrator username and password.")?;
    if !notices.is_empty() {
        writeln!(out)?;
        render_notices(out, notices)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Notice;
    use crate::views::render_to_string;

    #[test]
    fn test_login_shows_failure() {
        let mut notices = Notifications::new();
        notices.push(Notice::error("Login failed", "Invalid credentials"));

        let text = render_to_string(|out| render_login(out, &notices));
        assert!(text.contains("! Login failed: Invalid credentials"));
    }
}
