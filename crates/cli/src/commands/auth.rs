//! `login`, `logout` and `whoami`.

use std::io::{BufRead, Write};

use payflow_admin::controller::Route;
use payflow_admin::login::{LoginForm, submit};
use payflow_admin::notify::Notifications;
use payflow_admin::views::{render_login, render_notices};
use payflow_admin::{AdminApi, AdminTab, SessionStore};
use secrecy::SecretString;

use super::{CommandError, Context};

/// Ask for the password on the terminal.
///
/// # Errors
///
/// Returns error if stdin cannot be read.
pub fn prompt_password() -> Result<SecretString, CommandError> {
    let mut stderr = std::io::stderr().lock();
    write!(stderr, "Password: ")?;
    stderr.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n'])))
}

/// Sign in and store the session.
///
/// # Errors
///
/// Returns `LoginFailed` when the service refuses the credentials or cannot
/// be reached; the reason is rendered as a notice.
pub async fn login(
    ctx: &Context,
    username: &str,
    password: SecretString,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let form = LoginForm {
        username: username.to_string(),
        password,
    };
    let mut notices = Notifications::new();

    let route = submit(&ctx.client, &ctx.store, &form, &mut notices).await;

    match route {
        Route::Admin(_) => {
            render_notices(out, &notices)?;
            Ok(())
        }
        Route::Login | Route::Landing => {
            render_login(out, &notices)?;
            Err(CommandError::LoginFailed)
        }
    }
}

/// Forget the stored session.
///
/// # Errors
///
/// Returns error if the session file cannot be removed.
pub fn logout(ctx: &Context, out: &mut impl Write) -> Result<(), CommandError> {
    match ctx.mount(AdminTab::Dashboard) {
        Ok(screen) => {
            let user = screen.session().user.username.clone();
            screen.logout()?;
            writeln!(out, "Signed out {user}")?;
        }
        Err(CommandError::NotSignedIn) => {
            // An unreadable session file still gets removed
            ctx.store.clear_session()?;
            writeln!(out, "Not signed in")?;
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Show who the stored session belongs to, as confirmed by the service.
///
/// # Errors
///
/// Returns `NotSignedIn` without a session and `SessionExpired` when the
/// service no longer accepts it.
pub async fn whoami(ctx: &Context, out: &mut impl Write) -> Result<(), CommandError> {
    let Some(session) = ctx.store.load().ok().flatten() else {
        return Err(CommandError::NotSignedIn);
    };

    match ctx.client.verify_session(&session).await {
        Ok(profile) => {
            match &profile.email {
                Some(email) => writeln!(out, "{} <{email}>", profile.username)?,
                None => writeln!(out, "{}", profile.username)?,
            }
            Ok(())
        }
        Err(e) if e.is_auth() => {
            tracing::info!(error = %e, "Stored session rejected");
            ctx.store.clear_session()?;
            Err(CommandError::SessionExpired)
        }
        Err(e) => Err(e.into()),
    }
}
