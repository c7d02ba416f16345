//! Command implementations.
//!
//! Each command mounts the screen it needs, performs its action and renders
//! the result to the writer it is given.

pub mod auth;
pub mod decide;
pub mod export;
pub mod pages;
pub mod screens;

use std::io::Write;

use payflow_admin::config::ConfigError;
use payflow_admin::session::SessionStoreError;
use payflow_admin::views::render_admin;
use payflow_admin::{
    AdminConfig, AdminScreen, AdminTab, ClientError, FileSessionStore, Mount, PayflowClient,
    WorkflowError,
};
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Store(#[from] SessionStoreError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not signed in; run `payflow login` first")]
    NotSignedIn,

    #[error("Session expired; run `payflow login` again")]
    SessionExpired,

    #[error("Login failed")]
    LoginFailed,

    #[error("{0}")]
    Usage(String),
}

impl CommandError {
    /// Whether the failure should reach error tracking.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Client(e) => e.is_reportable(),
            Self::Store(_) | Self::Io(_) => true,
            _ => false,
        }
    }
}

/// Services every command talks to.
pub struct Context {
    pub config: AdminConfig,
    pub client: PayflowClient,
    pub store: FileSessionStore,
}

impl Context {
    /// Build the HTTP client and session store for `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, CommandError> {
        let client = PayflowClient::new(&config)?;
        let store = FileSessionStore::new(config.session_path());
        Ok(Self {
            config,
            client,
            store,
        })
    }

    /// Enter the admin screen, failing when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns `NotSignedIn` when no usable session is stored.
    pub fn mount(
        &self,
        tab: AdminTab,
    ) -> Result<AdminScreen<'_, PayflowClient, FileSessionStore>, CommandError> {
        match AdminScreen::mount(&self.client, &self.store, tab) {
            Mount::Admin(screen) => Ok(*screen),
            Mount::Redirect(_) => Err(CommandError::NotSignedIn),
        }
    }
}

/// Render the screen, then fail if loading or the action failed.
///
/// An expired session wins over the underlying error.
fn finish(
    out: &mut impl Write,
    screen: &AdminScreen<'_, PayflowClient, FileSessionStore>,
    outcome: Result<(), ClientError>,
) -> Result<(), CommandError> {
    render_admin(out, screen)?;
    if screen.session_expired() {
        return Err(CommandError::SessionExpired);
    }
    Ok(outcome?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod testing {
    use payflow_admin::{Session, SessionStore};
    use payflow_core::AdminProfile;
    use payflow_integration_tests::{FakeBackend, USERNAME};
    use tempfile::TempDir;

    use super::Context;

    /// Context talking to `backend`, with session and reports in a fresh
    /// directory that lives as long as the returned guard.
    pub fn context(backend: &FakeBackend) -> (Context, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = backend.config();
        config.state_dir = dir.path().join("state");
        config.export_dir = dir.path().join("reports");
        (Context::new(config).unwrap(), dir)
    }

    /// Store a session carrying `token`.
    pub fn sign_in(ctx: &Context, token: &str) {
        ctx.store
            .set_session(&Session::new(token, AdminProfile::named(USERNAME)))
            .unwrap();
    }

    pub fn rendered(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }
}
