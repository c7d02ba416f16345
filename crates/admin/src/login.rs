//! Login screen logic.

use secrecy::SecretString;
use tracing::{info, instrument, warn};

use crate::api::AdminApi;
use crate::controller::{AdminTab, Route};
use crate::notify::{Notice, Notifications};
use crate::session::SessionStore;

/// Credentials typed into the login form.
pub struct LoginForm {
    pub username: String,
    pub password: SecretString,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl LoginForm {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Submit the login form.
///
/// On success the session is stored, a welcome notice is queued and the
/// admin dashboard is returned. On any failure nothing is stored, an error
/// notice is queued and the login screen is returned.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn submit<A: AdminApi, S: SessionStore>(
    api: &A,
    store: &S,
    form: &LoginForm,
    notices: &mut Notifications,
) -> Route {
    let session = match api.login(form.username.trim(), &form.password).await {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "Login failed");
            notices.push(Notice::from_client_error("Login failed", &e));
            return Route::Login;
        }
    };

    if let Err(e) = store.set_session(&session) {
        warn!(error = %e, "Failed to store session");
        notices.push(Notice::error("Login failed", e.to_string()));
        return Route::Login;
    }

    info!(user = %session.user.username, "Signed in");
    notices.push(Notice::success(
        "Signed in",
        format!("Welcome, {}!", session.user.username),
    ));
    Route::Admin(AdminTab::Dashboard)
}
