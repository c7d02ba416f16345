//! Sign-in and session gating over real HTTP.

#![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

use payflow_admin::login::{LoginForm, submit};
use payflow_admin::notify::Notifications;
use payflow_admin::session::MemorySessionStore;
use payflow_admin::{
    AdminApi, AdminScreen, AdminTab, ClientError, FileSessionStore, Mount, Route, Session,
    SessionStore,
};
use payflow_core::AdminProfile;
use payflow_integration_tests::{FakeBackend, PASSWORD, TOKEN, USERNAME};
use secrecy::{ExposeSecret, SecretString};

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_valid_login_persists_session() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));
    let mut notices = Notifications::new();

    let route = submit(&client, &store, &LoginForm::new(USERNAME, PASSWORD), &mut notices).await;

    assert_eq!(route, Route::Admin(AdminTab::Dashboard));
    assert_eq!(notices.pending()[0].description, "Welcome, admin!");

    // A fresh store over the same file sees the session
    let reopened = FileSessionStore::new(dir.path().join("session.json"));
    let session = reopened.load().unwrap().unwrap();
    assert_eq!(session.token.expose_secret(), TOKEN);
    assert_eq!(session.user.email.as_deref(), Some("admin@payflow.local"));

    let body = backend.requests_to("POST", "/auth")[0].body.clone().unwrap();
    assert_eq!(body["username"], USERNAME);
}

#[tokio::test]
async fn test_invalid_login_surfaces_server_message() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let store = MemorySessionStore::new();
    let mut notices = Notifications::new();

    let route = submit(&client, &store, &LoginForm::new(USERNAME, "wrong"), &mut notices).await;

    assert_eq!(route, Route::Login);
    assert!(store.load().unwrap().is_none());
    let notice = &notices.pending()[0];
    assert!(notice.is_error());
    assert_eq!(notice.title, "Login failed");
    assert_eq!(notice.description, "Invalid credentials");
}

#[tokio::test]
async fn test_blank_credentials_never_reach_the_service() {
    let backend = FakeBackend::start().await;
    let client = backend.client();

    let result = client.login("  ", &SecretString::from("x")).await;

    assert!(matches!(result, Err(ClientError::InvalidInput(_))));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_unreachable_service_is_a_network_error() {
    let backend = FakeBackend::start().await;
    let config = backend.config();
    drop(backend);
    let client = payflow_admin::PayflowClient::new(&config).unwrap();
    let store = MemorySessionStore::new();
    let mut notices = Notifications::new();

    let route = submit(&client, &store, &LoginForm::new(USERNAME, PASSWORD), &mut notices).await;

    assert_eq!(route, Route::Login);
    assert_eq!(notices.pending()[0].title, "Network error");
    assert_eq!(
        notices.pending()[0].description,
        "Could not connect to the server"
    );
}

// =============================================================================
// Session gating
// =============================================================================

#[tokio::test]
async fn test_admin_without_session_redirects_before_any_request() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let store = MemorySessionStore::new();

    let mount = AdminScreen::mount(&client, &store, AdminTab::Withdrawals);

    assert!(matches!(mount, Mount::Redirect(Route::Login)));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_token_is_sent_in_header() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let store = MemorySessionStore::with_session(Session::new(TOKEN, AdminProfile::named(USERNAME)));

    let Mount::Admin(mut screen) = AdminScreen::mount(&client, &store, AdminTab::Dashboard) else {
        panic!("expected the admin screen");
    };
    assert!(screen.refresh().await.is_complete());

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.token.as_deref() == Some(TOKEN)));
}

#[tokio::test]
async fn test_rejected_token_sends_operator_back_to_login() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let store = MemorySessionStore::with_session(Session::new(
        "stale-token",
        AdminProfile::named(USERNAME),
    ));

    let Mount::Admin(mut screen) = AdminScreen::mount(&client, &store, AdminTab::Dashboard) else {
        panic!("expected the admin screen");
    };
    let report = screen.refresh().await;

    assert!(report.withdrawals.as_ref().unwrap_err().is_auth());
    assert_eq!(screen.route(), Route::Login);
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_verify_session() {
    let backend = FakeBackend::start().await;
    let client = backend.client();

    let profile = client
        .verify_session(&Session::new(TOKEN, AdminProfile::named(USERNAME)))
        .await
        .unwrap();
    assert_eq!(profile.username, USERNAME);

    let err = client
        .verify_session(&Session::new("nope", AdminProfile::named(USERNAME)))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Auth(ref m) if m == "Invalid token"));
}
