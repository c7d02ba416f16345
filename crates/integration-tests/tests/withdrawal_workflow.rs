//! Approve/reject with reload-after-mutation over real HTTP.

#![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

use payflow_admin::session::MemorySessionStore;
use payflow_admin::viewmodel::row_actions;
use payflow_admin::{AdminApi, AdminScreen, AdminTab, Mount, Session, WorkflowError};
use payflow_core::{AdminProfile, StatusFilter, WithdrawalId, WithdrawalStatus};
use payflow_integration_tests::{FakeBackend, PROCESSED_AT, TOKEN, USERNAME};
use serde_json::json;

fn store() -> MemorySessionStore {
    MemorySessionStore::with_session(Session::new(TOKEN, AdminProfile::named(USERNAME)))
}

macro_rules! mounted {
    ($client:expr, $store:expr) => {
        match AdminScreen::mount($client, $store, AdminTab::Withdrawals) {
            Mount::Admin(screen) => *screen,
            Mount::Redirect(route) => panic!("unexpected redirect to {route:?}"),
        }
    };
}

#[tokio::test]
async fn test_approve_sends_put_then_reloads() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let store = store();
    let mut screen = mounted!(&client, &store);
    screen.reload_withdrawals().await.unwrap();
    backend.clear_requests();

    let report = screen.approve(WithdrawalId::new(1), None).await.unwrap();

    assert!(report.applied());
    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(
        requests[0].body.clone().unwrap(),
        json!({ "id": 1, "status": "approved" })
    );
    assert_eq!((requests[1].method.as_str(), requests[1].path.as_str()), ("GET", "/withdrawals"));

    let row = screen.withdrawals().get(WithdrawalId::new(1)).unwrap();
    assert_eq!(row.status, WithdrawalStatus::Approved);
    assert_eq!(row.processed_at.as_deref(), Some(PROCESSED_AT));
    assert!(row_actions(row).is_empty());
}

#[tokio::test]
async fn test_reject_with_notes() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let store = store();
    let mut screen = mounted!(&client, &store);
    screen.reload_withdrawals().await.unwrap();

    screen
        .reject(WithdrawalId::new(2), Some("Card details do not match".to_string()))
        .await
        .unwrap();

    let put = &backend.requests_to("PUT", "/withdrawals")[0];
    assert_eq!(
        put.body.clone().unwrap(),
        json!({ "id": 2, "status": "rejected", "notes": "Card details do not match" })
    );
    let row = screen.withdrawals().get(WithdrawalId::new(2)).unwrap();
    assert_eq!(row.status, WithdrawalStatus::Rejected);
    assert_eq!(row.notes(), Some("Card details do not match"));
}

#[tokio::test]
async fn test_decided_row_is_refused_locally() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let store = store();
    let mut screen = mounted!(&client, &store);
    screen.reload_withdrawals().await.unwrap();
    backend.clear_requests();

    let err = screen.reject(WithdrawalId::new(3), None).await.unwrap_err();

    assert!(matches!(err, WorkflowError::NotPending { .. }));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_server_decides_races() {
    // Another operator approved request 1 after our list was loaded
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let store = store();
    let mut screen = mounted!(&client, &store);
    screen.reload_withdrawals().await.unwrap();
    backend.set_status(1, WithdrawalStatus::Approved);

    let report = screen.reject(WithdrawalId::new(1), None).await.unwrap();

    // No version check: the last decision wins and the reload shows it
    assert!(report.applied());
    assert_eq!(
        backend.withdrawal(1).unwrap().status,
        WithdrawalStatus::Rejected
    );
    assert_eq!(
        screen.withdrawals().get(WithdrawalId::new(1)).unwrap().status,
        WithdrawalStatus::Rejected
    );
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_rows() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let store = store();
    let mut screen = mounted!(&client, &store);
    screen.reload_withdrawals().await.unwrap();

    backend.fail_withdrawals(true);
    let report = screen.approve(WithdrawalId::new(1), None).await.unwrap();

    assert!(report.applied());
    assert!(report.reload.is_err());
    // The PUT landed but the list still shows what the last good fetch said
    assert_eq!(
        screen.withdrawals().get(WithdrawalId::new(1)).unwrap().status,
        WithdrawalStatus::Pending
    );
    assert_eq!(
        screen.withdrawals().snapshot().error(),
        Some("Database configuration error")
    );
    assert!(screen.notices().has_errors());
}

#[tokio::test]
async fn test_status_filter_reaches_the_service() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let session = Session::new(TOKEN, AdminProfile::named(USERNAME));

    let pending = client
        .fetch_withdrawals(&session, StatusFilter::Only(WithdrawalStatus::Pending))
        .await
        .unwrap();

    assert_eq!(pending.len(), 2);
    assert_eq!(
        backend.requests()[0].query.as_deref(),
        Some("status=pending")
    );
}
