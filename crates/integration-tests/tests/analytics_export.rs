//! Concurrent refresh, analytics decoding and the Excel export.

#![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

use std::time::Duration;

use payflow_admin::api::report_file_name;
use payflow_admin::session::MemorySessionStore;
use payflow_admin::viewmodel::{AnalyticsModel, ExportOutcome};
use payflow_admin::views::render_analytics;
use payflow_admin::{AdminApi, AdminScreen, AdminTab, Mount, Session};
use payflow_core::AdminProfile;
use payflow_integration_tests::{FakeBackend, REPORT_BYTES, TOKEN, USERNAME, sample_analytics};
use rust_decimal::Decimal;
use serde_json::json;

fn session() -> Session {
    Session::new(TOKEN, AdminProfile::named(USERNAME))
}

#[tokio::test]
async fn test_one_failing_fetch_leaves_the_other() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let store = MemorySessionStore::with_session(session());
    let Mount::Admin(mut screen) = AdminScreen::mount(&client, &store, AdminTab::Dashboard) else {
        panic!("expected the admin screen");
    };

    backend.fail_analytics(true);
    let report = screen.refresh().await;

    assert!(report.withdrawals.is_ok());
    assert!(report.analytics.is_err());
    assert_eq!(screen.withdrawals().rows().len(), 3);
    assert!(screen.analytics().data().is_none());
    assert!(screen.analytics().snapshot().error().is_some());

    backend.fail_analytics(false);
    backend.fail_withdrawals(true);
    let report = screen.refresh().await;

    assert!(report.withdrawals.is_err());
    assert_eq!(screen.withdrawals().rows().len(), 3);
    assert_eq!(
        screen.analytics().data().unwrap().stats.total_withdrawals,
        3
    );
}

#[tokio::test]
async fn test_null_aggregates_read_as_zero() {
    let backend = FakeBackend::start().await;
    backend.set_analytics(json!({
        "stats": {
            "totalWithdrawals": 0,
            "pendingCount": null,
            "approvedCount": null,
            "rejectedCount": null,
            "totalAmount": null,
            "approvedAmount": null,
            "avgAmount": null
        },
        "monthly": [],
        "byMethod": [],
        "topUsers": []
    }));

    let snapshot = backend.client().fetch_analytics(&session()).await.unwrap();

    assert_eq!(snapshot.stats.pending_count, 0);
    assert_eq!(snapshot.stats.total_amount, Decimal::ZERO);
    assert!(snapshot.stats.approval_rate().is_none());
}

#[tokio::test]
async fn test_method_chart_follows_breakdown() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let mut model = AnalyticsModel::new();
    model.reload(&client, &session()).await.unwrap();

    let mut out = Vec::new();
    render_analytics(&mut out, &model).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("By method"));
    assert!(text.contains("QIWI"));

    let mut empty = sample_analytics();
    empty["byMethod"] = json!([]);
    backend.set_analytics(empty);
    model.reload(&client, &session()).await.unwrap();

    let mut out = Vec::new();
    render_analytics(&mut out, &model).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains("By method"));
    assert!(text.contains("Maria Sidorova"));
}

#[tokio::test]
async fn test_export_saves_dated_report() {
    let backend = FakeBackend::start().await;
    let client = backend.client();
    let dir = tempfile::tempdir().unwrap();
    let model = AnalyticsModel::new();

    let outcome = model.export(&client, &session(), dir.path()).await.unwrap();

    let ExportOutcome::Saved(path) = outcome else {
        panic!("expected a saved report");
    };
    let expected = report_file_name(chrono::Local::now().date_naive());
    assert_eq!(path, dir.path().join(expected));
    assert_eq!(std::fs::read(&path).unwrap(), REPORT_BYTES);
    assert_eq!(
        backend.requests()[0].query.as_deref(),
        Some("format=excel")
    );
}

#[tokio::test]
async fn test_double_export_issues_one_request() {
    let backend = FakeBackend::start().await;
    backend.set_export_delay(Duration::from_millis(100));
    let client = backend.client();
    let dir = tempfile::tempdir().unwrap();
    let model = AnalyticsModel::new();
    let session = session();

    let (first, second) = tokio::join!(
        model.export(&client, &session, dir.path()),
        model.export(&client, &session, dir.path()),
    );

    assert!(matches!(first.unwrap(), ExportOutcome::Saved(_)));
    assert_eq!(second.unwrap(), ExportOutcome::AlreadyRunning);
    assert_eq!(backend.requests_to("GET", "/analytics").len(), 1);
}

#[tokio::test]
async fn test_failed_export_reports_server_message() {
    let backend = FakeBackend::start().await;
    backend.fail_analytics(true);
    let client = backend.client();
    let store = MemorySessionStore::with_session(session());
    let dir = tempfile::tempdir().unwrap();
    let Mount::Admin(mut screen) = AdminScreen::mount(&client, &store, AdminTab::Analytics) else {
        panic!("expected the admin screen");
    };

    assert!(screen.export(dir.path()).await.is_err());

    let notice = &screen.notices().pending()[0];
    assert_eq!(notice.title, "Export failed");
    assert_eq!(notice.description, "Database configuration error");
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}
