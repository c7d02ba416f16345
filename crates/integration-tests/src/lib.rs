//! Integration tests for the PayFlow admin console.
//!
//! [`FakeBackend`] serves the three PayFlow endpoints from memory on a
//! random local port, records every request it sees, and can be told to
//! fail. Tests drive the real [`PayflowClient`] and view-models against it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p payflow-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use payflow_admin::AdminConfig;
use payflow_admin::api::{AUTH_HEADER, PayflowClient};
use payflow_admin::config::Endpoints;
use payflow_core::{WithdrawalId, WithdrawalRequest, WithdrawalStatus};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Token handed out for the valid credentials.
pub const TOKEN: &str = "test-token";
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "admin123";

/// Decision time stamped on every status update, in the service's
/// `YYYY-MM-DD HH:MM` format.
pub const PROCESSED_AT: &str = "2026-03-01 12:00";

/// Bytes served as the Excel report.
pub const REPORT_BYTES: &[u8] = b"PK\x03\x04fake-xlsx";

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A request the backend received.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub token: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct BackendState {
    withdrawals: Mutex<Vec<WithdrawalRequest>>,
    analytics: Mutex<Value>,
    requests: Mutex<Vec<Recorded>>,
    fail_withdrawals: AtomicBool,
    fail_analytics: AtomicBool,
    export_delay: Mutex<Option<Duration>>,
}

impl BackendState {
    fn record(
        &self,
        method: &str,
        path: &str,
        query: Option<String>,
        headers: &HeaderMap,
        body: Option<Value>,
    ) {
        let token = headers
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        self.requests.lock().unwrap().push(Recorded {
            method: method.to_string(),
            path: path.to_string(),
            query,
            token,
            body,
        });
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn authorized(headers: &HeaderMap) -> Result<(), Response> {
    match headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok()) {
        Some(TOKEN) => Ok(()),
        Some(_) => Err(error(StatusCode::UNAUTHORIZED, "Invalid token")),
        None => Err(error(StatusCode::UNAUTHORIZED, "Token required")),
    }
}

fn admin_user() -> Value {
    json!({ "id": 1, "username": USERNAME, "email": "admin@payflow.local" })
}

#[derive(Deserialize)]
struct Credentials {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

async fn login(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    // Never record the password
    let mut recorded = body.clone();
    if let Some(obj) = recorded.as_object_mut() {
        obj.remove("password");
    }
    state.record("POST", "/auth", None, &headers, Some(recorded));

    let credentials: Credentials = match serde_json::from_value(body) {
        Ok(c) => c,
        Err(_) => return error(StatusCode::BAD_REQUEST, "Invalid request body"),
    };
    if credentials.username == USERNAME && credentials.password == PASSWORD {
        Json(json!({ "token": TOKEN, "user": admin_user() })).into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

async fn verify(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    state.record("GET", "/auth", None, &headers, None);
    if let Err(response) = authorized(&headers) {
        return response;
    }
    Json(json!({ "valid": true, "user": admin_user() })).into_response()
}

#[derive(Deserialize)]
struct ListQuery {
    status: Option<String>,
}

async fn list_withdrawals(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    state.record(
        "GET",
        "/withdrawals",
        query.status.as_ref().map(|s| format!("status={s}")),
        &headers,
        None,
    );
    if let Err(response) = authorized(&headers) {
        return response;
    }
    if state.fail_withdrawals.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Database configuration error");
    }

    let filter = query
        .status
        .filter(|s| s != "all")
        .and_then(|s| WithdrawalStatus::from_str(&s).ok());
    let withdrawals: Vec<WithdrawalRequest> = state
        .withdrawals
        .lock()
        .unwrap()
        .iter()
        .filter(|w| filter.is_none_or(|status| w.status == status))
        .cloned()
        .collect();
    Json(json!({ "withdrawals": withdrawals })).into_response()
}

#[derive(Deserialize)]
struct UpdateBody {
    id: Option<WithdrawalId>,
    status: Option<WithdrawalStatus>,
    notes: Option<String>,
}

async fn update_withdrawal(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("PUT", "/withdrawals", None, &headers, Some(body.clone()));
    if let Err(response) = authorized(&headers) {
        return response;
    }

    let Ok(UpdateBody {
        id: Some(id),
        status: Some(status),
        notes,
    }) = serde_json::from_value::<UpdateBody>(body)
    else {
        return error(StatusCode::BAD_REQUEST, "Missing id or status");
    };
    if status.is_pending() {
        return error(StatusCode::BAD_REQUEST, "Invalid status");
    }

    let mut withdrawals = state.withdrawals.lock().unwrap();
    let Some(row) = withdrawals.iter_mut().find(|w| w.id == id) else {
        return error(StatusCode::NOT_FOUND, "Withdrawal not found");
    };
    // Last writer wins
    row.status = status;
    row.notes = Some(notes.unwrap_or_default());
    row.processed_at = Some(PROCESSED_AT.to_string());

    Json(json!({ "success": true, "message": format!("Withdrawal {status}") })).into_response()
}

#[derive(Deserialize)]
struct AnalyticsQuery {
    format: Option<String>,
}

async fn analytics(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(query): Query<AnalyticsQuery>,
) -> Response {
    state.record(
        "GET",
        "/analytics",
        query.format.as_ref().map(|f| format!("format={f}")),
        &headers,
        None,
    );
    if let Err(response) = authorized(&headers) {
        return response;
    }
    if state.fail_analytics.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Database configuration error");
    }

    if query.format.as_deref() == Some("excel") {
        let delay = *state.export_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        return (
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=analytics.xlsx",
                ),
            ],
            REPORT_BYTES,
        )
            .into_response();
    }

    Json(state.analytics.lock().unwrap().clone()).into_response()
}

/// In-memory PayFlow backend bound to `127.0.0.1` on a random port.
///
/// The server task is aborted when the backend is dropped.
pub struct FakeBackend {
    addr: SocketAddr,
    state: Arc<BackendState>,
    task: JoinHandle<()>,
}

impl FakeBackend {
    /// Start a backend seeded with [`sample_withdrawals`] and
    /// [`sample_analytics`].
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        *state.withdrawals.lock().unwrap() = sample_withdrawals();
        *state.analytics.lock().unwrap() = sample_analytics();

        let app = Router::new()
            .route("/auth", get(verify).post(login))
            .route("/withdrawals", get(list_withdrawals).put(update_withdrawal))
            .route("/analytics", get(analytics))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state, task }
    }

    fn url(&self, path: &str) -> Url {
        Url::parse(&format!("http://{}{path}", self.addr)).unwrap()
    }

    #[must_use]
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            auth: self.url("/auth"),
            withdrawals: self.url("/withdrawals"),
            analytics: self.url("/analytics"),
        }
    }

    /// Console configuration pointing at this backend.
    #[must_use]
    pub fn config(&self) -> AdminConfig {
        AdminConfig::with_endpoints(self.endpoints())
    }

    #[must_use]
    pub fn client(&self) -> PayflowClient {
        PayflowClient::new(&self.config()).unwrap()
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests matching `method` and `path`.
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn clear_requests(&self) {
        self.state.requests.lock().unwrap().clear();
    }

    /// The server-side copy of a withdrawal.
    #[must_use]
    pub fn withdrawal(&self, id: i32) -> Option<WithdrawalRequest> {
        self.state
            .withdrawals
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.id == WithdrawalId::new(id))
            .cloned()
    }

    /// Change a row behind the console's back.
    pub fn set_status(&self, id: i32, status: WithdrawalStatus) {
        if let Some(row) = self
            .state
            .withdrawals
            .lock()
            .unwrap()
            .iter_mut()
            .find(|w| w.id == WithdrawalId::new(id))
        {
            row.status = status;
        }
    }

    pub fn set_analytics(&self, analytics: Value) {
        *self.state.analytics.lock().unwrap() = analytics;
    }

    pub fn fail_withdrawals(&self, fail: bool) {
        self.state.fail_withdrawals.store(fail, Ordering::SeqCst);
    }

    pub fn fail_analytics(&self, fail: bool) {
        self.state.fail_analytics.store(fail, Ordering::SeqCst);
    }

    pub fn set_export_delay(&self, delay: Duration) {
        *self.state.export_delay.lock().unwrap() = Some(delay);
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn request(
    id: i32,
    user: &str,
    email: &str,
    amount: i64,
    status: WithdrawalStatus,
    method: &str,
    date: (i32, u32, u32),
) -> WithdrawalRequest {
    WithdrawalRequest {
        id: WithdrawalId::new(id),
        user: user.to_string(),
        email: email.to_string(),
        amount: Decimal::from(amount),
        status,
        method: method.to_string(),
        payment_details: String::new(),
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        notes: None,
        processed_at: None,
    }
}

/// Three requests: two pending, one approved.
#[must_use]
pub fn sample_withdrawals() -> Vec<WithdrawalRequest> {
    vec![
        request(
            1,
            "Ivan Petrov",
            "ivan@example.com",
            5000,
            WithdrawalStatus::Pending,
            "Bank card",
            (2026, 2, 28),
        ),
        request(
            2,
            "Maria Sidorova",
            "maria@example.com",
            12000,
            WithdrawalStatus::Pending,
            "QIWI",
            (2026, 2, 27),
        ),
        request(
            3,
            "Alexey Ivanov",
            "alex@example.com",
            3500,
            WithdrawalStatus::Approved,
            "YooMoney",
            (2026, 2, 26),
        ),
    ]
}

/// Analytics matching [`sample_withdrawals`].
#[must_use]
pub fn sample_analytics() -> Value {
    json!({
        "stats": {
            "totalWithdrawals": 3,
            "pendingCount": 2,
            "approvedCount": 1,
            "rejectedCount": 0,
            "totalAmount": 20500.0,
            "approvedAmount": 3500.0,
            "avgAmount": 6833.33
        },
        "monthly": [
            { "month": "2026-02", "count": 3, "total": 20500.0 }
        ],
        "byMethod": [
            { "method": "QIWI", "count": 1, "total": 12000.0 },
            { "method": "Bank card", "count": 1, "total": 5000.0 },
            { "method": "YooMoney", "count": 1, "total": 3500.0 }
        ],
        "topUsers": [
            { "name": "Maria Sidorova", "email": "maria@example.com", "withdrawalCount": 1, "totalAmount": 12000.0 },
            { "name": "Ivan Petrov", "email": "ivan@example.com", "withdrawalCount": 1, "totalAmount": 5000.0 }
        ]
    })
}
