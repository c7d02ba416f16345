//! In-memory [`AdminApi`] for unit tests.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use payflow_core::{
    AdminProfile, AnalyticsSnapshot, MonthlyVolume, StatusFilter, WithdrawalId, WithdrawalRequest,
    WithdrawalStats, WithdrawalStatus,
};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};

use crate::api::{AdminApi, ExcelReport, StatusUpdate};
use crate::error::ClientError;
use crate::session::Session;

pub const TOKEN: &str = "test-token";
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "admin123";

/// A request the fake received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login(String),
    Verify,
    FetchWithdrawals(StatusFilter),
    Update(StatusUpdate),
    FetchAnalytics,
    Export,
}

#[derive(Default)]
pub struct FakeApi {
    withdrawals: Mutex<Vec<WithdrawalRequest>>,
    analytics: Mutex<AnalyticsSnapshot>,
    calls: Mutex<Vec<Call>>,
    ignore_updates: AtomicBool,
    fail_withdrawals: AtomicBool,
    fail_analytics: AtomicBool,
    fail_update: AtomicBool,
    fail_export: AtomicBool,
    reject_token: AtomicBool,
    offline: AtomicBool,
    export_delay: Mutex<Option<Duration>>,
}

impl FakeApi {
    pub fn with_withdrawals(withdrawals: Vec<WithdrawalRequest>) -> Self {
        let api = Self::default();
        *api.withdrawals.lock().unwrap() = withdrawals;
        api
    }

    pub fn set_analytics(&self, snapshot: AnalyticsSnapshot) {
        *self.analytics.lock().unwrap() = snapshot;
    }

    /// When false the service accepts `PUT`s without changing its list.
    pub fn set_apply_updates(&self, apply: bool) {
        self.ignore_updates.store(!apply, Ordering::SeqCst);
    }

    pub fn fail_withdrawals(&self, fail: bool) {
        self.fail_withdrawals.store(fail, Ordering::SeqCst);
    }

    pub fn fail_analytics(&self, fail: bool) {
        self.fail_analytics.store(fail, Ordering::SeqCst);
    }

    pub fn fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    pub fn fail_export(&self, fail: bool) {
        self.fail_export.store(fail, Ordering::SeqCst);
    }

    /// Answer every authenticated call with 401.
    pub fn reject_token(&self, reject: bool) {
        self.reject_token.store(reject, Ordering::SeqCst);
    }

    /// Fail every call before it reaches the service.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_export_delay(&self, delay: Duration) {
        *self.export_delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, session: &Session, call: Call) -> Result<(), ClientError> {
        if !session.has_token() {
            return Err(ClientError::MissingToken);
        }
        self.record(call);
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Network("connection refused".to_string()));
        }
        if self.reject_token.load(Ordering::SeqCst) {
            return Err(ClientError::Auth("Invalid token".to_string()));
        }
        Ok(())
    }
}

fn server_error() -> ClientError {
    ClientError::Server {
        status: 500,
        message: "boom".to_string(),
    }
}

impl AdminApi for FakeApi {
    async fn login(&self, username: &str, password: &SecretString) -> Result<Session, ClientError> {
        self.record(Call::Login(username.to_string()));
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Network("connection refused".to_string()));
        }
        if username == USERNAME && password.expose_secret() == PASSWORD {
            Ok(Session::new(TOKEN, AdminProfile::named(username)))
        } else {
            Err(ClientError::Auth("Invalid credentials".to_string()))
        }
    }

    async fn verify_session(&self, session: &Session) -> Result<AdminProfile, ClientError> {
        self.check(session, Call::Verify)?;
        Ok(session.user.clone())
    }

    async fn fetch_withdrawals(
        &self,
        session: &Session,
        filter: StatusFilter,
    ) -> Result<Vec<WithdrawalRequest>, ClientError> {
        self.check(session, Call::FetchWithdrawals(filter))?;
        if self.fail_withdrawals.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        let all = self.withdrawals.lock().unwrap().clone();
        Ok(match filter {
            StatusFilter::All => all,
            StatusFilter::Only(status) => all.into_iter().filter(|w| w.status == status).collect(),
        })
    }

    async fn update_withdrawal_status(
        &self,
        session: &Session,
        update: &StatusUpdate,
    ) -> Result<(), ClientError> {
        self.check(session, Call::Update(update.clone()))?;
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        if !self.ignore_updates.load(Ordering::SeqCst) {
            let mut rows = self.withdrawals.lock().unwrap();
            if let Some(row) = rows.iter_mut().find(|w| w.id == update.id) {
                row.status = update.status;
                row.notes.clone_from(&update.notes);
            }
        }
        Ok(())
    }

    async fn fetch_analytics(&self, session: &Session) -> Result<AnalyticsSnapshot, ClientError> {
        self.check(session, Call::FetchAnalytics)?;
        if self.fail_analytics.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(self.analytics.lock().unwrap().clone())
    }

    async fn export_analytics_excel(&self, session: &Session) -> Result<ExcelReport, ClientError> {
        self.check(session, Call::Export)?;
        let delay = *self.export_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_export.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(ExcelReport::dated(
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            b"PK\x03\x04xlsx".to_vec(),
        ))
    }
}

pub fn session() -> Session {
    Session::new(TOKEN, AdminProfile::named(USERNAME))
}

pub fn withdrawal(id: i32, status: WithdrawalStatus, amount: i64) -> WithdrawalRequest {
    WithdrawalRequest {
        id: WithdrawalId::new(id),
        user: format!("User {id}"),
        email: format!("user{id}@example.com"),
        amount: Decimal::from(amount),
        status,
        method: "Bank card".to_string(),
        payment_details: "**** 4242".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
        notes: None,
        processed_at: None,
    }
}

pub fn analytics() -> AnalyticsSnapshot {
    AnalyticsSnapshot {
        stats: WithdrawalStats {
            total_withdrawals: 4,
            pending_count: 1,
            approved_count: 2,
            rejected_count: 1,
            total_amount: Decimal::from(45000),
            approved_amount: Decimal::from(30000),
            avg_amount: Decimal::from_str("11250").unwrap(),
        },
        monthly: vec![
            MonthlyVolume {
                month: "2026-02".to_string(),
                count: 3,
                total: Decimal::from(40000),
            },
            MonthlyVolume {
                month: "2026-01".to_string(),
                count: 1,
                total: Decimal::from(5000),
            },
        ],
        by_method: Vec::new(),
        top_users: Vec::new(),
    }
}
