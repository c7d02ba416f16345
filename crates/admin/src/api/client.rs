//! HTTP implementation of [`AdminApi`].

use std::sync::Arc;

use payflow_core::{AdminProfile, AnalyticsSnapshot, StatusFilter, WithdrawalRequest};
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::AdminApi;
use super::types::{
    ErrorBody, ExcelReport, LoginRequest, LoginResponse, StatusUpdate, UpdateStatusResponse,
    VerifyResponse, WithdrawalsResponse,
};
use crate::config::{AdminConfig, Endpoints};
use crate::error::{ClientError, GENERIC_AUTH_FAILURE, GENERIC_SERVER_FAILURE};
use crate::session::Session;

/// Header carrying the session token.
pub const AUTH_HEADER: &str = "X-Auth-Token";

const USER_AGENT: &str = concat!("payflow-admin/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the PayFlow services.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct PayflowClient {
    inner: Arc<PayflowClientInner>,
}

struct PayflowClientInner {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl std::fmt::Debug for PayflowClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayflowClient")
            .field("endpoints", &self.inner.endpoints)
            .finish_non_exhaustive()
    }
}

impl PayflowClient {
    /// Create a client for the configured endpoints.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &AdminConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClientError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(PayflowClientInner {
                client,
                endpoints: config.endpoints.clone(),
            }),
        })
    }

    /// The endpoints this client talks to.
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.inner.endpoints
    }

    /// Attach the session token, refusing sessions without one.
    fn authorize(
        &self,
        request: RequestBuilder,
        session: &Session,
    ) -> Result<RequestBuilder, ClientError> {
        if !session.has_token() {
            return Err(ClientError::MissingToken);
        }
        Ok(request.header(AUTH_HEADER, session.token.expose_secret()))
    }

    /// Send a request, mapping transport failures to `Network`.
    async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
        Ok(request.send().await?)
    }

    /// Parse a success body, or turn the response into an error.
    async fn handle_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| ClientError::Decode(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response, GENERIC_SERVER_FAILURE).await)
    }

    /// Parse an error response.
    ///
    /// `401` is an auth problem; anything else is a server error. The
    /// `error` field of the body is used verbatim when present.
    async fn parse_error(response: Response, fallback: &str) -> ClientError {
        let status = response.status();
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
            .and_then(|body| body.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());

        warn!(status = status.as_u16(), error = %message, "PayFlow service returned an error");

        if status == StatusCode::UNAUTHORIZED {
            ClientError::Auth(message)
        } else {
            ClientError::Server {
                status: status.as_u16(),
                message,
            }
        }
    }
}

impl AdminApi for PayflowClient {
    #[instrument(skip(self, username, password), fields(username = %username))]
    async fn login(&self, username: &str, password: &SecretString) -> Result<Session, ClientError> {
        let password = password.expose_secret();
        if username.trim().is_empty() || password.is_empty() {
            return Err(ClientError::InvalidInput(
                "Username and password are required".to_string(),
            ));
        }

        let request = self
            .inner
            .client
            .post(self.inner.endpoints.auth.clone())
            .json(&LoginRequest { username, password });
        let response = Self::send(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(match Self::parse_error(response, GENERIC_AUTH_FAILURE).await {
                ClientError::Server { status, message } if status < 500 => {
                    ClientError::Auth(message)
                }
                other => other,
            });
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(format!("Failed to parse login response: {e}")))?;

        let session = Session::new(body.token, body.user);
        if !session.has_token() {
            return Err(ClientError::Decode(
                "Login response carried an empty token".to_string(),
            ));
        }

        debug!(user = %session.user.username, "Logged in");
        Ok(session)
    }

    #[instrument(skip(self, session))]
    async fn verify_session(&self, session: &Session) -> Result<AdminProfile, ClientError> {
        let request = self.authorize(
            self.inner.client.get(self.inner.endpoints.auth.clone()),
            session,
        )?;
        let response = Self::send(request).await?;
        let body: VerifyResponse = Self::handle_json(response).await?;

        if !body.valid {
            return Err(ClientError::Auth("Invalid token".to_string()));
        }
        Ok(body.user)
    }

    #[instrument(skip(self, session, filter), fields(filter = filter.as_query()))]
    async fn fetch_withdrawals(
        &self,
        session: &Session,
        filter: StatusFilter,
    ) -> Result<Vec<WithdrawalRequest>, ClientError> {
        let mut url = self.inner.endpoints.withdrawals.clone();
        if filter != StatusFilter::All {
            url.query_pairs_mut().append_pair("status", filter.as_query());
        }

        let request = self.authorize(self.inner.client.get(url), session)?;
        let response = Self::send(request).await?;
        let body: WithdrawalsResponse = Self::handle_json(response).await?;

        debug!(count = body.withdrawals.len(), "Fetched withdrawals");
        Ok(body.withdrawals)
    }

    #[instrument(skip(self, session, update), fields(id = %update.id, status = %update.status))]
    async fn update_withdrawal_status(
        &self,
        session: &Session,
        update: &StatusUpdate,
    ) -> Result<(), ClientError> {
        let request = self.authorize(
            self.inner
                .client
                .put(self.inner.endpoints.withdrawals.clone())
                .json(update),
            session,
        )?;
        let response = Self::send(request).await?;
        let body: UpdateStatusResponse = Self::handle_json(response).await?;

        if !body.success {
            return Err(ClientError::Server {
                status: StatusCode::OK.as_u16(),
                message: body
                    .message
                    .unwrap_or_else(|| GENERIC_SERVER_FAILURE.to_string()),
            });
        }

        debug!(message = ?body.message, "Withdrawal status updated");
        Ok(())
    }

    #[instrument(skip(self, session))]
    async fn fetch_analytics(&self, session: &Session) -> Result<AnalyticsSnapshot, ClientError> {
        let request = self.authorize(
            self.inner.client.get(self.inner.endpoints.analytics.clone()),
            session,
        )?;
        let response = Self::send(request).await?;
        Self::handle_json(response).await
    }

    #[instrument(skip(self, session))]
    async fn export_analytics_excel(&self, session: &Session) -> Result<ExcelReport, ClientError> {
        let mut url = self.inner.endpoints.analytics.clone();
        url.query_pairs_mut().append_pair("format", "excel");

        let request = self.authorize(self.inner.client.get(url), session)?;
        let response = Self::send(request).await?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response, GENERIC_SERVER_FAILURE).await);
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));
        if is_json {
            return Err(ClientError::Decode(
                "Expected a spreadsheet, got JSON".to_string(),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ClientError::Decode("Export returned an empty file".to_string()));
        }

        let report = ExcelReport::dated(chrono::Local::now().date_naive(), bytes.to_vec());
        debug!(file = %report.file_name, len = report.bytes.len(), "Downloaded analytics report");
        Ok(report)
    }
}
