//! API client for the campaign backend
//!
//! Single point of contact with the remote service. Every request:
//! - carries `Authorization: Bearer <token>` when the token source has one
//! - is checked for 401 before anything else; a 401 on a request that
//!   carried a token signals the injected expiry listener once per rejected
//!   token, then fails with `ConsoleError::SessionExpired` (never retried)
//! - fails with `HttpStatus` on any other non-2xx
//!
//! The client never touches session state itself; it only signals.

use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use super::events::{SessionExpiryListener, TokenSource};
use super::models::{
    BalanceResponse, CampaignStats, CampaignSummary, DomainRecord, LoginResponse, RawStats,
    UploadRequest, UploadUrlResponse,
};
use super::transport::{Body, HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::errors::{ConsoleError, Result};
use crate::validation::{require_non_empty, validate_login};

/// How a request authenticates and what a 401 on it means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    /// Bearer token attached; 401 = session expired
    Session,
    /// Credential exchange (login/register); 401 = bad credentials
    Credentials,
    /// Presigned URL; no Authorization header, status passed through
    Presigned,
}

pub struct ApiClient {
    api_base: String,
    auth_base: String,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenSource>,
    listener: Option<Arc<dyn SessionExpiryListener>>,
    /// Token of the last 401 that was signalled
    last_rejected: Mutex<Option<String>>,
}

impl ApiClient {
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use sesc_core::api::{ApiClient, MockAuthBackend, StaticToken};
    ///
    /// let client = ApiClient::new(
    ///     "https://api.example.com/prod",
    ///     Arc::new(MockAuthBackend::new()),
    ///     Arc::new(StaticToken(None)),
    /// );
    /// assert_eq!(client.api_base(), "https://api.example.com/prod");
    /// ```
    pub fn new(
        api_base: impl Into<String>,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        let api_base = trim_base(api_base.into());
        ApiClient {
            auth_base: api_base.clone(),
            api_base,
            transport,
            tokens,
            listener: None,
            last_rejected: Mutex::new(None),
        }
    }

    /// Use a separate base URL for `/auth/*` endpoints
    pub fn with_auth_base(mut self, auth_base: impl Into<String>) -> Self {
        self.auth_base = trim_base(auth_base.into());
        self
    }

    pub fn with_expiry_listener(mut self, listener: Arc<dyn SessionExpiryListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn auth_base(&self) -> &str {
        &self.auth_base
    }

    async fn send(&self, method: HttpMethod, url: String, body: Body, mode: AuthMode) -> Result<HttpResponse> {
        let token = match mode {
            AuthMode::Session => self.tokens.current_token(),
            AuthMode::Credentials | AuthMode::Presigned => None,
        };

        let mut headers = Vec::new();
        if mode != AuthMode::Presigned {
            headers.push(("Accept".to_string(), "application/json".to_string()));
        }
        if let Some(token) = &token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        debug!(?method, %url, authenticated = token.is_some(), "api request");
        let response = self
            .transport
            .send(HttpRequest { method, url, headers, body })
            .await?;

        if response.status == 401 {
            match mode {
                AuthMode::Session => {
                    self.signal_expired(token);
                    return Err(ConsoleError::SessionExpired);
                }
                AuthMode::Credentials => {
                    return Err(ConsoleError::InvalidCredentials(response.error_message()));
                }
                AuthMode::Presigned => {}
            }
        }

        Ok(response)
    }

    async fn request_ok(&self, method: HttpMethod, url: String, body: Body, mode: AuthMode) -> Result<HttpResponse> {
        let response = self.send(method, url, body, mode).await?;
        if !response.is_success() {
            return Err(ConsoleError::HttpStatus {
                status: response.status,
                message: response.error_message(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .request_ok(HttpMethod::Get, self.api_url(path), Body::Empty, AuthMode::Session)
            .await?;
        parse_json(&response)
    }

    /// Invoke the listener unless this exact token was already reported
    ///
    /// An anonymous 401 has no session behind it and signals nothing; this
    /// also covers requests that were issued after the store already cleared
    /// the token.
    fn signal_expired(&self, token: Option<String>) {
        let Some(token) = token else {
            debug!("401 on anonymous request");
            return;
        };

        let fire = {
            let mut last = self.last_rejected.lock().unwrap_or_else(PoisonError::into_inner);
            if last.as_deref() == Some(token.as_str()) {
                false
            } else {
                *last = Some(token.clone());
                true
            }
        };

        if fire {
            warn!("backend rejected credentials (401), signalling session expiry");
            if let Some(listener) = &self.listener {
                listener.on_session_expired(&token);
            }
        } else {
            debug!("401 for an already-reported token");
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}{}", self.auth_base, path)
    }

    /// Remaining email send balance (0 when the backend omits it)
    pub async fn get_balance(&self) -> Result<f64> {
        let response: BalanceResponse = self.get_json("/balance").await?;
        Ok(response.balance.unwrap_or(0.0))
    }

    /// Create a campaign and get a presigned URL for its contact CSV
    pub async fn get_upload_url(&self, file_name: &str, subject: &str, body: &str) -> Result<String> {
        let file_name = require_non_empty(file_name, "campaign file name")?;
        let payload = serde_json::to_value(UploadRequest { file_name, subject, body })?;
        let response = self
            .request_ok(HttpMethod::Post, self.api_url("/upload"), Body::Json(payload), AuthMode::Session)
            .await?;
        let parsed: UploadUrlResponse = parse_json(&response)?;
        Ok(parsed.upload_url)
    }

    /// PUT the contact CSV to a presigned URL; returns whether storage accepted it
    pub async fn upload_to_s3(&self, presigned_url: &str, csv: Vec<u8>) -> Result<bool> {
        let response = self
            .send(
                HttpMethod::Put,
                presigned_url.to_string(),
                Body::Raw {
                    content_type: "text/csv".to_string(),
                    bytes: csv,
                },
                AuthMode::Presigned,
            )
            .await?;
        Ok(response.is_success())
    }

    pub async fn get_stats(&self, file_name: &str) -> Result<CampaignStats> {
        let file_name = require_non_empty(file_name, "campaign file name")?;
        let path = format!("/stats?fileName={}", urlencoding::encode(file_name));
        let raw: RawStats = self.get_json(&path).await?;
        Ok(raw.into())
    }

    pub async fn get_campaigns(&self) -> Result<Vec<CampaignSummary>> {
        self.get_json("/campaigns").await
    }

    pub async fn get_domains(&self) -> Result<Vec<DomainRecord>> {
        self.get_json("/domains").await
    }

    /// Submit a sending domain for verification
    pub async fn verify_domain(&self, domain: &str) -> Result<DomainRecord> {
        let domain = require_non_empty(domain, "domain")?;
        let response = self
            .request_ok(
                HttpMethod::Post,
                self.api_url("/domains/verify"),
                Body::Json(json!({ "domain": domain })),
                AuthMode::Session,
            )
            .await?;
        parse_json(&response)
    }

    /// Exchange email/password for a bearer token
    ///
    /// Form-encoded, as the auth service expects. A 401 here is
    /// `InvalidCredentials`, not an expired session.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        validate_login(email, password)?;
        let form = vec![
            ("username".to_string(), email.trim().to_string()),
            ("password".to_string(), password.to_string()),
        ];
        let response = self
            .request_ok(HttpMethod::Post, self.auth_url("/auth/login"), Body::Form(form), AuthMode::Credentials)
            .await?;
        parse_json(&response)
    }

    /// Create an account; does not log in
    pub async fn register(&self, email: &str, password: &str) -> Result<()> {
        self.request_ok(
            HttpMethod::Post,
            self.auth_url("/auth/register"),
            Body::Json(json!({ "email": email, "password": password })),
            AuthMode::Credentials,
        )
        .await?;
        Ok(())
    }
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

fn parse_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    serde_json::from_slice(&response.body)
        .map_err(|e| ConsoleError::Parse(format!("Failed to parse response: {}", e)))
}
