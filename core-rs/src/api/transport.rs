//! HTTP transport for the API client
//!
//! The client builds [`HttpRequest`] values and hands them to a
//! [`Transport`]. Production uses [`ReqwestTransport`]; tests plug in
//! scripted transports or the [`MockAuthBackend`](super::MockAuthBackend).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::errors::{ConsoleError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// Request body, encoded by the transport
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(JsonValue),
    Form(Vec<(String, String)>),
    Raw { content_type: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl HttpRequest {
    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Path component of the URL, without query string
    pub fn path(&self) -> &str {
        let without_scheme = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.url);
        let path = without_scheme
            .find('/')
            .map(|idx| &without_scheme[idx..])
            .unwrap_or("/");
        path.split('?').next().unwrap_or(path)
    }

    /// Query parameter value (not decoded)
    pub fn query_param(&self, name: &str) -> Option<&str> {
        let (_, query) = self.url.split_once('?')?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn json(status: u16, body: &JsonValue) -> Self {
        HttpResponse {
            status,
            reason: String::new(),
            body: body.to_string().into_bytes(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Best-effort error text: `detail`/`message`/`error` field of a JSON
    /// body, else the reason phrase
    pub fn error_message(&self) -> String {
        if let Ok(value) = serde_json::from_slice::<JsonValue>(&self.body) {
            for field in ["detail", "message", "error"] {
                if let Some(text) = value.get(field).and_then(JsonValue::as_str) {
                    return text.to_string();
                }
            }
        }
        if self.reason.is_empty() {
            format!("status {}", self.status)
        } else {
            self.reason.clone()
        }
    }
}

/// Sends one request and returns whatever response came back
///
/// Implementations return `ConsoleError::Network` only when no response was
/// received; every HTTP status, 4xx/5xx included, is a successful send.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConsoleError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(ReqwestTransport { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Form(pairs) => builder.form(&pairs),
            Body::Raw { content_type, bytes } => builder
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(bytes),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ConsoleError::Network(e.to_string()))?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| ConsoleError::Network(format!("Failed to read response body: {}", e)))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason,
            body: body.to_vec(),
        })
    }
}
