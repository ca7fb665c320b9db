//! HTTP client adapter for the Trove REST API
//!
//! Managers talk to the service through the [`HttpClient`] trait so tests can
//! swap the network for an in-memory fake. The adapter only moves bytes: it
//! decodes JSON bodies but never interprets status codes, which is left to
//! [`crate::error::check_response`].

use std::time::Duration;

use async_trait::async_trait;
pub use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result};

/// Maximum length of response body to log
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Status and decoded body of one HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// `None` when the server sent an empty body
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }
}

/// Transport used by every manager
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue one request; `url` is a path relative to the service endpoint
    async fn request(&self, method: Method, url: &str, body: Option<&Value>)
    -> Result<ApiResponse>;

    async fn get(&self, url: &str) -> Result<ApiResponse> {
        self.request(Method::GET, url, None).await
    }

    async fn post(&self, url: &str, body: Option<&Value>) -> Result<ApiResponse> {
        self.request(Method::POST, url, body).await
    }

    async fn put(&self, url: &str, body: Option<&Value>) -> Result<ApiResponse> {
        self.request(Method::PUT, url, body).await
    }

    async fn patch(&self, url: &str, body: Option<&Value>) -> Result<ApiResponse> {
        self.request(Method::PATCH, url, body).await
    }

    async fn delete(&self, url: &str) -> Result<ApiResponse> {
        self.request(Method::DELETE, url, None).await
    }
}

/// Truncate a body and strip control characters before it reaches the logs
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..end],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Builder for [`ReqwestClient`]
#[derive(Debug, Clone)]
pub struct ReqwestClientBuilder {
    endpoint: String,
    token: Option<String>,
    insecure: bool,
    timeout: Option<Duration>,
}

impl ReqwestClientBuilder {
    /// Send `X-Auth-Token` with every request
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Accept invalid TLS certificates
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ReqwestClient> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(token).map_err(|e| ApiError::Command(format!(
                "Invalid auth token: {}",
                e
            )))?;
            value.set_sensitive(true);
            headers.insert("X-Auth-Token", value);
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("trovectl/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        if self.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ReqwestClient {
            client: builder.build()?,
            endpoint: self.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

/// [`HttpClient`] backed by reqwest
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ReqwestClient {
    /// Start building a client for the versioned service endpoint
    /// (for example `https://trove.example.com/v1.0/<tenant>`)
    pub fn builder(endpoint: impl Into<String>) -> ReqwestClientBuilder {
        ReqwestClientBuilder {
            endpoint: endpoint.into(),
            token: None,
            insecure: false,
            timeout: None,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.endpoint, url)
        } else {
            format!("{}/{}", self.endpoint, url)
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let full_url = self.absolute_url(url);
        debug!("{} {}", method, full_url);

        let mut request = self.client.request(method.clone(), &full_url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        if status >= 400 {
            debug!(
                "{} {} returned {}: {}",
                method,
                full_url,
                status,
                sanitize_for_log(&text)
            );
        }

        if text.trim().is_empty() {
            return Ok(ApiResponse::new(status, None));
        }

        match serde_json::from_str(&text) {
            Ok(value) => Ok(ApiResponse::new(status, Some(value))),
            // Error pages are not always JSON; keep them for the error message
            Err(_) if status >= 400 => Ok(ApiResponse::new(status, Some(Value::String(text)))),
            Err(e) => Err(ApiError::Decode(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(200)));
        assert!(sanitized.ends_with("[truncated, 500 bytes total]"));
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("line\none\t"), "lineone");
    }

    #[test]
    fn test_absolute_url() {
        let client = ReqwestClient::builder("http://localhost:8779/v1.0/tenant/")
            .build()
            .unwrap();

        assert_eq!(
            client.absolute_url("/instances"),
            "http://localhost:8779/v1.0/tenant/instances"
        );
        assert_eq!(
            client.absolute_url("flavors"),
            "http://localhost:8779/v1.0/tenant/flavors"
        );
        assert_eq!(
            client.absolute_url("https://other/instances?marker=abc"),
            "https://other/instances?marker=abc"
        );
    }
}
