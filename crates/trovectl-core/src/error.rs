//! Error taxonomy for Trove API calls
//!
//! HTTP failures are translated into [`ApiError`] through a registry keyed by
//! status code. Anything the registry does not know about still carries the
//! status and raw body so callers can diagnose it.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use trovectl_core::ApiError;
//!
//! let body = json!({"itemNotFound": {"message": "Instance 42 not found", "code": 404}});
//! let err = ApiError::from_response(404, Some(&body), "/instances/42");
//!
//! assert!(err.is_not_found());
//! assert_eq!(err.status_code(), Some(404));
//! assert!(err.to_string().contains("Instance 42 not found"));
//! ```

use serde_json::Value;
use thiserror::Error;

use crate::http::ApiResponse;

/// Errors raised by managers, the finder and the HTTP adapter
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request (HTTP 400): {message}")]
    BadRequest { message: String },

    #[error("Unauthorized (HTTP 401): {message}")]
    Unauthorized { message: String },

    #[error("Forbidden (HTTP 403): {message}")]
    Forbidden { message: String },

    #[error("Not found (HTTP 404): {message}")]
    NotFound { message: String },

    #[error("Method not allowed (HTTP 405): {message}")]
    MethodNotAllowed { message: String },

    #[error("Conflict (HTTP 409): {message}")]
    Conflict { message: String },

    /// Quota or rate limit exceeded (413 and 429)
    #[error("Over limit (HTTP {status}): {message}")]
    OverLimit { status: u16, message: String },

    #[error("Unprocessable entity (HTTP 422): {message}")]
    UnprocessableEntity { message: String },

    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    /// Catch-all for statuses the registry does not map
    #[error("HTTP {status} from {url}: {message}")]
    Client {
        status: u16,
        url: String,
        message: String,
        body: Option<Value>,
    },

    /// User-facing lookup or usage failure (not found by name, ambiguous match)
    #[error("{0}")]
    Command(String),

    #[error("No unique match: {0}")]
    NoUniqueMatch(String),

    #[error("No such attribute: {0}")]
    NoSuchAttribute(String),

    #[error("Unexpected response from {url}: {message}")]
    UnexpectedResponse { url: String, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

type Translator = fn(u16, String) -> ApiError;

/// Status code registry consulted by [`ApiError::from_response`]
const STATUS_REGISTRY: &[(u16, Translator)] = &[
    (400, |_, message| ApiError::BadRequest { message }),
    (401, |_, message| ApiError::Unauthorized { message }),
    (403, |_, message| ApiError::Forbidden { message }),
    (404, |_, message| ApiError::NotFound { message }),
    (405, |_, message| ApiError::MethodNotAllowed { message }),
    (409, |_, message| ApiError::Conflict { message }),
    (413, |status, message| ApiError::OverLimit { status, message }),
    (422, |_, message| ApiError::UnprocessableEntity { message }),
    (429, |status, message| ApiError::OverLimit { status, message }),
];

impl ApiError {
    /// Translate an HTTP error status and its decoded body
    pub fn from_response(status: u16, body: Option<&Value>, url: &str) -> Self {
        let message = extract_message(body);

        if let Some((_, translate)) = STATUS_REGISTRY.iter().find(|(code, _)| *code == status) {
            return translate(status, message);
        }

        if status >= 500 {
            return ApiError::ServerError { status, message };
        }

        ApiError::Client {
            status,
            url: url.to_string(),
            message,
            body: body.cloned(),
        }
    }

    /// HTTP status carried by this error, if it came from a response
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest { .. } => Some(400),
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::MethodNotAllowed { .. } => Some(405),
            ApiError::Conflict { .. } => Some(409),
            ApiError::UnprocessableEntity { .. } => Some(422),
            ApiError::OverLimit { status, .. }
            | ApiError::ServerError { status, .. }
            | ApiError::Client { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::ServerError { .. })
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::Forbidden { .. }
        )
    }
}

/// Fail with a translated error when the response status is 400 or above
pub fn check_response(response: &ApiResponse, url: &str) -> Result<()> {
    if response.status >= 400 {
        return Err(ApiError::from_response(
            response.status,
            response.body.as_ref(),
            url,
        ));
    }
    Ok(())
}

/// Pull the human-readable message out of an OpenStack fault body.
///
/// Faults are shaped `{"<faultName>": {"message": "...", "code": N}}`; a bare
/// top-level `message` or a plain string body are accepted too.
fn extract_message(body: Option<&Value>) -> String {
    let Some(body) = body else {
        return "n/a".to_string();
    };

    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return message.to_string();
    }

    if let Value::Object(map) = body
        && map.len() == 1
        && let Some(message) = map
            .values()
            .next()
            .and_then(|fault| fault.get("message"))
            .and_then(Value::as_str)
    {
        return message.to_string();
    }

    match body {
        Value::String(text) if !text.is_empty() => text.clone(),
        _ => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_maps_known_statuses() {
        let cases: &[(u16, fn(&ApiError) -> bool)] = &[
            (400, |e| matches!(e, ApiError::BadRequest { .. })),
            (401, |e| matches!(e, ApiError::Unauthorized { .. })),
            (403, |e| matches!(e, ApiError::Forbidden { .. })),
            (404, |e| matches!(e, ApiError::NotFound { .. })),
            (405, |e| matches!(e, ApiError::MethodNotAllowed { .. })),
            (409, |e| matches!(e, ApiError::Conflict { .. })),
            (413, |e| matches!(e, ApiError::OverLimit { status: 413, .. })),
            (422, |e| matches!(e, ApiError::UnprocessableEntity { .. })),
            (429, |e| matches!(e, ApiError::OverLimit { status: 429, .. })),
        ];

        for (status, check) in cases {
            let err = ApiError::from_response(*status, None, "/x");
            assert!(check(&err), "status {} mapped to {:?}", status, err);
            assert_eq!(err.status_code(), Some(*status));
        }
    }

    #[test]
    fn test_5xx_is_server_error() {
        let err = ApiError::from_response(503, None, "/instances");
        assert!(err.is_server_error());
        assert_eq!(err.status_code(), Some(503));
    }

    #[test]
    fn test_unmapped_status_keeps_status_and_body() {
        let body = json!({"weird": true});
        let err = ApiError::from_response(418, Some(&body), "/teapot");

        match err {
            ApiError::Client {
                status, url, body, ..
            } => {
                assert_eq!(status, 418);
                assert_eq!(url, "/teapot");
                assert_eq!(body, Some(json!({"weird": true})));
            }
            other => panic!("expected catch-all, got {:?}", other),
        }
    }

    #[test]
    fn test_message_from_fault_envelope() {
        let body = json!({"badRequest": {"message": "Volume size is required", "code": 400}});
        let err = ApiError::from_response(400, Some(&body), "/instances");
        assert_eq!(
            err.to_string(),
            "Bad request (HTTP 400): Volume size is required"
        );
    }

    #[test]
    fn test_message_fallbacks() {
        assert_eq!(extract_message(None), "n/a");
        assert_eq!(extract_message(Some(&json!({"message": "top"}))), "top");
        assert_eq!(extract_message(Some(&json!("plain text"))), "plain text");
        assert_eq!(extract_message(Some(&json!({"a": 1, "b": 2}))), "n/a");
    }

    #[test]
    fn test_check_response() {
        let ok = ApiResponse {
            status: 204,
            body: None,
        };
        assert!(check_response(&ok, "/x").is_ok());

        let failed = ApiResponse {
            status: 500,
            body: None,
        };
        assert!(check_response(&failed, "/x").unwrap_err().is_server_error());
    }
}
