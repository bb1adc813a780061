//! Error types for the Neople API client.
//!
//! # Design
//! Every transport failure and every non-2xx response is normalized into a
//! single `NeopleApiError` carrying the HTTP status (0 when no response was
//! received), a message, and the raw response when one is available. The
//! crate-level `Error` wraps it next to the few failures that are not API
//! errors at all (a malformed URL, a payload that does not fit the caller's
//! type), so callers can branch on `Error::Api` to tell the two apart.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub(crate) const TIMEOUT_MESSAGE: &str = "Request timeout: The request took too long to complete.";
pub(crate) const CORS_MESSAGE: &str =
    "CORS Error: Cross-origin request blocked. Check API endpoint CORS settings.";
pub(crate) const NETWORK_FALLBACK_MESSAGE: &str = "Network error occurred.";

/// The normalized error raised by every adapter and by `NeopleClient`.
///
/// `status` is the HTTP status code of the failed response, or 0 when no
/// HTTP status is available (network failure, timeout, transport-internal
/// error). Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct NeopleApiError {
    status: u16,
    message: String,
    response: Option<Value>,
}

impl NeopleApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            response: None,
        }
    }

    pub fn with_response(status: u16, message: impl Into<String>, response: Option<Value>) -> Self {
        Self {
            status,
            message: message.into(),
            response,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Raw response body or transport diagnostic, if any was captured.
    pub fn response(&self) -> Option<&Value> {
        self.response.as_ref()
    }

    /// Plain `{status, message, response}` record for logs and JSON transport.
    pub fn to_json(&self) -> Value {
        json!({
            "status": self.status,
            "message": self.message,
            "response": self.response,
        })
    }

    pub(crate) fn http(status: u16, status_text: &str, response: Option<Value>) -> Self {
        Self::with_response(status, format!("HTTP {status}: {status_text}"), response)
    }

    pub(crate) fn timeout(detail: impl std::fmt::Display) -> Self {
        Self::with_response(0, TIMEOUT_MESSAGE, Some(diagnostic("TimeoutError", detail)))
    }

    pub(crate) fn cors(detail: impl std::fmt::Display) -> Self {
        Self::with_response(0, CORS_MESSAGE, Some(diagnostic("TypeError", detail)))
    }

    /// Status-0 failure whose message is the underlying one, or `fallback`
    /// when the underlying error carries no text.
    pub(crate) fn transport(name: &str, detail: impl std::fmt::Display, fallback: &str) -> Self {
        let text = detail.to_string();
        let message = if text.trim().is_empty() {
            fallback.to_string()
        } else {
            text.clone()
        };
        Self::with_response(0, message, Some(json!({ "name": name, "message": text })))
    }
}

/// `{name, message}` object standing in for the native error value.
pub(crate) fn diagnostic(name: &str, detail: impl std::fmt::Display) -> Value {
    json!({ "name": name, "message": detail.to_string() })
}

/// Errors returned by the client, adapters, and URL builders.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A normalized API or transport failure.
    #[error(transparent)]
    Api(#[from] NeopleApiError),

    /// The base origin and path did not form an absolute URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The payload was valid JSON but did not match the requested type.
    #[error("failed to decode response payload: {0}")]
    Decode(#[source] serde_json::Error),
}

impl Error {
    /// The normalized API error, if this is one.
    pub fn as_api(&self) -> Option<&NeopleApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
