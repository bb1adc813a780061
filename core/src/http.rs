//! Transport contract and plain-data HTTP types.
//!
//! # Design
//! `HttpAdapter` is the only seam between the request-issuing client and the
//! network: one async `get` per call, returning the decoded JSON payload or a
//! normalized error. Adapters are injected as trait objects, so a caller can
//! swap `reqwest` for `ureq`, a test double, or their own transport.
//!
//! `HttpRequest` and `HttpResponse` describe a round-trip as plain data for
//! hosts that execute the I/O themselves. `HttpResponse::into_payload` holds
//! the status and body normalization every transport shares.

use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{NeopleApiError, Result};
use crate::query::QueryParams;

/// Per-call transport options. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    /// Extra request headers.
    pub headers: IndexMap<String, String>,
    /// Abort the call once this much time has elapsed.
    pub timeout: Option<Duration>,
    /// Query parameters the adapter appends to the URL.
    pub params: QueryParams,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }
}

/// A transport able to perform an HTTP GET.
///
/// `url` must be absolute; `config.params` are appended by the adapter using
/// [`crate::query::append_query_params`]. Every failure is reported as
/// [`crate::Error::Api`] except a URL that cannot be parsed.
#[async_trait]
pub trait HttpAdapter: Send + Sync {
    async fn get(&self, url: &str, config: &RequestConfig) -> Result<Value>;
}

/// Path template plus parameters for one API call, before the key is added.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub path: String,
    pub params: QueryParams,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: QueryParams::new(),
        }
    }

    pub fn with_params(path: impl Into<String>, params: QueryParams) -> Self {
        Self {
            path: path.into(),
            params,
        }
    }
}

/// A fully resolved GET request, ready for a host-owned transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    /// `None` when the body could not be read.
    pub body: Option<String>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode a successful body, or turn any other status into the
    /// `HTTP {status}: {statusText}` error.
    pub fn into_payload(self) -> std::result::Result<Value, NeopleApiError> {
        if !self.is_success() {
            return Err(NeopleApiError::http(
                self.status,
                &self.status_text,
                self.body.map(raw_body),
            ));
        }
        let body = self.body.unwrap_or_default();
        serde_json::from_str(&body).map_err(|e| {
            NeopleApiError::with_response(
                0,
                format!("Malformed response body: {e}"),
                Some(Value::String(body)),
            )
        })
    }
}

/// Best-effort raw response: JSON when the body parses, text otherwise.
fn raw_body(body: String) -> Value {
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, status_text: &str, body: Option<&str>) -> HttpResponse {
        HttpResponse {
            status,
            status_text: status_text.to_string(),
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn success_body_is_passed_through() {
        let payload = response(200, "OK", Some(r#"{"rows":[]}"#)).into_payload().unwrap();
        assert_eq!(payload, json!({"rows": []}));
    }

    #[test]
    fn not_found_maps_to_status_and_message() {
        let err = response(404, "Not Found", Some(r#"{"error": "Character not found"}"#))
            .into_payload()
            .unwrap_err();
        assert_eq!(err.status(), 404);
        assert_eq!(err.message(), "HTTP 404: Not Found");
        assert_eq!(err.response(), Some(&json!({"error": "Character not found"})));
    }

    #[test]
    fn plain_text_error_body_is_kept_as_text() {
        let err = response(500, "Internal Server Error", Some("Server Error"))
            .into_payload()
            .unwrap_err();
        assert_eq!(err.message(), "HTTP 500: Internal Server Error");
        assert_eq!(err.response(), Some(&json!("Server Error")));
    }

    #[test]
    fn unreadable_error_body_still_reports_status() {
        let err = response(503, "Service Unavailable", None).into_payload().unwrap_err();
        assert_eq!(err.status(), 503);
        assert!(err.response().is_none());
    }

    #[test]
    fn malformed_success_body_is_status_zero() {
        let err = response(200, "OK", Some("<html>")).into_payload().unwrap_err();
        assert_eq!(err.status(), 0);
        assert!(err.message().starts_with("Malformed response body"));
        assert_eq!(err.response(), Some(&json!("<html>")));
    }

    #[test]
    fn request_config_builder_sets_fields() {
        let config = RequestConfig::new()
            .header("X-Trace", "1")
            .timeout(Duration::from_millis(250))
            .params(QueryParams::new().with("limit", 10));
        assert_eq!(config.headers.get("X-Trace").map(String::as_str), Some("1"));
        assert_eq!(config.timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.params.len(), 1);
    }
}
