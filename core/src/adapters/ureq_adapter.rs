use std::io;
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

use super::{error_chain, is_cors_message};
use crate::error::{NeopleApiError, Result};
use crate::http::{HttpAdapter, HttpResponse, RequestConfig};
use crate::query::append_query_params;

const UNKNOWN_UREQ_ERROR: &str = "Unknown ureq error";

/// Transport over a blocking `ureq::Agent`.
///
/// Each call runs on tokio's blocking pool. The default agent returns 4xx/5xx
/// responses as data so their bodies can be captured; an agent that treats
/// them as errors still yields the `HTTP {status}: {reason}` error, without a
/// body.
#[derive(Debug, Clone)]
pub struct UreqAdapter {
    agent: ureq::Agent,
}

impl Default for UreqAdapter {
    fn default() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl UreqAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl HttpAdapter for UreqAdapter {
    async fn get(&self, url: &str, config: &RequestConfig) -> Result<Value> {
        let url = append_query_params(url, &config.params)?;
        let agent = self.agent.clone();
        let headers = config.headers.clone();
        let timeout = config.timeout;

        let outcome =
            tokio::task::spawn_blocking(move || call(&agent, url.as_str(), &headers, timeout)).await;

        let response = match outcome {
            Ok(response) => response?,
            Err(join) => {
                return Err(NeopleApiError::transport("JoinError", join, UNKNOWN_UREQ_ERROR).into())
            }
        };

        Ok(response.into_payload()?)
    }
}

fn call(
    agent: &ureq::Agent,
    url: &str,
    headers: &IndexMap<String, String>,
    timeout: Option<Duration>,
) -> std::result::Result<HttpResponse, NeopleApiError> {
    let mut request = agent.get(url);
    if !headers.keys().any(|name| name.eq_ignore_ascii_case("content-type")) {
        request = request.header("Content-Type", "application/json");
    }
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }
    if let Some(limit) = timeout {
        request = request.config().timeout_global(Some(limit)).build();
    }

    let mut response = request.call().map_err(classify)?;
    let status = response.status();
    let status_text = status.canonical_reason().unwrap_or_default().to_string();

    // No size cap, matching the reqwest adapter.
    let body = match response.body_mut().with_config().limit(u64::MAX).read_to_string() {
        Ok(text) => Some(text),
        Err(err) if status.is_success() => return Err(classify(err)),
        Err(_) => None,
    };

    Ok(HttpResponse {
        status: status.as_u16(),
        status_text,
        body,
    })
}

fn classify(err: ureq::Error) -> NeopleApiError {
    match &err {
        ureq::Error::Timeout(_) => timed_out(&err),
        ureq::Error::Io(source) if source.kind() == io::ErrorKind::TimedOut => timed_out(&err),
        ureq::Error::StatusCode(code) => {
            let reason = http_reason(*code);
            NeopleApiError::http(*code, reason, None)
        }
        ureq::Error::ConnectionFailed | ureq::Error::HostNotFound | ureq::Error::Io(_) => {
            NeopleApiError::transport(
                "NetworkError",
                format!("Network Error: {}", error_chain(&err)),
                UNKNOWN_UREQ_ERROR,
            )
        }
        _ => {
            let text = error_chain(&err);
            if is_cors_message(&text) {
                NeopleApiError::cors(text)
            } else {
                NeopleApiError::transport("UreqError", text, UNKNOWN_UREQ_ERROR)
            }
        }
    }
}

fn timed_out(err: &ureq::Error) -> NeopleApiError {
    tracing::debug!(error = %err, "ureq request timed out");
    NeopleApiError::timeout(err)
}

fn http_reason(code: u16) -> &'static str {
    ureq::http::StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or_default()
}
