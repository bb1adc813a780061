use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::RequestBuilder;
use serde_json::Value;

use super::{error_chain, is_cors_message};
use crate::error::{NeopleApiError, Result, NETWORK_FALLBACK_MESSAGE};
use crate::http::{HttpAdapter, HttpResponse, RequestConfig};
use crate::query::append_query_params;

/// Async transport over a `reqwest::Client`. Used when no adapter is given.
///
/// The timeout from [`RequestConfig`] covers the whole exchange (connect,
/// headers and body). Timeouts configured on a caller-supplied client are
/// reported the same way.
#[derive(Debug, Clone, Default)]
pub struct ReqwestAdapter {
    client: reqwest::Client,
}

impl ReqwestAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpAdapter for ReqwestAdapter {
    async fn get(&self, url: &str, config: &RequestConfig) -> Result<Value> {
        let url = append_query_params(url, &config.params)?;
        let path = url.path().to_string();

        let builder = self.client.get(url).headers(header_map(&config.headers)?);
        let exchange = fetch(builder);
        let response = match config.timeout {
            Some(limit) => match tokio::time::timeout(limit, exchange).await {
                Ok(response) => response,
                Err(elapsed) => {
                    tracing::debug!(%path, ?limit, "reqwest request timed out");
                    Err(NeopleApiError::timeout(elapsed))
                }
            },
            None => exchange.await,
        }?;

        Ok(response.into_payload()?)
    }
}

/// `Content-Type: application/json`, replaced by any caller header of the
/// same name.
fn header_map(headers: &IndexMap<String, String>) -> std::result::Result<HeaderMap, NeopleApiError> {
    let mut map = HeaderMap::new();
    map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| NeopleApiError::transport("InvalidHeader", e, NETWORK_FALLBACK_MESSAGE))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| NeopleApiError::transport("InvalidHeader", e, NETWORK_FALLBACK_MESSAGE))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Send the request and read the body, keeping non-2xx responses as data.
///
/// The status text is the reason phrase the server sent when it differs from
/// the canonical one, else the canonical reason, else empty.
async fn fetch(builder: RequestBuilder) -> std::result::Result<HttpResponse, NeopleApiError> {
    let response = builder.send().await.map_err(classify)?;
    let status = response.status();
    let status_text = match response.extensions().get::<hyper::ext::ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => status.canonical_reason().unwrap_or_default().to_string(),
    };

    let body = match response.text().await {
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

fn classify(err: reqwest::Error) -> NeopleApiError {
    // The URL carries the API key; keep it out of messages.
    let err = err.without_url();
    if err.is_timeout() {
        return NeopleApiError::timeout(&err);
    }
    let text = error_chain(&err);
    if is_cors_message(&text) {
        return NeopleApiError::cors(text);
    }
    NeopleApiError::transport("NetworkError", text, NETWORK_FALLBACK_MESSAGE)
}
