//! Request-issuing base shared by every Neople endpoint.
//!
//! # Design
//! `NeopleClient` holds the API key, the transport adapter and the base
//! origin, and nothing that changes between calls. Every endpoint is an
//! `ApiRequest` (path + parameters) produced by the stateless functions in
//! [`crate::df`] and [`crate::cyphers`]; the client turns it into a URL and a
//! `RequestConfig` with `prepare` and hands both to the adapter. The domain
//! views returned by `df()` and `cyphers()` only borrow the client.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::ReqwestAdapter;
use crate::credential::ApiKey;
use crate::cyphers::Cyphers;
use crate::df::DungeonFighter;
use crate::error::{Error, Result};
use crate::http::{ApiRequest, HttpAdapter, RequestConfig};
use crate::query::{with_api_key, QueryParams};

/// Origin of the production Neople Open API.
pub const DEFAULT_BASE_URL: &str = "https://api.neople.co.kr";

/// Async client for the Neople Open API.
///
/// Cheap to clone; clones share the adapter.
#[derive(Clone)]
pub struct NeopleClient {
    api_key: ApiKey,
    adapter: Arc<dyn HttpAdapter>,
    base_url: String,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for NeopleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeopleClient")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl NeopleClient {
    /// Client for the production API over the default `reqwest` transport.
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: impl Into<ApiKey>) -> NeopleClientBuilder {
        NeopleClientBuilder {
            api_key: api_key.into(),
            adapter: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn from_config(config: ClientConfig) -> Self {
        let mut builder = Self::builder(config.api_key);
        if let Some(base_url) = config.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn df(&self) -> DungeonFighter<'_> {
        DungeonFighter::new(self)
    }

    pub fn cyphers(&self) -> Cyphers<'_> {
        Cyphers::new(self)
    }

    /// URL and transport config exactly as they are handed to the adapter.
    ///
    /// The URL is `{base_url}{path}` with no slash normalization. Parameters
    /// keep the caller's order and end with `apikey`.
    pub fn prepare(&self, request: &ApiRequest) -> (String, RequestConfig) {
        let url = format!("{}{}", self.base_url, request.path);
        let config = RequestConfig {
            headers: [("Authorization".to_string(), self.api_key.bearer())]
                .into_iter()
                .collect(),
            timeout: self.timeout,
            params: with_api_key(&request.params, self.api_key.expose()),
        };
        (url, config)
    }

    /// GET `path` with `params` and decode the JSON payload into `T`.
    ///
    /// Use `T = serde_json::Value` to receive the payload untouched.
    pub async fn request<T: DeserializeOwned>(&self, path: &str, params: QueryParams) -> Result<T> {
        self.send(&ApiRequest::with_params(path, params)).await
    }

    pub async fn send<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let payload = self.send_raw(request).await?;
        serde_json::from_value(payload).map_err(Error::Decode)
    }

    async fn send_raw(&self, request: &ApiRequest) -> Result<Value> {
        let (url, config) = self.prepare(request);
        tracing::debug!(
            path = %request.path,
            params = request.params.len(),
            "dispatching Neople API request"
        );

        let result = self.adapter.get(&url, &config).await;
        if let Err(err) = &result {
            match err.as_api() {
                Some(api) => tracing::warn!(
                    path = %request.path,
                    status = api.status(),
                    message = api.message(),
                    "Neople API request failed"
                ),
                None => tracing::warn!(path = %request.path, error = %err, "Neople API request failed"),
            }
        }
        result
    }
}

/// Builder for [`NeopleClient`].
pub struct NeopleClientBuilder {
    api_key: ApiKey,
    adapter: Option<Arc<dyn HttpAdapter>>,
    base_url: String,
    timeout: Option<Duration>,
}

impl NeopleClientBuilder {
    /// Origin prepended verbatim to every path, e.g. `http://127.0.0.1:3000`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn adapter(mut self, adapter: impl HttpAdapter + 'static) -> Self {
        self.adapter = Some(Arc::new(adapter));
        self
    }

    /// Share an adapter with other clients (or keep a handle to a test double).
    pub fn shared_adapter(mut self, adapter: Arc<dyn HttpAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Timeout applied to every request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> NeopleClient {
        NeopleClient {
            api_key: self.api_key,
            adapter: self
                .adapter
                .unwrap_or_else(|| Arc::new(ReqwestAdapter::new())),
            base_url: self.base_url,
            timeout: self.timeout,
        }
    }
}

/// Client settings as they appear in an application's config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}
