use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{NeopleApiError, Result};
use crate::http::{HttpAdapter, RequestConfig};
use crate::query::append_query_params;

/// One invocation seen by a [`MockAdapter`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub url: String,
    pub config: RequestConfig,
}

impl RecordedCall {
    /// The URL a network adapter would have requested.
    pub fn resolved_url(&self) -> std::result::Result<String, url::ParseError> {
        append_query_params(&self.url, &self.config.params).map(String::from)
    }
}

/// In-memory adapter for tests.
///
/// Records every call and answers with queued outcomes in order, falling back
/// to the default response (`{}` unless set) once the queue is empty.
#[derive(Debug, Default)]
pub struct MockAdapter {
    calls: Mutex<Vec<RecordedCall>>,
    queued: Mutex<VecDeque<std::result::Result<Value, NeopleApiError>>>,
    fallback: Mutex<Option<Value>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter answering every call with `payload`.
    pub fn with_response(payload: Value) -> Self {
        let adapter = Self::new();
        adapter.set_response(payload);
        adapter
    }

    pub fn set_response(&self, payload: Value) {
        *lock(&self.fallback) = Some(payload);
    }

    pub fn push_response(&self, payload: Value) {
        lock(&self.queued).push_back(Ok(payload));
    }

    pub fn push_error(&self, error: NeopleApiError) {
        lock(&self.queued).push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        lock(&self.calls).last().cloned()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn reset(&self) {
        lock(&self.calls).clear();
        lock(&self.queued).clear();
        *lock(&self.fallback) = None;
    }
}

#[async_trait]
impl HttpAdapter for MockAdapter {
    async fn get(&self, url: &str, config: &RequestConfig) -> Result<Value> {
        lock(&self.calls).push(RecordedCall {
            url: url.to_string(),
            config: config.clone(),
        });

        let next = lock(&self.queued).pop_front();
        match next {
            Some(outcome) => Ok(outcome?),
            None => Ok(lock(&self.fallback)
                .clone()
                .unwrap_or_else(|| Value::Object(Default::default()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryParams;
    use serde_json::json;

    #[tokio::test]
    async fn replays_queue_then_fallback() {
        let adapter = MockAdapter::with_response(json!({"rows": []}));
        adapter.push_response(json!({"first": true}));
        adapter.push_error(NeopleApiError::new(500, "HTTP 500: Internal Server Error"));

        let config = RequestConfig::new();
        assert_eq!(adapter.get("https://x.test/a", &config).await.unwrap(), json!({"first": true}));
        let err = adapter.get("https://x.test/b", &config).await.unwrap_err();
        assert_eq!(err.as_api().map(|e| e.status()), Some(500));
        assert_eq!(adapter.get("https://x.test/c", &config).await.unwrap(), json!({"rows": []}));
        assert_eq!(adapter.call_count(), 3);
    }

    #[tokio::test]
    async fn records_url_and_config() {
        let adapter = MockAdapter::new();
        let config = RequestConfig::new().params(QueryParams::new().with("limit", 5));
        adapter.get("https://x.test/items", &config).await.unwrap();

        let call = adapter.last_call().unwrap();
        assert_eq!(call.url, "https://x.test/items");
        assert_eq!(call.resolved_url().unwrap(), "https://x.test/items?limit=5");

        adapter.reset();
        assert_eq!(adapter.call_count(), 0);
        assert_eq!(adapter.get("https://x.test/items", &config).await.unwrap(), json!({}));
    }
}
