//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port and drives the client
//! over real HTTP, once per network adapter, so `reqwest` and `ureq` are held
//! to the same normalized behavior.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use neople_core::cyphers::PlayerSearchParams;
use neople_core::df::ALL_SERVERS;
use neople_core::types::{Character, CharacterSummary, PlayerSummary, Rows};
use neople_core::{
    HttpAdapter, NeopleClient, QueryParams, RequestConfig, ReqwestAdapter, UreqAdapter, UrlBuilder,
};
use serde_json::{json, Value};

const KEY: &str = "integration-key";

async fn start_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener, KEY));
    addr
}

fn adapters() -> Vec<(&'static str, Arc<dyn HttpAdapter>)> {
    vec![
        ("reqwest", Arc::new(ReqwestAdapter::new())),
        ("ureq", Arc::new(UreqAdapter::new())),
    ]
}

fn client(addr: SocketAddr, key: &str, adapter: Arc<dyn HttpAdapter>) -> NeopleClient {
    NeopleClient::builder(key)
        .base_url(format!("http://{addr}"))
        .shared_adapter(adapter)
        .build()
}

#[tokio::test(flavor = "multi_thread")]
async fn character_search_and_detail() {
    let addr = start_server().await;
    for (name, adapter) in adapters() {
        let client = client(addr, KEY, adapter);

        let hits: Rows<CharacterSummary> = client
            .df()
            .search_character("홍길동", ALL_SERVERS)
            .await
            .unwrap();
        assert_eq!(hits.rows.len(), 2, "{name}");

        let first = &hits.rows[0];
        let detail: Character = client
            .df()
            .character(&first.server_id, &first.character_id)
            .await
            .unwrap();
        assert_eq!(detail.character_name, "홍길동", "{name}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn player_search() {
    let addr = start_server().await;
    for (name, adapter) in adapters() {
        let client = client(addr, KEY, adapter);
        let hits: Rows<PlayerSummary> = client
            .cyphers()
            .search_player("test user", &PlayerSearchParams::default())
            .await
            .unwrap();
        assert_eq!(hits.rows.len(), 1, "{name}");
        assert_eq!(hits.rows[0].player_id, "c9d8e7f6a5b4", "{name}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn wrong_key_is_forbidden() {
    let addr = start_server().await;
    for (name, adapter) in adapters() {
        let client = client(addr, "wrong-key", adapter);
        let err = client
            .df()
            .search_character::<Value>("홍길동", ALL_SERVERS)
            .await
            .unwrap_err();

        let api = err.as_api().unwrap_or_else(|| panic!("{name}: not an API error"));
        assert_eq!(api.status(), 403, "{name}");
        assert_eq!(api.message(), "HTTP 403: Forbidden", "{name}");
        let body = api.response().unwrap_or_else(|| panic!("{name}: body missing"));
        assert_eq!(body["error"]["code"], "API001", "{name}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_character_is_not_found() {
    let addr = start_server().await;
    for (name, adapter) in adapters() {
        let client = client(addr, KEY, adapter);
        let err = client
            .df()
            .character::<Value>("cain", "missing")
            .await
            .unwrap_err();
        let api = err.as_api().unwrap();
        assert_eq!(api.status(), 404, "{name}");
        assert_eq!(api.message(), "HTTP 404: Not Found", "{name}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn server_errors_keep_their_status() {
    let addr = start_server().await;
    for (name, adapter) in adapters() {
        let client = client(addr, KEY, adapter);
        let err = client
            .request::<Value>("/status/503", QueryParams::new())
            .await
            .unwrap_err();
        let api = err.as_api().unwrap();
        assert_eq!(api.status(), 503, "{name}");
        assert_eq!(api.message(), "HTTP 503: Service Unavailable", "{name}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_responses_time_out() {
    let addr = start_server().await;
    for (name, adapter) in adapters() {
        let client = NeopleClient::builder(KEY)
            .base_url(format!("http://{addr}"))
            .shared_adapter(adapter)
            .timeout(Duration::from_millis(100))
            .build();

        let started = Instant::now();
        let err = client
            .request::<Value>("/slow", QueryParams::new().with("ms", 3000))
            .await
            .unwrap_err();
        let elapsed = started.elapsed();
        assert!(elapsed < Duration::from_secs(1), "{name}: took {elapsed:?}");

        let api = err.as_api().unwrap();
        assert_eq!(api.status(), 0, "{name}");
        assert!(api.message().starts_with("Request timeout"), "{name}: {}", api.message());
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_success_body() {
    let addr = start_server().await;
    for (name, adapter) in adapters() {
        let client = client(addr, KEY, adapter);
        let err = client
            .request::<Value>("/malformed", QueryParams::new())
            .await
            .unwrap_err();
        let api = err.as_api().unwrap();
        assert_eq!(api.status(), 0, "{name}");
        assert!(api.message().starts_with("Malformed response body"), "{name}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn refused_connection_is_status_zero() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    for (name, adapter) in adapters() {
        let client = client(addr, KEY, adapter);
        let err = client
            .request::<Value>("/cy/players", QueryParams::new())
            .await
            .unwrap_err();
        let api = err.as_api().unwrap();
        assert_eq!(api.status(), 0, "{name}");
        assert!(!api.message().is_empty(), "{name}");
        assert!(!api.message().contains(KEY), "{name}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn wire_query_keeps_order_and_ends_with_key() {
    let addr = start_server().await;
    for (name, adapter) in adapters() {
        let client = client(addr, KEY, adapter);
        let params = QueryParams::new()
            .with("b", 2)
            .with("a", 1)
            .with("itemName", "test@#$%^&*()");
        let echoed: Value = client.request("/echo/df/items", params).await.unwrap();

        assert_eq!(echoed["path"], "/echo/df/items", "{name}");
        assert_eq!(
            echoed["query"],
            format!("b=2&a=1&itemName=test%40%23%24%25%5E%26*%28%29&apikey={KEY}"),
            "{name}"
        );
        assert_eq!(echoed["authorization"], format!("Bearer {KEY}"), "{name}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn url_builder_matches_wire_url() {
    let addr = start_server().await;
    let base = format!("http://{addr}");
    let params = QueryParams::new().with("characterName", "홍길동").with("limit", 3);

    let built = UrlBuilder::new(KEY)
        .with_base_url(&base)
        .build_url("/echo/df/servers/all/characters", &params)
        .unwrap();

    let client = client(addr, KEY, Arc::new(ReqwestAdapter::new()));
    let echoed: Value = client
        .request("/echo/df/servers/all/characters", params)
        .await
        .unwrap();

    let wire = format!("{base}{}?{}", echoed["path"].as_str().unwrap(), echoed["query"].as_str().unwrap());
    assert_eq!(built, wire);
}

#[tokio::test(flavor = "multi_thread")]
async fn bodies_over_ten_mebibytes_decode() {
    let addr = start_server().await;
    let size = 11 * 1024 * 1024;
    for (name, adapter) in adapters() {
        let config = RequestConfig::new().params(QueryParams::new().with("bytes", size));
        let payload = adapter
            .get(&format!("http://{addr}/large"), &config)
            .await
            .unwrap_or_else(|err| panic!("{name}: {err}"));
        assert_eq!(payload["rows"].as_str().map(str::len), Some(size), "{name}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn json_content_type_is_sent_once_by_default() {
    let addr = start_server().await;
    for (name, adapter) in adapters() {
        let config = RequestConfig::new().params(QueryParams::new().with("apikey", KEY));
        let echoed = adapter
            .get(&format!("http://{addr}/echo/df/items"), &config)
            .await
            .unwrap();
        assert_eq!(echoed["contentType"], json!(["application/json"]), "{name}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn caller_content_type_replaces_the_default() {
    let addr = start_server().await;
    for (name, adapter) in adapters() {
        let config = RequestConfig::new()
            .header("Content-Type", "text/plain")
            .params(QueryParams::new().with("apikey", KEY));
        let echoed = adapter
            .get(&format!("http://{addr}/echo/df/items"), &config)
            .await
            .unwrap();
        assert_eq!(echoed["contentType"], json!(["text/plain"]), "{name}");
    }
}
