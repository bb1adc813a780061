//! Async client core for the Neople Open API (Dungeon Fighter and Cyphers).
//!
//! # Overview
//! Every endpoint is described by an [`ApiRequest`] (path and ordered query
//! parameters). [`NeopleClient`] sends it through a pluggable
//! [`HttpAdapter`] and [`UrlBuilder`] renders it as a URL for hosts that do
//! their own I/O. Both append the API key as the final `apikey` parameter.
//!
//! # Design
//! - All failures reaching the caller are [`NeopleApiError`] (wrapped in
//!   [`Error::Api`]), whatever the transport: HTTP status errors keep their
//!   status and body, and transport failures use status `0`.
//! - Adapters: [`ReqwestAdapter`] (default), [`UreqAdapter`] (blocking, run
//!   on tokio's blocking pool) and [`MockAdapter`] for tests.
//! - The client is stateless between calls; no caching, retries or rate
//!   limiting.
//!
//! ```no_run
//! # async fn demo() -> neople_core::Result<()> {
//! use neople_core::{df::ALL_SERVERS, types::{CharacterSummary, Rows}, NeopleClient};
//!
//! let client = NeopleClient::new("my-api-key");
//! let hits: Rows<CharacterSummary> = client.df().search_character("홍길동", ALL_SERVERS).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod client;
pub mod credential;
pub mod cyphers;
pub mod df;
pub mod error;
pub mod http;
pub mod query;
pub mod types;
pub mod url_builder;

pub use adapters::{MockAdapter, RecordedCall, ReqwestAdapter, UreqAdapter};
pub use client::{ClientConfig, NeopleClient, NeopleClientBuilder, DEFAULT_BASE_URL};
pub use credential::ApiKey;
pub use error::{Error, NeopleApiError, Result};
pub use http::{ApiRequest, HttpAdapter, HttpRequest, HttpResponse, RequestConfig};
pub use query::{
    append_query_params, build_query_string, parse_query_params, ParamValue, QueryParams,
};
pub use url_builder::UrlBuilder;
