//! Request URLs without issuing requests.
//!
//! # Design
//! `UrlBuilder` renders the same [`ApiRequest`] descriptors the client sends,
//! through the same `append_query_params`, so a built URL is byte-for-byte
//! what a network adapter would request. Hosts that own their transport use
//! [`UrlBuilder::http_request`] to also get the headers.

use crate::client::DEFAULT_BASE_URL;
use crate::credential::ApiKey;
use crate::cyphers::CyphersUrls;
use crate::df::DfUrls;
use crate::error::Result;
use crate::http::{ApiRequest, HttpRequest};
use crate::query::{append_query_params, with_api_key, QueryParams};

#[derive(Debug, Clone)]
pub struct UrlBuilder {
    api_key: ApiKey,
    base_url: String,
}

impl UrlBuilder {
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn df(&self) -> DfUrls<'_> {
        DfUrls::new(self)
    }

    pub fn cyphers(&self) -> CyphersUrls<'_> {
        CyphersUrls::new(self)
    }

    /// Full URL for `request`, `apikey` last.
    pub fn build(&self, request: &ApiRequest) -> Result<String> {
        let params = with_api_key(&request.params, self.api_key.expose());
        let url = append_query_params(&format!("{}{}", self.base_url, request.path), &params)?;
        Ok(url.into())
    }

    pub fn build_url(&self, path: &str, params: &QueryParams) -> Result<String> {
        self.build(&ApiRequest::with_params(path, params.clone()))
    }

    /// URL plus the headers [`crate::NeopleClient`] would send.
    pub fn http_request(&self, request: &ApiRequest) -> Result<HttpRequest> {
        Ok(HttpRequest {
            url: self.build(request)?,
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), self.api_key.bearer()),
            ],
        })
    }

    /// Render every request in order, stopping at the first failure.
    pub fn batch(&self, requests: &[ApiRequest]) -> Result<Vec<String>> {
        requests.iter().map(|request| self.build(request)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::df::{self, ItemSearchParams, WordType, ALL_SERVERS};
    use crate::query::parse_query_params;

    #[test]
    fn search_character_url() {
        let builder = UrlBuilder::new("k");
        let url = builder.df().search_character("홍길동", ALL_SERVERS).unwrap();
        assert_eq!(
            url,
            "https://api.neople.co.kr/df/servers/all/characters?characterName=%ED%99%8D%EA%B8%B8%EB%8F%99&apikey=k"
        );
    }

    #[test]
    fn special_characters_are_form_encoded() {
        let builder = UrlBuilder::new("k").with_base_url("http://localhost:3000");
        let url = builder
            .build_url("/df/items", &QueryParams::new().with("itemName", "test@#$%^&*()"))
            .unwrap();
        assert_eq!(url, "http://localhost:3000/df/items?itemName=test%40%23%24%25%5E%26*%28%29&apikey=k");
        assert_eq!(parse_query_params(&url)["itemName"], "test@#$%^&*()");
    }

    #[test]
    fn api_key_override_is_ignored() {
        let builder = UrlBuilder::new("real");
        let url = builder
            .build_url("/cy/players", &QueryParams::new().with("apikey", "fake").with("nickname", "a"))
            .unwrap();
        assert!(url.ends_with("?nickname=a&apikey=real"));
    }

    #[test]
    fn http_request_carries_bearer_header() {
        let builder = UrlBuilder::new("k");
        let request = builder.http_request(&df::item("abc")).unwrap();
        assert_eq!(request.url, "https://api.neople.co.kr/df/items/abc?apikey=k");
        assert!(request
            .headers
            .contains(&("Authorization".to_string(), "Bearer k".to_string())));
    }

    #[test]
    fn batch_preserves_order() {
        let builder = UrlBuilder::new("k");
        let urls = builder
            .batch(&[df::item("a"), df::set_item("b"), df::multi_item("c")])
            .unwrap();
        assert_eq!(
            urls,
            vec![
                "https://api.neople.co.kr/df/items/a?apikey=k",
                "https://api.neople.co.kr/df/setitems/b?apikey=k",
                "https://api.neople.co.kr/df/multi/c?apikey=k",
            ]
        );

        let urls_view = builder.df();
        let urls = urls_view
            .batch(&[
                &|u| u.item("a"),
                &|u| {
                    u.search_items(&ItemSearchParams {
                        item_name: Some("검".into()),
                        word_type: Some(WordType::Match),
                        ..Default::default()
                    })
                },
            ])
            .unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls[1].contains("/df/items?itemName=%EA%B2%80&wordType=match&apikey=k"));
    }

    #[test]
    fn invalid_base_url_is_an_error() {
        let builder = UrlBuilder::new("k").with_base_url("not a url");
        assert!(matches!(builder.build(&df::item("a")), Err(crate::Error::InvalidUrl(_))));
    }
}
