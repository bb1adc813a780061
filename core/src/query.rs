//! Query-string encoding shared by every adapter and URL builder.
//!
//! # Design
//! Parameters are kept in an insertion-ordered map so the encoded query
//! reflects the order callers supplied them in, and the API key can always be
//! placed last. Encoding follows `application/x-www-form-urlencoded` rules
//! (the same serialization browsers use for `URLSearchParams`): `Null` values
//! are dropped, lists become repeated keys, and everything else is
//! stringified and percent-encoded.

use indexmap::IndexMap;
use url::form_urlencoded;
use url::Url;

/// Query parameter name carrying the API key.
pub const API_KEY_PARAM: &str = "apikey";

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Absent value. Never encoded.
    Null,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Encoded as the same key repeated once per element.
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// String form of a scalar, `None` for `Null` and lists.
    pub fn as_query_value(&self) -> Option<String> {
        match self {
            ParamValue::Null | ParamValue::List(_) => None,
            ParamValue::Str(s) => Some(s.clone()),
            ParamValue::Int(n) => Some(n.to_string()),
            ParamValue::Float(n) => Some(n.to_string()),
            ParamValue::Bool(b) => Some(b.to_string()),
        }
    }

    fn push_pairs<'a>(&self, key: &'a str, out: &mut Vec<(&'a str, String)>) {
        match self {
            ParamValue::Null => {}
            ParamValue::List(items) => {
                for item in items {
                    item.push_pairs(key, out);
                }
            }
            scalar => {
                if let Some(value) = scalar.as_query_value() {
                    out.push((key, value));
                }
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Str(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

macro_rules! int_param {
    ($($t:ty),*) => {
        $(impl From<$t> for ParamValue {
            fn from(value: $t) -> Self {
                ParamValue::Int(value as i64)
            }
        })*
    };
}

int_param!(i32, i64, u8, u16, u32);

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(n) => ParamValue::Int(n),
            Err(_) => ParamValue::Str(value.to_string()),
        }
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        ParamValue::from(value as u64)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Insertion-ordered query parameters.
///
/// Inserting an existing key replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: IndexMap<String, ParamValue>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// `with` for optional fields: `None` adds nothing.
    pub fn with_some<V: Into<ParamValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Add another value under `key`, turning an existing entry into a list.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        let Some(existing) = self.entries.get_mut(&key) else {
            self.entries.insert(key, value);
            return;
        };
        match existing {
            ParamValue::Null => *existing = value,
            ParamValue::List(items) => items.push(value),
            _ => {
                let first = std::mem::replace(existing, ParamValue::Null);
                *existing = ParamValue::List(vec![first, value]);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Remove `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.shift_remove(key)
    }

    /// Copy every entry of `other` into `self`, in order.
    pub fn extend(&mut self, other: QueryParams) {
        for (key, value) in other.entries {
            self.entries.insert(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flattened `(key, value)` pairs in encoding order, `Null`s dropped.
    pub fn pairs(&self) -> Vec<(&str, String)> {
        let mut out = Vec::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            value.push_pairs(key, &mut out);
        }
        out
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Caller parameters in order, followed by `apikey` as the final entry.
///
/// A caller-supplied `apikey` is dropped so the credential is always last.
pub fn with_api_key(params: &QueryParams, api_key: &str) -> QueryParams {
    let mut out = params.clone();
    out.remove(API_KEY_PARAM);
    out.insert(API_KEY_PARAM, api_key);
    out
}

/// Encode `params` as `?k=v&...`, or `""` when nothing is left to encode.
pub fn build_query_string(params: &QueryParams) -> String {
    let pairs = params.pairs();
    if pairs.is_empty() {
        return String::new();
    }
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(pairs);
    format!("?{}", serializer.finish())
}

/// Parse `base_url` and append `params` to its query.
///
/// The URL is returned unchanged (apart from normalization) when no
/// parameter survives encoding, so no bare `?` is ever produced.
pub fn append_query_params(base_url: &str, params: &QueryParams) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?;
    let pairs = params.pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(url)
}

/// Decode the query of `url` into an ordered map.
///
/// Repeated keys keep the position of their first occurrence and the value of
/// their last. An unparsable URL yields an empty map.
pub fn parse_query_params(url: &str) -> IndexMap<String, String> {
    let Ok(url) = Url::parse(url) else {
        return IndexMap::new();
    };
    let mut out = IndexMap::new();
    for (key, value) in url.query_pairs() {
        out.insert(key.into_owned(), value.into_owned());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_query_string_in_insertion_order() {
        let params = QueryParams::new()
            .with("name", "test")
            .with("age", 25)
            .with("active", true);
        assert_eq!(build_query_string(&params), "?name=test&age=25&active=true");
    }

    #[test]
    fn empty_params_produce_no_question_mark() {
        assert_eq!(build_query_string(&QueryParams::new()), "");
        let only_nulls = QueryParams::new().with("a", None::<&str>).with("b", ParamValue::Null);
        assert_eq!(build_query_string(&only_nulls), "");
    }

    #[test]
    fn nulls_are_omitted_but_empty_and_zero_are_kept() {
        let params = QueryParams::new()
            .with("name", "test")
            .with("undefined", None::<String>)
            .with("null", ParamValue::Null)
            .with("empty", "")
            .with("zero", 0);
        assert_eq!(build_query_string(&params), "?name=test&empty=&zero=0");
    }

    #[test]
    fn omitted_key_never_reaches_the_url() {
        let params = QueryParams::new().with("name", "x").with("foo", None::<i32>);
        let url = append_query_params(
            "https://api.neople.co.kr/items",
            &with_api_key(&params, "key"),
        )
        .unwrap();
        assert_eq!(url.query(), Some("name=x&apikey=key"));
    }

    #[test]
    fn lists_become_repeated_keys() {
        let params = QueryParams::new()
            .with("tags", vec!["red", "blue", "green"])
            .with("single", "value");
        assert_eq!(
            build_query_string(&params),
            "?tags=red&tags=blue&tags=green&single=value"
        );

        let url = append_query_params("https://example.com/x", &QueryParams::new().with("tags", vec!["a", "b"]))
            .unwrap();
        let decoded: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            decoded,
            vec![("tags".to_string(), "a".to_string()), ("tags".to_string(), "b".to_string())]
        );
    }

    #[test]
    fn special_characters_match_form_encoding() {
        let params = QueryParams::new()
            .with("search", "홍길동")
            .with("special", "test@#$%^&*()");
        let qs = build_query_string(&params);
        assert!(qs.contains("search=%ED%99%8D%EA%B8%B8%EB%8F%99"));
        assert!(qs.contains("special=test%40%23%24%25%5E%26*%28%29"));
    }

    #[test]
    fn non_ascii_roundtrips() {
        for text in ["홍길동", "해방무기", "日本語 テキスト", "emoji 🎮 + plus", "a&b=c"] {
            let url = append_query_params(
                "https://api.neople.co.kr/df/items",
                &QueryParams::new().with("itemName", text),
            )
            .unwrap();
            let parsed = parse_query_params(url.as_str());
            assert_eq!(parsed.get("itemName").map(String::as_str), Some(text));
        }
    }

    #[test]
    fn append_keeps_existing_query() {
        let url = append_query_params(
            "https://api.example.com/test?existing=value",
            &QueryParams::new().with("new", "param"),
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/test?existing=value&new=param");
    }

    #[test]
    fn append_without_params_leaves_url_untouched() {
        let url = append_query_params("https://api.example.com/test", &QueryParams::new()).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/test");
    }

    #[test]
    fn append_rejects_relative_url() {
        assert!(append_query_params("/df/items", &QueryParams::new()).is_err());
    }

    #[test]
    fn api_key_is_always_last() {
        let params = QueryParams::new()
            .with(API_KEY_PARAM, "spoofed")
            .with("b", 2)
            .with("a", 1);
        let merged = with_api_key(&params, "k");
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["b", "a", "apikey"]);
        assert_eq!(merged.get(API_KEY_PARAM), Some(&ParamValue::from("k")));
        // Input is left untouched.
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut params = QueryParams::new().with("a", 1).with("b", 2);
        params.insert("a", 3);
        assert_eq!(build_query_string(&params), "?a=3&b=2");
    }

    #[test]
    fn append_promotes_to_list() {
        let mut params = QueryParams::new();
        params.append("id", "1");
        params.append("id", "2");
        params.append("id", "3");
        assert_eq!(build_query_string(&params), "?id=1&id=2&id=3");
    }

    #[test]
    fn parse_query_params_last_value_wins() {
        let parsed = parse_query_params("https://x.test/p?a=1&b=2&a=3");
        assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(parsed["a"], "3");
        assert!(parse_query_params("::not a url::").is_empty());
    }

    #[test]
    fn numbers_stringify_like_display() {
        let params = QueryParams::new()
            .with("f", 1.5)
            .with("whole", 2.0)
            .with("big", u64::MAX);
        assert_eq!(
            build_query_string(&params),
            "?f=1.5&whole=2&big=18446744073709551615"
        );
    }
}
