//! Transport adapters implementing [`HttpAdapter`](crate::http::HttpAdapter).
//!
//! - [`ReqwestAdapter`]: async `reqwest` client, the default transport.
//! - [`UreqAdapter`]: blocking `ureq` agent driven from the blocking pool.
//! - [`MockAdapter`]: in-memory double that records calls, for tests.

mod mock;
mod reqwest_adapter;
mod ureq_adapter;

pub use mock::{MockAdapter, RecordedCall};
pub use reqwest_adapter::ReqwestAdapter;
pub use ureq_adapter::UreqAdapter;

/// Fragments browsers put in the message of a fetch blocked by CORS or by
/// the network layer.
const CORS_MARKERS: [&str; 3] = ["failed to fetch", "network request failed", "cors"];

pub(crate) fn is_cors_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    CORS_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// `err` followed by each of its sources, joined with `": "`.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let part = inner.to_string();
        if !text.contains(&part) {
            text.push_str(": ");
            text.push_str(&part);
        }
        source = inner.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_cors_messages() {
        assert!(is_cors_message("TypeError: Failed to fetch"));
        assert!(is_cors_message("Network request failed"));
        assert!(is_cors_message("blocked by CORS policy"));
        assert!(!is_cors_message("connection refused"));
        assert!(!is_cors_message(""));
    }

    #[test]
    fn error_chain_includes_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let outer = std::io::Error::new(std::io::ErrorKind::Other, inner);
        assert_eq!(error_chain(&outer), "connection refused");

        #[derive(Debug)]
        struct Wrapper(std::io::Error);
        impl std::fmt::Display for Wrapper {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "error sending request")
            }
        }
        impl std::error::Error for Wrapper {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                Some(&self.0)
            }
        }
        let wrapped = Wrapper(std::io::Error::new(std::io::ErrorKind::Other, "tcp connect error"));
        assert_eq!(error_chain(&wrapped), "error sending request: tcp connect error");
    }
}
