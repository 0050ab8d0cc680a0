//! Error type for provider fetches.

use thiserror::Error;

use super::Source;

/// A failed page fetch, always attributed to the provider that failed.
#[derive(Debug, Error)]
#[error("Failed to fetch from {provider}{kind}")]
pub struct FetchError {
    pub provider: Source,
    pub kind: FetchErrorKind,
}

/// What went wrong.  Rendered as a short parenthesised suffix so the whole
/// error reads as one line in the dashboard banner.
#[derive(Debug, Error)]
pub enum FetchErrorKind {
    /// The provider answered with a non-2xx status.
    #[error(" (HTTP {0})")]
    Status(u16),

    /// Connection, TLS or timeout failure before a response arrived.
    #[error(" (network error: {0})")]
    Transport(#[source] reqwest::Error),

    /// The body was not the JSON shape this provider documents.
    #[error(" (unexpected response: {0})")]
    Decode(#[source] serde_json::Error),
}

impl FetchError {
    pub fn new(provider: Source, kind: FetchErrorKind) -> Self {
        Self { provider, kind }
    }

    pub fn status(source: Source, code: u16) -> Self {
        Self::new(source, FetchErrorKind::Status(code))
    }

    pub fn transport(source: Source, err: reqwest::Error) -> Self {
        Self::new(source, FetchErrorKind::Transport(err))
    }

    pub fn decode(source: Source, err: serde_json::Error) -> Self {
        Self::new(source, FetchErrorKind::Decode(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_provider() {
        let e = FetchError::status(Source::Guardian, 429);
        assert_eq!(e.to_string(), "Failed to fetch from The Guardian API (HTTP 429)");
    }

    #[test]
    fn decode_error_is_single_line() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = FetchError::decode(Source::Nyt, json_err);
        let msg = e.to_string();
        assert!(msg.starts_with("Failed to fetch from NYT API (unexpected response:"));
        assert!(!msg.contains('\n'));
    }
}
