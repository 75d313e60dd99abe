#![forbid(unsafe_code)]

//! Error types for content loading.
//!
//! Only a failed fetch, a non-OK status, or an undecodable document is an
//! error. Missing or mistyped fields inside a well-formed document are not:
//! they decode to their defaults (see [`crate::content`]).

use std::fmt;

/// Errors that make the dynamic content unavailable for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// The request never produced a response (offline, blocked, CORS).
    Network(String),
    /// The server answered with a non-2xx status.
    Status(u16),
    /// The body was not a JSON object keyed by language code.
    Parse(String),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Network(msg) => write!(f, "content request failed: {msg}"),
            ContentError::Status(status) => write!(f, "failed to load content: HTTP {status}"),
            ContentError::Parse(msg) => write!(f, "content document is malformed: {msg}"),
        }
    }
}

impl std::error::Error for ContentError {}

impl From<serde_json::Error> for ContentError {
    fn from(e: serde_json::Error) -> Self {
        ContentError::Parse(e.to_string())
    }
}

/// Result type for content operations.
pub type ContentResult<T> = Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_status() {
        assert_eq!(
            ContentError::Status(404).to_string(),
            "failed to load content: HTTP 404"
        );
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(ContentError::from(err), ContentError::Parse(_)));
    }
}
