#![forbid(unsafe_code)]

//! Host errors.
//!
//! Browser calls fail with opaque `JsValue`s; the host converts them to
//! [`HostError`] immediately and back to `JsValue` only at the exported API.

use std::fmt;

use folio_core::ContentError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A required global (`window`, `document`) is missing.
    NoGlobal(&'static str),
    /// An element the shell must contain is missing.
    MissingElement(String),
    /// A browser API threw.
    Js(String),
    /// The content document could not be loaded.
    Content(ContentError),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoGlobal(name) => write!(f, "no global `{name}`"),
            Self::MissingElement(sel) => write!(f, "missing element {sel}"),
            Self::Js(msg) => write!(f, "browser error: {msg}"),
            Self::Content(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Content(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContentError> for HostError {
    fn from(err: ContentError) -> Self {
        Self::Content(err)
    }
}

pub type HostResult<T> = Result<T, HostError>;
