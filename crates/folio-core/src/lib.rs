#![forbid(unsafe_code)]

//! Core: content schema, language and theme resolution, preference storage,
//! search normalization, and DOM key normalization.

pub mod config;
pub mod content;
pub mod error;
pub mod event;
pub mod lang;
pub mod link;
pub mod logging;
pub mod normalize;
pub mod storage;
pub mod theme;

pub use config::FolioConfig;
pub use content::{ContentDocument, LocalizedContent, Project};
pub use error::{ContentError, ContentResult};
pub use theme::Theme;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
