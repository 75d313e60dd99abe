#![forbid(unsafe_code)]

//! WASM host for Folio.
//!
//! The page model, renderers and state machines live in the host-agnostic
//! crates; this crate binds them to a browser document:
//! - fetching `content.json` and reading/writing `localStorage`,
//! - applying patch frames to the live DOM,
//! - routing delegated DOM events to [`AppMsg`](folio_runtime::AppMsg)s,
//! - choosing dialog and view-transition providers from platform capabilities,
//! - driving the canvas backdrop, card tilt and reveal-on-scroll.
//!
//! Everything that does not need `web-sys` (routing tables, capability
//! selection, the dialog polyfill, backdrop painting, animation gating) is
//! plain Rust and tested natively.

pub mod capability;
pub mod dialog;
pub mod error;
#[cfg(feature = "tracing")]
pub mod logging;
pub mod motion;
pub mod paint;
pub mod routing;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use capability::Capabilities;
pub use dialog::{DialogProvider, PatchSink, PolyfillDialog};
pub use error::{HostError, HostResult};

#[cfg(target_arch = "wasm32")]
pub use wasm::FolioWeb;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct FolioWeb;

#[cfg(not(target_arch = "wasm32"))]
impl FolioWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
