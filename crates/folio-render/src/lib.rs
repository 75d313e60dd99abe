#![forbid(unsafe_code)]

//! Render kernel: element trees, DOM patch frames, and a DOM mirror.
//!
//! Renderers never touch a real document. They build [`Node`] trees and
//! emit [`Patch`]es into a [`Frame`]; a presenter applies the frame:
//!
//! - the web host turns each patch into `web-sys` calls,
//! - [`DomMirror`] applies it to an in-memory model for tests.

pub mod mirror;
pub mod node;
pub mod patch;

pub use mirror::DomMirror;
pub use node::{Element, Namespace, Node, el, svg, text};
pub use patch::{Frame, Patch, Target};
