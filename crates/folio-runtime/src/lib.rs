#![forbid(unsafe_code)]

//! Runtime for Folio.
//!
//! [`AppModel`] owns all page state and turns DOM events into patches and
//! effects through the [`Program`] loop. Hosts perform the effects: the web
//! crate against the browser, [`ProgramSimulator`] against in-memory
//! stand-ins for tests.

pub mod dirty;
pub mod model;
pub mod program;
pub mod shell;
pub mod simulator;

pub use dirty::Dirty;
pub use model::{AppModel, AppMsg, AppState, Boot, LoadStatus};
pub use program::{Cmd, FocusSlot, Model, Program};
pub use shell::{ShellManifest, default_shell};
pub use simulator::{CmdRecord, ProgramSimulator};
