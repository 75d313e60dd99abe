#![forbid(unsafe_code)]

//! Elm-style update/view loop for the page.
//!
//! The program separates state ([`Model`]) from rendering (`view` into a
//! patch [`Frame`]) and describes side effects as [`Cmd`] values. Nothing in
//! here touches a browser: the host drives a [`Program`] and performs the
//! effects it returns.
//!
//! # Host loop
//!
//! 1. [`Program::init`] once; perform the returned effects.
//! 2. For every DOM event, timer, or fetch completion call
//!    [`Program::dispatch`] and perform the returned effects.
//! 3. After each dispatch call [`Program::render`] and apply the frame.
//!
//! `Cmd::Msg` and `Cmd::Batch` are resolved inside the program, so the
//! effects handed to the host are always leaves.
//!
//! # Example
//!
//! ```ignore
//! use folio_runtime::program::{Cmd, Model, Program};
//! use folio_render::Frame;
//!
//! struct Counter { count: i32 }
//!
//! enum Msg { Increment }
//!
//! impl Model for Counter {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Increment => { self.count += 1; Cmd::none() }
//!         }
//!     }
//!
//!     fn view(&self, _frame: &mut Frame) {}
//! }
//!
//! let mut program = Program::new(Counter { count: 0 });
//! program.init();
//! program.dispatch(Msg::Increment);
//! assert_eq!(program.model().count, 1);
//! ```

use std::fmt;
use std::time::Duration;

use folio_core::ContentResult;
use folio_render::Frame;

/// Application state and behavior.
pub trait Model {
    /// Messages that update the model.
    type Message;

    /// Startup effects, such as fetching content.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Apply one message and return the effects it requires.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Emit patches for whatever changed since the last presented frame.
    fn view(&self, frame: &mut Frame);

    /// Whether `view` would emit anything.
    fn needs_render(&self) -> bool {
        true
    }

    /// Called after the host applied the frame produced by `view`.
    fn frame_presented(&mut self) {}
}

/// Slots under which the host remembers the focused element so it can be
/// restored when an overlay closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusSlot {
    Palette,
    Modal,
}

/// Side effects requested by [`Model::update`].
pub enum Cmd<M> {
    /// No operation.
    None,
    /// Execute multiple commands in order.
    Batch(Vec<Cmd<M>>),
    /// Send a message to the model.
    Msg(M),
    /// Send a message after a delay (one-shot timer).
    Delay(Duration, M),
    /// Send a message inside a view transition when the platform has one;
    /// otherwise immediately.
    Transition(M),
    /// Fetch a document (`cache: no-store`) and report the body.
    Fetch {
        url: String,
        on_done: fn(ContentResult<String>) -> M,
    },
    /// Write a preference key.
    Persist { key: &'static str, value: String },
    /// Show the dialog with this id modally.
    OpenDialog(String),
    /// Close the dialog with this id.
    CloseDialog(String),
    /// Remember the currently focused element.
    RememberFocus(FocusSlot),
    /// Refocus the element remembered in the slot, if it still exists.
    RestoreFocus(FocusSlot),
    /// Scroll the element matching this anchor (`"#id"`) into view.
    ScrollTo(String),
    /// Navigate to a URL, in a new tab when `new_tab`.
    OpenUrl { href: String, new_tab: bool },
    /// Put text on the clipboard.
    CopyText(String),
    /// Write a line to the console.
    Log(String),
}

impl<M> Default for Cmd<M> {
    fn default() -> Self {
        Self::None
    }
}

impl<M: fmt::Debug> fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Delay(d, m) => f.debug_tuple("Delay").field(d).field(m).finish(),
            Self::Transition(m) => f.debug_tuple("Transition").field(m).finish(),
            Self::Fetch { url, .. } => f.debug_struct("Fetch").field("url", url).finish(),
            Self::Persist { key, value } => f
                .debug_struct("Persist")
                .field("key", key)
                .field("value", value)
                .finish(),
            Self::OpenDialog(id) => f.debug_tuple("OpenDialog").field(id).finish(),
            Self::CloseDialog(id) => f.debug_tuple("CloseDialog").field(id).finish(),
            Self::RememberFocus(slot) => f.debug_tuple("RememberFocus").field(slot).finish(),
            Self::RestoreFocus(slot) => f.debug_tuple("RestoreFocus").field(slot).finish(),
            Self::ScrollTo(anchor) => f.debug_tuple("ScrollTo").field(anchor).finish(),
            Self::OpenUrl { href, new_tab } => f
                .debug_struct("OpenUrl")
                .field("href", href)
                .field("new_tab", new_tab)
                .finish(),
            Self::CopyText(s) => f.debug_tuple("CopyText").field(s).finish(),
            Self::Log(s) => f.debug_tuple("Log").field(s).finish(),
        }
    }
}

impl<M> Cmd<M> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Create a log command.
    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    /// Create a batch of commands, flattening trivial cases.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Stable name for logging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Batch(_) => "Batch",
            Self::Msg(_) => "Msg",
            Self::Delay(..) => "Delay",
            Self::Transition(_) => "Transition",
            Self::Fetch { .. } => "Fetch",
            Self::Persist { .. } => "Persist",
            Self::OpenDialog(_) => "OpenDialog",
            Self::CloseDialog(_) => "CloseDialog",
            Self::RememberFocus(_) => "RememberFocus",
            Self::RestoreFocus(_) => "RestoreFocus",
            Self::ScrollTo(_) => "ScrollTo",
            Self::OpenUrl { .. } => "OpenUrl",
            Self::CopyText(_) => "CopyText",
            Self::Log(_) => "Log",
        }
    }
}

// ---------------------------------------------------------------------------
// Program
// ---------------------------------------------------------------------------

/// Host-driven program runner.
///
/// Single-threaded and non-blocking: the host owns the event loop, timers,
/// and I/O, and feeds their outcomes back as messages.
pub struct Program<M: Model> {
    model: M,
    initialized: bool,
    frame_idx: u64,
}

impl<M: Model> Program<M> {
    #[must_use]
    pub fn new(model: M) -> Self {
        Self {
            model,
            initialized: false,
            frame_idx: 0,
        }
    }

    /// Initialize the model. Later calls return no effects.
    pub fn init(&mut self) -> Vec<Cmd<M::Message>> {
        if self.initialized {
            return Vec::new();
        }
        self.initialized = true;
        let cmd = self.model.init();
        let mut effects = Vec::new();
        self.resolve(cmd, &mut effects);
        effects
    }

    /// Run one message through the model and return the leaf effects.
    pub fn dispatch(&mut self, msg: M::Message) -> Vec<Cmd<M::Message>> {
        let cmd = self.model.update(msg);
        let mut effects = Vec::new();
        self.resolve(cmd, &mut effects);
        effects
    }

    fn resolve(&mut self, cmd: Cmd<M::Message>, effects: &mut Vec<Cmd<M::Message>>) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => {
                for c in cmds {
                    self.resolve(c, effects);
                }
            }
            Cmd::Msg(m) => {
                let next = self.model.update(m);
                self.resolve(next, effects);
            }
            leaf => effects.push(leaf),
        }
    }

    /// Render pending changes, or `None` when nothing changed.
    ///
    /// The caller must apply the frame before the next dispatch.
    pub fn render(&mut self) -> Option<Frame> {
        if !self.model.needs_render() {
            return None;
        }
        let mut frame = Frame::new();
        self.model.view(&mut frame);
        self.model.frame_presented();
        self.frame_idx += 1;
        folio_core::trace!(frame = self.frame_idx, patches = frame.len(), "render");
        Some(frame)
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of frames rendered so far.
    #[must_use]
    pub fn frame_idx(&self) -> u64 {
        self.frame_idx
    }
}
