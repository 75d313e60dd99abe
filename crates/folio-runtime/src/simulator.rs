#![forbid(unsafe_code)]

//! Deterministic program simulator for testing.
//!
//! `ProgramSimulator` runs a [`Model`] without a browser. Effects are
//! performed against in-memory stand-ins: a [`DomMirror`] for the document,
//! [`MemoryStorage`] for `localStorage`, a table of canned fetch responses,
//! and a virtual clock for timers. Every effect is recorded in a command log.
//!
//! # Example
//!
//! ```ignore
//! use folio_runtime::simulator::ProgramSimulator;
//!
//! let mut sim = ProgramSimulator::new(model)
//!     .with_response("content.json", Ok(body));
//! sim.init();
//! sim.send(AppMsg::TogglePalette);
//! assert!(sim.dom().by_id("cmdk").is_some_and(|e| e.has_class("is-open")));
//! ```

use std::collections::HashMap;
use std::time::Duration;

use folio_core::storage::{MemoryStorage, Preferences};
use folio_core::{ContentError, ContentResult};
use folio_render::{DomMirror, Element, Frame, Patch, Target};

use crate::program::{Cmd, FocusSlot, Model, Program};
use crate::shell::default_shell;

/// Record of an effect performed during simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdRecord {
    /// Content requested; `ok` is whether a canned response existed.
    Fetch { url: String, ok: bool },
    /// Timer scheduled.
    Delay(Duration),
    /// Message run inside a (simulated, immediate) view transition.
    Transition,
    /// Preference written.
    Persist { key: String, value: String },
    OpenDialog(String),
    CloseDialog(String),
    RememberFocus(FocusSlot),
    RestoreFocus(FocusSlot),
    ScrollTo(String),
    OpenUrl { href: String, new_tab: bool },
    CopyText(String),
    Log(String),
}

struct Timer<Msg> {
    due: Duration,
    seq: u64,
    msg: Msg,
}

/// Deterministic simulator for [`Model`] testing.
pub struct ProgramSimulator<M: Model> {
    program: Program<M>,
    dom: DomMirror,
    prefs: Preferences<MemoryStorage>,
    responses: HashMap<String, ContentResult<String>>,
    /// Virtual time since start.
    now: Duration,
    timers: Vec<Timer<M::Message>>,
    next_seq: u64,
    focus_slots: HashMap<FocusSlot, Option<Target>>,
    frames: Vec<Frame>,
    command_log: Vec<CmdRecord>,
    logs: Vec<String>,
    clipboard: Option<String>,
}

impl<M: Model> ProgramSimulator<M> {
    /// Create a simulator over the default shell.
    ///
    /// The model is not initialized until [`init`](Self::init) is called.
    pub fn new(model: M) -> Self {
        Self::with_shell(model, default_shell())
    }

    /// Create a simulator over a custom document.
    pub fn with_shell(model: M, shell: Element) -> Self {
        Self {
            program: Program::new(model),
            dom: DomMirror::new(shell),
            prefs: Preferences::new(MemoryStorage::new()),
            responses: HashMap::new(),
            now: Duration::ZERO,
            timers: Vec::new(),
            next_seq: 0,
            focus_slots: HashMap::new(),
            frames: Vec::new(),
            command_log: Vec::new(),
            logs: Vec::new(),
            clipboard: None,
        }
    }

    /// Register the response a fetch of `url` produces. Unregistered URLs
    /// fail with a network error.
    #[must_use]
    pub fn with_response(mut self, url: impl Into<String>, response: ContentResult<String>) -> Self {
        self.responses.insert(url.into(), response);
        self
    }

    /// Use this storage for persisted preferences.
    #[must_use]
    pub fn with_storage(mut self, storage: MemoryStorage) -> Self {
        self.prefs = Preferences::new(storage);
        self
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Initialize the model, perform its effects, and present the first frame.
    pub fn init(&mut self) {
        let effects = self.program.init();
        self.perform_all(effects);
        self.present();
    }

    /// Send a message, perform its effects, and present.
    pub fn send(&mut self, msg: M::Message) {
        self.deliver(msg);
        self.present();
    }

    /// Send several messages, presenting after each.
    pub fn send_all(&mut self, msgs: impl IntoIterator<Item = M::Message>) {
        for msg in msgs {
            self.send(msg);
        }
    }

    /// Advance the virtual clock, firing due timers in schedule order.
    pub fn advance(&mut self, by: Duration) {
        let until = self.now + by;
        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due <= until)
                .min_by_key(|(_, t)| (t.due, t.seq))
                .map(|(i, _)| i);
            let Some(index) = next else { break };
            let timer = self.timers.swap_remove(index);
            self.now = timer.due;
            self.send(timer.msg);
        }
        self.now = until;
    }

    /// Simulate the user focusing an element.
    pub fn focus(&mut self, target: Target) {
        self.dom.apply_patch(&Patch::Focus(target));
    }

    /// Render pending changes into the mirror. Returns whether a frame was
    /// produced.
    pub fn present(&mut self) -> bool {
        let Some(frame) = self.program.render() else {
            return false;
        };
        self.dom.apply(&frame);
        self.frames.push(frame);
        true
    }

    fn deliver(&mut self, msg: M::Message) {
        let effects = self.program.dispatch(msg);
        self.perform_all(effects);
    }

    fn perform_all(&mut self, effects: Vec<Cmd<M::Message>>) {
        for cmd in effects {
            self.perform(cmd);
        }
    }

    /// Perform one effect against the in-memory environment.
    fn perform(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => self.perform_all(cmds),
            Cmd::Msg(m) => self.deliver(m),
            Cmd::Delay(after, msg) => {
                self.command_log.push(CmdRecord::Delay(after));
                self.timers.push(Timer {
                    due: self.now + after,
                    seq: self.next_seq,
                    msg,
                });
                self.next_seq += 1;
            }
            Cmd::Transition(msg) => {
                self.command_log.push(CmdRecord::Transition);
                self.deliver(msg);
            }
            Cmd::Fetch { url, on_done } => {
                let response = self.responses.get(&url).cloned();
                self.command_log.push(CmdRecord::Fetch {
                    url: url.clone(),
                    ok: response.is_some(),
                });
                let result = response
                    .unwrap_or_else(|| Err(ContentError::Network(format!("no route to {url}"))));
                self.deliver(on_done(result));
            }
            Cmd::Persist { key, value } => {
                self.prefs.store(key, &value);
                self.command_log.push(CmdRecord::Persist {
                    key: key.to_string(),
                    value,
                });
            }
            Cmd::OpenDialog(id) => {
                self.dom.apply_patch(&Patch::set_attr(Target::id(id.as_str()), "open", ""));
                self.command_log.push(CmdRecord::OpenDialog(id));
            }
            Cmd::CloseDialog(id) => {
                self.dom.apply_patch(&Patch::remove_attr(Target::id(id.as_str()), "open"));
                self.command_log.push(CmdRecord::CloseDialog(id));
            }
            Cmd::RememberFocus(slot) => {
                self.focus_slots.insert(slot, self.dom.focused().cloned());
                self.command_log.push(CmdRecord::RememberFocus(slot));
            }
            Cmd::RestoreFocus(slot) => {
                if let Some(Some(target)) = self.focus_slots.remove(&slot) {
                    self.dom.apply_patch(&Patch::Focus(target));
                }
                self.command_log.push(CmdRecord::RestoreFocus(slot));
            }
            Cmd::ScrollTo(anchor) => self.command_log.push(CmdRecord::ScrollTo(anchor)),
            Cmd::OpenUrl { href, new_tab } => {
                self.command_log.push(CmdRecord::OpenUrl { href, new_tab });
            }
            Cmd::CopyText(text) => {
                self.clipboard = Some(text.clone());
                self.command_log.push(CmdRecord::CopyText(text));
            }
            Cmd::Log(text) => {
                self.command_log.push(CmdRecord::Log(text.clone()));
                self.logs.push(text);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    pub fn model(&self) -> &M {
        self.program.model()
    }

    pub fn model_mut(&mut self) -> &mut M {
        self.program.model_mut()
    }

    /// The simulated document.
    pub fn dom(&self) -> &DomMirror {
        &self.dom
    }

    /// The simulated `localStorage`.
    pub fn storage(&self) -> &MemoryStorage {
        self.prefs.backend()
    }

    /// Virtual time since start.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Timers scheduled but not yet fired.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Every presented frame.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn command_log(&self) -> &[CmdRecord] {
        &self.command_log
    }

    /// Lines written via `Cmd::Log`.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Last text copied to the clipboard.
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    pub fn clear_log(&mut self) {
        self.command_log.clear();
        self.logs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---------- Test model ----------

    #[derive(Default)]
    struct Echo {
        seen: Vec<&'static str>,
        loaded: Option<ContentResult<String>>,
    }

    #[derive(Debug, Clone)]
    enum EchoMsg {
        Loaded(ContentResult<String>),
        Later(&'static str),
        Schedule(Duration, &'static str),
        Save,
        Open,
        Close,
    }

    impl Model for Echo {
        type Message = EchoMsg;

        fn init(&mut self) -> Cmd<EchoMsg> {
            Cmd::Fetch {
                url: "content.json".into(),
                on_done: EchoMsg::Loaded,
            }
        }

        fn update(&mut self, msg: EchoMsg) -> Cmd<EchoMsg> {
            match msg {
                EchoMsg::Loaded(result) => {
                    self.loaded = Some(result);
                    Cmd::none()
                }
                EchoMsg::Later(tag) => {
                    self.seen.push(tag);
                    Cmd::none()
                }
                EchoMsg::Schedule(after, tag) => Cmd::Delay(after, EchoMsg::Later(tag)),
                EchoMsg::Save => Cmd::Persist {
                    key: "theme",
                    value: "dark".into(),
                },
                EchoMsg::Open => Cmd::batch(vec![
                    Cmd::RememberFocus(FocusSlot::Modal),
                    Cmd::OpenDialog("project-modal".into()),
                ]),
                EchoMsg::Close => Cmd::batch(vec![
                    Cmd::CloseDialog("project-modal".into()),
                    Cmd::RestoreFocus(FocusSlot::Modal),
                ]),
            }
        }

        fn view(&self, _frame: &mut Frame) {}
    }

    #[test]
    fn unregistered_fetch_is_a_network_error() {
        let mut sim = ProgramSimulator::new(Echo::default());
        sim.init();
        assert!(matches!(
            sim.model().loaded,
            Some(Err(ContentError::Network(_)))
        ));
        assert_eq!(
            sim.command_log()[0],
            CmdRecord::Fetch {
                url: "content.json".into(),
                ok: false
            }
        );
    }

    #[test]
    fn registered_fetch_delivers_body() {
        let mut sim =
            ProgramSimulator::new(Echo::default()).with_response("content.json", Ok("{}".into()));
        sim.init();
        assert_eq!(sim.model().loaded, Some(Ok("{}".to_string())));
    }

    #[test]
    fn timers_fire_in_due_order() {
        let mut sim = ProgramSimulator::new(Echo::default());
        sim.send(EchoMsg::Schedule(Duration::from_millis(200), "b"));
        sim.send(EchoMsg::Schedule(Duration::from_millis(100), "a"));
        sim.advance(Duration::from_millis(99));
        assert!(sim.model().seen.is_empty());
        sim.advance(Duration::from_millis(150));
        assert_eq!(sim.model().seen, vec!["a", "b"]);
        assert_eq!(sim.pending_timers(), 0);
        assert_eq!(sim.now(), Duration::from_millis(249));
    }

    #[test]
    fn persist_writes_storage() {
        let mut sim = ProgramSimulator::new(Echo::default());
        sim.send(EchoMsg::Save);
        assert_eq!(sim.storage().entries().get("theme").map(String::as_str), Some("dark"));
    }

    #[test]
    fn dialog_and_focus_round_trip() {
        let mut sim = ProgramSimulator::new(Echo::default());
        sim.focus(Target::id("cmdk-open"));
        sim.send(EchoMsg::Open);
        assert!(sim.dom().by_id("project-modal").and_then(|e| e.get_attr("open")).is_some());
        sim.focus(Target::id("project-modal-body"));
        sim.send(EchoMsg::Close);
        assert!(sim.dom().by_id("project-modal").and_then(|e| e.get_attr("open")).is_none());
        assert_eq!(sim.dom().focused(), Some(&Target::id("cmdk-open")));
    }
}
