#![forbid(unsafe_code)]

//! The browser host: owns the program and performs its effects.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use folio_core::ContentResult;
use folio_core::storage::{Preferences, StorageBackend};
use folio_runtime::{AppModel, AppMsg, Boot, Cmd, FocusSlot, Program, ShellManifest};
use folio_widgets::focus_trap::{FOCUSABLE_SELECTOR, FocusMove};
use folio_widgets::project_modal::MODAL_ID;
use js_sys::{Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Document, Element, HtmlElement, MediaQueryList, ScrollBehavior, ScrollIntoViewOptions, Window,
};

use super::backdrop::Backdrop;
use super::dialog::NativeDialog;
use super::dom::DomPresenter;
use super::events::{self, Listener};
use super::fetch::fetch_text;
use super::reveal::Reveal;
use super::storage::LocalStorage;
use super::{describe, js_error};
use crate::capability::{Capabilities, DialogStrategy, TransitionStrategy};
use crate::dialog::{DialogProvider, PolyfillDialog};
use crate::error::{HostError, HostResult};
use crate::motion::AnimationGate;
use crate::routing::{CONTENT_URL_ATTR, host_config};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
const DARK_QUERY: &str = "(prefers-color-scheme: dark)";
const SHELL_SELECTOR: &str = "[data-i18n],[data-i18n-placeholder],[data-lang]";

fn has_property(target: &JsValue, name: &str) -> bool {
    Reflect::has(target, &JsValue::from_str(name)).unwrap_or(false)
}

fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn media_matches(window: &Window, query: &str) -> bool {
    window
        .match_media(query)
        .ok()
        .flatten()
        .is_some_and(|q| q.matches())
}

/// Probe the optional browser APIs.
fn probe(window: &Window, document: &Document, storage: bool) -> Capabilities {
    let mut caps = Capabilities::empty();
    let dialog = document
        .create_element("dialog")
        .is_ok_and(|el| has_property(&el, "showModal"));
    caps.set(Capabilities::DIALOG, dialog);
    caps.set(
        Capabilities::VIEW_TRANSITION,
        has_property(document, "startViewTransition"),
    );
    caps.set(
        Capabilities::INTERSECTION_OBSERVER,
        has_property(window, "IntersectionObserver"),
    );
    caps.set(
        Capabilities::CLIPBOARD,
        property(&window.navigator(), "clipboard").is_some_and(|c| has_property(&c, "writeText")),
    );
    caps.set(Capabilities::STORAGE, storage);
    caps
}

fn scan_shell(document: &Document) -> HostResult<ShellManifest> {
    let list = document
        .query_selector_all(SHELL_SELECTOR)
        .map_err(js_error)?;
    let mut manifest = ShellManifest::new();
    for el in (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
    {
        manifest.observe(
            el.get_attribute("data-i18n").as_deref(),
            el.get_attribute("data-i18n-placeholder").as_deref(),
            el.get_attribute("data-lang").as_deref(),
        );
    }
    Ok(manifest)
}

pub(crate) struct Host {
    window: Window,
    document: Document,
    caps: Capabilities,
    prefs: Preferences<LocalStorage>,
    presenter: DomPresenter,
    program: RefCell<Program<AppModel>>,
    queue: RefCell<VecDeque<AppMsg>>,
    busy: Cell<bool>,
    dialog: RefCell<Box<dyn DialogProvider>>,
    focus: RefCell<HashMap<FocusSlot, Element>>,
    reduced_motion_query: Option<MediaQueryList>,
    listeners: RefCell<Vec<Listener>>,
    backdrop: RefCell<Option<Rc<Backdrop>>>,
    reveal: RefCell<Option<Reveal>>,
}

impl Host {
    /// Read the environment, build the program, and start it.
    pub(crate) fn boot() -> HostResult<Rc<Self>> {
        let window = web_sys::window().ok_or(HostError::NoGlobal("window"))?;
        let document = window.document().ok_or(HostError::NoGlobal("document"))?;
        let root = document
            .document_element()
            .ok_or(HostError::NoGlobal("document.documentElement"))?;
        let config = host_config(root.get_attribute(CONTENT_URL_ATTR).as_deref());

        let storage = LocalStorage::open(&window);
        let caps = probe(&window, &document, storage.is_available());
        let prefs = Preferences::new(storage);

        let reduced_motion_query = window.match_media(REDUCED_MOTION_QUERY).ok().flatten();
        let reduced_motion = reduced_motion_query
            .as_ref()
            .is_some_and(MediaQueryList::matches);
        let mut boot = Boot::from_preferences(
            &prefs,
            window.navigator().language().unwrap_or_default(),
            || media_matches(&window, DARK_QUERY),
        )
        .with_page_url(window.location().href().unwrap_or_default())
        .with_reduced_motion(reduced_motion)
        .with_shell(scan_shell(&document)?);
        if let Ok(year) = i32::try_from(js_sys::Date::new_0().get_full_year()) {
            boot = boot.with_year(year);
        }

        let presenter = DomPresenter::new(document.clone());
        let dialog: Box<dyn DialogProvider> = match caps.dialog_strategy() {
            DialogStrategy::Native => Box::new(NativeDialog::new(document.clone())),
            DialogStrategy::Polyfill => Box::new(PolyfillDialog::new(presenter.clone())),
        };
        folio_core::info!(
            capabilities = %caps.describe(),
            dialog = dialog.name(),
            content_url = %config.content_url,
            "boot"
        );

        let host = Rc::new(Self {
            window,
            document,
            caps,
            prefs,
            presenter,
            program: RefCell::new(Program::new(AppModel::new(config, boot))),
            queue: RefCell::new(VecDeque::new()),
            busy: Cell::new(false),
            dialog: RefCell::new(dialog),
            focus: RefCell::new(HashMap::new()),
            reduced_motion_query,
            listeners: RefCell::new(Vec::new()),
            backdrop: RefCell::new(None),
            reveal: RefCell::new(None),
        });
        host.start()?;
        Ok(host)
    }

    fn start(self: &Rc<Self>) -> HostResult<()> {
        let effects = self.program.borrow_mut().init();
        self.perform_all(effects);
        // Theme and year go out before the content arrives.
        self.present();

        let native_dialog = self
            .document
            .get_element_by_id(MODAL_ID)
            .filter(|_| self.caps.dialog_strategy() == DialogStrategy::Native);
        *self.listeners.borrow_mut() = events::install(self, native_dialog.as_ref())?;

        let (config, theme, reduced_motion) = {
            let program = self.program.borrow();
            let model = program.model();
            (
                model.config().clone(),
                model.state().theme,
                model.state().reduced_motion,
            )
        };
        let gate = AnimationGate::new(self.document.hidden(), reduced_motion);
        *self.backdrop.borrow_mut() =
            Backdrop::start(&self.window, &self.document, &config, theme, gate)?;

        let reveal = if self.caps.reveal_immediately() || reduced_motion {
            Reveal::show_all(&self.document)?
        } else {
            Reveal::observe(&self.document, config.reveal_threshold)?
        };
        *self.reveal.borrow_mut() = Some(reveal);
        Ok(())
    }

    /// Detach listeners and stop the animation loop.
    pub(crate) fn shutdown(&self) {
        self.listeners.borrow_mut().clear();
        if let Some(backdrop) = self.backdrop.borrow_mut().take() {
            backdrop.stop();
        }
        self.reveal.borrow_mut().take();
        folio_core::info!("shutdown");
    }

    // -----------------------------------------------------------------------
    // Message loop
    // -----------------------------------------------------------------------

    /// Queue a message and, unless a dispatch is already running further up
    /// the stack, drain the queue.
    pub(crate) fn send(self: &Rc<Self>, msg: AppMsg) {
        self.queue.borrow_mut().push_back(msg);
        if self.busy.replace(true) {
            return;
        }
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(msg) = next else {
                break;
            };
            let effects = self.program.borrow_mut().dispatch(msg);
            self.perform_all(effects);
            self.present();
        }
        self.busy.set(false);
    }

    fn present(&self) {
        let frame = self.program.borrow_mut().render();
        if let Some(frame) = frame
            && let Err(err) = self.presenter.apply(&frame)
        {
            folio_core::error!(error = %err, "frame apply failed");
        }
        let (theme, reduced_motion) = {
            let program = self.program.borrow();
            let state = program.model().state();
            (state.theme, state.reduced_motion)
        };
        if let Some(backdrop) = self.backdrop.borrow().as_ref() {
            backdrop.sync(theme, reduced_motion);
        }
    }

    fn perform_all(self: &Rc<Self>, effects: Vec<Cmd<AppMsg>>) {
        for cmd in effects {
            self.perform(cmd);
        }
    }

    fn perform(self: &Rc<Self>, cmd: Cmd<AppMsg>) {
        folio_core::trace!(effect = cmd.type_name(), "perform");
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => self.perform_all(cmds),
            Cmd::Msg(msg) => self.send(msg),
            Cmd::Delay(after, msg) => self.set_timeout(after, msg),
            Cmd::Transition(msg) => self.transition(msg),
            Cmd::Fetch { url, on_done } => self.fetch(url, on_done),
            Cmd::Persist { key, value } => self.prefs.store(key, &value),
            Cmd::OpenDialog(id) => {
                if let Err(err) = self.dialog.borrow_mut().show(&id) {
                    folio_core::error!(error = %err, "dialog show failed");
                }
            }
            Cmd::CloseDialog(id) => {
                if let Err(err) = self.dialog.borrow_mut().close(&id) {
                    folio_core::error!(error = %err, "dialog close failed");
                }
            }
            Cmd::RememberFocus(slot) => {
                if let Some(el) = self.document.active_element() {
                    self.focus.borrow_mut().insert(slot, el);
                }
            }
            Cmd::RestoreFocus(slot) => {
                let remembered = self.focus.borrow_mut().remove(&slot);
                if let Some(el) = remembered
                    .filter(|el| el.is_connected())
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                {
                    if let Err(err) = el.focus() {
                        folio_core::warn!(error = %describe(&err), "focus restore failed");
                    }
                }
            }
            Cmd::ScrollTo(anchor) => self.scroll_to(&anchor),
            Cmd::OpenUrl { href, new_tab } => self.open_url(&href, new_tab),
            Cmd::CopyText(text) => self.copy_text(&text),
            Cmd::Log(line) => web_sys::console::log_1(&JsValue::from_str(&line)),
        }
    }

    // -----------------------------------------------------------------------
    // Effects
    // -----------------------------------------------------------------------

    fn set_timeout(self: &Rc<Self>, after: Duration, msg: AppMsg) {
        let weak = Rc::downgrade(self);
        let callback = Closure::once_into_js(move || {
            if let Some(host) = weak.upgrade() {
                host.send(msg);
            }
        });
        let ms = i32::try_from(after.as_millis()).unwrap_or(i32::MAX);
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), ms)
        {
            folio_core::warn!(error = %describe(&err), "setTimeout failed");
        }
    }

    /// Run `msg` inside `document.startViewTransition` when available.
    fn transition(self: &Rc<Self>, msg: AppMsg) {
        let reduced_motion = self.program.borrow().model().state().reduced_motion;
        if self.caps.transition_strategy(reduced_motion) == TransitionStrategy::ViewTransition
            && let Some(start) = property(&self.document, "startViewTransition")
                .and_then(|f| f.dyn_into::<Function>().ok())
        {
            let slot = Rc::new(RefCell::new(Some(msg)));
            let pending = Rc::clone(&slot);
            let weak = Rc::downgrade(self);
            let callback = Closure::once_into_js(move || {
                let msg = pending.borrow_mut().take();
                if let (Some(host), Some(msg)) = (weak.upgrade(), msg) {
                    host.send(msg);
                }
            });
            if start.call1(&self.document, &callback).is_ok() {
                return;
            }
            folio_core::warn!("view transition rejected; updating directly");
            let msg = slot.borrow_mut().take();
            if let Some(msg) = msg {
                self.send(msg);
            }
            return;
        }
        self.send(msg);
    }

    fn fetch(self: &Rc<Self>, url: String, on_done: fn(ContentResult<String>) -> AppMsg) {
        let weak = Rc::downgrade(self);
        let window = self.window.clone();
        spawn_local(async move {
            let started = web_time::Instant::now();
            let result = fetch_text(&window, &url).await;
            folio_core::debug!(
                url = %url,
                ok = result.is_ok(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "fetch finished"
            );
            if let Some(host) = weak.upgrade() {
                host.send(on_done(result));
            }
        });
    }

    fn scroll_to(&self, anchor: &str) {
        let Ok(Some(el)) = self.document.query_selector(anchor) else {
            folio_core::warn!(anchor, "scroll target not found");
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(if self.motion_ok() {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Auto
        });
        el.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn open_url(&self, href: &str, new_tab: bool) {
        let result = if new_tab {
            self.window
                .open_with_url_and_target_and_features(href, "_blank", "noopener")
                .map(|_| ())
        } else {
            self.window.location().set_href(href)
        };
        if let Err(err) = result {
            folio_core::warn!(href, error = %describe(&err), "navigation failed");
        }
    }

    fn copy_text(&self, text: &str) {
        if !self.caps.contains(Capabilities::CLIPBOARD) {
            folio_core::warn!("clipboard unavailable");
            return;
        }
        let Some(clipboard) = property(&self.window.navigator(), "clipboard") else {
            return;
        };
        let Some(write) =
            property(&clipboard, "writeText").and_then(|f| f.dyn_into::<Function>().ok())
        else {
            return;
        };
        match write
            .call1(&clipboard, &JsValue::from_str(text))
            .and_then(|p| p.dyn_into::<js_sys::Promise>())
        {
            Ok(promise) => spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    folio_core::warn!(error = %describe(&err), "clipboard write rejected");
                }
            }),
            Err(err) => {
                folio_core::warn!(error = %describe(&err), "clipboard write failed");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Queries for event handlers
    // -----------------------------------------------------------------------

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn reduced_motion_query(&self) -> Option<&MediaQueryList> {
        self.reduced_motion_query.as_ref()
    }

    pub(crate) fn palette_open(&self) -> bool {
        self.program.borrow().model().state().palette.is_open()
    }

    pub(crate) fn motion_ok(&self) -> bool {
        self.program.borrow().model().motion_ok()
    }

    pub(crate) fn tilt_max_deg(&self) -> f64 {
        self.program.borrow().model().config().tilt_max_deg
    }

    /// Move Tab focus inside the open dialog when the provider traps it.
    /// Returns whether focus was moved.
    pub(crate) fn trap_tab(&self, dir: FocusMove) -> bool {
        let Some(list) = self
            .document
            .get_element_by_id(MODAL_ID)
            .and_then(|modal| modal.query_selector_all(FOCUSABLE_SELECTOR).ok())
        else {
            return false;
        };
        let items: Vec<HtmlElement> = (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|n| n.dyn_into::<HtmlElement>().ok())
            .collect();
        let active: Option<web_sys::Node> = self.document.active_element().map(Into::into);
        let current = active.and_then(|a| items.iter().position(|el| el.is_same_node(Some(&a))));
        let Some(next) = self
            .dialog
            .borrow()
            .trap_focus(current, items.len(), dir)
        else {
            return false;
        };
        items.get(next).is_some_and(|el| el.focus().is_ok())
    }

    pub(crate) fn set_hidden(&self, hidden: bool) {
        if let Some(backdrop) = self.backdrop.borrow().as_ref() {
            backdrop.set_hidden(hidden);
        }
    }

    pub(crate) fn resize(&self) {
        if let Some(backdrop) = self.backdrop.borrow().as_ref() {
            backdrop.resize();
        }
    }
}
