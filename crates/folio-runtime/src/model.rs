#![forbid(unsafe_code)]

//! The page's application model.
//!
//! All interaction state lives in one [`AppState`] owned by [`AppModel`].
//! DOM events arrive as [`AppMsg`] values; `update` mutates state, marks
//! [`Dirty`] regions, and returns effects; `view` re-renders only the dirty
//! regions.
//!
//! # Lifecycle
//!
//! ```text
//! init ──► Fetch(content.json) ──► ContentLoaded(Ok)  ──► SetLang(stored|default)
//!                               └► ContentLoaded(Err) ──► fallback message, inert page
//! ```
//!
//! Until content is ready every interactive message except the theme toggle
//! is ignored.

use std::fmt;

use folio_core::content::{ContentDocument, LocalizedContent};
use folio_core::event::{KeyCode, KeyInput, Modifiers};
use folio_core::link::LinkBase;
use folio_core::storage::{LANG_KEY, Preferences, StorageBackend, THEME_KEY};
use folio_core::{ContentError, ContentResult, FolioConfig, Theme, lang};
use folio_render::{Frame, Patch, Target};
use folio_widgets::command_palette::{CmdkAction, CommandPalette, INPUT_ID, PaletteAction, build_items};
use folio_widgets::lab::{LabDiagram, LabState};
use folio_widgets::page::{Page, ThemeToggle, YEAR_ID};
use folio_widgets::project_modal::{MODAL_ID, ModalState, ProjectModal};
use folio_widgets::sections::render_all;
use folio_widgets::toolbox::{Toolbox, ToolboxState};
use folio_widgets::{RenderCtx, StatefulWidget, Widget};

use crate::dirty::Dirty;
use crate::program::{Cmd, FocusSlot, Model};
use crate::shell::ShellManifest;

/// Container that shows the fallback message when loading fails.
pub const LOAD_ERROR_TARGET: &str = "about-content";

// ---------------------------------------------------------------------------
// Boot context
// ---------------------------------------------------------------------------

/// What the host knows before content arrives.
#[derive(Debug, Clone, Default)]
pub struct Boot {
    /// `navigator.language`.
    pub browser_locale: String,
    /// Stored `lang` preference.
    pub stored_lang: Option<String>,
    /// Initial theme (stored, else system preference).
    pub theme: Theme,
    /// `location.href`, for link validation.
    pub page_url: String,
    /// `prefers-reduced-motion: reduce`.
    pub reduced_motion: bool,
    /// Current year for the footer.
    pub year: Option<i32>,
    pub shell: ShellManifest,
}

impl Boot {
    /// Read stored preferences. The system theme is queried only when no
    /// valid theme is stored.
    pub fn from_preferences<B: StorageBackend>(
        prefs: &Preferences<B>,
        browser_locale: impl Into<String>,
        prefers_dark: impl FnOnce() -> bool,
    ) -> Self {
        Self {
            browser_locale: browser_locale.into(),
            stored_lang: prefs.lang(),
            theme: Theme::resolve_initial(prefs.theme_raw().as_deref(), prefers_dark),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = url.into();
        self
    }

    #[must_use]
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn with_shell(mut self, shell: ShellManifest) -> Self {
        self.shell = shell;
        self
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Content load progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Pending,
    Ready,
    Failed(ContentError),
}

/// Every piece of interaction state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Active language; always a key of the loaded document.
    pub lang: Option<String>,
    pub theme: Theme,
    pub load: LoadStatus,
    pub toolbox: ToolboxState,
    pub palette: CommandPalette,
    pub modal: ModalState,
    pub lab: LabState,
    pub reduced_motion: bool,
}

/// Messages the host sends to the model.
#[derive(Clone, PartialEq)]
pub enum AppMsg {
    /// The content fetch finished with this body.
    ContentLoaded(ContentResult<String>),
    /// A language button was clicked; switches inside a view transition.
    RequestLang(String),
    /// Switch language now.
    SetLang(String),
    ToggleTheme,
    /// A keydown anywhere in the document.
    Key(KeyInput),
    TogglePalette,
    OpenPalette,
    ClosePalette,
    /// The palette input's value changed.
    PaletteQuery(String),
    /// Pointer entered result row `n`.
    PaletteHover(usize),
    /// Result row `n` was clicked.
    PaletteClick(usize),
    /// Run a palette action (after the execute delay).
    Run(CmdkAction),
    ToolboxClick { tag: String, mods: Modifiers },
    ToolboxClear,
    OpenProject(String),
    CloseProject,
    LabActivate(String),
    LabHover(String),
    SetReducedMotion(bool),
}

impl fmt::Debug for AppMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Bodies are large; show only the outcome.
            Self::ContentLoaded(Ok(body)) => write!(f, "ContentLoaded(Ok({} bytes))", body.len()),
            Self::ContentLoaded(Err(e)) => f.debug_tuple("ContentLoaded").field(e).finish(),
            Self::RequestLang(c) => f.debug_tuple("RequestLang").field(c).finish(),
            Self::SetLang(c) => f.debug_tuple("SetLang").field(c).finish(),
            Self::ToggleTheme => write!(f, "ToggleTheme"),
            Self::Key(k) => f.debug_tuple("Key").field(k).finish(),
            Self::TogglePalette => write!(f, "TogglePalette"),
            Self::OpenPalette => write!(f, "OpenPalette"),
            Self::ClosePalette => write!(f, "ClosePalette"),
            Self::PaletteQuery(q) => f.debug_tuple("PaletteQuery").field(q).finish(),
            Self::PaletteHover(i) => f.debug_tuple("PaletteHover").field(i).finish(),
            Self::PaletteClick(i) => f.debug_tuple("PaletteClick").field(i).finish(),
            Self::Run(a) => f.debug_tuple("Run").field(a).finish(),
            Self::ToolboxClick { tag, mods } => f
                .debug_struct("ToolboxClick")
                .field("tag", tag)
                .field("mods", mods)
                .finish(),
            Self::ToolboxClear => write!(f, "ToolboxClear"),
            Self::OpenProject(id) => f.debug_tuple("OpenProject").field(id).finish(),
            Self::CloseProject => write!(f, "CloseProject"),
            Self::LabActivate(id) => f.debug_tuple("LabActivate").field(id).finish(),
            Self::LabHover(id) => f.debug_tuple("LabHover").field(id).finish(),
            Self::SetReducedMotion(on) => f.debug_tuple("SetReducedMotion").field(on).finish(),
        }
    }
}

impl From<KeyInput> for AppMsg {
    fn from(key: KeyInput) -> Self {
        Self::Key(key)
    }
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

// Free function so callers can borrow `doc` while mutating other state.
fn localized<'a>(doc: Option<&'a ContentDocument>, lang: Option<&str>) -> Option<&'a LocalizedContent> {
    doc?.get(lang?)
}

/// The page model.
pub struct AppModel {
    config: FolioConfig,
    links: LinkBase,
    boot: Boot,
    doc: Option<ContentDocument>,
    state: AppState,
    dirty: Dirty,
}

impl AppModel {
    #[must_use]
    pub fn new(config: FolioConfig, boot: Boot) -> Self {
        let state = AppState {
            theme: boot.theme,
            reduced_motion: boot.reduced_motion,
            palette: CommandPalette::new(config.palette_limit),
            ..AppState::default()
        };
        Self {
            links: LinkBase::new(&boot.page_url),
            config,
            boot,
            doc: None,
            state,
            dirty: Dirty::empty(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    #[must_use]
    pub fn document(&self) -> Option<&ContentDocument> {
        self.doc.as_ref()
    }

    /// Regions waiting for the next frame.
    #[must_use]
    pub fn dirty(&self) -> Dirty {
        self.dirty
    }

    /// Active language slice, once content is ready.
    #[must_use]
    pub fn content(&self) -> Option<&LocalizedContent> {
        localized(self.doc.as_ref(), self.state.lang.as_deref())
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state.load == LoadStatus::Ready && self.content().is_some()
    }

    /// Whether pointer-driven motion (lab hover, tilt) is allowed.
    #[must_use]
    pub fn motion_ok(&self) -> bool {
        !self.state.reduced_motion
    }

    // --- Content ---

    fn content_loaded(&mut self, result: ContentResult<String>) -> Cmd<AppMsg> {
        if self.state.load == LoadStatus::Ready {
            return Cmd::none();
        }
        match result.and_then(|body| ContentDocument::from_json_str(&body)) {
            Ok(doc) => {
                folio_core::info!(languages = doc.languages().count(), "content loaded");
                self.doc = Some(doc);
                self.state.load = LoadStatus::Ready;
                let requested = self
                    .boot
                    .stored_lang
                    .clone()
                    .unwrap_or_else(|| lang::default_lang(&self.boot.browser_locale).to_string());
                self.set_lang(&requested)
            }
            Err(err) => {
                folio_core::error!(error = %err, "content load failed");
                let line = err.to_string();
                self.state.load = LoadStatus::Failed(err);
                self.dirty |= Dirty::LOAD_ERROR;
                Cmd::log(line)
            }
        }
    }

    fn set_lang(&mut self, requested: &str) -> Cmd<AppMsg> {
        let default = lang::default_lang(&self.boot.browser_locale);
        let Some(code) = self
            .doc
            .as_ref()
            .and_then(|doc| doc.resolve_lang(requested, default))
            .map(str::to_string)
        else {
            return Cmd::none();
        };
        folio_core::debug!(requested, lang = %code, "set language");
        self.state.lang = Some(code.clone());

        let mut cmds = vec![Cmd::Persist {
            key: LANG_KEY,
            value: code,
        }];
        let Some(content) = localized(self.doc.as_ref(), self.state.lang.as_deref()) else {
            return Cmd::batch(cmds);
        };
        self.state.toolbox.rebuild(content, self.config.toolbox_cap);
        self.state.lab.sync(&content.lab);
        self.state.palette.rebuild(build_items(content));
        let project_gone = self
            .state
            .modal
            .current()
            .is_some_and(|id| content.project(id).is_none());
        if project_gone {
            cmds.push(self.close_project());
        }
        self.dirty |= Dirty::CONTENT;
        Cmd::batch(cmds)
    }

    // --- Theme ---

    fn toggle_theme(&mut self) -> Cmd<AppMsg> {
        self.state.theme = self.state.theme.toggled();
        self.dirty |= Dirty::THEME;
        folio_core::debug!(theme = %self.state.theme, "toggle theme");
        Cmd::Persist {
            key: THEME_KEY,
            value: self.state.theme.as_str().to_string(),
        }
    }

    // --- Palette ---

    fn open_palette(&mut self) -> Cmd<AppMsg> {
        if self.state.palette.is_open() {
            return Cmd::none();
        }
        let Some(content) = self.content() else {
            return Cmd::none();
        };
        let items = build_items(content);
        self.state.palette.open(items);
        self.dirty |= Dirty::PALETTE | Dirty::PALETTE_FOCUS;
        Cmd::RememberFocus(FocusSlot::Palette)
    }

    fn close_palette(&mut self) -> Cmd<AppMsg> {
        if !self.state.palette.is_open() {
            return Cmd::none();
        }
        self.state.palette.close();
        self.palette_closed()
    }

    fn palette_closed(&mut self) -> Cmd<AppMsg> {
        self.dirty |= Dirty::PALETTE;
        Cmd::RestoreFocus(FocusSlot::Palette)
    }

    fn palette_outcome(&mut self, outcome: Option<PaletteAction>) -> Cmd<AppMsg> {
        match outcome {
            None => Cmd::none(),
            Some(PaletteAction::Dismiss) => self.palette_closed(),
            Some(PaletteAction::Execute(action)) => Cmd::batch(vec![
                self.palette_closed(),
                Cmd::Delay(self.config.execute_delay, AppMsg::Run(action)),
            ]),
        }
    }

    fn run(&mut self, action: CmdkAction) -> Cmd<AppMsg> {
        folio_core::debug!(?action, "run palette action");
        match action {
            CmdkAction::ScrollTo(anchor) => Cmd::ScrollTo(anchor),
            CmdkAction::ToggleTheme => self.toggle_theme(),
            CmdkAction::OpenUrl { href, new_tab } => Cmd::OpenUrl { href, new_tab },
            CmdkAction::CopyText(text) => Cmd::CopyText(text),
            CmdkAction::OpenProject(id) => self.open_project(&id),
        }
    }

    // --- Keyboard ---

    fn key(&mut self, key: KeyInput) -> Cmd<AppMsg> {
        if key.is_palette_shortcut() {
            return self.toggle_palette();
        }
        if self.state.palette.is_open() {
            let before = self.state.palette.active_index();
            let outcome = self.state.palette.handle_key(&key);
            if outcome.is_none() && self.state.palette.active_index() != before {
                self.dirty |= Dirty::PALETTE_ACTIVE;
            }
            return self.palette_outcome(outcome);
        }
        if self.state.modal.wants_close(&key) {
            return self.close_project();
        }
        if key.code == KeyCode::Escape {
            folio_core::trace!("escape with nothing open");
        }
        Cmd::none()
    }

    fn toggle_palette(&mut self) -> Cmd<AppMsg> {
        if self.state.palette.is_open() {
            self.close_palette()
        } else {
            self.open_palette()
        }
    }

    // --- Modal ---

    fn open_project(&mut self, id: &str) -> Cmd<AppMsg> {
        let exists = self.content().is_some_and(|c| c.project(id).is_some());
        if !exists {
            folio_core::warn!(project = id, "unknown project id");
            return Cmd::none();
        }
        let was_open = self.state.modal.is_open();
        self.state.modal.open(id);
        self.dirty |= Dirty::MODAL;
        if was_open {
            return Cmd::none();
        }
        Cmd::batch(vec![
            Cmd::RememberFocus(FocusSlot::Modal),
            Cmd::OpenDialog(MODAL_ID.to_string()),
        ])
    }

    fn close_project(&mut self) -> Cmd<AppMsg> {
        if self.state.modal.close().is_none() {
            return Cmd::none();
        }
        self.dirty |= Dirty::MODAL;
        Cmd::batch(vec![
            Cmd::CloseDialog(MODAL_ID.to_string()),
            Cmd::RestoreFocus(FocusSlot::Modal),
        ])
    }

    // --- Toolbox / Lab ---

    fn toolbox_click(&mut self, tag: &str, mods: Modifiers) -> Cmd<AppMsg> {
        if self.state.toolbox.click(tag, mods) {
            self.dirty |= Dirty::TOOLBOX;
        }
        Cmd::none()
    }

    fn lab_activate(&mut self, id: &str, hover: bool) -> Cmd<AppMsg> {
        let motion_ok = self.motion_ok();
        let Some(content) = localized(self.doc.as_ref(), self.state.lang.as_deref()) else {
            return Cmd::none();
        };
        let changed = if hover {
            self.state.lab.hover(&content.lab, id, motion_ok)
        } else {
            self.state.lab.activate(&content.lab, id)
        };
        if changed {
            self.dirty |= Dirty::LAB_ACTIVE;
        }
        Cmd::none()
    }
}

impl Model for AppModel {
    type Message = AppMsg;

    fn init(&mut self) -> Cmd<AppMsg> {
        self.dirty |= Dirty::THEME;
        if self.boot.year.is_some() {
            self.dirty |= Dirty::YEAR;
        }
        Cmd::Fetch {
            url: self.config.content_url.clone(),
            on_done: AppMsg::ContentLoaded,
        }
    }

    fn update(&mut self, msg: AppMsg) -> Cmd<AppMsg> {
        match msg {
            AppMsg::ContentLoaded(result) => return self.content_loaded(result),
            AppMsg::ToggleTheme => return self.toggle_theme(),
            AppMsg::SetReducedMotion(on) => {
                self.state.reduced_motion = on;
                return Cmd::none();
            }
            _ if !self.is_ready() => {
                folio_core::trace!(?msg, "ignored before content is ready");
                return Cmd::none();
            }
            _ => {}
        }

        match msg {
            AppMsg::RequestLang(code) => Cmd::Transition(AppMsg::SetLang(code)),
            AppMsg::SetLang(code) => self.set_lang(&code),
            AppMsg::Key(key) => self.key(key),
            AppMsg::TogglePalette => self.toggle_palette(),
            AppMsg::OpenPalette => self.open_palette(),
            AppMsg::ClosePalette => self.close_palette(),
            AppMsg::PaletteQuery(query) => {
                if self.state.palette.is_open() && self.state.palette.query() != query {
                    self.state.palette.set_query(&query);
                    self.dirty |= Dirty::PALETTE;
                }
                Cmd::none()
            }
            AppMsg::PaletteHover(row) => {
                if self.state.palette.hover(row) {
                    self.dirty |= Dirty::PALETTE_ACTIVE;
                }
                Cmd::none()
            }
            AppMsg::PaletteClick(row) => {
                let outcome = self.state.palette.click(row);
                self.palette_outcome(outcome)
            }
            AppMsg::Run(action) => self.run(action),
            AppMsg::ToolboxClick { tag, mods } => self.toolbox_click(&tag, mods),
            AppMsg::ToolboxClear => {
                if self.state.toolbox.clear() {
                    self.dirty |= Dirty::TOOLBOX;
                }
                Cmd::none()
            }
            AppMsg::OpenProject(id) => self.open_project(&id),
            AppMsg::CloseProject => self.close_project(),
            AppMsg::LabActivate(id) => self.lab_activate(&id, false),
            AppMsg::LabHover(id) => self.lab_activate(&id, true),
            AppMsg::ContentLoaded(_) | AppMsg::ToggleTheme | AppMsg::SetReducedMotion(_) => {
                Cmd::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame) {
        let dirty = self.dirty;
        if let Some(year) = self.boot.year.filter(|_| dirty.contains(Dirty::YEAR)) {
            frame.push(Patch::set_text(Target::id(YEAR_ID), year.to_string()));
        }
        if dirty.contains(Dirty::LOAD_ERROR) {
            frame.push(Patch::set_text(
                Target::id(LOAD_ERROR_TARGET),
                self.config.load_error_message.as_str(),
            ));
        }

        let (Some(content), Some(lang)) = (self.content(), self.state.lang.as_deref()) else {
            if dirty.contains(Dirty::THEME) {
                ThemeToggle::render_root(frame, self.state.theme);
            }
            return;
        };
        let ctx = RenderCtx::new(content, &self.links, &self.config);
        let state = &self.state;

        if dirty.contains(Dirty::LANG) {
            let shell = &self.boot.shell;
            Page::new(
                lang,
                &shell.languages,
                &shell.i18n_keys,
                &shell.placeholder_keys,
            )
            .render(&ctx, frame);
            render_all(&ctx, frame);
            LabDiagram.render(&ctx, frame, &state.lab);
        } else if dirty.contains(Dirty::LAB_ACTIVE) {
            LabDiagram.render_active(&ctx, frame, &state.lab);
        }
        if dirty.contains(Dirty::THEME) {
            ThemeToggle.render(&ctx, frame, &state.theme);
        }
        if dirty.contains(Dirty::TOOLBOX) {
            if dirty.contains(Dirty::LANG) {
                Toolbox.render(&ctx, frame, &state.toolbox);
            } else {
                Toolbox.render_selection(&ctx, frame, &state.toolbox);
            }
        }
        if dirty.contains(Dirty::PALETTE) {
            state.palette.render(&ctx, frame);
        } else if dirty.contains(Dirty::PALETTE_ACTIVE) {
            state.palette.render_active(frame);
            frame.push(Patch::set_attr(
                Target::id(INPUT_ID),
                "aria-activedescendant",
                format!("cmdk-opt-{}", state.palette.active_index()),
            ));
        }
        if dirty.contains(Dirty::PALETTE_FOCUS) && state.palette.is_open() {
            frame.push(Patch::Focus(Target::id(INPUT_ID)));
        }
        if dirty.contains(Dirty::MODAL) {
            ProjectModal.render(&ctx, frame, &state.modal);
        }
    }

    fn needs_render(&self) -> bool {
        !self.dirty.is_empty()
    }

    fn frame_presented(&mut self) {
        self.dirty = Dirty::empty();
    }
}
