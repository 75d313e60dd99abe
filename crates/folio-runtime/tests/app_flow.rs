#![forbid(unsafe_code)]

//! End-to-end flows of the page model against `site/content.json`.
//!
//! # Coverage
//! 1. Language resolution: browser locale, stored preference, unknown codes,
//!    non-string `data-i18n` values.
//! 2. Theme persistence across a reload without consulting the system.
//! 3. Toolbox selection (single and additive) and its status line.
//! 4. Command palette: shortcut, filtering, keyboard navigation, delayed
//!    execution, focus restoration.
//! 5. Project modal: boxes, Escape, language switch to a slice without it.
//! 6. Lab activation and hover under reduced motion.
//! 7. Load failure fallback.

use std::time::Duration;

use folio_core::FolioConfig;
use folio_core::config::{DEFAULT_CONTENT_URL, DEFAULT_LOAD_ERROR};
use folio_core::event::{KeyCode, KeyInput, Modifiers};
use folio_core::storage::{MemoryStorage, Preferences};
use folio_render::{Element, Target};
use folio_runtime::{
    AppModel, AppMsg, Boot, CmdRecord, FocusSlot, LoadStatus, ProgramSimulator, ShellManifest,
    default_shell,
};
use folio_widgets::command_palette::{INDEX_ATTR, INPUT_ID, PALETTE_ID};
use folio_widgets::lab::NODE_ATTR;
use folio_widgets::project_modal::{BODY_ID, MODAL_ID};
use folio_widgets::sections::PROJECT_ID_ATTR;
use folio_widgets::toolbox::STATUS_ID;
use pretty_assertions::assert_eq;

const SITE_CONTENT: &str = include_str!("../../../site/content.json");

// ---------- Harness ----------

struct Start<'a> {
    entries: Vec<(&'a str, &'a str)>,
    locale: &'a str,
    prefers_dark: bool,
    reduced_motion: bool,
    serve: bool,
}

impl Default for Start<'_> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            locale: "en-US",
            prefers_dark: false,
            reduced_motion: false,
            serve: true,
        }
    }
}

impl Start<'_> {
    fn run(self) -> ProgramSimulator<AppModel> {
        let prefs = Preferences::new(MemoryStorage::with_entries(self.entries.iter().copied()));
        let prefers_dark = self.prefers_dark;
        let boot = Boot::from_preferences(&prefs, self.locale, || prefers_dark)
            .with_page_url("https://ana.example/")
            .with_reduced_motion(self.reduced_motion)
            .with_year(2026)
            .with_shell(ShellManifest::scan(&default_shell()));
        let mut sim = ProgramSimulator::new(AppModel::new(FolioConfig::default(), boot))
            .with_storage(MemoryStorage::with_entries(self.entries.iter().copied()));
        if self.serve {
            sim = sim.with_response(DEFAULT_CONTENT_URL, Ok(SITE_CONTENT.to_string()));
        }
        sim.init();
        sim
    }
}

fn start() -> ProgramSimulator<AppModel> {
    Start::default().run()
}

fn i18n_text(sim: &ProgramSimulator<AppModel>, key: &str) -> String {
    sim.dom()
        .select(&Target::I18n(key.into()))
        .first()
        .map(|e| e.text_content())
        .unwrap_or_default()
}

fn root_attr(sim: &ProgramSimulator<AppModel>, name: &str) -> Option<String> {
    sim.dom().root().get_attr(name).map(str::to_string)
}

fn card<'a>(sim: &'a ProgramSimulator<AppModel>, id: &str) -> &'a Element {
    sim.dom()
        .select(&Target::data(PROJECT_ID_ATTR, id))
        .into_iter()
        .next()
        .expect("project card rendered")
}

fn stored(sim: &ProgramSimulator<AppModel>, key: &str) -> Option<String> {
    sim.storage().entries().get(key).cloned()
}

fn key(code: KeyCode) -> AppMsg {
    AppMsg::Key(KeyInput::plain(code))
}

fn ctrl_k() -> AppMsg {
    AppMsg::Key(KeyInput::new(KeyCode::Char('k'), Modifiers::CTRL))
}

fn click(tag: &str) -> AppMsg {
    AppMsg::ToolboxClick {
        tag: tag.into(),
        mods: Modifiers::empty(),
    }
}

fn shift_click(tag: &str) -> AppMsg {
    AppMsg::ToolboxClick {
        tag: tag.into(),
        mods: Modifiers::SHIFT,
    }
}

fn palette_open(sim: &ProgramSimulator<AppModel>) -> bool {
    sim.dom().by_id(PALETTE_ID).is_some_and(|e| {
        e.has_class("is-open") && e.get_attr("hidden").is_none()
    })
}

fn active_row(sim: &ProgramSimulator<AppModel>) -> Option<String> {
    sim.dom()
        .with_class("cmdk-item")
        .into_iter()
        .find(|e| e.has_class("is-active"))
        .and_then(|e| e.get_attr(INDEX_ATTR).map(str::to_string))
}

fn modal_headings(sim: &ProgramSimulator<AppModel>) -> Vec<String> {
    let Some(body) = sim.dom().by_id(BODY_ID) else {
        return Vec::new();
    };
    let mut boxes = Vec::new();
    body.find_all(&|e| e.has_class("modal-box"), &mut boxes);
    boxes
        .iter()
        .filter_map(|b| b.child_elements().next().map(Element::text_content))
        .collect()
}

fn dialog_open(sim: &ProgramSimulator<AppModel>) -> bool {
    sim.dom()
        .by_id(MODAL_ID)
        .is_some_and(|e| e.get_attr("open").is_some())
}

// ---------- Language ----------

#[test]
fn english_locale_renders_english() {
    let sim = start();
    assert_eq!(sim.model().state().lang.as_deref(), Some("en"));
    assert_eq!(root_attr(&sim, "lang").as_deref(), Some("en"));
    assert_eq!(i18n_text(&sim, "nav.about"), "About");
    assert_eq!(sim.dom().title(), "Ana Souza · Backend & Platform Engineer");
    assert_eq!(sim.dom().text_of("year"), "2026");

    let en = sim.dom().select(&Target::data("data-lang", "en"));
    assert!(en[0].has_class("is-active"));
    assert_eq!(en[0].get_attr("aria-pressed"), Some("true"));
    let pt = sim.dom().select(&Target::data("data-lang", "pt"));
    assert!(!pt[0].has_class("is-active"));
}

#[test]
fn portuguese_locale_defaults_to_portuguese() {
    let sim = Start {
        locale: "pt-BR",
        ..Start::default()
    }
    .run();
    assert_eq!(root_attr(&sim, "lang").as_deref(), Some("pt"));
    assert_eq!(i18n_text(&sim, "nav.about"), "Sobre");
    assert_eq!(stored(&sim, "lang").as_deref(), Some("pt"));
}

#[test]
fn stored_language_beats_browser_locale() {
    let sim = Start {
        entries: vec![("lang", "pt")],
        ..Start::default()
    }
    .run();
    assert_eq!(sim.model().state().lang.as_deref(), Some("pt"));
}

#[test]
fn language_button_switches_inside_transition_and_persists() {
    let mut sim = start();
    sim.clear_log();
    sim.send(AppMsg::RequestLang("pt".into()));

    assert_eq!(sim.command_log()[0], CmdRecord::Transition);
    assert!(sim.command_log().contains(&CmdRecord::Persist {
        key: "lang".into(),
        value: "pt".into()
    }));
    assert_eq!(root_attr(&sim, "lang").as_deref(), Some("pt"));
    assert_eq!(i18n_text(&sim, "nav.projects"), "Projetos");
    assert_eq!(stored(&sim, "lang").as_deref(), Some("pt"));
    // Placeholder attributes follow the language too.
    let input = sim.dom().by_id(INPUT_ID).expect("palette input");
    assert!(input.get_attr("placeholder").is_some());
}

#[test]
fn non_string_i18n_values_leave_page_text_alone() {
    let boot = Boot::from_preferences(&Preferences::new(MemoryStorage::new()), "en-US", || false)
        .with_shell(ShellManifest::scan(&default_shell()));
    let body = r#"{"en": {"nav": {"about": 7, "skills": "Skills"}, "labels": {"close": ["x"]}}}"#;
    let mut sim = ProgramSimulator::new(AppModel::new(FolioConfig::default(), boot))
        .with_response(DEFAULT_CONTENT_URL, Ok(body.to_string()));
    sim.init();

    assert!(sim.model().is_ready());
    assert_eq!(i18n_text(&sim, "nav.about"), "about");
    assert_eq!(i18n_text(&sim, "nav.skills"), "Skills");
    assert_eq!(i18n_text(&sim, "labels.close"), "");
}

#[test]
fn unknown_language_falls_back_to_default() {
    let mut sim = Start {
        entries: vec![("lang", "fr")],
        ..Start::default()
    }
    .run();
    assert_eq!(sim.model().state().lang.as_deref(), Some("en"));
    sim.send(AppMsg::SetLang("de".into()));
    assert_eq!(sim.model().state().lang.as_deref(), Some("en"));
}

// ---------- Theme ----------

#[test]
fn system_preference_applies_without_stored_theme() {
    let sim = Start {
        prefers_dark: true,
        ..Start::default()
    }
    .run();
    assert_eq!(root_attr(&sim, "data-theme").as_deref(), Some("dark"));
}

#[test]
fn dark_theme_survives_reload_without_consulting_system() {
    let mut sim = start();
    assert_eq!(root_attr(&sim, "data-theme").as_deref(), Some("light"));
    sim.send(AppMsg::ToggleTheme);
    assert_eq!(root_attr(&sim, "data-theme").as_deref(), Some("dark"));
    assert_eq!(stored(&sim, "theme").as_deref(), Some("dark"));
    let toggle = sim.dom().by_id("theme-toggle").expect("toggle");
    assert_eq!(toggle.get_attr("aria-pressed"), Some("true"));

    // Reload with the same storage. The system query must not run.
    let prefs = Preferences::new(MemoryStorage::with_entries(sim.storage().entries()));
    let boot = Boot::from_preferences(&prefs, "en-US", || -> bool {
        panic!("system theme consulted despite a stored theme")
    });
    let mut reloaded = ProgramSimulator::new(AppModel::new(FolioConfig::default(), boot))
        .with_response(DEFAULT_CONTENT_URL, Ok(SITE_CONTENT.to_string()));
    reloaded.init();
    assert_eq!(root_attr(&reloaded, "data-theme").as_deref(), Some("dark"));
}

#[test]
fn invalid_stored_theme_uses_system_preference() {
    let sim = Start {
        entries: vec![("theme", "sepia")],
        prefers_dark: true,
        ..Start::default()
    }
    .run();
    assert_eq!(root_attr(&sim, "data-theme").as_deref(), Some("dark"));
}

// ---------- Toolbox ----------

#[test]
fn toolbox_single_and_additive_selection() {
    let mut sim = start();
    assert_eq!(sim.dom().text_of(STATUS_ID), "All projects · 3/3 projects");

    sim.send(click("Go"));
    assert!(card(&sim, "ledger").has_class("is-match"));
    assert!(card(&sim, "tracekit").has_class("is-muted"));
    assert_eq!(sim.dom().text_of(STATUS_ID), "Go · 1/3 projects");

    // Plain click replaces the selection.
    sim.send(click("Docker"));
    assert!(card(&sim, "ledger").has_class("is-match"));
    assert!(card(&sim, "tracekit").has_class("is-match"));
    assert!(card(&sim, "replay").has_class("is-muted"));
    assert_eq!(sim.dom().text_of(STATUS_ID), "Docker · 2/3 projects");

    // Additive click narrows to projects carrying every tag.
    sim.send(shift_click("Go"));
    assert_eq!(sim.model().state().toolbox.selected(), ["Docker", "Go"]);
    assert!(card(&sim, "ledger").has_class("is-match"));
    assert!(card(&sim, "tracekit").has_class("is-muted"));
    assert_eq!(sim.dom().text_of(STATUS_ID), "Docker, Go · 1/3 projects");

    sim.send(AppMsg::ToolboxClear);
    assert!(!card(&sim, "ledger").has_class("is-match"));
    assert!(!card(&sim, "replay").has_class("is-muted"));
    assert_eq!(sim.dom().text_of(STATUS_ID), "All projects · 3/3 projects");
}

#[test]
fn toolbox_click_on_sole_selection_clears() {
    let mut sim = start();
    sim.send_all([click("Rust"), click("Rust")]);
    assert!(sim.model().state().toolbox.selected().is_empty());
}

#[test]
fn toolbox_ignores_unknown_tags() {
    let mut sim = start();
    let frames = sim.frames().len();
    sim.send(click("COBOL"));
    assert!(sim.model().state().toolbox.selected().is_empty());
    assert_eq!(sim.frames().len(), frames);
}

// ---------- Palette ----------

#[test]
fn shortcut_opens_palette_and_focuses_input() {
    let mut sim = start();
    sim.focus(Target::id("cmdk-open"));
    sim.send(ctrl_k());
    assert!(palette_open(&sim));
    assert_eq!(sim.dom().focused(), Some(&Target::id(INPUT_ID)));
    assert_eq!(sim.dom().with_class("cmdk-item").len(), 16);
    assert_eq!(active_row(&sim).as_deref(), Some("0"));

    sim.send(ctrl_k());
    assert!(!palette_open(&sim));
    assert_eq!(sim.dom().focused(), Some(&Target::id("cmdk-open")));
}

#[test]
fn query_filters_accent_insensitively() {
    let mut sim = start();
    sim.send_all([AppMsg::OpenPalette, AppMsg::PaletteQuery("DOCKER".into())]);
    let ids: Vec<&str> = sim
        .model()
        .state()
        .palette
        .results()
        .map(|i| i.id.as_str())
        .collect();
    assert_eq!(ids, ["project:ledger", "project:tracekit"]);
    assert_eq!(sim.dom().with_class("cmdk-item").len(), 2);

    sim.send(AppMsg::PaletteQuery("zzzz".into()));
    assert_eq!(sim.dom().with_class("cmdk-item").len(), 0);
    assert_eq!(sim.dom().with_class("cmdk-empty").len(), 1);
}

#[test]
fn arrows_move_active_row_within_bounds() {
    let mut sim = start();
    sim.send(AppMsg::OpenPalette);
    sim.send(key(KeyCode::Up));
    assert_eq!(active_row(&sim).as_deref(), Some("0"));
    sim.send_all([key(KeyCode::Down), key(KeyCode::Down)]);
    assert_eq!(active_row(&sim).as_deref(), Some("2"));
    sim.send(key(KeyCode::End));
    assert_eq!(active_row(&sim).as_deref(), Some("15"));
    sim.send(key(KeyCode::Down));
    assert_eq!(active_row(&sim).as_deref(), Some("15"));
    sim.send(key(KeyCode::Home));
    assert_eq!(active_row(&sim).as_deref(), Some("0"));
    let input = sim.dom().by_id(INPUT_ID).expect("input");
    assert_eq!(input.get_attr("aria-activedescendant"), Some("cmdk-opt-0"));
}

#[test]
fn enter_runs_action_after_delay() {
    let mut sim = start();
    sim.focus(Target::id("cmdk-open"));
    sim.send(AppMsg::OpenPalette);
    sim.clear_log();
    sim.send(key(KeyCode::Enter));

    assert!(!palette_open(&sim));
    assert_eq!(sim.dom().focused(), Some(&Target::id("cmdk-open")));
    assert_eq!(
        sim.command_log(),
        [
            CmdRecord::RestoreFocus(FocusSlot::Palette),
            CmdRecord::Delay(Duration::from_millis(140)),
        ]
    );

    sim.advance(Duration::from_millis(139));
    assert!(!sim.command_log().contains(&CmdRecord::ScrollTo("#about".into())));
    sim.advance(Duration::from_millis(1));
    assert!(sim.command_log().contains(&CmdRecord::ScrollTo("#about".into())));
}

#[test]
fn escape_dismisses_palette() {
    let mut sim = start();
    sim.send(AppMsg::OpenPalette);
    sim.send(key(KeyCode::Escape));
    assert!(!palette_open(&sim));
    assert_eq!(sim.pending_timers(), 0);
}

#[test]
fn clicking_copy_email_fills_clipboard() {
    let mut sim = start();
    sim.send_all([AppMsg::OpenPalette, AppMsg::PaletteQuery("copy".into())]);
    sim.send(AppMsg::PaletteClick(0));
    assert_eq!(sim.clipboard(), None);
    sim.advance(Duration::from_millis(140));
    assert_eq!(sim.clipboard(), Some("ana@example.com"));
}

#[test]
fn palette_theme_action_toggles_theme() {
    let mut sim = start();
    sim.send_all([AppMsg::OpenPalette, AppMsg::PaletteQuery("theme".into())]);
    sim.send(key(KeyCode::Enter));
    sim.advance(Duration::from_millis(140));
    assert_eq!(root_attr(&sim, "data-theme").as_deref(), Some("dark"));
}

#[test]
fn palette_project_action_opens_modal() {
    let mut sim = start();
    sim.send_all([AppMsg::OpenPalette, AppMsg::PaletteQuery("rust".into())]);
    sim.send(key(KeyCode::Enter));
    sim.advance(Duration::from_millis(140));
    assert!(dialog_open(&sim));
    assert_eq!(sim.model().state().modal.current(), Some("tracekit"));
}

// ---------- Modal ----------

#[test]
fn modal_shows_only_filled_boxes_and_closes_on_escape() {
    let mut sim = start();
    sim.focus(Target::data(PROJECT_ID_ATTR, "tracekit"));
    sim.send(AppMsg::OpenProject("tracekit".into()));
    assert!(dialog_open(&sim));

    let headings = modal_headings(&sim);
    assert_eq!(headings.iter().filter(|h| *h == "Impact").count(), 1);
    assert!(!headings.iter().any(|h| h == "Approach"));

    sim.send(key(KeyCode::Escape));
    assert!(!dialog_open(&sim));
    assert!(modal_headings(&sim).is_empty());
    assert_eq!(
        sim.dom().focused(),
        Some(&Target::data(PROJECT_ID_ATTR, "tracekit"))
    );
}

#[test]
fn unknown_project_does_not_open() {
    let mut sim = start();
    sim.send(AppMsg::OpenProject("nope".into()));
    assert!(!dialog_open(&sim));
}

#[test]
fn language_switch_closes_modal_for_missing_project() {
    let mut sim = start();
    sim.send(AppMsg::OpenProject("replay".into()));
    assert!(dialog_open(&sim));
    sim.send(AppMsg::SetLang("pt".into()));
    assert!(!dialog_open(&sim));

    sim.send(AppMsg::OpenProject("ledger".into()));
    sim.send(AppMsg::SetLang("en".into()));
    assert!(dialog_open(&sim));
    assert!(modal_headings(&sim).contains(&"Approach".to_string()));
}

// ---------- Lab ----------

#[test]
fn lab_click_and_hover() {
    let mut sim = start();
    let active = |sim: &ProgramSimulator<AppModel>, id: &str| {
        sim.dom()
            .select(&Target::data(NODE_ATTR, id))
            .first()
            .is_some_and(|e| e.has_class("is-active"))
    };
    assert!(active(&sim, "ingest"));
    sim.send(AppMsg::LabActivate("queue".into()));
    assert!(active(&sim, "queue"));
    assert!(!active(&sim, "ingest"));
    sim.send(AppMsg::LabHover("worker".into()));
    assert!(active(&sim, "worker"));
}

#[test]
fn lab_hover_is_inert_with_reduced_motion() {
    let mut sim = Start {
        reduced_motion: true,
        ..Start::default()
    }
    .run();
    sim.send(AppMsg::LabHover("worker".into()));
    assert_eq!(sim.model().state().lab.active(), Some("ingest"));
}

#[test]
fn lab_falls_back_when_node_missing_after_switch() {
    let mut sim = start();
    sim.send(AppMsg::LabActivate("worker".into()));
    sim.send(AppMsg::SetLang("pt".into()));
    assert_eq!(sim.model().state().lab.active(), Some("ingest"));
}

// ---------- Load failure ----------

#[test]
fn fetch_failure_shows_fallback_and_stays_inert() {
    let mut sim = Start {
        serve: false,
        ..Start::default()
    }
    .run();
    assert!(matches!(sim.model().state().load, LoadStatus::Failed(_)));
    assert_eq!(sim.dom().text_of("about-content"), DEFAULT_LOAD_ERROR);
    assert_eq!(sim.logs().len(), 1);

    sim.send(ctrl_k());
    assert!(!palette_open(&sim));
    sim.send(AppMsg::OpenProject("ledger".into()));
    assert!(!dialog_open(&sim));

    // The theme still toggles.
    sim.send(AppMsg::ToggleTheme);
    assert_eq!(root_attr(&sim, "data-theme").as_deref(), Some("dark"));
}

#[test]
fn malformed_content_is_a_load_failure() {
    let boot = Boot::default();
    let mut sim = ProgramSimulator::new(AppModel::new(FolioConfig::default(), boot))
        .with_response(DEFAULT_CONTENT_URL, Ok("{ not json".to_string()));
    sim.init();
    assert!(matches!(sim.model().state().load, LoadStatus::Failed(_)));
    assert_eq!(sim.dom().text_of("about-content"), DEFAULT_LOAD_ERROR);
}

#[test]
fn content_url_comes_from_config() {
    let boot = Boot::default();
    let config = FolioConfig::default().with_content_url("data/site.json");
    let mut sim = ProgramSimulator::new(AppModel::new(config, boot))
        .with_response("data/site.json", Ok(SITE_CONTENT.to_string()));
    sim.init();
    assert_eq!(
        sim.command_log()[0],
        CmdRecord::Fetch {
            url: "data/site.json".into(),
            ok: true
        }
    );
    assert!(sim.model().is_ready());
}
