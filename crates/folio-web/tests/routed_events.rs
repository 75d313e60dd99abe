#![forbid(unsafe_code)]

//! Delegated-event routing against markup the widgets actually render.
//!
//! Each test renders the page from `site/content.json` in the simulator,
//! reads the attribute a delegated listener would read off the clicked
//! element, routes it, and checks the resulting state.

use std::time::Duration;

use folio_core::FolioConfig;
use folio_core::config::DEFAULT_CONTENT_URL;
use folio_core::event::{KeyCode, KeyInput, Modifiers};
use folio_core::storage::{MemoryStorage, Preferences};
use folio_render::{DomMirror, Element};
use folio_runtime::{AppModel, AppMsg, Boot, CmdRecord, ProgramSimulator, ShellManifest, default_shell};
use folio_web::dialog::{DialogProvider, PolyfillDialog};
use folio_web::routing::{KeyContext, RouteKind, route_key};
use folio_widgets::focus_trap::FocusMove;
use folio_widgets::project_modal::{BACKDROP_ID, MODAL_ID};
use folio_widgets::toolbox::TAGS_ID;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const SITE_CONTENT: &str = include_str!("../../../site/content.json");

fn booted() -> ProgramSimulator<AppModel> {
    let prefs = Preferences::new(MemoryStorage::new());
    let boot = Boot::from_preferences(&prefs, "en-US", || false)
        .with_page_url("https://ana.example/")
        .with_shell(ShellManifest::scan(&default_shell()));
    let mut sim = ProgramSimulator::new(AppModel::new(FolioConfig::default(), boot))
        .with_response(DEFAULT_CONTENT_URL, Ok(SITE_CONTENT.to_string()));
    sim.init();
    sim
}

/// Values of `attr` on every element under `root` carrying it.
fn attr_values(root: &Element, attr: &str) -> Vec<String> {
    let mut found = Vec::new();
    root.find_all(&|e| e.get_attr(attr).is_some(), &mut found);
    found
        .into_iter()
        .filter_map(|e| e.get_attr(attr).map(str::to_string))
        .collect()
}

fn click(sim: &mut ProgramSimulator<AppModel>, kind: RouteKind, value: Option<&str>) {
    if let Some(msg) = kind.click(value, Modifiers::empty()) {
        sim.send(msg);
    }
}

#[test]
fn toolbox_tag_buttons_route_to_selection() {
    let mut sim = booted();
    let tags = attr_values(
        sim.dom().by_id(TAGS_ID).expect("toolbox tags container"),
        RouteKind::ToolTag.value_attr().unwrap(),
    );
    assert!(!tags.is_empty());

    click(&mut sim, RouteKind::ToolTag, Some(&tags[0]));
    assert_eq!(sim.model().state().toolbox.selected(), &[tags[0].clone()]);

    click(&mut sim, RouteKind::ToolboxClear, None);
    assert!(sim.model().state().toolbox.selected().is_empty());
}

#[test]
fn project_card_click_opens_dialog() {
    let mut sim = booted();
    let ids = attr_values(sim.dom().root(), RouteKind::Project.value_attr().unwrap());
    assert!(ids.iter().any(|id| id == "ledger"), "{ids:?}");

    click(&mut sim, RouteKind::Project, Some("ledger"));
    assert_eq!(sim.model().state().modal.current(), Some("ledger"));
    assert!(sim.dom().by_id(MODAL_ID).unwrap().get_attr("open").is_some());

    click(&mut sim, RouteKind::ModalBackdrop, None);
    assert!(!sim.model().state().modal.is_open());
}

#[test]
fn featured_shortcuts_name_real_projects() {
    let mut sim = booted();
    let featured = attr_values(sim.dom().root(), RouteKind::Featured.value_attr().unwrap());
    assert!(!featured.is_empty());
    for id in &featured {
        click(&mut sim, RouteKind::Featured, Some(id));
        assert_eq!(sim.model().state().modal.current(), Some(id.as_str()));
        click(&mut sim, RouteKind::CloseModal, None);
    }
}

#[test]
fn palette_row_click_runs_after_delay() {
    let mut sim = booted();
    click(&mut sim, RouteKind::PaletteOpen, None);
    let rows = attr_values(sim.dom().root(), RouteKind::PaletteRow.value_attr().unwrap());
    assert_eq!(rows.first().map(String::as_str), Some("0"));

    sim.clear_log();
    click(&mut sim, RouteKind::PaletteRow, Some(&rows[0]));
    assert!(!sim.model().state().palette.is_open());
    assert!(sim
        .command_log()
        .contains(&CmdRecord::Delay(Duration::from_millis(140))));
}

#[test]
fn palette_overlay_click_closes() {
    let mut sim = booted();
    click(&mut sim, RouteKind::PaletteOpen, None);
    assert!(sim.model().state().palette.is_open());
    click(&mut sim, RouteKind::PaletteOverlay, None);
    assert!(!sim.model().state().palette.is_open());
}

#[test]
fn lab_nodes_route_clicks_and_hovers() {
    let mut sim = booted();
    let nodes = attr_values(sim.dom().root(), RouteKind::LabNode.value_attr().unwrap());
    assert!(nodes.len() >= 2, "{nodes:?}");

    click(&mut sim, RouteKind::LabNode, Some(&nodes[1]));
    assert_eq!(sim.model().state().lab.active(), Some(nodes[1].as_str()));

    if let Some(msg) = RouteKind::LabNode.hover(Some(&nodes[0])) {
        sim.send(msg);
    }
    assert_eq!(sim.model().state().lab.active(), Some(nodes[0].as_str()));
}

#[test]
fn language_buttons_route_through_transition() {
    let mut sim = booted();
    click(&mut sim, RouteKind::Lang, Some("pt"));
    assert_eq!(sim.model().state().lang.as_deref(), Some("pt"));
    assert!(sim.command_log().contains(&CmdRecord::Transition));
}

#[test]
fn enter_on_focused_card_opens_it() {
    let mut sim = booted();
    let route = route_key(KeyContext {
        key: KeyInput::plain(KeyCode::Enter),
        card: Some("tracekit"),
        palette_open: sim.model().state().palette.is_open(),
    });
    assert!(route.prevent_default);
    sim.send(route.msg.expect("routed"));
    assert_eq!(sim.model().state().modal.current(), Some("tracekit"));
}

#[test]
fn polyfill_dialog_drives_the_shell() {
    let mut dialog = PolyfillDialog::new(DomMirror::new(default_shell()));
    dialog.show(MODAL_ID).unwrap();
    let dom = dialog.sink();
    assert!(dom.by_id(MODAL_ID).unwrap().has_class("is-open"));
    assert!(dom.by_id(BACKDROP_ID).unwrap().get_attr("hidden").is_none());
    assert_eq!(dialog.trap_focus(Some(1), 2, FocusMove::Forward), Some(0));

    dialog.close(MODAL_ID).unwrap();
    assert!(dialog.sink().by_id(BACKDROP_ID).unwrap().get_attr("hidden").is_some());
    assert_eq!(dialog.trap_focus(Some(1), 2, FocusMove::Forward), None);
}

fn key_strategy() -> impl Strategy<Value = KeyInput> {
    let code = prop_oneof![
        Just(KeyCode::Enter),
        Just(KeyCode::Escape),
        Just(KeyCode::Up),
        Just(KeyCode::Down),
        Just(KeyCode::Home),
        Just(KeyCode::End),
        Just(KeyCode::Tab),
        proptest::char::range('a', 'z').prop_map(KeyCode::Char),
        Just(KeyCode::Char(' ')),
    ];
    (code, 0u8..16).prop_map(|(code, bits)| KeyInput::new(code, Modifiers::from_bits_truncate(bits)))
}

proptest! {
    #[test]
    fn keys_never_open_projects_under_the_palette(
        key in key_strategy(),
        card in proptest::option::of("[a-z]{1,8}"),
    ) {
        let route = route_key(KeyContext { key: key.clone(), card: card.as_deref(), palette_open: true });
        prop_assert_eq!(route.msg, Some(AppMsg::Key(key)));
    }

    #[test]
    fn palette_shortcut_always_suppresses_default(
        card in proptest::option::of("[a-z]{1,8}"),
        palette_open: bool,
    ) {
        let key = KeyInput::new(KeyCode::Char('k'), Modifiers::CTRL);
        let route = route_key(KeyContext { key, card: card.as_deref(), palette_open });
        prop_assert!(route.prevent_default);
    }
}
