//! Property-based invariants of the page model under arbitrary event
//! sequences.
//!
//! 1. The active language is always a key of the document.
//! 2. Toolbox selection stays inside the vocabulary of the active slice.
//! 3. While the palette is open its active row is inside the results.
//! 4. The modal is open only for a project present in the active slice.
//! 5. The dialog's `open` attribute tracks the modal state.
//! 6. Rendering after every message leaves nothing dirty.

use std::time::Duration;

use folio_core::FolioConfig;
use folio_core::config::DEFAULT_CONTENT_URL;
use folio_core::event::{KeyCode, KeyInput, Modifiers};
use folio_runtime::{AppModel, AppMsg, Boot, ProgramSimulator, ShellManifest, default_shell};
use folio_widgets::project_modal::MODAL_ID;
use proptest::prelude::*;

const SITE_CONTENT: &str = include_str!("../../../site/content.json");

const TAGS: [&str; 7] = ["Go", "Rust", "Docker", "Python", "Kafka", "PostgreSQL", "Haskell"];
const PROJECTS: [&str; 4] = ["ledger", "tracekit", "replay", "missing"];
const LANGS: [&str; 3] = ["en", "pt", "fr"];
const NODES: [&str; 3] = ["ingest", "queue", "worker"];

fn key_code() -> impl Strategy<Value = KeyCode> {
    prop_oneof![
        Just(KeyCode::Up),
        Just(KeyCode::Down),
        Just(KeyCode::Home),
        Just(KeyCode::End),
        Just(KeyCode::Enter),
        Just(KeyCode::Escape),
        Just(KeyCode::Tab),
        Just(KeyCode::Char('k')),
    ]
}

fn mods() -> impl Strategy<Value = Modifiers> {
    prop_oneof![
        Just(Modifiers::empty()),
        Just(Modifiers::SHIFT),
        Just(Modifiers::CTRL),
        Just(Modifiers::SUPER),
    ]
}

fn message() -> impl Strategy<Value = AppMsg> {
    prop_oneof![
        (key_code(), mods()).prop_map(|(code, mods)| AppMsg::Key(KeyInput::new(code, mods))),
        prop::sample::select(LANGS.to_vec()).prop_map(|l| AppMsg::SetLang(l.into())),
        Just(AppMsg::ToggleTheme),
        Just(AppMsg::TogglePalette),
        "[a-z ]{0,6}".prop_map(AppMsg::PaletteQuery),
        (0usize..20).prop_map(AppMsg::PaletteHover),
        (0usize..20).prop_map(AppMsg::PaletteClick),
        (prop::sample::select(TAGS.to_vec()), mods())
            .prop_map(|(tag, mods)| AppMsg::ToolboxClick { tag: tag.into(), mods }),
        Just(AppMsg::ToolboxClear),
        prop::sample::select(PROJECTS.to_vec()).prop_map(|p| AppMsg::OpenProject(p.into())),
        Just(AppMsg::CloseProject),
        prop::sample::select(NODES.to_vec()).prop_map(|n| AppMsg::LabActivate(n.into())),
        prop::sample::select(NODES.to_vec()).prop_map(|n| AppMsg::LabHover(n.into())),
    ]
}

fn started() -> ProgramSimulator<AppModel> {
    let boot = Boot::default().with_shell(ShellManifest::scan(&default_shell()));
    let mut sim = ProgramSimulator::new(AppModel::new(FolioConfig::default(), boot))
        .with_response(DEFAULT_CONTENT_URL, Ok(SITE_CONTENT.to_string()));
    sim.init();
    sim
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn model_invariants_hold(msgs in prop::collection::vec(message(), 0..40)) {
        let mut sim = started();
        for msg in msgs {
            sim.send(msg);
            sim.advance(Duration::from_millis(50));

            let model = sim.model();
            let state = model.state();
            let doc = model.document().expect("content loaded");
            let lang = state.lang.as_deref().expect("language set");
            prop_assert!(doc.contains(lang));

            let content = model.content().expect("active slice");
            for tag in state.toolbox.selected() {
                prop_assert!(state.toolbox.vocabulary().iter().any(|v| &v.tag == tag));
            }

            if state.palette.is_open() && state.palette.result_count() > 0 {
                prop_assert!(state.palette.active_index() < state.palette.result_count());
            }

            if let Some(id) = state.modal.current() {
                prop_assert!(content.project(id).is_some());
            }
            let dialog_open = sim
                .dom()
                .by_id(MODAL_ID)
                .is_some_and(|e| e.get_attr("open").is_some());
            prop_assert_eq!(dialog_open, state.modal.is_open());

            prop_assert!(model.dirty().is_empty());
        }
    }
}
