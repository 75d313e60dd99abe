#![forbid(unsafe_code)]

//! Event delegation tables.
//!
//! The host installs one listener per event type on the document. For a
//! click it walks [`CLICK_ROUTES`] in order, asks the browser for the closest
//! ancestor matching each selector, and turns the first hit into an
//! [`AppMsg`]. The tables are plain data so the mapping is tested natively.

use folio_core::event::{KeyCode, KeyInput, Modifiers};
use folio_core::FolioConfig;
use folio_runtime::AppMsg;

/// What a delegated click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// `.lang-btn[data-lang]`.
    Lang,
    ThemeToggle,
    /// `#cmdk-open`.
    PaletteOpen,
    /// The palette overlay itself, outside its panel.
    PaletteOverlay,
    /// A palette result row.
    PaletteRow,
    /// A toolbox tag button.
    ToolTag,
    ToolboxClear,
    /// A real link inside a card; the browser handles it.
    Passthrough,
    /// A hero featured shortcut.
    Featured,
    /// A project card.
    Project,
    /// A `[data-close-modal]` button.
    CloseModal,
    /// The dialog element itself (native backdrop area) or `#modal-backdrop`.
    ModalBackdrop,
    /// A lab node button.
    LabNode,
}

/// One delegated click target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub selector: &'static str,
    /// When set, the event target itself must match (not an ancestor).
    pub exact: bool,
    pub kind: RouteKind,
}

const fn route(selector: &'static str, kind: RouteKind) -> Route {
    Route {
        selector,
        exact: false,
        kind,
    }
}

const fn exact(selector: &'static str, kind: RouteKind) -> Route {
    Route {
        selector,
        exact: true,
        kind,
    }
}

/// Click routes in priority order.
pub const CLICK_ROUTES: [Route; 13] = [
    route(".lang-btn[data-lang]", RouteKind::Lang),
    route("#theme-toggle", RouteKind::ThemeToggle),
    route("#cmdk-open", RouteKind::PaletteOpen),
    exact("#cmdk", RouteKind::PaletteOverlay),
    route("[data-cmdk-index]", RouteKind::PaletteRow),
    route("[data-tag]", RouteKind::ToolTag),
    route("#toolbox-clear", RouteKind::ToolboxClear),
    route("[data-project-id] a[href]", RouteKind::Passthrough),
    route("[data-featured-id]", RouteKind::Featured),
    route("[data-project-id]", RouteKind::Project),
    route("[data-close-modal]", RouteKind::CloseModal),
    exact("#project-modal, #modal-backdrop", RouteKind::ModalBackdrop),
    route("[data-lab-node]", RouteKind::LabNode),
];

/// Hover routes (`pointerover`): palette rows and lab nodes.
pub const HOVER_ROUTES: [Route; 2] = [
    route("[data-cmdk-index]", RouteKind::PaletteRow),
    route("[data-lab-node]", RouteKind::LabNode),
];

impl RouteKind {
    /// Attribute whose value the message needs.
    #[must_use]
    pub const fn value_attr(self) -> Option<&'static str> {
        match self {
            Self::Lang => Some("data-lang"),
            Self::PaletteRow => Some("data-cmdk-index"),
            Self::ToolTag => Some("data-tag"),
            Self::Featured => Some("data-featured-id"),
            Self::Project => Some("data-project-id"),
            Self::LabNode => Some("data-lab-node"),
            _ => None,
        }
    }

    /// Message for a click on this kind of target. `None` means the click is
    /// consumed without a message (or left to the browser).
    #[must_use]
    pub fn click(self, value: Option<&str>, mods: Modifiers) -> Option<AppMsg> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        match self {
            Self::Lang => Some(AppMsg::RequestLang(value.unwrap_or(folio_core::lang::EN).into())),
            Self::ThemeToggle => Some(AppMsg::ToggleTheme),
            Self::PaletteOpen => Some(AppMsg::OpenPalette),
            Self::PaletteOverlay => Some(AppMsg::ClosePalette),
            Self::PaletteRow => value?.parse().ok().map(AppMsg::PaletteClick),
            Self::ToolTag => Some(AppMsg::ToolboxClick {
                tag: value?.to_string(),
                mods,
            }),
            Self::ToolboxClear => Some(AppMsg::ToolboxClear),
            Self::Passthrough => None,
            Self::Featured | Self::Project => Some(AppMsg::OpenProject(value?.to_string())),
            Self::CloseModal | Self::ModalBackdrop => Some(AppMsg::CloseProject),
            Self::LabNode => Some(AppMsg::LabActivate(value?.to_string())),
        }
    }

    /// Message for the pointer entering this kind of target.
    #[must_use]
    pub fn hover(self, value: Option<&str>) -> Option<AppMsg> {
        let value = value?.trim();
        match self {
            Self::PaletteRow => value.parse().ok().map(AppMsg::PaletteHover),
            Self::LabNode if !value.is_empty() => Some(AppMsg::LabHover(value.to_string())),
            _ => None,
        }
    }

    /// Whether the browser default must be suppressed after routing.
    #[must_use]
    pub const fn prevents_default(self) -> bool {
        !matches!(self, Self::Passthrough)
    }
}

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

/// A keydown, with where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyContext<'a> {
    pub key: KeyInput,
    /// `data-project-id` of the focused project card, when the event target
    /// is the card itself.
    pub card: Option<&'a str>,
    /// Whether the palette is open.
    pub palette_open: bool,
}

/// Routing decision for a keydown.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyRoute {
    pub msg: Option<AppMsg>,
    /// Suppress the browser default (scrolling, caret moves, find bar).
    pub prevent_default: bool,
}

/// Route a keydown.
#[must_use]
pub fn route_key(ctx: KeyContext<'_>) -> KeyRoute {
    let KeyContext {
        key,
        card,
        palette_open,
    } = ctx;
    if key.is_palette_shortcut() {
        return KeyRoute {
            msg: Some(AppMsg::Key(key)),
            prevent_default: true,
        };
    }
    if !palette_open
        && let Some(id) = card
        && matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
    {
        return KeyRoute {
            msg: Some(AppMsg::OpenProject(id.to_string())),
            prevent_default: true,
        };
    }
    let prevent_default = palette_open
        && matches!(
            key.code,
            KeyCode::Up | KeyCode::Down | KeyCode::Home | KeyCode::End | KeyCode::Enter
        );
    KeyRoute {
        msg: Some(AppMsg::Key(key)),
        prevent_default,
    }
}

// ---------------------------------------------------------------------------
// Host configuration
// ---------------------------------------------------------------------------

/// Attribute on `<html>` overriding the content URL.
pub const CONTENT_URL_ATTR: &str = "data-content-url";

/// Configuration for this page, from attributes on the document element.
#[must_use]
pub fn host_config(content_url: Option<&str>) -> FolioConfig {
    let config = FolioConfig::default();
    match content_url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => config.with_content_url(url),
        None => config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_widgets::command_palette::INDEX_ATTR;
    use folio_widgets::lab::NODE_ATTR;
    use folio_widgets::sections::{FEATURED_ID_ATTR, PROJECT_ID_ATTR};
    use folio_widgets::toolbox::TAG_ATTR;
    use pretty_assertions::assert_eq;

    #[test]
    fn value_attrs_match_widget_markup() {
        assert_eq!(RouteKind::PaletteRow.value_attr(), Some(INDEX_ATTR));
        assert_eq!(RouteKind::ToolTag.value_attr(), Some(TAG_ATTR));
        assert_eq!(RouteKind::Featured.value_attr(), Some(FEATURED_ID_ATTR));
        assert_eq!(RouteKind::Project.value_attr(), Some(PROJECT_ID_ATTR));
        assert_eq!(RouteKind::LabNode.value_attr(), Some(NODE_ATTR));
        for route in CLICK_ROUTES.iter().chain(&HOVER_ROUTES) {
            if let Some(attr) = route.kind.value_attr() {
                assert!(route.selector.contains(attr), "{route:?}");
            }
        }
    }

    #[test]
    fn links_in_cards_route_before_cards() {
        let pos = |kind| CLICK_ROUTES.iter().position(|r| r.kind == kind).unwrap();
        assert!(pos(RouteKind::Passthrough) < pos(RouteKind::Project));
        assert!(pos(RouteKind::Featured) < pos(RouteKind::Project));
        assert!(!RouteKind::Passthrough.prevents_default());
    }

    #[test]
    fn click_messages() {
        let none = Modifiers::empty();
        assert_eq!(
            RouteKind::Lang.click(Some("pt"), none),
            Some(AppMsg::RequestLang("pt".into()))
        );
        assert_eq!(
            RouteKind::Lang.click(None, none),
            Some(AppMsg::RequestLang("en".into()))
        );
        assert_eq!(
            RouteKind::PaletteRow.click(Some("3"), none),
            Some(AppMsg::PaletteClick(3))
        );
        assert_eq!(RouteKind::PaletteRow.click(Some("x"), none), None);
        assert_eq!(
            RouteKind::ToolTag.click(Some("Go"), Modifiers::SHIFT),
            Some(AppMsg::ToolboxClick {
                tag: "Go".into(),
                mods: Modifiers::SHIFT
            })
        );
        assert_eq!(RouteKind::Project.click(Some(" "), none), None);
        assert_eq!(RouteKind::Passthrough.click(Some("x"), none), None);
        assert_eq!(
            RouteKind::ModalBackdrop.click(None, none),
            Some(AppMsg::CloseProject)
        );
    }

    #[test]
    fn hover_messages() {
        assert_eq!(
            RouteKind::PaletteRow.hover(Some("2")),
            Some(AppMsg::PaletteHover(2))
        );
        assert_eq!(
            RouteKind::LabNode.hover(Some("queue")),
            Some(AppMsg::LabHover("queue".into()))
        );
        assert_eq!(RouteKind::Project.hover(Some("x")), None);
    }

    fn ctx(key: KeyInput, card: Option<&str>, palette_open: bool) -> KeyContext<'_> {
        KeyContext {
            key,
            card,
            palette_open,
        }
    }

    #[test]
    fn shortcut_always_prevents_default() {
        let k = KeyInput::new(KeyCode::Char('k'), Modifiers::SUPER);
        let route = route_key(ctx(k.clone(), None, false));
        assert_eq!(route.msg, Some(AppMsg::Key(k)));
        assert!(route.prevent_default);
    }

    #[test]
    fn enter_on_card_opens_project() {
        let route = route_key(ctx(KeyInput::plain(KeyCode::Enter), Some("ledger"), false));
        assert_eq!(route.msg, Some(AppMsg::OpenProject("ledger".into())));
        let route = route_key(ctx(KeyInput::plain(KeyCode::Enter), Some("ledger"), true));
        assert_eq!(route.msg, Some(AppMsg::Key(KeyInput::plain(KeyCode::Enter))));
        assert!(route.prevent_default);
    }

    #[test]
    fn arrows_scroll_unless_palette_open() {
        assert!(!route_key(ctx(KeyInput::plain(KeyCode::Down), None, false)).prevent_default);
        assert!(route_key(ctx(KeyInput::plain(KeyCode::Down), None, true)).prevent_default);
        assert!(!route_key(ctx(KeyInput::plain(KeyCode::Escape), None, true)).prevent_default);
    }

    #[test]
    fn content_url_override() {
        assert_eq!(host_config(None).content_url, "content.json");
        assert_eq!(host_config(Some("  ")).content_url, "content.json");
        assert_eq!(host_config(Some("/data/site.json")).content_url, "/data/site.json");
    }
}
