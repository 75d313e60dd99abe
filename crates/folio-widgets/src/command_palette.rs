#![forbid(unsafe_code)]

//! Command palette for keyboard navigation.
//!
//! Items are rebuilt from the active language slice every time the palette
//! opens or the language changes. Search is a substring match over a
//! normalized haystack (diacritics stripped, lowercased, whitespace
//! collapsed), in build order, capped at the configured limit.
//!
//! # Usage
//!
//! ```ignore
//! let mut palette = CommandPalette::new(16);
//! palette.open(build_items(content));
//! palette.set_query("proj");
//! if let Some(PaletteAction::Execute(action)) = palette.handle_key(&key) {
//!     // close animation, restore focus, then dispatch `action`
//! }
//! ```

use folio_core::content::LocalizedContent;
use folio_core::event::{KeyCode, KeyInput};
use folio_core::normalize::{haystack, normalize_search};
use folio_render::{Element, Frame, Node, Patch, Target, el};

use crate::{RenderCtx, Widget, label};

/// Palette dialog element.
pub const PALETTE_ID: &str = "cmdk";

/// Query input.
pub const INPUT_ID: &str = "cmdk-input";

/// Result list container.
pub const LIST_ID: &str = "cmdk-list";

/// Attribute carrying a row's index into the filtered list.
pub const INDEX_ATTR: &str = "data-cmdk-index";

/// Section anchors reachable from the palette, in display order.
pub const SECTIONS: [&str; 8] = [
    "about",
    "skills",
    "toolbox",
    "projects",
    "lab",
    "experience",
    "education",
    "contact",
];

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// What kind of entry an item is; drives the badge label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmdkKind {
    Section,
    Action,
    Link,
    Project,
}

/// What executing an item does. Dispatched by the application model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdkAction {
    /// Scroll to an in-page anchor (`"#projects"`).
    ScrollTo(String),
    ToggleTheme,
    /// Navigate to a URL, in a new tab when `new_tab`.
    OpenUrl { href: String, new_tab: bool },
    /// Copy text to the clipboard.
    CopyText(String),
    /// Open the project dialog.
    OpenProject(String),
}

/// A searchable palette entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdkItem {
    pub id: String,
    pub kind: CmdkKind,
    pub title: String,
    pub subtitle: String,
    pub keywords: Vec<String>,
    pub action: CmdkAction,
    /// Normalized title + subtitle + keywords.
    pub haystack: String,
}

impl CmdkItem {
    pub fn new(
        id: impl Into<String>,
        kind: CmdkKind,
        title: impl Into<String>,
        action: CmdkAction,
    ) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            kind,
            haystack: normalize_search(&title),
            title,
            subtitle: String::new(),
            keywords: Vec::new(),
            action,
        }
    }

    /// Set subtitle (builder).
    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self.reindex();
        self
    }

    /// Set keywords (builder).
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self.reindex();
        self
    }

    fn reindex(&mut self) {
        self.haystack = haystack(
            std::iter::once(self.title.as_str())
                .chain(std::iter::once(self.subtitle.as_str()))
                .chain(self.keywords.iter().map(String::as_str)),
        );
    }
}

/// Build the palette items for a language slice, in display order:
/// sections, theme toggle, profile links, copy-email, projects.
#[must_use]
pub fn build_items(content: &LocalizedContent) -> Vec<CmdkItem> {
    let cmdk = &content.cmdk;
    let section_kind = label(&cmdk.section, "Section");
    let action_kind = label(&cmdk.action, "Action");
    let link_kind = label(&cmdk.link, "Link");
    let mut items = Vec::new();

    for id in SECTIONS {
        let title = content
            .nav
            .label(id)
            .map(str::to_string)
            .unwrap_or_else(|| capitalize(id));
        items.push(
            CmdkItem::new(
                format!("section:{id}"),
                CmdkKind::Section,
                title,
                CmdkAction::ScrollTo(format!("#{id}")),
            )
            .with_subtitle(section_kind)
            .with_keywords([id]),
        );
    }

    items.push(
        CmdkItem::new(
            "action:theme",
            CmdkKind::Action,
            label(&cmdk.toggle_theme, "Toggle theme"),
            CmdkAction::ToggleTheme,
        )
        .with_subtitle(action_kind)
        .with_keywords(["theme", "dark", "light"]),
    );

    let profile = &content.profile;
    if let (Some(email), Some(mailto)) = (profile.email(), profile.mailto()) {
        items.push(
            CmdkItem::new(
                "link:email",
                CmdkKind::Link,
                email,
                CmdkAction::OpenUrl {
                    href: mailto,
                    new_tab: false,
                },
            )
            .with_subtitle(link_kind)
            .with_keywords(["email", "mail", "contact"]),
        );
    }
    let external = [
        ("link:linkedin", "LinkedIn", profile.linkedin()),
        ("link:github", "GitHub", profile.github()),
        ("link:whatsapp", "WhatsApp", profile.whatsapp()),
    ];
    for (id, title, href) in external {
        if let Some(href) = href {
            items.push(
                CmdkItem::new(
                    id,
                    CmdkKind::Link,
                    title,
                    CmdkAction::OpenUrl {
                        href: href.to_string(),
                        new_tab: true,
                    },
                )
                .with_subtitle(link_kind)
                .with_keywords([title.to_lowercase(), "contact".to_string()]),
            );
        }
    }
    if let Some(email) = profile.email() {
        items.push(
            CmdkItem::new(
                "action:copy-email",
                CmdkKind::Action,
                label(&cmdk.copy_email, "Copy email"),
                CmdkAction::CopyText(email.to_string()),
            )
            .with_subtitle(action_kind)
            .with_keywords(["email", "copy", "clipboard"]),
        );
    }

    for project in &content.projects {
        items.push(
            CmdkItem::new(
                format!("project:{}", project.id),
                CmdkKind::Project,
                project.title.as_str(),
                CmdkAction::OpenProject(project.id.clone()),
            )
            .with_subtitle(project.subtitle.as_str())
            .with_keywords(project.stack.iter().cloned()),
        );
    }
    items
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Indices of items matching `query`, in build order, at most `limit`.
///
/// An empty (or whitespace-only) query matches everything.
#[must_use]
pub fn filter(items: &[CmdkItem], query: &str, limit: usize) -> Vec<usize> {
    let needle = normalize_search(query);
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| needle.is_empty() || item.haystack.contains(&needle))
        .map(|(i, _)| i)
        .take(limit)
        .collect()
}

// ---------------------------------------------------------------------------
// Palette Action
// ---------------------------------------------------------------------------

/// Outcome of a key or pointer interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteAction {
    /// The user chose an item. The palette has already closed itself.
    Execute(CmdkAction),
    /// The user dismissed the palette (Esc).
    Dismiss,
}

// ---------------------------------------------------------------------------
// Command Palette
// ---------------------------------------------------------------------------

/// Palette state.
///
/// # Invariants
///
/// 1. `active < filtered.len()`, or `active == 0` when nothing matches.
/// 2. `filtered` holds at most `limit` indices into `items`, ascending.
/// 3. Closing clears the query and results.
#[derive(Debug, Clone)]
pub struct CommandPalette {
    items: Vec<CmdkItem>,
    query: String,
    filtered: Vec<usize>,
    active: usize,
    open: bool,
    limit: usize,
}

impl Default for CommandPalette {
    fn default() -> Self {
        Self::new(16)
    }
}

impl CommandPalette {
    /// Create a closed palette showing at most `limit` results.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            query: String::new(),
            filtered: Vec::new(),
            active: 0,
            open: false,
            limit: limit.max(1),
        }
    }

    // --- Visibility ---

    /// Open with a fresh item list and an empty query.
    pub fn open(&mut self, items: Vec<CmdkItem>) {
        self.items = items;
        self.open = true;
        self.query.clear();
        self.active = 0;
        self.update_filtered();
    }

    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.filtered.clear();
        self.active = 0;
    }

    /// Replace the items (language change) keeping the query, resetting
    /// the active row.
    pub fn rebuild(&mut self, items: Vec<CmdkItem>) {
        self.items = items;
        self.active = 0;
        if self.open {
            self.update_filtered();
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    // --- Query Access ---

    /// Replace the query (the input element's value) and re-filter.
    pub fn set_query(&mut self, query: &str) {
        if !self.open || self.query == query {
            return;
        }
        self.query = query.to_string();
        self.active = 0;
        self.update_filtered();
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn items(&self) -> &[CmdkItem] {
        &self.items
    }

    #[must_use]
    pub fn result_count(&self) -> usize {
        self.filtered.len()
    }

    /// Filtered items, in display order.
    pub fn results(&self) -> impl Iterator<Item = &CmdkItem> {
        self.filtered.iter().filter_map(|&i| self.items.get(i))
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn active_item(&self) -> Option<&CmdkItem> {
        self.filtered
            .get(self.active)
            .and_then(|&i| self.items.get(i))
    }

    // --- Event Handling ---

    /// Handle a key press while open. Keys that edit the query are left to
    /// the input element and arrive through [`set_query`](Self::set_query).
    pub fn handle_key(&mut self, key: &KeyInput) -> Option<PaletteAction> {
        if !self.open {
            return None;
        }
        match key.code {
            KeyCode::Escape => {
                self.close();
                return Some(PaletteAction::Dismiss);
            }
            KeyCode::Enter => return self.execute_active(),
            KeyCode::Up => {
                self.active = self.active.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.active + 1 < self.filtered.len() {
                    self.active += 1;
                }
            }
            KeyCode::Home => self.active = 0,
            KeyCode::End => self.active = self.filtered.len().saturating_sub(1),
            _ => {}
        }
        None
    }

    /// Pointer hover over row `index`. Returns whether the active row moved.
    pub fn hover(&mut self, index: usize) -> bool {
        if !self.open || index >= self.filtered.len() || index == self.active {
            return false;
        }
        self.active = index;
        true
    }

    /// Pointer click on row `index`.
    pub fn click(&mut self, index: usize) -> Option<PaletteAction> {
        if !self.open || index >= self.filtered.len() {
            return None;
        }
        self.active = index;
        self.execute_active()
    }

    fn execute_active(&mut self) -> Option<PaletteAction> {
        let action = self.active_item()?.action.clone();
        folio_core::debug!(?action, "palette: execute");
        self.close();
        Some(PaletteAction::Execute(action))
    }

    fn update_filtered(&mut self) {
        self.filtered = filter(&self.items, &self.query, self.limit);
        if self.filtered.is_empty() {
            self.active = 0;
        } else {
            self.active = self.active.min(self.filtered.len() - 1);
        }
    }

    /// Toggle the active-row class without rebuilding the list.
    pub fn render_active(&self, frame: &mut Frame) {
        for row in 0..self.filtered.len() {
            let on = row == self.active;
            let target = Target::data(INDEX_ATTR, row.to_string());
            frame.push(Patch::set_class(target.clone(), "is-active", on));
            frame.push(Patch::set_attr(target, "aria-selected", on.to_string()));
        }
    }

    fn row(&self, ctx: &RenderCtx<'_>, row: usize, item: &CmdkItem) -> Element {
        let cmdk = &ctx.content.cmdk;
        let badge = match item.kind {
            CmdkKind::Section => label(&cmdk.section, "Section"),
            CmdkKind::Action => label(&cmdk.action, "Action"),
            CmdkKind::Link => label(&cmdk.link, "Link"),
            CmdkKind::Project => label(&cmdk.project, "Project"),
        };
        let on = row == self.active;
        el("li")
            .class("cmdk-item")
            .class_if("is-active", on)
            .attr("role", "option")
            .attr("id", format!("cmdk-opt-{row}"))
            .attr(INDEX_ATTR, row.to_string())
            .attr("aria-selected", on.to_string())
            .child(
                el("div")
                    .class("cmdk-text")
                    .child(el("span").class("cmdk-title").text(item.title.as_str()))
                    .child(el("span").class("cmdk-sub").text(item.subtitle.as_str())),
            )
            .child(el("span").class("cmdk-kind").text(badge))
    }
}

impl Widget for CommandPalette {
    fn container(&self) -> &'static str {
        LIST_ID
    }

    fn build(&self, ctx: &RenderCtx<'_>) -> Vec<Node> {
        if !self.open {
            return Vec::new();
        }
        if self.filtered.is_empty() {
            let empty = label(&ctx.content.cmdk.empty, "No results");
            return vec![el("li").class("cmdk-empty").text(empty).into()];
        }
        self.results()
            .enumerate()
            .map(|(row, item)| self.row(ctx, row, item).into())
            .collect()
    }

    fn render(&self, ctx: &RenderCtx<'_>, frame: &mut Frame) {
        let root = Target::id(PALETTE_ID);
        frame.push(Patch::set_class(root.clone(), "is-open", self.open));
        frame.push(if self.open {
            Patch::remove_attr(root, "hidden")
        } else {
            Patch::set_attr(root, "hidden", "")
        });
        frame.push(Patch::set_attr(
            Target::id(INPUT_ID),
            "aria-activedescendant",
            format!("cmdk-opt-{}", self.active),
        ));
        frame.push(Patch::replace_children(Target::id(LIST_ID), self.build(ctx)));
    }
}
