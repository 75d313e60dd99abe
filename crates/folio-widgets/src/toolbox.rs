#![forbid(unsafe_code)]

//! Tag filter over project cards.
//!
//! # Vocabulary
//!
//! Every project stack tag and every skill item is counted. Tags sort by
//! descending count, then case-insensitively, then by exact text so the
//! order is total. The list is capped (36 by default).
//!
//! # Selection
//!
//! A plain click selects only the clicked tag, or clears the selection if
//! that tag was the sole selection. A click with Ctrl, Cmd or Shift toggles
//! the tag without touching the others. This single-vs-multi split is a
//! deliberate UX choice carried over from the page's first version.
//!
//! # Invariants
//!
//! 1. The selection only holds tags present in the current vocabulary.
//! 2. A card matches iff its stack contains every selected tag.
//! 3. With an empty selection no card is marked either way.

use std::collections::HashMap;

use folio_core::content::{LocalizedContent, Project};
use folio_core::event::Modifiers;
use folio_render::{Frame, Patch, Target, el};

use crate::sections::PROJECT_ID_ATTR;
use crate::{RenderCtx, StatefulWidget, label};

/// Container for the tag buttons.
pub const TAGS_ID: &str = "toolbox-tags";

/// Status line element.
pub const STATUS_ID: &str = "toolbox-status";

/// Clear-selection button.
pub const CLEAR_ID: &str = "toolbox-clear";

/// Attribute carrying a tag on its button.
pub const TAG_ATTR: &str = "data-tag";

/// Tags named in the status line before collapsing into "+N more".
const STATUS_HEAD: usize = 3;

/// A vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Ranked tag vocabulary for a language slice.
#[must_use]
pub fn vocabulary(content: &LocalizedContent, cap: usize) -> Vec<TagCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let tags = content
        .projects
        .iter()
        .flat_map(|p| p.stack.iter())
        .chain(content.skills.iter().flat_map(|g| g.items.iter()));
    for tag in tags {
        if !tag.trim().is_empty() {
            *counts.entry(tag.as_str()).or_default() += 1;
        }
    }

    let mut vocab: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    vocab.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.tag.to_lowercase().cmp(&b.tag.to_lowercase()))
            .then_with(|| a.tag.cmp(&b.tag))
    });
    vocab.truncate(cap);
    vocab
}

/// How a project card is marked for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    /// No selection: neither class.
    Neutral,
    /// `is-match`.
    Match,
    /// `is-muted`.
    Muted,
}

/// Vocabulary plus the current selection, in click order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolboxState {
    vocab: Vec<TagCount>,
    selected: Vec<String>,
}

impl ToolboxState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the vocabulary, dropping selected tags that left it.
    pub fn rebuild(&mut self, content: &LocalizedContent, cap: usize) {
        self.vocab = vocabulary(content, cap);
        let vocab = &self.vocab;
        self.selected.retain(|t| vocab.iter().any(|v| &v.tag == t));
    }

    #[must_use]
    pub fn vocabulary(&self) -> &[TagCount] {
        &self.vocab
    }

    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    #[must_use]
    pub fn is_selected(&self, tag: &str) -> bool {
        self.selected.iter().any(|t| t == tag)
    }

    fn in_vocabulary(&self, tag: &str) -> bool {
        self.vocab.iter().any(|v| v.tag == tag)
    }

    /// Apply a click on `tag`. Returns whether the selection changed.
    pub fn click(&mut self, tag: &str, mods: Modifiers) -> bool {
        if !self.in_vocabulary(tag) {
            return false;
        }
        if mods.is_additive() {
            if let Some(pos) = self.selected.iter().position(|t| t == tag) {
                self.selected.remove(pos);
            } else {
                self.selected.push(tag.to_string());
            }
            return true;
        }
        if self.selected.len() == 1 && self.selected[0] == tag {
            self.selected.clear();
        } else {
            self.selected = vec![tag.to_string()];
        }
        true
    }

    /// Empty the selection. Returns whether anything was selected.
    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Whether `project` carries every selected tag.
    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        self.selected.iter().all(|t| project.has_tag(t))
    }

    #[must_use]
    pub fn card_state(&self, project: &Project) -> CardState {
        if self.selected.is_empty() {
            CardState::Neutral
        } else if self.matches(project) {
            CardState::Match
        } else {
            CardState::Muted
        }
    }

    /// Status line: selected tags and `matching/total`.
    #[must_use]
    pub fn status(&self, content: &LocalizedContent) -> String {
        let labels = &content.labels;
        let total = content.projects.len();
        let noun = label(&labels.toolbox_projects, "projects");
        if self.selected.is_empty() {
            let all = label(&labels.toolbox_all, "All projects");
            return format!("{all} · {total}/{total} {noun}");
        }
        let matching = content.projects.iter().filter(|p| self.matches(p)).count();
        let shown = self.selected.len().min(STATUS_HEAD);
        let mut head = self.selected[..shown].join(", ");
        let hidden = self.selected.len() - shown;
        if hidden > 0 {
            let more = label(&labels.toolbox_more, "more");
            head.push_str(&format!(" +{hidden} {more}"));
        }
        format!("{head} · {matching}/{total} {noun}")
    }
}

/// Renders tag buttons, the status line, and card highlight classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Toolbox;

impl Toolbox {
    /// Only the parts that change with the selection: button state,
    /// status, clear button, card classes.
    pub fn render_selection(
        &self,
        ctx: &RenderCtx<'_>,
        frame: &mut Frame,
        state: &ToolboxState,
    ) {
        for entry in state.vocabulary() {
            let on = state.is_selected(&entry.tag);
            let target = Target::data(TAG_ATTR, entry.tag.as_str());
            frame.push(Patch::set_class(target.clone(), "is-active", on));
            frame.push(Patch::set_attr(target, "aria-pressed", on.to_string()));
        }
        frame.push(Patch::set_text(Target::id(STATUS_ID), state.status(ctx.content)));
        let clear = Target::id(CLEAR_ID);
        frame.push(if state.selected().is_empty() {
            Patch::set_attr(clear, "disabled", "")
        } else {
            Patch::remove_attr(clear, "disabled")
        });
        for project in &ctx.content.projects {
            let card_state = state.card_state(project);
            let target = Target::data(PROJECT_ID_ATTR, project.id.as_str());
            frame.push(Patch::set_class(
                target.clone(),
                "is-match",
                card_state == CardState::Match,
            ));
            frame.push(Patch::set_class(
                target,
                "is-muted",
                card_state == CardState::Muted,
            ));
        }
    }
}

impl StatefulWidget for Toolbox {
    type State = ToolboxState;

    fn render(&self, ctx: &RenderCtx<'_>, frame: &mut Frame, state: &ToolboxState) {
        let buttons = state.vocabulary().iter().map(|entry| {
            let on = state.is_selected(&entry.tag);
            el("button")
                .class("tool-tag")
                .class_if("is-active", on)
                .attr("type", "button")
                .attr(TAG_ATTR, entry.tag.as_str())
                .attr("aria-pressed", on.to_string())
                .text(entry.tag.as_str())
                .child(el("span").class("tool-count").text(entry.count.to_string()))
        });
        frame.push(Patch::replace_children(
            Target::id(TAGS_ID),
            buttons.map(Into::into).collect(),
        ));
        self.render_selection(ctx, frame, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::content::SkillGroup;
    use pretty_assertions::assert_eq;

    fn project(id: &str, stack: &[&str]) -> Project {
        Project {
            id: id.into(),
            stack: stack.iter().map(|s| (*s).to_string()).collect(),
            ..Project::default()
        }
    }

    fn content() -> LocalizedContent {
        let mut c = LocalizedContent::default();
        c.projects = vec![
            project("x", &["Go", "Docker"]),
            project("y", &["Rust", "Docker"]),
        ];
        c.skills = vec![SkillGroup {
            group: "Lang".into(),
            items: vec!["go".into(), "Rust".into(), "Go".into()],
        }];
        c
    }

    #[test]
    fn vocabulary_ranks_by_count_then_case_insensitive() {
        let tags: Vec<(String, usize)> = vocabulary(&content(), 36)
            .into_iter()
            .map(|t| (t.tag, t.count))
            .collect();
        assert_eq!(
            tags,
            vec![
                ("Docker".into(), 2),
                ("Go".into(), 2),
                ("Rust".into(), 2),
                ("go".into(), 1),
            ]
        );
        assert_eq!(vocabulary(&content(), 2).len(), 2);
    }

    #[test]
    fn plain_click_selects_only_and_toggles_off() {
        let mut state = ToolboxState::new();
        state.rebuild(&content(), 36);
        assert!(state.click("Go", Modifiers::empty()));
        assert!(state.click("Rust", Modifiers::empty()));
        assert_eq!(state.selected(), ["Rust".to_string()]);
        assert!(state.click("Rust", Modifiers::empty()));
        assert!(state.selected().is_empty());
    }

    #[test]
    fn modifier_click_toggles_membership() {
        let mut state = ToolboxState::new();
        state.rebuild(&content(), 36);
        state.click("Go", Modifiers::empty());
        state.click("Docker", Modifiers::SHIFT);
        assert_eq!(state.selected(), ["Go".to_string(), "Docker".to_string()]);
        state.click("Go", Modifiers::CTRL);
        assert_eq!(state.selected(), ["Docker".to_string()]);
    }

    #[test]
    fn unknown_tags_are_ignored() {
        let mut state = ToolboxState::new();
        state.rebuild(&content(), 36);
        assert!(!state.click("COBOL", Modifiers::empty()));
        assert!(state.selected().is_empty());
    }

    #[test]
    fn superset_match_example() {
        let c = content();
        let mut state = ToolboxState::new();
        state.rebuild(&c, 36);
        let x = &c.projects[0];
        state.click("Go", Modifiers::empty());
        assert_eq!(state.card_state(x), CardState::Match);
        state.click("Rust", Modifiers::SUPER);
        assert_eq!(state.card_state(x), CardState::Muted);
        state.clear();
        assert_eq!(state.card_state(x), CardState::Neutral);
    }

    #[test]
    fn rebuild_restricts_selection() {
        let mut state = ToolboxState::new();
        state.rebuild(&content(), 36);
        state.click("go", Modifiers::empty());
        let mut other = content();
        other.skills.clear();
        state.rebuild(&other, 36);
        assert!(state.selected().is_empty());
    }

    #[test]
    fn status_line() {
        let c = content();
        let mut state = ToolboxState::new();
        state.rebuild(&c, 36);
        assert_eq!(state.status(&c), "All projects · 2/2 projects");
        state.click("Docker", Modifiers::empty());
        assert_eq!(state.status(&c), "Docker · 2/2 projects");
        for tag in ["Go", "Rust", "go"] {
            state.click(tag, Modifiers::SHIFT);
        }
        assert_eq!(state.status(&c), "Docker, Go, Rust +1 more · 0/2 projects");
    }
}
