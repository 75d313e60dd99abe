#![forbid(unsafe_code)]

//! In-memory document that applies [`Frame`]s.
//!
//! The mirror holds one element tree rooted at `<html>` plus the document
//! title and the focused target. It interprets patches with the same
//! addressing rules the web presenter uses, which makes it the reference
//! presenter for tests.

use crate::node::{Element, Node};
use crate::patch::{Frame, Patch, Target};

/// In-memory presenter.
#[derive(Debug, Clone, PartialEq)]
pub struct DomMirror {
    root: Element,
    title: String,
    focused: Option<Target>,
    applied: usize,
}

impl DomMirror {
    /// Create a mirror around a document element.
    #[must_use]
    pub fn new(root: Element) -> Self {
        Self {
            root,
            title: String::new(),
            focused: None,
            applied: 0,
        }
    }

    /// Apply every patch of a frame, in order.
    pub fn apply(&mut self, frame: &Frame) {
        folio_core::trace!(patches = frame.len(), "mirror: apply frame");
        for patch in frame {
            self.apply_patch(patch);
        }
    }

    /// Apply one patch. Patches whose target matches nothing are no-ops.
    pub fn apply_patch(&mut self, patch: &Patch) {
        self.applied += 1;
        match patch {
            Patch::SetTitle(title) => self.title.clone_from(title),
            Patch::Focus(target) => self.focused = Some(target.clone()),
            Patch::ReplaceChildren { target, nodes } => {
                self.for_each_match(target, &mut |el| el.children.clone_from(nodes));
            }
            Patch::SetText { target, text } => {
                self.for_each_match(target, &mut |el| {
                    el.children = vec![Node::Text(text.clone())];
                });
            }
            Patch::SetAttr {
                target,
                name,
                value,
            } => {
                self.for_each_match(target, &mut |el| match value {
                    Some(v) => el.set_attr(name, v.clone()),
                    None => el.remove_attr(name),
                });
            }
            Patch::SetClass { target, class, on } => {
                self.for_each_match(target, &mut |el| {
                    if *on {
                        el.add_class(class);
                    } else {
                        el.remove_class(class);
                    }
                });
            }
        }
    }

    fn for_each_match(&mut self, target: &Target, f: &mut dyn FnMut(&mut Element)) {
        if *target == Target::Root {
            f(&mut self.root);
            return;
        }
        self.root.walk_mut(&mut |el| {
            if target.matches(el) {
                f(el);
            }
        });
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn focused(&self) -> Option<&Target> {
        self.focused.as_ref()
    }

    /// Number of patches applied since creation.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Every element addressed by `target`, in document order.
    #[must_use]
    pub fn select(&self, target: &Target) -> Vec<&Element> {
        if *target == Target::Root {
            return vec![&self.root];
        }
        let mut out = Vec::new();
        self.root.find_all(&|el| target.matches(el), &mut out);
        out
    }

    /// First element with this id.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&Element> {
        self.select(&Target::id(id)).into_iter().next()
    }

    /// Text content of the element with this id (empty if missing).
    #[must_use]
    pub fn text_of(&self, id: &str) -> String {
        self.by_id(id).map(Element::text_content).unwrap_or_default()
    }

    /// Every element with the given class, in document order.
    #[must_use]
    pub fn with_class(&self, class: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.root.find_all(&|el| el.has_class(class), &mut out);
        out
    }

    /// Serialized document.
    #[must_use]
    pub fn to_html(&self) -> String {
        Node::Element(self.root.clone()).to_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::el;
    use pretty_assertions::assert_eq;

    fn shell() -> Element {
        el("html").child(
            el("body")
                .child(el("h2").attr("data-i18n", "nav.about").text("About"))
                .child(el("div").attr("id", "projects-grid"))
                .child(el("input").attr("id", "cmdk-input").attr("data-i18n-placeholder", "cmdk.placeholder")),
        )
    }

    #[test]
    fn replace_children_then_mutate_by_data_target() {
        let mut dom = DomMirror::new(shell());
        let mut frame = Frame::new();
        frame.push(Patch::replace_children(
            Target::id("projects-grid"),
            vec![
                el("article").attr("data-project-id", "a").into(),
                el("article").attr("data-project-id", "b").into(),
            ],
        ));
        frame.push(Patch::set_class(
            Target::data("data-project-id", "b"),
            "is-muted",
            true,
        ));
        dom.apply(&frame);

        let muted = dom.with_class("is-muted");
        assert_eq!(muted.len(), 1);
        assert_eq!(muted[0].get_attr("data-project-id"), Some("b"));
        assert_eq!(dom.applied(), 2);
    }

    #[test]
    fn text_attr_title_and_focus() {
        let mut dom = DomMirror::new(shell());
        dom.apply_patch(&Patch::set_text(Target::I18n("nav.about".into()), "Sobre"));
        dom.apply_patch(&Patch::set_attr(
            Target::I18nPlaceholder("cmdk.placeholder".into()),
            "placeholder",
            "Buscar",
        ));
        dom.apply_patch(&Patch::set_attr(Target::Root, "lang", "pt"));
        dom.apply_patch(&Patch::SetTitle("Portfólio".into()));
        dom.apply_patch(&Patch::Focus(Target::id("cmdk-input")));

        assert_eq!(dom.select(&Target::I18n("nav.about".into()))[0].text_content(), "Sobre");
        assert_eq!(
            dom.by_id("cmdk-input").and_then(|e| e.get_attr("placeholder")),
            Some("Buscar")
        );
        assert_eq!(dom.root().get_attr("lang"), Some("pt"));
        assert_eq!(dom.title(), "Portfólio");
        assert_eq!(dom.focused(), Some(&Target::id("cmdk-input")));
    }

    #[test]
    fn unmatched_targets_are_noops() {
        let mut dom = DomMirror::new(shell());
        let before = dom.to_html();
        dom.apply_patch(&Patch::set_text(Target::id("missing"), "x"));
        assert_eq!(dom.to_html(), before);
    }
}
