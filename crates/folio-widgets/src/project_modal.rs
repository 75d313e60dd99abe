#![forbid(unsafe_code)]

//! Project detail dialog.
//!
//! The dialog element (`#project-modal`) is part of the page shell; this
//! module only fills its body and tracks which project is open. Showing
//! and hiding the dialog is the host's job, through whichever dialog
//! provider the platform supports.

use folio_core::content::{LocalizedContent, Project};
use folio_core::event::{KeyCode, KeyInput};
use folio_render::{Element, Frame, Node, Patch, Target, el};

use crate::sections::project_links;
use crate::{RenderCtx, StatefulWidget, label};

/// Dialog element id.
pub const MODAL_ID: &str = "project-modal";

/// Container the body is rendered into.
pub const BODY_ID: &str = "project-modal-body";

/// Backdrop shown by the non-native dialog fallback.
pub const BACKDROP_ID: &str = "modal-backdrop";

/// Which project, if any, the dialog is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    current: Option<String>,
}

impl ModalState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as the open project.
    pub fn open(&mut self, id: impl Into<String>) {
        self.current = Some(id.into());
    }

    /// Clear the open project, returning the id that was open.
    pub fn close(&mut self) -> Option<String> {
        self.current.take()
    }

    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Escape requests a close while open.
    #[must_use]
    pub fn wants_close(&self, key: &KeyInput) -> bool {
        self.is_open() && key.code == KeyCode::Escape
    }
}

/// Renders the open project's details into [`BODY_ID`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectModal;

impl StatefulWidget for ProjectModal {
    type State = ModalState;

    fn render(&self, ctx: &RenderCtx<'_>, frame: &mut Frame, state: &ModalState) {
        let nodes = state
            .current()
            .and_then(|id| ctx.content.project(id))
            .map(|p| build_body(ctx, p))
            .unwrap_or_default();
        frame.push(Patch::replace_children(Target::id(BODY_ID), nodes));
    }
}

/// The labeled detail boxes for a project, only for fields with non-blank
/// text. Blank list entries are dropped.
///
/// Order: problem, approach, impact, highlights.
#[must_use]
pub fn detail_boxes(content: &LocalizedContent, project: &Project) -> Vec<Element> {
    let labels = &content.labels;
    let mut boxes = Vec::with_capacity(4);

    let problem = project.problem.trim();
    if !problem.is_empty() {
        boxes.push(detail_box(
            label(&labels.problem, "Problem"),
            el("p").text(problem),
        ));
    }
    for (list, text) in [
        (&project.approach, label(&labels.approach, "Approach")),
        (&project.impact, label(&labels.impact, "Impact")),
        (&project.highlights, label(&labels.highlights, "Highlights")),
    ] {
        let items: Vec<&str> = list
            .iter()
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
            .collect();
        if !items.is_empty() {
            let ul = el("ul").children(items.into_iter().map(|t| el("li").text(t)));
            boxes.push(detail_box(text, ul));
        }
    }
    boxes
}

fn detail_box(heading: &str, body: Element) -> Element {
    el("section")
        .class("modal-box")
        .child(el("h3").text(heading))
        .child(body)
}

/// Full dialog body: title, subtitle, detail boxes, stack row, links and
/// the optional disclaimer.
#[must_use]
pub fn build_body(ctx: &RenderCtx<'_>, project: &Project) -> Vec<Node> {
    let mut nodes: Vec<Node> = vec![
        el("h2")
            .attr("id", "project-modal-title")
            .text(project.title.as_str())
            .into(),
        el("p")
            .class("modal-subtitle")
            .text(project.subtitle.as_str())
            .into(),
    ];

    let boxes = detail_boxes(ctx.content, project);
    if !boxes.is_empty() {
        nodes.push(el("div").class("modal-grid").children(boxes).into());
    }

    if !project.stack.is_empty() {
        nodes.push(
            el("div")
                .class("stack")
                .attr("aria-label", label(&ctx.content.labels.stack, "Stack"))
                .children(
                    project
                        .stack
                        .iter()
                        .map(|t| el("span").class("pilltag").text(t.as_str())),
                )
                .into(),
        );
    }

    let links = project_links(ctx, project);
    if !links.children.is_empty() {
        nodes.push(links.into());
    }

    let disclaimer = project.disclaimer.trim();
    if !disclaimer.is_empty() {
        nodes.push(el("p").class("disclaimer").text(disclaimer).into());
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::FolioConfig;
    use folio_core::link::LinkBase;
    use pretty_assertions::assert_eq;

    fn project() -> Project {
        Project {
            id: "x".into(),
            title: "X".into(),
            subtitle: "sub".into(),
            stack: vec!["Go".into(), "Docker".into()],
            approach: Vec::new(),
            impact: vec!["Faster".into()],
            ..Project::default()
        }
    }

    #[test]
    fn only_non_empty_boxes_render() {
        let content = LocalizedContent::default();
        let boxes = detail_boxes(&content, &project());
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].child_elements().next().map(Element::text_content), Some("Impact".into()));
    }

    #[test]
    fn blank_entries_do_not_make_a_box() {
        let content = LocalizedContent::default();
        let p = Project {
            problem: "   ".into(),
            approach: vec![String::new(), "  ".into()],
            highlights: vec!["".into(), "Fast".into()],
            ..project()
        };
        let boxes = detail_boxes(&content, &p);
        let headings: Vec<String> = boxes
            .iter()
            .filter_map(|b| b.child_elements().next().map(Element::text_content))
            .collect();
        assert_eq!(headings, vec!["Impact", "Highlights"]);
        let bullets: Vec<&Element> = boxes[1]
            .child_elements()
            .nth(1)
            .map(|ul| ul.child_elements().collect())
            .unwrap_or_default();
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].text_content(), "Fast");
    }

    #[test]
    fn all_four_boxes_in_order() {
        let content = LocalizedContent::default();
        let p = Project {
            problem: "P".into(),
            approach: vec!["A".into()],
            highlights: vec!["H".into()],
            ..project()
        };
        let headings: Vec<String> = detail_boxes(&content, &p)
            .iter()
            .filter_map(|b| b.child_elements().next().map(Element::text_content))
            .collect();
        assert_eq!(headings, vec!["Problem", "Approach", "Impact", "Highlights"]);
    }

    #[test]
    fn body_omits_empty_disclaimer_and_links() {
        let content = LocalizedContent::default();
        let links = LinkBase::default();
        let config = FolioConfig::default();
        let ctx = RenderCtx::new(&content, &links, &config);
        let body = build_body(&ctx, &project());
        let html = folio_render::node::fragment_html(&body);
        assert!(html.starts_with("<h2 id=\"project-modal-title\">X</h2>"));
        assert!(!html.contains("disclaimer"));
        assert!(!html.contains("class=\"links\""));
        assert!(html.contains("<span class=\"pilltag\">Docker</span>"));
    }

    #[test]
    fn state_open_close_and_escape() {
        let mut state = ModalState::new();
        let esc = KeyInput::plain(KeyCode::Escape);
        assert!(!state.wants_close(&esc));
        state.open("x");
        assert_eq!(state.current(), Some("x"));
        assert!(state.wants_close(&esc));
        assert_eq!(state.close().as_deref(), Some("x"));
        assert!(!state.is_open());
    }

    #[test]
    fn closed_state_renders_empty_body() {
        let content = LocalizedContent::default();
        let links = LinkBase::default();
        let config = FolioConfig::default();
        let ctx = RenderCtx::new(&content, &links, &config);
        let mut frame = Frame::new();
        ProjectModal.render(&ctx, &mut frame, &ModalState::new());
        assert_eq!(
            frame.patches(),
            &[Patch::replace_children(Target::id(BODY_ID), Vec::new())]
        );
    }
}
