#![forbid(unsafe_code)]

//! Lab node-link diagram.
//!
//! Nodes sit at percentage coordinates of a 0–100 canvas; edges are drawn
//! in an SVG layer sharing that coordinate space (`viewBox="0 0 100 100"`),
//! so both layers scale together with the container.

use folio_core::content::{Lab, LabNode};
use folio_render::{Frame, Node, Patch, Target, el, svg};

use crate::{RenderCtx, StatefulWidget};

/// Diagram container (edges + node buttons).
pub const DIAGRAM_ID: &str = "lab-diagram";

/// Detail panel for the active node.
pub const DETAIL_ID: &str = "lab-detail";

/// Legend list.
pub const LEGEND_ID: &str = "lab-legend";

/// Attribute carrying a node id on its button.
pub const NODE_ATTR: &str = "data-lab-node";

/// Clamp a coordinate into the virtual canvas. NaN maps to 0.
#[must_use]
pub fn clamp_coord(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

/// Which node is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabState {
    active: Option<String>,
}

impl LabState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Re-point at `lab`: keep the active id if it still exists, else fall
    /// back to the first node.
    pub fn sync(&mut self, lab: &Lab) {
        let keep = self.active.as_deref().is_some_and(|id| lab.node(id).is_some());
        if !keep {
            self.active = lab.nodes.first().map(|n| n.id.clone());
        }
    }

    /// Activate `id` on click. Returns whether the active node changed.
    pub fn activate(&mut self, lab: &Lab, id: &str) -> bool {
        if lab.node(id).is_none() || self.active.as_deref() == Some(id) {
            return false;
        }
        self.active = Some(id.to_string());
        true
    }

    /// Activate `id` on hover, only when motion is permitted.
    pub fn hover(&mut self, lab: &Lab, id: &str, motion_ok: bool) -> bool {
        motion_ok && self.activate(lab, id)
    }

    fn active_node<'a>(&self, lab: &'a Lab) -> Option<&'a LabNode> {
        self.active.as_deref().and_then(|id| lab.node(id))
    }
}

/// Renders the diagram, the detail panel, and the legend.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabDiagram;

impl LabDiagram {
    /// Straight edge lines for every link whose target exists.
    #[must_use]
    pub fn edges(lab: &Lab) -> Node {
        let lines = lab.nodes.iter().flat_map(|from| {
            from.links
                .iter()
                .filter_map(|to_id| lab.node(to_id))
                .map(move |to| {
                    svg("line")
                        .class("lab-edge")
                        .attr("x1", clamp_coord(from.x).to_string())
                        .attr("y1", clamp_coord(from.y).to_string())
                        .attr("x2", clamp_coord(to.x).to_string())
                        .attr("y2", clamp_coord(to.y).to_string())
                        .attr("data-from", from.id.as_str())
                        .attr("data-to", to.id.as_str())
                })
        });
        svg("svg")
            .class("lab-edges")
            .attr("viewBox", "0 0 100 100")
            .attr("preserveAspectRatio", "none")
            .attr("aria-hidden", "true")
            .children(lines)
            .into()
    }

    fn node_button(node: &LabNode, active: bool) -> Node {
        el("button")
            .class("lab-node")
            .class_if("is-active", active)
            .attr("type", "button")
            .attr(NODE_ATTR, node.id.as_str())
            .attr("aria-pressed", active.to_string())
            .attr(
                "style",
                format!("left:{}%;top:{}%", clamp_coord(node.x), clamp_coord(node.y)),
            )
            .text(node.label.as_str())
            .into()
    }

    /// Detail panel children for a node.
    #[must_use]
    pub fn detail(node: Option<&LabNode>) -> Vec<Node> {
        let Some(node) = node else {
            return Vec::new();
        };
        let mut out: Vec<Node> = vec![
            el("h3").text(node.title.as_str()).into(),
            el("p").text(node.body.as_str()).into(),
        ];
        if !node.bullets.is_empty() {
            out.push(
                el("ul")
                    .children(node.bullets.iter().map(|b| el("li").text(b.as_str())))
                    .into(),
            );
        }
        out
    }

    /// Click/hover update: button state and the detail panel only.
    pub fn render_active(&self, ctx: &RenderCtx<'_>, frame: &mut Frame, state: &LabState) {
        let lab = &ctx.content.lab;
        for node in &lab.nodes {
            let on = state.active() == Some(node.id.as_str());
            let target = Target::data(NODE_ATTR, node.id.as_str());
            frame.push(Patch::set_class(target.clone(), "is-active", on));
            frame.push(Patch::set_attr(target, "aria-pressed", on.to_string()));
        }
        frame.push(Patch::replace_children(
            Target::id(DETAIL_ID),
            Self::detail(state.active_node(lab)),
        ));
    }
}

impl StatefulWidget for LabDiagram {
    type State = LabState;

    fn render(&self, ctx: &RenderCtx<'_>, frame: &mut Frame, state: &LabState) {
        let lab = &ctx.content.lab;
        let mut nodes = vec![Self::edges(lab)];
        nodes.extend(
            lab.nodes
                .iter()
                .map(|n| Self::node_button(n, state.active() == Some(n.id.as_str()))),
        );
        frame.push(Patch::replace_children(Target::id(DIAGRAM_ID), nodes));
        frame.push(Patch::replace_children(
            Target::id(DETAIL_ID),
            Self::detail(state.active_node(lab)),
        ));
        frame.push(Patch::replace_children(
            Target::id(LEGEND_ID),
            lab.legend
                .iter()
                .map(|entry| {
                    el("li")
                        .child(el("strong").text(entry.label.as_str()))
                        .child(el("span").text(entry.description.as_str()))
                        .into()
                })
                .collect(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(id: &str, x: f64, y: f64, links: &[&str]) -> LabNode {
        LabNode {
            id: id.into(),
            label: id.to_uppercase(),
            x,
            y,
            links: links.iter().map(|s| (*s).to_string()).collect(),
            title: format!("{id} title"),
            ..LabNode::default()
        }
    }

    fn lab() -> Lab {
        Lab {
            nodes: vec![
                node("a", 10.0, 20.0, &["b", "ghost"]),
                node("b", 150.0, -5.0, &["a"]),
            ],
            legend: Vec::new(),
        }
    }

    #[test]
    fn first_node_active_by_default_and_kept_on_sync() {
        let lab = lab();
        let mut state = LabState::new();
        state.sync(&lab);
        assert_eq!(state.active(), Some("a"));
        assert!(state.activate(&lab, "b"));
        state.sync(&lab);
        assert_eq!(state.active(), Some("b"));

        let smaller = Lab {
            nodes: vec![node("a", 0.0, 0.0, &[])],
            legend: Vec::new(),
        };
        state.sync(&smaller);
        assert_eq!(state.active(), Some("a"));
    }

    #[test]
    fn hover_requires_motion() {
        let lab = lab();
        let mut state = LabState::new();
        state.sync(&lab);
        assert!(!state.hover(&lab, "b", false));
        assert!(state.hover(&lab, "b", true));
        assert!(!state.activate(&lab, "nope"));
    }

    #[test]
    fn edges_skip_unknown_targets_and_clamp() {
        let html = LabDiagram::edges(&lab()).to_html();
        assert_eq!(html.matches("<line").count(), 2);
        assert!(html.contains("x1=\"100\" y1=\"0\""));
        assert!(!html.contains("ghost"));
    }

    #[test]
    fn empty_lab_renders_empty_detail() {
        assert!(LabDiagram::detail(None).is_empty());
        assert_eq!(clamp_coord(f64::NAN), 0.0);
    }
}
