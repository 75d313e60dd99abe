#![forbid(unsafe_code)]

//! Page widgets for Folio.
//!
//! Every widget renders into a [`Frame`] of patches against fixed container
//! ids. Stateless section renderers implement [`Widget`]; components with
//! selection or focus state implement [`StatefulWidget`] over a separate
//! state struct owned by the application model.

pub mod backdrop;
pub mod command_palette;
pub mod focus_trap;
pub mod lab;
pub mod page;
pub mod project_modal;
pub mod sections;
pub mod tilt;
pub mod toolbox;

use folio_core::FolioConfig;
use folio_core::content::LocalizedContent;
use folio_core::link::LinkBase;
use folio_render::{Frame, Node, Patch, Target};

/// Everything a renderer may read.
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx<'a> {
    /// Active language slice.
    pub content: &'a LocalizedContent,
    /// Resolver for author-supplied links.
    pub links: &'a LinkBase,
    pub config: &'a FolioConfig,
}

impl<'a> RenderCtx<'a> {
    #[must_use]
    pub fn new(content: &'a LocalizedContent, links: &'a LinkBase, config: &'a FolioConfig) -> Self {
        Self {
            content,
            links,
            config,
        }
    }
}

/// A renderer that owns the children of one container element.
pub trait Widget {
    /// Id of the container whose children this widget replaces.
    fn container(&self) -> &'static str;

    /// Build the container's new children.
    fn build(&self, ctx: &RenderCtx<'_>) -> Vec<Node>;

    /// Emit a full replacement of the container's children.
    fn render(&self, ctx: &RenderCtx<'_>, frame: &mut Frame) {
        frame.push(Patch::replace_children(
            Target::id(self.container()),
            self.build(ctx),
        ));
    }
}

/// A widget that renders from externally owned state.
pub trait StatefulWidget {
    type State;

    /// Render the widget for the given state.
    fn render(&self, ctx: &RenderCtx<'_>, frame: &mut Frame, state: &Self::State);
}

/// Label from the document, or a built-in fallback.
pub(crate) fn label<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
}
