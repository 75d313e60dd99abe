#![forbid(unsafe_code)]

//! Applies patch frames to the live document.

use folio_render::{Frame, Node, Patch, Target};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use super::js_error;
use crate::dialog::{PatchSink, apply_each};
use crate::error::{HostError, HostResult};

/// DOM presenter. Cheap to clone; all clones drive the same document.
#[derive(Debug, Clone)]
pub(crate) struct DomPresenter {
    document: Document,
}

impl DomPresenter {
    pub(crate) fn new(document: Document) -> Self {
        Self { document }
    }

    /// Elements addressed by `target`, in document order.
    pub(crate) fn resolve(&self, target: &Target) -> HostResult<Vec<Element>> {
        if *target == Target::Root {
            return Ok(self.document.document_element().into_iter().collect());
        }
        let list = self
            .document
            .query_selector_all(&target.selector())
            .map_err(js_error)?;
        Ok((0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn build(&self, node: &Node) -> HostResult<web_sys::Node> {
        match node {
            Node::Text(text) => Ok(self.document.create_text_node(text).into()),
            Node::Element(element) => {
                let el = self
                    .document
                    .create_element_ns(element.ns.uri(), &element.tag)
                    .map_err(js_error)?;
                for class in &element.classes {
                    el.class_list().add_1(class).map_err(js_error)?;
                }
                for (name, value) in &element.attrs {
                    el.set_attribute(name, value).map_err(js_error)?;
                }
                for child in &element.children {
                    el.append_child(&self.build(child)?).map_err(js_error)?;
                }
                Ok(el.into())
            }
        }
    }

    /// Apply one patch. A target that matches nothing is not an error: the
    /// shell may omit optional sections.
    pub(crate) fn apply_patch(&self, patch: &Patch) -> HostResult<()> {
        match patch {
            Patch::ReplaceChildren { target, nodes } => {
                for el in self.resolve(target)? {
                    el.set_text_content(None);
                    for node in nodes {
                        el.append_child(&self.build(node)?).map_err(js_error)?;
                    }
                }
            }
            Patch::SetText { target, text } => {
                for el in self.resolve(target)? {
                    el.set_text_content(Some(text));
                }
            }
            Patch::SetAttr {
                target,
                name,
                value,
            } => {
                for el in self.resolve(target)? {
                    match value {
                        Some(v) => el.set_attribute(name, v).map_err(js_error)?,
                        None => el.remove_attribute(name).map_err(js_error)?,
                    }
                }
            }
            Patch::SetClass { target, class, on } => {
                for el in self.resolve(target)? {
                    el.class_list()
                        .toggle_with_force(class, *on)
                        .map_err(js_error)?;
                }
            }
            Patch::SetTitle(title) => self.document.set_title(title),
            Patch::Focus(target) => {
                let el = self
                    .resolve(target)?
                    .into_iter()
                    .next()
                    .ok_or_else(|| HostError::MissingElement(target.selector()))?;
                if let Ok(el) = el.dyn_into::<HtmlElement>() {
                    el.focus().map_err(js_error)?;
                }
            }
        }
        Ok(())
    }

    /// Apply every patch; failures are logged and skipped.
    pub(crate) fn apply(&self, frame: &Frame) -> HostResult<()> {
        apply_each(frame, |patch| self.apply_patch(patch))
    }
}

impl PatchSink for DomPresenter {
    fn apply_frame(&mut self, frame: &Frame) -> HostResult<()> {
        self.apply(frame)
    }
}
