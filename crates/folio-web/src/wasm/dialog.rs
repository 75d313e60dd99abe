#![forbid(unsafe_code)]

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlDialogElement};

use super::js_error;
use crate::dialog::DialogProvider;
use crate::error::{HostError, HostResult};

/// `HTMLDialogElement.showModal()`; the browser makes the rest of the page
/// inert and keeps Tab inside the dialog.
pub(crate) struct NativeDialog {
    document: Document,
}

impl NativeDialog {
    pub(crate) fn new(document: Document) -> Self {
        Self { document }
    }

    fn dialog(&self, id: &str) -> HostResult<HtmlDialogElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlDialogElement>().ok())
            .ok_or_else(|| HostError::MissingElement(format!("dialog#{id}")))
    }
}

impl DialogProvider for NativeDialog {
    fn name(&self) -> &'static str {
        "native"
    }

    fn show(&mut self, id: &str) -> HostResult<()> {
        let dialog = self.dialog(id)?;
        if !dialog.open() {
            dialog.show_modal().map_err(js_error)?;
        }
        Ok(())
    }

    fn close(&mut self, id: &str) -> HostResult<()> {
        let dialog = self.dialog(id)?;
        if dialog.open() {
            dialog.close();
        }
        Ok(())
    }
}
