#![forbid(unsafe_code)]

//! Browser bindings.
//!
//! ```js
//! import init, { FolioWeb } from "./pkg/folio_web.js";
//! await init();
//! const app = new FolioWeb();
//! app.boot();
//! ```

mod backdrop;
mod dialog;
mod dom;
mod events;
mod fetch;
mod host;
mod reveal;
mod storage;

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::error::HostError;
use host::Host;

/// Best-effort text for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

pub(crate) fn js_error(value: JsValue) -> HostError {
    HostError::Js(describe(&value))
}

impl From<HostError> for JsValue {
    fn from(err: HostError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// The portfolio page client.
#[wasm_bindgen]
pub struct FolioWeb {
    host: Option<Rc<Host>>,
}

#[wasm_bindgen]
impl FolioWeb {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { host: None }
    }

    /// Wire the client to the current document and start loading content.
    /// Calling it again while booted does nothing.
    pub fn boot(&mut self) -> Result<(), JsValue> {
        if self.host.is_some() {
            return Ok(());
        }
        console_error_panic_hook::set_once();
        #[cfg(feature = "tracing")]
        crate::logging::install();
        self.host = Some(Host::boot()?);
        Ok(())
    }

    /// Whether `boot` succeeded and `destroy` has not been called since.
    #[wasm_bindgen(getter)]
    pub fn booted(&self) -> bool {
        self.host.is_some()
    }

    /// Detach listeners and stop the backdrop so the page can be torn down.
    pub fn destroy(&mut self) {
        if let Some(host) = self.host.take() {
            host.shutdown();
        }
    }
}

impl Default for FolioWeb {
    fn default() -> Self {
        Self::new()
    }
}
