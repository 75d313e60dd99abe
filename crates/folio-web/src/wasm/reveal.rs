#![forbid(unsafe_code)]

//! Reveal-on-scroll for `[data-reveal]` sections.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use super::js_error;
use crate::error::HostResult;

pub(crate) const REVEAL_SELECTOR: &str = "[data-reveal]";
pub(crate) const VISIBLE_CLASS: &str = "is-visible";

fn reveal_targets(document: &Document) -> HostResult<Vec<Element>> {
    let list = document
        .query_selector_all(REVEAL_SELECTOR)
        .map_err(js_error)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect())
}

/// Observer that marks sections visible once, then stops watching them.
pub(crate) struct Reveal {
    observer: Option<IntersectionObserver>,
    _callback: Option<Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>>,
}

impl Reveal {
    /// Show every section immediately.
    pub(crate) fn show_all(document: &Document) -> HostResult<Self> {
        for el in reveal_targets(document)? {
            el.class_list().add_1(VISIBLE_CLASS).map_err(js_error)?;
        }
        Ok(Self {
            observer: None,
            _callback: None,
        })
    }

    /// Watch sections and reveal each once `threshold` of it is on screen.
    pub(crate) fn observe(document: &Document, threshold: f64) -> HostResult<Self> {
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    if let Err(err) = target.class_list().add_1(VISIBLE_CLASS) {
                        folio_core::warn!(error = %super::describe(&err), "reveal class rejected");
                    }
                    observer.unobserve(&target);
                }
            },
        );
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(js_error)?;
        let targets = reveal_targets(document)?;
        folio_core::debug!(count = targets.len(), threshold, "observing reveal targets");
        for el in &targets {
            observer.observe(el);
        }
        Ok(Self {
            observer: Some(observer),
            _callback: Some(callback),
        })
    }
}

impl Drop for Reveal {
    fn drop(&mut self) {
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
    }
}
