#![forbid(unsafe_code)]

use folio_core::{ContentError, ContentResult};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCache, RequestInit, Response, Window};

use super::describe;

fn network(err: wasm_bindgen::JsValue) -> ContentError {
    ContentError::Network(describe(&err))
}

/// GET `url` bypassing the HTTP cache and return the body text.
pub(crate) async fn fetch_text(window: &Window, url: &str) -> ContentResult<String> {
    let init = RequestInit::new();
    init.set_method("GET");
    init.set_cache(RequestCache::NoStore);
    let request = Request::new_with_str_and_init(url, &init).map_err(network)?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;
    if !response.ok() {
        return Err(ContentError::Status(response.status()));
    }
    JsFuture::from(response.text().map_err(network)?)
        .await
        .map_err(network)?
        .as_string()
        .ok_or_else(|| ContentError::Parse("response body is not text".into()))
}
