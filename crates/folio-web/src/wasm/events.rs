#![forbid(unsafe_code)]

//! Delegated DOM listeners.
//!
//! One listener per event type on the document (plus a few on the window
//! and media queries). Each turns the browser event into an
//! [`AppMsg`](folio_runtime::AppMsg) through the routing tables and hands it
//! to the host. Closures hold a weak host reference; dropping a
//! [`Listener`] detaches it.

use std::rc::{Rc, Weak};

use folio_core::event::{KeyInput, Modifiers};
use folio_runtime::AppMsg;
use folio_widgets::command_palette::INPUT_ID;
use folio_widgets::focus_trap::FocusMove;
use folio_widgets::sections::PROJECT_ID_ATTR;
use folio_widgets::tilt::{CardRect, Tilt};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, EventTarget, HtmlElement, HtmlInputElement, KeyboardEvent, MediaQueryList,
    MouseEvent, PointerEvent, VisibilityState,
};

use super::host::Host;
use super::js_error;
use crate::error::HostResult;
use crate::routing::{CLICK_ROUTES, HOVER_ROUTES, KeyContext, route_key};

/// Cards that tilt under the pointer.
const CARD_SELECTOR: &str = ".project-card";

/// An attached event listener, detached on drop.
pub(crate) struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> HostResult<Self> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref())
        {
            folio_core::warn!(kind = self.kind, error = %super::describe(&err), "listener removal failed");
        }
    }
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn closest(el: &Element, selector: &str) -> Option<Element> {
    el.closest(selector).ok().flatten()
}

fn modifiers(event: &MouseEvent) -> Modifiers {
    Modifiers::from_dom(
        event.shift_key(),
        event.alt_key(),
        event.ctrl_key(),
        event.meta_key(),
    )
}

/// Attach a handler that receives the host and the event downcast to `E`.
fn on<E: JsCast + 'static>(
    host: &Rc<Host>,
    target: &EventTarget,
    kind: &'static str,
    handler: fn(&Rc<Host>, E),
) -> HostResult<Listener> {
    let weak: Weak<Host> = Rc::downgrade(host);
    Listener::attach(target, kind, move |event: Event| {
        let (Some(host), Ok(event)) = (weak.upgrade(), event.dyn_into::<E>()) else {
            return;
        };
        handler(&host, event);
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn on_click(host: &Rc<Host>, event: MouseEvent) {
    let Some(target) = event_element(&event) else {
        return;
    };
    for route in &CLICK_ROUTES {
        let hit = if route.exact {
            target
                .matches(route.selector)
                .unwrap_or(false)
                .then(|| target.clone())
        } else {
            closest(&target, route.selector)
        };
        let Some(el) = hit else {
            continue;
        };
        if route.kind.prevents_default() {
            event.prevent_default();
        }
        let value = route.kind.value_attr().and_then(|attr| el.get_attribute(attr));
        if let Some(msg) = route.kind.click(value.as_deref(), modifiers(&event)) {
            host.send(msg);
        }
        return;
    }
}

fn on_keydown(host: &Rc<Host>, event: KeyboardEvent) {
    let mods = Modifiers::from_dom(
        event.shift_key(),
        event.alt_key(),
        event.ctrl_key(),
        event.meta_key(),
    );
    let key = KeyInput::from_dom(&event.key(), mods);

    if let Some(dir) = FocusMove::from_key(&key.code) {
        if host.trap_tab(dir) {
            event.prevent_default();
        }
        return;
    }

    let target = event_element(&event);
    let card = target
        .as_ref()
        .and_then(|el| el.get_attribute(PROJECT_ID_ATTR));
    let route = route_key(KeyContext {
        key,
        card: card.as_deref(),
        palette_open: host.palette_open(),
    });
    if route.prevent_default {
        event.prevent_default();
    }
    if let Some(msg) = route.msg {
        host.send(msg);
    }
}

fn on_input(host: &Rc<Host>, event: Event) {
    let Some(input) = event
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        .filter(|input| input.id() == INPUT_ID)
    else {
        return;
    };
    host.send(AppMsg::PaletteQuery(input.value()));
}

fn on_pointerover(host: &Rc<Host>, event: PointerEvent) {
    let Some(target) = event_element(&event) else {
        return;
    };
    for route in &HOVER_ROUTES {
        if let Some(el) = closest(&target, route.selector) {
            let value = route.kind.value_attr().and_then(|attr| el.get_attribute(attr));
            if let Some(msg) = route.kind.hover(value.as_deref()) {
                host.send(msg);
            }
            return;
        }
    }
}

fn on_pointermove(host: &Rc<Host>, event: PointerEvent) {
    if event.pointer_type() == "touch" || !host.motion_ok() {
        return;
    }
    let Some(card) = event_element(&event)
        .and_then(|el| closest(&el, CARD_SELECTOR))
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let rect = card.get_bounding_client_rect();
    let tilt = Tilt::from_pointer(
        f64::from(event.client_x()),
        f64::from(event.client_y()),
        CardRect {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        },
        host.tilt_max_deg(),
    );
    if let Err(err) = card.style().set_property("transform", &tilt.css()) {
        folio_core::warn!(error = %super::describe(&err), "card tilt rejected");
    }
}

fn on_pointerout(_host: &Rc<Host>, event: PointerEvent) {
    let Some(card) = event_element(&event)
        .and_then(|el| closest(&el, CARD_SELECTOR))
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let still_inside = event
        .related_target()
        .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
        .is_some_and(|node| card.contains(Some(&node)));
    if !still_inside {
        if let Err(err) = card.style().remove_property("transform") {
            folio_core::warn!(error = %super::describe(&err), "card tilt reset failed");
        }
    }
}

/// Native dialogs close themselves on Escape. The keydown listener already
/// routed the key (the palette may claim it first), so only the browser's
/// own close is suppressed.
fn on_dialog_cancel(_host: &Rc<Host>, event: Event) {
    event.prevent_default();
}

fn on_visibility(host: &Rc<Host>, _event: Event) {
    host.set_hidden(host.document().visibility_state() == VisibilityState::Hidden);
}

fn on_resize(host: &Rc<Host>, _event: Event) {
    host.resize();
}

fn on_motion_change(host: &Rc<Host>, event: Event) {
    if let Some(query) = event
        .current_target()
        .and_then(|t| t.dyn_into::<MediaQueryList>().ok())
    {
        host.send(AppMsg::SetReducedMotion(query.matches()));
    }
}

/// Attach every listener the page needs.
pub(crate) fn install(host: &Rc<Host>, dialog: Option<&Element>) -> HostResult<Vec<Listener>> {
    let document: &EventTarget = host.document().as_ref();
    let window: &EventTarget = host.window().as_ref();
    let mut listeners = vec![
        on(host, document, "click", on_click)?,
        on(host, document, "keydown", on_keydown)?,
        on(host, document, "input", on_input)?,
        on(host, document, "pointerover", on_pointerover)?,
        on(host, document, "pointermove", on_pointermove)?,
        on(host, document, "pointerout", on_pointerout)?,
        on(host, document, "visibilitychange", on_visibility)?,
        on(host, window, "resize", on_resize)?,
    ];
    if let Some(dialog) = dialog {
        listeners.push(on(host, dialog.as_ref(), "cancel", on_dialog_cancel)?);
    }
    if let Some(query) = host.reduced_motion_query() {
        listeners.push(on(host, query.as_ref(), "change", on_motion_change)?);
    }
    Ok(listeners)
}
