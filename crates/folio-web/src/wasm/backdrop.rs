#![forbid(unsafe_code)]

//! `requestAnimationFrame` loop for the particle backdrop.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::{Rc, Weak};

use folio_core::{FolioConfig, Theme};
use folio_widgets::backdrop::ParticleField;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use super::js_error;
use crate::error::{HostError, HostResult};
use crate::motion::{AnimationGate, LoopAction, backing_size, frame_steps};
use crate::paint::{DrawOp, paint};

/// Id of the backdrop canvas in the shell.
pub(crate) const CANVAS_ID: &str = "bg-canvas";

struct LoopState {
    field: ParticleField,
    gate: AnimationGate,
    theme: Theme,
    dpr: f64,
    last_ms: Option<f64>,
    handle: Option<i32>,
}

pub(crate) struct Backdrop {
    window: Window,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    state: RefCell<LoopState>,
    tick: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl Backdrop {
    /// Set up the backdrop, or `None` when the shell has no canvas.
    pub(crate) fn start(
        window: &Window,
        document: &Document,
        config: &FolioConfig,
        theme: Theme,
        gate: AnimationGate,
    ) -> HostResult<Option<Rc<Self>>> {
        let Some(canvas) = document.get_element_by_id(CANVAS_ID) else {
            return Ok(None);
        };
        let canvas: HtmlCanvasElement = canvas
            .dyn_into()
            .map_err(|_| HostError::MissingElement(format!("canvas#{CANVAS_ID}")))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| HostError::Js("2d context unavailable".into()))?
            .dyn_into()
            .map_err(js_error)?;

        let seed = (js_sys::Math::random() * f64::from(u32::MAX)) as u32;
        let (width, height) = css_size(window);
        let field = ParticleField::new(
            seed,
            config.particle_count,
            width,
            height,
            config.link_distance,
        );
        let backdrop = Rc::new(Self {
            window: window.clone(),
            canvas,
            ctx,
            state: RefCell::new(LoopState {
                field,
                gate,
                theme,
                dpr: 1.0,
                last_ms: None,
                handle: None,
            }),
            tick: RefCell::new(None),
        });

        let weak: Weak<Self> = Rc::downgrade(&backdrop);
        *backdrop.tick.borrow_mut() = Some(Closure::new(move |now: f64| {
            if let Some(backdrop) = weak.upgrade() {
                backdrop.frame(now);
            }
        }));
        backdrop.resize();
        backdrop.apply_gate();
        Ok(Some(backdrop))
    }

    fn schedule(&self) {
        let tick = self.tick.borrow();
        let Some(tick) = tick.as_ref() else {
            return;
        };
        match self
            .window
            .request_animation_frame(tick.as_ref().unchecked_ref())
        {
            Ok(handle) => self.state.borrow_mut().handle = Some(handle),
            Err(err) => {
                folio_core::warn!(error = %super::describe(&err), "requestAnimationFrame failed");
            }
        }
    }

    fn cancel(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(handle) = state.handle.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
        state.last_ms = None;
    }

    fn frame(&self, now_ms: f64) {
        {
            let mut state = self.state.borrow_mut();
            state.handle = None;
            if state.gate.action() != LoopAction::Run {
                return;
            }
            let dt = frame_steps(state.last_ms, now_ms);
            state.last_ms = Some(now_ms);
            state.field.step(dt);
        }
        self.draw();
        self.schedule();
    }

    fn draw(&self) {
        let state = self.state.borrow();
        let ctx = &self.ctx;
        if let Err(err) = ctx.set_transform(state.dpr, 0.0, 0.0, state.dpr, 0.0, 0.0) {
            folio_core::debug!(error = %super::describe(&err), "canvas transform rejected");
        }
        for op in paint(&state.field, state.theme) {
            match op {
                DrawOp::Clear { width, height } => ctx.clear_rect(0.0, 0.0, width, height),
                DrawOp::Line { from, to, style } => {
                    ctx.set_stroke_style_str(&style);
                    ctx.begin_path();
                    ctx.move_to(from.0, from.1);
                    ctx.line_to(to.0, to.1);
                    ctx.stroke();
                }
                DrawOp::Dot { at, radius, style } => {
                    ctx.set_fill_style_str(&style);
                    ctx.begin_path();
                    if ctx.arc(at.0, at.1, radius, 0.0, TAU).is_ok() {
                        ctx.fill();
                    }
                }
            }
        }
    }

    /// Start, pause, or freeze the loop according to the gate.
    fn apply_gate(&self) {
        let action = self.state.borrow().gate.action();
        match action {
            LoopAction::Run => {
                if self.state.borrow().handle.is_none() {
                    self.schedule();
                }
            }
            LoopAction::Pause => self.cancel(),
            LoopAction::Still => {
                self.cancel();
                self.draw();
            }
        }
    }

    pub(crate) fn set_hidden(&self, hidden: bool) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let changed = state.gate.hidden != hidden;
            state.gate.hidden = hidden;
            changed
        };
        if changed {
            folio_core::debug!(hidden, "backdrop visibility");
            self.apply_gate();
        }
    }

    /// Follow the page theme and motion preference.
    pub(crate) fn sync(&self, theme: Theme, reduced_motion: bool) {
        let (theme_changed, motion_changed) = {
            let mut state = self.state.borrow_mut();
            let t = state.theme != theme;
            let m = state.gate.reduced_motion != reduced_motion;
            state.theme = theme;
            state.gate.reduced_motion = reduced_motion;
            (t, m)
        };
        if motion_changed {
            self.apply_gate();
        } else if theme_changed && self.state.borrow().handle.is_none() {
            self.draw();
        }
    }

    /// Match the canvas backing store to the viewport.
    pub(crate) fn resize(&self) {
        let (width, height) = css_size(&self.window);
        let dpr = self.window.device_pixel_ratio();
        let (bw, bh) = backing_size(width, height, dpr);
        self.canvas.set_width(bw);
        self.canvas.set_height(bh);
        {
            let mut state = self.state.borrow_mut();
            state.dpr = f64::from(bw) / width.max(1.0);
            state.field.resize(width, height);
        }
        if self.state.borrow().handle.is_none() {
            self.draw();
        }
    }

    /// Stop the loop and release the frame callback.
    pub(crate) fn stop(&self) {
        self.cancel();
        self.tick.borrow_mut().take();
    }
}

fn css_size(window: &Window) -> (f64, f64) {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    (dim(window.inner_width()), dim(window.inner_height()))
}
