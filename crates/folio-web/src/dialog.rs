#![forbid(unsafe_code)]

//! Dialog providers.
//!
//! The project dialog is shown through a [`DialogProvider`] picked once from
//! the platform capabilities. Browsers with `showModal` get the native
//! provider (wasm only); others get [`PolyfillDialog`], which toggles the
//! `open` attribute and `is-open` class, reveals `#modal-backdrop`, and traps
//! Tab focus inside the dialog itself.

use folio_render::{DomMirror, Frame, Patch, Target};
use folio_widgets::focus_trap::{FocusMove, FocusTrap};
use folio_widgets::project_modal::BACKDROP_ID;

use crate::error::HostResult;

/// Anything that applies patch frames: the live DOM or a [`DomMirror`].
pub trait PatchSink {
    fn apply_frame(&mut self, frame: &Frame) -> HostResult<()>;
}

/// Apply every patch in `frame` with `apply`, logging and skipping the ones
/// that fail so one bad selector cannot drop the rest of the frame. Returns
/// the first failure.
pub fn apply_each(
    frame: &Frame,
    mut apply: impl FnMut(&Patch) -> HostResult<()>,
) -> HostResult<()> {
    let mut first = None;
    for patch in frame.iter() {
        if let Err(err) = apply(patch) {
            folio_core::warn!(
                error = %err,
                selector = ?patch.target().map(Target::selector),
                "patch skipped"
            );
            first.get_or_insert(err);
        }
    }
    first.map_or(Ok(()), Err)
}

impl PatchSink for DomMirror {
    fn apply_frame(&mut self, frame: &Frame) -> HostResult<()> {
        self.apply(frame);
        Ok(())
    }
}

/// Shows and hides a modal dialog by element id.
pub trait DialogProvider {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    fn show(&mut self, id: &str) -> HostResult<()>;

    fn close(&mut self, id: &str) -> HostResult<()>;

    /// Where Tab should move focus among the open dialog's `count`
    /// focusable elements. `None` leaves the key to the browser.
    fn trap_focus(&self, _current: Option<usize>, _count: usize, _dir: FocusMove) -> Option<usize> {
        None
    }
}

/// Patches that make dialog `id` appear (`open`) or disappear.
#[must_use]
pub fn polyfill_frame(id: &str, open: bool) -> Frame {
    let dialog = Target::id(id);
    let backdrop = Target::id(BACKDROP_ID);
    let mut frame = Frame::new();
    frame.push(if open {
        Patch::set_attr(dialog.clone(), "open", "")
    } else {
        Patch::remove_attr(dialog.clone(), "open")
    });
    frame.push(Patch::set_class(dialog, "is-open", open));
    frame.push(if open {
        Patch::remove_attr(backdrop.clone(), "hidden")
    } else {
        Patch::set_attr(backdrop.clone(), "hidden", "")
    });
    frame.push(Patch::set_class(backdrop, "is-open", open));
    frame
}

/// Dialog emulation for browsers without `showModal`.
#[derive(Debug)]
pub struct PolyfillDialog<S: PatchSink> {
    sink: S,
    open: Option<String>,
}

impl<S: PatchSink> PolyfillDialog<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, open: None }
    }

    /// Id of the dialog currently shown.
    #[must_use]
    pub fn open_id(&self) -> Option<&str> {
        self.open.as_deref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: PatchSink> DialogProvider for PolyfillDialog<S> {
    fn name(&self) -> &'static str {
        "polyfill"
    }

    fn show(&mut self, id: &str) -> HostResult<()> {
        self.sink.apply_frame(&polyfill_frame(id, true))?;
        self.open = Some(id.to_string());
        Ok(())
    }

    fn close(&mut self, id: &str) -> HostResult<()> {
        self.sink.apply_frame(&polyfill_frame(id, false))?;
        if self.open.as_deref() == Some(id) {
            self.open = None;
        }
        Ok(())
    }

    fn trap_focus(&self, current: Option<usize>, count: usize, dir: FocusMove) -> Option<usize> {
        self.open.as_ref()?;
        FocusTrap::new(count).next(current, dir)
    }
}
