#![forbid(unsafe_code)]

//! Tab focus cycling for dialogs without native modal support.
//!
//! The host collects the dialog's focusable elements in document order and
//! asks [`FocusTrap::next`] where Tab should land. Focus never leaves the
//! dialog: moving past either end wraps around.

use folio_core::event::KeyCode;

/// Selector for elements that can take keyboard focus inside a dialog.
pub const FOCUSABLE_SELECTOR: &str = "a[href], button:not([disabled]), input:not([disabled]), \
     select:not([disabled]), textarea:not([disabled]), [tabindex]:not([tabindex=\"-1\"])";

/// Direction of a focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    Forward,
    Backward,
}

impl FocusMove {
    /// Tab moves forward, Shift+Tab backward; other keys are not trapped.
    #[must_use]
    pub fn from_key(code: &KeyCode) -> Option<Self> {
        match code {
            KeyCode::Tab => Some(Self::Forward),
            KeyCode::BackTab => Some(Self::Backward),
            _ => None,
        }
    }
}

/// Focus cycling over `count` focusable elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTrap {
    count: usize,
}

impl FocusTrap {
    #[must_use]
    pub const fn new(count: usize) -> Self {
        Self { count }
    }

    /// Index to focus after moving from `current`.
    ///
    /// `current` is `None` when focus sits outside the dialog; the move then
    /// enters at the first (forward) or last (backward) element. Returns
    /// `None` only when the dialog has nothing focusable.
    #[must_use]
    pub fn next(&self, current: Option<usize>, dir: FocusMove) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let last = self.count - 1;
        let next = match (current.filter(|&i| i <= last), dir) {
            (None, FocusMove::Forward) => 0,
            (None, FocusMove::Backward) => last,
            (Some(i), FocusMove::Forward) if i == last => 0,
            (Some(i), FocusMove::Forward) => i + 1,
            (Some(0), FocusMove::Backward) => last,
            (Some(i), FocusMove::Backward) => i - 1,
        };
        Some(next)
    }
}
