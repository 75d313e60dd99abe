#![forbid(unsafe_code)]

//! Platform capabilities, probed once at startup.
//!
//! Each optional browser API has a fallback; the providers are chosen from
//! this set and never re-probed.

use bitflags::bitflags;

bitflags! {
    /// Optional browser APIs available on this page.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// `HTMLDialogElement.showModal`.
        const DIALOG                = 0b0000_0001;
        /// `document.startViewTransition`.
        const VIEW_TRANSITION       = 0b0000_0010;
        /// `IntersectionObserver`.
        const INTERSECTION_OBSERVER = 0b0000_0100;
        /// `navigator.clipboard.writeText`.
        const CLIPBOARD             = 0b0000_1000;
        /// `localStorage` reads and writes succeed.
        const STORAGE               = 0b0001_0000;
    }
}

/// How the project dialog is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogStrategy {
    /// `showModal()` / `close()`.
    Native,
    /// Attribute and class toggling plus a manual focus trap.
    Polyfill,
}

/// How a language switch is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStrategy {
    ViewTransition,
    Immediate,
}

impl Capabilities {
    #[must_use]
    pub fn dialog_strategy(self) -> DialogStrategy {
        if self.contains(Self::DIALOG) {
            DialogStrategy::Native
        } else {
            DialogStrategy::Polyfill
        }
    }

    /// View transitions are skipped under reduced motion.
    #[must_use]
    pub fn transition_strategy(self, reduced_motion: bool) -> TransitionStrategy {
        if self.contains(Self::VIEW_TRANSITION) && !reduced_motion {
            TransitionStrategy::ViewTransition
        } else {
            TransitionStrategy::Immediate
        }
    }

    /// Whether `data-reveal` elements must be shown up front.
    #[must_use]
    pub fn reveal_immediately(self) -> bool {
        !self.contains(Self::INTERSECTION_OBSERVER)
    }

    /// Names of the present capabilities, for the startup log line.
    #[must_use]
    pub fn describe(self) -> String {
        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(",").to_ascii_lowercase()
        }
    }
}
