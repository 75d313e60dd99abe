#![forbid(unsafe_code)]

//! Page regions that need re-rendering after an update.

use bitflags::bitflags;

bitflags! {
    /// Regions touched since the last presented frame.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Dirty: u16 {
        /// Footer year, set once at startup.
        const YEAR             = 1 << 0;
        /// `data-theme` and the toggle button.
        const THEME            = 1 << 1;
        /// Fallback message after a failed load.
        const LOAD_ERROR       = 1 << 2;
        /// Language chrome plus every content section.
        const LANG             = 1 << 3;
        /// Toolbox buttons, status, and card classes.
        const TOOLBOX          = 1 << 4;
        /// Palette visibility and result list.
        const PALETTE          = 1 << 5;
        /// Palette active row only.
        const PALETTE_ACTIVE   = 1 << 6;
        /// Move focus into the palette input.
        const PALETTE_FOCUS    = 1 << 7;
        /// Project modal body.
        const MODAL            = 1 << 8;
        /// Lab button state and detail panel.
        const LAB_ACTIVE       = 1 << 9;
    }
}

impl Dirty {
    /// Everything that depends on the active language.
    pub const CONTENT: Self = Self::LANG
        .union(Self::THEME)
        .union(Self::TOOLBOX)
        .union(Self::PALETTE)
        .union(Self::MODAL)
        .union(Self::LAB_ACTIVE);
}
