#![forbid(unsafe_code)]

//! Normalized keyboard input.
//!
//! The web host hands over DOM `KeyboardEvent.key` strings plus modifier
//! flags; this module maps them onto a small [`KeyCode`] set so that the
//! palette and modal state machines never see raw DOM strings.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

impl Modifiers {
    /// Build from DOM event flags.
    #[must_use]
    pub fn from_dom(shift: bool, alt: bool, ctrl: bool, meta: bool) -> Self {
        let mut mods = Self::empty();
        mods.set(Self::SHIFT, shift);
        mods.set(Self::ALT, alt);
        mods.set(Self::CTRL, ctrl);
        mods.set(Self::SUPER, meta);
        mods
    }

    /// Ctrl on most platforms, Cmd on macOS.
    #[must_use]
    pub const fn has_command(self) -> bool {
        self.intersects(Self::CTRL.union(Self::SUPER))
    }

    /// Whether a click with these modifiers extends a selection instead of
    /// replacing it.
    #[must_use]
    pub const fn is_additive(self) -> bool {
        self.intersects(Self::CTRL.union(Self::SUPER).union(Self::SHIFT))
    }
}

/// Normalized key code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    BackTab,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    Unidentified(Box<str>),
}

/// A key press with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub code: KeyCode,
    pub mods: Modifiers,
}

impl KeyInput {
    #[must_use]
    pub fn new(code: KeyCode, mods: Modifiers) -> Self {
        Self { code, mods }
    }

    /// Plain key press without modifiers.
    #[must_use]
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    /// Normalize a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str, mods: Modifiers) -> Self {
        Self::new(normalize_dom_key(key, mods), mods)
    }

    /// Command+K / Ctrl+K, the palette toggle shortcut.
    #[must_use]
    pub fn is_palette_shortcut(&self) -> bool {
        self.mods.has_command() && matches!(self.code, KeyCode::Char('k' | 'K'))
    }
}

/// Map a DOM `key` string to a [`KeyCode`].
#[must_use]
pub fn normalize_dom_key(key: &str, mods: Modifiers) -> KeyCode {
    match key {
        "Enter" => KeyCode::Enter,
        "Escape" | "Esc" => KeyCode::Escape,
        "Backspace" => KeyCode::Backspace,
        "Tab" if mods.contains(Modifiers::SHIFT) => KeyCode::BackTab,
        "Tab" => KeyCode::Tab,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "ArrowUp" | "Up" => KeyCode::Up,
        "ArrowDown" | "Down" => KeyCode::Down,
        "ArrowLeft" | "Left" => KeyCode::Left,
        "ArrowRight" | "Right" => KeyCode::Right,
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => KeyCode::Char(ch),
                _ => KeyCode::Unidentified(key.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_dom_key_specials() {
        let none = Modifiers::empty();
        assert_eq!(normalize_dom_key("ArrowDown", none), KeyCode::Down);
        assert_eq!(normalize_dom_key("Esc", none), KeyCode::Escape);
        assert_eq!(normalize_dom_key("k", none), KeyCode::Char('k'));
        assert_eq!(
            normalize_dom_key("Dead", none),
            KeyCode::Unidentified("Dead".into())
        );
    }

    #[test]
    fn shift_tab_is_backtab() {
        assert_eq!(normalize_dom_key("Tab", Modifiers::SHIFT), KeyCode::BackTab);
    }

    #[test]
    fn palette_shortcut_needs_command_modifier() {
        let ctrl_k = KeyInput::from_dom("k", Modifiers::from_dom(false, false, true, false));
        let cmd_k = KeyInput::from_dom("K", Modifiers::from_dom(true, false, false, true));
        let plain_k = KeyInput::from_dom("k", Modifiers::empty());
        let alt_k = KeyInput::from_dom("k", Modifiers::ALT);
        assert!(ctrl_k.is_palette_shortcut());
        assert!(cmd_k.is_palette_shortcut());
        assert!(!plain_k.is_palette_shortcut());
        assert!(!alt_k.is_palette_shortcut());
    }

    #[test]
    fn additive_modifiers() {
        assert!(Modifiers::SHIFT.is_additive());
        assert!(Modifiers::SUPER.is_additive());
        assert!(!Modifiers::ALT.is_additive());
        assert!(!Modifiers::empty().is_additive());
    }
}
