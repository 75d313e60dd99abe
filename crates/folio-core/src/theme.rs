#![forbid(unsafe_code)]

//! Light/dark theme selection.

use std::fmt;

/// Color scheme applied as `<html data-theme="..">`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Attribute/storage value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored value. Anything but `"light"`/`"dark"` is rejected.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Pick the initial theme.
    ///
    /// A valid stored value wins and `prefers_dark` is never called. Only
    /// without one is the system preference consulted.
    pub fn resolve_initial(stored: Option<&str>, prefers_dark: impl FnOnce() -> bool) -> Self {
        if let Some(theme) = stored.and_then(Self::parse) {
            return theme;
        }
        if prefers_dark() { Self::Dark } else { Self::Light }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
