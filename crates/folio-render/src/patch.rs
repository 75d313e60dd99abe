#![forbid(unsafe_code)]

//! Patch vocabulary between renderers and presenters.
//!
//! A [`Frame`] is an ordered batch of [`Patch`]es produced by one update.
//! Patches address elements through a [`Target`], never through live DOM
//! handles, so the same frame can be applied to the browser or to a
//! [`DomMirror`](crate::DomMirror).

use crate::node::{Element, Node};

/// How a patch locates the element(s) it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// The element with this `id`.
    Id(String),
    /// The document element (`<html>`).
    Root,
    /// Every element whose attribute `attr` equals `value`.
    Data { attr: String, value: String },
    /// Every element carrying `data-i18n="<key>"`.
    I18n(String),
    /// Every element carrying `data-i18n-placeholder="<key>"`.
    I18nPlaceholder(String),
    /// `<meta>` elements whose `name` or `property` equals the value.
    Meta(String),
}

impl Target {
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    #[must_use]
    pub fn data(attr: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Data {
            attr: attr.into(),
            value: value.into(),
        }
    }

    /// Whether `el` is addressed by this target. [`Target::Root`] never
    /// matches here; presenters resolve it to the document element.
    #[must_use]
    pub fn matches(&self, el: &Element) -> bool {
        match self {
            Self::Id(id) => el.get_attr("id") == Some(id.as_str()),
            Self::Root => false,
            Self::Data { attr, value } => el.get_attr(attr) == Some(value.as_str()),
            Self::I18n(key) => el.get_attr("data-i18n") == Some(key.as_str()),
            Self::I18nPlaceholder(key) => {
                el.get_attr("data-i18n-placeholder") == Some(key.as_str())
            }
            Self::Meta(name) => {
                el.tag == "meta"
                    && (el.get_attr("name") == Some(name.as_str())
                        || el.get_attr("property") == Some(name.as_str()))
            }
        }
    }

    /// CSS selector equivalent, used by the web presenter.
    #[must_use]
    pub fn selector(&self) -> String {
        match self {
            Self::Id(id) => format!("#{}", css_ident(id)),
            Self::Root => ":root".to_string(),
            Self::Data { attr, value } => format!("[{attr}=\"{}\"]", css_string(value)),
            Self::I18n(key) => format!("[data-i18n=\"{}\"]", css_string(key)),
            Self::I18nPlaceholder(key) => {
                format!("[data-i18n-placeholder=\"{}\"]", css_string(key))
            }
            Self::Meta(name) => format!(
                "meta[name=\"{0}\"],meta[property=\"{0}\"]",
                css_string(name)
            ),
        }
    }
}

/// Control characters, and a leading digit in an identifier, cannot be
/// backslash-escaped literally; CSS wants a hex escape ended by a space.
fn push_hex_escape(out: &mut String, c: char) {
    out.push_str(&format!("\\{:x} ", u32::from(c)));
}

fn push_escaped(out: &mut String, c: char, literal: impl Fn(char) -> bool) {
    match c {
        '\0' => out.push('\u{FFFD}'),
        c if c.is_control() && u32::from(c) < 0x80 => push_hex_escape(out, c),
        c if literal(c) => out.push(c),
        c => {
            out.push('\\');
            out.push(c);
        }
    }
}

fn css_ident(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.chars().enumerate() {
        if i == 0 && c.is_ascii_digit() {
            push_hex_escape(&mut out, c);
        } else {
            push_escaped(&mut out, c, |c| {
                c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
            });
        }
    }
    out
}

fn css_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        push_escaped(&mut out, c, |c| c != '"' && c != '\\');
    }
    out
}

/// One DOM mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Replace all children of the target.
    ReplaceChildren { target: Target, nodes: Vec<Node> },
    /// Replace the target's text content.
    SetText { target: Target, text: String },
    /// Set (`Some`) or remove (`None`) an attribute.
    SetAttr {
        target: Target,
        name: String,
        value: Option<String>,
    },
    /// Add (`on`) or remove a class.
    SetClass {
        target: Target,
        class: String,
        on: bool,
    },
    /// Set `document.title`.
    SetTitle(String),
    /// Move keyboard focus to the first matching element.
    Focus(Target),
}

impl Patch {
    #[must_use]
    pub fn replace_children(target: Target, nodes: Vec<Node>) -> Self {
        Self::ReplaceChildren { target, nodes }
    }

    #[must_use]
    pub fn set_text(target: Target, text: impl Into<String>) -> Self {
        Self::SetText {
            target,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn set_attr(target: Target, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::SetAttr {
            target,
            name: name.into(),
            value: Some(value.into()),
        }
    }

    #[must_use]
    pub fn remove_attr(target: Target, name: impl Into<String>) -> Self {
        Self::SetAttr {
            target,
            name: name.into(),
            value: None,
        }
    }

    #[must_use]
    pub fn set_class(target: Target, class: impl Into<String>, on: bool) -> Self {
        Self::SetClass {
            target,
            class: class.into(),
            on,
        }
    }

    /// The target this patch addresses, if any.
    #[must_use]
    pub fn target(&self) -> Option<&Target> {
        match self {
            Self::ReplaceChildren { target, .. }
            | Self::SetText { target, .. }
            | Self::SetAttr { target, .. }
            | Self::SetClass { target, .. }
            | Self::Focus(target) => Some(target),
            Self::SetTitle(_) => None,
        }
    }
}

/// Ordered batch of patches produced by one update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    patches: Vec<Patch>,
}

impl Frame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    /// Append every patch of `other`.
    pub fn append(&mut self, other: Frame) {
        self.patches.extend(other.patches);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Patch> {
        self.patches.iter()
    }

    #[must_use]
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }
}

impl Extend<Patch> for Frame {
    fn extend<T: IntoIterator<Item = Patch>>(&mut self, iter: T) {
        self.patches.extend(iter);
    }
}

impl FromIterator<Patch> for Frame {
    fn from_iter<T: IntoIterator<Item = Patch>>(iter: T) -> Self {
        Self {
            patches: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Frame {
    type Item = Patch;
    type IntoIter = std::vec::IntoIter<Patch>;

    fn into_iter(self) -> Self::IntoIter {
        self.patches.into_iter()
    }
}

impl<'a> IntoIterator for &'a Frame {
    type Item = &'a Patch;
    type IntoIter = std::slice::Iter<'a, Patch>;

    fn into_iter(self) -> Self::IntoIter {
        self.patches.iter()
    }
}
