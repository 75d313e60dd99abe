#![forbid(unsafe_code)]

//! Page chrome: document metadata, `data-i18n` text, profile links,
//! language buttons, and the theme toggle.
//!
//! Unlike the section widgets these never replace container children. They
//! only touch text and attributes of elements the shell already has, and a
//! value missing from the document leaves its element untouched.

use folio_core::Theme;
use folio_core::content::LocalizedContent;
use folio_render::{Frame, Patch, Target};

use crate::{RenderCtx, StatefulWidget};

/// Attribute naming a language on its switch button.
pub const LANG_ATTR: &str = "data-lang";

/// Theme toggle button.
pub const THEME_TOGGLE_ID: &str = "theme-toggle";

/// Footer year.
pub const YEAR_ID: &str = "year";

/// Non-empty trimmed text.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Language-dependent chrome for one `set_lang` pass.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    lang: &'a str,
    languages: &'a [String],
    i18n_keys: &'a [String],
    placeholder_keys: &'a [String],
}

impl<'a> Page<'a> {
    /// `languages` are the codes offered by switch buttons; the key lists
    /// are the distinct `data-i18n` / `data-i18n-placeholder` values found
    /// in the shell.
    #[must_use]
    pub fn new(
        lang: &'a str,
        languages: &'a [String],
        i18n_keys: &'a [String],
        placeholder_keys: &'a [String],
    ) -> Self {
        Self {
            lang,
            languages,
            i18n_keys,
            placeholder_keys,
        }
    }

    /// `<html lang>` and the active language button.
    pub fn render_lang(&self, frame: &mut Frame) {
        frame.push(Patch::set_attr(Target::Root, "lang", self.lang));
        for code in self.languages {
            let on = code == self.lang;
            let target = Target::data(LANG_ATTR, code.as_str());
            frame.push(Patch::set_class(target.clone(), "is-active", on));
            frame.push(Patch::set_attr(target, "aria-pressed", on.to_string()));
        }
    }

    /// Title, description, and Open Graph tags.
    pub fn render_meta(content: &LocalizedContent, frame: &mut Frame) {
        let meta = &content.meta;
        if let Some(title) = present(meta.title.as_deref()) {
            frame.push(Patch::SetTitle(title.to_string()));
            frame.push(Patch::set_attr(Target::Meta("og:title".into()), "content", title));
        }
        if let Some(desc) = present(meta.description.as_deref()) {
            frame.push(Patch::set_attr(Target::Meta("description".into()), "content", desc));
        }
        if let Some(og) = present(meta.og_description.as_deref()) {
            frame.push(Patch::set_attr(
                Target::Meta("og:description".into()),
                "content",
                og,
            ));
        }
    }

    /// Text for every resolvable `data-i18n` key and placeholder for every
    /// resolvable `data-i18n-placeholder` key.
    pub fn render_i18n(&self, content: &LocalizedContent, frame: &mut Frame) {
        for key in self.i18n_keys {
            if let Some(text) = content.text(key) {
                frame.push(Patch::set_text(Target::I18n(key.clone()), text));
            }
        }
        for key in self.placeholder_keys {
            if let Some(text) = content.text(key) {
                frame.push(Patch::set_attr(
                    Target::I18nPlaceholder(key.clone()),
                    "placeholder",
                    text,
                ));
            }
        }
    }

    /// Contact and call-to-action hrefs from the profile.
    pub fn render_profile_links(content: &LocalizedContent, frame: &mut Frame) {
        let profile = &content.profile;
        if let (Some(email), Some(mailto)) = (profile.email(), profile.mailto()) {
            frame.push(Patch::set_attr(Target::id("cta-email"), "href", mailto.as_str()));
            frame.push(Patch::set_attr(Target::id("contact-email"), "href", mailto));
            frame.push(Patch::set_text(Target::id("contact-email"), email));
        }
        if let Some(whatsapp) = profile.whatsapp() {
            frame.push(Patch::set_attr(Target::id("contact-phone"), "href", whatsapp));
        }
        if let Some(github) = profile.github() {
            frame.push(Patch::set_attr(Target::id("contact-github"), "href", github));
        }
        if let Some(linkedin) = profile.linkedin() {
            for id in ["cta-linkedin", "contact-linkedin"] {
                frame.push(Patch::set_attr(Target::id(id), "href", linkedin));
            }
        }
    }

    /// Everything language-dependent outside the section containers.
    pub fn render(&self, ctx: &RenderCtx<'_>, frame: &mut Frame) {
        self.render_lang(frame);
        Self::render_meta(ctx.content, frame);
        self.render_i18n(ctx.content, frame);
        Self::render_profile_links(ctx.content, frame);
    }
}

/// `data-theme` on the root plus the toggle button's pressed state and
/// label.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeToggle;

impl ThemeToggle {
    /// Theme attribute only; usable before content arrives.
    pub fn render_root(frame: &mut Frame, theme: Theme) {
        frame.push(Patch::set_attr(Target::Root, "data-theme", theme.as_str()));
        frame.push(Patch::set_attr(
            Target::id(THEME_TOGGLE_ID),
            "aria-pressed",
            theme.is_dark().to_string(),
        ));
    }
}

impl StatefulWidget for ThemeToggle {
    type State = Theme;

    fn render(&self, ctx: &RenderCtx<'_>, frame: &mut Frame, theme: &Theme) {
        Self::render_root(frame, *theme);
        if let Some(label) = present(ctx.content.theme.toggle.as_deref()) {
            let target = Target::id(THEME_TOGGLE_ID);
            frame.push(Patch::set_attr(target.clone(), "title", label));
            frame.push(Patch::set_attr(target, "aria-label", label));
        }
    }
}
