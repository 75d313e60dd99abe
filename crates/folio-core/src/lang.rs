#![forbid(unsafe_code)]

//! Default language detection.
//!
//! The page ships English and Portuguese. A browser locale starting with
//! `pt` (any region, any case) selects Portuguese; everything else English.

/// English language code.
pub const EN: &str = "en";

/// Portuguese language code.
pub const PT: &str = "pt";

/// Default language for a browser locale string (`navigator.language`).
#[must_use]
pub fn default_lang(browser_locale: &str) -> &'static str {
    let locale = browser_locale.trim();
    let is_pt = locale
        .get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(PT));
    if is_pt { PT } else { EN }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portuguese_locales() {
        assert_eq!(default_lang("pt-BR"), PT);
        assert_eq!(default_lang("PT"), PT);
        assert_eq!(default_lang("pt_PT.UTF-8"), PT);
    }

    #[test]
    fn everything_else_is_english() {
        assert_eq!(default_lang("en-US"), EN);
        assert_eq!(default_lang("es"), EN);
        assert_eq!(default_lang(""), EN);
        assert_eq!(default_lang("p"), EN);
        assert_eq!(default_lang("ñx"), EN);
    }
}
