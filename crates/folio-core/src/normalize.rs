#![forbid(unsafe_code)]

//! Search-text normalization for the command palette.
//!
//! `normalize_search` folds text so that a plain ASCII query matches
//! accented content ("avaliacao" finds "Avaliação"):
//! 1. canonical decomposition (NFD),
//! 2. combining marks removed,
//! 3. lowercase,
//! 4. whitespace runs collapsed to one space, ends trimmed.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold `input` into its searchable form.
#[must_use]
pub fn normalize_search(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;
    for ch in input.nfd().filter(|c| !is_combining_mark(*c)) {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// Build a haystack from several fields, normalized as one string.
#[must_use]
pub fn haystack<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let joined = parts.into_iter().collect::<Vec<_>>().join(" ");
    normalize_search(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_diacritics() {
        assert_eq!(normalize_search("Avaliação"), "avaliacao");
        assert_eq!(normalize_search("Ingeniería"), "ingenieria");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize_search("  Data \t\n Pipelines  "), "data pipelines");
        assert_eq!(normalize_search("   "), "");
    }

    #[test]
    fn haystack_joins_fields() {
        assert_eq!(
            haystack(["Projetos", "Seção", "projects"]),
            "projetos secao projects"
        );
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(s in "[a-zA-Zà-ÿÀ-ß0-9 \t]{0,40}") {
            let once = normalize_search(&s);
            prop_assert_eq!(normalize_search(&once), once.clone());
        }

        #[test]
        fn output_has_no_edge_or_double_spaces(s in "[a-zA-Zà-ÿ \t]{0,40}") {
            let out = normalize_search(&s);
            prop_assert!(!out.starts_with(' '));
            prop_assert!(!out.ends_with(' '));
            prop_assert!(!out.contains("  "));
        }
    }
}
