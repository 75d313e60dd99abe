#![forbid(unsafe_code)]

//! Validation of author-supplied link targets.
//!
//! A link is kept when it resolves against the page URL, the same check a
//! browser performs when constructing a `URL` with a base. Anything that
//! fails to resolve is dropped rather than rendered broken.

use url::{ParseError, Url};

/// Page URL used to resolve relative links.
///
/// Without a base, absolute links are validated on their own and relative
/// ones are accepted as long as they are not malformed absolute URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkBase {
    base: Option<Url>,
}

impl LinkBase {
    /// Parse the page location; an unparseable value behaves like no base.
    #[must_use]
    pub fn new(page_url: &str) -> Self {
        Self {
            base: Url::parse(page_url).ok(),
        }
    }

    /// Return `href` unchanged if it resolves against the base.
    ///
    /// Blank and unresolvable values yield `None`.
    #[must_use]
    pub fn safe<'a>(&self, href: Option<&'a str>) -> Option<&'a str> {
        let href = href?.trim();
        if href.is_empty() {
            return None;
        }
        let resolves = match &self.base {
            Some(base) => base.join(href).is_ok(),
            None => matches!(Url::parse(href), Ok(_) | Err(ParseError::RelativeUrlWithoutBase)),
        };
        resolves.then_some(href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_absolute_and_relative_links() {
        let base = LinkBase::new("https://example.com/portfolio/");
        assert_eq!(
            base.safe(Some("https://github.com/me/repo")),
            Some("https://github.com/me/repo")
        );
        assert_eq!(base.safe(Some("docs/writeup.html")), Some("docs/writeup.html"));
        assert_eq!(base.safe(Some("#projects")), Some("#projects"));
    }

    #[test]
    fn drops_blank_and_unresolvable_links() {
        let base = LinkBase::default();
        assert_eq!(base.safe(None), None);
        assert_eq!(base.safe(Some("   ")), None);
        assert_eq!(base.safe(Some("http://")), None);
        assert_eq!(base.safe(Some("https://exa mple.com")), None);
    }

    #[test]
    fn bad_page_url_behaves_like_no_base() {
        assert_eq!(LinkBase::new("not a url"), LinkBase::default());
    }
}
