#![forbid(unsafe_code)]

//! The static HTML shell the page renders into.
//!
//! The shell is authored by hand (`site/index.html`); the client only fills
//! it in. [`ShellManifest`] records what the language pass needs to know
//! about it: which `data-i18n` and `data-i18n-placeholder` keys occur, and
//! which language buttons exist. The web host scans the live document; tests
//! scan [`default_shell`], an element-tree copy of the same page.

use folio_render::{Element, el, svg};

/// Attributes the language pass reads from the shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellManifest {
    /// Distinct `data-i18n` keys, in document order.
    pub i18n_keys: Vec<String>,
    /// Distinct `data-i18n-placeholder` keys, in document order.
    pub placeholder_keys: Vec<String>,
    /// Distinct `data-lang` values on language buttons.
    pub languages: Vec<String>,
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

impl ShellManifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one element's attributes. Hosts call this per matching node.
    pub fn observe(&mut self, i18n: Option<&str>, placeholder: Option<&str>, lang: Option<&str>) {
        if let Some(key) = i18n {
            push_unique(&mut self.i18n_keys, key);
        }
        if let Some(key) = placeholder {
            push_unique(&mut self.placeholder_keys, key);
        }
        if let Some(code) = lang {
            push_unique(&mut self.languages, code);
        }
    }

    /// Scan an element tree.
    #[must_use]
    pub fn scan(root: &Element) -> Self {
        let mut manifest = Self::new();
        let mut found = Vec::new();
        root.find_all(
            &|e| {
                e.get_attr("data-i18n").is_some()
                    || e.get_attr("data-i18n-placeholder").is_some()
                    || e.get_attr("data-lang").is_some()
            },
            &mut found,
        );
        for e in found {
            manifest.observe(
                e.get_attr("data-i18n"),
                e.get_attr("data-i18n-placeholder"),
                e.get_attr("data-lang"),
            );
        }
        manifest
    }
}

// ---------------------------------------------------------------------------
// Default shell
// ---------------------------------------------------------------------------

fn section(id: &str, children: Vec<Element>) -> Element {
    el("section")
        .attr("id", id)
        .attr("data-reveal", "")
        .child(el("h2").attr("data-i18n", format!("nav.{id}")).text(id))
        .children(children)
}

fn container(tag: &str, id: &str) -> Element {
    el(tag).attr("id", id)
}

fn link(id: &str, i18n: Option<&str>) -> Element {
    el("a")
        .attr("id", id)
        .attr("href", "#")
        .attr_opt("data-i18n", i18n)
}

/// Element-tree model of `site/index.html`.
#[must_use]
pub fn default_shell() -> Element {
    let head = el("head")
        .child(el("title").text("Portfolio"))
        .child(el("meta").attr("name", "description").attr("content", ""))
        .child(el("meta").attr("property", "og:title").attr("content", ""))
        .child(el("meta").attr("property", "og:description").attr("content", ""));

    let nav = el("nav").class("topnav").children(
        [
            "about",
            "skills",
            "toolbox",
            "projects",
            "lab",
            "experience",
            "education",
            "contact",
        ]
        .into_iter()
        .map(|s| {
            el("a")
                .attr("href", format!("#{s}"))
                .attr("data-i18n", format!("nav.{s}"))
                .text(s)
        }),
    );
    let controls = el("div")
        .class("controls")
        .child(el("button").class("lang-btn").attr("data-lang", "en").text("EN"))
        .child(el("button").class("lang-btn").attr("data-lang", "pt").text("PT"))
        .child(
            el("button")
                .attr("id", "theme-toggle")
                .attr("type", "button")
                .attr("aria-pressed", "false"),
        )
        .child(
            el("button")
                .attr("id", "cmdk-open")
                .attr("type", "button")
                .text("⌘K"),
        );

    let hero = el("section")
        .attr("id", "hero")
        .child(el("h1").attr("data-i18n", "profile.name"))
        .child(el("p").attr("data-i18n", "profile.role"))
        .child(el("p").class("headline").attr("data-i18n", "hero.headline"))
        .child(el("p").class("tagline").attr("data-i18n", "hero.tagline"))
        .child(container("ul", "focus-chips"))
        .child(container("ul", "build-bullets"))
        .child(container("ol", "hero-pipeline"))
        .child(container("ul", "hero-featured"))
        .child(link("cta-email", None))
        .child(link("cta-linkedin", None));

    let main = el("main")
        .child(hero)
        .child(section("about", vec![container("div", "about-content")]))
        .child(section("skills", vec![container("div", "skills-grid")]))
        .child(section(
            "toolbox",
            vec![
                container("div", "toolbox-tags"),
                container("p", "toolbox-status"),
                el("button")
                    .attr("id", "toolbox-clear")
                    .attr("type", "button")
                    .attr("data-i18n", "labels.toolboxClear"),
            ],
        ))
        .child(section("projects", vec![container("div", "projects-grid")]))
        .child(section(
            "lab",
            vec![
                container("div", "lab-diagram"),
                container("div", "lab-detail"),
                container("ul", "lab-legend"),
            ],
        ))
        .child(section("experience", vec![container("ol", "experience-list")]))
        .child(section(
            "education",
            vec![
                container("ul", "education-list"),
                container("ul", "certifications-list"),
            ],
        ))
        .child(section(
            "contact",
            vec![
                link("contact-email", None),
                link("contact-phone", None),
                link("contact-github", None),
                link("contact-linkedin", None),
                container("ul", "quick-links"),
            ],
        ));

    let palette = el("div")
        .attr("id", "cmdk")
        .class("cmdk")
        .attr("hidden", "")
        .attr("role", "dialog")
        .child(
            el("input")
                .attr("id", "cmdk-input")
                .attr("type", "search")
                .attr("data-i18n-placeholder", "cmdk.placeholder"),
        )
        .child(el("ul").attr("id", "cmdk-list").attr("role", "listbox"))
        .child(el("p").class("cmdk-hint").attr("data-i18n", "cmdk.hint"));

    let modal = el("dialog")
        .attr("id", "project-modal")
        .attr("aria-labelledby", "project-modal-title")
        .child(
            el("button")
                .class("modal-close")
                .attr("type", "button")
                .attr("data-close-modal", "")
                .attr("data-i18n", "labels.close"),
        )
        .child(container("div", "project-modal-body"));

    let body = el("body")
        .child(el("canvas").attr("id", "bg-canvas").attr("aria-hidden", "true"))
        .child(el("header").child(nav).child(controls))
        .child(main)
        .child(
            el("footer")
                .child(el("span").attr("id", "year"))
                .child(svg("svg").class("footer-mark").attr("aria-hidden", "true")),
        )
        .child(palette)
        .child(modal)
        .child(el("div").attr("id", "modal-backdrop").attr("hidden", ""));

    el("html").attr("lang", "en").child(head).child(body)
}
