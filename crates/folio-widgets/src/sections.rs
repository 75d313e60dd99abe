#![forbid(unsafe_code)]

//! Content section renderers.
//!
//! Each renderer fully replaces the children of one container, so calling it
//! again with the same content yields the same subtree. Absent fields render
//! as empty containers; list order follows the document.

use folio_core::content::{Certification, Education, Experience, Project, QuickLink};
use folio_render::{Element, Frame, Node, el};

use crate::{RenderCtx, Widget, label};

/// Paragraphs of the About section.
#[derive(Debug, Clone, Copy, Default)]
pub struct About;

/// Hero focus chips.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusChips;

/// Hero "what I build" bullets.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildBullets;

/// Hero delivery pipeline steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline;

/// Hero featured project shortcuts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Featured;

/// Skill group cards.
#[derive(Debug, Clone, Copy, Default)]
pub struct Skills;

/// Project cards.
#[derive(Debug, Clone, Copy, Default)]
pub struct Projects;

/// Experience timeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExperienceList;

/// Education entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct EducationList;

/// Certification entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct Certifications;

/// Footer quick links.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickLinks;

/// Attribute carried by project cards in the projects grid.
pub const PROJECT_ID_ATTR: &str = "data-project-id";

/// Attribute carried by featured shortcuts in the hero.
pub const FEATURED_ID_ATTR: &str = "data-featured-id";

/// Render every content section, in page order.
pub fn render_all(ctx: &RenderCtx<'_>, frame: &mut Frame) {
    About.render(ctx, frame);
    FocusChips.render(ctx, frame);
    BuildBullets.render(ctx, frame);
    Pipeline.render(ctx, frame);
    Featured.render(ctx, frame);
    Skills.render(ctx, frame);
    Projects.render(ctx, frame);
    ExperienceList.render(ctx, frame);
    EducationList.render(ctx, frame);
    Certifications.render(ctx, frame);
    QuickLinks.render(ctx, frame);
}

fn items(list: &[String], class: Option<&str>) -> Vec<Node> {
    list.iter()
        .map(|t| {
            let li = el("li").text(t.as_str());
            match class {
                Some(c) => li.class(c).into(),
                None => li.into(),
            }
        })
        .collect()
}

fn pill_row(tag: &str, class: &str, tags: &[String]) -> Element {
    el(tag)
        .class(class)
        .children(tags.iter().map(|t| el("span").class("pilltag").text(t.as_str())))
}

fn external_link(href: &str, text: &str) -> Element {
    el("a")
        .attr("href", href)
        .attr("target", "_blank")
        .attr("rel", "noreferrer")
        .text(text)
}

impl Widget for About {
    fn container(&self) -> &'static str {
        "about-content"
    }

    fn build(&self, ctx: &RenderCtx<'_>) -> Vec<Node> {
        ctx.content
            .about
            .iter()
            .map(|p| el("p").text(p.as_str()).into())
            .collect()
    }
}

impl Widget for FocusChips {
    fn container(&self) -> &'static str {
        "focus-chips"
    }

    fn build(&self, ctx: &RenderCtx<'_>) -> Vec<Node> {
        items(&ctx.content.hero.focus, Some("chip"))
    }
}

impl Widget for BuildBullets {
    fn container(&self) -> &'static str {
        "build-bullets"
    }

    fn build(&self, ctx: &RenderCtx<'_>) -> Vec<Node> {
        items(&ctx.content.hero.build, None)
    }
}

impl Widget for Pipeline {
    fn container(&self) -> &'static str {
        "hero-pipeline"
    }

    fn build(&self, ctx: &RenderCtx<'_>) -> Vec<Node> {
        ctx.content
            .hero
            .pipeline
            .iter()
            .enumerate()
            .map(|(i, step)| {
                el("li")
                    .class("pipe-step")
                    .child(el("span").class("pipe-index").text(format!("{:02}", i + 1)))
                    .child(el("span").class("pipe-label").text(step.label.as_str()))
                    .child(el("span").class("pipe-detail").text(step.detail.as_str()))
                    .into()
            })
            .collect()
    }
}

impl Widget for Featured {
    fn container(&self) -> &'static str {
        "hero-featured"
    }

    fn build(&self, ctx: &RenderCtx<'_>) -> Vec<Node> {
        ctx.content
            .featured_projects()
            .map(|p| {
                el("li")
                    .child(
                        el("button")
                            .class("featured")
                            .attr("type", "button")
                            .attr(FEATURED_ID_ATTR, p.id.as_str())
                            .child(el("strong").text(p.title.as_str()))
                            .child(el("span").class("muted").text(p.subtitle.as_str())),
                    )
                    .into()
            })
            .collect()
    }
}

impl Widget for Skills {
    fn container(&self) -> &'static str {
        "skills-grid"
    }

    fn build(&self, ctx: &RenderCtx<'_>) -> Vec<Node> {
        ctx.content
            .skills
            .iter()
            .map(|group| {
                el("div")
                    .class("card")
                    .child(el("h3").text(group.group.as_str()))
                    .child(
                        el("ul")
                            .class("skill-items")
                            .children(items(&group.items, Some("pilltag"))),
                    )
                    .into()
            })
            .collect()
    }
}

impl Widget for Projects {
    fn container(&self) -> &'static str {
        "projects-grid"
    }

    fn build(&self, ctx: &RenderCtx<'_>) -> Vec<Node> {
        ctx.content
            .projects
            .iter()
            .map(|p| project_card(ctx, p).into())
            .collect()
    }
}

/// One project card. Carries [`PROJECT_ID_ATTR`] for modal lookup and
/// toolbox highlighting.
#[must_use]
pub fn project_card(ctx: &RenderCtx<'_>, p: &Project) -> Element {
    let image = p
        .image
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(ctx.config.fallback_image.as_str());

    let top = el("div")
        .class("project-top")
        .child(
            el("div")
                .child(el("h3").text(p.title.as_str()))
                .child(el("p").class("project-subtitle").text(p.subtitle.as_str())),
        )
        .child(
            el("img")
                .class("project-ill")
                .attr("alt", "")
                .attr("loading", "lazy")
                .attr("src", image),
        );

    let foot = el("div")
        .class("project-foot")
        .child(project_links(ctx, p))
        .child(el("div").class("disclaimer").text(p.disclaimer.as_str()));

    el("article")
        .class("card")
        .class("project-card")
        .attr(PROJECT_ID_ATTR, p.id.as_str())
        .attr("tabindex", "0")
        .child(top)
        .child(el("ul").class("highlights").children(items(&p.highlights, None)))
        .child(pill_row("div", "stack", &p.stack))
        .child(foot)
}

/// Repo/demo/writeup links; unresolvable ones are omitted.
#[must_use]
pub fn project_links(ctx: &RenderCtx<'_>, p: &Project) -> Element {
    let labels = &ctx.content.labels;
    let candidates = [
        (p.links.repo.as_deref(), label(&labels.repo, "Repo")),
        (p.links.demo.as_deref(), label(&labels.demo, "Demo")),
        (p.links.writeup.as_deref(), label(&labels.writeup, "Writeup")),
    ];
    el("div").class("links").children(
        candidates
            .into_iter()
            .filter_map(|(href, text)| ctx.links.safe(href).map(|h| external_link(h, text))),
    )
}

fn experience_item(e: &Experience) -> Node {
    el("div")
        .class("titem")
        .child(el("div").class("twhen").text(e.when.as_str()))
        .child(
            el("div")
                .class("tmain")
                .child(el("h3").text(e.title.as_str()))
                .child(el("p").class("torg").text(e.org.as_str()))
                .child(el("ul").class("tbullets").children(items(&e.bullets, None))),
        )
        .into()
}

impl Widget for ExperienceList {
    fn container(&self) -> &'static str {
        "experience-list"
    }

    fn build(&self, ctx: &RenderCtx<'_>) -> Vec<Node> {
        ctx.content.experience.iter().map(experience_item).collect()
    }
}

/// `org` followed by ` · year` when a year is present.
#[must_use]
pub fn education_line(ed: &Education) -> String {
    match ed.year.as_deref().map(str::trim).filter(|y| !y.is_empty()) {
        Some(year) => format!("{} · {year}", ed.org),
        None => ed.org.clone(),
    }
}

impl Widget for EducationList {
    fn container(&self) -> &'static str {
        "education-list"
    }

    fn build(&self, ctx: &RenderCtx<'_>) -> Vec<Node> {
        ctx.content
            .education
            .iter()
            .map(|ed| {
                let mut card = el("div")
                    .class("edu")
                    .child(el("h3").text(ed.title.as_str()))
                    .child(el("p").text(education_line(ed)));
                if let Some(note) = ed.note.as_deref().filter(|n| !n.is_empty()) {
                    card = card.child(el("p").class("muted").class("tiny").text(note));
                }
                card.into()
            })
            .collect()
    }
}

fn certification_item(ctx: &RenderCtx<'_>, c: &Certification) -> Node {
    let title = match ctx.links.safe(c.href.as_deref()) {
        Some(href) => external_link(href, &c.title),
        None => el("span").text(c.title.as_str()),
    };
    let issuer = match c.year.as_deref().filter(|y| !y.is_empty()) {
        Some(year) => format!("{} · {year}", c.issuer),
        None => c.issuer.clone(),
    };
    el("li")
        .class("cert")
        .child(el("h3").child(title))
        .child(el("p").class("muted").class("tiny").text(issuer))
        .into()
}

impl Widget for Certifications {
    fn container(&self) -> &'static str {
        "certifications-list"
    }

    fn build(&self, ctx: &RenderCtx<'_>) -> Vec<Node> {
        ctx.content
            .certifications
            .iter()
            .map(|c| certification_item(ctx, c))
            .collect()
    }
}

fn quick_link(ctx: &RenderCtx<'_>, l: &QuickLink) -> Node {
    let href = ctx.links.safe(l.href.as_deref()).unwrap_or("#");
    let mut a = el("a").attr("href", href);
    if l.external {
        a = a.attr("target", "_blank").attr("rel", "noreferrer");
    }
    el("li").child(a.text(l.label.as_str())).into()
}

impl Widget for QuickLinks {
    fn container(&self) -> &'static str {
        "quick-links"
    }

    fn build(&self, ctx: &RenderCtx<'_>) -> Vec<Node> {
        ctx.content
            .quick_links
            .iter()
            .map(|l| quick_link(ctx, l))
            .collect()
    }
}
