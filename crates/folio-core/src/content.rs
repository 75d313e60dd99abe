#![forbid(unsafe_code)]

//! Strongly typed schema for `content.json`.
//!
//! The document is a JSON object keyed by language code (`"en"`, `"pt"`),
//! each value a [`LocalizedContent`]. Decoding is deliberately forgiving:
//!
//! - an absent field takes its `Default`,
//! - a field of the wrong type is treated as absent,
//! - a list element of the wrong type is dropped and its siblings kept.
//!
//! Only a body that is not a JSON object at the top level fails to decode.
//!
//! Text addressed by the host page's `data-i18n` attributes is resolved
//! through [`LocalizedContent::text`], an explicit accessor per known key.
//! Those fields are `Option<String>` so that "absent" leaves the page text
//! alone instead of blanking it.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{ContentError, ContentResult};

// ---------------------------------------------------------------------------
// Lenient decoding helpers
// ---------------------------------------------------------------------------

/// Decode `T`, falling back to `T::default()` on a type mismatch.
fn lenient<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(de)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Decode a list, dropping elements that do not decode as `T`.
fn lenient_list<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(de)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect())
}

/// Decode an optional string. Anything else, numbers included, is absent,
/// so page text addressed by `data-i18n` is never overwritten by a
/// non-string value.
fn lenient_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Decode an optional data scalar; numbers are accepted and stringified
/// (`"year": 2021`).
fn lenient_scalar<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(de)?))
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode a required-ish data string, defaulting to empty.
fn lenient_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(de)?).unwrap_or_default())
}

fn lenient_f64<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(de)?.as_f64().unwrap_or(0.0))
}

fn lenient_bool<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(de)?.as_bool().unwrap_or(false))
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The whole content file: language code → localized slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentDocument {
    languages: BTreeMap<String, LocalizedContent>,
}

impl ContentDocument {
    /// Decode a document from its JSON text.
    pub fn from_json_str(json: &str) -> ContentResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Decode a document from an already-parsed JSON value.
    pub fn from_value(value: Value) -> ContentResult<Self> {
        let Value::Object(map) = value else {
            return Err(ContentError::Parse(
                "top level must be an object keyed by language".into(),
            ));
        };
        let languages = map
            .into_iter()
            .map(|(code, slice)| {
                let content = LocalizedContent::deserialize(slice).unwrap_or_default();
                (code, content)
            })
            .collect();
        Ok(Self { languages })
    }

    /// Build a document from already-typed slices.
    pub fn from_languages(
        languages: impl IntoIterator<Item = (impl Into<String>, LocalizedContent)>,
    ) -> Self {
        Self {
            languages: languages
                .into_iter()
                .map(|(code, content)| (code.into(), content))
                .collect(),
        }
    }

    /// Localized slice for `code`, if present.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&LocalizedContent> {
        self.languages.get(code)
    }

    /// Whether `code` is one of the document's languages.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.languages.contains_key(code)
    }

    /// Language codes in the document (sorted).
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Resolve a requested language code to one the document has.
    ///
    /// Unknown codes fall back to `default`; if the document lacks that too,
    /// the first language key is used. Returns `None` only for an empty
    /// document.
    #[must_use]
    pub fn resolve_lang<'a>(&'a self, requested: &str, default: &str) -> Option<&'a str> {
        if let Some((code, _)) = self.languages.get_key_value(requested) {
            return Some(code.as_str());
        }
        if let Some((code, _)) = self.languages.get_key_value(default) {
            return Some(code.as_str());
        }
        self.languages.keys().next().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Localized slice
// ---------------------------------------------------------------------------

/// All display strings and data for one language.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalizedContent {
    #[serde(deserialize_with = "lenient")]
    pub meta: Meta,
    #[serde(deserialize_with = "lenient")]
    pub profile: Profile,
    #[serde(deserialize_with = "lenient_list")]
    pub about: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub hero: Hero,
    #[serde(deserialize_with = "lenient_list")]
    pub skills: Vec<SkillGroup>,
    #[serde(deserialize_with = "lenient_list")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "lenient_list")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "lenient_list")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "lenient_list")]
    pub certifications: Vec<Certification>,
    #[serde(deserialize_with = "lenient_list")]
    pub quick_links: Vec<QuickLink>,
    #[serde(deserialize_with = "lenient")]
    pub lab: Lab,
    #[serde(deserialize_with = "lenient")]
    pub cmdk: CmdkLabels,
    #[serde(deserialize_with = "lenient")]
    pub labels: Labels,
    #[serde(deserialize_with = "lenient")]
    pub nav: Nav,
    #[serde(deserialize_with = "lenient")]
    pub theme: ThemeLabels,
}

impl LocalizedContent {
    /// Resolve a dotted `data-i18n` key (`"nav.about"`) to its text.
    ///
    /// Unknown groups or fields, and fields absent from the document,
    /// resolve to `None`.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        let (group, field) = key.split_once('.')?;
        match group {
            "meta" => self.meta.text(field),
            "profile" => self.profile.text(field),
            "hero" => self.hero.text(field),
            "cmdk" => self.cmdk.text(field),
            "labels" => self.labels.text(field),
            "nav" => self.nav.text(field),
            "theme" => self.theme.text(field),
            _ => None,
        }
    }

    /// First project with the given id.
    #[must_use]
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Projects named in `hero.featured`, in that order; unknown ids skipped.
    pub fn featured_projects(&self) -> impl Iterator<Item = &Project> {
        self.hero.featured.iter().filter_map(|id| self.project(id))
    }
}

/// Page-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Meta {
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub og_description: Option<String>,
}

impl Meta {
    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "title" => self.title.as_deref(),
            "description" => self.description.as_deref(),
            "ogDescription" => self.og_description.as_deref(),
            _ => None,
        }
    }
}

/// Identity and contact links.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub role: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub whatsapp: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub github: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub linkedin: Option<String>,
}

impl Profile {
    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "name" => self.name.as_deref(),
            "role" => self.role.as_deref(),
            "location" => self.location.as_deref(),
            "email" => self.email.as_deref(),
            _ => None,
        }
    }

    /// Trimmed email, `None` when blank.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        trimmed(self.email.as_deref())
    }

    /// Trimmed WhatsApp link, `None` when blank.
    #[must_use]
    pub fn whatsapp(&self) -> Option<&str> {
        trimmed(self.whatsapp.as_deref())
    }

    /// Trimmed GitHub link, `None` when blank.
    #[must_use]
    pub fn github(&self) -> Option<&str> {
        trimmed(self.github.as_deref())
    }

    /// Trimmed LinkedIn link, `None` when blank.
    #[must_use]
    pub fn linkedin(&self) -> Option<&str> {
        trimmed(self.linkedin.as_deref())
    }

    /// `mailto:` href for the email, if any.
    #[must_use]
    pub fn mailto(&self) -> Option<String> {
        self.email().map(|email| format!("mailto:{email}"))
    }
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Hero block: focus chips, build bullets, delivery pipeline, featured ids.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hero {
    #[serde(deserialize_with = "lenient_text")]
    pub headline: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub tagline: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub focus: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub build: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub pipeline: Vec<PipelineStep>,
    #[serde(deserialize_with = "lenient_list")]
    pub featured: Vec<String>,
}

impl Hero {
    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "headline" => self.headline.as_deref(),
            "tagline" => self.tagline.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineStep {
    #[serde(deserialize_with = "lenient_string")]
    pub label: String,
    #[serde(deserialize_with = "lenient_string")]
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    #[serde(deserialize_with = "lenient_string")]
    pub group: String,
    #[serde(deserialize_with = "lenient_list")]
    pub items: Vec<String>,
}

/// One portfolio project.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub subtitle: String,
    #[serde(deserialize_with = "lenient_text")]
    pub image: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub highlights: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub stack: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub links: ProjectLinks,
    #[serde(deserialize_with = "lenient_string")]
    pub problem: String,
    #[serde(deserialize_with = "lenient_list")]
    pub approach: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub impact: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub disclaimer: String,
}

impl Project {
    /// Whether the project's stack contains `tag` (exact match).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.stack.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectLinks {
    #[serde(deserialize_with = "lenient_text")]
    pub repo: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub demo: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub writeup: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Experience {
    #[serde(deserialize_with = "lenient_string")]
    pub when: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub org: String,
    #[serde(deserialize_with = "lenient_list")]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub org: String,
    #[serde(deserialize_with = "lenient_scalar")]
    pub year: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Certification {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub issuer: String,
    #[serde(deserialize_with = "lenient_scalar")]
    pub year: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuickLink {
    #[serde(deserialize_with = "lenient_string")]
    pub label: String,
    #[serde(deserialize_with = "lenient_text")]
    pub href: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub external: bool,
}

/// Node-link diagram data.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Lab {
    #[serde(deserialize_with = "lenient_list")]
    pub nodes: Vec<LabNode>,
    #[serde(deserialize_with = "lenient_list")]
    pub legend: Vec<LegendEntry>,
}

impl Lab {
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&LabNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// A diagram node at percentage coordinates of a 0–100 virtual canvas.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabNode {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub label: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub x: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub y: f64,
    /// Directed edges to other node ids.
    #[serde(deserialize_with = "lenient_list")]
    pub links: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub body: String,
    #[serde(deserialize_with = "lenient_list")]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegendEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub label: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
}

// ---------------------------------------------------------------------------
// Label groups (data-i18n addressable)
// ---------------------------------------------------------------------------

/// Declares a label group: every field is an optional string reachable as
/// `"<group>.<jsonName>"`.
macro_rules! label_group {
    (
        $(#[$meta:meta])*
        $name:ident { $($field:ident => $json:tt),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(
                #[serde(rename = $json, deserialize_with = "lenient_text")]
                pub $field: Option<String>,
            )*
        }

        impl $name {
            fn text(&self, field: &str) -> Option<&str> {
                match field {
                    $($json => self.$field.as_deref(),)*
                    _ => None,
                }
            }
        }
    };
}

label_group! {
    /// Command palette strings.
    CmdkLabels {
        placeholder => "placeholder",
        empty => "empty",
        hint => "hint",
        section => "section",
        action => "action",
        link => "link",
        project => "project",
        toggle_theme => "toggleTheme",
        copy_email => "copyEmail",
    }
}

label_group! {
    /// General UI strings.
    Labels {
        repo => "repo",
        demo => "demo",
        writeup => "writeup",
        problem => "problem",
        approach => "approach",
        impact => "impact",
        highlights => "highlights",
        stack => "stack",
        close => "close",
        toolbox_all => "toolboxAll",
        toolbox_more => "toolboxMore",
        toolbox_projects => "toolboxProjects",
        toolbox_clear => "toolboxClear",
        load_error => "loadError",
    }
}

label_group! {
    /// Section navigation labels.
    Nav {
        about => "about",
        skills => "skills",
        toolbox => "toolbox",
        projects => "projects",
        lab => "lab",
        experience => "experience",
        education => "education",
        contact => "contact",
    }
}

label_group! {
    /// Theme toggle labels.
    ThemeLabels {
        light => "light",
        dark => "dark",
        toggle => "toggle",
    }
}

impl Nav {
    /// Label for a section anchor id, if the document provides one.
    #[must_use]
    pub fn label(&self, section: &str) -> Option<&str> {
        self.text(section)
    }
}
