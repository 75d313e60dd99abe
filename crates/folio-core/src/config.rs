#![forbid(unsafe_code)]

//! Runtime configuration.
//!
//! Every knob has a default matching the shipped page; hosts override with
//! the `with_*` builders (the web host reads `data-content-url` from
//! `<html>`).

use std::time::Duration;

/// Default content document location (same origin).
pub const DEFAULT_CONTENT_URL: &str = "content.json";

/// Default illustration for projects without an image.
pub const DEFAULT_PROJECT_IMAGE: &str = "assets/projects/project-generic.svg";

/// Message shown in the About section when content cannot be loaded.
pub const DEFAULT_LOAD_ERROR: &str = "Content failed to load. Please try again.";

/// Tunables shared by the runtime, widgets and web host.
#[derive(Debug, Clone, PartialEq)]
pub struct FolioConfig {
    /// URL of the content document, fetched once with `cache: no-store`.
    pub content_url: String,
    /// Maximum rows the command palette shows.
    pub palette_limit: usize,
    /// Maximum tags in the toolbox vocabulary.
    pub toolbox_cap: usize,
    /// Delay between closing the palette and running the chosen action.
    pub execute_delay: Duration,
    /// Number of particles in the decorative backdrop.
    pub particle_count: usize,
    /// Maximum distance (CSS px) at which two particles are linked.
    pub link_distance: f64,
    /// Maximum card tilt per axis, in degrees.
    pub tilt_max_deg: f64,
    /// Intersection ratio at which `data-reveal` elements appear.
    pub reveal_threshold: f64,
    /// Illustration used when a project has no image.
    pub fallback_image: String,
    /// Text shown when the content document fails to load.
    pub load_error_message: String,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            content_url: DEFAULT_CONTENT_URL.to_string(),
            palette_limit: 16,
            toolbox_cap: 36,
            execute_delay: Duration::from_millis(140),
            particle_count: 56,
            link_distance: 120.0,
            tilt_max_deg: 6.0,
            reveal_threshold: 0.12,
            fallback_image: DEFAULT_PROJECT_IMAGE.to_string(),
            load_error_message: DEFAULT_LOAD_ERROR.to_string(),
        }
    }
}

impl FolioConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content document URL (builder).
    #[must_use]
    pub fn with_content_url(mut self, url: impl Into<String>) -> Self {
        self.content_url = url.into();
        self
    }

    /// Set the palette result cap (builder). Zero is raised to one.
    #[must_use]
    pub fn with_palette_limit(mut self, n: usize) -> Self {
        self.palette_limit = n.max(1);
        self
    }

    /// Set the toolbox vocabulary cap (builder).
    #[must_use]
    pub fn with_toolbox_cap(mut self, n: usize) -> Self {
        self.toolbox_cap = n;
        self
    }

    /// Set the post-close execution delay (builder).
    #[must_use]
    pub fn with_execute_delay(mut self, delay: Duration) -> Self {
        self.execute_delay = delay;
        self
    }

    /// Set the backdrop particle count (builder).
    #[must_use]
    pub fn with_particle_count(mut self, n: usize) -> Self {
        self.particle_count = n;
        self
    }

    /// Set the backdrop link distance (builder).
    #[must_use]
    pub fn with_link_distance(mut self, px: f64) -> Self {
        self.link_distance = px.max(0.0);
        self
    }

    /// Set the card tilt limit (builder).
    #[must_use]
    pub fn with_tilt_max_deg(mut self, deg: f64) -> Self {
        self.tilt_max_deg = deg.clamp(0.0, 45.0);
        self
    }

    /// Set the fallback project image (builder).
    #[must_use]
    pub fn with_fallback_image(mut self, src: impl Into<String>) -> Self {
        self.fallback_image = src.into();
        self
    }

    /// Set the load failure message (builder).
    #[must_use]
    pub fn with_load_error_message(mut self, msg: impl Into<String>) -> Self {
        self.load_error_message = msg.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_behavior() {
        let cfg = FolioConfig::default();
        assert_eq!(cfg.content_url, "content.json");
        assert_eq!(cfg.palette_limit, 16);
        assert_eq!(cfg.toolbox_cap, 36);
    }

    #[test]
    fn builders_clamp() {
        let cfg = FolioConfig::new()
            .with_palette_limit(0)
            .with_tilt_max_deg(90.0)
            .with_content_url("data/site.json");
        assert_eq!(cfg.palette_limit, 1);
        assert_eq!(cfg.tilt_max_deg, 45.0);
        assert_eq!(cfg.content_url, "data/site.json");
    }
}
