#![forbid(unsafe_code)]

//! Backdrop painting.
//!
//! Converts a [`ParticleField`] into a flat list of canvas draw operations.
//! The wasm host replays the list on a 2D context; tests inspect it.

use folio_core::Theme;
use folio_widgets::backdrop::ParticleField;

/// Dot radius in CSS px.
pub const DOT_RADIUS: f64 = 1.6;

/// Peak line opacity, reached when two particles touch.
const LINE_ALPHA: f64 = 0.22;

/// Dot opacity.
const DOT_ALPHA: f64 = 0.55;

/// RGB triple per theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ink {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Ink {
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self { r: 40, g: 64, b: 120 },
            Theme::Dark => Self { r: 150, g: 190, b: 255 },
        }
    }

    /// CSS `rgba()` with the given alpha.
    #[must_use]
    pub fn rgba(self, alpha: f64) -> String {
        format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, alpha.clamp(0.0, 1.0))
    }
}

/// One canvas operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Clear the whole canvas.
    Clear { width: f64, height: f64 },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        style: String,
    },
    Dot { at: (f64, f64), radius: f64, style: String },
}

/// Draw list for the current field: clear, links underneath, dots on top.
#[must_use]
pub fn paint(field: &ParticleField, theme: Theme) -> Vec<DrawOp> {
    let ink = Ink::for_theme(theme);
    let (width, height) = field.size();
    let particles = field.particles();
    let links = field.links();

    let mut ops = Vec::with_capacity(1 + links.len() + particles.len());
    ops.push(DrawOp::Clear { width, height });
    for link in links {
        let (a, b) = (particles[link.a], particles[link.b]);
        ops.push(DrawOp::Line {
            from: (a.x, a.y),
            to: (b.x, b.y),
            style: ink.rgba(link.alpha * LINE_ALPHA),
        });
    }
    let dot = ink.rgba(DOT_ALPHA);
    ops.extend(particles.iter().map(|p| DrawOp::Dot {
        at: (p.x, p.y),
        radius: DOT_RADIUS,
        style: dot.clone(),
    }));
    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_first_then_lines_then_dots() {
        let field = ParticleField::new(7, 12, 200.0, 100.0, 80.0);
        let ops = paint(&field, Theme::Dark);
        assert!(matches!(ops[0], DrawOp::Clear { width, height } if width == 200.0 && height == 100.0));
        let first_dot = ops
            .iter()
            .position(|op| matches!(op, DrawOp::Dot { .. }))
            .unwrap();
        assert!(ops[first_dot..].iter().all(|op| matches!(op, DrawOp::Dot { .. })));
        assert_eq!(ops.len() - first_dot, 12);
        assert_eq!(first_dot - 1, field.links().len());
    }

    #[test]
    fn ink_depends_on_theme() {
        assert_ne!(Ink::for_theme(Theme::Light), Ink::for_theme(Theme::Dark));
        assert_eq!(Ink::for_theme(Theme::Dark).rgba(2.0), "rgba(150,190,255,1.000)");
    }
}
