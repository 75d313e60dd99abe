#![forbid(unsafe_code)]

//! Pointer-driven card tilt.

/// Card bounds in CSS pixels (as from `getBoundingClientRect`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Rotation in degrees around the X and Y axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Tilt {
    /// No rotation.
    pub const NONE: Self = Self {
        rotate_x: 0.0,
        rotate_y: 0.0,
    };

    /// Tilt for a pointer at (`px`, `py`) over `rect`, at most `max_deg`
    /// per axis. The card leans toward the pointer: right edge → positive
    /// Y rotation, top edge → positive X rotation.
    #[must_use]
    pub fn from_pointer(px: f64, py: f64, rect: CardRect, max_deg: f64) -> Self {
        if rect.width <= 0.0 || rect.height <= 0.0 || max_deg <= 0.0 {
            return Self::NONE;
        }
        // Normalized offset from the center, in [-1, 1].
        let nx = (((px - rect.left) / rect.width) * 2.0 - 1.0).clamp(-1.0, 1.0);
        let ny = (((py - rect.top) / rect.height) * 2.0 - 1.0).clamp(-1.0, 1.0);
        Self {
            rotate_x: -ny * max_deg,
            rotate_y: nx * max_deg,
        }
    }

    /// CSS `transform` value; empty for no rotation so the stylesheet
    /// takes over again.
    #[must_use]
    pub fn css(&self) -> String {
        if *self == Self::NONE {
            return String::new();
        }
        format!(
            "perspective(900px) rotateX({:.2}deg) rotateY({:.2}deg)",
            self.rotate_x, self.rotate_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: CardRect = CardRect {
        left: 100.0,
        top: 50.0,
        width: 200.0,
        height: 100.0,
    };

    #[test]
    fn center_is_flat_and_corners_hit_the_limit() {
        let center = Tilt::from_pointer(200.0, 100.0, RECT, 6.0);
        assert_eq!(center.rotate_x.abs(), 0.0);
        assert_eq!(center.rotate_y.abs(), 0.0);

        let corner = Tilt::from_pointer(300.0, 50.0, RECT, 6.0);
        assert_eq!(corner, Tilt { rotate_x: 6.0, rotate_y: 6.0 });
    }

    #[test]
    fn pointer_outside_is_clamped() {
        let t = Tilt::from_pointer(10_000.0, -10_000.0, RECT, 6.0);
        assert_eq!(t, Tilt { rotate_x: 6.0, rotate_y: 6.0 });
    }

    #[test]
    fn degenerate_rect_and_css() {
        let zero = CardRect { width: 0.0, ..RECT };
        assert_eq!(Tilt::from_pointer(1.0, 1.0, zero, 6.0), Tilt::NONE);
        assert_eq!(Tilt::NONE.css(), "");
        assert_eq!(
            Tilt { rotate_x: 1.0, rotate_y: -2.5 }.css(),
            "perspective(900px) rotateX(1.00deg) rotateY(-2.50deg)"
        );
    }
}
