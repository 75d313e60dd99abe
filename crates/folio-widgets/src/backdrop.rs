#![forbid(unsafe_code)]

//! Decorative particle field behind the page.
//!
//! # Algorithm
//!
//! A fixed number of points drift with constant velocity and wrap at the
//! viewport edges. Every pair closer than the link distance is joined by a
//! line whose alpha falls linearly from 1 at distance 0 to 0 at the limit.
//!
//! # Determinism
//!
//! Positions and velocities come from xorshift32 seeded by the host, so a
//! given seed and viewport always produce the same field.

// ---------------------------------------------------------------------------
// Xorshift32 RNG
// ---------------------------------------------------------------------------

#[inline]
fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Uniform sample in `[0, 1)`.
#[inline]
fn unit(state: &mut u32) -> f64 {
    f64::from(xorshift32(state)) / (f64::from(u32::MAX) + 1.0)
}

/// Speed limit per axis, in CSS px per 60 Hz frame.
const MAX_SPEED: f64 = 0.35;

/// One drifting point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

/// A line between two particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    /// 1 when touching, 0 at the link distance.
    pub alpha: f64,
}

/// The particle system.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    link_distance: f64,
    rng: u32,
}

impl ParticleField {
    /// Scatter `count` particles over a `width` × `height` viewport.
    #[must_use]
    pub fn new(seed: u32, count: usize, width: f64, height: f64, link_distance: f64) -> Self {
        let mut field = Self {
            particles: Vec::with_capacity(count),
            width: width.max(1.0),
            height: height.max(1.0),
            link_distance: link_distance.max(0.0),
            rng: seed | 1,
        };
        for _ in 0..count {
            let p = field.spawn();
            field.particles.push(p);
        }
        field
    }

    fn spawn(&mut self) -> Particle {
        Particle {
            x: unit(&mut self.rng) * self.width,
            y: unit(&mut self.rng) * self.height,
            vx: (unit(&mut self.rng) * 2.0 - 1.0) * MAX_SPEED,
            vy: (unit(&mut self.rng) * 2.0 - 1.0) * MAX_SPEED,
        }
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Adopt a new viewport, rescaling positions proportionally.
    pub fn resize(&mut self, width: f64, height: f64) {
        let (width, height) = (width.max(1.0), height.max(1.0));
        let (sx, sy) = (width / self.width, height / self.height);
        for p in &mut self.particles {
            p.x *= sx;
            p.y *= sy;
        }
        self.width = width;
        self.height = height;
    }

    /// Advance by `dt` frames (1.0 = one 60 Hz frame) and wrap at edges.
    pub fn step(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt.clamp(0.0, 4.0) } else { 1.0 };
        let (w, h) = (self.width, self.height);
        for p in &mut self.particles {
            p.x = (p.x + p.vx * dt).rem_euclid(w);
            p.y = (p.y + p.vy * dt).rem_euclid(h);
        }
    }

    /// Every pair closer than the link distance.
    #[must_use]
    pub fn links(&self) -> Vec<Link> {
        let limit = self.link_distance;
        if limit <= 0.0 {
            return Vec::new();
        }
        let limit_sq = limit * limit;
        let mut out = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for (j, b) in self.particles.iter().enumerate().skip(i + 1) {
                let (dx, dy) = (a.x - b.x, a.y - b.y);
                let d_sq = dx * dx + dy * dy;
                if d_sq < limit_sq {
                    out.push(Link {
                        a: i,
                        b: j,
                        alpha: 1.0 - d_sq.sqrt() / limit,
                    });
                }
            }
        }
        out
    }
}
