#![forbid(unsafe_code)]

//! Animation scheduling rules for the backdrop.

/// Length of one 60 Hz frame in milliseconds; particle velocities are
/// expressed per such frame.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Whether the animation loop may run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationGate {
    /// `document.visibilityState == "hidden"`.
    pub hidden: bool,
    /// `prefers-reduced-motion: reduce`.
    pub reduced_motion: bool,
}

/// What the loop should do after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    /// Keep requesting animation frames.
    Run,
    /// Stop scheduling; the canvas keeps its last frame.
    Pause,
    /// Paint one static frame and stop.
    Still,
}

impl AnimationGate {
    #[must_use]
    pub fn new(hidden: bool, reduced_motion: bool) -> Self {
        Self {
            hidden,
            reduced_motion,
        }
    }

    #[must_use]
    pub fn action(self) -> LoopAction {
        if self.reduced_motion {
            LoopAction::Still
        } else if self.hidden {
            LoopAction::Pause
        } else {
            LoopAction::Run
        }
    }
}

/// Step size, in 60 Hz frames, between two animation timestamps.
///
/// The first frame and any gap after a pause count as one frame so the field
/// never jumps.
#[must_use]
pub fn frame_steps(prev_ms: Option<f64>, now_ms: f64) -> f64 {
    match prev_ms {
        Some(prev) if now_ms > prev => ((now_ms - prev) / FRAME_MS).min(4.0),
        _ => 1.0,
    }
}

/// Canvas backing size for a CSS size and device pixel ratio.
#[must_use]
pub fn backing_size(css_width: f64, css_height: f64, dpr: f64) -> (u32, u32) {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr.min(3.0) } else { 1.0 };
    let px = |v: f64| (v.max(1.0) * dpr).round().min(f64::from(u32::MAX)) as u32;
    (px(css_width), px(css_height))
}
