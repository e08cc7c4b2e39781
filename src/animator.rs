//! Per-slot reveal animators.
//!
//! Both animators are small planners: given a slot and a target, they emit
//! the fixed trajectory for one reveal through the timeline. They own no
//! state of their own beyond their durations; slot state lives in the pool
//! and time lives in the timeline.

use anyhow::Result;

use crate::catalog::DetectionKind;
use crate::config::PlaybackConfig;
use crate::directive::{DirectiveSink, Timeline, FULL_OPACITY};
use crate::pool::OverlaySlotPool;

/// Fade + grow reveal for one bounding box.
#[derive(Clone, Copy, Debug)]
pub struct BoundingBoxAnimator {
    pub fade_ms: u64,
    pub grow_ms: u64,
}

impl BoundingBoxAnimator {
    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self {
            fade_ms: config.box_fade_ms,
            grow_ms: config.box_grow_ms,
        }
    }

    /// Reveals one box: re-anchor height to 0, then fade opacity to full
    /// and grow height to target as one group (the step completes when the
    /// longer of the two finishes).
    ///
    /// The re-anchor is unconditional. Height is already 0 after a subject
    /// reset, but anchoring here makes the trajectory independent of
    /// whatever a prior subject left in the slot, so replay is
    /// deterministic from any starting state.
    pub fn reveal<S: DirectiveSink>(
        &self,
        timeline: &mut Timeline<S>,
        pool: &mut OverlaySlotPool,
        kind: DetectionKind,
        index: usize,
        target_height: f32,
    ) -> Result<()> {
        let anchor = pool.box_height(kind, index, 0.0)?;
        timeline.apply(anchor, 0)?;

        let fade = pool.box_opacity(kind, index, FULL_OPACITY)?;
        let grow = pool.box_height(kind, index, target_height)?;
        timeline.apply_all(vec![(fade, self.fade_ms), (grow, self.grow_ms)])
    }
}

/// Two-phase label reveal: placeholder, then fade-in plus final text.
#[derive(Clone, Debug)]
pub struct LabelAnimator {
    pub fade_ms: u64,
    pub reveal_ms: u64,
    pub placeholder: String,
}

impl LabelAnimator {
    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self {
            fade_ms: config.label_fade_ms,
            reveal_ms: config.label_reveal_ms,
            placeholder: config.placeholder.clone(),
        }
    }

    /// Reveals one label. The placeholder is set as its own zero-duration
    /// directive strictly before the final-text transition starts, so the
    /// renderer shows it for at least one frame (the "scanning" effect).
    pub fn reveal<S: DirectiveSink>(
        &self,
        timeline: &mut Timeline<S>,
        pool: &mut OverlaySlotPool,
        kind: DetectionKind,
        index: usize,
        final_text: &str,
    ) -> Result<()> {
        let scanning = pool.label_text(kind, index, &self.placeholder)?;
        timeline.apply(scanning, 0)?;

        let fade = pool.label_opacity(kind, index, FULL_OPACITY)?;
        let text = pool.label_text(kind, index, final_text)?;
        timeline.apply_all(vec![(fade, self.fade_ms), (text, self.reveal_ms)])
    }
}
