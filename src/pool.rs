//! Reusable overlay slot pool.
//!
//! Slots are the visual handles the choreography animates: one container
//! (position + minimum width), one bounding box (height + opacity), one
//! label (text + opacity) per (kind, index). The pool is a fixed-capacity
//! arena sized once at startup to the catalog-wide maximum per kind and
//! never grows or shrinks; subjects reuse the same slots, retargeted.
//!
//! Every mutation goes through an op builder: the builder checks the index
//! against the pre-sized capacity, updates the pool's state mirror to the
//! operation's target value, and returns the [`Op`] for the timeline to
//! schedule. The mirror tracks targets (not mid-animation values), which is
//! the state the sequencer's invariants are written against.

use anyhow::{anyhow, Result};

use crate::catalog::{DetectionCatalog, DetectionKind};
use crate::directive::{Op, SlotKey};
use crate::error::PlaybackError;

/// Target-value mirror of one slot's animatable state.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotState {
    pub x: f32,
    pub y: f32,
    pub min_width: f32,
    pub box_height: f32,
    pub box_opacity: f32,
    pub label_text: String,
    pub label_opacity: f32,
}

impl Default for SlotState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            min_width: 0.0,
            box_height: 0.0,
            box_opacity: 0.0,
            label_text: String::new(),
            label_opacity: 0.0,
        }
    }
}

impl SlotState {
    /// True when the slot is visually absent (the required state for every
    /// slot the current subject does not use).
    pub fn is_blanked(&self) -> bool {
        self.box_opacity == 0.0 && self.box_height == 0.0 && self.label_opacity == 0.0
    }
}

/// Fixed-capacity arena of overlay slots, one lane per detection kind.
#[derive(Debug)]
pub struct OverlaySlotPool {
    image: Vec<SlotState>,
    text: Vec<SlotState>,
}

impl OverlaySlotPool {
    pub fn new(image_capacity: usize, text_capacity: usize) -> Self {
        Self {
            image: vec![SlotState::default(); image_capacity],
            text: vec![SlotState::default(); text_capacity],
        }
    }

    /// Sizes each lane to the catalog-wide maximum for its kind.
    pub fn for_catalog(catalog: &DetectionCatalog) -> Self {
        Self::new(
            catalog.max_detections(DetectionKind::Image),
            catalog.max_detections(DetectionKind::Text),
        )
    }

    pub fn capacity(&self, kind: DetectionKind) -> usize {
        self.lane(kind).len()
    }

    /// Verifies every subject fits the pre-sized capacities. Called before
    /// playback starts; an oversized subject is fatal, not degradable.
    pub fn validate_for(&self, catalog: &DetectionCatalog) -> Result<()> {
        for subject in catalog.subjects() {
            for kind in DetectionKind::ALL {
                let needed = subject.detection_count(kind);
                let capacity = self.capacity(kind);
                if needed > capacity {
                    return Err(PlaybackError::IndexMismatch {
                        kind,
                        index: needed - 1,
                        capacity,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Read access to one slot's mirrored state. Same logical slot for a
    /// given (kind, index) on every call.
    pub fn slot(&self, kind: DetectionKind, index: usize) -> Result<&SlotState> {
        let capacity = self.capacity(kind);
        self.lane(kind)
            .get(index)
            .ok_or_else(|| PlaybackError::IndexMismatch { kind, index, capacity }.into())
    }

    pub fn slots(&self, kind: DetectionKind) -> &[SlotState] {
        self.lane(kind)
    }

    /// Positions a slot's container and pins its minimum width.
    ///
    /// All values must be finite and `min_width` non-negative. The
    /// sequencer pre-validates detections with full subject context; this
    /// check covers callers that retarget slots directly.
    pub fn geometry(
        &mut self,
        kind: DetectionKind,
        index: usize,
        x: f32,
        y: f32,
        min_width: f32,
    ) -> Result<Op> {
        let key = SlotKey { kind, index };
        for (name, value) in [("x", x), ("y", y), ("min_width", min_width)] {
            if !value.is_finite() {
                return Err(anyhow!("slot {}: {} is not finite ({})", key, name, value));
            }
        }
        if min_width < 0.0 {
            return Err(anyhow!(
                "slot {}: min_width is negative ({})",
                key,
                min_width
            ));
        }
        let state = self.slot_mut(kind, index)?;
        state.x = x;
        state.y = y;
        state.min_width = min_width;
        Ok(Op::SetContainerGeometry {
            slot: key,
            x,
            y,
            min_width,
        })
    }

    pub fn box_height(&mut self, kind: DetectionKind, index: usize, height: f32) -> Result<Op> {
        let state = self.slot_mut(kind, index)?;
        state.box_height = height;
        Ok(Op::SetBoxHeight {
            slot: SlotKey { kind, index },
            height,
        })
    }

    pub fn box_opacity(&mut self, kind: DetectionKind, index: usize, opacity: f32) -> Result<Op> {
        let state = self.slot_mut(kind, index)?;
        state.box_opacity = opacity;
        Ok(Op::SetBoxOpacity {
            slot: SlotKey { kind, index },
            opacity,
        })
    }

    pub fn label_opacity(&mut self, kind: DetectionKind, index: usize, opacity: f32) -> Result<Op> {
        let state = self.slot_mut(kind, index)?;
        state.label_opacity = opacity;
        Ok(Op::SetLabelOpacity {
            slot: SlotKey { kind, index },
            opacity,
        })
    }

    pub fn label_text(&mut self, kind: DetectionKind, index: usize, text: &str) -> Result<Op> {
        let state = self.slot_mut(kind, index)?;
        state.label_text = text.to_string();
        Ok(Op::SetLabelText {
            slot: SlotKey { kind, index },
            text: text.to_string(),
        })
    }

    /// Zero-duration ops forcing every slot of both kinds back to the
    /// blanked state: height 0, box and label opacity 0, label text reset
    /// to the placeholder. Infallible: it only iterates the pool itself.
    pub fn reset_ops(&mut self, placeholder: &str) -> Vec<(Op, u64)> {
        let mut ops = Vec::new();
        for kind in DetectionKind::ALL {
            for index in 0..self.capacity(kind) {
                let key = SlotKey { kind, index };
                let state = &mut self.lane_mut(kind)[index];
                state.box_height = 0.0;
                state.box_opacity = 0.0;
                state.label_opacity = 0.0;
                state.label_text = placeholder.to_string();
                ops.push((Op::SetBoxHeight { slot: key, height: 0.0 }, 0));
                ops.push((Op::SetBoxOpacity { slot: key, opacity: 0.0 }, 0));
                ops.push((Op::SetLabelOpacity { slot: key, opacity: 0.0 }, 0));
                ops.push((
                    Op::SetLabelText {
                        slot: key,
                        text: placeholder.to_string(),
                    },
                    0,
                ));
            }
        }
        ops
    }

    fn lane(&self, kind: DetectionKind) -> &[SlotState] {
        match kind {
            DetectionKind::Image => &self.image,
            DetectionKind::Text => &self.text,
        }
    }

    fn lane_mut(&mut self, kind: DetectionKind) -> &mut Vec<SlotState> {
        match kind {
            DetectionKind::Image => &mut self.image,
            DetectionKind::Text => &mut self.text,
        }
    }

    fn slot_mut(&mut self, kind: DetectionKind, index: usize) -> Result<&mut SlotState> {
        let capacity = self.capacity(kind);
        self.lane_mut(kind)
            .get_mut(index)
            .ok_or_else(|| PlaybackError::IndexMismatch { kind, index, capacity }.into())
    }
}
