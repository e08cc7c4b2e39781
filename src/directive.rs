//! The output surface: timed property-update directives.
//!
//! The core never touches pixels. Everything it decides is expressed as a
//! [`Directive`] — one property update with a virtual start time and a
//! duration — pushed into a caller-supplied [`DirectiveSink`]. The external
//! rendering/animation runtime interpolates each update over its duration.
//!
//! [`Timeline`] is the single cooperative task's clock. Sequential
//! operations suspend it for their full duration; [`Timeline::apply_all`]
//! is the concurrency combinator: a fixed group of operations starts on the
//! same tick and the clock advances by the slowest member only.

use anyhow::Result;
use serde::Serialize;
use std::fmt;

use crate::assets::AssetHandle;
use crate::catalog::DetectionKind;

/// Slots animate opacity in 0.0..=100.0.
pub const FULL_OPACITY: f32 = 100.0;

/// Address of one reusable overlay slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SlotKey {
    pub kind: DetectionKind,
    pub index: usize,
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.index)
    }
}

/// One property update against a collaborator-owned handle.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Swap the shared background image to a resolved asset.
    SwapBackground { asset: AssetHandle },
    /// Position a slot's container and pin its minimum width.
    SetContainerGeometry {
        slot: SlotKey,
        x: f32,
        y: f32,
        min_width: f32,
    },
    SetBoxHeight { slot: SlotKey, height: f32 },
    SetBoxOpacity { slot: SlotKey, opacity: f32 },
    SetLabelOpacity { slot: SlotKey, opacity: f32 },
    SetLabelText { slot: SlotKey, text: String },
    /// Atomic multi-property counter update; all three change on one tick.
    SetCounters {
        image: String,
        text: String,
        scene: String,
    },
    /// Publish the current subject's scene-tag strip.
    SetSceneTags { labels: Vec<String> },
    /// Pure timing hold, no property change.
    Wait,
}

/// A scheduled property update. `duration_ms == 0` applies immediately;
/// anything else is interpolated by the rendering runtime.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Directive {
    pub at_ms: u64,
    pub duration_ms: u64,
    #[serde(flatten)]
    pub op: Op,
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>8}ms +{:>5}ms] ", self.at_ms, self.duration_ms)?;
        match &self.op {
            Op::SwapBackground { asset } => write!(f, "background <- {}", asset.id()),
            Op::SetContainerGeometry {
                slot,
                x,
                y,
                min_width,
            } => write!(f, "{} geometry <- ({}, {}, min_width {})", slot, x, y, min_width),
            Op::SetBoxHeight { slot, height } => write!(f, "{} box height <- {}", slot, height),
            Op::SetBoxOpacity { slot, opacity } => {
                write!(f, "{} box opacity <- {}", slot, opacity)
            }
            Op::SetLabelOpacity { slot, opacity } => {
                write!(f, "{} label opacity <- {}", slot, opacity)
            }
            Op::SetLabelText { slot, text } => write!(f, "{} label <- {:?}", slot, text),
            Op::SetCounters { image, text, scene } => {
                write!(f, "counters <- [{} | {} | {}]", image, text, scene)
            }
            Op::SetSceneTags { labels } => write!(f, "scene tags <- {:?}", labels),
            Op::Wait => write!(f, "hold"),
        }
    }
}

/// Consumer of the directive stream. Implemented by the external rendering
/// runtime; [`ScriptRecorder`] is the in-crate reference implementation.
pub trait DirectiveSink {
    fn emit(&mut self, directive: Directive) -> Result<()>;
}

/// Collects the directive stream into an ordered script.
#[derive(Debug, Default)]
pub struct ScriptRecorder {
    directives: Vec<Directive>,
}

impl ScriptRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn into_script(self) -> Vec<Directive> {
        self.directives
    }
}

impl DirectiveSink for ScriptRecorder {
    fn emit(&mut self, directive: Directive) -> Result<()> {
        self.directives.push(directive);
        Ok(())
    }
}

/// Virtual clock plus sink. All emission goes through one timeline, which
/// is what keeps playback single-writer and fully deterministic.
pub struct Timeline<S: DirectiveSink> {
    sink: S,
    now_ms: u64,
}

impl<S: DirectiveSink> Timeline<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, now_ms: 0 }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedules one operation and suspends until its duration has elapsed.
    pub fn apply(&mut self, op: Op, duration_ms: u64) -> Result<()> {
        self.sink.emit(Directive {
            at_ms: self.now_ms,
            duration_ms,
            op,
        })?;
        self.now_ms += duration_ms;
        Ok(())
    }

    /// Starts a fixed group of operations on the same tick; the group
    /// resolves only when its slowest member finishes.
    pub fn apply_all(&mut self, ops: Vec<(Op, u64)>) -> Result<()> {
        let start = self.now_ms;
        let mut longest = 0;
        for (op, duration_ms) in ops {
            longest = longest.max(duration_ms);
            self.sink.emit(Directive {
                at_ms: start,
                duration_ms,
                op,
            })?;
        }
        self.now_ms = start + longest;
        Ok(())
    }

    /// Unconditional timing hold.
    pub fn wait(&mut self, duration_ms: u64) -> Result<()> {
        self.apply(Op::Wait, duration_ms)
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(index: usize) -> SlotKey {
        SlotKey {
            kind: DetectionKind::Image,
            index,
        }
    }

    #[test]
    fn sequential_applies_advance_the_clock_by_each_duration() {
        let mut timeline = Timeline::new(ScriptRecorder::new());
        timeline
            .apply(Op::SetBoxHeight { slot: key(0), height: 10.0 }, 700)
            .unwrap();
        timeline
            .apply(Op::SetBoxOpacity { slot: key(0), opacity: FULL_OPACITY }, 500)
            .unwrap();
        assert_eq!(timeline.now_ms(), 1200);

        let script = timeline.into_sink().into_script();
        assert_eq!(script[0].at_ms, 0);
        assert_eq!(script[1].at_ms, 700);
    }

    #[test]
    fn grouped_ops_start_together_and_resolve_with_the_slowest() {
        let mut timeline = Timeline::new(ScriptRecorder::new());
        timeline.wait(100).unwrap();
        timeline
            .apply_all(vec![
                (Op::SetBoxOpacity { slot: key(0), opacity: FULL_OPACITY }, 500),
                (Op::SetBoxHeight { slot: key(0), height: 200.0 }, 700),
            ])
            .unwrap();
        assert_eq!(timeline.now_ms(), 800);

        let script = timeline.into_sink().into_script();
        assert_eq!(script[1].at_ms, 100);
        assert_eq!(script[2].at_ms, 100);
        assert_eq!(script[2].duration_ms, 700);
    }

    #[test]
    fn empty_group_does_not_advance_time() {
        let mut timeline = Timeline::new(ScriptRecorder::new());
        timeline.apply_all(vec![]).unwrap();
        assert_eq!(timeline.now_ms(), 0);
    }
}
