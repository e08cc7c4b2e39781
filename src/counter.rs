//! Reactive detection counters.
//!
//! The three "Detected" counters (images, text segments, scenes) are derived
//! state: they depend only on the active subject and are recomputed whenever
//! it changes. There is no manual invalidation; the sequencer rebinds the
//! counters as part of every subject reset, and the rebind returns the one
//! atomic [`Op::SetCounters`] update so all three change on the same tick.

use crate::catalog::Subject;
use crate::directive::Op;

/// The three counted categories. Scene tags are counted even though they
/// are never revealed as slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterKind {
    Image,
    Text,
    Scene,
}

impl CounterKind {
    /// Singular noun used by the rendered counter label.
    pub fn noun(self) -> &'static str {
        match self {
            CounterKind::Image => "image",
            CounterKind::Text => "segment",
            CounterKind::Scene => "scene",
        }
    }
}

/// `"{n} {noun}"`, noun pluralized with a plain "s" unless n == 1.
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Holds the per-kind counts for the active subject.
#[derive(Debug, Default)]
pub struct CounterBinder {
    image: usize,
    text: usize,
    scene: usize,
}

impl CounterBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes all three counts from the new active subject and returns
    /// the atomic counter update.
    pub fn rebind(&mut self, subject: &Subject) -> Op {
        self.image = subject.image_detections.len();
        self.text = subject.text_detections.len();
        self.scene = subject.scene_detections.len();
        Op::SetCounters {
            image: self.label(CounterKind::Image),
            text: self.label(CounterKind::Text),
            scene: self.label(CounterKind::Scene),
        }
    }

    pub fn count(&self, kind: CounterKind) -> usize {
        match kind {
            CounterKind::Image => self.image,
            CounterKind::Text => self.text,
            CounterKind::Scene => self.scene,
        }
    }

    /// Rendered counter text, e.g. "1 image" or "0 segments".
    pub fn label(&self, kind: CounterKind) -> String {
        pluralize(self.count(kind), kind.noun())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Detection, SceneTag};

    fn detection() -> Detection {
        Detection {
            label: "d".into(),
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        }
    }

    #[test]
    fn singular_only_at_exactly_one() {
        assert_eq!(pluralize(0, "image"), "0 images");
        assert_eq!(pluralize(1, "image"), "1 image");
        assert_eq!(pluralize(2, "image"), "2 images");
        assert_eq!(pluralize(1, "segment"), "1 segment");
        assert_eq!(pluralize(5, "segment"), "5 segments");
        assert_eq!(pluralize(0, "scene"), "0 scenes");
        assert_eq!(pluralize(1, "scene"), "1 scene");
    }

    #[test]
    fn rebind_recomputes_all_three_counts_atomically() {
        let subject = Subject {
            background: "bg.png".into(),
            image_detections: vec![detection()],
            text_detections: vec![],
            scene_detections: vec![
                SceneTag { label: "a".into() },
                SceneTag { label: "b".into() },
            ],
        };

        let mut counters = CounterBinder::new();
        let op = counters.rebind(&subject);
        assert_eq!(
            op,
            Op::SetCounters {
                image: "1 image".into(),
                text: "0 segments".into(),
                scene: "2 scenes".into(),
            }
        );
        assert_eq!(counters.count(CounterKind::Scene), 2);

        // Rebinding to another subject fully replaces the derived state.
        let empty = Subject {
            background: "bg2.png".into(),
            image_detections: vec![],
            text_detections: vec![],
            scene_detections: vec![],
        };
        counters.rebind(&empty);
        assert_eq!(counters.label(CounterKind::Image), "0 images");
        assert_eq!(counters.label(CounterKind::Scene), "0 scenes");
    }
}
