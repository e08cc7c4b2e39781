//! Static detection catalog.
//!
//! A catalog is the ordered, immutable list of subjects to walk through:
//! one background image per subject plus its pre-computed detections. It
//! also defines the declarative file format hosts author catalogs in
//! (`DetectionCatalog::from_json_file`), so one catalog file describes the
//! whole walkthrough rather than one script per subject.
//!
//! Subjects are never mutated after construction and iterate in insertion
//! order; the sequencer does no filtering or reordering.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::PlaybackError;

/// The two located detection kinds. Scene tags carry no geometry and are
/// tracked separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionKind {
    Image,
    Text,
}

impl DetectionKind {
    pub const ALL: [DetectionKind; 2] = [DetectionKind::Image, DetectionKind::Text];
}

impl fmt::Display for DetectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionKind::Image => f.write_str("image"),
            DetectionKind::Text => f.write_str("text"),
        }
    }
}

/// A located annotation: label plus bounding-box geometry, in scene
/// coordinates. `x`/`y` may be negative (partially off-screen regions);
/// `width`/`height` must be finite and non-negative.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Detection {
    /// Returns a description of the first geometry violation, if any.
    pub fn geometry_issue(&self) -> Option<String> {
        for (name, value) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !value.is_finite() {
                return Some(format!("{} is not finite ({})", name, value));
            }
        }
        if self.width < 0.0 {
            return Some(format!("width is negative ({})", self.width));
        }
        if self.height < 0.0 {
            return Some(format!("height is negative ({})", self.height));
        }
        None
    }
}

/// An unlocated whole-scene descriptive label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneTag {
    pub label: String,
}

/// One unit of playback: a background image reference and its detections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Opaque background reference, resolved by the host's `AssetResolver`.
    pub background: String,
    #[serde(default)]
    pub image_detections: Vec<Detection>,
    #[serde(default)]
    pub text_detections: Vec<Detection>,
    #[serde(default)]
    pub scene_detections: Vec<SceneTag>,
}

impl Subject {
    pub fn detections(&self, kind: DetectionKind) -> &[Detection] {
        match kind {
            DetectionKind::Image => &self.image_detections,
            DetectionKind::Text => &self.text_detections,
        }
    }

    pub fn detection_count(&self, kind: DetectionKind) -> usize {
        self.detections(kind).len()
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    subjects: Vec<Subject>,
}

/// The static, ordered collection of all subjects to be played back.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionCatalog {
    subjects: Vec<Subject>,
}

impl DetectionCatalog {
    /// Builds a catalog from host-constructed subjects.
    ///
    /// No validation happens here: in-process subjects are caller-validated
    /// (call [`validate`](Self::validate) explicitly, or rely on the
    /// sequencer rejecting bad geometry before it schedules the reveal).
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    /// Parses the declarative catalog format and validates every
    /// detection's geometry, failing before any playback could start.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json).context("parsing catalog JSON")?;
        let catalog = Self::new(file.subjects);
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog file {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Subjects in fixed insertion order.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Catalog-wide maximum detection count for a kind. This is what the
    /// slot pool is sized to.
    pub fn max_detections(&self, kind: DetectionKind) -> usize {
        self.subjects
            .iter()
            .map(|s| s.detection_count(kind))
            .max()
            .unwrap_or(0)
    }

    /// Checks every detection's geometry, naming the offending
    /// subject/detection index on failure.
    pub fn validate(&self) -> Result<()> {
        for (si, subject) in self.subjects.iter().enumerate() {
            for kind in DetectionKind::ALL {
                for (di, detection) in subject.detections(kind).iter().enumerate() {
                    if let Some(detail) = detection.geometry_issue() {
                        return Err(PlaybackError::InvalidGeometry {
                            subject: si,
                            kind,
                            index: di,
                            detail,
                        }
                        .into());
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(background: &str, image: usize, text: usize) -> Subject {
        let boxed = |i: usize| Detection {
            label: format!("d{}", i),
            x: 10.0 * i as f32,
            y: 0.0,
            width: 50.0,
            height: 40.0,
        };
        Subject {
            background: background.to_string(),
            image_detections: (0..image).map(boxed).collect(),
            text_detections: (0..text).map(boxed).collect(),
            scene_detections: vec![],
        }
    }

    #[test]
    fn subjects_keep_insertion_order() {
        let catalog =
            DetectionCatalog::new(vec![subject("b", 1, 0), subject("a", 0, 2), subject("c", 3, 1)]);
        let order: Vec<&str> = catalog
            .subjects()
            .iter()
            .map(|s| s.background.as_str())
            .collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn max_detections_spans_the_whole_catalog() {
        let catalog =
            DetectionCatalog::new(vec![subject("a", 1, 2), subject("b", 3, 0), subject("c", 0, 1)]);
        assert_eq!(catalog.max_detections(DetectionKind::Image), 3);
        assert_eq!(catalog.max_detections(DetectionKind::Text), 2);
    }

    #[test]
    fn validate_rejects_negative_and_non_finite_geometry() {
        let mut bad = subject("a", 1, 0);
        bad.image_detections[0].width = -5.0;
        let err = DetectionCatalog::new(vec![subject("ok", 1, 1), bad])
            .validate()
            .unwrap_err();
        match err.downcast_ref::<PlaybackError>() {
            Some(PlaybackError::InvalidGeometry { subject, kind, index, .. }) => {
                assert_eq!(*subject, 1);
                assert_eq!(*kind, DetectionKind::Image);
                assert_eq!(*index, 0);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let mut nan = subject("a", 0, 1);
        nan.text_detections[0].y = f32::NAN;
        assert!(DetectionCatalog::new(vec![nan]).validate().is_err());
    }

    #[test]
    fn negative_positions_are_legal_geometry() {
        let detection = Detection {
            label: "Tear".into(),
            x: -700.0,
            y: 40.0,
            width: 200.0,
            height: 200.0,
        };
        assert_eq!(detection.geometry_issue(), None);
    }

    #[test]
    fn json_catalog_round_trips_with_defaulted_lists() {
        let json = r#"{
            "subjects": [
                {
                    "background": "images/newspaper.png",
                    "image_detections": [
                        { "label": "Tear", "x": -700, "y": 40, "width": 200, "height": 200 }
                    ],
                    "scene_detections": [ { "label": "Analog nature" } ]
                }
            ]
        }"#;
        let catalog = DetectionCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 1);
        let subject = &catalog.subjects()[0];
        assert_eq!(subject.image_detections[0].label, "Tear");
        assert!(subject.text_detections.is_empty());
        assert_eq!(subject.scene_detections[0].label, "Analog nature");
    }

    #[test]
    fn json_catalog_rejects_bad_geometry_before_playback() {
        let json = r#"{
            "subjects": [
                {
                    "background": "x.png",
                    "image_detections": [
                        { "label": "bad", "x": 0, "y": 0, "width": -1, "height": 10 }
                    ]
                }
            ]
        }"#;
        assert!(DetectionCatalog::from_json_str(json).is_err());
    }
}
