//! annoreel — deterministic annotation-overlay sequencing.
//!
//! The crate turns a static catalog of subjects (one background image each,
//! plus pre-computed image/text detections and scene tags) into an ordered
//! stream of timed property-update directives: bounding boxes fade and grow,
//! labels scan from a placeholder to their final text, counters update, the
//! background swaps, and the whole choreography advances subject by subject.
//!
//! The core never renders. Layout, rasterization, asset decoding and the
//! actual interpolation belong to an external runtime that consumes the
//! [`Directive`] stream through a [`DirectiveSink`]. Playback is one-shot
//! and fully deterministic: the same catalog always produces the same
//! script, timings included.
//!
//! # Module Structure
//!
//! - `catalog`: subjects, detections, scene tags; the declarative catalog format
//! - `pool`: fixed-capacity arena of reusable overlay slots, keyed (kind, index)
//! - `animator`: per-slot bounding-box and label reveal planners
//! - `counter`: derived per-kind counters, rebound on subject change
//! - `sequencer`: the reset/reveal/hold state machine driving everything
//! - `directive`: the timed property-update output surface and virtual clock
//! - `assets`: background reference resolution boundary
//! - `config`: playback timing knobs
//! - `error`: the fatal, fail-fast error kinds

pub mod animator;
pub mod assets;
pub mod catalog;
pub mod config;
pub mod counter;
pub mod directive;
pub mod error;
pub mod pool;
pub mod sequencer;

pub use animator::{BoundingBoxAnimator, LabelAnimator};
pub use assets::{AssetHandle, AssetResolver, IdentityAssets, StaticAssets};
pub use catalog::{Detection, DetectionCatalog, DetectionKind, SceneTag, Subject};
pub use config::PlaybackConfig;
pub use counter::{pluralize, CounterBinder, CounterKind};
pub use directive::{Directive, DirectiveSink, Op, ScriptRecorder, SlotKey, Timeline, FULL_OPACITY};
pub use error::PlaybackError;
pub use pool::{OverlaySlotPool, SlotState};
pub use sequencer::{play, render_script, Sequencer, SequencerState};
