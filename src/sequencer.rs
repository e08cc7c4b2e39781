//! The annotation overlay timeline sequencer.
//!
//! One state machine drives the whole walkthrough:
//!
//! ```text
//! Idle -> ResetSubject -> RevealImageDetections -> RevealTextDetections
//!      -> Hold -> (ResetSubject for the next subject | Done)
//! ```
//!
//! The sequencer is the single writer of all shared visual state: the
//! background handle, the slot pool, and the counters are mutated by no one
//! else, which is what makes lock-free deterministic playback possible.
//! [`Sequencer::step`] performs the current state's work against a
//! [`Timeline`] and advances; [`play`] loops it to `Done`.
//!
//! Failure is fatal by design: the first `IndexMismatch`, `InvalidGeometry`
//! or `MissingAsset` aborts the sequence with nothing further emitted.

use anyhow::Result;
use log::{debug, info};

use crate::animator::{BoundingBoxAnimator, LabelAnimator};
use crate::assets::{AssetHandle, AssetResolver};
use crate::catalog::{DetectionCatalog, DetectionKind, Subject};
use crate::config::PlaybackConfig;
use crate::counter::CounterBinder;
use crate::directive::{Directive, DirectiveSink, ScriptRecorder, Timeline};
use crate::error::PlaybackError;
use crate::pool::OverlaySlotPool;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    ResetSubject,
    RevealImageDetections,
    RevealTextDetections,
    Hold,
    Done,
}

pub struct Sequencer<'a, R: AssetResolver> {
    catalog: &'a DetectionCatalog,
    resolver: &'a R,
    pool: OverlaySlotPool,
    box_animator: BoundingBoxAnimator,
    label_animator: LabelAnimator,
    counters: CounterBinder,
    hold_ms: u64,
    placeholder: String,
    /// Currently shown background; swaps are emitted only on change.
    background: Option<AssetHandle>,
    subject: usize,
    state: SequencerState,
}

impl<'a, R: AssetResolver> Sequencer<'a, R> {
    /// Builds a sequencer with a pool sized to the catalog.
    pub fn new(
        catalog: &'a DetectionCatalog,
        resolver: &'a R,
        config: &PlaybackConfig,
    ) -> Result<Self> {
        Self::with_pool(catalog, resolver, config, OverlaySlotPool::for_catalog(catalog))
    }

    /// Builds a sequencer around a caller-sized pool. Pool sizing is
    /// validated here, before any playback: an oversized subject aborts
    /// construction with `IndexMismatch`.
    pub fn with_pool(
        catalog: &'a DetectionCatalog,
        resolver: &'a R,
        config: &PlaybackConfig,
        pool: OverlaySlotPool,
    ) -> Result<Self> {
        pool.validate_for(catalog)?;
        Ok(Self {
            catalog,
            resolver,
            pool,
            box_animator: BoundingBoxAnimator::from_config(config),
            label_animator: LabelAnimator::from_config(config),
            counters: CounterBinder::new(),
            hold_ms: config.hold_ms,
            placeholder: config.placeholder.clone(),
            background: None,
            subject: 0,
            state: SequencerState::Idle,
        })
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Index of the subject currently being played.
    pub fn subject_index(&self) -> usize {
        self.subject
    }

    pub fn pool(&self) -> &OverlaySlotPool {
        &self.pool
    }

    pub fn counters(&self) -> &CounterBinder {
        &self.counters
    }

    /// Performs the current state's work and advances to the next state,
    /// which is returned. Stepping `Done` is a no-op.
    pub fn step<S: DirectiveSink>(&mut self, timeline: &mut Timeline<S>) -> Result<SequencerState> {
        let next = match self.state {
            SequencerState::Idle => {
                if self.catalog.is_empty() {
                    SequencerState::Done
                } else {
                    SequencerState::ResetSubject
                }
            }
            SequencerState::ResetSubject => {
                self.reset_subject(timeline)?;
                SequencerState::RevealImageDetections
            }
            SequencerState::RevealImageDetections => {
                self.reveal_detections(timeline, DetectionKind::Image)?;
                SequencerState::RevealTextDetections
            }
            SequencerState::RevealTextDetections => {
                self.reveal_detections(timeline, DetectionKind::Text)?;
                SequencerState::Hold
            }
            SequencerState::Hold => {
                timeline.wait(self.hold_ms)?;
                if self.subject + 1 < self.catalog.len() {
                    self.subject += 1;
                    SequencerState::ResetSubject
                } else {
                    SequencerState::Done
                }
            }
            SequencerState::Done => SequencerState::Done,
        };
        if next != self.state {
            debug!(
                "sequencer: {:?} -> {:?} (subject {}, t={}ms)",
                self.state,
                next,
                self.subject,
                timeline.now_ms()
            );
        }
        self.state = next;
        Ok(next)
    }

    /// Borrows from the catalog (not from `self`), so slot and counter
    /// mutation can proceed while the subject is held.
    fn current_subject(&self) -> &'a Subject {
        &self.catalog.subjects()[self.subject]
    }

    /// Blanks every slot of both kinds, then publishes the subject's
    /// counters and scene tags. Everything lands on one tick.
    fn reset_subject<S: DirectiveSink>(&mut self, timeline: &mut Timeline<S>) -> Result<()> {
        let subject = self.current_subject();
        info!(
            "subject {}/{}: {} ({} image, {} text, {} scene)",
            self.subject + 1,
            self.catalog.len(),
            subject.background,
            subject.image_detections.len(),
            subject.text_detections.len(),
            subject.scene_detections.len()
        );

        let reset = self.pool.reset_ops(&self.placeholder);
        timeline.apply_all(reset)?;

        let counter_op = self.counters.rebind(subject);
        let scene_op = crate::directive::Op::SetSceneTags {
            labels: subject
                .scene_detections
                .iter()
                .map(|t| t.label.clone())
                .collect(),
        };
        timeline.apply_all(vec![(counter_op, 0), (scene_op, 0)])
    }

    /// Reveals one kind's detections strictly in array order. Per
    /// detection: background swap if needed, immediate container geometry,
    /// box fade+grow, label reveal. No cross-detection concurrency.
    fn reveal_detections<S: DirectiveSink>(
        &mut self,
        timeline: &mut Timeline<S>,
        kind: DetectionKind,
    ) -> Result<()> {
        let detections = self.current_subject().detections(kind);
        for (index, detection) in detections.iter().enumerate() {
            if let Some(detail) = detection.geometry_issue() {
                return Err(PlaybackError::InvalidGeometry {
                    subject: self.subject,
                    kind,
                    index,
                    detail,
                }
                .into());
            }

            self.swap_background(timeline)?;

            let geometry =
                self.pool
                    .geometry(kind, index, detection.x, detection.y, detection.width)?;
            timeline.apply(geometry, 0)?;

            self.box_animator
                .reveal(timeline, &mut self.pool, kind, index, detection.height)?;
            self.label_animator
                .reveal(timeline, &mut self.pool, kind, index, &detection.label)?;
        }
        Ok(())
    }

    /// Resolves the subject's background and emits a swap when the resolved
    /// handle differs from the one currently shown.
    fn swap_background<S: DirectiveSink>(&mut self, timeline: &mut Timeline<S>) -> Result<()> {
        let reference = &self.current_subject().background;
        let handle = self.resolver.resolve(reference)?;
        if self.background.as_ref() == Some(&handle) {
            return Ok(());
        }
        debug!("background swap -> {}", handle.id());
        timeline.apply(
            crate::directive::Op::SwapBackground {
                asset: handle.clone(),
            },
            0,
        )?;
        self.background = Some(handle);
        Ok(())
    }
}

/// Plays the whole catalog against `sink` and returns the sink. The first
/// error aborts playback with nothing further emitted.
pub fn play<R: AssetResolver, S: DirectiveSink>(
    catalog: &DetectionCatalog,
    resolver: &R,
    config: &PlaybackConfig,
    sink: S,
) -> Result<S> {
    let mut sequencer = Sequencer::new(catalog, resolver, config)?;
    let mut timeline = Timeline::new(sink);
    while sequencer.step(&mut timeline)? != SequencerState::Done {}
    Ok(timeline.into_sink())
}

/// Plays the whole catalog and returns the recorded directive script.
pub fn render_script<R: AssetResolver>(
    catalog: &DetectionCatalog,
    resolver: &R,
    config: &PlaybackConfig,
) -> Result<Vec<Directive>> {
    Ok(play(catalog, resolver, config, ScriptRecorder::new())?.into_script())
}
