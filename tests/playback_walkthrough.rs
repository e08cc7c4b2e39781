//! End-to-end walkthrough scenarios over the public API: the recorded
//! directive scripts and the observable slot states at each stage.

use annoreel::{
    Detection, DetectionCatalog, DetectionKind, IdentityAssets, Op, PlaybackConfig,
    SceneTag, ScriptRecorder, Sequencer, SequencerState, Subject, Timeline, render_script,
    FULL_OPACITY,
};

fn detection(label: &str, x: f32, y: f32, width: f32, height: f32) -> Detection {
    Detection {
        label: label.into(),
        x,
        y,
        width,
        height,
    }
}

fn newspaper() -> Subject {
    Subject {
        background: "images/newspaper.png".into(),
        image_detections: vec![detection("Tear", -700.0, 40.0, 200.0, 200.0)],
        text_detections: vec![],
        scene_detections: vec![
            SceneTag {
                label: "Analog nature".into(),
            },
            SceneTag {
                label: "Faded print".into(),
            },
        ],
    }
}

/// Steps until `state` has been entered and performed. Each state finishes
/// its work in a single step, so this stops right after that step.
fn step_through<R: annoreel::AssetResolver>(
    sequencer: &mut Sequencer<'_, R>,
    timeline: &mut Timeline<ScriptRecorder>,
    state: SequencerState,
) {
    while sequencer.state() != state {
        assert_ne!(
            sequencer.state(),
            SequencerState::Done,
            "never entered {:?}",
            state
        );
        sequencer.step(timeline).unwrap();
    }
    sequencer.step(timeline).unwrap();
}

#[test]
fn scenario_a_single_image_detection_reveals_slot_zero() {
    let catalog = DetectionCatalog::new(vec![newspaper()]);
    let config = PlaybackConfig::default();
    let mut sequencer = Sequencer::new(&catalog, &IdentityAssets, &config).unwrap();
    let mut timeline = Timeline::new(ScriptRecorder::new());

    step_through(
        &mut sequencer,
        &mut timeline,
        SequencerState::RevealImageDetections,
    );

    let slot = sequencer.pool().slot(DetectionKind::Image, 0).unwrap();
    assert_eq!(slot.x, -700.0);
    assert_eq!(slot.y, 40.0);
    assert_eq!(slot.min_width, 200.0);
    assert_eq!(slot.box_height, 200.0);
    assert_eq!(slot.box_opacity, FULL_OPACITY);
    assert_eq!(slot.label_opacity, FULL_OPACITY);
    assert_eq!(slot.label_text, "Tear");
}

#[test]
fn scenario_b_counters_and_scene_tags_for_an_empty_text_list() {
    let catalog = DetectionCatalog::new(vec![newspaper()]);
    let script = render_script(&catalog, &IdentityAssets, &PlaybackConfig::default()).unwrap();

    let counters = script
        .iter()
        .find_map(|d| match &d.op {
            Op::SetCounters { image, text, scene } => Some((image.clone(), text.clone(), scene.clone())),
            _ => None,
        })
        .expect("counter directive");
    assert_eq!(counters.0, "1 image");
    assert_eq!(counters.1, "0 segments");
    assert_eq!(counters.2, "2 scenes");

    let tags = script
        .iter()
        .find_map(|d| match &d.op {
            Op::SetSceneTags { labels } => Some(labels.clone()),
            _ => None,
        })
        .expect("scene tag directive");
    assert_eq!(tags, vec!["Analog nature", "Faded print"]);
}

#[test]
fn scenario_c_second_subject_reset_blanks_slots_the_subject_does_not_use() {
    let busy = Subject {
        background: "images/busy.png".into(),
        image_detections: vec![
            detection("one", 0.0, 0.0, 100.0, 80.0),
            detection("two", 50.0, 10.0, 120.0, 90.0),
        ],
        text_detections: vec![detection("caption", -250.0, -100.0, 500.0, 400.0)],
        scene_detections: vec![],
    };
    let catalog = DetectionCatalog::new(vec![busy, newspaper()]);
    let config = PlaybackConfig::default();
    let mut sequencer = Sequencer::new(&catalog, &IdentityAssets, &config).unwrap();
    let mut timeline = Timeline::new(ScriptRecorder::new());

    // Subject 1 all the way through its hold.
    step_through(&mut sequencer, &mut timeline, SequencerState::Hold);
    assert_eq!(sequencer.state(), SequencerState::ResetSubject);
    assert_eq!(sequencer.subject_index(), 1);

    // Subject 2's reset forces every slot back to invisible, including the
    // image slot 1 and text slot 0 that subject 2 never uses.
    sequencer.step(&mut timeline).unwrap();
    for kind in DetectionKind::ALL {
        for slot in sequencer.pool().slots(kind) {
            assert!(slot.is_blanked());
            assert_eq!(slot.label_text, "...");
        }
    }

    // After subject 2's image reveal only slot 0 is visible again.
    step_through(
        &mut sequencer,
        &mut timeline,
        SequencerState::RevealImageDetections,
    );
    let slots = sequencer.pool().slots(DetectionKind::Image);
    assert_eq!(slots[0].box_opacity, FULL_OPACITY);
    assert!(slots[1].is_blanked());
    assert!(sequencer.pool().slots(DetectionKind::Text)[0].is_blanked());
}

#[test]
fn reveal_marks_exactly_the_first_k_slots() {
    let three = Subject {
        background: "a.png".into(),
        image_detections: (0..3)
            .map(|i| detection(&format!("d{}", i), i as f32, 0.0, 50.0, 40.0))
            .collect(),
        text_detections: vec![],
        scene_detections: vec![],
    };
    let one = Subject {
        background: "b.png".into(),
        image_detections: vec![detection("solo", 5.0, 5.0, 60.0, 45.0)],
        text_detections: vec![],
        scene_detections: vec![],
    };
    let catalog = DetectionCatalog::new(vec![three, one]);
    let config = PlaybackConfig::default();
    let mut sequencer = Sequencer::new(&catalog, &IdentityAssets, &config).unwrap();
    let mut timeline = Timeline::new(ScriptRecorder::new());

    step_through(
        &mut sequencer,
        &mut timeline,
        SequencerState::RevealImageDetections,
    );
    let slots = sequencer.pool().slots(DetectionKind::Image);
    assert!(slots.iter().all(|s| s.box_opacity == FULL_OPACITY));

    // Second subject uses one of the three slots; the rest stay blanked.
    step_through(&mut sequencer, &mut timeline, SequencerState::Hold);
    step_through(
        &mut sequencer,
        &mut timeline,
        SequencerState::RevealImageDetections,
    );
    let slots = sequencer.pool().slots(DetectionKind::Image);
    assert_eq!(slots[0].box_height, 45.0);
    assert_eq!(slots[0].box_opacity, FULL_OPACITY);
    assert!(slots[1].is_blanked());
    assert!(slots[2].is_blanked());
}

#[test]
fn replay_produces_an_identical_script() {
    let catalog = DetectionCatalog::new(vec![
        newspaper(),
        Subject {
            background: "images/angel.png".into(),
            image_detections: vec![detection("Backlit angel", -100.0, 30.0, 250.0, 200.0)],
            text_detections: vec![detection("!@8#*(*@32?", -250.0, -100.0, 500.0, 400.0)],
            scene_detections: vec![SceneTag {
                label: "Ethereal ambiance".into(),
            }],
        },
    ]);
    let config = PlaybackConfig::default();
    let first = render_script(&catalog, &IdentityAssets, &config).unwrap();
    let second = render_script(&catalog, &IdentityAssets, &config).unwrap();
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn every_subject_starts_with_a_full_blanking_batch() {
    let catalog = DetectionCatalog::new(vec![newspaper(), newspaper()]);
    let config = PlaybackConfig::default();
    let script = render_script(&catalog, &IdentityAssets, &config).unwrap();

    // The first thing on the timeline is the reset batch: one zero-duration
    // blanking group covering the whole pool, before any reveal directive.
    let first_reveal = script
        .iter()
        .position(|d| d.duration_ms > 0)
        .expect("animated directive");
    for directive in &script[..first_reveal] {
        assert_eq!(directive.at_ms, 0);
        assert_eq!(directive.duration_ms, 0);
    }

    // Subject 2's reset batch lands exactly when subject 1's hold resolves.
    let hold = script.iter().find(|d| matches!(d.op, Op::Wait)).unwrap();
    let resume = hold.at_ms + hold.duration_ms;
    assert!(script
        .iter()
        .any(|d| d.at_ms == resume && d.duration_ms == 0));
}
