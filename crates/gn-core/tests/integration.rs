//! Integration tests exercising the full pipeline:
//! samples → shake detector → decay scheduler → direction namer → sink.

use approx::assert_relative_eq;
use gn_core::{
    ChoiceCount, DecayScheduler, English, FrameLog, GravConfig, Replay, STOP_THRESHOLD, Sample,
    ShakeDetector, TickOutcome, delay_for_intensity, name_direction, name_direction_with,
    parse_samples,
};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(42)
}

/// Phone resting for `rest_ms`, shaken hard for `shake_ms`, then resting
/// again until `total_ms`. One sample every 20ms.
fn synthetic_samples(rest_ms: u64, shake_ms: u64, total_ms: u64) -> Vec<Sample> {
    let mut rng = rng();
    let mut samples = Vec::new();
    let mut flip = false;
    for t in (0..total_ms).step_by(20) {
        let noise: f64 = rng.random_range(-0.05..0.05);
        let x = if t >= rest_ms && t < rest_ms + shake_ms {
            flip = !flip;
            if flip { 15.0 } else { -15.0 }
        } else {
            0.0
        };
        samples.push(Sample::new(t, x + noise, noise, 9.81));
    }
    samples
}

fn replay_for(config: &GravConfig) -> Replay<gn_core::Phrasebook> {
    Replay::new(config.detector(), config.scheduler())
}

/// Test 1: Resting phone never starts the animation.
#[test]
fn resting_phone_produces_no_frames() {
    let mut replay = replay_for(&GravConfig::default());
    let mut log = FrameLog::default();
    for sample in synthetic_samples(10_000, 0, 3_000) {
        replay.feed(&sample, &mut log).unwrap();
    }
    replay.finish(&mut log).unwrap();
    assert_eq!(replay.shakes(), 0);
    assert!(log.frames.is_empty());
}

/// Test 2: A shake burst starts the animation, which decays to a stop.
#[test]
fn shake_burst_animates_then_settles() {
    let mut replay = replay_for(&GravConfig::default());
    let mut log = FrameLog::default();
    for sample in synthetic_samples(500, 400, 2_000) {
        replay.feed(&sample, &mut log).unwrap();
    }
    replay.finish(&mut log).unwrap();

    assert!(replay.shakes() >= 2, "burst should yield several shakes");
    assert!(!log.frames.is_empty());
    assert!(!replay.scheduler().is_running());

    for (_, frame) in &log.frames {
        assert!((1..=3).contains(&frame.direction));
        assert!(["go left", "go straight", "go right"].contains(&frame.text.as_str()));
    }

    let last = &log.frames.last().unwrap().1;
    assert!(last.intensity <= STOP_THRESHOLD);
}

/// Test 3: Shaking while running accumulates instead of restarting.
#[test]
fn continued_shaking_accumulates() {
    let mut scheduler = DecayScheduler::new(ChoiceCount::new(3).unwrap());
    scheduler.on_shake_detected(1000.0).unwrap();
    let first = match scheduler.tick().unwrap() {
        TickOutcome::Frame { frame, .. } => frame,
        TickOutcome::Stopped => panic!("should be running"),
    };
    scheduler.on_shake_detected(1000.0).unwrap();
    assert_relative_eq!(scheduler.intensity(), first.intensity + 1000.0);
}

/// Test 4: Sample text through config-built components.
#[test]
fn parsed_samples_drive_replay() {
    let text = "\
# t_ms x y z
0   0 0 9.8
120 20 0 9.8
240 0 0 9.8
";
    let samples = parse_samples(text).unwrap();
    let config = GravConfig::from_toml_str("num_choices = 5").unwrap();
    let mut replay = replay_for(&config);
    let mut log = FrameLog::default();
    for s in &samples {
        replay.feed(s, &mut log).unwrap();
    }
    replay.finish(&mut log).unwrap();

    // |20| / 120 * 10000 = 1666.7 starts the run at t=120
    assert!(replay.shakes() >= 1);
    let first_at = log.frames[0].0;
    assert_eq!(first_at, 120 + 36);
    for (_, frame) in &log.frames {
        assert!(frame.text.starts_with("go "));
    }
}

/// Test 5: A translated phrasebook flows through to frame text.
#[test]
fn phrasebook_from_config_renders_frames() {
    let text = r#"
num_choices = 2

[phrases]
go = "va"
left = "à gauche"
right = "à droite"
straight = "tout droit"
to_your = "à ta"
first_short = "er"
second_short = "e"
third_short = "e"
nth_short = "e"
"#;
    let config = GravConfig::from_toml_str(text).unwrap();
    let mut replay = replay_for(&config);
    let mut log = FrameLog::default();
    replay.shake(1500.0).unwrap();
    replay.finish(&mut log).unwrap();
    assert!(!log.frames.is_empty());
    for (_, frame) in &log.frames {
        assert!(
            frame.text == "va à gauche" || frame.text == "va à droite",
            "unexpected text {}",
            frame.text
        );
    }
}

/// Test 6: Detector and scheduler agree with hand-computed values.
#[test]
fn detector_delta_sets_first_delay() {
    let mut detector = ShakeDetector::default();
    let mut scheduler = DecayScheduler::new(ChoiceCount::new(3).unwrap());
    detector.on_sample(&Sample::new(0, 0.0, 0.0, 0.0));
    let delta = detector.on_sample(&Sample::new(200, 30.0, 0.0, 0.0)).unwrap();
    assert_relative_eq!(delta, 1500.0);
    scheduler.on_shake_detected(delta).unwrap();
    assert_eq!(scheduler.next_delay().unwrap().as_millis(), 40);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn choices_and_dir() -> impl Strategy<Value = (u32, u32)> {
    (2u32..200).prop_flat_map(|n| (Just(n), 1..=n))
}

proptest! {
    #[test]
    fn phrase_names_exactly_one_way((n, dir) in choices_and_dir()) {
        let text = name_direction(dir, n).unwrap();
        prop_assert!(text.starts_with("go "));
        let hits = ["left", "right", "straight"]
            .iter()
            .filter(|w| text.contains(*w))
            .count();
        prop_assert_eq!(hits, 1, "{}", text);
    }

    #[test]
    fn odd_center_is_straight(half in 1u32..100) {
        let n = half * 2 + 1;
        prop_assert_eq!(name_direction(n / 2 + 1, n).unwrap(), "go straight");
    }

    #[test]
    fn mirror_indices_swap_sides((n, dir) in choices_and_dir()) {
        let mirror = n + 1 - dir;
        let a = name_direction(dir, n).unwrap();
        let b = name_direction(mirror, n).unwrap();
        if dir == mirror {
            prop_assert_eq!(a, "go straight");
        } else {
            prop_assert_eq!(a.replace("left", "right"), b.replace("left", "right"));
            prop_assert_ne!(a.contains("left"), b.contains("left"));
        }
    }

    #[test]
    fn out_of_range_is_rejected(n in 2u32..50, extra in 1u32..10) {
        prop_assert!(name_direction(0, n).is_err());
        prop_assert!(name_direction(n + extra, n).is_err());
    }

    #[test]
    fn english_templates_match_default((n, dir) in choices_and_dir()) {
        prop_assert_eq!(
            name_direction_with(&English, dir, n).unwrap(),
            name_direction(dir, n).unwrap()
        );
    }

    #[test]
    fn delay_decreases_with_intensity(a in 1.0f64..100_000.0, factor in 1.5f64..10.0) {
        let lo = delay_for_intensity(a, 60_000.0).unwrap();
        let hi = delay_for_intensity(a * factor, 60_000.0).unwrap();
        prop_assert!(hi <= lo);
    }

    #[test]
    fn decay_always_terminates(delta in 801.0f64..50_000.0, n in 2u32..12) {
        let mut scheduler = DecayScheduler::new(ChoiceCount::new(n).unwrap());
        scheduler.on_shake_detected(delta).unwrap();
        let mut prev = scheduler.intensity();
        let mut steps = 0;
        while let TickOutcome::Frame { frame, .. } = scheduler.tick().unwrap() {
            prop_assert!(frame.intensity < prev);
            prop_assert!((1..=n).contains(&frame.direction));
            prev = frame.intensity;
            steps += 1;
            prop_assert!(steps < 200);
        }
        prop_assert!(!scheduler.is_running());
    }
}
