// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end timeline behavior through the public API.

use kurbo::Vec2;
use understory_timeline::{
    ConfigurationError, EntityId, Phase, Position, Property, SplitUnit, Stagger, Timeline, Value,
    split_to_units,
};

const EPS: f64 = 1e-9;

fn opacity_at(timeline: &Timeline, entity: EntityId, progress: f64) -> f64 {
    timeline
        .evaluate(progress)
        .scalar(entity, &Property::Opacity)
        .expect("entity is targeted")
}

fn mixed_timeline() -> Timeline {
    Timeline::builder()
        .phase(
            Phase::new(Property::Opacity, 0.0, 1.0)
                .targets(EntityId::new(1).range(3))
                .duration(1.0)
                .stagger(Stagger::each(0.2))
                .ease("power2.inOut".parse().unwrap())
                .named("fade"),
        )
        .phase(
            Phase::new(Property::Translate, Vec2::new(0.0, 80.0), Vec2::ZERO)
                .target(EntityId::new(9))
                .duration(2.0)
                .at(Position::overlap("fade", 0.5)),
        )
        .phase(
            Phase::new(
                Property::BackgroundColor,
                Value::color("#000000").unwrap(),
                Value::color("#ffffff").unwrap(),
            )
            .target(EntityId::new(9))
            .duration(0.5),
        )
        .build()
        .unwrap()
}

#[test]
fn progress_is_clamped() {
    let timeline = mixed_timeline();
    for p in [-1.0, -0.001, f64::NEG_INFINITY] {
        assert_eq!(timeline.evaluate(p), timeline.evaluate(0.0));
    }
    for p in [1.001, 7.0, f64::INFINITY] {
        assert_eq!(timeline.evaluate(p), timeline.evaluate(1.0));
    }
    assert_eq!(timeline.evaluate(f64::NAN), timeline.evaluate(0.0));
    assert_eq!(timeline.evaluate(3.0).progress(), 1.0);
}

#[test]
fn evaluation_is_deterministic() {
    let timeline = mixed_timeline();
    for i in 0..=20 {
        let p = f64::from(i) / 20.0;
        assert_eq!(timeline.evaluate(p), timeline.evaluate(p));
    }
}

#[test]
fn boundaries_are_continuous() {
    let e = EntityId::new(1);
    let timeline = Timeline::builder()
        .phase(
            Phase::new(Property::Opacity, 0.0, 1.0)
                .target(e)
                .at(Position::at(0.2))
                .duration(0.3),
        )
        .duration(1.0)
        .build()
        .unwrap();

    assert!(opacity_at(&timeline, e, 0.2).abs() < EPS);
    assert!((opacity_at(&timeline, e, 0.5) - 1.0).abs() < EPS);
    assert!((opacity_at(&timeline, e, 0.35) - 0.5).abs() < EPS);
    // Outside the window the endpoints hold.
    assert_eq!(opacity_at(&timeline, e, 0.0), 0.0);
    assert_eq!(opacity_at(&timeline, e, 0.9), 1.0);
}

#[test]
fn stagger_orders_entities() {
    let first = EntityId::new(20);
    let last = first.offset(3);
    let timeline = Timeline::builder()
        .phase(
            Phase::new(Property::Opacity, 0.0, 1.0)
                .targets(first.range(4))
                .duration(0.4)
                .stagger(Stagger::each(0.1))
                .at(Position::at(0.0)),
        )
        .duration(1.0)
        .build()
        .unwrap();

    for i in 1..40 {
        let p = 0.1 + 0.3 * f64::from(i) / 40.0;
        let a = opacity_at(&timeline, first, p);
        let b = opacity_at(&timeline, last, p);
        assert!(a > b, "entity 0 ({a}) should lead entity 3 ({b}) at {p}");
    }
    // Both finished once the last one is done.
    assert_eq!(opacity_at(&timeline, first, 0.7), 1.0);
    assert_eq!(opacity_at(&timeline, last, 0.7), 1.0);
}

#[test]
fn staggered_targets_reach_end_value_at_their_own_window_end() {
    let first = EntityId::new(30);
    let timeline = Timeline::builder()
        .phase(
            Phase::new(Property::Opacity, 0.0, 1.0)
                .targets(first.range(8))
                .duration(0.3)
                .stagger(Stagger::each(0.1))
                .at(Position::at(0.0)),
        )
        .duration(1.0)
        .build()
        .unwrap();

    let resolved = &timeline.phases()[0];
    for (i, entity) in first.range(8).enumerate() {
        let end = resolved.start() + resolved.delays()[i] + resolved.duration();
        assert_eq!(resolved.local_progress(i, end), 1.0, "target {i} at {end}");
        assert_eq!(opacity_at(&timeline, entity, end), 1.0, "target {i} at {end}");
    }
}

fn visibility(threshold: f64) -> Result<Timeline, ConfigurationError> {
    Timeline::builder()
        .phase(
            Phase::new(Property::Visibility, "hidden", "visible")
                .target(EntityId::new(3))
                .duration(0.5)
                .step_at(threshold)
                .at(Position::at(0.5)),
        )
        .duration(1.0)
        .build()
}

fn visibility_at(timeline: &Timeline, progress: f64) -> String {
    timeline
        .evaluate(progress)
        .get(EntityId::new(3), &Property::Visibility)
        .and_then(Value::as_discrete)
        .unwrap()
        .to_string()
}

#[test]
fn discrete_values_hold_endpoints_outside_their_window() {
    let eager = visibility(0.0).unwrap();
    assert_eq!(visibility_at(&eager, 0.1), "hidden");
    assert_eq!(visibility_at(&eager, 0.5), "hidden");
    assert_eq!(visibility_at(&eager, 0.6), "visible");

    let late = visibility(1.0).unwrap();
    assert_eq!(visibility_at(&late, 0.9), "hidden");
    assert_eq!(visibility_at(&late, 1.0), "visible");
}

#[test]
fn out_of_range_step_thresholds_are_rejected() {
    for threshold in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
        let err = visibility(threshold).unwrap_err();
        assert!(
            matches!(err, ConfigurationError::InvalidThreshold { index: 0, .. }),
            "unexpected error {err:?} for {threshold}"
        );
    }
}

#[test]
fn mutual_references_are_a_cycle() {
    let e = EntityId::new(1);
    let err = Timeline::new([
        Phase::new(Property::Opacity, 0.0, 1.0)
            .target(e)
            .named("a")
            .at(Position::with("b", 0.0)),
        Phase::new(Property::Scale, 1.0, 2.0)
            .target(e)
            .named("b")
            .at(Position::after("a", 0.0)),
    ])
    .unwrap_err();
    assert!(
        matches!(err, ConfigurationError::Cycle { .. }),
        "unexpected error {err:?}"
    );
}

#[test]
fn colors_interpolate_componentwise() {
    let timeline = mixed_timeline();
    let card = EntityId::new(9);
    let bg = |p: f64| {
        timeline
            .evaluate(p)
            .get(card, &Property::BackgroundColor)
            .and_then(Value::as_color)
            .unwrap()
    };
    assert_eq!(bg(0.0).components, [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(bg(1.0).components, [1.0, 1.0, 1.0, 1.0]);

    let phase = &timeline.phases()[2];
    let mid = phase.start() + phase.duration() / 2.0;
    let [r, g, b, a] = bg(mid).components;
    for c in [r, g, b] {
        assert!((c - 0.5).abs() < 1e-4, "component {c}");
    }
    assert_eq!(a, 1.0);
}

#[test]
fn vector_translation_follows_overlap() {
    let timeline = mixed_timeline();
    let card = EntityId::new(9);
    let fade = timeline.phase("fade").unwrap();
    let translate = &timeline.phases()[1];
    // Starts halfway through the fade window.
    let window = fade.window();
    let expected = window.start + (window.end - window.start) * 0.5;
    assert!((translate.start() - expected).abs() < EPS);

    let before = timeline.evaluate(translate.start());
    assert_eq!(
        before.get(card, &Property::Translate),
        Some(&Value::Vec2(Vec2::new(0.0, 80.0)))
    );
    let after = timeline.evaluate(1.0);
    assert_eq!(
        after.get(card, &Property::Translate),
        Some(&Value::Vec2(Vec2::ZERO))
    );
}

#[test]
fn split_text_drives_staggered_phase() {
    let base = EntityId::new(500);
    let units = split_to_units("Speak with impact", SplitUnit::Word);
    let timeline = Timeline::new([Phase::new(Property::TranslateY, 40.0, 0.0)
        .targets(units.iter().map(|u| u.entity(base)))
        .duration(0.6)
        .stagger(Stagger::amount(0.4))])
    .unwrap();

    let state = timeline.evaluate(0.5);
    assert_eq!(state.len(), 3);
    let ys: Vec<f64> = units
        .iter()
        .map(|u| state.scalar(u.entity(base), &Property::TranslateY).unwrap())
        .collect();
    assert!(ys[0] < ys[1] && ys[1] < ys[2], "{ys:?}");
}

#[test]
fn evaluate_into_reuses_state() {
    let timeline = mixed_timeline();
    let mut state = timeline.evaluate(1.0);
    timeline.evaluate_into(0.25, &mut state);
    assert_eq!(state, timeline.evaluate(0.25));
    assert!(!state.pinned());
}
