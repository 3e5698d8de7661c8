// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinned hero section.
//!
//! A heading split into characters flips up one character at a time while
//! the hero stays pinned, then the hero content shrinks and blurs away.
//! Timing is chosen by viewport width and swapped when the page resizes.
//!
//! Run:
//! - `cargo run -p understory_demos --example pinned_hero`
//! - `RUST_LOG=debug cargo run -p understory_demos --example pinned_hero`

use kurbo::Size;
use understory_demos::{SimulatedPage, print_state};
use understory_scroll::{Responsive, ScrollRegistry, TriggerRegion};
use understory_timeline::{
    EntityId, Phase, Position, Property, SplitUnit, Stagger, Timeline, split_to_units,
};
use understory_timing::Lag;

const HEADING: &str = "Before We Begin";
const HEADING_BASE: EntityId = EntityId::new(100);
const SUBTITLE: EntityId = EntityId::new(1);
const CONTENT: EntityId = EntityId::new(2);
const BACKGROUND: EntityId = EntityId::new(3);

#[derive(Clone, Copy, Debug)]
struct HeroTiming {
    stagger: f64,
    duration: f64,
}

fn hero_timeline(timing: HeroTiming) -> Timeline {
    let chars: Vec<_> = split_to_units(HEADING, SplitUnit::Char)
        .iter()
        .map(|unit| unit.entity(HEADING_BASE))
        .collect();
    let ease = "power2.out".parse().unwrap();
    let stagger = Stagger::each(timing.stagger);

    Timeline::builder()
        .phase(
            Phase::new(Property::TranslateY, 100.0, 0.0)
                .targets(chars.iter().copied())
                .duration(timing.duration)
                .ease(ease)
                .stagger(stagger)
                .named("heading"),
        )
        .phase(
            Phase::new(Property::RotateX, -90.0, 0.0)
                .targets(chars.iter().copied())
                .duration(timing.duration)
                .ease(ease)
                .stagger(stagger)
                .at(Position::with_previous(0.0)),
        )
        .phase(
            Phase::new(Property::Opacity, 0.0, 1.0)
                .targets(chars)
                .duration(timing.duration)
                .ease(ease)
                .stagger(stagger)
                .at(Position::with_previous(0.0)),
        )
        .phase(
            Phase::new(Property::Opacity, 0.0, 1.0)
                .target(SUBTITLE)
                .duration(timing.duration)
                .ease(ease)
                .at(Position::with("heading", 0.0)),
        )
        .phase(
            Phase::new(Property::Scale, 1.0, 0.9)
                .target(CONTENT)
                .duration(timing.duration)
                .named("exit")
                .at(Position::append(-0.5)),
        )
        .phase(
            Phase::new(Property::Opacity, 1.0, 0.0)
                .target(CONTENT)
                .duration(timing.duration)
                .at(Position::with("exit", 0.0)),
        )
        .phase(
            Phase::new(Property::Blur, 0.0, 5.0)
                .target(CONTENT)
                .duration(timing.duration)
                .at(Position::with("exit", 0.0)),
        )
        .phase(
            Phase::new(Property::Opacity, 1.0, 0.0)
                .target(BACKGROUND)
                .duration(timing.duration)
                .at(Position::with_previous(0.0)),
        )
        .build()
        .unwrap_or_else(|err| panic!("hero timeline is invalid: {err}"))
}

fn main() {
    env_logger::init();

    // Phones get a tighter stagger so the heading finishes in less scroll.
    let timing = Responsive::new(HeroTiming {
        stagger: 0.15,
        duration: 5.0,
    })
    .at_least(768.0, HeroTiming {
        stagger: 0.3,
        duration: 8.0,
    });

    let mut page = SimulatedPage::new();
    let hero = page.section("hero", 800.0);
    page.section("cards", 2400.0);

    let mut registry = ScrollRegistry::new(page);
    registry.on_resize(Size::new(1280.0, 800.0));

    let region = TriggerRegion::new(hero)
        .start("top top".parse().unwrap())
        .end("bottom top".parse().unwrap())
        .pinned(true)
        .scrub(Lag::Seconds(4.0));
    let binding = registry.bind_to_scroll(
        hero_timeline(*timing.select(1280.0)),
        region,
        |state| print_state("hero", state),
    );

    // Jump halfway, then let the scrub catch up over a few seconds of frames.
    registry.on_scroll(400.0);
    for frame in 0..6 {
        let Some(token) = registry.pending_frame() else {
            break;
        };
        println!("-- frame {frame}");
        let report = registry.on_frame(token, 0.75);
        for transition in &report.transitions {
            println!(
                "   {:?} -> {:?} ({:?})",
                transition.from, transition.to, transition.events
            );
        }
    }

    // Rotate to a phone: new viewport, new timing.
    println!("-- resize to 375 wide");
    registry.on_resize(Size::new(375.0, 812.0));
    registry.set_timeline(binding, hero_timeline(*timing.select(375.0)));
    registry.on_scroll(1200.0);
    for _ in 0..120 {
        let Some(token) = registry.pending_frame() else {
            break;
        };
        registry.on_frame(token, 1.0);
    }

    registry.dispose(binding);
    println!("disposed; listening: {}", registry.host().is_listening());
}
