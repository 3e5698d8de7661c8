// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-driven playback.
//!
//! Not every animation follows the scrollbar. Here a one-shot intro reveals
//! the navigation after a short delay, and a call-to-action bobs up and
//! down forever, both driven by a fixed 60 Hz clock.
//!
//! Run:
//! - `cargo run -p understory_demos --example playback_intro`

use kurbo::Vec2;
use understory_demos::print_state;
use understory_timeline::{EntityId, Phase, Property, RenderState, Stagger, Timeline};
use understory_timing::{Playback, Repeat};

const NAV_ITEMS: EntityId = EntityId::new(0);
const CTA: EntityId = EntityId::new(20);

fn main() {
    env_logger::init();

    let intro = Timeline::new([
        Phase::new(Property::Opacity, 0.0, 1.0)
            .targets(NAV_ITEMS.range(4))
            .duration(0.4)
            .ease("power3.out".parse().unwrap())
            .stagger(Stagger::amount(0.3)),
        Phase::new(Property::Translate, Vec2::new(0.0, -12.0), Vec2::ZERO)
            .targets(NAV_ITEMS.range(4))
            .duration(0.4)
            .ease("power3.out".parse().unwrap())
            .stagger(Stagger::amount(0.3))
            .at("<".parse().unwrap()),
    ])
    .unwrap();
    let bob = Timeline::new([Phase::new(Property::TranslateY, 0.0, -8.0)
        .target(CTA)
        .ease("sine.inOut".parse().unwrap())])
    .unwrap();

    let mut intro_clock = Playback::new(0.7).delay(0.25);
    let mut bob_clock = Playback::new(1.2).repeat(Repeat::Infinite).yoyo(true);

    let mut state = RenderState::new();
    let dt = 1.0 / 60.0;
    for frame in 0..=90 {
        let intro_progress = intro_clock.advance(dt);
        let bob_progress = bob_clock.advance(dt);
        if frame % 15 != 0 {
            continue;
        }
        println!("-- t = {:.2}s", f64::from(frame) * dt);
        intro.evaluate_into(intro_progress, &mut state);
        print_state("intro", &state);
        bob.evaluate_into(bob_progress, &mut state);
        print_state("cta", &state);
    }
    println!("intro finished: {}", intro_clock.is_finished());
}
