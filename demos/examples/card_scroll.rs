// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked card scroll.
//!
//! One region spans the whole card stack. Two bindings share it: the
//! section colours shift from pale to navy, and each card shrinks a little
//! as the cards above it pile on.
//!
//! Run:
//! - `cargo run -p understory_demos --example card_scroll`

use kurbo::Size;
use peniko::Color;
use understory_demos::{SimulatedPage, format_value};
use understory_scroll::{ScrollRegistry, TriggerRegion};
use understory_timeline::{EntityId, Phase, Position, Property, Timeline, Value};
use understory_timing::Lag;

const CARDS: u32 = 6;
const SECTION: EntityId = EntityId::new(0);
const FIRST_CARD: EntityId = EntityId::new(10);

fn colour_timeline() -> Timeline {
    let pale = Value::color("#cbd4e4").unwrap();
    let navy = Value::color("#21427d").unwrap();
    Timeline::new([
        Phase::new(Property::BackgroundColor, pale, navy).target(SECTION),
        Phase::new(Property::Color, Color::BLACK, Color::WHITE)
            .target(SECTION)
            .at(Position::with_previous(0.0)),
    ])
    .unwrap()
}

/// Card `i` starts shrinking at `i * 0.06` of the scroll and reaches
/// `1 - (CARDS - i) * 0.05` at the end.
fn card_timeline() -> Timeline {
    let phases = (0..CARDS).map(|i| {
        let start = f64::from(i) * 0.06;
        let target = 1.0 - f64::from(CARDS - i) * 0.05;
        Phase::new(Property::Scale, 1.0, target)
            .target(FIRST_CARD.offset(i))
            .duration(1.0 - start)
            .at(Position::at(start))
    });
    Timeline::builder().phases(phases).duration(1.0).build().unwrap()
}

fn main() {
    env_logger::init();

    let mut page = SimulatedPage::new();
    page.section("intro", 900.0);
    let stack = page.section("cards", 3600.0);
    page.section("footer", 600.0);
    println!("document height {}", page.height());

    let mut registry = ScrollRegistry::new(page);
    registry.on_resize(Size::new(1280.0, 900.0));

    let region = registry.add_region(
        TriggerRegion::new(stack)
            .start("top top".parse().unwrap())
            .end("bottom bottom".parse().unwrap())
            .scrub(Lag::Immediate),
    );
    registry
        .bind(region, colour_timeline(), |state| {
            if let Some(bg) = state.get(SECTION, &Property::BackgroundColor) {
                println!("   background {}", format_value(bg));
            }
        })
        .unwrap();
    registry
        .bind(region, card_timeline(), |state| {
            let scales: Vec<_> = (0..CARDS)
                .filter_map(|i| state.scalar(FIRST_CARD.offset(i), &Property::Scale))
                .map(|s| format!("{s:.3}"))
                .collect();
            println!("   card scales [{}]", scales.join(", "));
        })
        .unwrap();

    for offset in [0.0, 600.0, 900.0, 1800.0, 2700.0, 3600.0, 4200.0, 600.0] {
        registry.on_scroll(offset);
        let Some(token) = registry.pending_frame() else {
            continue;
        };
        println!("scroll {offset}");
        let report = registry.on_frame(token, 1.0 / 60.0);
        for transition in &report.transitions {
            println!("   {:?}", transition.events);
        }
        if let Some(progress) = registry.progress(region) {
            println!("   progress {progress:.3} ({:?})", registry.region_state(region));
        }
    }

    registry.dispose_all();
}
