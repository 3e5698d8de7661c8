// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::Vec2;
use understory_timeline::{
    Ease, EntityId, Phase, Position, Property, RenderState, Stagger, Timeline, Value,
};

/// A narrative section: alternating fades, slides, and colour changes that
/// overlap their predecessors, each over a handful of entities.
fn build_timeline(phases: u32, targets_per_phase: u32) -> Timeline {
    let eases: [Ease; 4] = [
        Ease::Linear,
        "power2.inOut".parse().unwrap(),
        "back.out(1.7)".parse().unwrap(),
        "elastic.out(1, 0.3)".parse().unwrap(),
    ];
    let black = Value::color("#000000").unwrap();
    let white = Value::color("#ffffff").unwrap();

    Timeline::new((0..phases).map(|i| {
        let base = EntityId::new(i * targets_per_phase);
        let targets = base.range(targets_per_phase);
        let phase = match i % 3 {
            0 => Phase::new(Property::Opacity, 0.0, 1.0),
            1 => Phase::new(Property::Translate, Vec2::new(0.0, 120.0), Vec2::ZERO),
            _ => Phase::new(Property::BackgroundColor, black.clone(), white.clone()),
        };
        let phase = phase
            .targets(targets)
            .duration(1.0 + f64::from(i % 4) * 0.25)
            .ease(eases[(i % 4) as usize])
            .stagger(Stagger::each(0.05));
        if i == 0 {
            phase
        } else if i % 2 == 1 {
            phase.at("<50%".parse().unwrap())
        } else {
            phase.at(Position::append(-0.2))
        }
    }))
    .expect("benchmark timeline is valid")
}

fn bench_timeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_timeline");

    for &(phases, targets) in &[(10_u32, 1_u32), (50, 1), (50, 8)] {
        let timeline = build_timeline(phases, targets);

        group.bench_function(format!("evaluate_into(p={phases},t={targets})"), |b| {
            let mut state = RenderState::new();
            let mut progress = 0.0;
            b.iter(|| {
                progress = (progress + 0.013) % 1.0;
                timeline.evaluate_into(black_box(progress), &mut state);
                black_box(&state);
            });
        });

        group.bench_function(format!("evaluate(p={phases},t={targets})"), |b| {
            b.iter(|| black_box(timeline.evaluate(black_box(0.5))));
        });
    }

    group.bench_function("build(p=50,t=8)", |b| {
        b.iter(|| black_box(build_timeline(50, 8)));
    });

    group.finish();
}

criterion_group!(benches, bench_timeline);
criterion_main!(benches);
