// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_scroll::{ScrollHost, ScrollRegistry, TriggerRegion};
use understory_timeline::{EntityId, Phase, Property, Stagger, Timeline};
use understory_timing::{FrameToken, Lag};

/// Sections stacked vertically, one viewport tall each.
struct Page {
    sections: u32,
    frames: u64,
}

impl ScrollHost for Page {
    type Element = u32;

    fn measure(&self, element: u32) -> Option<Rect> {
        (element < self.sections).then(|| {
            let top = f64::from(element) * 800.0;
            Rect::new(0.0, top, 1280.0, top + 800.0)
        })
    }

    fn request_frame(&mut self) -> FrameToken {
        self.frames += 1;
        FrameToken::new(self.frames)
    }

    fn cancel_frame(&mut self, _: FrameToken) {}
    fn attach_listeners(&mut self) {}
    fn detach_listeners(&mut self) {}
}

fn build_registry(sections: u32, lag: Lag) -> ScrollRegistry<Page> {
    let mut registry = ScrollRegistry::new(Page {
        sections,
        frames: 0,
    });
    for section in 0..sections {
        let words = EntityId::new(section * 100).range(12);
        let timeline = Timeline::builder()
            .phase(
                Phase::new(Property::Opacity, 0.0, 1.0)
                    .targets(words.clone())
                    .stagger(Stagger::each(0.1)),
            )
            .phase(
                Phase::new(Property::TranslateY, 40.0, 0.0)
                    .targets(words)
                    .stagger(Stagger::each(0.1))
                    .at("<".parse().unwrap()),
            )
            .hold(1.0)
            .build()
            .expect("benchmark timeline is valid");
        let region = TriggerRegion::new(section)
            .start("top top".parse().unwrap())
            .end("+=200vh".parse().unwrap())
            .pinned(true)
            .scrub(lag);
        registry.bind_to_scroll(timeline, region, |state| {
            black_box(state);
        });
    }
    registry.on_resize(Size::new(1280.0, 800.0));
    if let Some(token) = registry.pending_frame() {
        registry.on_frame(token, 1.0 / 60.0);
    }
    registry
}

fn bench_scroll_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_scroll");

    for &sections in &[8_u32, 64] {
        group.bench_function(format!("scroll_and_frame(s={sections})"), |b| {
            let mut registry = build_registry(sections, Lag::Immediate);
            let mut offset = 0.0;
            b.iter(|| {
                offset = (offset + 37.0) % (f64::from(sections) * 800.0);
                registry.on_scroll(offset);
                let token = registry.pending_frame().expect("scroll requests a frame");
                black_box(registry.on_frame(token, 1.0 / 60.0));
            });
        });

        group.bench_function(format!("scrubbed_frame(s={sections})"), |b| {
            b.iter_batched(
                || {
                    let mut registry = build_registry(sections, Lag::Seconds(1.0));
                    registry.on_scroll(f64::from(sections) * 400.0);
                    registry
                },
                |mut registry| {
                    if let Some(token) = registry.pending_frame() {
                        black_box(registry.on_frame(token, 1.0 / 60.0));
                    }
                    registry
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("resize_and_relayout(s={sections})"), |b| {
            let mut registry = build_registry(sections, Lag::Immediate);
            let mut tall = false;
            b.iter(|| {
                tall = !tall;
                let height = if tall { 900.0 } else { 800.0 };
                registry.on_resize(Size::new(1280.0, height));
                let token = registry.pending_frame().expect("resize requests a frame");
                black_box(registry.on_frame(token, 1.0 / 60.0));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scroll_frame);
criterion_main!(benches);
