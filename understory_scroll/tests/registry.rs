// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry behavior against a recording host.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use kurbo::{Rect, Size};
use understory_scroll::{
    FrameReport, RegionEvents, RegionState, ScrollConfig, ScrollHost, ScrollOffset,
    ScrollRegistry, TriggerRegion,
};
use understory_timeline::{EntityId, Phase, Property, RenderState, Timeline};
use understory_timing::{FrameToken, Lag};

const CARD: EntityId = EntityId(1);
const SECTION: u32 = 10;
const VIEWPORT: Size = Size::new(1280.0, 800.0);

#[derive(Debug, Default)]
struct MockHost {
    layout: HashMap<u32, Rect>,
    issued: u64,
    cancelled: Vec<FrameToken>,
    listening: bool,
    attach_calls: usize,
    detach_calls: usize,
}

impl ScrollHost for MockHost {
    type Element = u32;

    fn measure(&self, element: u32) -> Option<Rect> {
        self.layout.get(&element).copied()
    }

    fn request_frame(&mut self) -> FrameToken {
        self.issued += 1;
        FrameToken::new(self.issued)
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.cancelled.push(token);
    }

    fn attach_listeners(&mut self) {
        self.listening = true;
        self.attach_calls += 1;
    }

    fn detach_listeners(&mut self) {
        self.listening = false;
        self.detach_calls += 1;
    }
}

fn host_with_section() -> MockHost {
    let mut host = MockHost::default();
    // Default region over this element spans scroll 200..1400.
    host.layout
        .insert(SECTION, Rect::new(0.0, 1000.0, 1280.0, 1400.0));
    host
}

fn fade() -> Timeline {
    Timeline::new([Phase::new(Property::Opacity, 0.0, 1.0).target(CARD)]).unwrap()
}

type Log = Rc<RefCell<Vec<RenderState>>>;

fn recorder() -> (Log, impl FnMut(&RenderState) + 'static) {
    let log: Log = Rc::default();
    let sink = log.clone();
    (log, move |state: &RenderState| sink.borrow_mut().push(state.clone()))
}

fn run_frame(registry: &mut ScrollRegistry<MockHost>, dt: f64) -> FrameReport {
    let token = registry.pending_frame().expect("a frame should be pending");
    registry.on_frame(token, dt)
}

fn opacity(state: &RenderState) -> f64 {
    state.scalar(CARD, &Property::Opacity).unwrap()
}

#[test]
fn events_coalesce_into_one_apply_per_frame() {
    let mut registry = ScrollRegistry::new(host_with_section());
    let (log, apply) = recorder();
    registry.bind_to_scroll(fade(), TriggerRegion::new(SECTION), apply);
    registry.on_resize(VIEWPORT);
    run_frame(&mut registry, 0.016);
    assert_eq!(log.borrow().len(), 1);
    let issued = registry.host().issued;

    for offset in [300.0, 400.0, 500.0, 600.0, 800.0] {
        registry.on_scroll(offset);
    }
    assert_eq!(registry.host().issued, issued + 1, "one frame request");

    let report = run_frame(&mut registry, 0.016);
    assert_eq!(report.applied, 1);
    let log = log.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(opacity(&log[1]), 0.5);
    assert_eq!(log[1].progress(), 0.5);
}

#[test]
fn dispose_is_idempotent_and_final() {
    let mut registry = ScrollRegistry::new(host_with_section());
    let (log, apply) = recorder();
    let binding = registry.bind_to_scroll(fade(), TriggerRegion::new(SECTION), apply);
    assert!(registry.host().listening);
    registry.on_resize(VIEWPORT);
    let token = registry.pending_frame().unwrap();

    assert!(registry.dispose(binding));
    assert!(!registry.dispose(binding));
    assert!(!registry.host().listening);
    assert_eq!(registry.host().detach_calls, 1);
    assert_eq!(registry.host().cancelled, [token]);
    assert_eq!(registry.pending_frame(), None);
    assert_eq!(registry.region_count(), 0);

    // A late callback for the cancelled frame does nothing.
    let report = registry.on_frame(token, 0.016);
    assert!(report.stale);
    registry.on_scroll(900.0);
    assert_eq!(registry.pending_frame(), None);
    assert!(log.borrow().is_empty());
}

#[test]
fn stale_frame_tokens_are_ignored() {
    let mut registry = ScrollRegistry::new(host_with_section());
    let (log, apply) = recorder();
    registry.bind_to_scroll(fade(), TriggerRegion::new(SECTION), apply);
    registry.on_resize(VIEWPORT);
    let report = registry.on_frame(FrameToken::new(999), 0.016);
    assert!(report.stale);
    assert!(log.borrow().is_empty());
    assert!(registry.pending_frame().is_some());
}

#[test]
fn pinned_only_inside_the_region() {
    let mut registry = ScrollRegistry::new(host_with_section());
    let (log, apply) = recorder();
    let region = TriggerRegion::new(SECTION)
        .start(ScrollOffset::TOP_TOP)
        .end("+=1000".parse().unwrap())
        .pinned(true);
    registry.bind_to_scroll(fade(), region, apply);
    registry.on_resize(VIEWPORT);

    for (offset, pinned) in [
        (500.0, false),
        (1000.0, false),
        (1500.0, true),
        (2000.0, false),
        (2500.0, false),
    ] {
        registry.on_scroll(offset);
        run_frame(&mut registry, 0.016);
        let last = log.borrow().last().cloned().unwrap();
        assert_eq!(last.pinned(), pinned, "at {offset}");
    }
}

#[test]
fn transitions_report_toggle_events() {
    let mut registry = ScrollRegistry::new(host_with_section());
    let region = registry.add_region(TriggerRegion::new(SECTION));
    registry.on_resize(VIEWPORT);
    let report = run_frame(&mut registry, 0.016);
    assert!(report.transitions.is_empty());
    assert_eq!(registry.region_state(region), RegionState::Before);

    let mut step = |offset: f64| {
        registry.on_scroll(offset);
        let report = run_frame(&mut registry, 0.016);
        (
            registry.region_state(region),
            report
                .transitions
                .first()
                .map_or(RegionEvents::empty(), |t| t.events),
        )
    };
    assert_eq!(step(800.0), (RegionState::Active, RegionEvents::ENTER));
    assert_eq!(step(900.0), (RegionState::Active, RegionEvents::empty()));
    assert_eq!(step(1500.0), (RegionState::Passed, RegionEvents::LEAVE));
    assert_eq!(step(1000.0), (RegionState::Active, RegionEvents::ENTER_BACK));
    assert_eq!(step(0.0), (RegionState::Before, RegionEvents::LEAVE_BACK));
    assert_eq!(
        step(5000.0),
        (RegionState::Passed, RegionEvents::ENTER | RegionEvents::LEAVE)
    );
}

#[test]
fn fan_out_shares_progress() {
    let mut registry = ScrollRegistry::new(host_with_section());
    let region = registry.add_region(TriggerRegion::new(SECTION));
    let (a, apply_a) = recorder();
    let (b, apply_b) = recorder();
    let grow = Timeline::new([Phase::new(Property::Scale, 1.0, 3.0).target(CARD)]).unwrap();
    registry.bind(region, fade(), apply_a).unwrap();
    registry.bind(region, grow, apply_b).unwrap();
    registry.on_resize(VIEWPORT);
    registry.on_scroll(500.0);

    let report = run_frame(&mut registry, 0.016);
    assert_eq!(report.applied, 2);
    assert_eq!(a.borrow()[0].progress(), b.borrow()[0].progress());
    assert_eq!(opacity(&a.borrow()[0]), 0.25);
    assert_eq!(b.borrow()[0].scalar(CARD, &Property::Scale), Some(1.5));
    assert_eq!(registry.progress(region), Some(0.25));
}

#[test]
fn binding_to_removed_region_fails() {
    let mut registry = ScrollRegistry::new(host_with_section());
    let region = registry.add_region(TriggerRegion::new(SECTION));
    let (_, apply) = recorder();
    let binding = registry.bind(region, fade(), apply).unwrap();
    assert!(registry.remove_region(region));
    assert!(!registry.remove_region(region));
    assert_eq!(registry.region_state(region), RegionState::Disposed);
    assert_eq!(registry.binding_region(binding), None);
    assert!(!registry.dispose(binding));

    let (_, apply) = recorder();
    assert!(registry.bind(region, fade(), apply).is_none());
    assert!(!registry.host().listening);
}

#[test]
fn layout_retries_are_capped() {
    let mut registry = ScrollRegistry::with_config(
        MockHost::default(),
        ScrollConfig {
            max_layout_retries: 3,
        },
    );
    let (log, apply) = recorder();
    let binding = registry.bind_to_scroll(fade(), TriggerRegion::new(SECTION), apply);
    let region = registry.binding_region(binding).unwrap();
    registry.on_resize(VIEWPORT);

    assert_eq!(run_frame(&mut registry, 0.016).pending_layout, 1);
    assert_eq!(run_frame(&mut registry, 0.016).pending_layout, 1);
    assert_eq!(run_frame(&mut registry, 0.016).pending_layout, 0);
    assert!(registry.is_abandoned(region));
    assert_eq!(registry.pending_frame(), None);

    // Scrolling does not revive an abandoned region.
    registry.on_scroll(800.0);
    assert_eq!(registry.pending_frame(), None);

    // Layout arrives; a refresh retries.
    registry
        .host_mut()
        .layout
        .insert(SECTION, Rect::new(0.0, 1000.0, 1280.0, 1400.0));
    registry.refresh();
    assert!(!registry.is_abandoned(region));
    run_frame(&mut registry, 0.016);
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(opacity(&log.borrow()[0]), 0.5);
}

#[test]
fn degenerate_span_keeps_retrying() {
    let mut registry = ScrollRegistry::new(host_with_section());
    let (log, apply) = recorder();
    // Resolves to 1000..500 at any viewport size.
    let region = TriggerRegion::new(SECTION)
        .start(ScrollOffset::TOP_TOP)
        .end("top 500px".parse().unwrap());
    let binding = registry.bind_to_scroll(fade(), region, apply);
    let region = registry.binding_region(binding).unwrap();
    registry.on_resize(VIEWPORT);
    let report = run_frame(&mut registry, 0.016);
    assert_eq!(report.pending_layout, 1);
    assert_eq!(registry.span(region), None);
    assert!(log.borrow().is_empty());

    registry.on_resize(Size::new(400.0, 300.0));
    assert_eq!(registry.span(region), None);
    let report = run_frame(&mut registry, 0.016);
    assert_eq!(report.pending_layout, 1);
}

#[test]
fn layout_is_cached_until_resize() {
    let mut registry = ScrollRegistry::new(host_with_section());
    let region = registry.add_region(TriggerRegion::new(SECTION));
    registry.on_resize(VIEWPORT);
    run_frame(&mut registry, 0.016);
    let span = registry.span(region).unwrap();
    assert_eq!((span.start, span.end), (200.0, 1400.0));

    // Moving the element is only picked up after a refresh.
    registry
        .host_mut()
        .layout
        .insert(SECTION, Rect::new(0.0, 2000.0, 1280.0, 2400.0));
    registry.on_scroll(10.0);
    run_frame(&mut registry, 0.016);
    assert_eq!(registry.span(region), Some(span));

    registry.refresh();
    run_frame(&mut registry, 0.016);
    assert_eq!(registry.span(region).unwrap().start, 1200.0);
}

#[test]
fn scrub_lag_trails_and_settles() {
    let mut registry = ScrollRegistry::new(host_with_section());
    let (log, apply) = recorder();
    let binding = registry.bind_to_scroll(
        fade(),
        TriggerRegion::new(SECTION).scrub(Lag::Seconds(1.0)),
        apply,
    );
    let region = registry.binding_region(binding).unwrap();
    registry.on_resize(VIEWPORT);
    run_frame(&mut registry, 0.016);
    assert_eq!(registry.progress(region), Some(0.0));

    registry.on_scroll(1400.0);
    run_frame(&mut registry, 0.1);
    let first = registry.progress(region).unwrap();
    assert!(first > 0.0 && first < 1.0, "{first}");
    // The region state follows the scroll position, not the lagging value.
    assert_eq!(registry.region_state(region), RegionState::Passed);

    let mut frames = 0;
    while registry.pending_frame().is_some() {
        run_frame(&mut registry, 0.1);
        frames += 1;
        assert!(frames < 100, "scrub never settled");
    }
    assert_eq!(registry.progress(region), Some(1.0));
    let log = log.borrow();
    assert!(log.windows(2).all(|w| opacity(&w[0]) <= opacity(&w[1])));
    assert_eq!(opacity(log.last().unwrap()), 1.0);
}

#[test]
fn set_timeline_reapplies() {
    let mut registry = ScrollRegistry::new(host_with_section());
    let (log, apply) = recorder();
    let binding = registry.bind_to_scroll(fade(), TriggerRegion::new(SECTION), apply);
    registry.on_resize(VIEWPORT);
    registry.on_scroll(800.0);
    run_frame(&mut registry, 0.016);

    let dim = Timeline::new([Phase::new(Property::Opacity, 1.0, 0.0).target(CARD)]).unwrap();
    assert!(registry.set_timeline(binding, dim));
    run_frame(&mut registry, 0.016);
    let log = log.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(opacity(&log[1]), 0.5);
    assert_eq!(log[1].scalar(CARD, &Property::Opacity), Some(0.5));
}

#[test]
fn frames_only_apply_regions_updated_in_that_frame() {
    let mut registry = ScrollRegistry::new(host_with_section());
    let (first_log, first_apply) = recorder();
    let (second_log, second_apply) = recorder();
    let first = registry.bind_to_scroll(fade(), TriggerRegion::new(SECTION), first_apply);
    registry.bind_to_scroll(fade(), TriggerRegion::new(SECTION), second_apply);
    registry.on_resize(VIEWPORT);
    registry.on_scroll(800.0);
    assert_eq!(run_frame(&mut registry, 0.016).applied, 2);

    // Only the first region is dirty now; the second must not be replayed
    // from the previous frame's progress.
    let dim = Timeline::new([Phase::new(Property::Opacity, 1.0, 0.0).target(CARD)]).unwrap();
    assert!(registry.set_timeline(first, dim));
    let report = run_frame(&mut registry, 0.016);
    assert_eq!(report.applied, 1);
    assert_eq!(first_log.borrow().len(), 2);
    assert_eq!(second_log.borrow().len(), 1);
    assert!(registry.pending_frame().is_none());
}

#[test]
fn dispose_all_clears_everything() {
    let mut registry = ScrollRegistry::new(host_with_section());
    let ids: Vec<_> = (0..3)
        .map(|_| {
            let (_, apply) = recorder();
            registry.bind_to_scroll(fade(), TriggerRegion::new(SECTION), apply)
        })
        .collect();
    assert_eq!(registry.host().attach_calls, 1);
    registry.dispose_all();
    assert_eq!(registry.binding_count(), 0);
    assert_eq!(registry.region_count(), 0);
    assert_eq!(registry.pending_frame(), None);
    assert_eq!(registry.host().detach_calls, 1);
    assert!(ids.into_iter().all(|id| !registry.dispose(id)));
}
