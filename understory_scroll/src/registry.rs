// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The registry binding timelines to scroll regions.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::Size;
use understory_timeline::{RenderState, Timeline};
use understory_timing::{FrameGate, FrameToken, Smoother};

use crate::host::ScrollHost;
use crate::region::{RegionEvents, RegionState, ResolvedSpan, TriggerRegion};
use crate::slots::{Key, Slots};

/// Consecutive failed layout attempts before a region is abandoned.
pub const DEFAULT_MAX_LAYOUT_RETRIES: u32 = 30;

/// Identifier of a region in a [`ScrollRegistry`].
///
/// Ids are generational: once the region is removed the id stays stale even
/// if its slot is reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegionId(u32, u32);

impl RegionId {
    const fn key(self) -> Key {
        (self.0, self.1)
    }
}

/// Identifier of a binding in a [`ScrollRegistry`].
///
/// Passing it to [`ScrollRegistry::dispose`] tears the binding down.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BindingId(u32, u32);

impl BindingId {
    const fn key(self) -> Key {
        (self.0, self.1)
    }
}

/// Registry tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollConfig {
    /// Frames a region may fail to lay out in a row before it is abandoned
    /// until the next resize or [`refresh`](ScrollRegistry::refresh).
    pub max_layout_retries: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            max_layout_retries: DEFAULT_MAX_LAYOUT_RETRIES,
        }
    }
}

/// A region's state change during one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// The region that changed.
    pub region: RegionId,
    /// State before the frame.
    pub from: RegionState,
    /// State after the frame.
    pub to: RegionState,
    /// Toggle events implied by the change.
    pub events: RegionEvents,
}

/// What happened during [`ScrollRegistry::on_frame`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// The frame token was stale or cancelled and nothing ran.
    pub stale: bool,
    /// Number of apply callbacks invoked.
    pub applied: usize,
    /// Region state changes, in region order.
    pub transitions: Vec<Transition>,
    /// Regions whose layout is unavailable and will be retried.
    pub pending_layout: usize,
}

type ApplyFn = Box<dyn FnMut(&RenderState)>;

struct Binding {
    region: RegionId,
    timeline: Timeline,
    apply: ApplyFn,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("region", &self.region)
            .field("timeline", &self.timeline)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct RegionEntry<E> {
    region: TriggerRegion<E>,
    span: Option<ResolvedSpan>,
    failures: u32,
    abandoned: bool,
    state: RegionState,
    smoother: Smoother,
    dirty: bool,
    /// Binding created by [`ScrollRegistry::bind_to_scroll`] that owns this region.
    owner: Option<BindingId>,
}

impl<E> RegionEntry<E> {
    fn needs_frame(&self) -> bool {
        !self.abandoned && (self.dirty || (self.span.is_some() && !self.smoother.is_settled()))
    }

    fn invalidate_layout(&mut self) {
        self.span = None;
        self.failures = 0;
        self.abandoned = false;
        self.dirty = true;
    }
}

/// Binds timelines to scroll regions and drives them from host events.
///
/// The registry is owned by the application root; there is no global
/// instance. Scroll and resize events only record the new input and request
/// an animation frame, so any number of events between two frames cost one
/// evaluation per binding. Within a frame the last scroll offset wins.
///
/// Region layout is measured lazily on the first frame after a region is
/// added, the viewport is resized, or [`refresh`](Self::refresh) is called.
/// Regions whose layout is unavailable are retried on following frames up to
/// [`ScrollConfig::max_layout_retries`].
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use kurbo::{Rect, Size};
/// use understory_scroll::{ScrollHost, ScrollRegistry, TriggerRegion};
/// use understory_timeline::{EntityId, Phase, Property, Timeline};
/// use understory_timing::FrameToken;
///
/// #[derive(Debug, Default)]
/// struct Page {
///     frames: u64,
/// }
///
/// impl ScrollHost for Page {
///     type Element = u32;
///     fn measure(&self, _: u32) -> Option<Rect> {
///         Some(Rect::new(0.0, 1000.0, 1280.0, 1400.0))
///     }
///     fn request_frame(&mut self) -> FrameToken {
///         self.frames += 1;
///         FrameToken::new(self.frames)
///     }
///     fn cancel_frame(&mut self, _: FrameToken) {}
///     fn attach_listeners(&mut self) {}
///     fn detach_listeners(&mut self) {}
/// }
///
/// let card = EntityId::new(1);
/// let timeline = Timeline::new([Phase::new(Property::Opacity, 0.0, 1.0).target(card)]).unwrap();
///
/// let opacity = Rc::new(Cell::new(f64::NAN));
/// let sink = opacity.clone();
/// let mut registry = ScrollRegistry::new(Page::default());
/// let binding = registry.bind_to_scroll(timeline, TriggerRegion::new(7), move |state| {
///     sink.set(state.scalar(card, &Property::Opacity).unwrap());
/// });
///
/// registry.on_resize(Size::new(1280.0, 800.0));
/// registry.on_scroll(800.0);
/// let token = registry.pending_frame().unwrap();
/// registry.on_frame(token, 1.0 / 60.0);
/// assert_eq!(opacity.get(), 0.5);
///
/// assert!(registry.dispose(binding));
/// assert!(!registry.dispose(binding));
/// ```
pub struct ScrollRegistry<H: ScrollHost> {
    host: H,
    config: ScrollConfig,
    regions: Slots<RegionEntry<H::Element>>,
    bindings: Slots<Binding>,
    gate: FrameGate,
    scroll: f64,
    viewport: Size,
    listening: bool,
    scratch: RenderState,
    /// Progress and pin state of the regions updated by the current frame.
    updated: HashMap<RegionId, (f64, bool)>,
}

impl<H: ScrollHost + fmt::Debug> fmt::Debug for ScrollRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollRegistry")
            .field("host", &self.host)
            .field("config", &self.config)
            .field("regions", &self.regions.len())
            .field("bindings", &self.bindings.len())
            .field("pending_frame", &self.gate.pending())
            .field("scroll", &self.scroll)
            .field("viewport", &self.viewport)
            .field("listening", &self.listening)
            .finish_non_exhaustive()
    }
}

impl<H: ScrollHost> ScrollRegistry<H> {
    /// Creates an empty registry with the default configuration.
    pub fn new(host: H) -> Self {
        Self::with_config(host, ScrollConfig::default())
    }

    /// Creates an empty registry.
    pub fn with_config(host: H, config: ScrollConfig) -> Self {
        Self {
            host,
            config,
            regions: Slots::default(),
            bindings: Slots::default(),
            gate: FrameGate::new(),
            scroll: 0.0,
            viewport: Size::ZERO,
            listening: false,
            scratch: RenderState::new(),
            updated: HashMap::new(),
        }
    }

    /// Returns the host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the host mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Returns the last scroll offset received.
    pub fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    /// Returns the last viewport size received.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Returns the token of the outstanding frame request, if any.
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.gate.pending()
    }

    /// Returns the number of live regions.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Returns the number of live bindings.
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Registers a region. Its progress is computed on the next frame.
    pub fn add_region(&mut self, region: TriggerRegion<H::Element>) -> RegionId {
        let element = region.element();
        let smoother = Smoother::new(region.lag());
        let (idx, generation) = self.regions.insert(RegionEntry {
            region,
            span: None,
            failures: 0,
            abandoned: false,
            state: RegionState::Before,
            smoother,
            dirty: true,
            owner: None,
        });
        let id = RegionId(idx, generation);
        log::debug!("added region {id:?} for element {element:?}");
        self.schedule();
        id
    }

    /// Removes a region together with every binding on it.
    ///
    /// Returns `false` if the region was already gone.
    pub fn remove_region(&mut self, id: RegionId) -> bool {
        if self.regions.remove(id.key()).is_none() {
            return false;
        }
        let doomed: Vec<Key> = self
            .bindings
            .iter()
            .filter(|(_, b)| b.region == id)
            .map(|(key, _)| key)
            .collect();
        for key in &doomed {
            self.bindings.remove(*key);
        }
        log::debug!("removed region {id:?} and {} bindings", doomed.len());
        self.settle();
        true
    }

    /// Binds a timeline to an existing region.
    ///
    /// Several bindings may share a region; they are evaluated from the same
    /// progress in the same frame. Returns `None` if the region is gone.
    pub fn bind(
        &mut self,
        region: RegionId,
        timeline: Timeline,
        apply: impl FnMut(&RenderState) + 'static,
    ) -> Option<BindingId> {
        self.regions.get(region.key())?;
        Some(self.insert_binding(region, timeline, Box::new(apply)))
    }

    /// Creates a region and binds a timeline to it.
    ///
    /// The region belongs to the binding and is removed when the binding is
    /// disposed.
    pub fn bind_to_scroll(
        &mut self,
        timeline: Timeline,
        region: TriggerRegion<H::Element>,
        apply: impl FnMut(&RenderState) + 'static,
    ) -> BindingId {
        let region = self.add_region(region);
        let id = self.insert_binding(region, timeline, Box::new(apply));
        if let Some(entry) = self.regions.get_mut(region.key()) {
            entry.owner = Some(id);
        }
        id
    }

    fn insert_binding(&mut self, region: RegionId, timeline: Timeline, apply: ApplyFn) -> BindingId {
        if let Some(entry) = self.regions.get_mut(region.key()) {
            entry.dirty = true;
        }
        let (idx, generation) = self.bindings.insert(Binding {
            region,
            timeline,
            apply,
        });
        let id = BindingId(idx, generation);
        if !self.listening {
            self.host.attach_listeners();
            self.listening = true;
            log::debug!("attached scroll listeners");
        }
        log::debug!("bound {id:?} to region {region:?}");
        self.schedule();
        id
    }

    /// Tears a binding down.
    ///
    /// The apply callback is never called again, even by a frame that was
    /// already requested. An owned region is removed with it, the pending
    /// frame is cancelled when nothing else needs it, and host listeners are
    /// detached after the last binding. Returns `false` if the binding was
    /// already disposed.
    pub fn dispose(&mut self, id: BindingId) -> bool {
        let Some(binding) = self.bindings.remove(id.key()) else {
            log::trace!("{id:?} already disposed");
            return false;
        };
        let region = binding.region;
        let owned = self
            .regions
            .get(region.key())
            .is_some_and(|entry| entry.owner == Some(id));
        if owned {
            self.regions.remove(region.key());
        }
        log::debug!("disposed {id:?}");
        self.settle();
        true
    }

    /// Replaces the timeline of a binding, for example after a breakpoint
    /// change. Returns `false` if the binding is gone.
    pub fn set_timeline(&mut self, id: BindingId, timeline: Timeline) -> bool {
        let Some(binding) = self.bindings.get_mut(id.key()) else {
            return false;
        };
        binding.timeline = timeline;
        let region = binding.region;
        if let Some(entry) = self.regions.get_mut(region.key()) {
            entry.dirty = true;
        }
        self.schedule();
        true
    }

    /// Returns the region a binding reads its progress from.
    pub fn binding_region(&self, id: BindingId) -> Option<RegionId> {
        self.bindings.get(id.key()).map(|b| b.region)
    }

    /// Removes every binding and region.
    pub fn dispose_all(&mut self) {
        let count = self.bindings.len();
        self.bindings.clear();
        self.regions.clear();
        self.settle();
        log::debug!("disposed all {count} bindings");
    }

    /// Re-measures every region on the next frame, and retries abandoned ones.
    pub fn refresh(&mut self) {
        for (_, entry) in self.regions.iter_mut() {
            entry.invalidate_layout();
        }
        self.schedule();
    }

    /// Returns where the scroll position is relative to a region.
    pub fn region_state(&self, id: RegionId) -> RegionState {
        self.regions
            .get(id.key())
            .map_or(RegionState::Disposed, |entry| entry.state)
    }

    /// Returns the progress last applied for a region, in `0..=1`.
    pub fn progress(&self, id: RegionId) -> Option<f64> {
        self.regions.get(id.key()).map(|entry| entry.smoother.value())
    }

    /// Returns the cached span of a region, if its layout has resolved.
    pub fn span(&self, id: RegionId) -> Option<ResolvedSpan> {
        self.regions.get(id.key()).and_then(|entry| entry.span)
    }

    /// Returns `true` if the region gave up waiting for layout.
    pub fn is_abandoned(&self, id: RegionId) -> bool {
        self.regions.get(id.key()).is_some_and(|entry| entry.abandoned)
    }

    /// Records a scroll offset. Non-finite offsets are ignored.
    pub fn on_scroll(&mut self, offset: f64) {
        if !offset.is_finite() {
            return;
        }
        self.scroll = offset;
        for (_, entry) in self.regions.iter_mut() {
            entry.dirty = true;
        }
        self.schedule();
    }

    /// Records a viewport size and invalidates every region's layout.
    pub fn on_resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.refresh();
    }

    /// Runs one animation frame.
    ///
    /// `dt` is the time since the previous frame in seconds; it only matters
    /// for regions with scrub lag. Frames with a stale or cancelled token are
    /// ignored.
    pub fn on_frame(&mut self, token: FrameToken, dt: f64) -> FrameReport {
        if !self.gate.begin(token) {
            return FrameReport {
                stale: true,
                ..FrameReport::default()
            };
        }
        let mut report = FrameReport::default();
        let Self {
            host,
            config,
            regions,
            bindings,
            scroll,
            viewport,
            scratch,
            updated,
            ..
        } = self;

        updated.clear();
        for ((idx, generation), entry) in regions.iter_mut() {
            if !entry.needs_frame() {
                continue;
            }
            let id = RegionId(idx, generation);
            let span = match entry.span {
                Some(span) => span,
                None => {
                    let measured = host.measure(entry.region.element());
                    match entry.region.resolve(measured, *viewport) {
                        Ok(span) => {
                            log::debug!("region {id:?} spans {}..{}", span.start, span.end);
                            entry.span = Some(span);
                            entry.failures = 0;
                            span
                        }
                        Err(err) => {
                            entry.failures += 1;
                            if entry.failures >= config.max_layout_retries {
                                entry.abandoned = true;
                                entry.dirty = false;
                                log::warn!(
                                    "abandoning region {id:?} after {} layout attempts: {err}",
                                    entry.failures
                                );
                            } else {
                                log::debug!(
                                    "layout unavailable for region {id:?} (attempt {}): {err}",
                                    entry.failures
                                );
                                report.pending_layout += 1;
                            }
                            continue;
                        }
                    }
                }
            };

            let raw = span.raw_progress(*scroll);
            let target = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) };
            entry.smoother.set_target(target);
            let progress = entry.smoother.advance(dt);
            entry.dirty = false;

            let state = RegionState::from_progress(raw);
            if state != entry.state {
                let events = RegionEvents::between(entry.state, state);
                log::debug!("region {id:?} {:?} -> {state:?} ({events:?})", entry.state);
                report.transitions.push(Transition {
                    region: id,
                    from: entry.state,
                    to: state,
                    events,
                });
                entry.state = state;
            }
            let pinned = entry.region.is_pinned() && state == RegionState::Active;
            updated.insert(id, (progress, pinned));
        }

        for (_, binding) in bindings.iter_mut() {
            if let Some(&(progress, pinned)) = updated.get(&binding.region) {
                binding.timeline.evaluate_into(progress, scratch);
                scratch.set_pinned(pinned);
                (binding.apply)(scratch);
                report.applied += 1;
            }
        }
        log::trace!(
            "frame {token:?}: {} regions updated, {} applied",
            updated.len(),
            report.applied
        );

        // Scrub lag and layout retries continue on later frames.
        self.schedule();
        report
    }

    fn has_work(&self) -> bool {
        self.regions.iter().any(|(_, entry)| entry.needs_frame())
    }

    fn schedule(&mut self) {
        if !self.has_work() {
            return;
        }
        let host = &mut self.host;
        if self.gate.request(|| host.request_frame()) {
            log::trace!("requested frame {:?}", self.gate.pending());
        }
    }

    /// Drops the frame request and listeners once nothing needs them.
    fn settle(&mut self) {
        if !self.has_work() {
            if let Some(token) = self.gate.cancel() {
                self.host.cancel_frame(token);
                log::trace!("cancelled frame {token:?}");
            }
        }
        if self.bindings.is_empty() && self.listening {
            self.host.detach_listeners();
            self.listening = false;
            log::debug!("detached scroll listeners");
        }
    }
}
