// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigger regions: the scroll span that progress is measured over.

use kurbo::{Rect, Size};
use understory_timing::Lag;

use crate::offset::ScrollOffset;

/// Layout that cannot produce a usable region span yet.
///
/// This is transient: elements may not be measured on the first frame after
/// they are inserted, and a resize often fixes a degenerate span. The
/// registry retries on later frames instead of surfacing it.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutUnavailable {
    /// The host returned no measurement for the reference element.
    #[error("reference element is not measured")]
    Unmeasured,
    /// The reference element has no height.
    #[error("reference element has zero size")]
    ZeroSize,
    /// No viewport size has been reported yet.
    #[error("viewport size is unknown")]
    NoViewport,
    /// The end offset does not resolve after the start offset.
    #[error("region span {start}..{end} is empty")]
    EmptySpan {
        /// Resolved start scroll position.
        start: f64,
        /// Resolved end scroll position.
        end: f64,
    },
}

/// A region's start and end resolved against the current layout.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResolvedSpan {
    /// Scroll position at which progress is `0`.
    pub start: f64,
    /// Scroll position at which progress is `1`.
    pub end: f64,
}

impl ResolvedSpan {
    /// Returns the unclamped progress at scroll position `offset`.
    #[must_use]
    pub fn raw_progress(&self, offset: f64) -> f64 {
        (offset - self.start) / (self.end - self.start)
    }

    /// Returns the span length in pixels.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Where the scroll position is relative to a region.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum RegionState {
    /// Above the region's start (or not yet laid out).
    #[default]
    Before,
    /// Strictly between start and end.
    Active,
    /// At or past the region's end.
    Passed,
    /// The region has been removed.
    Disposed,
}

impl RegionState {
    /// Classifies unclamped progress.
    #[must_use]
    pub fn from_progress(raw: f64) -> Self {
        if raw >= 1.0 {
            Self::Passed
        } else if raw > 0.0 {
            Self::Active
        } else {
            Self::Before
        }
    }
}

bitflags::bitflags! {
    /// Toggle events reported when a region changes state.
    ///
    /// A single frame can cross a whole region; a jump from before to past the
    /// region reports both `ENTER` and `LEAVE`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RegionEvents: u8 {
        /// Scrolled into the region from above.
        const ENTER      = 0b0001;
        /// Scrolled out of the region through its end.
        const LEAVE      = 0b0010;
        /// Scrolled back into the region from below.
        const ENTER_BACK = 0b0100;
        /// Scrolled back out of the region through its start.
        const LEAVE_BACK = 0b1000;
    }
}

impl RegionEvents {
    /// Returns the events for a change from `from` to `to`.
    #[must_use]
    pub fn between(from: RegionState, to: RegionState) -> Self {
        use RegionState::{Active, Before, Passed};
        match (from, to) {
            (Before, Active) => Self::ENTER,
            (Before, Passed) => Self::ENTER | Self::LEAVE,
            (Active, Passed) => Self::LEAVE,
            (Passed, Active) => Self::ENTER_BACK,
            (Passed, Before) => Self::ENTER_BACK | Self::LEAVE_BACK,
            (Active, Before) => Self::LEAVE_BACK,
            _ => Self::empty(),
        }
    }
}

/// A scroll span tied to a reference element.
///
/// The default region runs from `"top bottom"` (the element starts to enter
/// the viewport) to `"bottom top"` (it has left), is not pinned, and applies
/// progress without lag.
///
/// ```rust
/// use understory_scroll::{ScrollOffset, TriggerRegion};
/// use understory_timing::Lag;
///
/// let section = TriggerRegion::new(3_u32)
///     .start("top top".parse().unwrap())
///     .end("+=800vh".parse().unwrap())
///     .pinned(true)
///     .scrub(Lag::Seconds(5.0));
/// assert_eq!(section.start_offset(), ScrollOffset::TOP_TOP);
/// assert!(section.is_pinned());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerRegion<E> {
    element: E,
    start: ScrollOffset,
    end: ScrollOffset,
    pinned: bool,
    scrub: Lag,
}

impl<E: Copy> TriggerRegion<E> {
    /// Creates a region over `element` with default offsets.
    #[must_use]
    pub fn new(element: E) -> Self {
        Self {
            element,
            start: ScrollOffset::TOP_BOTTOM,
            end: ScrollOffset::BOTTOM_TOP,
            pinned: false,
            scrub: Lag::Immediate,
        }
    }

    /// Sets where progress is `0`.
    #[must_use]
    pub fn start(mut self, start: ScrollOffset) -> Self {
        self.start = start;
        self
    }

    /// Sets where progress is `1`.
    #[must_use]
    pub fn end(mut self, end: ScrollOffset) -> Self {
        self.end = end;
        self
    }

    /// Holds the reference element in place while the region is active.
    #[must_use]
    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    /// Lets applied progress trail the scroll position.
    #[must_use]
    pub fn scrub(mut self, lag: Lag) -> Self {
        self.scrub = lag;
        self
    }

    /// Returns the reference element.
    #[must_use]
    pub fn element(&self) -> E {
        self.element
    }

    /// Returns the start offset.
    #[must_use]
    pub fn start_offset(&self) -> ScrollOffset {
        self.start
    }

    /// Returns the end offset.
    #[must_use]
    pub fn end_offset(&self) -> ScrollOffset {
        self.end
    }

    /// Returns `true` if the region pins its element.
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Returns the scrub lag.
    #[must_use]
    pub fn lag(&self) -> Lag {
        self.scrub
    }

    /// Resolves the span against a measurement of the reference element.
    ///
    /// `element` is in document coordinates: its `y0` is the scroll position
    /// at which the element's top meets the viewport's top.
    pub fn resolve(
        &self,
        element: Option<Rect>,
        viewport: Size,
    ) -> Result<ResolvedSpan, LayoutUnavailable> {
        let rect = element.ok_or(LayoutUnavailable::Unmeasured)?;
        if rect.height().is_nan() || rect.height() <= 0.0 {
            return Err(LayoutUnavailable::ZeroSize);
        }
        if viewport.height.is_nan() || viewport.height <= 0.0 {
            return Err(LayoutUnavailable::NoViewport);
        }
        let (top, height, vh) = (rect.y0, rect.height(), viewport.height);
        let start = self.start.resolve(top, height, vh, top);
        let end = self.end.resolve(top, height, vh, start);
        if end > start && start.is_finite() && end.is_finite() {
            Ok(ResolvedSpan { start, end })
        } else {
            Err(LayoutUnavailable::EmptySpan { start, end })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(1280.0, 800.0);

    #[test]
    fn default_span_covers_visibility() {
        let region = TriggerRegion::new(0_u8);
        let span = region
            .resolve(Some(Rect::new(0.0, 1000.0, 100.0, 1400.0)), VIEWPORT)
            .unwrap();
        assert_eq!(span, ResolvedSpan { start: 200.0, end: 1400.0 });
        assert_eq!(span.raw_progress(800.0), 0.5);
    }

    #[test]
    fn relative_end_measures_from_start() {
        let region = TriggerRegion::new(0_u8)
            .start(ScrollOffset::TOP_TOP)
            .end("+=1200".parse().unwrap());
        let span = region
            .resolve(Some(Rect::new(0.0, 500.0, 100.0, 900.0)), VIEWPORT)
            .unwrap();
        assert_eq!(span, ResolvedSpan { start: 500.0, end: 1700.0 });
    }

    #[test]
    fn unusable_layout() {
        let region = TriggerRegion::new(0_u8);
        assert_eq!(
            region.resolve(None, VIEWPORT),
            Err(LayoutUnavailable::Unmeasured)
        );
        assert_eq!(
            region.resolve(Some(Rect::new(0.0, 10.0, 100.0, 10.0)), VIEWPORT),
            Err(LayoutUnavailable::ZeroSize)
        );
        assert_eq!(
            region.resolve(Some(Rect::new(0.0, 10.0, 100.0, 20.0)), Size::ZERO),
            Err(LayoutUnavailable::NoViewport)
        );
        let inverted = TriggerRegion::new(0_u8)
            .start(ScrollOffset::BOTTOM_TOP)
            .end(ScrollOffset::TOP_TOP);
        assert!(matches!(
            inverted.resolve(Some(Rect::new(0.0, 0.0, 10.0, 50.0)), VIEWPORT),
            Err(LayoutUnavailable::EmptySpan { .. })
        ));
    }

    #[test]
    fn states_from_progress() {
        assert_eq!(RegionState::from_progress(-0.5), RegionState::Before);
        assert_eq!(RegionState::from_progress(0.0), RegionState::Before);
        assert_eq!(RegionState::from_progress(0.01), RegionState::Active);
        assert_eq!(RegionState::from_progress(1.0), RegionState::Passed);
    }

    #[test]
    fn transition_events() {
        use RegionState::{Active, Before, Passed};
        assert_eq!(RegionEvents::between(Before, Active), RegionEvents::ENTER);
        assert_eq!(
            RegionEvents::between(Before, Passed),
            RegionEvents::ENTER | RegionEvents::LEAVE
        );
        assert_eq!(RegionEvents::between(Passed, Active), RegionEvents::ENTER_BACK);
        assert_eq!(
            RegionEvents::between(Passed, Before),
            RegionEvents::ENTER_BACK | RegionEvents::LEAVE_BACK
        );
        assert_eq!(RegionEvents::between(Active, Before), RegionEvents::LEAVE_BACK);
        assert!(RegionEvents::between(Active, Active).is_empty());
    }
}
