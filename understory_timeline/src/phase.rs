// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Phases: one property animated across a set of entities.

use alloc::borrow::Cow;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `abs`
use smallvec::SmallVec;

use crate::ease::Ease;
use crate::entity::EntityId;
use crate::position::Position;
use crate::value::{Property, Value};

/// Default duration of a phase, in timeline units.
pub const DEFAULT_DURATION: f64 = 1.0;

/// Default eased progress at which discrete values switch.
pub const DEFAULT_STEP_THRESHOLD: f64 = 0.5;

/// One interpolation unit.
///
/// A phase animates a single [`Property`] from one [`Value`] to another
/// across its target entities. Durations, staggers and positions are in
/// timeline units; the timeline normalizes them into fractions of progress
/// when it is built.
///
/// ```rust
/// use understory_timeline::{EntityId, Phase, Property, Stagger};
///
/// let words = EntityId::new(10).range(4);
/// let reveal = Phase::new(Property::Opacity, 0.0, 1.0)
///     .targets(words)
///     .duration(0.6)
///     .stagger(Stagger::each(0.1))
///     .ease("back.out(1.7)".parse().unwrap())
///     .named("headline");
/// assert_eq!(reveal.target_count(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct Phase {
    pub(crate) name: Option<Cow<'static, str>>,
    pub(crate) targets: SmallVec<[EntityId; 4]>,
    pub(crate) property: Property,
    pub(crate) from: Value,
    pub(crate) to: Value,
    pub(crate) ease: Ease,
    pub(crate) duration: f64,
    pub(crate) stagger: Option<Stagger>,
    pub(crate) position: Option<Position>,
    pub(crate) threshold: f64,
}

impl Phase {
    /// Creates a phase animating `property` from `from` to `to`.
    ///
    /// The phase starts with no targets, a linear ease, a duration of
    /// [`DEFAULT_DURATION`], and is appended at the end of its timeline.
    #[must_use]
    pub fn new(property: Property, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self {
            name: None,
            targets: SmallVec::new(),
            property,
            from: from.into(),
            to: to.into(),
            ease: Ease::Linear,
            duration: DEFAULT_DURATION,
            stagger: None,
            position: None,
            threshold: DEFAULT_STEP_THRESHOLD,
        }
    }

    /// Adds one target entity.
    #[must_use]
    pub fn target(mut self, entity: EntityId) -> Self {
        self.targets.push(entity);
        self
    }

    /// Adds target entities in stagger order.
    #[must_use]
    pub fn targets(mut self, entities: impl IntoIterator<Item = EntityId>) -> Self {
        self.targets.extend(entities);
        self
    }

    /// Sets the per-entity duration.
    #[must_use]
    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the easing curve.
    #[must_use]
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Staggers the start of each target.
    #[must_use]
    pub fn stagger(mut self, stagger: Stagger) -> Self {
        self.stagger = Some(stagger);
        self
    }

    /// Places the phase on its timeline.
    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Names the phase so later positions can refer to it.
    #[must_use]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the eased progress at which discrete values switch to `to`.
    ///
    /// Must lie in `0..=1`. Before its window a target always shows `from`
    /// and after it `to`; the threshold only matters in between.
    #[must_use]
    pub fn step_at(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Returns the phase name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the animated property.
    #[must_use]
    pub fn property(&self) -> &Property {
        &self.property
    }

    /// Returns the target entities in stagger order.
    #[must_use]
    pub fn target_entities(&self) -> &[EntityId] {
        &self.targets
    }

    /// Returns the number of targets.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Returns the per-entity duration.
    #[must_use]
    pub fn per_entity_duration(&self) -> f64 {
        self.duration
    }

    /// Returns the `from` and `to` values.
    #[must_use]
    pub fn values(&self) -> (&Value, &Value) {
        (&self.from, &self.to)
    }
}

/// How a stagger step is specified.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StaggerTiming {
    /// Time between consecutive entities.
    Each(f64),
    /// Total time between the first and last entity to start.
    Amount(f64),
}

/// Which entity starts first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum StaggerFrom {
    /// The first target.
    #[default]
    Start,
    /// The last target.
    End,
    /// The middle target(s), spreading outwards.
    Center,
    /// The target at this index, spreading outwards.
    Index(usize),
}

/// Per-entity start offsets within a phase.
///
/// Entity delays are proportional to their distance from the
/// [`StaggerFrom`] origin; the earliest entity always starts with the phase.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stagger {
    /// Step or total spread.
    pub timing: StaggerTiming,
    /// Origin of the stagger.
    pub from: StaggerFrom,
}

impl Stagger {
    /// Starts each entity `step` after the one before it.
    #[must_use]
    pub const fn each(step: f64) -> Self {
        Self {
            timing: StaggerTiming::Each(step),
            from: StaggerFrom::Start,
        }
    }

    /// Spreads entity starts evenly over `total`.
    #[must_use]
    pub const fn amount(total: f64) -> Self {
        Self {
            timing: StaggerTiming::Amount(total),
            from: StaggerFrom::Start,
        }
    }

    /// Sets the origin.
    #[must_use]
    pub const fn from(mut self, from: StaggerFrom) -> Self {
        self.from = from;
        self
    }

    pub(crate) fn value(&self) -> f64 {
        match self.timing {
            StaggerTiming::Each(v) | StaggerTiming::Amount(v) => v,
        }
    }

    /// Computes each entity's delay, in timeline units.
    pub(crate) fn delays(&self, count: usize) -> SmallVec<[f64; 8]> {
        let mut out: SmallVec<[f64; 8]> = (0..count).map(|i| self.distance(i, count)).collect();
        let min = out.iter().copied().fold(f64::INFINITY, f64::min);
        let max = out.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if out.is_empty() {
            return out;
        }
        let spread = max - min;
        let step = match self.timing {
            StaggerTiming::Each(step) => step,
            StaggerTiming::Amount(total) if spread > 0.0 => total / spread,
            StaggerTiming::Amount(_) => 0.0,
        };
        for d in &mut out {
            *d = (*d - min) * step;
        }
        out
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "Target counts are far below 2^52."
    )]
    fn distance(&self, i: usize, count: usize) -> f64 {
        let last = count.saturating_sub(1);
        match self.from {
            StaggerFrom::Start => i as f64,
            StaggerFrom::End => (last - i) as f64,
            StaggerFrom::Center => (i as f64 - last as f64 / 2.0).abs(),
            StaggerFrom::Index(origin) => (i as f64 - origin.min(last) as f64).abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_steps_from_start() {
        let d = Stagger::each(0.1).delays(4);
        assert_eq!(d.len(), 4);
        assert_eq!(d[0], 0.0);
        assert!((d[3] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn end_origin_reverses_order() {
        let d = Stagger::each(0.5).from(StaggerFrom::End).delays(3);
        assert_eq!(d.as_slice(), &[1.0, 0.5, 0.0]);
    }

    #[test]
    fn center_origin_spreads_outwards() {
        let d = Stagger::each(1.0).from(StaggerFrom::Center).delays(5);
        assert_eq!(d.as_slice(), &[2.0, 1.0, 0.0, 1.0, 2.0]);

        // Even counts: the middle pair starts together.
        let d = Stagger::each(1.0).from(StaggerFrom::Center).delays(4);
        assert_eq!(d.as_slice(), &[1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn index_origin_is_clamped_to_targets() {
        let d = Stagger::each(1.0).from(StaggerFrom::Index(9)).delays(3);
        assert_eq!(d.as_slice(), &[2.0, 1.0, 0.0]);
    }

    #[test]
    fn amount_spreads_over_total() {
        let d = Stagger::amount(0.9).delays(4);
        assert!((d[1] - 0.3).abs() < 1e-12);
        assert!((d[3] - 0.9).abs() < 1e-12);
        // A single target has nothing to spread over.
        assert_eq!(Stagger::amount(0.9).delays(1).as_slice(), &[0.0]);
    }

    #[test]
    fn builder_collects_targets_in_order() {
        let phase = Phase::new(Property::TranslateY, 100.0, 0.0)
            .target(EntityId(3))
            .targets([EntityId(1), EntityId(2)]);
        assert_eq!(
            phase.target_entities(),
            &[EntityId(3), EntityId(1), EntityId(2)]
        );
        assert_eq!(phase.per_entity_duration(), DEFAULT_DURATION);
        assert_eq!(phase.name(), None);
    }
}
