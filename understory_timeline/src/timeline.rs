// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timelines: resolution of phase positions and evaluation.

use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::ConfigurationError;
use crate::phase::Phase;
use crate::position::{Anchor, Position, resolve_from};
use crate::render::RenderState;
use crate::value::ValueKind;

/// Resolved starts this far below zero are rounding noise and snap to zero.
const START_EPSILON: f64 = 1e-9;

#[derive(Clone, Debug)]
enum Entry {
    Phase(Phase),
    Hold {
        name: Option<Cow<'static, str>>,
        duration: f64,
        position: Option<Position>,
    },
    Label {
        name: Cow<'static, str>,
        position: Option<Position>,
    },
}

impl Entry {
    fn name(&self) -> Option<&str> {
        match self {
            Self::Phase(phase) => phase.name.as_deref(),
            Self::Hold { name, .. } => name.as_deref(),
            Self::Label { name, .. } => Some(name.as_ref()),
        }
    }

    fn position(&self) -> Option<&Position> {
        match self {
            Self::Phase(phase) => phase.position.as_ref(),
            Self::Hold { position, .. } | Self::Label { position, .. } => position.as_ref(),
        }
    }
}

/// Builder for a [`Timeline`] with labels, holds, or an explicit duration.
///
/// ```rust
/// use understory_timeline::{EntityId, Phase, Position, Property, Timeline};
///
/// let section = EntityId::new(1);
/// let timeline = Timeline::builder()
///     .label("intro")
///     .phase(Phase::new(Property::Opacity, 0.0, 1.0).target(section).duration(2.0))
///     .hold(3.0)
///     .phase(
///         Phase::new(Property::Opacity, 1.0, 0.0)
///             .target(section)
///             .duration(2.0)
///             .at(Position::append(-1.0)),
///     )
///     .build()
///     .unwrap();
///
/// // 2 + 3 + 2 - 1 timeline units.
/// assert_eq!(timeline.duration(), 6.0);
/// assert_eq!(timeline.label("intro"), Some(0.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TimelineBuilder {
    entries: Vec<Entry>,
    duration: Option<f64>,
}

impl TimelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a phase.
    #[must_use]
    pub fn phase(mut self, phase: Phase) -> Self {
        self.entries.push(Entry::Phase(phase));
        self
    }

    /// Appends several phases.
    #[must_use]
    pub fn phases(mut self, phases: impl IntoIterator<Item = Phase>) -> Self {
        self.entries.extend(phases.into_iter().map(Entry::Phase));
        self
    }

    /// Appends an empty span that keeps the current state on screen.
    #[must_use]
    pub fn hold(mut self, duration: f64) -> Self {
        self.entries.push(Entry::Hold {
            name: None,
            duration,
            position: None,
        });
        self
    }

    /// Appends a named empty span at `position`.
    #[must_use]
    pub fn hold_at(
        mut self,
        name: impl Into<Cow<'static, str>>,
        duration: f64,
        position: Position,
    ) -> Self {
        self.entries.push(Entry::Hold {
            name: Some(name.into()),
            duration,
            position: Some(position),
        });
        self
    }

    /// Marks the current end of the sequence with a name.
    #[must_use]
    pub fn label(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.entries.push(Entry::Label {
            name: name.into(),
            position: None,
        });
        self
    }

    /// Marks `position` with a name.
    #[must_use]
    pub fn label_at(mut self, name: impl Into<Cow<'static, str>>, position: Position) -> Self {
        self.entries.push(Entry::Label {
            name: name.into(),
            position: Some(position),
        });
        self
    }

    /// Sets the total duration instead of deriving it from the last entry.
    ///
    /// Progress beyond the last entry then holds the final state.
    #[must_use]
    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Validates and resolves the timeline.
    pub fn build(self) -> Result<Timeline, ConfigurationError> {
        Timeline::resolve(self)
    }
}

/// A phase placed on its timeline.
///
/// Times are fractions of the timeline's total progress.
#[derive(Clone, Debug)]
pub struct ResolvedPhase {
    phase: Phase,
    start: f64,
    duration: f64,
    delays: SmallVec<[f64; 8]>,
}

impl ResolvedPhase {
    /// Returns the phase description.
    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Returns the progress at which the first target starts.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Returns the per-entity duration as a fraction of progress.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Returns the start delay of each target as a fraction of progress.
    #[must_use]
    pub fn delays(&self) -> &[f64] {
        &self.delays
    }

    /// Returns the progress window from the first start to the last finish.
    #[must_use]
    pub fn window(&self) -> Range<f64> {
        let spread = self.delays.iter().copied().fold(0.0, f64::max);
        self.start..self.start + spread + self.duration
    }

    /// Returns the local progress of target `index` at timeline `progress`.
    ///
    /// Within a billionth of either end of the target's window the result
    /// snaps to exactly `0` or `1`, so rounding in stagger delays never
    /// leaves a target short of its end value.
    #[must_use]
    pub fn local_progress(&self, index: usize, progress: f64) -> f64 {
        let delay = self.delays.get(index).copied().unwrap_or(0.0);
        let elapsed = progress - self.start - delay;
        if elapsed <= START_EPSILON {
            0.0
        } else if elapsed >= self.duration - START_EPSILON {
            1.0
        } else {
            (elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// An immutable, validated sequence of phases.
///
/// A timeline maps overall progress in `0..=1` onto a [`RenderState`].
/// Evaluation is a pure function of progress: the same input always yields
/// an equal render state, so it is safe to evaluate speculatively or out of
/// order.
///
/// When several phases animate the same property of the same entity, phases
/// apply in order of their resolved start. A phase that has started
/// overwrites earlier values; a phase that has not started yet only supplies
/// its `from` value when nothing earlier has.
///
/// ```rust
/// use understory_timeline::{EntityId, Phase, Position, Property, Timeline};
///
/// let card = EntityId::new(7);
/// let timeline = Timeline::builder()
///     .phase(Phase::new(Property::Opacity, 0.0, 1.0).target(card).duration(0.3).at(Position::at(0.2)))
///     .duration(1.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(timeline.evaluate(0.2).scalar(card, &Property::Opacity), Some(0.0));
/// assert_eq!(timeline.evaluate(0.5).scalar(card, &Property::Opacity), Some(1.0));
/// // Out-of-range progress is clamped.
/// assert_eq!(timeline.evaluate(-4.0), timeline.evaluate(0.0));
/// ```
#[derive(Clone, Debug)]
pub struct Timeline {
    phases: Vec<ResolvedPhase>,
    order: Vec<usize>,
    labels: HashMap<String, f64>,
    duration: f64,
}

impl Timeline {
    /// Builds a timeline from phases alone.
    ///
    /// Equivalent to [`Timeline::builder`] followed by
    /// [`TimelineBuilder::phases`] and [`TimelineBuilder::build`].
    pub fn new(phases: impl IntoIterator<Item = Phase>) -> Result<Self, ConfigurationError> {
        TimelineBuilder::new().phases(phases).build()
    }

    /// Returns a builder.
    #[must_use]
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::new()
    }

    /// Returns the total duration in timeline units.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Returns the resolved phases in declaration order.
    #[must_use]
    pub fn phases(&self) -> &[ResolvedPhase] {
        &self.phases
    }

    /// Returns the resolved phase with the given name.
    #[must_use]
    pub fn phase(&self, name: &str) -> Option<&ResolvedPhase> {
        self.phases.iter().find(|p| p.phase.name() == Some(name))
    }

    /// Returns the progress at which a label sits.
    #[must_use]
    pub fn label(&self, name: &str) -> Option<f64> {
        self.labels.get(name).copied()
    }

    /// Evaluates the timeline at `progress`.
    ///
    /// `progress` is clamped into `0..=1`; NaN counts as `0`.
    #[must_use]
    pub fn evaluate(&self, progress: f64) -> RenderState {
        let mut state = RenderState::new();
        self.evaluate_into(progress, &mut state);
        state
    }

    /// Evaluates into an existing render state, reusing its allocations.
    pub fn evaluate_into(&self, progress: f64, state: &mut RenderState) {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        state.reset(progress);
        for &index in &self.order {
            let resolved = &self.phases[index];
            let phase = &resolved.phase;
            for (i, &entity) in phase.targets.iter().enumerate() {
                let local = resolved.local_progress(i, progress);
                // Outside its window a target holds an endpoint, whatever the step threshold.
                let value = if local <= 0.0 {
                    phase.from.clone()
                } else if local >= 1.0 {
                    phase.to.clone()
                } else {
                    let t = phase.ease.apply(local);
                    phase.from.interpolate(&phase.to, t, phase.threshold)
                };
                state
                    .entity_mut(entity)
                    .write(&phase.property, value, local > 0.0);
            }
        }
    }

    fn resolve(builder: TimelineBuilder) -> Result<Self, ConfigurationError> {
        let TimelineBuilder { entries, duration } = builder;
        if !entries.iter().any(|e| matches!(e, Entry::Phase(_))) {
            return Err(ConfigurationError::Empty);
        }

        for (index, entry) in entries.iter().enumerate() {
            validate(index, entry)?;
        }

        let targets = {
            let names = index_names(&entries)?;
            reference_targets(&entries, &names)?
        };
        check_cycles(&entries, &targets)?;
        for (index, target) in targets.iter().enumerate() {
            if let Some(target) = *target {
                if target > index {
                    return Err(ConfigurationError::ForwardReference {
                        index,
                        name: entries[target].name().unwrap_or_default().to_string(),
                    });
                }
            }
        }

        // Place every entry in timeline units.
        let mut spans: Vec<(f64, f64)> = Vec::with_capacity(entries.len());
        let mut delays: Vec<SmallVec<[f64; 8]>> = Vec::with_capacity(entries.len());
        let mut sequence_end = 0.0_f64;
        let mut previous: Option<(f64, f64)> = None;
        for (index, entry) in entries.iter().enumerate() {
            let (span, entry_delays) = match entry {
                Entry::Phase(phase) => {
                    let d = phase
                        .stagger
                        .map(|s| s.delays(phase.targets.len()))
                        .unwrap_or_else(|| SmallVec::from_elem(0.0, phase.targets.len()));
                    let spread = d.iter().copied().fold(0.0, f64::max);
                    (phase.duration + spread, d)
                }
                Entry::Hold { duration, .. } => (*duration, SmallVec::new()),
                Entry::Label { .. } => (0.0, SmallVec::new()),
            };

            let position = entry.position().cloned().unwrap_or(Position::append(0.0));
            let start = match position {
                Position::Absolute(t) => t,
                Position::Relative {
                    anchor,
                    edge,
                    offset,
                } => {
                    let (anchor_start, anchor_span) = match anchor {
                        Anchor::Sequence => (0.0, sequence_end),
                        Anchor::Previous => previous.unwrap_or((0.0, 0.0)),
                        Anchor::Named(_) => {
                            // Validated above: the target exists and precedes us.
                            let target = targets[index].unwrap_or(index);
                            spans[target]
                        }
                    };
                    resolve_from(edge, offset, anchor_start, anchor_span)
                }
            };
            if start < -START_EPSILON {
                return Err(ConfigurationError::NegativeStart { index, start });
            }
            let start = start.max(0.0);

            spans.push((start, span));
            delays.push(entry_delays);
            sequence_end = sequence_end.max(start + span);
            if !matches!(entry, Entry::Label { .. }) {
                previous = Some((start, span));
            }
        }

        let total = match duration {
            None => sequence_end,
            Some(d) if d.is_finite() && d > 0.0 && d >= sequence_end - START_EPSILON => d,
            Some(d) => {
                return Err(ConfigurationError::DurationTooShort {
                    duration: d,
                    required: sequence_end,
                });
            }
        };

        let mut labels = HashMap::new();
        let mut phases = Vec::new();
        for ((entry, (start, _)), entry_delays) in entries.into_iter().zip(spans).zip(delays) {
            match entry {
                Entry::Phase(phase) => {
                    let delays = entry_delays.iter().map(|d| d / total).collect();
                    phases.push(ResolvedPhase {
                        start: start / total,
                        duration: phase.duration / total,
                        delays,
                        phase,
                    });
                }
                Entry::Label { name, .. } => {
                    labels.insert(name.into_owned(), start / total);
                }
                Entry::Hold { .. } => {}
            }
        }

        let mut order: Vec<usize> = (0..phases.len()).collect();
        order.sort_by(|&a, &b| {
            phases[a]
                .start
                .total_cmp(&phases[b].start)
                .then(a.cmp(&b))
        });

        log::debug!(
            "resolved timeline: {} phases, {} labels, duration {total}",
            phases.len(),
            labels.len()
        );

        Ok(Self {
            phases,
            order,
            labels,
            duration: total,
        })
    }
}

fn validate(index: usize, entry: &Entry) -> Result<(), ConfigurationError> {
    if entry.position().is_some_and(|p| !p.is_finite()) {
        return Err(ConfigurationError::NonFinitePosition { index });
    }
    match entry {
        Entry::Phase(phase) => {
            if phase.targets.is_empty() {
                return Err(ConfigurationError::NoTargets { index });
            }
            if !(phase.duration.is_finite() && phase.duration > 0.0) {
                return Err(ConfigurationError::NonPositiveDuration {
                    index,
                    duration: phase.duration,
                });
            }
            if let Some(stagger) = phase.stagger {
                let value = stagger.value();
                if !(value.is_finite() && value >= 0.0) {
                    return Err(ConfigurationError::InvalidStagger { index, value });
                }
            }
            if !(0.0..=1.0).contains(&phase.threshold) {
                return Err(ConfigurationError::InvalidThreshold {
                    index,
                    threshold: phase.threshold,
                });
            }
            let (from, to) = (phase.from.kind(), phase.to.kind());
            let discrete = from == ValueKind::Discrete || to == ValueKind::Discrete;
            if from != to && !discrete {
                return Err(ConfigurationError::MismatchedValues { index });
            }
        }
        Entry::Hold { duration, .. } => {
            if !(duration.is_finite() && *duration > 0.0) {
                return Err(ConfigurationError::NonPositiveDuration {
                    index,
                    duration: *duration,
                });
            }
        }
        Entry::Label { .. } => {}
    }
    Ok(())
}

fn index_names(entries: &[Entry]) -> Result<HashMap<&str, usize>, ConfigurationError> {
    let mut names = HashMap::new();
    for (index, entry) in entries.iter().enumerate() {
        if let Some(name) = entry.name() {
            if names.insert(name, index).is_some() {
                return Err(ConfigurationError::DuplicateName {
                    name: name.to_string(),
                });
            }
        }
    }
    Ok(names)
}

/// Maps each entry to the index of the entry its position names, if any.
fn reference_targets(
    entries: &[Entry],
    names: &HashMap<&str, usize>,
) -> Result<Vec<Option<usize>>, ConfigurationError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry.position().and_then(Position::reference) {
            None => Ok(None),
            Some(name) => names.get(name).copied().map(Some).ok_or_else(|| {
                ConfigurationError::UnknownReference {
                    index,
                    name: name.to_string(),
                }
            }),
        })
        .collect()
}

/// Each entry references at most one other, so following references from
/// any entry either terminates or revisits an entry on the current walk.
fn check_cycles(entries: &[Entry], targets: &[Option<usize>]) -> Result<(), ConfigurationError> {
    const UNSEEN: u8 = 0;
    const WALKING: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNSEEN; entries.len()];
    let mut walk = Vec::new();
    for root in 0..entries.len() {
        let mut at = Some(root);
        while let Some(node) = at {
            match state[node] {
                DONE => break,
                WALKING => {
                    return Err(ConfigurationError::Cycle {
                        name: entries[node].name().unwrap_or_default().to_string(),
                    });
                }
                _ => {
                    state[node] = WALKING;
                    walk.push(node);
                    at = targets[node];
                }
            }
        }
        for node in walk.drain(..) {
            state[node] = DONE;
        }
    }
    Ok(())
}
