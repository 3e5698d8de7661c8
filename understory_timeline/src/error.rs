// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::string::String;

/// A timeline or phase description that cannot be resolved.
///
/// Returned by [`Timeline::new`](crate::Timeline::new) and
/// [`TimelineBuilder::build`](crate::TimelineBuilder::build). Indices refer to
/// the position of the offending entry in declaration order (labels and holds
/// included).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// The timeline has no phases.
    #[error("timeline has no phases")]
    Empty,
    /// A phase has no target entities.
    #[error("phase {index} has no targets")]
    NoTargets {
        /// Entry index.
        index: usize,
    },
    /// A phase or hold duration is zero, negative, or not finite.
    #[error("entry {index} has non-positive duration {duration}")]
    NonPositiveDuration {
        /// Entry index.
        index: usize,
        /// The rejected duration.
        duration: f64,
    },
    /// A stagger step or amount is negative or not finite.
    #[error("phase {index} has invalid stagger {value}")]
    InvalidStagger {
        /// Entry index.
        index: usize,
        /// The rejected stagger value.
        value: f64,
    },
    /// A discrete step threshold is outside `0..=1` or not finite.
    #[error("phase {index} has step threshold {threshold} outside 0..=1")]
    InvalidThreshold {
        /// Entry index.
        index: usize,
        /// The rejected threshold.
        threshold: f64,
    },
    /// A position offset is not finite.
    #[error("entry {index} has a non-finite position")]
    NonFinitePosition {
        /// Entry index.
        index: usize,
    },
    /// The `from` and `to` values of a phase cannot be interpolated.
    #[error("phase {index} interpolates between mismatched value kinds")]
    MismatchedValues {
        /// Entry index.
        index: usize,
    },
    /// Two entries share a name.
    #[error("name `{name}` is declared more than once")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },
    /// A position references a name that no entry declares.
    #[error("entry {index} references undeclared name `{name}`")]
    UnknownReference {
        /// Entry index.
        index: usize,
        /// The missing name.
        name: String,
    },
    /// A position references an entry declared after it.
    #[error("entry {index} references `{name}`, which is declared after it")]
    ForwardReference {
        /// Entry index.
        index: usize,
        /// The referenced name.
        name: String,
    },
    /// Named position references form a cycle.
    #[error("position references form a cycle through `{name}`")]
    Cycle {
        /// A name on the cycle.
        name: String,
    },
    /// An entry resolves to a start before the beginning of the timeline.
    #[error("entry {index} resolves to negative start {start}")]
    NegativeStart {
        /// Entry index.
        index: usize,
        /// The resolved start, in timeline units.
        start: f64,
    },
    /// An explicit total duration does not cover every phase.
    #[error("timeline duration {duration} is shorter than its content ({required})")]
    DurationTooShort {
        /// The explicit duration.
        duration: f64,
        /// The end of the last entry.
        required: f64,
    },
}

/// A string that does not describe a valid value of the target type.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Invalid ease notation.
    #[error("invalid ease `{0}`")]
    Ease(String),
    /// Invalid position notation.
    #[error("invalid position `{0}`")]
    Position(String),
    /// Invalid colour notation.
    #[error("invalid color `{0}`")]
    Color(String),
}
