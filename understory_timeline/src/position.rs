// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement of timeline entries.

use alloc::borrow::Cow;
use alloc::string::ToString;
use core::str::FromStr;

use crate::error::ParseError;

/// What a relative [`Position`] is measured from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Everything declared so far, as one span starting at zero.
    Sequence,
    /// The most recently declared phase or hold (labels are skipped).
    Previous,
    /// A named phase, hold, or label declared earlier.
    Named(Cow<'static, str>),
}

/// Which end of the anchor span an offset is applied to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// The anchor's start.
    Start,
    /// The anchor's end.
    End,
}

/// Distance from the anchor edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Offset {
    /// In timeline units.
    Time(f64),
    /// As a fraction of the anchor's span.
    Fraction(f64),
}

/// Where an entry starts on its timeline.
///
/// Entries without an explicit position are appended at the end of the
/// sequence. Relative positions resolve against entries declared earlier;
/// forward references are rejected when the timeline is built.
///
/// Positions parse from the shorthand used by scroll animation code:
///
/// | Notation | Meaning |
/// | --- | --- |
/// | `"1.5"` | absolute time |
/// | `"+=0.3"`, `"-=1"` | after the end of the sequence so far |
/// | `"<"`, `"<12"`, `"<-0.5"` | relative to the previous entry's start |
/// | `">"`, `">0.5"` | relative to the previous entry's end |
/// | `"<80%"`, `">-25%"` | as a fraction of the previous entry's span |
///
/// ```rust
/// use understory_timeline::{Anchor, Edge, Offset, Position};
///
/// let p: Position = "-=0.5".parse().unwrap();
/// assert_eq!(p, Position::append(-0.5));
///
/// let p: Position = "<80%".parse().unwrap();
/// assert_eq!(
///     p,
///     Position::Relative {
///         anchor: Anchor::Previous,
///         edge: Edge::Start,
///         offset: Offset::Fraction(0.8),
///     }
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Position {
    /// A fixed time from the start of the timeline.
    Absolute(f64),
    /// An offset from an edge of another span.
    Relative {
        /// The span measured from.
        anchor: Anchor,
        /// The edge of the span.
        edge: Edge,
        /// The distance from that edge.
        offset: Offset,
    },
}

impl Position {
    /// Starts at a fixed time.
    #[must_use]
    pub const fn at(time: f64) -> Self {
        Self::Absolute(time)
    }

    /// Starts `offset` after the end of everything declared so far.
    #[must_use]
    pub const fn append(offset: f64) -> Self {
        Self::Relative {
            anchor: Anchor::Sequence,
            edge: Edge::End,
            offset: Offset::Time(offset),
        }
    }

    /// Starts `offset` after the previous entry starts.
    #[must_use]
    pub const fn with_previous(offset: f64) -> Self {
        Self::Relative {
            anchor: Anchor::Previous,
            edge: Edge::Start,
            offset: Offset::Time(offset),
        }
    }

    /// Starts `offset` after the previous entry ends.
    #[must_use]
    pub const fn after_previous(offset: f64) -> Self {
        Self::Relative {
            anchor: Anchor::Previous,
            edge: Edge::End,
            offset: Offset::Time(offset),
        }
    }

    /// Starts once `fraction` of the previous entry's span has elapsed.
    #[must_use]
    pub const fn overlap_previous(fraction: f64) -> Self {
        Self::Relative {
            anchor: Anchor::Previous,
            edge: Edge::Start,
            offset: Offset::Fraction(fraction),
        }
    }

    /// Starts `offset` after the named entry starts.
    #[must_use]
    pub fn with(name: impl Into<Cow<'static, str>>, offset: f64) -> Self {
        Self::Relative {
            anchor: Anchor::Named(name.into()),
            edge: Edge::Start,
            offset: Offset::Time(offset),
        }
    }

    /// Starts `offset` after the named entry ends.
    #[must_use]
    pub fn after(name: impl Into<Cow<'static, str>>, offset: f64) -> Self {
        Self::Relative {
            anchor: Anchor::Named(name.into()),
            edge: Edge::End,
            offset: Offset::Time(offset),
        }
    }

    /// Starts once `fraction` of the named entry's span has elapsed.
    #[must_use]
    pub fn overlap(name: impl Into<Cow<'static, str>>, fraction: f64) -> Self {
        Self::Relative {
            anchor: Anchor::Named(name.into()),
            edge: Edge::Start,
            offset: Offset::Fraction(fraction),
        }
    }

    /// Returns the name this position depends on, if any.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Relative {
                anchor: Anchor::Named(name),
                ..
            } => Some(name.as_ref()),
            _ => None,
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        match self {
            Self::Absolute(t) => t.is_finite(),
            Self::Relative { offset, .. } => match offset {
                Offset::Time(v) | Offset::Fraction(v) => v.is_finite(),
            },
        }
    }
}

/// Resolves `offset` from an anchor span `start..start + span`.
pub(crate) fn resolve_from(edge: Edge, offset: Offset, start: f64, span: f64) -> f64 {
    let base = match edge {
        Edge::Start => start,
        Edge::End => start + span,
    };
    match offset {
        Offset::Time(t) => base + t,
        Offset::Fraction(f) => base + f * span,
    }
}

impl FromStr for Position {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::Position(s.to_string());
        let input = s.trim();
        let number = |text: &str| -> Result<f64, ParseError> {
            let v = text.trim().parse::<f64>().map_err(|_| err())?;
            if v.is_finite() { Ok(v) } else { Err(err()) }
        };

        if let Some(rest) = input.strip_prefix("+=") {
            return Ok(Self::append(number(rest)?));
        }
        if let Some(rest) = input.strip_prefix("-=") {
            return Ok(Self::append(-number(rest)?));
        }

        let edge = match input.as_bytes().first() {
            Some(b'<') => Some(Edge::Start),
            Some(b'>') => Some(Edge::End),
            _ => None,
        };
        let Some(edge) = edge else {
            return Ok(Self::Absolute(number(input)?));
        };

        let rest = input[1..].trim();
        let rest = rest.strip_prefix("+=").unwrap_or(rest);
        let offset = if rest.is_empty() {
            Offset::Time(0.0)
        } else if let Some(pct) = rest.strip_suffix('%') {
            Offset::Fraction(number(pct)? / 100.0)
        } else if let Some(neg) = rest.strip_prefix("-=") {
            Offset::Time(-number(neg)?)
        } else {
            Offset::Time(number(rest)?)
        };
        Ok(Self::Relative {
            anchor: Anchor::Previous,
            edge,
            offset,
        })
    }
}
