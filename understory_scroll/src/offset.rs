// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigger offsets and their string notation.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

/// A trigger offset string that does not parse.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid trigger offset `{0}`")]
pub struct ParseOffsetError(pub String);

/// A point along an element or the viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EdgeRef {
    /// A fraction of the box height from its top: `top` is `0.0`, `center`
    /// is `0.5`, `bottom` is `1.0`, and `"25%"` is `0.25`.
    Fraction(f64),
    /// Pixels from the top of the box.
    Pixels(f64),
}

impl EdgeRef {
    /// The top edge.
    pub const TOP: Self = Self::Fraction(0.0);
    /// The vertical centre.
    pub const CENTER: Self = Self::Fraction(0.5);
    /// The bottom edge.
    pub const BOTTOM: Self = Self::Fraction(1.0);

    /// Returns the distance from the top of a box of height `extent`.
    #[must_use]
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Fraction(f) => f * extent,
            Self::Pixels(px) => px,
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "top" => Some(Self::TOP),
            "center" => Some(Self::CENTER),
            "bottom" => Some(Self::BOTTOM),
            _ => {
                if let Some(pct) = token.strip_suffix('%') {
                    finite(pct).map(|v| Self::Fraction(v / 100.0))
                } else {
                    finite(token.strip_suffix("px").unwrap_or(token)).map(Self::Pixels)
                }
            }
        }
    }
}

/// A scroll distance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Length {
    /// Pixels.
    Pixels(f64),
    /// A fraction of the viewport height.
    Viewport(f64),
}

impl Length {
    /// Returns the distance in pixels for a viewport of height `viewport`.
    #[must_use]
    pub fn resolve(self, viewport: f64) -> f64 {
        match self {
            Self::Pixels(px) => px,
            Self::Viewport(f) => f * viewport,
        }
    }
}

/// Where a trigger region starts or ends.
///
/// Offsets are written the way scroll animation code usually writes them:
///
/// | Notation | Meaning |
/// | --- | --- |
/// | `"top bottom"` | the element's top meets the viewport's bottom |
/// | `"center 40%"` | the element's centre is 40% down the viewport |
/// | `"top 120px"` | the element's top is 120px below the viewport's top |
/// | `"+=800"`, `"+=800px"` | 800px after the region's start |
/// | `"+=150%"`, `"+=150vh"` | one and a half viewport heights after the start |
///
/// A single edge such as `"top"` pins that point of the element to the
/// viewport's top.
///
/// ```rust
/// use understory_scroll::{EdgeRef, Length, ScrollOffset};
///
/// let start: ScrollOffset = "top 10%".parse().unwrap();
/// assert_eq!(start, ScrollOffset::Edges { element: EdgeRef::TOP, viewport: EdgeRef::Fraction(0.1) });
///
/// let end: ScrollOffset = "+=800vh".parse().unwrap();
/// assert_eq!(end, ScrollOffset::After(Length::Viewport(8.0)));
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ScrollOffset {
    /// The scroll position at which a point on the element meets a point on
    /// the viewport.
    Edges {
        /// Point on the reference element.
        element: EdgeRef,
        /// Point on the viewport.
        viewport: EdgeRef,
    },
    /// A distance past the region's start.
    ///
    /// Used as a start offset, the distance is measured from the position at
    /// which the element's top meets the viewport's top.
    After(Length),
}

impl ScrollOffset {
    /// `"top bottom"`: the element starts entering the viewport.
    pub const TOP_BOTTOM: Self = Self::Edges {
        element: EdgeRef::TOP,
        viewport: EdgeRef::BOTTOM,
    };
    /// `"top top"`: the element's top reaches the viewport's top.
    pub const TOP_TOP: Self = Self::Edges {
        element: EdgeRef::TOP,
        viewport: EdgeRef::TOP,
    };
    /// `"bottom top"`: the element has left through the top.
    pub const BOTTOM_TOP: Self = Self::Edges {
        element: EdgeRef::BOTTOM,
        viewport: EdgeRef::TOP,
    };

    /// Resolves to a scroll position.
    ///
    /// `element_top` and `element_height` are in document coordinates;
    /// `anchor` is the position [`ScrollOffset::After`] measures from.
    #[must_use]
    pub fn resolve(self, element_top: f64, element_height: f64, viewport: f64, anchor: f64) -> f64 {
        match self {
            Self::Edges {
                element,
                viewport: edge,
            } => element_top + element.resolve(element_height) - edge.resolve(viewport),
            Self::After(length) => anchor + length.resolve(viewport),
        }
    }
}

impl FromStr for ScrollOffset {
    type Err = ParseOffsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseOffsetError(s.to_string());
        let input = s.trim();
        if let Some(rest) = input.strip_prefix("+=") {
            let rest = rest.trim();
            let length = if let Some(vh) = rest.strip_suffix("vh") {
                finite(vh).map(|v| Length::Viewport(v / 100.0))
            } else if let Some(pct) = rest.strip_suffix('%') {
                finite(pct).map(|v| Length::Viewport(v / 100.0))
            } else {
                finite(rest.strip_suffix("px").unwrap_or(rest)).map(Length::Pixels)
            };
            return length.map(Self::After).ok_or_else(err);
        }

        let mut tokens = input.split_whitespace();
        let element = tokens.next().and_then(EdgeRef::parse).ok_or_else(err)?;
        let viewport = match tokens.next() {
            Some(token) => EdgeRef::parse(token).ok_or_else(err)?,
            None => EdgeRef::TOP,
        };
        if tokens.next().is_some() {
            return Err(err());
        }
        Ok(Self::Edges { element, viewport })
    }
}

impl fmt::Display for EdgeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Fraction(v) if v == 0.0 => f.write_str("top"),
            Self::Fraction(v) if v == 0.5 => f.write_str("center"),
            Self::Fraction(v) if v == 1.0 => f.write_str("bottom"),
            Self::Fraction(v) => write!(f, "{}%", v * 100.0),
            Self::Pixels(px) => write!(f, "{px}px"),
        }
    }
}

impl fmt::Display for ScrollOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edges { element, viewport } => write!(f, "{element} {viewport}"),
            Self::After(Length::Pixels(px)) => write!(f, "+={px}px"),
            Self::After(Length::Viewport(v)) => write!(f, "+={}vh", v * 100.0),
        }
    }
}

fn finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
