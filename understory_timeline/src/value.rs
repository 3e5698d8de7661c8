// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animated properties and the values they take.

use alloc::borrow::Cow;
use alloc::string::ToString;

use kurbo::Vec2;
use peniko::Color;
use peniko::color::{Srgb, parse_color};

use crate::error::ParseError;

/// A visual attribute a phase animates.
///
/// The engine attaches no meaning to these beyond identity; the render
/// collaborator decides how each maps onto its surface.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Opacity, `0.0..=1.0`.
    Opacity,
    /// Horizontal translation.
    TranslateX,
    /// Vertical translation.
    TranslateY,
    /// Combined 2D translation.
    Translate,
    /// Uniform scale.
    Scale,
    /// Horizontal scale.
    ScaleX,
    /// Vertical scale.
    ScaleY,
    /// In-plane rotation, in degrees.
    Rotate,
    /// Rotation around the horizontal axis, in degrees.
    RotateX,
    /// Rotation around the vertical axis, in degrees.
    RotateY,
    /// Blur radius.
    Blur,
    /// Foreground colour.
    Color,
    /// Background colour.
    BackgroundColor,
    /// Background offset.
    BackgroundPosition,
    /// Radius of a circular reveal clip, as a fraction of the element diagonal.
    ClipRadius,
    /// Discrete visibility state.
    Visibility,
    /// Anything else, by name.
    Custom(Cow<'static, str>),
}

/// The kind of a [`Value`], used to check that a phase can interpolate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Scalar`].
    Scalar,
    /// [`Value::Vec2`].
    Vec2,
    /// [`Value::Color`].
    Color,
    /// [`Value::Discrete`].
    Discrete,
}

/// A resolved property value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A number.
    Scalar(f64),
    /// A 2D vector.
    Vec2(Vec2),
    /// An sRGB colour with alpha.
    Color(Color),
    /// A non-numeric state such as `"visible"` or `"hidden"`.
    Discrete(Cow<'static, str>),
}

impl Value {
    /// Parses a CSS colour string (`"#cbd4e4"`, `"rgb(0 0 0)"`, `"transparent"`).
    pub fn color(s: &str) -> Result<Self, ParseError> {
        let color = parse_color(s).map_err(|_| ParseError::Color(s.to_string()))?;
        Ok(Self::Color(color.to_alpha_color::<Srgb>()))
    }

    /// Returns the kind of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Scalar(_) => ValueKind::Scalar,
            Self::Vec2(_) => ValueKind::Vec2,
            Self::Color(_) => ValueKind::Color,
            Self::Discrete(_) => ValueKind::Discrete,
        }
    }

    /// Returns the number, if this is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the vector, if this is a [`Value::Vec2`].
    #[must_use]
    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            Self::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the colour, if this is a [`Value::Color`].
    #[must_use]
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the state name, if this is a [`Value::Discrete`].
    #[must_use]
    pub fn as_discrete(&self) -> Option<&str> {
        match self {
            Self::Discrete(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Interpolates from `self` to `to` at eased progress `t`.
    ///
    /// Numeric kinds interpolate linearly, land exactly on `self` at `t == 0`
    /// and on `to` at `t == 1`, and may extrapolate when `t` leaves `0..=1`
    /// (overshooting eases). Discrete values, and any pair of
    /// mismatched kinds, switch to `to` once `t >= threshold`.
    #[must_use]
    pub fn interpolate(&self, to: &Self, t: f64, threshold: f64) -> Self {
        // Endpoints are exact; `a + (b - a) * 1.0` can miss `b` by an ulp.
        if self.kind() == to.kind() && self.kind() != ValueKind::Discrete {
            if t == 0.0 {
                return self.clone();
            }
            if t == 1.0 {
                return to.clone();
            }
        }
        match (self, to) {
            (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(a + (b - a) * t),
            (Self::Vec2(a), Self::Vec2(b)) => Self::Vec2(a.lerp(*b, t)),
            (Self::Color(a), Self::Color(b)) => Self::Color(lerp_color(*a, *b, t)),
            _ => {
                if t >= threshold {
                    to.clone()
                } else {
                    self.clone()
                }
            }
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "Colour components are stored as f32."
)]
fn lerp_color(a: Color, b: Color, t: f64) -> Color {
    let mixed = a.lerp_rect(b, t as f32);
    // Overshooting eases must not push alpha outside its range.
    mixed.with_alpha(mixed.components[3].clamp(0.0, 1.0))
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<Color> for Value {
    fn from(c: Color) -> Self {
        Self::Color(c)
    }
}

impl From<&'static str> for Value {
    fn from(s: &'static str) -> Self {
        Self::Discrete(Cow::Borrowed(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_interpolate_and_extrapolate() {
        let a = Value::Scalar(10.0);
        let b = Value::Scalar(20.0);
        assert_eq!(a.interpolate(&b, 0.25, 0.5), Value::Scalar(12.5));
        assert_eq!(a.interpolate(&b, 1.5, 0.5), Value::Scalar(25.0));
    }

    #[test]
    fn vectors_interpolate_componentwise() {
        let a = Value::Vec2(Vec2::new(0.0, 100.0));
        let b = Value::Vec2(Vec2::new(50.0, 0.0));
        assert_eq!(
            a.interpolate(&b, 0.5, 0.5),
            Value::Vec2(Vec2::new(25.0, 50.0))
        );
    }

    #[test]
    fn colors_fade_between_endpoints() {
        let from = Value::color("#000000").unwrap();
        let to = Value::color("#ffffff").unwrap();
        let mid = from.interpolate(&to, 0.5, 0.5).as_color().unwrap();
        for c in &mid.components[..3] {
            assert!((c - 0.5).abs() < 1e-6, "component {c}");
        }
        assert_eq!(mid.components[3], 1.0);

        assert_eq!(from.interpolate(&to, 0.0, 0.5), from);
        assert_eq!(from.interpolate(&to, 1.0, 0.5), to);
    }

    #[test]
    fn overshoot_keeps_alpha_in_range() {
        let from = Value::Color(Color::new([0.0, 0.0, 0.0, 0.5]));
        let to = Value::Color(Color::new([1.0, 1.0, 1.0, 1.0]));
        let over = from.interpolate(&to, 1.4, 0.5).as_color().unwrap();
        assert_eq!(over.components[3], 1.0);
    }

    #[test]
    fn discrete_values_step_at_threshold() {
        let hidden = Value::from("hidden");
        let visible = Value::from("visible");
        assert_eq!(hidden.interpolate(&visible, 0.49, 0.5), hidden);
        assert_eq!(hidden.interpolate(&visible, 0.5, 0.5), visible);
        assert_eq!(hidden.interpolate(&visible, 0.1, 0.0), visible);
    }

    #[test]
    fn rejects_bad_colors() {
        assert_eq!(
            Value::color("not-a-color"),
            Err(ParseError::Color("not-a-color".into()))
        );
    }
}
