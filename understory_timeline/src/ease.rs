// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves mapping local progress `0..=1` to eased progress.

use alloc::string::ToString;
use core::f64::consts::{FRAC_PI_2, TAU};
use core::fmt;
use core::str::FromStr;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `powf`, `sin`, `cos`, `asin`

use crate::error::ParseError;

/// Default overshoot for [`Curve::Back`].
pub const DEFAULT_BACK_OVERSHOOT: f64 = 1.70158;

/// Default amplitude for [`Curve::Elastic`].
pub const DEFAULT_ELASTIC_AMPLITUDE: f64 = 1.0;

/// Default period for [`Curve::Elastic`].
pub const DEFAULT_ELASTIC_PERIOD: f64 = 0.3;

/// A curve family, expressed as its "in" form.
///
/// The `Out` and `InOut` variants of [`Ease`] are derived from the `in`
/// shape by reflection, so every family only defines one function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Curve {
    /// Polynomial of degree `power + 1` (`Power(1)` is quadratic,
    /// `Power(4)` is quintic).
    Power(u8),
    /// Quarter sine wave.
    Sine,
    /// Exponential, base 2.
    Expo,
    /// Quarter circle.
    Circ,
    /// Pulls back before moving forward.
    Back {
        /// How far the curve overshoots.
        overshoot: f64,
    },
    /// Damped oscillation.
    Elastic {
        /// Oscillation amplitude; values below `1.0` shorten the period instead.
        amplitude: f64,
        /// Oscillation period in local progress units.
        period: f64,
    },
    /// Decaying bounces.
    Bounce,
}

/// An easing function.
///
/// Every variant maps `0.0` to `0.0` and `1.0` to `1.0`. Curves such as
/// [`Curve::Back`] and [`Curve::Elastic`] leave `0..=1` in between, which is
/// how overshoot effects are expressed.
///
/// Eases parse from the compact string notation common in scroll animation
/// code:
///
/// ```rust
/// use understory_timeline::{Curve, Ease};
///
/// let ease: Ease = "power3.inOut".parse().unwrap();
/// assert_eq!(ease, Ease::InOut(Curve::Power(3)));
///
/// let ease: Ease = "elastic.out(1, 0.3)".parse().unwrap();
/// assert_eq!(ease.apply(1.0), 1.0);
///
/// // A family without a direction eases out.
/// assert_eq!("sine".parse::<Ease>().unwrap(), Ease::Out(Curve::Sine));
/// ```
#[derive(Clone, Copy, Default)]
pub enum Ease {
    /// Identity.
    #[default]
    Linear,
    /// Accelerates from rest.
    In(Curve),
    /// Decelerates to rest.
    Out(Curve),
    /// Accelerates, then decelerates.
    InOut(Curve),
    /// Jumps in `n` equal steps.
    Steps(u32),
    /// A caller-supplied curve.
    ///
    /// The function is called with values in `0..=1` and is expected to map
    /// `0` to `0` and `1` to `1`; endpoints are pinned regardless.
    Custom(fn(f64) -> f64),
}

impl fmt::Debug for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("Linear"),
            Self::In(c) => f.debug_tuple("In").field(c).finish(),
            Self::Out(c) => f.debug_tuple("Out").field(c).finish(),
            Self::InOut(c) => f.debug_tuple("InOut").field(c).finish(),
            Self::Steps(n) => f.debug_tuple("Steps").field(n).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for Ease {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Linear, Self::Linear) => true,
            (Self::In(a), Self::In(b))
            | (Self::Out(a), Self::Out(b))
            | (Self::InOut(a), Self::InOut(b)) => a == b,
            (Self::Steps(a), Self::Steps(b)) => a == b,
            // Function identity is not meaningful; custom curves never compare equal.
            _ => false,
        }
    }
}

impl Ease {
    /// Applies the ease to local progress `t`, clamped into `0..=1`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t == 0.0 {
            return 0.0;
        }
        if t == 1.0 {
            return 1.0;
        }
        match self {
            Self::Linear => t,
            Self::In(curve) => curve.ease_in(t),
            Self::Out(curve) => 1.0 - curve.ease_in(1.0 - t),
            Self::InOut(curve) => {
                if t < 0.5 {
                    curve.ease_in(t * 2.0) / 2.0
                } else {
                    1.0 - curve.ease_in((1.0 - t) * 2.0) / 2.0
                }
            }
            Self::Steps(n) => {
                let n = f64::from(n.max(1));
                (t * n).floor() / n
            }
            Self::Custom(f) => f(t),
        }
    }
}

impl Curve {
    fn ease_in(self, t: f64) -> f64 {
        match self {
            Self::Power(power) => t.powi(i32::from(power.clamp(1, 4)) + 1),
            Self::Sine => 1.0 - (t * FRAC_PI_2).cos(),
            Self::Expo => 2.0_f64.powf(10.0 * (t - 1.0)),
            Self::Circ => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Self::Back { overshoot } => t * t * ((overshoot + 1.0) * t - overshoot),
            Self::Elastic { amplitude, period } => 1.0 - elastic_out(1.0 - t, amplitude, period),
            Self::Bounce => 1.0 - bounce_out(1.0 - t),
        }
    }
}

fn elastic_out(t: f64, amplitude: f64, period: f64) -> f64 {
    // Amplitudes below 1 shorten the period instead; the curve would not
    // start at 0 otherwise.
    let amp = amplitude.max(1.0);
    let period = if period > 0.0 {
        period
    } else {
        DEFAULT_ELASTIC_PERIOD
    };
    let period = if amplitude > 0.0 && amplitude < 1.0 {
        period / amplitude
    } else {
        period
    };
    let phase = period / TAU * (1.0 / amp).asin();
    let angular = TAU / period;
    amp * 2.0_f64.powf(-10.0 * t) * ((t - phase) * angular).sin() + 1.0
}

fn bounce_out(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

impl FromStr for Ease {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::Ease(s.to_string());
        let input = s.trim();
        match input {
            "none" | "linear" => return Ok(Self::Linear),
            _ => {}
        }

        let (head, args) = match input.find('(') {
            Some(open) => {
                let close = input.rfind(')').ok_or_else(err)?;
                if close != input.len() - 1 || close < open {
                    return Err(err());
                }
                (&input[..open], Some(&input[open + 1..close]))
            }
            None => (input, None),
        };

        if head == "steps" {
            let n = args
                .ok_or_else(err)?
                .trim()
                .parse::<u32>()
                .map_err(|_| err())?;
            if n == 0 {
                return Err(err());
            }
            return Ok(Self::Steps(n));
        }

        let (family, direction) = match head.split_once('.') {
            Some((family, direction)) => (family, Some(direction)),
            None => (head, None),
        };

        let mut params = [None, None];
        if let Some(args) = args {
            for (slot, arg) in params.iter_mut().zip(args.split(',')) {
                let arg = arg.trim();
                if !arg.is_empty() {
                    *slot = Some(arg.parse::<f64>().map_err(|_| err())?);
                }
            }
            if args.split(',').count() > 2 {
                return Err(err());
            }
        }

        let curve = match family {
            "power1" | "quad" => Curve::Power(1),
            "power2" | "cubic" => Curve::Power(2),
            "power3" | "quart" => Curve::Power(3),
            "power4" | "quint" | "strong" => Curve::Power(4),
            "sine" => Curve::Sine,
            "expo" => Curve::Expo,
            "circ" => Curve::Circ,
            "back" => Curve::Back {
                overshoot: params[0].unwrap_or(DEFAULT_BACK_OVERSHOOT),
            },
            "elastic" => Curve::Elastic {
                amplitude: params[0].unwrap_or(DEFAULT_ELASTIC_AMPLITUDE),
                period: params[1].unwrap_or(DEFAULT_ELASTIC_PERIOD),
            },
            "bounce" => Curve::Bounce,
            _ => return Err(err()),
        };
        if args.is_some() && !matches!(curve, Curve::Back { .. } | Curve::Elastic { .. }) {
            return Err(err());
        }

        match direction {
            None | Some("out") => Ok(Self::Out(curve)),
            Some("in") => Ok(Self::In(curve)),
            Some("inOut") => Ok(Self::InOut(curve)),
            Some(_) => Err(err()),
        }
    }
}
