// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lag smoothing for scrubbed progress.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `exp`

/// Differences below this snap to the target.
pub const SETTLE_EPSILON: f64 = 1e-4;

/// `-ln(0.01)`: after `lag` seconds the remaining distance is about 1%.
const CATCH_UP_RATE: f64 = 4.6;

/// How far an applied value trails its target.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum Lag {
    /// Follow the target exactly.
    #[default]
    Immediate,
    /// Catch up over roughly this many seconds.
    Seconds(f64),
}

impl Lag {
    /// Returns the effective lag, treating zero, negative and non-finite
    /// durations as [`Lag::Immediate`].
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::Seconds(s) if s.is_finite() && s > 0.0 => self,
            _ => Self::Immediate,
        }
    }
}

/// Exponentially approaches a target value.
///
/// Used to give scroll-linked progress a trailing, eased feel: the scroll
/// position sets the target, and each frame advances the applied value
/// towards it by the elapsed time.
///
/// ```rust
/// use understory_timing::{Lag, Smoother};
///
/// let mut s = Smoother::new(Lag::Seconds(1.0));
/// s.snap(0.0);
/// s.set_target(1.0);
/// let first = s.advance(0.1);
/// assert!(first > 0.0 && first < 1.0);
/// for _ in 0..100 {
///     s.advance(0.1);
/// }
/// assert!(s.is_settled());
/// assert_eq!(s.value(), 1.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Smoother {
    lag: Lag,
    value: Option<f64>,
    target: f64,
}

impl Smoother {
    /// Creates a smoother with no value yet; the first target is taken as is.
    #[must_use]
    pub fn new(lag: Lag) -> Self {
        Self {
            lag: lag.normalized(),
            value: None,
            target: 0.0,
        }
    }

    /// Returns the lag.
    #[must_use]
    pub fn lag(&self) -> Lag {
        self.lag
    }

    /// Replaces the lag, keeping the current value.
    pub fn set_lag(&mut self, lag: Lag) {
        self.lag = lag.normalized();
    }

    /// Sets the value to approach.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Returns the target.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Jumps straight to `value`.
    pub fn snap(&mut self, value: f64) {
        self.value = Some(value);
        self.target = value;
    }

    /// Forgets the current value so the next advance starts at the target.
    pub fn reset(&mut self) {
        self.value = None;
    }

    /// Advances by `dt` seconds and returns the new value.
    pub fn advance(&mut self, dt: f64) -> f64 {
        let next = match (self.lag, self.value) {
            (Lag::Immediate, _) | (_, None) => self.target,
            (Lag::Seconds(secs), Some(current)) => {
                let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
                let alpha = 1.0 - (-dt * CATCH_UP_RATE / secs).exp();
                let next = current + (self.target - current) * alpha;
                if (self.target - next).abs() < SETTLE_EPSILON {
                    self.target
                } else {
                    next
                }
            }
        };
        self.value = Some(next);
        next
    }

    /// Returns the current value, or the target if nothing has been applied.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value.unwrap_or(self.target)
    }

    /// Returns `true` once the value has reached the target.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.value == Some(self.target)
    }
}
