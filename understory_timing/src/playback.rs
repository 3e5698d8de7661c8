// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-driven progress.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `floor`

/// How many times a [`Playback`] runs after its first pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Repeat {
    /// Run `1 + n` passes in total.
    Count(u32),
    /// Never finish.
    Infinite,
}

/// A clock that turns elapsed seconds into timeline progress.
///
/// Timelines that are not scroll-linked, such as an intro sequence or a
/// looping call-to-action, are driven by a playback: the host advances it by
/// each frame's delta and evaluates the timeline at [`progress`](Self::progress).
///
/// ```rust
/// use understory_timing::{Playback, Repeat};
///
/// let mut pulse = Playback::new(2.0).delay(0.5).repeat(Repeat::Count(1)).yoyo(true);
/// assert_eq!(pulse.advance(0.5), 0.0);
/// assert_eq!(pulse.advance(1.0), 0.5);
/// // The second pass runs backwards.
/// assert_eq!(pulse.advance(1.5), 0.75);
/// assert_eq!(pulse.advance(10.0), 0.0);
/// assert!(pulse.is_finished());
/// ```
#[derive(Clone, Debug)]
pub struct Playback {
    duration: f64,
    delay: f64,
    repeat: Repeat,
    yoyo: bool,
    elapsed: f64,
}

impl Playback {
    /// Creates a single forward pass lasting `duration` seconds.
    ///
    /// Non-positive or non-finite durations complete immediately.
    #[must_use]
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            delay: 0.0,
            repeat: Repeat::default(),
            yoyo: false,
            elapsed: 0.0,
        }
    }

    /// Waits `delay` seconds before the first pass.
    #[must_use]
    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        self
    }

    /// Sets the number of extra passes.
    #[must_use]
    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Alternates direction on every other pass.
    #[must_use]
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Returns the duration of one pass.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Returns the seconds elapsed since the start, delay included.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advances by `dt` seconds and returns the new progress.
    ///
    /// Negative and non-finite deltas are ignored.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        self.progress()
    }

    /// Jumps to `elapsed` seconds from the start.
    pub fn seek(&mut self, elapsed: f64) {
        self.elapsed = if elapsed.is_finite() {
            elapsed.max(0.0)
        } else {
            0.0
        };
    }

    /// Rewinds to the start, delay included.
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }

    /// Returns the progress of the current pass, in `0..=1`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let t = self.elapsed - self.delay;
        if t <= 0.0 {
            return 0.0;
        }
        if self.is_degenerate() {
            return self.final_progress();
        }
        let cycles = t / self.duration;
        let pass = cycles.floor();
        if let Repeat::Count(n) = self.repeat {
            if pass > f64::from(n) {
                return self.final_progress();
            }
        }
        let local = cycles - pass;
        if self.yoyo && pass % 2.0 == 1.0 {
            1.0 - local
        } else {
            local
        }
    }

    /// Returns `true` once the last pass has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        match self.repeat {
            Repeat::Infinite => false,
            Repeat::Count(n) => {
                let total = self.duration * (f64::from(n) + 1.0);
                self.is_degenerate() || self.elapsed - self.delay >= total
            }
        }
    }

    fn is_degenerate(&self) -> bool {
        !(self.duration.is_finite() && self.duration > 0.0)
    }

    fn final_progress(&self) -> f64 {
        match self.repeat {
            Repeat::Count(n) if self.yoyo && n % 2 == 1 => 0.0,
            _ => 1.0,
        }
    }
}

impl Default for Repeat {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(1.0)
    }
}
