// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Timing: host-agnostic frame and clock primitives.
//!
//! These types hold no timers of their own. The host owns the event loop and
//! feeds frame callbacks and elapsed time in; the primitives decide what to do
//! with them.
//!
//! - [`FrameGate`]: coalesces any number of "something changed" signals into
//!   at most one outstanding animation frame request, and rejects callbacks
//!   carrying a stale [`FrameToken`].
//! - [`Smoother`]: trails a target value with a configurable [`Lag`], for
//!   progress that should catch up with scrolling rather than follow it.
//! - [`Playback`]: turns elapsed seconds into progress with delay, [`Repeat`],
//!   and yoyo, for animations that are not scroll-linked.
//!
//! ## Example
//!
//! ```rust
//! use understory_timing::{FrameGate, FrameToken, Lag, Smoother};
//!
//! let mut gate = FrameGate::new();
//! let mut smoother = Smoother::new(Lag::Seconds(0.5));
//! smoother.snap(0.0);
//!
//! // Several scroll events arrive before the next frame.
//! for offset in [0.1, 0.2, 0.3] {
//!     smoother.set_target(offset);
//!     gate.request(|| FrameToken::new(1));
//! }
//!
//! // The host fires the frame.
//! if gate.begin(FrameToken::new(1)) {
//!     let applied = smoother.advance(1.0 / 60.0);
//!     assert!(applied > 0.0 && applied < 0.3);
//! }
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std`. Disable the default `std` feature and enable
//! `libm` to build without the standard library.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod frame;
mod playback;
mod smooth;

pub use frame::{FrameGate, FrameToken};
pub use playback::{Playback, Repeat};
pub use smooth::{Lag, SETTLE_EPSILON, Smoother};
