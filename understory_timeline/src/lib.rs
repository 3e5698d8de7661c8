// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Timeline: progress-driven animation timelines.
//!
//! A [`Timeline`] is an immutable sequence of [`Phase`]s. Each phase animates
//! one [`Property`] of one or more entities from a `from` [`Value`] to a `to`
//! value, shaped by an [`Ease`] and optionally staggered across its targets.
//! Evaluating a timeline at a progress in `0..=1` yields a [`RenderState`]:
//! the value of every animated property on every targeted entity.
//!
//! The crate does not know where progress comes from. A scroll binding, a
//! time-driven playback clock, or a test can all drive the same timeline, and
//! evaluation is pure: equal progress always produces equal render states.
//!
//! - **Phases** ([`Phase`]): one property on a set of targets, with duration,
//!   easing, [`Stagger`], and an optional [`Position`].
//! - **Positions** ([`Position`]): absolute times, offsets from the end of the
//!   sequence, or offsets from the start or end of an earlier named entry.
//! - **Eases** ([`Ease`], [`Curve`]): the usual power, sine, expo, circ, back,
//!   elastic, and bounce families plus steps and custom functions.
//! - **Text splitting** ([`split_to_units`]): per-word or per-character units
//!   that map onto consecutive [`EntityId`]s for staggered reveals.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_timeline::{EntityId, Phase, Position, Property, Stagger, Timeline};
//!
//! let panel = EntityId::new(1);
//! let lines = EntityId::new(10).range(3);
//!
//! let timeline = Timeline::builder()
//!     .phase(
//!         Phase::new(Property::TranslateY, 100.0, 0.0)
//!             .target(panel)
//!             .duration(1.0)
//!             .ease("power2.out".parse().unwrap())
//!             .named("panel"),
//!     )
//!     .phase(
//!         Phase::new(Property::Opacity, 0.0, 1.0)
//!             .targets(lines)
//!             .duration(0.5)
//!             .stagger(Stagger::each(0.25))
//!             .at(Position::overlap("panel", 0.5)),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let start = timeline.evaluate(0.0);
//! assert_eq!(start.scalar(panel, &Property::TranslateY), Some(100.0));
//! assert_eq!(start.scalar(EntityId::new(12), &Property::Opacity), Some(0.0));
//!
//! let end = timeline.evaluate(1.0);
//! assert_eq!(end.scalar(panel, &Property::TranslateY), Some(0.0));
//! assert_eq!(end.scalar(EntityId::new(12), &Property::Opacity), Some(1.0));
//! ```
//!
//! ## Validation
//!
//! [`TimelineBuilder::build`] rejects descriptions that cannot be resolved:
//! phases without targets, non-positive durations, unknown or forward name
//! references, reference cycles, and starts before zero. See
//! [`ConfigurationError`] for the full list.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Disable the default `std` feature
//! and enable `libm` to build without the standard library.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod ease;
mod entity;
mod error;
mod phase;
mod position;
mod render;
mod timeline;
mod value;

pub use ease::{
    Curve, DEFAULT_BACK_OVERSHOOT, DEFAULT_ELASTIC_AMPLITUDE, DEFAULT_ELASTIC_PERIOD, Ease,
};
pub use entity::{EntityId, SplitUnit, TextUnit, split_to_units};
pub use error::{ConfigurationError, ParseError};
pub use phase::{
    DEFAULT_DURATION, DEFAULT_STEP_THRESHOLD, Phase, Stagger, StaggerFrom, StaggerTiming,
};
pub use position::{Anchor, Edge, Offset, Position};
pub use render::{EntityState, RenderState};
pub use timeline::{ResolvedPhase, Timeline, TimelineBuilder};
pub use value::{Property, Value, ValueKind};
