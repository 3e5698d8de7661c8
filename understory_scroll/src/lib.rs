// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Scroll: scroll-linked timeline bindings.
//!
//! This crate connects [`understory_timeline::Timeline`]s to a scrolling
//! document. A [`TriggerRegion`] names a reference element and two
//! [`ScrollOffset`]s; once resolved against layout they give the span of
//! scroll positions over which progress runs from `0` to `1`. The
//! [`ScrollRegistry`] owns regions and bindings, coalesces scroll and resize
//! events into animation frames, and hands each binding's evaluated
//! [`RenderState`](understory_timeline::RenderState) to its apply callback.
//!
//! - **Offsets** ([`ScrollOffset`]): `"top bottom"`, `"center 40%"`,
//!   `"+=800vh"` and similar notation, resolved against element and
//!   viewport geometry.
//! - **Regions** ([`TriggerRegion`], [`RegionState`], [`RegionEvents`]):
//!   start and end offsets, pinning, scrub lag, and enter/leave toggles.
//! - **Host** ([`ScrollHost`]): measurement, frame scheduling, and listener
//!   lifecycle provided by the platform.
//! - **Registry** ([`ScrollRegistry`]): bind, dispose, refresh, and per-frame
//!   evaluation. Layout that is not ready yet is retried a bounded number of
//!   times ([`ScrollConfig`]).
//! - **Responsive values** ([`Responsive`]): select timing constants by
//!   viewport width.
//!
//! Everything is single-threaded and synchronous. The registry never holds
//! a timer of its own: the host calls [`ScrollRegistry::on_frame`] with the
//! token returned from [`ScrollHost::request_frame`].
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod host;
mod offset;
mod region;
mod registry;
mod responsive;
mod slots;

pub use host::ScrollHost;
pub use offset::{EdgeRef, Length, ParseOffsetError, ScrollOffset};
pub use region::{LayoutUnavailable, RegionEvents, RegionState, ResolvedSpan, TriggerRegion};
pub use registry::{
    BindingId, DEFAULT_MAX_LAYOUT_RETRIES, FrameReport, RegionId, ScrollConfig, ScrollRegistry,
    Transition,
};
pub use responsive::Responsive;
