// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The boundary between the registry and the platform.

use core::fmt::Debug;

use kurbo::Rect;
use understory_timing::FrameToken;

/// Layout queries and frame scheduling provided by the embedding platform.
///
/// The registry never reads scroll positions or viewport sizes itself; the
/// host pushes them in through
/// [`ScrollRegistry::on_scroll`](crate::ScrollRegistry::on_scroll) and
/// [`ScrollRegistry::on_resize`](crate::ScrollRegistry::on_resize) from the
/// listeners it installs in [`attach_listeners`](Self::attach_listeners).
pub trait ScrollHost {
    /// Handle to a reference element.
    type Element: Copy + Eq + Debug;

    /// Returns the element's box in document coordinates, or `None` if it is
    /// not laid out.
    fn measure(&self, element: Self::Element) -> Option<Rect>;

    /// Schedules one animation frame.
    ///
    /// The host later calls
    /// [`ScrollRegistry::on_frame`](crate::ScrollRegistry::on_frame) with the
    /// returned token.
    fn request_frame(&mut self) -> FrameToken;

    /// Cancels a frame requested earlier. Cancelling a frame that already
    /// fired must be harmless.
    fn cancel_frame(&mut self, token: FrameToken);

    /// Starts forwarding scroll and resize events.
    fn attach_listeners(&mut self);

    /// Stops forwarding scroll and resize events.
    fn detach_listeners(&mut self);
}
