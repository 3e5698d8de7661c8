// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame request coalescing.

/// Identifies one requested animation frame.
///
/// Tokens are issued by the host's frame scheduler. The only requirement is
/// that a token is not reused while a request carrying it may still fire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(pub u64);

impl FrameToken {
    /// Creates a token.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Coalesces frame requests so at most one is outstanding.
///
/// Any number of events between two frames result in a single request. When
/// the frame fires, [`begin`](Self::begin) checks its token; callbacks for a
/// cancelled or superseded request are rejected.
///
/// ```rust
/// use understory_timing::{FrameGate, FrameToken};
///
/// let mut gate = FrameGate::new();
/// let mut issued = 0;
/// for _ in 0..5 {
///     gate.request(|| {
///         issued += 1;
///         FrameToken::new(issued)
///     });
/// }
/// assert_eq!(issued, 1);
///
/// assert!(!gate.begin(FrameToken::new(99)));
/// assert!(gate.begin(FrameToken::new(1)));
/// assert!(!gate.is_pending());
/// ```
#[derive(Clone, Debug, Default)]
pub struct FrameGate {
    pending: Option<FrameToken>,
}

impl FrameGate {
    /// Creates a gate with no pending request.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Requests a frame through `schedule` unless one is already pending.
    ///
    /// Returns `true` if `schedule` was called.
    pub fn request(&mut self, schedule: impl FnOnce() -> FrameToken) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(schedule());
        true
    }

    /// Consumes the pending request if `token` matches it.
    ///
    /// Returns `false` for stale or cancelled tokens; the caller should then
    /// ignore the frame.
    pub fn begin(&mut self, token: FrameToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            log::trace!("ignoring stale frame {token:?}, pending {:?}", self.pending);
            false
        }
    }

    /// Forgets the pending request, returning its token so the host can
    /// cancel it.
    pub fn cancel(&mut self) -> Option<FrameToken> {
        self.pending.take()
    }

    /// Returns `true` while a request is outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the outstanding token, if any.
    #[must_use]
    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_rejects_later_callback() {
        let mut gate = FrameGate::new();
        assert!(gate.request(|| FrameToken(7)));
        assert_eq!(gate.cancel(), Some(FrameToken(7)));
        assert!(!gate.begin(FrameToken(7)));
        assert_eq!(gate.cancel(), None);
    }

    #[test]
    fn new_request_after_frame() {
        let mut gate = FrameGate::new();
        gate.request(|| FrameToken(1));
        assert!(gate.begin(FrameToken(1)));
        assert!(gate.request(|| FrameToken(2)));
        assert!(!gate.begin(FrameToken(1)));
        assert_eq!(gate.pending(), Some(FrameToken(2)));
    }
}
