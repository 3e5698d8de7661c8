// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Width-dependent values.

use alloc::vec::Vec;

/// A value that depends on the viewport width.
///
/// Breakpoints are minimum widths; the value of the largest breakpoint not
/// exceeding the width wins, and the base value applies below all of them.
/// Combine with [`ScrollRegistry::set_timeline`](crate::ScrollRegistry::set_timeline)
/// to swap timing on resize.
///
/// ```rust
/// use understory_scroll::Responsive;
///
/// let scroll_length = Responsive::new(1200.0).at_least(620.0, 800.0);
/// assert_eq!(*scroll_length.select(375.0), 1200.0);
/// assert_eq!(*scroll_length.select(620.0), 800.0);
/// assert_eq!(*scroll_length.select(1920.0), 800.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Responsive<T> {
    base: T,
    breakpoints: Vec<(f64, T)>,
}

impl<T> Responsive<T> {
    /// Creates a value that is `base` at every width.
    #[must_use]
    pub fn new(base: T) -> Self {
        Self {
            base,
            breakpoints: Vec::new(),
        }
    }

    /// Uses `value` from `min_width` upwards.
    ///
    /// A repeated breakpoint replaces the earlier value.
    #[must_use]
    pub fn at_least(mut self, min_width: f64, value: T) -> Self {
        match self
            .breakpoints
            .binary_search_by(|(w, _)| w.total_cmp(&min_width))
        {
            Ok(i) => self.breakpoints[i].1 = value,
            Err(i) => self.breakpoints.insert(i, (min_width, value)),
        }
        self
    }

    /// Returns the value for a viewport `width` wide.
    #[must_use]
    pub fn select(&self, width: f64) -> &T {
        self.breakpoints
            .iter()
            .rev()
            .find(|(min, _)| width >= *min)
            .map_or(&self.base, |(_, v)| v)
    }
}
