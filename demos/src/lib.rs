// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared pieces for the runnable demos.
//!
//! [`SimulatedPage`] stands in for a browser document: a column of
//! fixed-height sections, a frame counter in place of
//! `requestAnimationFrame`, and listener state that is only printed.

use kurbo::Rect;
use understory_scroll::ScrollHost;
use understory_timeline::{EntityState, RenderState, Value};
use understory_timing::FrameToken;

/// A page of stacked sections with known heights.
#[derive(Debug, Default)]
pub struct SimulatedPage {
    sections: Vec<(&'static str, f64)>,
    next_frame: u64,
    listening: bool,
}

impl SimulatedPage {
    /// Creates an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a section and returns its element handle.
    pub fn section(&mut self, name: &'static str, height: f64) -> usize {
        self.sections.push((name, height));
        self.sections.len() - 1
    }

    /// Returns the name of a section.
    pub fn name(&self, element: usize) -> &'static str {
        self.sections.get(element).map_or("?", |(name, _)| name)
    }

    /// Returns the total document height.
    pub fn height(&self) -> f64 {
        self.sections.iter().map(|(_, h)| h).sum()
    }

    /// Returns `true` while the registry wants scroll events.
    pub fn is_listening(&self) -> bool {
        self.listening
    }
}

impl ScrollHost for SimulatedPage {
    type Element = usize;

    fn measure(&self, element: usize) -> Option<Rect> {
        let (_, height) = *self.sections.get(element)?;
        let top: f64 = self.sections[..element].iter().map(|(_, h)| h).sum();
        Some(Rect::new(0.0, top, 1280.0, top + height))
    }

    fn request_frame(&mut self) -> FrameToken {
        self.next_frame += 1;
        FrameToken::new(self.next_frame)
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        log::debug!("host: cancel {token:?}");
    }

    fn attach_listeners(&mut self) {
        log::info!("host: scroll and resize listeners attached");
        self.listening = true;
    }

    fn detach_listeners(&mut self) {
        log::info!("host: scroll and resize listeners detached");
        self.listening = false;
    }
}

/// Formats one value compactly.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Scalar(v) => format!("{v:.3}"),
        Value::Vec2(v) => format!("({:.1}, {:.1})", v.x, v.y),
        Value::Color(c) => {
            let [r, g, b, a] = c.to_rgba8().to_u8_array();
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
        Value::Discrete(s) => s.to_string(),
    }
}

/// Formats every property of one entity.
pub fn format_entity(state: &EntityState) -> String {
    state
        .iter()
        .map(|(property, value)| format!("{property:?}={}", format_value(value)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prints a render state, entities in id order.
pub fn print_state(label: &str, state: &RenderState) {
    let mut entities: Vec<_> = state.entities().collect();
    entities.sort_by_key(|(id, _)| *id);
    println!(
        "{label}: progress {:.3}{}",
        state.progress(),
        if state.pinned() { " [pinned]" } else { "" }
    );
    for (id, entity) in entities {
        println!("  {:>4} {}", id.0, format_entity(entity));
    }
}
