// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entity identifiers and text splitting.
//!
//! Phases target entities by identifier rather than by querying a render
//! tree. Text that animates per character or per word is split up front with
//! [`split_to_units`], and each unit is given its own [`EntityId`].

use alloc::vec::Vec;
use core::ops::Range;

/// Identifies one animated thing.
///
/// Identifiers are chosen by the application; the engine only compares them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Creates an identifier.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the identifier `n` places after this one.
    ///
    /// Used to give consecutive ids to split text units or list items.
    #[must_use]
    pub const fn offset(self, n: u32) -> Self {
        Self(self.0.wrapping_add(n))
    }

    /// Returns `count` consecutive identifiers starting at this one.
    pub fn range(self, count: u32) -> impl Iterator<Item = Self> + Clone {
        (0..count).map(move |i| self.offset(i))
    }
}

/// How [`split_to_units`] divides text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SplitUnit {
    /// One unit per non-whitespace `char`.
    Char,
    /// One unit per whitespace-separated word.
    Word,
}

/// One addressable piece of split text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextUnit<'a> {
    /// Position among the units of the same split, starting at zero.
    pub index: usize,
    /// The unit's text.
    pub text: &'a str,
    /// Byte range of [`text`](Self::text) in the source string.
    pub range: Range<usize>,
}

impl TextUnit<'_> {
    /// Returns the entity for this unit when the split is numbered from `base`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Split text never approaches u32::MAX units."
    )]
    pub fn entity(&self, base: EntityId) -> EntityId {
        base.offset(self.index as u32)
    }
}

/// Splits `text` into ordered units with stable indices.
///
/// Whitespace separates units and never becomes a unit itself. The byte
/// ranges let the render collaborator restore the original spacing between
/// units.
///
/// ```rust
/// use understory_timeline::{SplitUnit, split_to_units};
///
/// let words = split_to_units("Speak  with impact", SplitUnit::Word);
/// let texts: Vec<_> = words.iter().map(|u| u.text).collect();
/// assert_eq!(texts, ["Speak", "with", "impact"]);
/// assert_eq!(words[1].range, 7..11);
///
/// let chars = split_to_units("a b", SplitUnit::Char);
/// assert_eq!(chars.len(), 2);
/// assert_eq!(chars[1].index, 1);
/// ```
#[must_use]
pub fn split_to_units(text: &str, unit: SplitUnit) -> Vec<TextUnit<'_>> {
    let mut units = Vec::new();
    match unit {
        SplitUnit::Char => {
            for (start, c) in text.char_indices() {
                if c.is_whitespace() {
                    continue;
                }
                let range = start..start + c.len_utf8();
                units.push(TextUnit {
                    index: units.len(),
                    text: &text[range.clone()],
                    range,
                });
            }
        }
        SplitUnit::Word => {
            let mut start = None;
            for (i, c) in text.char_indices() {
                match (c.is_whitespace(), start) {
                    (true, Some(s)) => {
                        push_word(&mut units, text, s..i);
                        start = None;
                    }
                    (false, None) => start = Some(i),
                    _ => {}
                }
            }
            if let Some(s) = start {
                push_word(&mut units, text, s..text.len());
            }
        }
    }
    units
}

fn push_word<'a>(units: &mut Vec<TextUnit<'a>>, text: &'a str, range: Range<usize>) {
    units.push(TextUnit {
        index: units.len(),
        text: &text[range.clone()],
        range,
    });
}
