// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational slot storage backing region and binding ids.
//!
//! - On insert, a fresh slot is allocated with generation `1`.
//! - On remove, the slot is freed and any key pointing at it becomes stale.
//! - On reuse of a freed slot, its generation is incremented.

use alloc::vec::Vec;

/// Slot index and generation.
pub(crate) type Key = (u32, u32);

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Clone, Debug)]
pub(crate) struct Slots<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }
}

impl<T> Slots<T> {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "More than u32::MAX live regions or bindings is not supported."
    )]
    pub(crate) fn insert(&mut self, value: T) -> Key {
        self.len += 1;
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.value = Some(value);
            return (idx, slot.generation);
        }
        let idx = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 1,
            value: Some(value),
        });
        (idx, 1)
    }

    pub(crate) fn get(&self, (idx, generation): Key) -> Option<&T> {
        self.slots
            .get(idx as usize)
            .filter(|s| s.generation == generation)
            .and_then(|s| s.value.as_ref())
    }

    pub(crate) fn get_mut(&mut self, (idx, generation): Key) -> Option<&mut T> {
        self.slots
            .get_mut(idx as usize)
            .filter(|s| s.generation == generation)
            .and_then(|s| s.value.as_mut())
    }

    pub(crate) fn remove(&mut self, (idx, generation): Key) -> Option<T> {
        let slot = self.slots.get_mut(idx as usize)?;
        if slot.generation != generation {
            return None;
        }
        let value = slot.value.take()?;
        self.free.push(idx);
        self.len -= 1;
        Some(value)
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every value; all outstanding keys become stale.
    pub(crate) fn clear(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "Slot indices were issued as u32."
                )]
                self.free.push(idx as u32);
            }
        }
        self.len = 0;
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "Slot indices were issued as u32."
    )]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Key, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, s)| {
            s.value
                .as_ref()
                .map(|value| ((idx as u32, s.generation), value))
        })
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "Slot indices were issued as u32."
    )]
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (Key, &mut T)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(idx, s)| {
            let generation = s.generation;
            s.value
                .as_mut()
                .map(|value| ((idx as u32, generation), value))
        })
    }
}
