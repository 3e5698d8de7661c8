// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render state: the output of one evaluation.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::entity::EntityId;
use crate::value::{Property, Value};

/// Resolved property values of one entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityState {
    values: SmallVec<[(Property, Value); 4]>,
}

impl EntityState {
    /// Returns the value of `property`, if any phase animates it.
    #[must_use]
    pub fn get(&self, property: &Property) -> Option<&Value> {
        self.values
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v)
    }

    /// Returns the value of `property` if it is a scalar.
    #[must_use]
    pub fn scalar(&self, property: &Property) -> Option<f64> {
        self.get(property).and_then(Value::as_scalar)
    }

    /// Iterates over `(property, value)` pairs in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (&Property, &Value)> + '_ {
        self.values.iter().map(|(p, v)| (p, v))
    }

    /// Returns the number of animated properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no property is animated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Writes `value`, replacing an existing one only when `overwrite` is set.
    pub(crate) fn write(&mut self, property: &Property, value: Value, overwrite: bool) {
        match self.values.iter_mut().find(|(p, _)| p == property) {
            Some(slot) => {
                if overwrite {
                    slot.1 = value;
                }
            }
            None => self.values.push((property.clone(), value)),
        }
    }
}

/// The resolved visual state for one progress value.
///
/// Produced by [`Timeline::evaluate`](crate::Timeline::evaluate) and handed
/// to whatever applies it to a rendering surface. Two render states are equal
/// when they hold the same progress, pin flag, and values per entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderState {
    progress: f64,
    pinned: bool,
    entities: HashMap<EntityId, EntityState>,
}

impl RenderState {
    /// Creates an empty render state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the clamped progress this state was evaluated at.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Returns `true` if the reference element should be held in place.
    ///
    /// Timelines never set this; scroll bindings set it while a pinned region
    /// is being scrolled through.
    #[must_use]
    pub fn pinned(&self) -> bool {
        self.pinned
    }

    /// Sets the pin flag.
    pub fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }

    /// Returns the state of `entity`, if any phase targets it.
    #[must_use]
    pub fn entity(&self, entity: EntityId) -> Option<&EntityState> {
        self.entities.get(&entity)
    }

    /// Returns the value of `property` on `entity`.
    #[must_use]
    pub fn get(&self, entity: EntityId, property: &Property) -> Option<&Value> {
        self.entity(entity).and_then(|e| e.get(property))
    }

    /// Returns the scalar value of `property` on `entity`.
    #[must_use]
    pub fn scalar(&self, entity: EntityId, property: &Property) -> Option<f64> {
        self.entity(entity).and_then(|e| e.scalar(property))
    }

    /// Iterates over entities and their states, in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &EntityState)> + '_ {
        self.entities.iter().map(|(id, state)| (*id, state))
    }

    /// Returns the number of entities with state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entity has state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Clears all values, keeping allocations for reuse.
    pub(crate) fn reset(&mut self, progress: f64) {
        self.progress = progress;
        self.pinned = false;
        self.entities.clear();
    }

    pub(crate) fn entity_mut(&mut self, entity: EntityId) -> &mut EntityState {
        self.entities.entry(entity).or_default()
    }
}
