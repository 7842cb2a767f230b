//! Inventory and key ring components.

use bevy::prelude::*;
use std::collections::BTreeMap;

use super::items::ItemData;
use crate::core::InventorySignal;
use crate::interaction::KeyHolder;

pub const REASON_NO_BACKPACK: &str = "No backpack equipped";
pub const REASON_NO_SLOTS: &str = "Inventory full - no slots available";
pub const REASON_TOO_HEAVY: &str = "Item too heavy";

/// Backpack capacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backpack {
    pub slots: usize,
    pub weight_limit: f32,
}

/// Slot- and weight-limited item storage. Holds nothing until a backpack
/// is activated.
#[derive(Component, Debug, Clone, Default)]
pub struct Inventory {
    backpack: Option<Backpack>,
    items: Vec<ItemData>,
    current_weight: f32,
    signals: Vec<InventorySignal>,
}

impl Inventory {
    /// Inventory with a backpack already equipped.
    pub fn with_backpack(slots: usize, weight_limit: f32) -> Self {
        let mut inventory = Self::default();
        inventory.activate_backpack(slots, weight_limit);
        inventory.signals.clear();
        inventory
    }

    pub fn has_backpack(&self) -> bool {
        self.backpack.is_some()
    }

    pub fn backpack(&self) -> Option<Backpack> {
        self.backpack
    }

    pub fn items(&self) -> &[ItemData] {
        &self.items
    }

    pub fn current_weight(&self) -> f32 {
        self.current_weight
    }

    pub fn weight_limit(&self) -> f32 {
        self.backpack.map_or(0.0, |b| b.weight_limit)
    }

    pub fn used_slots(&self) -> usize {
        self.items.len()
    }

    pub fn free_slots(&self) -> usize {
        self.backpack
            .map_or(0, |b| b.slots.saturating_sub(self.items.len()))
    }

    pub fn remaining_capacity(&self) -> f32 {
        self.backpack
            .map_or(0.0, |b| (b.weight_limit - self.current_weight).max(0.0))
    }

    pub fn weight_percent(&self) -> f32 {
        match self.backpack {
            Some(b) if b.weight_limit > 0.0 => (self.current_weight / b.weight_limit).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Equip a backpack. Fails if one is already active.
    pub fn activate_backpack(&mut self, slots: usize, weight_limit: f32) -> bool {
        if self.backpack.is_some() {
            warn!("Backpack already active");
            return false;
        }

        let backpack = Backpack {
            slots: slots.max(1),
            weight_limit: weight_limit.max(1.0),
        };
        self.backpack = Some(backpack);
        info!(
            "Backpack activated (slots: {}, weight limit: {:.1})",
            backpack.slots, backpack.weight_limit
        );

        self.signals.push(InventorySignal::BackpackActivated {
            slots: backpack.slots,
            weight_limit: backpack.weight_limit,
        });
        self.push_changed();
        true
    }

    /// Remove the backpack, returning everything it held.
    pub fn deactivate_backpack(&mut self) -> Vec<ItemData> {
        let removed = std::mem::take(&mut self.items);
        self.current_weight = 0.0;
        self.backpack = None;
        info!("Backpack deactivated (had {} items)", removed.len());

        self.signals.push(InventorySignal::BackpackDeactivated);
        self.push_changed();
        removed
    }

    /// Re-add items after a backpack swap. Stops when slots run out and
    /// skips anything over the weight limit.
    pub fn restore_items(&mut self, items: impl IntoIterator<Item = ItemData>) -> usize {
        let Some(backpack) = self.backpack else {
            return 0;
        };

        let mut restored = 0;
        for item in items {
            if self.items.len() >= backpack.slots {
                warn!("Cannot restore '{}' - no slots available", item.name);
                break;
            }
            if self.current_weight + item.weight > backpack.weight_limit {
                warn!("Cannot restore '{}' - weight limit exceeded", item.name);
                continue;
            }
            self.current_weight += item.weight;
            self.signals.push(InventorySignal::ItemAdded(item.clone()));
            self.items.push(item);
            restored += 1;
        }

        self.push_changed();
        restored
    }

    pub fn can_carry_weight(&self, additional: f32) -> bool {
        self.backpack
            .is_some_and(|b| self.current_weight + additional <= b.weight_limit)
    }

    pub fn has_space_for(&self, item: &ItemData) -> bool {
        match self.backpack {
            Some(b) => self.items.len() < b.slots && self.can_carry_weight(item.weight),
            None => false,
        }
    }

    /// Why `item` would be rejected, if it would be.
    pub fn rejection_reason(&self, item: &ItemData) -> Option<&'static str> {
        let Some(backpack) = self.backpack else {
            return Some(REASON_NO_BACKPACK);
        };
        if self.items.len() >= backpack.slots {
            Some(REASON_NO_SLOTS)
        } else if !self.can_carry_weight(item.weight) {
            Some(REASON_TOO_HEAVY)
        } else {
            None
        }
    }

    /// Add an item, queueing `Full(reason)` on failure.
    pub fn add_item(&mut self, item: ItemData) -> bool {
        if let Some(reason) = self.rejection_reason(&item) {
            warn!("Cannot add '{}' - {}", item.name, reason);
            self.signals.push(InventorySignal::Full(reason.to_string()));
            return false;
        }

        info!("Added item '{}' ({:.1} kg)", item.name, item.weight);
        self.current_weight += item.weight;
        self.signals.push(InventorySignal::ItemAdded(item.clone()));
        self.items.push(item);
        self.push_changed();
        true
    }

    /// Remove the most recently added item with this ID.
    pub fn remove_item(&mut self, item_id: &str) -> Option<ItemData> {
        if item_id.is_empty() {
            return None;
        }
        let index = self.items.iter().rposition(|item| item.id == item_id)?;
        self.remove_at(index)
    }

    /// Remove the item in slot `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<ItemData> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.current_weight = (self.current_weight - item.weight).max(0.0);
        info!("Removed item '{}'", item.id);

        self.signals.push(InventorySignal::ItemRemoved(item.clone()));
        self.push_changed();
        Some(item)
    }

    pub fn has_item(&self, item_id: &str) -> bool {
        !item_id.is_empty() && self.items.iter().any(|item| item.id == item_id)
    }

    pub fn get_item(&self, item_id: &str) -> Option<&ItemData> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// First food or beverage, if any.
    pub fn first_consumable(&self) -> Option<&ItemData> {
        self.items.iter().find(|item| item.is_consumable())
    }

    pub fn has_signals(&self) -> bool {
        !self.signals.is_empty()
    }

    pub fn take_signals(&mut self) -> Vec<InventorySignal> {
        std::mem::take(&mut self.signals)
    }

    fn push_changed(&mut self) {
        self.signals.push(InventorySignal::Changed {
            weight: self.current_weight,
            weight_limit: self.weight_limit(),
        });
    }
}

/// Keys collected by an entity, by key ID.
#[derive(Component, Debug, Clone, Default)]
pub struct KeyRing {
    keys: BTreeMap<String, String>,
    acquired: Vec<String>,
}

impl KeyRing {
    pub fn with_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut ring = Self::default();
        for key in keys {
            ring.keys.insert(key.to_string(), key.to_string());
        }
        ring
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Display name of a held key.
    pub fn key_name(&self, key_id: &str) -> Option<&str> {
        self.keys.get(key_id).map(String::as_str)
    }

    /// Newly added key IDs since the last call.
    pub fn take_acquired(&mut self) -> Vec<String> {
        std::mem::take(&mut self.acquired)
    }
}

impl KeyHolder for KeyRing {
    fn has_key(&self, key_id: &str) -> bool {
        self.keys.contains_key(key_id)
    }

    fn add_key(&mut self, key_id: &str, display_name: &str) {
        if key_id.is_empty() {
            return;
        }
        if self
            .keys
            .insert(key_id.to_string(), display_name.to_string())
            .is_none()
        {
            info!("Key '{}' added to key ring", key_id);
            self.acquired.push(key_id.to_string());
        }
    }

    fn remove_key(&mut self, key_id: &str) -> bool {
        self.keys.remove(key_id).is_some()
    }
}
