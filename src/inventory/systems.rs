//! Inventory systems - eating/drinking and event broadcast.

use bevy::prelude::*;

use super::components::{Inventory, KeyRing};
use crate::core::{ConsumeItemRequest, InventoryEvent, KeyAcquired, SurvivalSet};
use crate::stats::Needs;

/// Configure inventory systems.
pub fn setup_inventory_systems(app: &mut App) {
    app
        .add_event::<InventoryEvent>()
        .add_event::<KeyAcquired>()
        .add_event::<ConsumeItemRequest>()
        .add_systems(Update, consume_items.in_set(SurvivalSet::Simulation))
        .add_systems(
            Update,
            (broadcast_inventory_signals, broadcast_acquired_keys).in_set(SurvivalSet::Broadcast),
        );
}

/// Eat or drink requested items, restoring hunger and thirst.
pub fn consume_items(
    mut requests: EventReader<ConsumeItemRequest>,
    mut query: Query<(&mut Inventory, &mut Needs)>,
) {
    for request in requests.read() {
        let Ok((mut inventory, mut needs)) = query.get_mut(request.owner) else {
            continue;
        };

        let consumable = inventory
            .get_item(&request.item_id)
            .is_some_and(|item| item.is_consumable());
        if !consumable {
            warn!("'{}' is not something you can consume", request.item_id);
            continue;
        }

        let Some(item) = inventory.remove_item(&request.item_id) else {
            continue;
        };
        needs.hunger.restore(item.hunger_restore);
        needs.thirst.restore(item.thirst_restore);
        info!(
            "Consumed '{}' (+{:.0} hunger, +{:.0} thirst)",
            item.name, item.hunger_restore, item.thirst_restore
        );
    }
}

/// Turn queued inventory signals into events.
pub fn broadcast_inventory_signals(
    mut query: Query<(Entity, &mut Inventory)>,
    mut events: EventWriter<InventoryEvent>,
) {
    for (owner, mut inventory) in &mut query {
        if !inventory.has_signals() {
            continue;
        }
        for signal in inventory.take_signals() {
            events.send(InventoryEvent { owner, signal });
        }
    }
}

pub fn broadcast_acquired_keys(
    mut query: Query<(Entity, &mut KeyRing)>,
    mut events: EventWriter<KeyAcquired>,
) {
    for (owner, mut keys) in &mut query {
        for key_id in keys.take_acquired() {
            events.send(KeyAcquired { owner, key_id });
        }
    }
}
