//! Items lying in the world waiting to be collected.

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::ItemPickedUp;
use crate::interaction::{
    Instigator, Interactable, InteractionData, InteractionSettings, KeyHolder, Pickupable,
};
use crate::inventory::{ItemData, ItemKind};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    pub settings: InteractionSettings,
    pub destroy_on_pickup: bool,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            settings: InteractionSettings::default(),
            destroy_on_pickup: true,
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Pickup {
    item: ItemData,
    config: PickupConfig,
    /// Who collected it this frame; drained by [`collect_pickups`]
    collected_by: Option<Entity>,
}

impl Pickup {
    pub fn new(item: ItemData, config: PickupConfig) -> Self {
        Self {
            item: item.sanitized(),
            config: PickupConfig {
                settings: config.settings.sanitized(),
                ..config
            },
            collected_by: None,
        }
    }

    pub fn item(&self) -> &ItemData {
        &self.item
    }

    pub fn is_collected(&self) -> bool {
        self.collected_by.is_some()
    }

    fn pick_up_key(&self, keys: &mut dyn KeyHolder) -> bool {
        let Some(key_id) = self.item.granted_key() else {
            return false;
        };
        keys.add_key(key_id, &self.item.name);
        true
    }
}

impl Interactable for Pickup {
    fn interact(&mut self, instigator: &mut Instigator) -> bool {
        if self.is_collected() {
            return false;
        }

        let success = match self.item.kind {
            ItemKind::Key => self.pick_up_key(&mut *instigator.keys),
            ItemKind::Backpack => instigator
                .inventory
                .activate_backpack(self.item.backpack_slots, self.item.backpack_weight_limit),
            _ => instigator.inventory.add_item(self.item.clone()),
        };

        if success {
            info!("Picked up {}", self.item.name);
            self.collected_by = Some(instigator.entity);
        }
        success
    }

    fn interaction_data(&self, _instigator: &Instigator) -> InteractionData {
        let settings = &self.config.settings;
        let text = if settings.prompt == InteractionSettings::default().prompt {
            format!("Pick up {}", self.item.name)
        } else {
            settings.prompt.clone()
        };
        InteractionData::new(text)
            .with_secondary(settings.secondary_prompt.clone())
            .with_duration(settings.hold_duration)
    }

    fn can_interact(&self, _instigator: &Instigator) -> bool {
        self.config.settings.enabled && !self.is_collected()
    }

    fn interaction_distance(&self) -> f32 {
        self.config.settings.max_distance
    }

    fn as_pickupable(&self) -> Option<&dyn Pickupable> {
        Some(self)
    }
}

impl Pickupable for Pickup {
    fn should_destroy_on_pickup(&self) -> bool {
        self.config.destroy_on_pickup
    }
}

/// Announce collected pickups, then despawn the ones that go away.
pub fn collect_pickups(
    mut commands: Commands,
    mut pickups: Query<(Entity, &mut Pickup)>,
    mut events: EventWriter<ItemPickedUp>,
) {
    for (entity, mut pickup) in pickups.iter_mut() {
        let Some(picker) = pickup.collected_by.take() else {
            continue;
        };
        events.send(ItemPickedUp {
            picker,
            pickup: entity,
            item: pickup.item.clone(),
        });
        if pickup.should_destroy_on_pickup() {
            commands.entity(entity).despawn_recursive();
        }
    }
}
