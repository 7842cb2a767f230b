//! Inventory plugin - backpack storage, keys and consumables.

use bevy::prelude::*;

use super::systems;

pub struct InventoryPlugin;

impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        systems::setup_inventory_systems(app);
    }
}
