//! Inventory module - items, backpack inventory and key ring.

mod components;
mod items;
mod plugin;
mod systems;

pub use components::*;
pub use items::{ItemData, ItemKind};
pub use plugin::InventoryPlugin;
