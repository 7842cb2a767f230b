//! Hearthbound - a first-person survival sandbox in Bevy.
//!
//! A small cottage to explore while stamina, hunger and thirst tick away.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, gameplay events, config loading, system ordering
//! - **Stats**: Stamina and survival needs
//! - **Inventory**: Items, backpack, keys, eating and drinking
//! - **Interaction**: Focus detection, prompts, hold-to-interact
//! - **World**: Doors, pickups, containers, usables, day/night cycle
//! - **Player**: First-person movement, camera and input
//! - **UI**: HUD and pause overlay
//! - **Audio**: Sound cues

pub mod audio;
pub mod core;
pub mod interaction;
pub mod inventory;
pub mod player;
pub mod stats;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Gameplay plugins without presentation or player input.
pub struct SimulationPlugins;

impl Plugin for SimulationPlugins {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)
            .add_plugins(stats::StatsPlugin)
            .add_plugins(inventory::InventoryPlugin)
            .add_plugins(interaction::InteractionPlugin)
            .add_plugins(world::WorldPlugin);
    }
}

/// Main game plugin that adds all sub-plugins.
pub struct HearthboundPlugin;

impl Plugin for HearthboundPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(SimulationPlugins)
            .add_plugins(player::PlayerPlugin)
            .add_plugins(ui::UiPlugin)
            .add_plugins(audio::AudioCuePlugin);
    }
}
