//! Player module - player entity, movement, camera control and input.

mod components;
mod movement;
mod plugin;

pub use components::*;
pub use movement::{container_input, interaction_input, spawn_player, PlayerCamera};
pub use plugin::PlayerPlugin;
