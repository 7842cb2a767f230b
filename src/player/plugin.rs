//! Player plugin - movement, camera and gameplay input.

use bevy::prelude::*;

use super::movement;

/// Player plugin - handles player movement, camera and input.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        movement::setup_movement_systems(app);
    }
}
