//! Interaction plugin - focus detection and hold-to-interact.

use bevy::prelude::*;

use super::systems;

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        systems::setup_interaction_systems(app);
    }
}
