//! Stats plugin - stamina and survival needs.

use bevy::prelude::*;

use super::systems;

/// Stats plugin - ticks stamina and needs and broadcasts their changes.
pub struct StatsPlugin;

impl Plugin for StatsPlugin {
    fn build(&self, app: &mut App) {
        systems::setup_stats_systems(app);
    }
}
