//! World plugin - the scene, its interactables and the day/night cycle.

use bevy::prelude::*;

use super::data::{load_interactables, InteractableRegistry};
use super::day_night::DayNightCycle;
use super::spawning::{spawn_block, spawn_ground, spawn_placement, spawn_sun, SpawnAssets};
use super::systems;
use crate::core::{GameState, GameplayConfig};
use crate::player::spawn_player;

const PLAYER_START: Vec3 = Vec3::new(0.0, 1.0, 6.0);
const GROUND_HALF_EXTENT: f32 = 30.0;

/// World plugin - handles data loading and world setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        systems::setup_world_systems(app);

        app.add_systems(Startup, load_interactables)
            // Built once; pausing leaves and re-enters InGame
            .add_systems(OnExit(GameState::Loading), setup_world);
    }
}

/// Build the scene from the interactable registry and spawn the player.
pub fn setup_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    registry: Res<InteractableRegistry>,
    config: Res<GameplayConfig>,
) {
    let mut assets = SpawnAssets {
        meshes: &mut meshes,
        materials: &mut materials,
    };

    spawn_ground(&mut commands, &mut assets, GROUND_HALF_EXTENT);
    spawn_sun(&mut commands);

    // Cottage walls around the doorway at z = 0
    let wall = Color::srgb(0.55, 0.5, 0.45);
    spawn_block(&mut commands, &mut assets, Vec3::new(-3.0, 1.25, 0.0), Vec3::new(2.5, 1.25, 0.1), wall);
    spawn_block(&mut commands, &mut assets, Vec3::new(3.0, 1.25, 0.0), Vec3::new(2.5, 1.25, 0.1), wall);
    spawn_block(&mut commands, &mut assets, Vec3::new(0.0, 2.35, 0.0), Vec3::new(0.5, 0.15, 0.1), wall);
    spawn_block(&mut commands, &mut assets, Vec3::new(-5.5, 1.25, -4.0), Vec3::new(0.1, 1.25, 4.0), wall);
    spawn_block(&mut commands, &mut assets, Vec3::new(5.5, 1.25, -4.0), Vec3::new(0.1, 1.25, 4.0), wall);
    spawn_block(&mut commands, &mut assets, Vec3::new(0.0, 1.25, -8.0), Vec3::new(5.5, 1.25, 0.1), wall);

    let placements = registry.placements();
    info!("Spawning {} interactables", placements.len());
    for placement in placements {
        spawn_placement(&mut commands, &mut assets, placement);
    }

    commands.insert_resource(DayNightCycle::new(config.day_night.clone()));
    spawn_player(&mut commands, PLAYER_START, &config);
}
