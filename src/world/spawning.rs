//! Entity spawning for the world scene.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::container::{Container, ContainerConfig};
use super::data::{ResolvedKind, ResolvedPlacement};
use super::day_night::Sun;
use super::door::{Door, DoorConfig, DoorHinge, DoorLock};
use super::pickup::{Pickup, PickupConfig};
use super::usable::{Usable, UsableConfig};
use crate::inventory::{ItemData, ItemKind};

/// Marker for everything the world scene spawned.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct WorldEntity;

const DOOR_WIDTH: f32 = 1.0;
const DOOR_HEIGHT: f32 = 2.1;
const DOOR_THICKNESS: f32 = 0.08;

/// Shared meshes and materials for one spawn pass.
pub struct SpawnAssets<'a> {
    pub meshes: &'a mut Assets<Mesh>,
    pub materials: &'a mut Assets<StandardMaterial>,
}

impl SpawnAssets<'_> {
    fn solid(&mut self, mesh: impl Into<Mesh>, color: Color) -> (Mesh3d, MeshMaterial3d<StandardMaterial>) {
        (
            Mesh3d(self.meshes.add(mesh)),
            MeshMaterial3d(self.materials.add(StandardMaterial {
                base_color: color,
                perceptual_roughness: 0.9,
                ..default()
            })),
        )
    }
}

/// Flat ground with a collider.
pub fn spawn_ground(commands: &mut Commands, assets: &mut SpawnAssets, half_extent: f32) {
    commands.spawn((
        assets.solid(
            Plane3d::default().mesh().size(half_extent * 2.0, half_extent * 2.0),
            Color::srgb(0.32, 0.36, 0.24),
        ),
        Transform::default(),
        Collider::cuboid(half_extent, 0.05, half_extent),
        WorldEntity,
    ));
}

/// Static box, used for walls and furniture.
pub fn spawn_block(commands: &mut Commands, assets: &mut SpawnAssets, center: Vec3, half_size: Vec3, color: Color) {
    commands.spawn((
        assets.solid(Cuboid::from_size(half_size * 2.0), color),
        Transform::from_translation(center),
        Collider::cuboid(half_size.x, half_size.y, half_size.z),
        WorldEntity,
    ));
}

/// The directional light driven by the clock.
pub fn spawn_sun(commands: &mut Commands) {
    commands.spawn((
        Sun,
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::default(),
        WorldEntity,
    ));
}

/// Door pivoting around its hinge. `frame` is the hinge position and the
/// closed orientation.
pub fn spawn_door(
    commands: &mut Commands,
    assets: &mut SpawnAssets,
    frame: Transform,
    config: DoorConfig,
    lock: Option<DoorLock>,
) -> Entity {
    let side = match config.hinge {
        DoorHinge::Left => 1.0,
        DoorHinge::Right => -1.0,
    };
    let panel_offset = Vec3::new(side * DOOR_WIDTH * 0.5, DOOR_HEIGHT * 0.5, 0.0);
    let color = if lock.as_ref().is_some_and(|l| l.locked) {
        Color::srgb(0.35, 0.2, 0.12)
    } else {
        Color::srgb(0.5, 0.33, 0.18)
    };

    let mut door = Door::new(config).with_frame(frame);
    if let Some(lock) = lock {
        door = door.with_lock(lock);
    }

    let visual = assets.solid(
        Cuboid::new(DOOR_WIDTH, DOOR_HEIGHT, DOOR_THICKNESS),
        color,
    );

    commands
        .spawn((
            door,
            frame,
            Visibility::default(),
            RigidBody::KinematicPositionBased,
            Collider::compound(vec![(
                panel_offset,
                Quat::IDENTITY,
                Collider::cuboid(DOOR_WIDTH * 0.5, DOOR_HEIGHT * 0.5, DOOR_THICKNESS * 0.5),
            )]),
            WorldEntity,
        ))
        .with_children(|parent| {
            parent.spawn((visual, Transform::from_translation(panel_offset)));
        })
        .id()
}

fn item_color(kind: ItemKind) -> Color {
    match kind {
        ItemKind::Key => Color::srgb(0.85, 0.7, 0.2),
        ItemKind::Food => Color::srgb(0.75, 0.2, 0.15),
        ItemKind::Beverage => Color::srgb(0.2, 0.45, 0.8),
        ItemKind::Backpack => Color::srgb(0.4, 0.3, 0.2),
        _ => Color::srgb(0.6, 0.6, 0.6),
    }
}

pub fn spawn_pickup(
    commands: &mut Commands,
    assets: &mut SpawnAssets,
    transform: Transform,
    item: ItemData,
    config: PickupConfig,
) -> Entity {
    let size = if item.kind == ItemKind::Backpack { 0.25 } else { 0.12 };
    commands
        .spawn((
            assets.solid(Cuboid::from_length(size * 2.0), item_color(item.kind)),
            transform,
            Collider::cuboid(size, size, size),
            Sensor,
            Pickup::new(item, config),
            WorldEntity,
        ))
        .id()
}

pub fn spawn_container(
    commands: &mut Commands,
    assets: &mut SpawnAssets,
    transform: Transform,
    config: ContainerConfig,
) -> Entity {
    let half = Vec3::new(0.5, 0.3, 0.3);
    commands
        .spawn((
            assets.solid(Cuboid::from_size(half * 2.0), Color::srgb(0.45, 0.3, 0.15)),
            transform.with_translation(transform.translation + Vec3::Y * half.y),
            Collider::cuboid(half.x, half.y, half.z),
            Container::new(config),
            WorldEntity,
        ))
        .id()
}

pub fn spawn_usable(
    commands: &mut Commands,
    assets: &mut SpawnAssets,
    transform: Transform,
    config: UsableConfig,
) -> Entity {
    commands
        .spawn((
            assets.solid(Cylinder::new(0.15, 1.0), Color::srgb(0.55, 0.55, 0.6)),
            transform.with_translation(transform.translation + Vec3::Y * 0.5),
            Collider::cylinder(0.5, 0.15),
            Usable::new(config),
            WorldEntity,
        ))
        .id()
}

/// Spawn one resolved placement.
pub fn spawn_placement(commands: &mut Commands, assets: &mut SpawnAssets, placement: ResolvedPlacement) -> Entity {
    let transform = placement.transform;
    match placement.kind {
        ResolvedKind::Door(config, lock) => spawn_door(commands, assets, transform, config, lock),
        ResolvedKind::Pickup(item, config) => spawn_pickup(commands, assets, transform, item, config),
        ResolvedKind::Container(config) => spawn_container(commands, assets, transform, config),
        ResolvedKind::Usable(config) => spawn_usable(commands, assets, transform, config),
    }
}
