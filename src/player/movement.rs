//! First-person player movement, camera control and gameplay input.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::core::{
    ConsumeItemRequest, GameState, GameplayConfig, InteractionCommand, LockRequest, PlayState,
    SurvivalSet, TransferDirection, TransferRequest,
};
use crate::interaction::{InteractionEye, InteractionFocus, InteractionProbe};
use crate::inventory::{Inventory, KeyRing};
use crate::stats::{Needs, Stamina};
use crate::world::Container;

const INTERACT_KEY: KeyCode = KeyCode::KeyE;
const CONSUME_KEY: KeyCode = KeyCode::KeyF;
const RELOCK_KEY: KeyCode = KeyCode::KeyR;
const SPRINT_KEY: KeyCode = KeyCode::ShiftLeft;
const SNEAK_KEY: KeyCode = KeyCode::ControlLeft;
const JUMP_KEY: KeyCode = KeyCode::Space;

/// Number keys 1-9 select container or inventory slots 0-8.
const SLOT_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// The player's camera.
#[derive(Component, Default)]
pub struct PlayerCamera {
    /// Current pitch angle in radians (looking up/down)
    pub pitch: f32,
}

/// Set up player movement and input systems.
pub fn setup_movement_systems(app: &mut App) {
    app.init_resource::<PlayerConfig>()
        .add_systems(OnEnter(GameState::InGame), grab_cursor)
        .add_systems(OnExit(GameState::InGame), release_cursor)
        .add_systems(OnEnter(PlayState::Container), halt_player)
        .add_systems(
            Update,
            (mouse_look, player_movement)
                .in_set(SurvivalSet::Input)
                .run_if(in_state(PlayState::Exploring)),
        )
        .add_systems(
            Update,
            (interaction_input, container_input.run_if(in_state(PlayState::Container)))
                .in_set(SurvivalSet::Input),
        );
}

/// Grab and hide cursor when entering gameplay.
fn grab_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
}

/// Release cursor when leaving gameplay.
fn release_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Rotate the body for yaw and the camera for pitch.
pub fn mouse_look(
    mut mouse_motion: EventReader<MouseMotion>,
    config: Res<PlayerConfig>,
    mut player_query: Query<&mut Transform, With<Player>>,
    mut camera_query: Query<(&mut Transform, &mut PlayerCamera), Without<Player>>,
) {
    let delta: Vec2 = mouse_motion.read().map(|event| event.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }

    let Ok(mut player_transform) = player_query.get_single_mut() else {
        return;
    };
    let Ok((mut camera_transform, mut camera)) = camera_query.get_single_mut() else {
        return;
    };

    let sensitivity = config.mouse_sensitivity * 0.001;
    let y_invert = if config.invert_y { -1.0 } else { 1.0 };

    player_transform.rotate_y(-delta.x * sensitivity);

    // About 80 degrees either way
    camera.pitch = (camera.pitch - delta.y * sensitivity * y_invert).clamp(-1.4, 1.4);
    camera_transform.rotation = Quat::from_rotation_x(camera.pitch);
}

/// WASD movement with stamina-gated sprint and jump.
///
/// Uses Rapier's KinematicCharacterController for collision detection.
pub fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    rapier_context: Query<&RapierContext>,
    mut player_query: Query<
        (
            Entity,
            &Transform,
            &mut MovementState,
            &mut Stamina,
            &mut KinematicCharacterController,
            Option<&KinematicCharacterControllerOutput>,
        ),
        With<Player>,
    >,
) {
    let Ok((player_entity, transform, mut movement, mut stamina, mut controller, output)) =
        player_query.get_single_mut()
    else {
        return;
    };
    let dt = time.delta_secs();

    // Capsule is capsule_y(0.5, 0.3), so the bottom sits 0.8 below centre
    let is_grounded = match rapier_context.get_single() {
        Ok(context) => context
            .cast_ray(
                transform.translation - Vec3::Y * 0.75,
                Vec3::NEG_Y,
                0.15,
                true,
                QueryFilter::default().exclude_collider(player_entity),
            )
            .is_some(),
        Err(_) => true,
    };
    movement.is_grounded = is_grounded;

    if is_grounded {
        if movement.vertical_velocity < 0.0 {
            movement.vertical_velocity = 0.0;
        }
        if keyboard.just_pressed(JUMP_KEY) && try_jump(&mut stamina) {
            movement.vertical_velocity = config.jump_force;
        }
    } else {
        movement.vertical_velocity -= config.gravity * dt;
    }

    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction.x += 1.0;
    }
    let direction = direction.normalize_or_zero();

    // Sneaking blocks sprint; sprint needs movement input
    let sneaking = keyboard.pressed(SNEAK_KEY);
    let wants_sprint = keyboard.pressed(SPRINT_KEY) && !sneaking && direction != Vec3::ZERO;
    apply_sprint_intent(&mut movement, &mut stamina, wants_sprint);
    movement.is_sneaking = sneaking && !movement.is_sprinting;

    // Horizontal facing only
    let yaw = transform.rotation.to_euler(EulerRot::YXZ).0;
    let heading = Quat::from_rotation_y(yaw) * direction;
    let speed = compute_move_speed(&config, &movement, stamina.is_exhausted());

    let horizontal = heading * speed * dt;
    let vertical = Vec3::Y * movement.vertical_velocity * dt;
    controller.translation = Some(horizontal + vertical);

    // The controller output lags a frame, so fall back to the intended speed
    movement.horizontal_speed = match output {
        Some(output) if dt > 0.0 => {
            let moved = output.effective_translation;
            Vec2::new(moved.x, moved.z).length() / dt
        }
        _ => (heading * speed).length(),
    };
    stamina.set_moving(movement.horizontal_speed > config.moving_threshold);
}

/// Opening a container stops the player in place.
fn halt_player(mut query: Query<(&mut MovementState, &mut Stamina), With<Player>>) {
    for (mut movement, mut stamina) in &mut query {
        movement.is_sprinting = false;
        movement.horizontal_speed = 0.0;
        stamina.stop_drain();
        stamina.set_moving(false);
    }
}

/// Interact, relock and consume keys for every play sub-state.
pub fn interaction_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    players: Query<(Entity, &Inventory, &InteractionFocus), With<Player>>,
    mut interaction: EventWriter<InteractionCommand>,
    mut consume: EventWriter<ConsumeItemRequest>,
    mut relock: EventWriter<LockRequest>,
) {
    let Ok((player, inventory, focus)) = players.get_single() else {
        return;
    };

    if keyboard.just_pressed(INTERACT_KEY) {
        interaction.send(InteractionCommand::Press { instigator: player });
    }
    if keyboard.just_released(INTERACT_KEY) {
        interaction.send(InteractionCommand::Release { instigator: player });
    }

    if keyboard.just_pressed(RELOCK_KEY) {
        if let Some(door) = focus.current_focus() {
            relock.send(LockRequest {
                instigator: player,
                door,
            });
        }
    }

    if keyboard.just_pressed(CONSUME_KEY) {
        match inventory.first_consumable() {
            Some(item) => {
                consume.send(ConsumeItemRequest {
                    owner: player,
                    item_id: item.id.clone(),
                });
            }
            None => debug!("Nothing to eat or drink"),
        }
    }
}

/// Slot keys move items while a container is open. Hold Shift to deposit.
pub fn container_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    players: Query<Entity, With<Player>>,
    containers: Query<(Entity, &Container)>,
    mut transfers: EventWriter<TransferRequest>,
) {
    let Ok(player) = players.get_single() else {
        return;
    };
    let Some((container, _)) = containers
        .iter()
        .find(|(_, container)| container.opened_by() == Some(player))
    else {
        return;
    };

    let direction = if keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight) {
        TransferDirection::Deposit
    } else {
        TransferDirection::Take
    };

    for (index, key) in SLOT_KEYS.iter().enumerate() {
        if keyboard.just_pressed(*key) {
            transfers.send(TransferRequest {
                owner: player,
                container,
                direction,
                index,
            });
        }
    }
}

/// Spawn the player entity with camera.
pub fn spawn_player(commands: &mut Commands, position: Vec3, config: &GameplayConfig) -> Entity {
    commands.insert_resource(config.movement.clone());

    let player = commands
        .spawn((
            Player,
            MovementState::default(),
            Stamina::new(&config.stamina),
            Needs::new(&config.needs),
            InteractionFocus::new(&config.interaction),
            InteractionProbe::default(),
            KeyRing::default(),
            Inventory::default(),
            Transform::from_translation(position),
            Visibility::default(),
        ))
        .insert((
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.3),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                // ~40cm step height
                autostep: Some(CharacterAutostep {
                    max_height: CharacterLength::Absolute(0.4),
                    min_width: CharacterLength::Absolute(0.3),
                    include_dynamic_bodies: false,
                }),
                max_slope_climb_angle: 45_f32.to_radians(),
                min_slope_slide_angle: 30_f32.to_radians(),
                snap_to_ground: Some(CharacterLength::Absolute(0.5)),
                ..default()
            },
        ))
        .id();

    // Eye level relative to the capsule centre
    commands.entity(player).with_children(|parent| {
        parent.spawn((
            Camera3d::default(),
            PlayerCamera::default(),
            InteractionEye,
            Transform::from_xyz(0.0, 0.6, 0.0),
        ));
    });

    info!("Player spawned at {:?}", position);
    player
}
