//! Hearthbound - Entry Point
//!
//! Controls:
//! - WASD: Move
//! - Mouse: Look around
//! - Shift: Sprint
//! - Ctrl: Sneak
//! - Space: Jump
//! - E: Interact (hold for some objects)
//! - R: Lock the focused door again (needs its key)
//! - F: Eat or drink
//! - 1-9: Take from an open container, Shift+1-9 to deposit
//! - Escape: Pause/Unpause

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Hearthbound".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())

        // Audio
        .add_plugins(bevy_kira_audio::AudioPlugin)

        // Our game plugin
        .add_plugins(hearthbound::HearthboundPlugin)

        .run();
}
