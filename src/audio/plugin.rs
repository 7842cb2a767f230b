//! Audio plugin - one-shot cues for world and body notifications.

use bevy::prelude::*;

use super::cues::{load_cues, play_body_cues, play_world_cues};
use crate::core::SurvivalSet;

/// Requires `bevy_kira_audio::AudioPlugin` on the app.
pub struct AudioCuePlugin;

impl Plugin for AudioCuePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_cues).add_systems(
            Update,
            (play_world_cues, play_body_cues).in_set(SurvivalSet::Presentation),
        );
    }
}
