//! Audio module - sound cues driven by gameplay events.

mod cues;
mod plugin;

pub use cues::{container_cue, door_cue, pickup_cue, Cue, CueHandles};
pub use plugin::AudioCuePlugin;
