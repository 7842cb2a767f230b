//! Interaction module - what the player is looking at and how they use it.

mod capability;
mod focus;
mod plugin;
mod systems;
mod trace;

pub use capability::{
    Instigator, Interactable, InteractionData, InteractionSettings, KeyHolder, Pickupable,
    DEFAULT_INTERACTABLE_DISTANCE,
};
pub use focus::{
    FocusSignal, InteractableSource, InteractionConfig, InteractionFocus, MAX_DETECTION_INTERVAL,
    MAX_INTERACTION_DISTANCE, MIN_DETECTION_INTERVAL, MIN_INTERACTION_DISTANCE,
};
pub use plugin::InteractionPlugin;
pub use systems::{InteractableQuery, InteractionEye, InteractionProbe};
pub use trace::{ScriptedTrace, SpatialQuery, TraceHit, TraceRequest, UNITS_PER_METER};
