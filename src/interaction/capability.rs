//! Capabilities that world objects implement to take part in interaction.

use bevy::prelude::*;

use crate::inventory::{Inventory, KeyRing};

/// Distance an interactable accepts when it does not say otherwise (units).
pub const DEFAULT_INTERACTABLE_DISTANCE: f32 = 200.0;

/// What the prompt shows for the focused object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionData {
    pub text: String,
    pub secondary_text: String,
    /// Seconds the interact button must be held; zero means instant
    pub duration: f32,
    pub can_interact: bool,
}

impl InteractionData {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            can_interact: true,
            ..default()
        }
    }

    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary_text = secondary.into();
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration.max(0.0);
        self
    }

    pub fn blocked(mut self) -> Self {
        self.can_interact = false;
        self
    }

    /// True when the prompt would visibly change (text or eligibility).
    pub fn differs_meaningfully(&self, other: &InteractionData) -> bool {
        self.text != other.text || self.can_interact != other.can_interact
    }
}

/// The entity doing the interacting, with the parts of it objects may touch.
pub struct Instigator<'a> {
    pub entity: Entity,
    pub position: Vec3,
    pub keys: &'a mut KeyRing,
    pub inventory: &'a mut Inventory,
}

/// Anything the focus tracker can target.
pub trait Interactable {
    /// Perform the interaction. Returns whether it succeeded.
    fn interact(&mut self, instigator: &mut Instigator) -> bool;

    /// Prompt data as seen by `instigator`.
    fn interaction_data(&self, instigator: &Instigator) -> InteractionData;

    fn can_interact(&self, instigator: &Instigator) -> bool;

    /// Furthest hit distance (units) this object accepts.
    fn interaction_distance(&self) -> f32 {
        DEFAULT_INTERACTABLE_DISTANCE
    }

    fn as_pickupable(&self) -> Option<&dyn Pickupable> {
        None
    }
}

/// Interactables that go away once collected.
pub trait Pickupable: Interactable {
    fn should_destroy_on_pickup(&self) -> bool;
}

/// Anything that can hold keys.
pub trait KeyHolder {
    fn has_key(&self, key_id: &str) -> bool;
    fn add_key(&mut self, key_id: &str, display_name: &str);
    fn remove_key(&mut self, key_id: &str) -> bool;
}

/// Shared tuning every interactable object carries.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub prompt: String,
    pub secondary_prompt: String,
    /// Hold time in seconds, clamped to 0-10
    pub hold_duration: f32,
    /// Max interaction distance in units, clamped to 50-1000
    pub max_distance: f32,
    pub enabled: bool,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            prompt: "Interact".to_string(),
            secondary_prompt: String::new(),
            hold_duration: 0.0,
            max_distance: DEFAULT_INTERACTABLE_DISTANCE,
            enabled: true,
        }
    }
}

impl InteractionSettings {
    pub fn sanitized(mut self) -> Self {
        self.hold_duration = self.hold_duration.clamp(0.0, 10.0);
        self.max_distance = self.max_distance.clamp(50.0, 1000.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_change_alone_is_not_meaningful() {
        let a = InteractionData::new("Open Door");
        let b = a.clone().with_duration(2.0);
        assert!(!a.differs_meaningfully(&b));

        let c = a.clone().blocked();
        assert!(a.differs_meaningfully(&c));

        let d = InteractionData::new("Close Door");
        assert!(a.differs_meaningfully(&d));
    }

    #[test]
    fn settings_clamp_ranges() {
        let settings = InteractionSettings {
            hold_duration: 30.0,
            max_distance: 10.0,
            ..default()
        }
        .sanitized();
        assert_eq!(settings.hold_duration, 10.0);
        assert_eq!(settings.max_distance, 50.0);
    }
}
