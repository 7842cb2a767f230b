//! Generic usable objects: levers, notes, shrines and the like.

use bevy::prelude::*;
use serde::Deserialize;

use crate::interaction::{Instigator, Interactable, InteractionData, InteractionSettings};

/// Usage rules for a [`Usable`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UsableConfig {
    pub settings: InteractionSettings,
    pub reusable: bool,
    /// `None` allows unlimited uses
    pub max_uses: Option<u32>,
}

impl Default for UsableConfig {
    fn default() -> Self {
        Self {
            settings: InteractionSettings::default(),
            reusable: true,
            max_uses: None,
        }
    }
}

#[derive(Component, Debug, Clone, Default)]
pub struct Usable {
    config: UsableConfig,
    enabled: bool,
    uses: u32,
    used: bool,
}

impl Usable {
    pub fn new(config: UsableConfig) -> Self {
        let config = UsableConfig {
            settings: config.settings.sanitized(),
            ..config
        };
        Self {
            enabled: config.settings.enabled,
            config,
            uses: 0,
            used: false,
        }
    }

    pub fn uses(&self) -> u32 {
        self.uses
    }

    pub fn has_been_used(&self) -> bool {
        self.used
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn can_be_used_again(&self) -> bool {
        self.config.max_uses.is_none_or(|max| self.uses < max)
    }

    /// Forget past uses and re-enable.
    pub fn reset_uses(&mut self) {
        self.uses = 0;
        self.used = false;
        self.enabled = true;
    }
}

impl Interactable for Usable {
    fn interact(&mut self, instigator: &mut Instigator) -> bool {
        if !self.can_interact(instigator) {
            return false;
        }
        self.uses += 1;
        self.used = true;
        if !self.can_be_used_again() {
            self.enabled = false;
        }
        true
    }

    fn interaction_data(&self, _instigator: &Instigator) -> InteractionData {
        let settings = &self.config.settings;
        let data = InteractionData::new(settings.prompt.clone())
            .with_secondary(settings.secondary_prompt.clone())
            .with_duration(settings.hold_duration);
        if self.enabled {
            data
        } else {
            data.blocked()
        }
    }

    fn can_interact(&self, _instigator: &Instigator) -> bool {
        if !self.enabled {
            return false;
        }
        if !self.config.reusable && self.used {
            return false;
        }
        self.can_be_used_again()
    }

    fn interaction_distance(&self) -> f32 {
        self.config.settings.max_distance
    }
}
