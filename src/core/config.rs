//! Gameplay tuning loaded from an external RON file.
//!
//! Allows tweaking survival parameters without recompilation. Every section
//! falls back to built-in defaults when absent, and values are clamped into
//! their safe ranges after loading.

use bevy::prelude::*;
use serde::Deserialize;

use super::error::{read_ron_file, DataLoadError};
use crate::interaction::InteractionConfig;
use crate::player::PlayerConfig;
use crate::stats::{NeedsConfig, StaminaConfig};
use crate::world::DayNightConfig;

pub const GAMEPLAY_CONFIG_PATH: &str = "assets/data/gameplay.ron";

/// Gameplay configuration loaded from assets/data/gameplay.ron.
#[derive(Resource, Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    pub stamina: StaminaConfig,
    pub needs: NeedsConfig,
    pub interaction: InteractionConfig,
    pub day_night: DayNightConfig,
    pub movement: PlayerConfig,
}

impl GameplayConfig {
    /// Load and sanitize a config file.
    pub fn load_from(path: &str) -> Result<Self, DataLoadError> {
        let config: Self = read_ron_file(path)?;
        Ok(config.sanitized())
    }

    /// Load from the default path, falling back to defaults on any error.
    pub fn load() -> Self {
        match Self::load_from(GAMEPLAY_CONFIG_PATH) {
            Ok(config) => {
                info!("Loaded gameplay config from {}", GAMEPLAY_CONFIG_PATH);
                config
            }
            Err(DataLoadError::FileNotFound(path)) => {
                warn!("Could not find {}. Using defaults.", path);
                Self::default()
            }
            Err(e) => {
                error!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Clamp every section into its documented range.
    pub fn sanitized(self) -> Self {
        Self {
            stamina: self.stamina.sanitized(),
            needs: self.needs.sanitized(),
            interaction: self.interaction.sanitized(),
            day_night: self.day_night.sanitized(),
            movement: self.movement,
        }
    }
}
