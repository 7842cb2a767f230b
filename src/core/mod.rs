//! Core game module - states, events, config and system ordering.
//!
//! This module provides the foundation that all other game systems build upon.

mod config;
mod error;
mod events;
mod plugin;
mod states;
mod tween;

pub use config::{GameplayConfig, GAMEPLAY_CONFIG_PATH};
pub use error::{parse_ron, read_ron_file, DataLoadError};
pub use events::*;
pub use plugin::{configure_survival_sets, CorePlugin, SurvivalSet};
pub use states::*;
pub use tween::*;
