//! UI module - survival HUD, interaction prompt and pause overlay.

mod hud;
mod plugin;

pub use hud::{container_listing, prompt_line, HudRoot, StatBar};
pub use plugin::{pause_summary, UiPlugin};
