//! Game state definitions that control the overall flow of the game.
//!
//! Survival simulation (stamina, needs, interaction, doors, clock) only runs
//! while `InGame`. Pausing freezes every gameplay timer because the systems
//! that tick them stop running.

use bevy::prelude::*;

/// Main game states.
///
/// - Start in `Loading` while gameplay data files are read
/// - `InGame` is active play
/// - `Paused` freezes gameplay but keeps the world visible
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading gameplay data
    #[default]
    Loading,
    /// Active gameplay
    InGame,
    /// Game is paused (overlay on gameplay)
    Paused,
}

/// Sub-states for gameplay - only active when GameState::InGame.
///
/// - `Exploring`: movement, sprinting and world interaction
/// - `Container`: a container panel is open, movement and look input are ignored
#[derive(SubStates, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum PlayState {
    #[default]
    Exploring,
    Container,
}
