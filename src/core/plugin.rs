//! Core plugin that sets up game states, system ordering and config loading.

use bevy::prelude::*;

use super::config::GameplayConfig;
use super::states::*;

/// Frame phases for survival gameplay, chained in this order.
///
/// Mutation happens in `Input` and `Simulation`, queued signals become events
/// in `Broadcast`, and `Presentation` reads the settled state.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurvivalSet {
    Input,
    Simulation,
    Broadcast,
    Presentation,
}

/// Chain the survival sets. Safe to call more than once.
pub fn configure_survival_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            SurvivalSet::Input,
            SurvivalSet::Simulation,
            SurvivalSet::Broadcast,
            SurvivalSet::Presentation,
        )
            .chain(),
    );
}

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Paused) and the play sub-state
/// - Survival set ordering, gated on `InGame`
/// - Gameplay config loading
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        configure_survival_sets(app);

        app
            // Initialize game states
            .init_state::<GameState>()
            .add_sub_state::<PlayState>()

            // Gameplay only advances while in game
            .configure_sets(
                Update,
                (
                    SurvivalSet::Input,
                    SurvivalSet::Simulation,
                    SurvivalSet::Broadcast,
                    SurvivalSet::Presentation,
                )
                    .run_if(in_state(GameState::InGame)),
            )

            // Load gameplay data, then start playing
            .add_systems(OnEnter(GameState::Loading), load_gameplay_config)

            // Pause/unpause with Escape key
            .add_systems(
                Update,
                handle_pause_input.run_if(in_state(GameState::InGame).or(in_state(GameState::Paused)))
            );
    }
}

/// Read gameplay config and move on to gameplay.
fn load_gameplay_config(mut commands: Commands, mut next_state: ResMut<NextState<GameState>>) {
    commands.insert_resource(GameplayConfig::load());
    next_state.set(GameState::InGame);
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::InGame),
            _ => {}
        }
    }
}
