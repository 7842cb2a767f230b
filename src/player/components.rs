//! Player-related components.

use bevy::prelude::*;
use serde::Deserialize;

use crate::stats::Stamina;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Tracks player movement state for physics and stamina.
#[derive(Component, Debug, Clone, Default)]
pub struct MovementState {
    pub is_grounded: bool,
    pub vertical_velocity: f32,
    pub is_sprinting: bool,
    pub is_sneaking: bool,
    /// Horizontal speed last frame, metres per second
    pub horizontal_speed: f32,
}

/// Configuration for the first-person controller, section `movement` of
/// gameplay.ron.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Mouse sensitivity multiplier
    pub mouse_sensitivity: f32,
    /// Invert Y-axis for mouse look
    pub invert_y: bool,
    /// Movement speeds in metres per second
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub sneak_speed: f32,
    /// Applied to every speed while exhausted
    pub exhausted_speed_multiplier: f32,
    /// Jump velocity
    pub jump_force: f32,
    /// Gravity acceleration
    pub gravity: f32,
    /// Speed above which the player counts as moving for stamina regen
    pub moving_threshold: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 1.5,
            invert_y: false,
            walk_speed: 2.5,
            sprint_speed: 5.0,
            sneak_speed: 1.0,
            exhausted_speed_multiplier: 0.7,
            jump_force: 6.0,
            gravity: 15.0,
            moving_threshold: 0.01,
        }
    }
}

/// Max ground speed for the current gait.
pub fn compute_move_speed(config: &PlayerConfig, state: &MovementState, exhausted: bool) -> f32 {
    let base = if state.is_sprinting {
        config.sprint_speed
    } else if state.is_sneaking {
        config.sneak_speed
    } else {
        config.walk_speed
    };
    if exhausted {
        base * config.exhausted_speed_multiplier
    } else {
        base
    }
}

/// Start or stop sprinting from this frame's intent. Sprinting needs
/// `can_sprint` to begin and ends when the drain stops on its own or
/// exhaustion sets in.
pub fn apply_sprint_intent(state: &mut MovementState, stamina: &mut Stamina, wants_sprint: bool) {
    if state.is_sprinting {
        let drain_ended = !stamina.is_draining();
        if !wants_sprint || drain_ended || stamina.is_exhausted() {
            state.is_sprinting = false;
            stamina.stop_drain();
        }
        return;
    }

    if wants_sprint && stamina.can_sprint() {
        state.is_sprinting = true;
        state.is_sneaking = false;
        let rate = stamina.config().sprint_drain_rate;
        stamina.start_drain(rate);
    }
}

/// Spend the jump cost if stamina allows. Exhaustion alone does not block it.
pub fn try_jump(stamina: &mut Stamina) -> bool {
    if !stamina.can_jump() {
        return false;
    }
    let cost = stamina.config().jump_cost;
    stamina.consume(cost, crate::stats::StaminaDrainReason::Jump);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StaminaConfig;
    use std::time::Duration;

    #[test]
    fn exhaustion_slows_every_gait() {
        let config = PlayerConfig::default();
        let mut state = MovementState::default();
        assert_eq!(compute_move_speed(&config, &state, false), 2.5);
        assert_eq!(compute_move_speed(&config, &state, true), 2.5 * 0.7);

        state.is_sprinting = true;
        assert_eq!(compute_move_speed(&config, &state, false), 5.0);

        state.is_sprinting = false;
        state.is_sneaking = true;
        assert_eq!(compute_move_speed(&config, &state, false), 1.0);
    }

    #[test]
    fn sprint_starts_drain_and_release_stops_it() {
        let mut stamina = Stamina::default();
        let mut state = MovementState::default();

        apply_sprint_intent(&mut state, &mut stamina, true);
        assert!(state.is_sprinting);
        assert!(stamina.is_draining());

        apply_sprint_intent(&mut state, &mut stamina, false);
        assert!(!state.is_sprinting);
        assert!(!stamina.is_draining());
    }

    #[test]
    fn sprint_ends_when_stamina_runs_out() {
        let mut stamina = Stamina::new(&StaminaConfig {
            max_stamina: 10.0,
            sprint_drain_rate: 100.0,
            min_stamina_to_sprint: 1.0,
            ..default()
        });
        let mut state = MovementState::default();
        apply_sprint_intent(&mut state, &mut stamina, true);
        stamina.tick_drain(Duration::from_millis(100));
        assert_eq!(stamina.current(), 0.0);
        assert!(!stamina.is_draining());

        apply_sprint_intent(&mut state, &mut stamina, true);
        assert!(!state.is_sprinting);

        // Still held, but an empty pool cannot start a new sprint
        apply_sprint_intent(&mut state, &mut stamina, true);
        assert!(!state.is_sprinting);
    }

    #[test]
    fn jump_costs_stamina_and_needs_the_minimum() {
        let mut stamina = Stamina::default();
        assert!(try_jump(&mut stamina));
        assert_eq!(stamina.current(), 90.0);

        stamina.set(4.0);
        assert!(!try_jump(&mut stamina));
        assert_eq!(stamina.current(), 4.0);
    }
}
