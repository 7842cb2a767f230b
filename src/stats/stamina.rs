//! Stamina: a regenerating pool with sprint drain, action costs and an
//! exhaustion state that gates sprinting.

use bevy::prelude::*;
use serde::Deserialize;
use std::time::Duration;

use super::pool::{Hysteresis, PoolSignal, ResourcePool};

/// Period of the continuous drain.
pub const DRAIN_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Why stamina was spent. Bookkeeping only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaminaDrainReason {
    #[default]
    Sprint,
    Jump,
    Custom,
}

/// Stamina tuning, section `stamina` of gameplay.ron.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StaminaConfig {
    pub max_stamina: f32,
    /// Fraction of max at or below which the owner becomes exhausted
    pub exhaustion_threshold: f32,
    /// Fraction of max that must be exceeded to recover
    pub recovery_threshold: f32,
    /// Regen per second while standing still
    pub regen_rate_idle: f32,
    /// Regen per second while moving
    pub regen_rate_moving: f32,
    pub regen_delay_after_depletion: f32,
    pub regen_delay_after_usage: f32,
    pub exhausted_regen_multiplier: f32,
    /// Drain per second while sprinting
    pub sprint_drain_rate: f32,
    pub jump_cost: f32,
    pub min_stamina_to_sprint: f32,
    pub min_stamina_to_jump: f32,
    pub breathing_enabled: bool,
    /// Fraction below which breathing feedback starts
    pub breathing_threshold: f32,
    pub breathing_intensity: f32,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            max_stamina: 100.0,
            exhaustion_threshold: 0.0,
            recovery_threshold: 0.5,
            regen_rate_idle: 20.0,
            regen_rate_moving: 5.0,
            regen_delay_after_depletion: 5.0,
            regen_delay_after_usage: 2.5,
            exhausted_regen_multiplier: 0.5,
            sprint_drain_rate: 15.0,
            jump_cost: 10.0,
            min_stamina_to_sprint: 5.0,
            min_stamina_to_jump: 5.0,
            breathing_enabled: true,
            breathing_threshold: 0.3,
            breathing_intensity: 1.0,
        }
    }
}

impl StaminaConfig {
    pub fn sanitized(self) -> Self {
        let exhaustion_threshold = self.exhaustion_threshold.clamp(0.0, 1.0);
        Self {
            max_stamina: if self.max_stamina > 0.0 { self.max_stamina } else { 100.0 },
            exhaustion_threshold,
            recovery_threshold: self.recovery_threshold.clamp(exhaustion_threshold, 1.0),
            regen_rate_idle: self.regen_rate_idle.max(0.0),
            regen_rate_moving: self.regen_rate_moving.max(0.0),
            regen_delay_after_depletion: self.regen_delay_after_depletion.max(0.0),
            regen_delay_after_usage: self.regen_delay_after_usage.max(0.0),
            exhausted_regen_multiplier: self.exhausted_regen_multiplier.clamp(0.0, 1.0),
            sprint_drain_rate: self.sprint_drain_rate.max(0.0),
            jump_cost: self.jump_cost.max(0.0),
            min_stamina_to_sprint: self.min_stamina_to_sprint.max(0.0),
            min_stamina_to_jump: self.min_stamina_to_jump.max(0.0),
            breathing_enabled: self.breathing_enabled,
            breathing_threshold: self.breathing_threshold.clamp(0.01, 1.0),
            breathing_intensity: self.breathing_intensity.max(0.0),
        }
    }
}

#[derive(Debug, Clone)]
struct ActiveDrain {
    rate: f32,
    timer: Timer,
}

/// Stamina component for the player (or anything that sprints).
#[derive(Component, Debug, Clone)]
pub struct Stamina {
    pool: ResourcePool,
    config: StaminaConfig,
    drain: Option<ActiveDrain>,
    drain_rate_multiplier: f32,
    regen_rate_multiplier: f32,
    is_moving: bool,
    last_reason: Option<StaminaDrainReason>,
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new(&StaminaConfig::default())
    }
}

impl Stamina {
    pub fn new(config: &StaminaConfig) -> Self {
        let pool = ResourcePool::new(config.max_stamina)
            .with_hysteresis(Hysteresis::new(
                config.exhaustion_threshold,
                config.recovery_threshold,
                config.exhausted_regen_multiplier,
            ))
            .with_regen_delays(config.regen_delay_after_usage, config.regen_delay_after_depletion);

        Self {
            pool,
            config: config.clone(),
            drain: None,
            drain_rate_multiplier: 1.0,
            regen_rate_multiplier: 1.0,
            is_moving: false,
            last_reason: None,
        }
    }

    pub fn config(&self) -> &StaminaConfig {
        &self.config
    }

    pub fn current(&self) -> f32 {
        self.pool.current()
    }

    pub fn max(&self) -> f32 {
        self.pool.max()
    }

    pub fn percent(&self) -> f32 {
        self.pool.percent()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pool.is_exhausted()
    }

    pub fn is_regenerating(&self) -> bool {
        self.pool.is_regenerating()
    }

    pub fn is_draining(&self) -> bool {
        self.drain.is_some()
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn last_reason(&self) -> Option<StaminaDrainReason> {
        self.last_reason
    }

    pub fn regen_delay_remaining(&self) -> f32 {
        self.pool.regen_delay_remaining()
    }

    /// Spend a fixed amount. Fails without change if there is not enough.
    pub fn consume(&mut self, amount: f32, reason: StaminaDrainReason) -> bool {
        let consumed = self.pool.consume(amount);
        if consumed {
            self.last_reason = Some(reason);
        }
        consumed
    }

    /// Begin draining `rate_per_second` in fixed periods. No-op if already
    /// draining or the rate is not positive.
    pub fn start_drain(&mut self, rate_per_second: f32) {
        if self.drain.is_some() || rate_per_second <= 0.0 {
            return;
        }
        self.drain = Some(ActiveDrain {
            rate: rate_per_second,
            timer: Timer::new(DRAIN_TICK_INTERVAL, TimerMode::Repeating),
        });
        self.last_reason = Some(StaminaDrainReason::Sprint);
    }

    /// Stop draining. Applies the short regen delay unless the drain emptied
    /// the pool (which already set the long one).
    pub fn stop_drain(&mut self) {
        if self.drain.take().is_none() {
            return;
        }
        if self.pool.current() > 0.0 {
            self.pool.reset_regen_delay(false);
        }
    }

    /// Advance the drain timer and apply every elapsed period.
    pub fn tick_drain(&mut self, delta: Duration) {
        let Some(drain) = self.drain.as_mut() else {
            return;
        };
        drain.timer.tick(delta);
        let periods = drain.timer.times_finished_this_tick();
        let per_period = drain.rate * self.drain_rate_multiplier * DRAIN_TICK_INTERVAL.as_secs_f32();

        for _ in 0..periods {
            if self.pool.drain(per_period) {
                self.pool.reset_regen_delay(true);
                self.stop_drain();
                break;
            }
        }
    }

    /// Per-frame update: regen delay, then regen, then exhaustion.
    pub fn tick(&mut self, dt: f32) {
        let rate = self.effective_regen_rate();
        let draining = self.is_draining();
        self.pool.tick(dt, rate, draining);
    }

    pub fn set_moving(&mut self, moving: bool) {
        self.is_moving = moving;
    }

    /// Add stamina. Negative amounts drain.
    pub fn restore(&mut self, amount: f32) {
        self.pool.restore(amount);
    }

    pub fn set(&mut self, value: f32) {
        self.pool.set(value);
    }

    pub fn fully_restore(&mut self) {
        self.pool.fully_restore();
    }

    pub fn set_max(&mut self, new_max: f32) {
        self.pool.set_max(new_max);
    }

    pub fn set_regen_rate(&mut self, rate: f32) {
        self.config.regen_rate_idle = rate.max(0.0);
    }

    pub fn set_drain_rate_multiplier(&mut self, multiplier: f32) {
        self.drain_rate_multiplier = multiplier.max(0.0);
    }

    pub fn set_regen_rate_multiplier(&mut self, multiplier: f32) {
        self.regen_rate_multiplier = multiplier.max(0.0);
    }

    pub fn reset_modifiers(&mut self) {
        self.drain_rate_multiplier = 1.0;
        self.regen_rate_multiplier = 1.0;
    }

    pub fn effective_drain_rate(&self, base_rate: f32) -> f32 {
        base_rate * self.drain_rate_multiplier
    }

    /// Regen rate for the current movement state, with modifiers.
    pub fn effective_regen_rate(&self) -> f32 {
        let base = if self.is_moving {
            self.config.regen_rate_moving
        } else {
            self.config.regen_rate_idle
        };
        base * self.regen_rate_multiplier
    }

    pub fn has_enough(&self, required: f32) -> bool {
        self.pool.current() >= required
    }

    pub fn can_sprint(&self) -> bool {
        self.pool.current() >= self.config.min_stamina_to_sprint && !self.pool.is_exhausted()
    }

    /// Exhaustion does not block jumping.
    pub fn can_jump(&self) -> bool {
        self.pool.current() >= self.config.min_stamina_to_jump
    }

    /// Feedback strength in `[0, breathing_intensity]`, zero above the threshold.
    pub fn breathing_intensity(&self) -> f32 {
        if !self.config.breathing_enabled {
            return 0.0;
        }
        let percent = self.percent();
        if percent > self.config.breathing_threshold {
            return 0.0;
        }
        (1.0 - percent / self.config.breathing_threshold) * self.config.breathing_intensity
    }

    pub fn has_signals(&self) -> bool {
        self.pool.has_signals()
    }

    pub fn take_signals(&mut self) -> Vec<PoolSignal> {
        self.pool.take_signals()
    }
}
