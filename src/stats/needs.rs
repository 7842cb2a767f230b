//! Hunger and thirst: two pools that decay on independent timers.
//!
//! Critical and depleted are separate level flags. Critical means
//! `0 < percent <= threshold`, so an empty need is depleted but not critical.

use bevy::prelude::*;
use serde::Deserialize;
use std::time::Duration;

use super::pool::{PoolSignal, ResourcePool};
use crate::core::NeedKind;

/// Shortest allowed decay interval in seconds.
pub const MIN_DECAY_INTERVAL: f32 = 0.1;

/// Tuning for one need.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NeedConfig {
    pub max: f32,
    /// Amount removed every interval
    pub decay_amount: f32,
    /// Seconds between decay steps
    pub decay_interval: f32,
    /// Fraction of max at or below which the need is critical
    pub critical_threshold: f32,
}

impl Default for NeedConfig {
    fn default() -> Self {
        Self::hunger()
    }
}

impl NeedConfig {
    pub fn hunger() -> Self {
        Self {
            max: 100.0,
            decay_amount: 1.0,
            decay_interval: 5.0,
            critical_threshold: 0.2,
        }
    }

    pub fn thirst() -> Self {
        Self {
            max: 100.0,
            decay_amount: 1.5,
            decay_interval: 4.0,
            critical_threshold: 0.2,
        }
    }

    pub fn sanitized(self) -> Self {
        Self {
            max: if self.max > 0.0 { self.max } else { 100.0 },
            decay_amount: self.decay_amount.max(0.0),
            decay_interval: self.decay_interval.max(MIN_DECAY_INTERVAL),
            critical_threshold: self.critical_threshold.clamp(0.0, 1.0),
        }
    }
}

/// Section `needs` of gameplay.ron.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    pub hunger: NeedConfig,
    pub thirst: NeedConfig,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            hunger: NeedConfig::hunger(),
            thirst: NeedConfig::thirst(),
        }
    }
}

impl NeedsConfig {
    pub fn sanitized(self) -> Self {
        Self {
            hunger: self.hunger.sanitized(),
            thirst: self.thirst.sanitized(),
        }
    }
}

/// Queued need notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NeedSignal {
    Changed { current: f32, max: f32 },
    Critical { percent: f32 },
    Depleted,
}

/// One decaying need.
#[derive(Debug, Clone)]
pub struct NeedTrack {
    pool: ResourcePool,
    decay_amount: f32,
    timer: Timer,
    critical_threshold: f32,
    is_critical: bool,
    is_depleted: bool,
    signals: Vec<NeedSignal>,
}

impl NeedTrack {
    pub fn new(config: &NeedConfig) -> Self {
        let config = config.clone().sanitized();
        Self {
            pool: ResourcePool::new(config.max),
            decay_amount: config.decay_amount,
            timer: Timer::from_seconds(config.decay_interval, TimerMode::Repeating),
            critical_threshold: config.critical_threshold,
            is_critical: false,
            is_depleted: false,
            signals: Vec::new(),
        }
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

    pub fn is_critical(&self) -> bool {
        self.is_critical
    }

    pub fn is_depleted(&self) -> bool {
        self.is_depleted
    }

    pub fn decay_amount(&self) -> f32 {
        self.decay_amount
    }

    pub fn decay_interval(&self) -> f32 {
        self.timer.duration().as_secs_f32()
    }

    pub fn is_decay_paused(&self) -> bool {
        self.timer.paused()
    }

    /// Advance the decay timer, consuming once per elapsed interval.
    pub fn tick(&mut self, delta: Duration) {
        self.timer.tick(delta);
        for _ in 0..self.timer.times_finished_this_tick() {
            self.consume(self.decay_amount);
        }
    }

    /// Best-effort decrease, clamped at zero. Rejects non-positive amounts.
    pub fn consume(&mut self, amount: f32) -> bool {
        if amount <= 0.0 {
            return false;
        }
        self.pool.drain(amount);
        self.after_mutation();
        true
    }

    /// Increase, clamped at max. Rejects non-positive amounts.
    pub fn restore(&mut self, amount: f32) -> bool {
        if amount <= 0.0 {
            return false;
        }
        let old = self.pool.current();
        self.pool.restore(amount);
        if self.pool.current() != old {
            // Sub-epsilon restores still count for needs
            self.pool.take_signals();
            self.signals.push(NeedSignal::Changed {
                current: self.pool.current(),
                max: self.pool.max(),
            });
            self.update_critical_state();
        }
        true
    }

    /// Set directly. Notifies only if the value moved.
    pub fn set(&mut self, value: f32) {
        let clamped = value.clamp(0.0, self.pool.max());
        if clamped == self.pool.current() {
            return;
        }
        self.pool.set(clamped);
        self.after_mutation();
    }

    pub fn fully_restore(&mut self) {
        self.set(self.pool.max());
    }

    /// Change capacity, keeping the fill percentage.
    pub fn set_max(&mut self, new_max: f32) {
        if new_max <= 0.0 {
            return;
        }
        self.pool.set_max(new_max);
        self.after_mutation();
    }

    /// Replace the decay step and restart the timer with the new interval.
    pub fn set_decay_rate(&mut self, amount: f32, interval: f32) {
        self.decay_amount = amount.max(0.0);
        let paused = self.timer.paused();
        self.timer = Timer::from_seconds(interval.max(MIN_DECAY_INTERVAL), TimerMode::Repeating);
        if paused {
            self.timer.pause();
        }
    }

    /// Pause or resume decay without losing elapsed progress.
    pub fn set_decay_paused(&mut self, paused: bool) {
        if paused {
            self.timer.pause();
        } else {
            self.timer.unpause();
        }
    }

    fn after_mutation(&mut self) {
        let changed = self
            .pool
            .take_signals()
            .into_iter()
            .any(|signal| matches!(signal, PoolSignal::Changed { .. }));
        if changed {
            self.signals.push(NeedSignal::Changed {
                current: self.pool.current(),
                max: self.pool.max(),
            });
            self.update_critical_state();
        }
    }

    fn update_critical_state(&mut self) {
        let percent = self.pool.percent();

        let was_critical = self.is_critical;
        self.is_critical = percent <= self.critical_threshold && percent > 0.0;
        if self.is_critical && !was_critical {
            self.signals.push(NeedSignal::Critical { percent });
        }

        let was_depleted = self.is_depleted;
        self.is_depleted = self.pool.current() <= 0.0;
        if self.is_depleted && !was_depleted {
            self.signals.push(NeedSignal::Depleted);
        }
    }

    pub fn has_signals(&self) -> bool {
        !self.signals.is_empty()
    }

    pub fn take_signals(&mut self) -> Vec<NeedSignal> {
        std::mem::take(&mut self.signals)
    }
}

/// Survival needs component.
#[derive(Component, Debug, Clone)]
pub struct Needs {
    pub hunger: NeedTrack,
    pub thirst: NeedTrack,
}

impl Default for Needs {
    fn default() -> Self {
        Self::new(&NeedsConfig::default())
    }
}

impl Needs {
    pub fn new(config: &NeedsConfig) -> Self {
        Self {
            hunger: NeedTrack::new(&config.hunger),
            thirst: NeedTrack::new(&config.thirst),
        }
    }

    pub fn get(&self, kind: NeedKind) -> &NeedTrack {
        match kind {
            NeedKind::Hunger => &self.hunger,
            NeedKind::Thirst => &self.thirst,
        }
    }

    pub fn get_mut(&mut self, kind: NeedKind) -> &mut NeedTrack {
        match kind {
            NeedKind::Hunger => &mut self.hunger,
            NeedKind::Thirst => &mut self.thirst,
        }
    }

    pub fn tick(&mut self, delta: Duration) {
        self.hunger.tick(delta);
        self.thirst.tick(delta);
    }

    pub fn set_decay_paused(&mut self, paused: bool) {
        self.hunger.set_decay_paused(paused);
        self.thirst.set_decay_paused(paused);
    }

    pub fn has_signals(&self) -> bool {
        self.hunger.has_signals() || self.thirst.has_signals()
    }
}
