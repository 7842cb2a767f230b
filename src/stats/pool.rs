//! Generic depletable, regenerating numeric resource.
//!
//! Stamina and each survival need own one of these. The pool clamps on every
//! mutation, tracks the regen delay, and optionally runs an exhaustion state
//! with a hysteresis band. Notifications are queued and drained by the owner.

use serde::{Deserialize, Serialize};

/// Changes smaller than this are not worth a notification.
pub const CHANGE_EPSILON: f32 = 0.01;

/// Exhaustion band: enter at or below `exhaustion_threshold * max`, leave
/// strictly above `recovery_threshold * max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hysteresis {
    pub exhaustion_threshold: f32,
    pub recovery_threshold: f32,
    /// Regen rate multiplier applied while exhausted.
    pub exhausted_regen_multiplier: f32,
}

impl Hysteresis {
    pub fn new(exhaustion_threshold: f32, recovery_threshold: f32, exhausted_regen_multiplier: f32) -> Self {
        let exhaustion_threshold = exhaustion_threshold.clamp(0.0, 1.0);
        Self {
            exhaustion_threshold,
            recovery_threshold: recovery_threshold.clamp(exhaustion_threshold, 1.0),
            exhausted_regen_multiplier: exhausted_regen_multiplier.max(0.0),
        }
    }
}

/// Queued pool notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoolSignal {
    Changed { current: f32, max: f32 },
    /// Entered the exhausted band.
    Depleted,
    /// Left the exhausted band.
    Recovered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePool {
    current: f32,
    max: f32,
    regen_delay_timer: f32,
    is_regenerating: bool,
    is_exhausted: bool,
    exhaustion: Option<Hysteresis>,
    delay_after_usage: f32,
    delay_after_depletion: f32,
    #[serde(skip)]
    signals: Vec<PoolSignal>,
}

impl ResourcePool {
    /// Full pool. Non-positive `max` falls back to 1.
    pub fn new(max: f32) -> Self {
        let max = if max > 0.0 { max } else { 1.0 };
        Self {
            current: max,
            max,
            regen_delay_timer: 0.0,
            is_regenerating: false,
            is_exhausted: false,
            exhaustion: None,
            delay_after_usage: 0.0,
            delay_after_depletion: 0.0,
            signals: Vec::new(),
        }
    }

    pub fn with_hysteresis(mut self, hysteresis: Hysteresis) -> Self {
        self.exhaustion = Some(hysteresis);
        self
    }

    pub fn with_regen_delays(mut self, after_usage: f32, after_depletion: f32) -> Self {
        self.delay_after_usage = after_usage.max(0.0);
        self.delay_after_depletion = after_depletion.max(0.0);
        self
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn percent(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.is_exhausted
    }

    pub fn is_regenerating(&self) -> bool {
        self.is_regenerating
    }

    pub fn regen_delay_remaining(&self) -> f32 {
        self.regen_delay_timer.max(0.0)
    }

    pub fn hysteresis(&self) -> Option<Hysteresis> {
        self.exhaustion
    }

    /// Subtract `amount` if the pool holds at least that much.
    ///
    /// Resets the regen delay (the long one when this empties the pool).
    pub fn consume(&mut self, amount: f32) -> bool {
        if amount <= 0.0 || self.current < amount {
            return false;
        }

        let old = self.current;
        self.current = (self.current - amount).clamp(0.0, self.max);
        let emptied = self.current <= 0.0 && old > 0.0;
        self.reset_regen_delay(emptied);
        self.push_changed();
        true
    }

    /// Best-effort subtraction that clamps at zero.
    ///
    /// Does not touch the regen delay. Returns true when this call emptied a
    /// previously non-empty pool.
    pub fn drain(&mut self, amount: f32) -> bool {
        if amount <= 0.0 {
            return false;
        }
        let old = self.current;
        self.current = (self.current - amount).clamp(0.0, self.max);
        if self.current != old {
            self.push_changed();
        }
        self.current <= 0.0 && old > 0.0
    }

    /// Add `amount` (negative values drain). Notifies only on a visible change.
    pub fn restore(&mut self, amount: f32) {
        let old = self.current;
        self.current = (self.current + amount).clamp(0.0, self.max);
        if (self.current - old).abs() > CHANGE_EPSILON {
            self.push_changed();
        }
    }

    /// Set the value directly. Always notifies.
    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
        self.push_changed();
    }

    /// Change capacity, keeping the fill percentage. Ignores non-positive values.
    pub fn set_max(&mut self, new_max: f32) {
        if new_max <= 0.0 {
            return;
        }
        let percent = self.percent();
        self.max = new_max;
        self.current = (new_max * percent).clamp(0.0, new_max);
        self.push_changed();
    }

    /// Refill, clear exhaustion and the regen delay.
    pub fn fully_restore(&mut self) {
        self.current = self.max;
        self.is_exhausted = false;
        self.regen_delay_timer = 0.0;
        self.push_changed();
        self.signals.push(PoolSignal::Recovered);
    }

    /// Restart the regen delay.
    pub fn reset_regen_delay(&mut self, from_depletion: bool) {
        self.regen_delay_timer = if from_depletion {
            self.delay_after_depletion
        } else {
            self.delay_after_usage
        };
        self.is_regenerating = false;
    }

    /// One simulation step: regen delay, then regen, then exhaustion.
    ///
    /// `suppress_regen` is set while an external drain is active.
    pub fn tick(&mut self, dt: f32, regen_rate: f32, suppress_regen: bool) {
        if self.regen_delay_timer > 0.0 {
            self.regen_delay_timer -= dt;
            self.is_regenerating = false;
        } else {
            self.is_regenerating = true;
        }

        if self.is_regenerating && !suppress_regen && self.current < self.max {
            self.regenerate(dt, regen_rate);
        }

        self.update_exhaustion();
    }

    fn regenerate(&mut self, dt: f32, regen_rate: f32) {
        let mut rate = regen_rate;
        if self.is_exhausted {
            if let Some(h) = self.exhaustion {
                rate *= h.exhausted_regen_multiplier;
            }
        }
        self.restore(rate * dt);
    }

    /// Re-evaluate the exhaustion band, queueing a signal on each edge.
    pub fn update_exhaustion(&mut self) {
        let Some(h) = self.exhaustion else {
            return;
        };

        let exhaustion_value = self.max * h.exhaustion_threshold;
        let recovery_value = self.max * h.recovery_threshold;

        if !self.is_exhausted && self.current <= exhaustion_value {
            self.is_exhausted = true;
            self.signals.push(PoolSignal::Depleted);
        } else if self.is_exhausted && self.current > recovery_value {
            self.is_exhausted = false;
            self.signals.push(PoolSignal::Recovered);
        }
    }

    pub fn has_signals(&self) -> bool {
        !self.signals.is_empty()
    }

    /// Take all queued signals in emission order.
    pub fn take_signals(&mut self) -> Vec<PoolSignal> {
        std::mem::take(&mut self.signals)
    }

    fn push_changed(&mut self) {
        self.signals.push(PoolSignal::Changed {
            current: self.current,
            max: self.max,
        });
    }
}
