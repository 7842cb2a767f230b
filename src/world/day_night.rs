//! Game clock and the sun it drives.

use bevy::prelude::*;
use serde::Deserialize;
use std::time::Duration;

use crate::core::ClockEvent;

pub const HOURS_PER_DAY: f32 = 24.0;
/// Latest settable hour; keeps `set_time` from rolling the day.
const LAST_SETTABLE_HOUR: f32 = 23.999;
const MIN_SECONDS_PER_HOUR: f32 = 0.1;

/// Clock tuning, section `day_night` of gameplay.ron.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DayNightConfig {
    pub starting_hour: f32,
    pub starting_day: u32,
    /// Real seconds per in-game hour
    pub seconds_per_hour: f32,
    pub day_start_hour: f32,
    pub night_start_hour: f32,
    pub active: bool,
    /// Peak sun illuminance at noon (lux)
    pub sun_illuminance: f32,
    pub day_ambient: f32,
    pub night_ambient: f32,
}

impl Default for DayNightConfig {
    fn default() -> Self {
        Self {
            starting_hour: 8.0,
            starting_day: 1,
            seconds_per_hour: 60.0,
            day_start_hour: 6.0,
            night_start_hour: 20.0,
            active: true,
            sun_illuminance: 10_000.0,
            day_ambient: 400.0,
            night_ambient: 40.0,
        }
    }
}

impl DayNightConfig {
    pub fn sanitized(mut self) -> Self {
        self.starting_hour = self.starting_hour.clamp(0.0, LAST_SETTABLE_HOUR);
        self.starting_day = self.starting_day.max(1);
        self.seconds_per_hour = self.seconds_per_hour.max(MIN_SECONDS_PER_HOUR);
        self.day_start_hour = self.day_start_hour.clamp(0.0, HOURS_PER_DAY);
        self.night_start_hour = self.night_start_hour.clamp(0.0, HOURS_PER_DAY);
        self.sun_illuminance = self.sun_illuminance.max(0.0);
        self.day_ambient = self.day_ambient.max(0.0);
        self.night_ambient = self.night_ambient.max(0.0);
        self
    }
}

/// The world clock.
#[derive(Resource, Debug, Clone)]
pub struct DayNightCycle {
    config: DayNightConfig,
    hours: f32,
    day: u32,
    active: bool,
    was_day: bool,
    signals: Vec<ClockEvent>,
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self::new(DayNightConfig::default())
    }
}

impl DayNightCycle {
    /// New clock at the configured start. Queues the initial time, day and
    /// day/night notifications.
    pub fn new(config: DayNightConfig) -> Self {
        let config = config.sanitized();
        let mut clock = Self {
            hours: config.starting_hour,
            day: config.starting_day,
            active: config.active,
            was_day: false,
            signals: Vec::new(),
            config,
        };
        clock.was_day = clock.is_day();
        clock.signals.extend([
            ClockEvent::TimeChanged { hours: clock.hours },
            ClockEvent::DayChanged { day: clock.day },
            ClockEvent::DayNightChanged {
                is_day: clock.was_day,
            },
        ]);
        clock
    }

    pub fn config(&self) -> &DayNightConfig {
        &self.config
    }

    pub fn hours(&self) -> f32 {
        self.hours
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_day(&self) -> bool {
        self.hours >= self.config.day_start_hour && self.hours < self.config.night_start_hour
    }

    /// 0 at midnight, 0.5 at noon.
    pub fn normalized_time(&self) -> f32 {
        self.hours / HOURS_PER_DAY
    }

    /// Sun elevation in degrees: -90 at midnight, 0 at six, 90 at noon.
    pub fn sun_rotation(&self) -> f32 {
        self.normalized_time() * 360.0 - 90.0
    }

    pub fn formatted_time(&self) -> String {
        let (h, m, _) = self.clock_parts();
        format!("{h:02}:{m:02}")
    }

    pub fn formatted_time_with_seconds(&self) -> String {
        let (h, m, s) = self.clock_parts();
        format!("{h:02}:{m:02}:{s:02}")
    }

    fn clock_parts(&self) -> (u32, u32, u32) {
        let hours = self.hours.floor();
        let minutes_f = self.hours.fract() * 60.0;
        let minutes = minutes_f.floor();
        let seconds = (minutes_f.fract() * 60.0).floor();
        (hours as u32, minutes as u32, seconds as u32)
    }

    /// Advance by real time while the cycle runs.
    pub fn tick(&mut self, delta: Duration) {
        if !self.active {
            return;
        }
        self.shift_hours(delta.as_secs_f64() / f64::from(self.config.seconds_per_hour));
        self.after_time_change();
    }

    /// Non-finite hours are ignored.
    pub fn set_time(&mut self, hours: f32) {
        if !hours.is_finite() {
            warn!("Ignoring clock time {hours}");
            return;
        }
        self.hours = hours.clamp(0.0, LAST_SETTABLE_HOUR);
        self.after_time_change();
    }

    /// Ignored below day 1.
    pub fn set_day(&mut self, day: u32) {
        if day >= 1 {
            self.day = day;
            self.signals.push(ClockEvent::DayChanged { day });
        }
    }

    /// Shift the clock, wrapping across days in either direction. The day
    /// counter never drops below 1. Non-finite shifts are ignored.
    pub fn add_hours(&mut self, delta: f32) {
        if !delta.is_finite() {
            warn!("Ignoring clock shift of {delta} hours");
            return;
        }
        self.shift_hours(f64::from(delta));
        self.after_time_change();
    }

    /// Move the clock by `delta` hours in one step. A shift spanning several
    /// days queues a single day notification for the day it lands on.
    fn shift_hours(&mut self, delta: f64) {
        let total = f64::from(self.hours) + delta;
        let whole_days = (total / f64::from(HOURS_PER_DAY)).floor();
        let hours = total.rem_euclid(f64::from(HOURS_PER_DAY)) as f32;
        // Rounding to f32 can land exactly on midnight of the next day
        self.hours = if hours < HOURS_PER_DAY { hours } else { 0.0 };

        let day = (f64::from(self.day) + whole_days).clamp(1.0, f64::from(u32::MAX)) as u32;
        if day != self.day {
            self.day = day;
            self.signals.push(ClockEvent::DayChanged { day });
        }
    }

    /// Jump to the next sunrise, tomorrow's if it already passed.
    pub fn skip_to_sunrise(&mut self) {
        if self.hours >= self.config.day_start_hour {
            self.advance_day();
        }
        self.set_time(self.config.day_start_hour);
    }

    /// Jump to the next sunset, tomorrow's if it already passed.
    pub fn skip_to_sunset(&mut self) {
        if self.hours >= self.config.night_start_hour {
            self.advance_day();
        }
        self.set_time(self.config.night_start_hour);
    }

    pub fn set_cycle_speed(&mut self, seconds_per_hour: f32) {
        self.config.seconds_per_hour = seconds_per_hour.max(MIN_SECONDS_PER_HOUR);
    }

    pub fn pause(&mut self) {
        self.active = false;
    }

    pub fn resume(&mut self) {
        self.active = true;
    }

    pub fn toggle(&mut self) {
        self.active = !self.active;
    }

    fn advance_day(&mut self) {
        self.day += 1;
        self.signals.push(ClockEvent::DayChanged { day: self.day });
    }

    fn after_time_change(&mut self) {
        let is_day = self.is_day();
        if is_day != self.was_day {
            self.was_day = is_day;
            self.signals.push(ClockEvent::DayNightChanged { is_day });
        }
        self.signals.push(ClockEvent::TimeChanged { hours: self.hours });
    }

    pub fn take_signals(&mut self) -> Vec<ClockEvent> {
        std::mem::take(&mut self.signals)
    }
}

/// Directional light steered by the clock.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Sun;

pub fn tick_clock(time: Res<Time>, mut clock: ResMut<DayNightCycle>) {
    clock.tick(time.delta());
}

pub fn broadcast_clock(mut clock: ResMut<DayNightCycle>, mut events: EventWriter<ClockEvent>) {
    for event in clock.take_signals() {
        if let ClockEvent::DayNightChanged { is_day } = event {
            info!(
                "{} falls on day {} at {}",
                if is_day { "Day" } else { "Night" },
                clock.day(),
                clock.formatted_time()
            );
        }
        events.send(event);
    }
}

/// Pitch the sun with the clock and fade light with elevation.
pub fn apply_sun_lighting(
    clock: Res<DayNightCycle>,
    mut suns: Query<(&mut Transform, &mut DirectionalLight), With<Sun>>,
    ambient: Option<ResMut<AmbientLight>>,
) {
    let elevation = clock.sun_rotation().to_radians();
    let daylight = elevation.sin().max(0.0);
    let config = clock.config();

    for (mut transform, mut light) in suns.iter_mut() {
        transform.rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4)
            * Quat::from_rotation_x(-elevation);
        light.illuminance = config.sun_illuminance * daylight;
    }

    if let Some(mut ambient) = ambient {
        ambient.brightness = config.night_ambient + (config.day_ambient - config.night_ambient) * daylight;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_clock(starting_hour: f32) -> DayNightCycle {
        let mut clock = DayNightCycle::new(DayNightConfig {
            starting_hour,
            seconds_per_hour: 1.0,
            ..default()
        });
        clock.take_signals();
        clock
    }

    fn days(signals: &[ClockEvent]) -> Vec<u32> {
        signals
            .iter()
            .filter_map(|s| match s {
                ClockEvent::DayChanged { day } => Some(*day),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn starts_with_initial_notifications() {
        let mut clock = DayNightCycle::default();
        assert_eq!(clock.hours(), 8.0);
        assert_eq!(
            clock.take_signals(),
            vec![
                ClockEvent::TimeChanged { hours: 8.0 },
                ClockEvent::DayChanged { day: 1 },
                ClockEvent::DayNightChanged { is_day: true },
            ]
        );
    }

    #[test]
    fn ticking_rolls_over_midnight() {
        let mut clock = fast_clock(23.0);
        clock.tick(Duration::from_secs(2));
        assert_eq!(clock.day(), 2);
        assert!((clock.hours() - 1.0).abs() < 1e-4);
        assert_eq!(days(&clock.take_signals()), vec![2]);
    }

    #[test]
    fn day_night_edges_fire_once() {
        let mut clock = fast_clock(19.5);
        clock.tick(Duration::from_secs(1));
        let signals = clock.take_signals();
        assert!(signals.contains(&ClockEvent::DayNightChanged { is_day: false }));

        clock.tick(Duration::from_secs(1));
        let signals = clock.take_signals();
        assert!(!signals.iter().any(|s| matches!(s, ClockEvent::DayNightChanged { .. })));
        assert!(matches!(signals.last(), Some(ClockEvent::TimeChanged { .. })));
    }

    #[test]
    fn paused_clock_does_not_move() {
        let mut clock = fast_clock(12.0);
        clock.pause();
        clock.tick(Duration::from_secs(5));
        assert_eq!(clock.hours(), 12.0);
        assert!(clock.take_signals().is_empty());
        clock.toggle();
        assert!(clock.is_active());
    }

    #[test]
    fn add_hours_wraps_both_ways_without_dropping_below_day_one() {
        let mut clock = fast_clock(2.0);
        clock.add_hours(-5.0);
        assert_eq!(clock.day(), 1);
        assert!((clock.hours() - 21.0).abs() < 1e-4);

        clock.set_day(3);
        clock.add_hours(-22.0);
        assert_eq!(clock.day(), 2);
        clock.add_hours(48.0);
        assert_eq!(clock.day(), 4);
    }

    #[test]
    fn huge_shifts_land_in_one_step() {
        let mut clock = fast_clock(2.0);
        clock.add_hours(1.0e9);
        assert_eq!(clock.day(), 41_666_667);
        assert!((clock.hours() - 18.0).abs() < 1e-3);
        assert_eq!(days(&clock.take_signals()), vec![41_666_667]);

        clock.add_hours(-1.0e9);
        assert_eq!(clock.day(), 1);
        assert!((clock.hours() - 2.0).abs() < 1e-3);
        assert_eq!(days(&clock.take_signals()), vec![1]);

        // Already on day 1, so only the hour moves
        clock.add_hours(-1.0e9);
        assert_eq!(clock.day(), 1);
        assert!((clock.hours() - 10.0).abs() < 1e-3);
        assert!(days(&clock.take_signals()).is_empty());
    }

    #[test]
    fn non_finite_shifts_are_ignored() {
        let mut clock = fast_clock(12.0);
        clock.add_hours(f32::INFINITY);
        clock.add_hours(f32::NEG_INFINITY);
        clock.add_hours(f32::NAN);
        clock.set_time(f32::NAN);
        assert_eq!(clock.hours(), 12.0);
        assert_eq!(clock.day(), 1);
        assert!(clock.take_signals().is_empty());
    }

    #[test]
    fn long_frame_rolls_the_day_once() {
        let mut clock = fast_clock(23.0);
        clock.tick(Duration::from_secs(24 * 10 + 2));
        assert_eq!(clock.day(), 12);
        assert!((clock.hours() - 1.0).abs() < 1e-3);
        assert_eq!(days(&clock.take_signals()), vec![12]);
    }

    #[test]
    fn skip_to_sunrise_advances_day_when_past() {
        let mut clock = fast_clock(10.0);
        clock.skip_to_sunrise();
        assert_eq!(clock.day(), 2);
        assert_eq!(clock.hours(), 6.0);

        let mut early = fast_clock(3.0);
        early.skip_to_sunrise();
        assert_eq!(early.day(), 1);

        let mut evening = fast_clock(21.0);
        evening.skip_to_sunset();
        assert_eq!(evening.day(), 2);
        assert_eq!(evening.hours(), 20.0);
        assert!(!evening.is_day());
    }

    #[test]
    fn set_time_and_day_clamp() {
        let mut clock = fast_clock(12.0);
        clock.set_time(30.0);
        assert_eq!(clock.hours(), LAST_SETTABLE_HOUR);
        clock.set_time(-1.0);
        assert_eq!(clock.hours(), 0.0);
        clock.set_day(0);
        assert_eq!(clock.day(), 1);
        clock.set_cycle_speed(0.0);
        assert_eq!(clock.config().seconds_per_hour, MIN_SECONDS_PER_HOUR);
    }

    #[test]
    fn formatting_and_sun_angle() {
        let mut clock = fast_clock(0.0);
        clock.set_time(13.5);
        assert_eq!(clock.formatted_time(), "13:30");
        assert_eq!(clock.formatted_time_with_seconds(), "13:30:00");
        assert_eq!(clock.sun_rotation(), 112.5);

        clock.set_time(6.0);
        assert_eq!(clock.sun_rotation(), 0.0);
        assert_eq!(clock.normalized_time(), 0.25);
    }
}
