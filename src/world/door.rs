//! Hinged doors: a four-state open/close machine with an optional key lock.

use bevy::prelude::*;
use serde::Deserialize;
use std::time::Duration;

use crate::core::{ease_between, DoorSignal, LockRequest};
use crate::interaction::{Instigator, Interactable, InteractionData, KeyHolder};
use crate::inventory::KeyRing;

/// Below this a computed swing is treated as "do not move".
const ANGLE_EPSILON: f32 = 1.0e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoorState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

/// Which side the hinge sits on. Left hinges add yaw, right hinges subtract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum DoorHinge {
    #[default]
    Left,
    Right,
}

/// Per-door tuning, read from interactables.ron.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    pub hinge: DoorHinge,
    /// Degrees, clamped to 0-180
    pub max_open_angle: f32,
    /// Seconds, clamped to 0.1-5
    pub open_duration: f32,
    pub close_duration: f32,
    pub auto_close: bool,
    /// Seconds the door stays open before closing itself
    pub auto_close_delay: f32,
    pub open_from_both_sides: bool,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            hinge: DoorHinge::Left,
            max_open_angle: 90.0,
            open_duration: 1.0,
            close_duration: 1.2,
            auto_close: false,
            auto_close_delay: 3.0,
            open_from_both_sides: true,
        }
    }
}

impl DoorConfig {
    pub fn sanitized(mut self) -> Self {
        self.max_open_angle = self.max_open_angle.clamp(0.0, 180.0);
        self.open_duration = self.open_duration.clamp(0.1, 5.0);
        self.close_duration = self.close_duration.clamp(0.1, 5.0);
        self.auto_close_delay = self.auto_close_delay.max(0.0);
        self
    }
}

/// Key lock layered over a door.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DoorLock {
    pub required_key: String,
    pub key_name: String,
    pub locked: bool,
    pub can_relock: bool,
}

impl Default for DoorLock {
    fn default() -> Self {
        Self {
            required_key: String::new(),
            key_name: "Key".to_string(),
            locked: true,
            can_relock: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Swing {
    elapsed: f32,
    duration: f32,
}

#[derive(Component, Debug, Clone)]
pub struct Door {
    config: DoorConfig,
    lock: Option<DoorLock>,
    state: DoorState,
    /// Signed swing in degrees before the hinge is applied
    current_angle: f32,
    target_angle: f32,
    swing: Swing,
    auto_close: Option<Timer>,
    /// Transform of the closed door; side checks and rotation are relative to it
    frame: Transform,
    signals: Vec<DoorSignal>,
}

impl Default for Door {
    fn default() -> Self {
        Self::new(DoorConfig::default())
    }
}

impl Door {
    pub fn new(config: DoorConfig) -> Self {
        Self {
            config: config.sanitized(),
            lock: None,
            state: DoorState::Closed,
            current_angle: 0.0,
            target_angle: 0.0,
            swing: Swing {
                elapsed: 0.0,
                duration: 0.0,
            },
            auto_close: None,
            frame: Transform::IDENTITY,
            signals: Vec::new(),
        }
    }

    pub fn with_lock(mut self, lock: DoorLock) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn with_frame(mut self, frame: Transform) -> Self {
        self.frame = frame;
        self
    }

    pub fn config(&self) -> &DoorConfig {
        &self.config
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DoorState::Open
    }

    pub fn is_closed(&self) -> bool {
        self.state == DoorState::Closed
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, DoorState::Opening | DoorState::Closing)
    }

    pub fn current_angle(&self) -> f32 {
        self.current_angle
    }

    pub fn target_angle(&self) -> f32 {
        self.target_angle
    }

    /// How far open the door is, 0 closed to 1 fully open on either side.
    pub fn open_percentage(&self) -> f32 {
        if self.config.max_open_angle <= 0.0 {
            return 0.0;
        }
        self.current_angle.abs() / self.config.max_open_angle
    }

    pub fn lock(&self) -> Option<&DoorLock> {
        self.lock.as_ref()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.as_ref().is_some_and(|l| l.locked)
    }

    pub fn auto_close_pending(&self) -> bool {
        self.auto_close.is_some()
    }

    /// Swing target for an actor standing at `position`. Zero means the door
    /// refuses to open from that side.
    pub fn target_angle_for(&self, position: Vec3) -> f32 {
        let to_actor = (position - self.frame.translation).normalize_or_zero();
        let dot = self.frame.forward().dot(to_actor);

        if !self.config.open_from_both_sides && dot < 0.0 {
            return 0.0;
        }
        if dot >= 0.0 {
            self.config.max_open_angle
        } else {
            -self.config.max_open_angle
        }
    }

    /// Yaw in degrees with the hinge side applied.
    pub fn yaw(&self) -> f32 {
        match self.config.hinge {
            DoorHinge::Left => self.current_angle,
            DoorHinge::Right => -self.current_angle,
        }
    }

    /// World rotation for the current swing.
    pub fn rotation(&self) -> Quat {
        self.frame.rotation * Quat::from_rotation_y(self.yaw().to_radians())
    }

    /// Open away from `from`. Rejected while locked, moving, already open, or
    /// when standing on a disallowed side.
    pub fn open(&mut self, from: Vec3) -> bool {
        if self.is_locked() {
            self.signals.push(DoorSignal::LockedAttempt);
            return false;
        }
        if self.is_open() || self.is_moving() {
            return false;
        }
        self.start_opening(from)
    }

    pub fn close(&mut self) -> bool {
        if self.is_closed() || self.is_moving() {
            return false;
        }
        self.start_closing();
        true
    }

    pub fn toggle(&mut self, from: Vec3) -> bool {
        match self.state {
            DoorState::Closed => self.open(from),
            DoorState::Open => self.close(),
            DoorState::Opening | DoorState::Closing => false,
        }
    }

    fn start_opening(&mut self, from: Vec3) -> bool {
        let target = self.target_angle_for(from);
        if target.abs() < ANGLE_EPSILON {
            return false;
        }
        self.target_angle = target;
        self.state = DoorState::Opening;
        self.swing = Swing {
            elapsed: 0.0,
            duration: self.config.open_duration,
        };
        self.signals.push(DoorSignal::StartOpening);
        true
    }

    fn start_closing(&mut self) {
        self.auto_close = None;
        self.state = DoorState::Closing;
        self.swing = Swing {
            elapsed: 0.0,
            duration: self.config.close_duration,
        };
        self.signals.push(DoorSignal::StartClosing);
    }

    fn complete_opening(&mut self) {
        self.state = DoorState::Open;
        self.current_angle = self.target_angle;
        self.signals.push(DoorSignal::Opened);

        if self.config.auto_close {
            if self.config.auto_close_delay <= 0.0 {
                self.start_closing();
            } else {
                self.auto_close = Some(Timer::new(
                    Duration::from_secs_f32(self.config.auto_close_delay),
                    TimerMode::Once,
                ));
            }
        }
    }

    fn complete_closing(&mut self) {
        self.state = DoorState::Closed;
        self.current_angle = 0.0;
        self.signals.push(DoorSignal::Closed);
    }

    /// Advance the swing animation and the auto-close countdown.
    pub fn tick(&mut self, delta: Duration) {
        if self.is_moving() {
            self.advance_swing(delta.as_secs_f32());
            return;
        }

        let Some(timer) = self.auto_close.as_mut() else {
            return;
        };
        timer.tick(delta);
        if timer.finished() {
            self.auto_close = None;
            if self.is_open() {
                self.start_closing();
            }
        }
    }

    fn advance_swing(&mut self, dt: f32) {
        if self.swing.duration <= 0.0 {
            return;
        }
        self.swing.elapsed += dt;
        let alpha = (self.swing.elapsed / self.swing.duration).clamp(0.0, 1.0);

        self.current_angle = match self.state {
            DoorState::Opening => ease_between(0.0, self.target_angle, alpha),
            _ => ease_between(self.target_angle, 0.0, alpha),
        };

        if alpha >= 1.0 {
            match self.state {
                DoorState::Opening => self.complete_opening(),
                DoorState::Closing => self.complete_closing(),
                _ => {}
            }
        }
    }

    fn holds_key(&self, keys: &dyn KeyHolder) -> bool {
        self.lock
            .as_ref()
            .is_some_and(|l| !l.required_key.is_empty() && keys.has_key(&l.required_key))
    }

    /// Force the lock state without a key check. No-op on doors without a lock.
    pub fn set_locked_state(&mut self, locked: bool) {
        if let Some(lock) = self.lock.as_mut() {
            lock.locked = locked;
        }
    }

    /// Unlock with a key from `keys`. Leaves the door closed.
    pub fn unlock(&mut self, keys: &dyn KeyHolder) -> bool {
        if !self.holds_key(keys) || !self.is_locked() {
            return false;
        }
        self.set_locked_state(false);
        self.signals.push(DoorSignal::Unlocked);
        true
    }

    /// Relock. Needs the key, a relockable lock and a fully closed door.
    pub fn relock(&mut self, keys: &dyn KeyHolder) -> bool {
        let Some(lock) = self.lock.as_ref() else {
            return false;
        };
        if !lock.can_relock || lock.locked || !self.holds_key(keys) || !self.is_closed() {
            return false;
        }
        self.set_locked_state(true);
        self.signals.push(DoorSignal::Relocked);
        true
    }

    pub fn has_signals(&self) -> bool {
        !self.signals.is_empty()
    }

    pub fn take_signals(&mut self) -> Vec<DoorSignal> {
        std::mem::take(&mut self.signals)
    }
}

impl Interactable for Door {
    fn interact(&mut self, instigator: &mut Instigator) -> bool {
        if self.is_locked() {
            if self.holds_key(&*instigator.keys) {
                return self.unlock(&*instigator.keys);
            }
            self.signals.push(DoorSignal::LockedAttempt);
            return false;
        }
        match self.state {
            DoorState::Closed => self.open(instigator.position),
            DoorState::Open => self.close(),
            DoorState::Opening | DoorState::Closing => false,
        }
    }

    fn interaction_data(&self, instigator: &Instigator) -> InteractionData {
        if let Some(lock) = self.lock.as_ref().filter(|l| l.locked) {
            return if self.holds_key(&*instigator.keys) {
                InteractionData::new("Unlock Door")
                    .with_secondary(format!("Using {}", lock.key_name))
            } else {
                InteractionData::new("Locked")
                    .with_secondary(format!("Requires {}", lock.key_name))
                    .blocked()
            };
        }

        match self.state {
            DoorState::Closed => InteractionData::new("Open Door"),
            DoorState::Open => InteractionData::new("Close Door"),
            DoorState::Opening | DoorState::Closing => InteractionData::new("Wait...").blocked(),
        }
    }

    fn can_interact(&self, _instigator: &Instigator) -> bool {
        !self.is_moving()
    }
}

/// Drive door swings and write the resulting rotation.
pub fn animate_doors(time: Res<Time>, mut doors: Query<(&mut Door, &mut Transform)>) {
    for (mut door, mut transform) in doors.iter_mut() {
        if !door.is_moving() && !door.auto_close_pending() {
            continue;
        }
        door.tick(time.delta());
        transform.rotation = door.rotation();
    }
}

/// Relock doors on request, using the instigator's key ring.
pub fn process_lock_requests(
    mut requests: EventReader<LockRequest>,
    mut doors: Query<&mut Door>,
    key_rings: Query<&KeyRing>,
) {
    for request in requests.read() {
        let (Ok(mut door), Ok(keys)) = (doors.get_mut(request.door), key_rings.get(request.instigator))
        else {
            continue;
        };
        if !door.relock(keys) {
            debug!("Door {:?} cannot be relocked right now", request.door);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Inventory;

    const FRONT: Vec3 = Vec3::new(0.0, 0.0, -5.0);
    const BEHIND: Vec3 = Vec3::new(0.0, 0.0, 5.0);

    fn step(door: &mut Door, seconds: f32) {
        door.tick(Duration::from_secs_f32(seconds));
    }

    fn run_to_rest(door: &mut Door) {
        for _ in 0..200 {
            if !door.is_moving() {
                return;
            }
            step(door, 0.05);
        }
    }

    fn keyed_door() -> Door {
        Door::default().with_lock(DoorLock {
            required_key: "cellar".into(),
            key_name: "Cellar Key".into(),
            ..default()
        })
    }

    #[test]
    fn opens_and_closes_with_easing() {
        let mut door = Door::default();
        assert!(door.open(FRONT));
        assert_eq!(door.state(), DoorState::Opening);
        assert_eq!(door.target_angle(), 90.0);

        step(&mut door, 0.5);
        assert!((door.current_angle() - 45.0).abs() < 0.01);
        step(&mut door, 0.6);
        assert_eq!(door.state(), DoorState::Open);
        assert_eq!(door.current_angle(), 90.0);
        assert_eq!(door.open_percentage(), 1.0);

        assert!(door.close());
        run_to_rest(&mut door);
        assert!(door.is_closed());
        assert_eq!(door.current_angle(), 0.0);
        assert_eq!(
            door.take_signals(),
            vec![
                DoorSignal::StartOpening,
                DoorSignal::Opened,
                DoorSignal::StartClosing,
                DoorSignal::Closed
            ]
        );
    }

    #[test]
    fn busy_door_rejects_commands_without_restarting() {
        let mut door = Door::default();
        door.open(FRONT);
        step(&mut door, 0.3);
        let angle = door.current_angle();

        assert!(!door.open(BEHIND));
        assert!(!door.close());
        assert!(!door.toggle(FRONT));
        assert_eq!(door.target_angle(), 90.0);
        assert_eq!(door.current_angle(), angle);

        // The swing was not restarted
        step(&mut door, 0.75);
        assert!(door.is_open());
    }

    #[test]
    fn swings_away_from_the_actor() {
        let mut door = Door::default();
        assert!(door.open(BEHIND));
        assert_eq!(door.target_angle(), -90.0);

        let mut right = Door::new(DoorConfig {
            hinge: DoorHinge::Right,
            ..default()
        });
        right.open(FRONT);
        run_to_rest(&mut right);
        assert_eq!(right.yaw(), -90.0);
        assert_eq!(right.open_percentage(), 1.0);
    }

    #[test]
    fn single_sided_door_refuses_from_behind() {
        let mut door = Door::new(DoorConfig {
            open_from_both_sides: false,
            ..default()
        });
        assert!(!door.open(BEHIND));
        assert!(door.is_closed());
        assert!(!door.has_signals());
        assert!(door.open(FRONT));
    }

    #[test]
    fn auto_close_after_delay() {
        let mut door = Door::new(DoorConfig {
            auto_close: true,
            auto_close_delay: 2.0,
            ..default()
        });
        door.open(FRONT);
        run_to_rest(&mut door);
        assert!(door.is_open());
        assert!(door.auto_close_pending());

        step(&mut door, 1.0);
        assert!(door.is_open());
        step(&mut door, 1.0);
        assert_eq!(door.state(), DoorState::Closing);
        assert!(!door.auto_close_pending());
    }

    #[test]
    fn manual_close_cancels_auto_close() {
        let mut door = Door::new(DoorConfig {
            auto_close: true,
            ..default()
        });
        door.open(FRONT);
        run_to_rest(&mut door);
        assert!(door.close());
        assert!(!door.auto_close_pending());
    }

    #[test]
    fn zero_delay_closes_immediately() {
        let mut door = Door::new(DoorConfig {
            auto_close: true,
            auto_close_delay: 0.0,
            ..default()
        });
        door.open(FRONT);
        step(&mut door, 1.0);
        assert_eq!(door.state(), DoorState::Closing);
    }

    #[test]
    fn config_is_clamped() {
        let config = DoorConfig {
            max_open_angle: 270.0,
            open_duration: 0.0,
            close_duration: 9.0,
            auto_close_delay: -1.0,
            ..default()
        }
        .sanitized();
        assert_eq!(config.max_open_angle, 180.0);
        assert_eq!(config.open_duration, 0.1);
        assert_eq!(config.close_duration, 5.0);
        assert_eq!(config.auto_close_delay, 0.0);
    }

    #[test]
    fn locked_door_needs_its_key() {
        let mut door = keyed_door();
        let mut keys = KeyRing::default();
        let mut inventory = Inventory::default();

        {
            let mut instigator = Instigator {
                entity: Entity::PLACEHOLDER,
                position: FRONT,
                keys: &mut keys,
                inventory: &mut inventory,
            };
            let data = door.interaction_data(&instigator);
            assert_eq!(data.text, "Locked");
            assert_eq!(data.secondary_text, "Requires Cellar Key");
            assert!(!data.can_interact);
            assert!(door.can_interact(&instigator));

            assert!(!door.interact(&mut instigator));
            assert!(door.is_closed());
        }
        assert_eq!(door.take_signals(), vec![DoorSignal::LockedAttempt]);

        keys.add_key("cellar", "Cellar Key");
        let mut instigator = Instigator {
            entity: Entity::PLACEHOLDER,
            position: FRONT,
            keys: &mut keys,
            inventory: &mut inventory,
        };
        let data = door.interaction_data(&instigator);
        assert_eq!(data.text, "Unlock Door");
        assert_eq!(data.secondary_text, "Using Cellar Key");

        // First use unlocks, second opens
        assert!(door.interact(&mut instigator));
        assert!(!door.is_locked());
        assert!(door.is_closed());
        assert!(door.interact(&mut instigator));
        assert_eq!(door.state(), DoorState::Opening);
        assert_eq!(
            door.take_signals(),
            vec![DoorSignal::Unlocked, DoorSignal::StartOpening]
        );
    }

    #[test]
    fn open_call_on_locked_door_signals_attempt() {
        let mut door = keyed_door();
        assert!(!door.open(FRONT));
        assert_eq!(door.take_signals(), vec![DoorSignal::LockedAttempt]);
    }

    #[test]
    fn relock_requires_closed_door_and_key() {
        let mut door = keyed_door();
        let keys = KeyRing::with_keys(["cellar"]);
        assert!(door.unlock(&keys));
        assert!(!door.unlock(&keys));

        door.open(FRONT);
        run_to_rest(&mut door);
        assert!(!door.relock(&keys));

        door.close();
        run_to_rest(&mut door);
        assert!(!door.relock(&KeyRing::default()));
        assert!(door.relock(&keys));
        assert!(door.is_locked());
    }

    #[test]
    fn relock_disabled_by_lock_settings() {
        let mut door = Door::default().with_lock(DoorLock {
            required_key: "gate".into(),
            locked: false,
            can_relock: false,
            ..default()
        });
        assert!(!door.relock(&KeyRing::with_keys(["gate"])));
        door.set_locked_state(true);
        assert!(door.is_locked());
    }

    #[test]
    fn moving_door_shows_wait_and_refuses_focus() {
        let mut door = Door::default();
        let mut keys = KeyRing::default();
        let mut inventory = Inventory::default();
        let instigator = Instigator {
            entity: Entity::PLACEHOLDER,
            position: FRONT,
            keys: &mut keys,
            inventory: &mut inventory,
        };
        assert_eq!(door.interaction_data(&instigator).text, "Open Door");
        door.open(FRONT);
        let data = door.interaction_data(&instigator);
        assert_eq!(data.text, "Wait...");
        assert!(!data.can_interact);
        assert!(!door.can_interact(&instigator));
    }
}
