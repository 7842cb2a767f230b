//! Focus tracking: which interactable the instigator is looking at, and
//! instant or hold-to-interact dispatch against it.

use bevy::prelude::*;
use serde::Deserialize;
use std::time::Duration;

use super::capability::{Instigator, Interactable, InteractionData};
use super::trace::{TraceHit, TraceRequest};

pub const MIN_INTERACTION_DISTANCE: f32 = 50.0;
pub const MAX_INTERACTION_DISTANCE: f32 = 1000.0;
pub const MIN_DETECTION_INTERVAL: f32 = 0.01;
pub const MAX_DETECTION_INTERVAL: f32 = 0.5;

/// Interaction tuning, section `interaction` of gameplay.ron.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Cast length in units
    pub distance: f32,
    /// Sphere radius in units; zero casts a ray
    pub radius: f32,
    /// Seconds between detection casts
    pub detection_interval: f32,
    /// Collision group bits the cast may hit
    pub channel: u32,
    pub hold_enabled: bool,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            distance: 300.0,
            radius: 0.0,
            detection_interval: 0.1,
            channel: u32::MAX,
            hold_enabled: true,
        }
    }
}

impl InteractionConfig {
    pub fn sanitized(mut self) -> Self {
        self.distance = self.distance.clamp(MIN_INTERACTION_DISTANCE, MAX_INTERACTION_DISTANCE);
        self.radius = self.radius.max(0.0);
        self.detection_interval = self
            .detection_interval
            .clamp(MIN_DETECTION_INTERVAL, MAX_DETECTION_INTERVAL);
        self
    }
}

/// Resolves entities to their interactable behaviour.
pub trait InteractableSource {
    fn with_interactable<R>(
        &mut self,
        entity: Entity,
        f: impl FnOnce(&mut dyn Interactable) -> R,
    ) -> Option<R>;
}

/// Queued focus notification.
#[derive(Debug, Clone, PartialEq)]
pub enum FocusSignal {
    Changed { target: Entity, data: InteractionData },
    Lost,
    Completed { target: Entity },
    HoldStarted { target: Entity, duration: f32 },
    HoldCancelled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HoldState {
    target: Entity,
    elapsed: f32,
    duration: f32,
}

fn interval_duration(seconds: f32) -> Duration {
    Duration::from_millis((seconds * 1000.0).round() as u64)
}

/// Focus tracker carried by anything that interacts with the world.
#[derive(Component, Debug, Clone)]
pub struct InteractionFocus {
    config: InteractionConfig,
    enabled: bool,
    detection_timer: Timer,
    current: Option<Entity>,
    previous: Option<Entity>,
    data: InteractionData,
    hold: Option<HoldState>,
    signals: Vec<FocusSignal>,
}

impl Default for InteractionFocus {
    fn default() -> Self {
        Self::new(&InteractionConfig::default())
    }
}

impl InteractionFocus {
    pub fn new(config: &InteractionConfig) -> Self {
        let config = config.clone().sanitized();
        Self {
            detection_timer: Timer::new(
                interval_duration(config.detection_interval),
                TimerMode::Repeating,
            ),
            config,
            enabled: true,
            current: None,
            previous: None,
            data: InteractionData::default(),
            hold: None,
            signals: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn interaction_distance(&self) -> f32 {
        self.config.distance
    }

    pub fn interaction_radius(&self) -> f32 {
        self.config.radius
    }

    pub fn detection_interval(&self) -> f32 {
        self.config.detection_interval
    }

    pub fn hold_enabled(&self) -> bool {
        self.config.hold_enabled
    }

    pub fn current_focus(&self) -> Option<Entity> {
        self.current
    }

    pub fn previous_focus(&self) -> Option<Entity> {
        self.previous
    }

    pub fn interaction_data(&self) -> &InteractionData {
        &self.data
    }

    pub fn is_holding(&self) -> bool {
        self.hold.is_some()
    }

    /// Hold progress in `[0, 1]`, zero when not holding.
    pub fn hold_progress(&self) -> f32 {
        self.hold
            .map_or(0.0, |h| (h.elapsed / h.duration).clamp(0.0, 1.0))
    }

    /// Whether the focused interaction needs a hold instead of a press.
    pub fn requires_hold(&self) -> bool {
        self.config.hold_enabled && self.data.duration > 0.0
    }

    /// Cast description from an eye position and view direction.
    pub fn trace_request(&self, origin: Vec3, direction: Vec3, owner: Entity) -> TraceRequest {
        TraceRequest {
            origin,
            direction,
            distance: self.config.distance,
            radius: self.config.radius,
            channel: self.config.channel,
            ignore: Some(owner),
        }
    }

    /// Advance the detection timer. True when a detection pass is due.
    pub fn tick_detection(&mut self, delta: Duration) -> bool {
        if !self.enabled {
            return false;
        }
        self.detection_timer.tick(delta);
        self.detection_timer.just_finished()
    }

    /// Process one detection result.
    pub fn detect<S: InteractableSource>(
        &mut self,
        hit: Option<TraceHit>,
        source: &mut S,
        instigator: &Instigator,
    ) {
        let Some(hit) = hit else {
            self.clear_focus();
            return;
        };

        let resolved = source
            .with_interactable(hit.entity, |interactable| {
                if hit.distance > interactable.interaction_distance() {
                    return None;
                }
                if !interactable.can_interact(instigator) {
                    return None;
                }
                Some(interactable.interaction_data(instigator))
            })
            .flatten();

        match resolved {
            Some(data) => self.update_focus(hit.entity, data),
            None => self.clear_focus(),
        }
    }

    fn update_focus(&mut self, target: Entity, data: InteractionData) {
        if self.current == Some(target) {
            let changed = self.data.differs_meaningfully(&data);
            self.data = data;
            if changed {
                self.signals.push(FocusSignal::Changed {
                    target,
                    data: self.data.clone(),
                });
            }
            return;
        }

        self.clear_focus();
        self.current = Some(target);
        self.data = data;
        self.signals.push(FocusSignal::Changed {
            target,
            data: self.data.clone(),
        });
    }

    /// Drop the current focus. Silent when nothing is focused.
    pub fn clear_focus(&mut self) {
        let Some(current) = self.current.take() else {
            return;
        };
        self.cancel_hold();
        self.previous = Some(current);
        self.data = InteractionData::default();
        self.signals.push(FocusSignal::Lost);
    }

    /// Interact with the focused object. No-op without focus or while the
    /// focused interaction requires holding.
    pub fn interact<S: InteractableSource>(
        &mut self,
        source: &mut S,
        instigator: &mut Instigator,
    ) -> bool {
        let Some(target) = self.current else {
            return false;
        };
        if self.requires_hold() {
            return false;
        }
        self.dispatch(target, source, instigator)
    }

    fn dispatch<S: InteractableSource>(
        &mut self,
        target: Entity,
        source: &mut S,
        instigator: &mut Instigator,
    ) -> bool {
        let outcome = source.with_interactable(target, |interactable| {
            let success = interactable.interact(instigator);
            let destroyed = success
                && interactable
                    .as_pickupable()
                    .is_some_and(|p| p.should_destroy_on_pickup());
            (success, destroyed)
        });

        match outcome {
            None => {
                self.clear_focus();
                false
            }
            Some((success, destroyed)) => {
                if success {
                    self.signals.push(FocusSignal::Completed { target });
                    if destroyed && self.current == Some(target) {
                        self.clear_focus();
                    }
                }
                success
            }
        }
    }

    /// Interact with a specific target, ignoring focus state.
    pub fn interact_with<S: InteractableSource>(
        &mut self,
        target: Entity,
        source: &mut S,
        instigator: &mut Instigator,
    ) -> bool {
        let outcome = source.with_interactable(target, |interactable| {
            if !interactable.can_interact(instigator) {
                return false;
            }
            interactable.interact(instigator)
        });

        let success = outcome.unwrap_or(false);
        if success {
            self.signals.push(FocusSignal::Completed { target });
        }
        success
    }

    /// Begin holding on the focused object, or interact at once when its
    /// duration is zero.
    pub fn start_hold<S: InteractableSource>(
        &mut self,
        source: &mut S,
        instigator: &mut Instigator,
    ) {
        let Some(target) = self.current else {
            return;
        };
        if !self.config.hold_enabled || self.hold.is_some() {
            return;
        }

        if self.data.duration <= 0.0 {
            self.dispatch(target, source, instigator);
            return;
        }

        let duration = self.data.duration;
        self.hold = Some(HoldState {
            target,
            elapsed: 0.0,
            duration,
        });
        self.signals.push(FocusSignal::HoldStarted { target, duration });
    }

    /// Release the hold early.
    pub fn stop_hold(&mut self) {
        self.cancel_hold();
    }

    fn cancel_hold(&mut self) {
        if self.hold.take().is_some() {
            self.signals.push(FocusSignal::HoldCancelled);
        }
    }

    /// Advance an active hold, interacting when it completes.
    pub fn update_hold<S: InteractableSource>(
        &mut self,
        dt: f32,
        source: &mut S,
        instigator: &mut Instigator,
    ) {
        let Some(mut hold) = self.hold else {
            return;
        };
        if self.current != Some(hold.target) {
            self.cancel_hold();
            return;
        }

        hold.elapsed += dt;
        if hold.elapsed < hold.duration {
            self.hold = Some(hold);
            return;
        }

        self.hold = None;
        self.dispatch(hold.target, source, instigator);
    }

    /// Turn detection on or off. Disabling clears focus.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enabled = true;
            self.detection_timer.reset();
        } else {
            self.enabled = false;
            self.clear_focus();
        }
    }

    pub fn set_interaction_distance(&mut self, distance: f32) {
        self.config.distance = distance.clamp(MIN_INTERACTION_DISTANCE, MAX_INTERACTION_DISTANCE);
    }

    pub fn set_interaction_radius(&mut self, radius: f32) {
        self.config.radius = radius.max(0.0);
    }

    /// Change the detection period and restart the timer.
    pub fn set_detection_interval(&mut self, seconds: f32) {
        self.config.detection_interval = seconds.clamp(MIN_DETECTION_INTERVAL, MAX_DETECTION_INTERVAL);
        self.detection_timer = Timer::new(
            interval_duration(self.config.detection_interval),
            TimerMode::Repeating,
        );
    }

    pub fn set_hold_enabled(&mut self, enabled: bool) {
        self.config.hold_enabled = enabled;
        if !enabled {
            self.cancel_hold();
        }
    }

    pub fn has_signals(&self) -> bool {
        !self.signals.is_empty()
    }

    pub fn take_signals(&mut self) -> Vec<FocusSignal> {
        std::mem::take(&mut self.signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::Pickupable;
    use crate::inventory::{Inventory, KeyRing};
    use std::collections::HashMap;

    #[derive(Default)]
    struct Prop {
        text: String,
        distance: f32,
        allowed: bool,
        duration: f32,
        destroy_on_pickup: bool,
        uses: u32,
    }

    impl Prop {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                distance: 200.0,
                allowed: true,
                ..default()
            }
        }
    }

    impl Interactable for Prop {
        fn interact(&mut self, _instigator: &mut Instigator) -> bool {
            self.uses += 1;
            true
        }

        fn interaction_data(&self, _instigator: &Instigator) -> InteractionData {
            InteractionData::new(self.text.clone()).with_duration(self.duration)
        }

        fn can_interact(&self, _instigator: &Instigator) -> bool {
            self.allowed
        }

        fn interaction_distance(&self) -> f32 {
            self.distance
        }

        fn as_pickupable(&self) -> Option<&dyn Pickupable> {
            Some(self)
        }
    }

    impl Pickupable for Prop {
        fn should_destroy_on_pickup(&self) -> bool {
            self.destroy_on_pickup
        }
    }

    #[derive(Default)]
    struct Props(HashMap<Entity, Prop>);

    impl InteractableSource for Props {
        fn with_interactable<R>(
            &mut self,
            entity: Entity,
            f: impl FnOnce(&mut dyn Interactable) -> R,
        ) -> Option<R> {
            self.0.get_mut(&entity).map(|prop| f(prop))
        }
    }

    fn hit(entity: Entity, distance: f32) -> Option<TraceHit> {
        Some(TraceHit {
            entity,
            distance,
            point: Vec3::ZERO,
        })
    }

    struct Fixture {
        keys: KeyRing,
        inventory: Inventory,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                keys: KeyRing::default(),
                inventory: Inventory::default(),
            }
        }

        fn instigator(&mut self) -> Instigator<'_> {
            Instigator {
                entity: Entity::from_raw(99),
                position: Vec3::ZERO,
                keys: &mut self.keys,
                inventory: &mut self.inventory,
            }
        }
    }

    fn focused_targets(signals: &[FocusSignal]) -> Vec<Option<Entity>> {
        signals
            .iter()
            .filter_map(|s| match s {
                FocusSignal::Changed { target, .. } => Some(Some(*target)),
                FocusSignal::Lost => Some(None),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn lost_always_precedes_new_focus() {
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        let mut props = Props::default();
        props.0.insert(a, Prop::new("Open"));
        props.0.insert(b, Prop::new("Take"));

        let mut fixture = Fixture::new();
        let mut focus = InteractionFocus::default();
        let mut signals = Vec::new();

        focus.detect(hit(a, 100.0), &mut props, &fixture.instigator());
        signals.extend(focus.take_signals());

        // Unchanged data is not re-announced
        focus.detect(hit(a, 100.0), &mut props, &fixture.instigator());
        assert!(!focus.has_signals());

        if let Some(p) = props.0.get_mut(&a) {
            p.text = "Close".to_string();
        }
        focus.detect(hit(a, 100.0), &mut props, &fixture.instigator());
        signals.extend(focus.take_signals());

        focus.detect(hit(b, 100.0), &mut props, &fixture.instigator());
        signals.extend(focus.take_signals());

        focus.detect(None, &mut props, &fixture.instigator());
        signals.extend(focus.take_signals());

        // Clearing twice is silent
        focus.detect(None, &mut props, &fixture.instigator());
        assert!(!focus.has_signals());

        focus.detect(hit(a, 100.0), &mut props, &fixture.instigator());
        signals.extend(focus.take_signals());

        assert_eq!(
            focused_targets(&signals),
            vec![Some(a), Some(a), None, Some(b), None, Some(a)]
        );
        assert_eq!(focus.previous_focus(), Some(b));
    }

    #[test]
    fn object_range_limits_focus() {
        let near = Entity::from_raw(1);
        let mut props = Props::default();
        let mut prop = Prop::new("Open");
        prop.distance = 100.0;
        props.0.insert(near, prop);

        let mut fixture = Fixture::new();
        let mut focus = InteractionFocus::default();
        assert_eq!(focus.interaction_distance(), 300.0);

        focus.detect(hit(near, 150.0), &mut props, &fixture.instigator());
        assert_eq!(focus.current_focus(), None);

        focus.detect(hit(near, 90.0), &mut props, &fixture.instigator());
        assert_eq!(focus.current_focus(), Some(near));
    }

    #[test]
    fn refusal_and_unknown_entities_clear_focus() {
        let a = Entity::from_raw(1);
        let stranger = Entity::from_raw(5);
        let mut props = Props::default();
        props.0.insert(a, Prop::new("Open"));

        let mut fixture = Fixture::new();
        let mut focus = InteractionFocus::default();

        focus.detect(hit(a, 50.0), &mut props, &fixture.instigator());
        if let Some(p) = props.0.get_mut(&a) {
            p.allowed = false;
        }
        focus.detect(hit(a, 50.0), &mut props, &fixture.instigator());
        assert_eq!(focus.current_focus(), None);

        focus.detect(hit(stranger, 50.0), &mut props, &fixture.instigator());
        assert_eq!(focus.current_focus(), None);
    }

    #[test]
    fn interact_completes_and_clears_destroyed_pickups() {
        let apple = Entity::from_raw(3);
        let mut props = Props::default();
        let mut prop = Prop::new("Take");
        prop.destroy_on_pickup = true;
        props.0.insert(apple, prop);

        let mut fixture = Fixture::new();
        let mut focus = InteractionFocus::default();

        assert!(!focus.interact(&mut props, &mut fixture.instigator()));

        focus.detect(hit(apple, 50.0), &mut props, &fixture.instigator());
        focus.take_signals();

        assert!(focus.interact(&mut props, &mut fixture.instigator()));
        assert_eq!(
            focus.take_signals(),
            vec![FocusSignal::Completed { target: apple }, FocusSignal::Lost]
        );
        assert_eq!(focus.current_focus(), None);
    }

    #[test]
    fn interact_with_checks_eligibility() {
        let a = Entity::from_raw(1);
        let mut props = Props::default();
        let mut prop = Prop::new("Open");
        prop.allowed = false;
        props.0.insert(a, prop);

        let mut fixture = Fixture::new();
        let mut focus = InteractionFocus::default();

        assert!(!focus.interact_with(a, &mut props, &mut fixture.instigator()));
        if let Some(p) = props.0.get_mut(&a) {
            p.allowed = true;
        }
        assert!(focus.interact_with(a, &mut props, &mut fixture.instigator()));
        assert_eq!(focus.current_focus(), None);
        assert_eq!(props.0[&a].uses, 1);
    }

    #[test]
    fn hold_completes_after_duration() {
        let chest = Entity::from_raw(4);
        let mut props = Props::default();
        let mut prop = Prop::new("Search");
        prop.duration = 1.0;
        props.0.insert(chest, prop);

        let mut fixture = Fixture::new();
        let mut focus = InteractionFocus::default();
        focus.detect(hit(chest, 50.0), &mut props, &fixture.instigator());
        focus.take_signals();

        // Press is ignored while a hold is required
        assert!(!focus.interact(&mut props, &mut fixture.instigator()));

        focus.start_hold(&mut props, &mut fixture.instigator());
        assert!(focus.is_holding());
        focus.update_hold(0.5, &mut props, &mut fixture.instigator());
        assert_eq!(focus.hold_progress(), 0.5);
        assert_eq!(props.0[&chest].uses, 0);

        focus.update_hold(0.5, &mut props, &mut fixture.instigator());
        assert!(!focus.is_holding());
        assert_eq!(props.0[&chest].uses, 1);
        assert_eq!(
            focus.take_signals(),
            vec![
                FocusSignal::HoldStarted { target: chest, duration: 1.0 },
                FocusSignal::Completed { target: chest },
            ]
        );
    }

    #[test]
    fn releasing_or_losing_focus_cancels_hold() {
        let chest = Entity::from_raw(4);
        let mut props = Props::default();
        let mut prop = Prop::new("Search");
        prop.duration = 2.0;
        props.0.insert(chest, prop);

        let mut fixture = Fixture::new();
        let mut focus = InteractionFocus::default();
        focus.detect(hit(chest, 50.0), &mut props, &fixture.instigator());

        focus.start_hold(&mut props, &mut fixture.instigator());
        focus.stop_hold();
        assert!(!focus.is_holding());

        focus.start_hold(&mut props, &mut fixture.instigator());
        focus.take_signals();
        focus.detect(None, &mut props, &fixture.instigator());
        assert_eq!(
            focus.take_signals(),
            vec![FocusSignal::HoldCancelled, FocusSignal::Lost]
        );
        assert_eq!(props.0[&chest].uses, 0);
    }

    #[test]
    fn zero_duration_hold_interacts_immediately() {
        let lever = Entity::from_raw(6);
        let mut props = Props::default();
        props.0.insert(lever, Prop::new("Pull"));

        let mut fixture = Fixture::new();
        let mut focus = InteractionFocus::default();
        focus.detect(hit(lever, 50.0), &mut props, &fixture.instigator());

        focus.start_hold(&mut props, &mut fixture.instigator());
        assert!(!focus.is_holding());
        assert_eq!(props.0[&lever].uses, 1);
    }

    #[test]
    fn disabling_clears_focus_and_stops_detection() {
        let a = Entity::from_raw(1);
        let mut props = Props::default();
        props.0.insert(a, Prop::new("Open"));

        let mut fixture = Fixture::new();
        let mut focus = InteractionFocus::default();
        focus.detect(hit(a, 50.0), &mut props, &fixture.instigator());

        focus.set_enabled(false);
        assert_eq!(focus.current_focus(), None);
        assert!(!focus.tick_detection(Duration::from_secs(1)));

        focus.set_enabled(true);
        assert!(focus.tick_detection(Duration::from_millis(100)));
    }

    #[test]
    fn setters_clamp_to_safe_ranges() {
        let mut focus = InteractionFocus::default();
        focus.set_interaction_distance(5.0);
        assert_eq!(focus.interaction_distance(), MIN_INTERACTION_DISTANCE);
        focus.set_interaction_distance(5000.0);
        assert_eq!(focus.interaction_distance(), MAX_INTERACTION_DISTANCE);

        focus.set_detection_interval(2.0);
        assert_eq!(focus.detection_interval(), MAX_DETECTION_INTERVAL);
        assert!(!focus.tick_detection(Duration::from_millis(400)));
        assert!(focus.tick_detection(Duration::from_millis(100)));
    }
}
