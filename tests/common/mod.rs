//! Headless app helpers shared by the integration tests.

#![allow(dead_code)]

use std::time::Duration;

use bevy::prelude::*;
use hearthbound::core::configure_survival_sets;
use hearthbound::interaction::{InteractionFocus, InteractionProbe, ScriptedTrace};
use hearthbound::inventory::{Inventory, KeyRing};
use hearthbound::stats::{Needs, Stamina};

/// Events of type `E` seen since the app was built.
#[derive(Resource)]
pub struct Recorded<E: Event>(pub Vec<E>);

impl<E: Event> Default for Recorded<E> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

fn record_events<E: Event + Clone>(mut reader: EventReader<E>, mut log: ResMut<Recorded<E>>) {
    log.0.extend(reader.read().cloned());
}

/// App with manual time and no windowing, rendering or physics.
pub fn headless_app() -> App {
    let mut app = App::new();
    app.init_resource::<Time>();
    configure_survival_sets(&mut app);
    app
}

/// Start recording `E`. Call after the plugin that registers the event.
pub fn record<E: Event + Clone>(app: &mut App) {
    app.init_resource::<Recorded<E>>()
        .add_systems(Last, record_events::<E>);
}

pub fn recorded<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world().resource::<Recorded<E>>().0.clone()
}

pub fn clear<E: Event>(app: &mut App) {
    app.world_mut().resource_mut::<Recorded<E>>().0.clear();
}

/// Advance time by `seconds` and run one frame.
pub fn step(app: &mut App, seconds: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(seconds));
    app.update();
}

/// Run `frames` frames of `seconds` each.
pub fn run_for(app: &mut App, frames: usize, seconds: f32) {
    for _ in 0..frames {
        step(app, seconds);
    }
}

/// An entity that can focus, interact, carry keys and items.
pub fn spawn_survivor(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            GlobalTransform::from_translation(position),
            InteractionFocus::default(),
            InteractionProbe::default(),
            KeyRing::default(),
            Inventory::default(),
            Stamina::default(),
            Needs::default(),
        ))
        .id()
}

/// Make every detection pass report `target` at `distance` units.
pub fn look_at(app: &mut App, survivor: Entity, target: Entity, distance: f32) {
    app.world_mut()
        .entity_mut(survivor)
        .insert(ScriptedTrace::hit(target, distance));
}

/// Make every detection pass report a miss.
pub fn look_away(app: &mut App, survivor: Entity) {
    app.world_mut()
        .entity_mut(survivor)
        .insert(ScriptedTrace::miss());
}

pub fn send<E: Event>(app: &mut App, event: E) {
    app.world_mut().send_event(event);
}
