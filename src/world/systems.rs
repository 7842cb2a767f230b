//! World systems - door animation, containers, pickups and the clock.

use bevy::prelude::*;

use super::container::{process_transfers, sync_container_view, Container};
use super::day_night::{apply_sun_lighting, broadcast_clock, tick_clock, DayNightCycle};
use super::door::{animate_doors, process_lock_requests, Door};
use super::pickup::collect_pickups;
use crate::core::{
    ClockEvent, ContainerEvent, DoorEvent, DoorSignal, ItemPickedUp, LockRequest, SurvivalSet,
    TransferRequest,
};

/// Configure world systems.
pub fn setup_world_systems(app: &mut App) {
    app.init_resource::<DayNightCycle>()
        .add_event::<DoorEvent>()
        .add_event::<ContainerEvent>()
        .add_event::<ClockEvent>()
        .add_event::<ItemPickedUp>()
        .add_event::<TransferRequest>()
        .add_event::<LockRequest>()
        .add_systems(
            Update,
            (animate_doors, process_lock_requests, tick_clock, process_transfers)
                .in_set(SurvivalSet::Simulation),
        )
        .add_systems(
            Update,
            (
                broadcast_door_signals,
                broadcast_container_signals,
                broadcast_clock,
                collect_pickups,
            )
                .in_set(SurvivalSet::Broadcast),
        )
        .add_systems(
            Update,
            (apply_sun_lighting, sync_container_view).in_set(SurvivalSet::Presentation),
        );
}

pub fn broadcast_door_signals(
    mut doors: Query<(Entity, &mut Door)>,
    mut events: EventWriter<DoorEvent>,
) {
    for (door, mut state) in doors.iter_mut() {
        if !state.has_signals() {
            continue;
        }
        for signal in state.take_signals() {
            if signal == DoorSignal::LockedAttempt {
                debug!("Door {:?} is locked", door);
            }
            events.send(DoorEvent { door, signal });
        }
    }
}

pub fn broadcast_container_signals(
    mut containers: Query<(Entity, &mut Container)>,
    mut events: EventWriter<ContainerEvent>,
) {
    for (container, mut state) in containers.iter_mut() {
        if !state.has_signals() {
            continue;
        }
        for signal in state.take_signals() {
            events.send(ContainerEvent { container, signal });
        }
    }
}
