//! Interaction systems - detection casts, focus resolution, input commands
//! and hold progress.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::capability::{Instigator, Interactable};
use super::focus::{FocusSignal, InteractableSource, InteractionFocus};
use super::trace::{ScriptedTrace, SpatialQuery, TraceHit};
use crate::core::{
    FocusChanged, FocusLost, HoldCancelled, HoldStarted, InteractionCommand, InteractionCompleted,
    SurvivalSet,
};
use crate::inventory::{Inventory, KeyRing};
use crate::world::{Container, Door, Pickup, Usable};

/// Viewpoint the detection cast starts from. Must be a child of the entity
/// carrying [`InteractionFocus`].
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct InteractionEye;

/// Latest detection result waiting to be applied to the focus.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct InteractionProbe {
    result: Option<Option<TraceHit>>,
}

impl InteractionProbe {
    /// Queue a detection result. `None` means the cast hit nothing.
    pub fn submit(&mut self, hit: Option<TraceHit>) {
        self.result = Some(hit);
    }

    pub fn take(&mut self) -> Option<Option<TraceHit>> {
        self.result.take()
    }
}

/// Every interactable kind in the world, resolvable by entity.
#[derive(SystemParam)]
pub struct InteractableQuery<'w, 's> {
    doors: Query<'w, 's, &'static mut Door>,
    pickups: Query<'w, 's, &'static mut Pickup>,
    containers: Query<'w, 's, &'static mut Container>,
    usables: Query<'w, 's, &'static mut Usable>,
}

impl InteractableSource for InteractableQuery<'_, '_> {
    fn with_interactable<R>(
        &mut self,
        entity: Entity,
        f: impl FnOnce(&mut dyn Interactable) -> R,
    ) -> Option<R> {
        if let Ok(mut door) = self.doors.get_mut(entity) {
            return Some(f(&mut *door));
        }
        if let Ok(mut pickup) = self.pickups.get_mut(entity) {
            return Some(f(&mut *pickup));
        }
        if let Ok(mut container) = self.containers.get_mut(entity) {
            return Some(f(&mut *container));
        }
        if let Ok(mut usable) = self.usables.get_mut(entity) {
            return Some(f(&mut *usable));
        }
        None
    }
}

type InstigatorQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static GlobalTransform,
        &'static mut InteractionFocus,
        &'static mut KeyRing,
        &'static mut Inventory,
    ),
>;

/// Configure interaction systems.
pub fn setup_interaction_systems(app: &mut App) {
    app.add_event::<InteractionCommand>()
        .add_event::<FocusChanged>()
        .add_event::<FocusLost>()
        .add_event::<InteractionCompleted>()
        .add_event::<HoldStarted>()
        .add_event::<HoldCancelled>()
        .add_systems(
            Update,
            (
                cast_interaction_traces,
                resolve_focus,
                process_interaction_commands,
                update_holds,
            )
                .chain()
                .in_set(SurvivalSet::Simulation),
        )
        .add_systems(Update, broadcast_focus_signals.in_set(SurvivalSet::Broadcast));
}

type DetectingOwner = (
    Entity,
    &'static GlobalTransform,
    &'static mut InteractionFocus,
    &'static mut InteractionProbe,
    Option<&'static Children>,
    Option<&'static ScriptedTrace>,
);

/// Run a detection pass for each owner whose timer fires.
///
/// A [`ScriptedTrace`] on the owner answers the cast directly. Otherwise the
/// cast goes from the owner's [`InteractionEye`] into the rapier scene. With
/// neither an eye nor a scene the pass reports a miss, which clears focus.
pub fn cast_interaction_traces(
    time: Res<Time>,
    rapier: Query<&RapierContext>,
    eyes: Query<&GlobalTransform, With<InteractionEye>>,
    mut owners: Query<DetectingOwner>,
) {
    let context = rapier.get_single().ok();

    for (owner, body, mut focus, mut probe, children, scripted) in owners.iter_mut() {
        if !focus.tick_detection(time.delta()) {
            continue;
        }

        if let Some(scripted) = scripted {
            let request = focus.trace_request(body.translation(), body.forward().as_vec3(), owner);
            probe.submit(scripted.trace(&request));
            continue;
        }

        let eye = children.and_then(|children| {
            children.iter().find_map(|&child| eyes.get(child).ok())
        });
        let hit = match (context, eye) {
            (Some(context), Some(eye)) => {
                let request =
                    focus.trace_request(eye.translation(), eye.forward().as_vec3(), owner);
                context.trace(&request)
            }
            _ => None,
        };
        probe.submit(hit);
    }
}

/// Apply pending detection results to focus trackers.
pub fn resolve_focus(
    mut owners: Query<(
        Entity,
        &GlobalTransform,
        &mut InteractionFocus,
        &mut InteractionProbe,
        &mut KeyRing,
        &mut Inventory,
    )>,
    mut interactables: InteractableQuery,
) {
    for (entity, transform, mut focus, mut probe, mut keys, mut inventory) in owners.iter_mut() {
        let Some(hit) = probe.take() else {
            continue;
        };
        if !focus.is_enabled() {
            continue;
        }
        let instigator = Instigator {
            entity,
            position: transform.translation(),
            keys: &mut *keys,
            inventory: &mut *inventory,
        };
        focus.detect(hit, &mut interactables, &instigator);
    }
}

/// Turn press/release/targeted requests into interactions.
pub fn process_interaction_commands(
    mut commands: EventReader<InteractionCommand>,
    mut owners: InstigatorQuery,
    mut interactables: InteractableQuery,
) {
    for command in commands.read() {
        let owner = match *command {
            InteractionCommand::Press { instigator }
            | InteractionCommand::Release { instigator }
            | InteractionCommand::InteractWith { instigator, .. } => instigator,
        };
        let Ok((entity, transform, mut focus, mut keys, mut inventory)) = owners.get_mut(owner) else {
            continue;
        };
        let mut instigator = Instigator {
            entity,
            position: transform.translation(),
            keys: &mut *keys,
            inventory: &mut *inventory,
        };

        match *command {
            InteractionCommand::Press { .. } => {
                if focus.requires_hold() {
                    focus.start_hold(&mut interactables, &mut instigator);
                } else {
                    focus.interact(&mut interactables, &mut instigator);
                }
            }
            InteractionCommand::Release { .. } => focus.stop_hold(),
            InteractionCommand::InteractWith { target, .. } => {
                focus.interact_with(target, &mut interactables, &mut instigator);
            }
        }
    }
}

/// Advance active holds.
pub fn update_holds(
    time: Res<Time>,
    mut owners: InstigatorQuery,
    mut interactables: InteractableQuery,
) {
    let dt = time.delta_secs();
    for (entity, transform, mut focus, mut keys, mut inventory) in owners.iter_mut() {
        if !focus.is_holding() {
            continue;
        }
        let mut instigator = Instigator {
            entity,
            position: transform.translation(),
            keys: &mut *keys,
            inventory: &mut *inventory,
        };
        focus.update_hold(dt, &mut interactables, &mut instigator);
    }
}

/// Turn queued focus signals into events.
pub fn broadcast_focus_signals(
    mut owners: Query<(Entity, &mut InteractionFocus)>,
    mut changed: EventWriter<FocusChanged>,
    mut lost: EventWriter<FocusLost>,
    mut completed: EventWriter<InteractionCompleted>,
    mut hold_started: EventWriter<HoldStarted>,
    mut hold_cancelled: EventWriter<HoldCancelled>,
) {
    for (instigator, mut focus) in owners.iter_mut() {
        if !focus.has_signals() {
            continue;
        }
        for signal in focus.take_signals() {
            match signal {
                FocusSignal::Changed { target, data } => {
                    debug!("Focus on {:?}: {}", target, data.text);
                    changed.send(FocusChanged {
                        instigator,
                        target,
                        data,
                    });
                }
                FocusSignal::Lost => {
                    lost.send(FocusLost { instigator });
                }
                FocusSignal::Completed { target } => {
                    completed.send(InteractionCompleted { instigator, target });
                }
                FocusSignal::HoldStarted { target, duration } => {
                    hold_started.send(HoldStarted {
                        instigator,
                        target,
                        duration,
                    });
                }
                FocusSignal::HoldCancelled => {
                    hold_cancelled.send(HoldCancelled { instigator });
                }
            }
        }
    }
}
