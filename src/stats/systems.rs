//! Stats systems - stamina and needs ticking and event broadcast.

use bevy::prelude::*;

use super::needs::{NeedSignal, Needs};
use super::pool::PoolSignal;
use super::stamina::Stamina;
use crate::core::{
    NeedChanged, NeedCritical, NeedDepleted, NeedKind, StaminaChanged, StaminaDepleted,
    StaminaRecovered, SurvivalSet,
};

/// Configure stamina and needs systems.
pub fn setup_stats_systems(app: &mut App) {
    app
        // Events
        .add_event::<StaminaChanged>()
        .add_event::<StaminaDepleted>()
        .add_event::<StaminaRecovered>()
        .add_event::<NeedChanged>()
        .add_event::<NeedCritical>()
        .add_event::<NeedDepleted>()

        // Drain periods land before the frame tick so the exhaustion
        // check sees this frame's drain
        .add_systems(
            Update,
            (
                (drain_stamina, tick_stamina).chain(),
                decay_needs,
            )
                .in_set(SurvivalSet::Simulation),
        )

        .add_systems(
            Update,
            (broadcast_stamina_signals, broadcast_need_signals).in_set(SurvivalSet::Broadcast),
        );
}

/// Apply elapsed sprint drain periods.
pub fn drain_stamina(time: Res<Time>, mut query: Query<&mut Stamina>) {
    for mut stamina in &mut query {
        if stamina.is_draining() {
            stamina.tick_drain(time.delta());
        }
    }
}

/// Per-frame stamina update: regen delay, regen, exhaustion.
pub fn tick_stamina(time: Res<Time>, mut query: Query<&mut Stamina>) {
    let dt = time.delta_secs();
    for mut stamina in &mut query {
        stamina.tick(dt);
    }
}

/// Advance hunger and thirst decay timers.
pub fn decay_needs(time: Res<Time>, mut query: Query<&mut Needs>) {
    for mut needs in &mut query {
        needs.tick(time.delta());
    }
}

/// Turn queued stamina signals into events.
pub fn broadcast_stamina_signals(
    mut query: Query<(Entity, &mut Stamina)>,
    mut changed: EventWriter<StaminaChanged>,
    mut depleted: EventWriter<StaminaDepleted>,
    mut recovered: EventWriter<StaminaRecovered>,
) {
    for (entity, mut stamina) in &mut query {
        if !stamina.has_signals() {
            continue;
        }
        for signal in stamina.take_signals() {
            match signal {
                PoolSignal::Changed { current, max } => {
                    changed.send(StaminaChanged { entity, current, max });
                }
                PoolSignal::Depleted => {
                    debug!("{:?} is exhausted", entity);
                    depleted.send(StaminaDepleted { entity });
                }
                PoolSignal::Recovered => {
                    debug!("{:?} recovered from exhaustion", entity);
                    recovered.send(StaminaRecovered { entity });
                }
            }
        }
    }
}

/// Turn queued hunger/thirst signals into events.
pub fn broadcast_need_signals(
    mut query: Query<(Entity, &mut Needs)>,
    mut changed: EventWriter<NeedChanged>,
    mut critical: EventWriter<NeedCritical>,
    mut depleted: EventWriter<NeedDepleted>,
) {
    for (entity, mut needs) in &mut query {
        if !needs.has_signals() {
            continue;
        }
        for need in [NeedKind::Hunger, NeedKind::Thirst] {
            for signal in needs.get_mut(need).take_signals() {
                match signal {
                    NeedSignal::Changed { current, max } => {
                        changed.send(NeedChanged { entity, need, current, max });
                    }
                    NeedSignal::Critical { percent } => {
                        warn!("{} is critical ({:.0}%)", need.name(), percent * 100.0);
                        critical.send(NeedCritical { entity, need, percent });
                    }
                    NeedSignal::Depleted => {
                        warn!("{} depleted", need.name());
                        depleted.send(NeedDepleted { entity, need });
                    }
                }
            }
        }
    }
}
