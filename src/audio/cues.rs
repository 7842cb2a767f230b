//! Sound cues for world notifications.

use bevy::prelude::*;
use bevy_kira_audio::prelude::*;

use crate::core::{ContainerEvent, ContainerSignal, DoorEvent, DoorSignal, ItemPickedUp, NeedCritical, StaminaDepleted};
use crate::inventory::ItemKind;

/// Short one-shot sounds the world can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    DoorOpen,
    DoorClose,
    DoorLocked,
    DoorUnlock,
    Pickup,
    KeyPickup,
    ContainerOpen,
    ContainerClose,
    Exhausted,
    StomachGrowl,
}

impl Cue {
    const ALL: [Cue; 10] = [
        Cue::DoorOpen,
        Cue::DoorClose,
        Cue::DoorLocked,
        Cue::DoorUnlock,
        Cue::Pickup,
        Cue::KeyPickup,
        Cue::ContainerOpen,
        Cue::ContainerClose,
        Cue::Exhausted,
        Cue::StomachGrowl,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Cue::DoorOpen => "audio/door_open.ogg",
            Cue::DoorClose => "audio/door_close.ogg",
            Cue::DoorLocked => "audio/door_locked.ogg",
            Cue::DoorUnlock => "audio/door_unlock.ogg",
            Cue::Pickup => "audio/pickup.ogg",
            Cue::KeyPickup => "audio/key_pickup.ogg",
            Cue::ContainerOpen => "audio/container_open.ogg",
            Cue::ContainerClose => "audio/container_close.ogg",
            Cue::Exhausted => "audio/exhausted.ogg",
            Cue::StomachGrowl => "audio/stomach_growl.ogg",
        }
    }

    pub fn volume(self) -> f64 {
        match self {
            Cue::DoorLocked | Cue::Exhausted => 0.8,
            Cue::Pickup | Cue::KeyPickup => 0.6,
            _ => 0.5,
        }
    }
}

/// Door state changes with a sound. Intermediate states are silent.
pub fn door_cue(signal: DoorSignal) -> Option<Cue> {
    match signal {
        DoorSignal::StartOpening => Some(Cue::DoorOpen),
        DoorSignal::Closed => Some(Cue::DoorClose),
        DoorSignal::LockedAttempt => Some(Cue::DoorLocked),
        DoorSignal::Unlocked | DoorSignal::Relocked => Some(Cue::DoorUnlock),
        DoorSignal::Opened | DoorSignal::StartClosing => None,
    }
}

pub fn container_cue(signal: &ContainerSignal) -> Option<Cue> {
    match signal {
        ContainerSignal::Opened { .. } => Some(Cue::ContainerOpen),
        ContainerSignal::Closed => Some(Cue::ContainerClose),
        ContainerSignal::ItemAdded(_) | ContainerSignal::ItemRemoved(_) => None,
    }
}

pub fn pickup_cue(kind: ItemKind) -> Cue {
    match kind {
        ItemKind::Key => Cue::KeyPickup,
        _ => Cue::Pickup,
    }
}

/// Loaded handles for every cue.
#[derive(Resource, Default)]
pub struct CueHandles {
    handles: Vec<(Cue, Handle<bevy_kira_audio::AudioSource>)>,
}

impl CueHandles {
    pub fn get(&self, cue: Cue) -> Option<Handle<bevy_kira_audio::AudioSource>> {
        self.handles
            .iter()
            .find(|(candidate, _)| *candidate == cue)
            .map(|(_, handle)| handle.clone())
    }
}

pub fn load_cues(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handles = Cue::ALL
        .iter()
        .map(|cue| (*cue, asset_server.load(cue.path())))
        .collect();
    commands.insert_resource(CueHandles { handles });
}

fn play(audio: &Audio, handles: &CueHandles, cue: Cue) {
    let Some(handle) = handles.get(cue) else {
        return;
    };
    audio.play(handle).with_volume(cue.volume());
}

pub fn play_world_cues(
    audio: Res<Audio>,
    handles: Res<CueHandles>,
    mut doors: EventReader<DoorEvent>,
    mut containers: EventReader<ContainerEvent>,
    mut pickups: EventReader<ItemPickedUp>,
) {
    for event in doors.read() {
        if let Some(cue) = door_cue(event.signal) {
            play(&audio, &handles, cue);
        }
    }
    for event in containers.read() {
        if let Some(cue) = container_cue(&event.signal) {
            play(&audio, &handles, cue);
        }
    }
    for event in pickups.read() {
        play(&audio, &handles, pickup_cue(event.item.kind));
    }
}

pub fn play_body_cues(
    audio: Res<Audio>,
    handles: Res<CueHandles>,
    mut depleted: EventReader<StaminaDepleted>,
    mut critical: EventReader<NeedCritical>,
) {
    if depleted.read().count() > 0 {
        play(&audio, &handles, Cue::Exhausted);
    }
    if critical.read().count() > 0 {
        play(&audio, &handles, Cue::StomachGrowl);
    }
}
