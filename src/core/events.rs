//! Global events used for cross-system communication.
//!
//! Stateful components (stamina, needs, focus trackers, doors, inventories)
//! never send events while they mutate. They queue signals internally and a
//! broadcast system turns those into the events below once the mutation is
//! complete, so listeners always observe settled state.

use bevy::prelude::*;

use crate::interaction::InteractionData;
use crate::inventory::ItemData;

/// Which survival need a notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeedKind {
    Hunger,
    Thirst,
}

impl NeedKind {
    /// Display name used in notifications and the HUD.
    pub fn name(self) -> &'static str {
        match self {
            NeedKind::Hunger => "Hunger",
            NeedKind::Thirst => "Thirst",
        }
    }
}

// ----------------------------------------------------------------------------
// Stamina
// ----------------------------------------------------------------------------

/// Stamina value changed.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct StaminaChanged {
    pub entity: Entity,
    pub current: f32,
    pub max: f32,
}

/// Stamina dropped into the exhausted band.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaminaDepleted {
    pub entity: Entity,
}

/// Stamina climbed back above the recovery threshold.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaminaRecovered {
    pub entity: Entity,
}

// ----------------------------------------------------------------------------
// Needs
// ----------------------------------------------------------------------------

/// Hunger or thirst value changed.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct NeedChanged {
    pub entity: Entity,
    pub need: NeedKind,
    pub current: f32,
    pub max: f32,
}

/// A need entered its critical band (sent once per entry).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct NeedCritical {
    pub entity: Entity,
    pub need: NeedKind,
    pub percent: f32,
}

/// A need reached zero (sent once per entry).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeedDepleted {
    pub entity: Entity,
    pub need: NeedKind,
}

// ----------------------------------------------------------------------------
// Interaction
// ----------------------------------------------------------------------------

/// The instigator focused a new interactable, or the focused one's data changed.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct FocusChanged {
    pub instigator: Entity,
    pub target: Entity,
    pub data: InteractionData,
}

/// The instigator no longer focuses anything.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusLost {
    pub instigator: Entity,
}

/// An interaction with `target` succeeded.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionCompleted {
    pub instigator: Entity,
    pub target: Entity,
}

/// A hold-to-interact started on `target`.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HoldStarted {
    pub instigator: Entity,
    pub target: Entity,
    pub duration: f32,
}

/// An active hold was released early or interrupted.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldCancelled {
    pub instigator: Entity,
}

/// Input-side requests for an instigator's focus tracker.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionCommand {
    /// Interact button pressed: starts a hold or interacts instantly.
    Press { instigator: Entity },
    /// Interact button released: cancels an unfinished hold.
    Release { instigator: Entity },
    /// Interact with a specific target, bypassing focus.
    InteractWith { instigator: Entity, target: Entity },
}

// ----------------------------------------------------------------------------
// Doors
// ----------------------------------------------------------------------------

/// Door state machine notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorSignal {
    StartOpening,
    Opened,
    StartClosing,
    Closed,
    LockedAttempt,
    Unlocked,
    Relocked,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorEvent {
    pub door: Entity,
    pub signal: DoorSignal,
}

/// Lock `door` again with a key `instigator` carries.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockRequest {
    pub instigator: Entity,
    pub door: Entity,
}

// ----------------------------------------------------------------------------
// Inventory and containers
// ----------------------------------------------------------------------------

/// Inventory notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum InventorySignal {
    BackpackActivated { slots: usize, weight_limit: f32 },
    BackpackDeactivated,
    ItemAdded(ItemData),
    ItemRemoved(ItemData),
    Changed { weight: f32, weight_limit: f32 },
    Full(String),
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct InventoryEvent {
    pub owner: Entity,
    pub signal: InventorySignal,
}

/// A key was added to an entity's key ring.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct KeyAcquired {
    pub owner: Entity,
    pub key_id: String,
}

/// A world pickup was collected.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ItemPickedUp {
    pub picker: Entity,
    pub pickup: Entity,
    pub item: ItemData,
}

/// Container notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerSignal {
    Opened { by: Entity },
    Closed,
    ItemAdded(ItemData),
    ItemRemoved(ItemData),
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct ContainerEvent {
    pub container: Entity,
    pub signal: ContainerSignal,
}

/// Direction of a container transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    /// Container slot -> inventory.
    Take,
    /// Inventory slot -> container.
    Deposit,
}

/// Move one item between an entity's inventory and a container.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub owner: Entity,
    pub container: Entity,
    pub direction: TransferDirection,
    /// Slot index in the source collection.
    pub index: usize,
}

/// Eat or drink an inventory item by ID.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ConsumeItemRequest {
    pub owner: Entity,
    pub item_id: String,
}

// ----------------------------------------------------------------------------
// Day/night clock
// ----------------------------------------------------------------------------

/// Clock notifications.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum ClockEvent {
    TimeChanged { hours: f32 },
    DayChanged { day: u32 },
    DayNightChanged { is_day: bool },
}
