//! World module - doors, pickups, containers, usables and the day/night cycle.

mod container;
mod data;
mod day_night;
mod door;
mod pickup;
mod plugin;
mod spawning;
mod systems;
mod usable;

pub use container::{Container, ContainerConfig, TransferError};
pub use data::{InteractableRegistry, InteractablesFile, Placement, PlacementKind, INTERACTABLES_PATH};
pub use day_night::{DayNightConfig, DayNightCycle, Sun};
pub use door::{Door, DoorConfig, DoorHinge, DoorLock, DoorState};
pub use pickup::{Pickup, PickupConfig};
pub use plugin::{setup_world, WorldPlugin};
pub use spawning::WorldEntity;
pub use systems::{broadcast_container_signals, broadcast_door_signals};
pub use usable::{Usable, UsableConfig};
