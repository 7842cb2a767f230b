//! Interactable definitions and placements, loaded from RON.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;

use super::container::ContainerConfig;
use super::door::{DoorConfig, DoorLock};
use super::pickup::PickupConfig;
use super::usable::UsableConfig;
use crate::core::{read_ron_file, DataLoadError};
use crate::interaction::InteractionSettings;
use crate::inventory::ItemData;

pub const INTERACTABLES_PATH: &str = "assets/data/interactables.ron";

/// Container definition as written on disk; items are referenced by ID.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContainerDef {
    pub settings: InteractionSettings,
    pub display_name: Option<String>,
    pub capacity: Option<usize>,
    pub items: Vec<String>,
}

/// What a placement spawns.
#[derive(Debug, Clone, Deserialize)]
pub enum PlacementKind {
    Door {
        id: String,
        #[serde(default)]
        lock: Option<DoorLock>,
    },
    Pickup {
        item: String,
        #[serde(default)]
        config: PickupConfig,
    },
    Container(String),
    Usable(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Placement {
    pub kind: PlacementKind,
    pub position: [f32; 3],
    /// Degrees around the vertical axis
    #[serde(default)]
    pub yaw: f32,
}

impl Placement {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(Vec3::from_array(self.position))
            .with_rotation(Quat::from_rotation_y(self.yaw.to_radians()))
    }
}

/// Contents of interactables.ron.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InteractablesFile {
    pub items: HashMap<String, ItemData>,
    pub doors: HashMap<String, DoorConfig>,
    pub containers: HashMap<String, ContainerDef>,
    pub usables: HashMap<String, UsableConfig>,
    pub placements: Vec<Placement>,
}

/// A placement with every reference looked up.
#[derive(Debug, Clone)]
pub enum ResolvedKind {
    Door(DoorConfig, Option<DoorLock>),
    Pickup(ItemData, PickupConfig),
    Container(ContainerConfig),
    Usable(UsableConfig),
}

#[derive(Debug, Clone)]
pub struct ResolvedPlacement {
    pub kind: ResolvedKind,
    pub transform: Transform,
}

/// Registered definitions, keyed by ID.
#[derive(Resource, Debug, Clone, Default)]
pub struct InteractableRegistry {
    file: InteractablesFile,
}

impl InteractableRegistry {
    pub fn new(file: InteractablesFile) -> Self {
        Self { file }
    }

    pub fn load(path: &str) -> Result<Self, DataLoadError> {
        read_ron_file::<InteractablesFile>(path).map(Self::new)
    }

    pub fn item(&self, id: &str) -> Result<ItemData, DataLoadError> {
        self.file
            .items
            .get(id)
            .map(|item| {
                ItemData {
                    id: id.to_string(),
                    ..item.clone()
                }
                .sanitized()
            })
            .ok_or_else(|| unknown("item", id))
    }

    pub fn door(&self, id: &str) -> Result<DoorConfig, DataLoadError> {
        self.file
            .doors
            .get(id)
            .map(|door| door.clone().sanitized())
            .ok_or_else(|| unknown("door", id))
    }

    pub fn usable(&self, id: &str) -> Result<UsableConfig, DataLoadError> {
        self.file
            .usables
            .get(id)
            .cloned()
            .ok_or_else(|| unknown("usable", id))
    }

    pub fn container(&self, id: &str) -> Result<ContainerConfig, DataLoadError> {
        let def = self
            .file
            .containers
            .get(id)
            .ok_or_else(|| unknown("container", id))?;
        let items = def
            .items
            .iter()
            .map(|item| self.item(item))
            .collect::<Result<Vec<_>, _>>()?;

        let defaults = ContainerConfig::default();
        Ok(ContainerConfig {
            settings: def.settings.clone(),
            display_name: def.display_name.clone().unwrap_or(defaults.display_name),
            capacity: def.capacity.unwrap_or(defaults.capacity),
            items,
        })
    }

    pub fn resolve(&self, placement: &Placement) -> Result<ResolvedPlacement, DataLoadError> {
        let kind = match &placement.kind {
            PlacementKind::Door { id, lock } => ResolvedKind::Door(self.door(id)?, lock.clone()),
            PlacementKind::Pickup { item, config } => {
                ResolvedKind::Pickup(self.item(item)?, config.clone())
            }
            PlacementKind::Container(id) => ResolvedKind::Container(self.container(id)?),
            PlacementKind::Usable(id) => ResolvedKind::Usable(self.usable(id)?),
        };
        Ok(ResolvedPlacement {
            kind,
            transform: placement.transform(),
        })
    }

    /// Resolve every placement, skipping and logging broken ones.
    pub fn placements(&self) -> Vec<ResolvedPlacement> {
        self.file
            .placements
            .iter()
            .filter_map(|placement| match self.resolve(placement) {
                Ok(resolved) => Some(resolved),
                Err(e) => {
                    error!("Skipping placement at {:?}: {}", placement.position, e);
                    None
                }
            })
            .collect()
    }
}

fn unknown(kind: &'static str, id: &str) -> DataLoadError {
    DataLoadError::UnknownDefinition {
        kind,
        id: id.to_string(),
    }
}

/// Load interactables.ron into the registry. A missing or broken file
/// leaves an empty registry.
pub fn load_interactables(mut commands: Commands) {
    let registry = match InteractableRegistry::load(INTERACTABLES_PATH) {
        Ok(registry) => {
            info!(
                "Loaded {} item, {} door, {} container and {} usable definitions",
                registry.file.items.len(),
                registry.file.doors.len(),
                registry.file.containers.len(),
                registry.file.usables.len()
            );
            registry
        }
        Err(e) => {
            error!("Failed to load interactables: {}", e);
            InteractableRegistry::default()
        }
    };
    commands.insert_resource(registry);
}
