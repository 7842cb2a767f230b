//! Storage containers (chests, crates, lockers) and item transfer with the
//! player's inventory.

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::core::{ContainerSignal, PlayState, TransferDirection, TransferRequest};
use crate::interaction::{Instigator, Interactable, InteractionData, InteractionSettings};
use crate::inventory::{Inventory, ItemData};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    pub settings: InteractionSettings,
    pub display_name: String,
    /// Slot count, at least 1
    pub capacity: usize,
    pub items: Vec<ItemData>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            settings: InteractionSettings::default(),
            display_name: "Container".to_string(),
            capacity: 10,
            items: Vec::new(),
        }
    }
}

/// Why an item could not be moved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransferError {
    #[error("No item in slot {0}")]
    EmptySlot(usize),
    #[error("{0}")]
    InventoryRejected(&'static str),
    #[error("Container is full")]
    ContainerFull,
}

#[derive(Component, Debug, Clone)]
pub struct Container {
    settings: InteractionSettings,
    display_name: String,
    capacity: usize,
    items: Vec<ItemData>,
    opened_by: Option<Entity>,
    signals: Vec<ContainerSignal>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new(ContainerConfig::default())
    }
}

impl Container {
    pub fn new(config: ContainerConfig) -> Self {
        let capacity = config.capacity.max(1);
        let mut items = config.items;
        items.truncate(capacity);
        Self {
            settings: config.settings.sanitized(),
            display_name: config.display_name,
            capacity,
            items: items.into_iter().map(ItemData::sanitized).collect(),
            opened_by: None,
            signals: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn items(&self) -> &[ItemData] {
        &self.items
    }

    pub fn used_slots(&self) -> usize {
        self.items.len()
    }

    pub fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    pub fn has_space(&self) -> bool {
        self.items.len() < self.capacity
    }

    pub fn is_open(&self) -> bool {
        self.opened_by.is_some()
    }

    pub fn opened_by(&self) -> Option<Entity> {
        self.opened_by
    }

    pub fn get_item(&self, item_id: &str) -> Option<&ItemData> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn add_item(&mut self, item: ItemData) -> bool {
        if !self.has_space() {
            debug!(
                "{} is full ({}/{})",
                self.display_name,
                self.used_slots(),
                self.capacity
            );
            return false;
        }
        self.signals.push(ContainerSignal::ItemAdded(item.clone()));
        self.items.push(item);
        true
    }

    /// Remove the last item with `item_id`.
    pub fn remove_item(&mut self, item_id: &str) -> Option<ItemData> {
        let index = self.items.iter().rposition(|i| i.id == item_id)?;
        self.remove_at(index)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<ItemData> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.signals.push(ContainerSignal::ItemRemoved(item.clone()));
        Some(item)
    }

    pub fn open(&mut self, by: Entity) -> bool {
        if self.is_open() {
            return false;
        }
        self.opened_by = Some(by);
        self.signals.push(ContainerSignal::Opened { by });
        true
    }

    pub fn close(&mut self) -> bool {
        if self.opened_by.take().is_none() {
            return false;
        }
        self.signals.push(ContainerSignal::Closed);
        true
    }

    /// Move the item in container slot `index` into `inventory`. Nothing
    /// moves unless the inventory accepts it.
    pub fn take_item(&mut self, index: usize, inventory: &mut Inventory) -> Result<(), TransferError> {
        let item = self.items.get(index).ok_or(TransferError::EmptySlot(index))?;
        if let Some(reason) = inventory.rejection_reason(item) {
            return Err(TransferError::InventoryRejected(reason));
        }
        if let Some(item) = self.remove_at(index) {
            inventory.add_item(item);
        }
        Ok(())
    }

    /// Move the item in inventory slot `index` into this container. Nothing
    /// moves unless the container has a free slot.
    pub fn deposit_item(&mut self, index: usize, inventory: &mut Inventory) -> Result<(), TransferError> {
        if index >= inventory.used_slots() {
            return Err(TransferError::EmptySlot(index));
        }
        if !self.has_space() {
            return Err(TransferError::ContainerFull);
        }
        if let Some(item) = inventory.remove_at(index) {
            self.add_item(item);
        }
        Ok(())
    }

    pub fn has_signals(&self) -> bool {
        !self.signals.is_empty()
    }

    pub fn take_signals(&mut self) -> Vec<ContainerSignal> {
        std::mem::take(&mut self.signals)
    }
}

impl Interactable for Container {
    fn interact(&mut self, instigator: &mut Instigator) -> bool {
        if self.is_open() {
            self.close()
        } else {
            self.open(instigator.entity)
        }
    }

    fn interaction_data(&self, _instigator: &Instigator) -> InteractionData {
        let text = if self.is_open() {
            format!("Close {}", self.display_name)
        } else {
            format!("Open {}", self.display_name)
        };
        InteractionData::new(text)
            .with_secondary(format!("{}/{}", self.used_slots(), self.capacity))
            .with_duration(self.settings.hold_duration)
    }

    fn can_interact(&self, _instigator: &Instigator) -> bool {
        self.settings.enabled
    }

    fn interaction_distance(&self) -> f32 {
        self.settings.max_distance
    }
}

/// Apply transfer requests between inventories and containers.
pub fn process_transfers(
    mut requests: EventReader<TransferRequest>,
    mut containers: Query<&mut Container>,
    mut inventories: Query<&mut Inventory>,
) {
    for request in requests.read() {
        let Ok(mut container) = containers.get_mut(request.container) else {
            warn!("Transfer target {:?} is not a container", request.container);
            continue;
        };
        let Ok(mut inventory) = inventories.get_mut(request.owner) else {
            continue;
        };

        let result = match request.direction {
            TransferDirection::Take => container.take_item(request.index, &mut inventory),
            TransferDirection::Deposit => container.deposit_item(request.index, &mut inventory),
        };
        if let Err(err) = result {
            info!("Transfer with {} failed: {}", container.display_name(), err);
        }
    }
}

/// Enter or leave the container view as containers open and close.
pub fn sync_container_view(
    containers: Query<&Container>,
    state: Option<Res<State<PlayState>>>,
    mut next_state: Option<ResMut<NextState<PlayState>>>,
) {
    let (Some(state), Some(next_state)) = (state, next_state.as_mut()) else {
        return;
    };
    let any_open = containers.iter().any(Container::is_open);
    match (state.get(), any_open) {
        (PlayState::Exploring, true) => next_state.set(PlayState::Container),
        (PlayState::Container, false) => next_state.set(PlayState::Exploring),
        _ => {}
    }
}
