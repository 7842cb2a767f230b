//! Item definitions carried by pickups, inventories and containers.

use serde::{Deserialize, Serialize};

/// Broad item category. Decides what picking the item up does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemKind {
    Key,
    #[default]
    Food,
    Beverage,
    Weapon,
    Ammo,
    Document,
    Quest,
    Backpack,
}

/// Everything known about one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemData {
    pub id: String,
    pub kind: ItemKind,
    pub name: String,
    pub description: String,
    pub weight: f32,
    pub value: u32,
    /// Hunger restored when eaten (food and beverages only)
    pub hunger_restore: f32,
    /// Thirst restored when drunk (food and beverages only)
    pub thirst_restore: f32,
    /// Key identifier unlocked by this item; defaults to `id` for keys
    pub key_id: Option<String>,
    pub backpack_slots: usize,
    pub backpack_weight_limit: f32,
}

impl Default for ItemData {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: ItemKind::Food,
            name: "Item".to_string(),
            description: String::new(),
            weight: 1.0,
            value: 0,
            hunger_restore: 0.0,
            thirst_restore: 0.0,
            key_id: None,
            backpack_slots: 5,
            backpack_weight_limit: 25.0,
        }
    }
}

impl ItemData {
    pub fn new(id: impl Into<String>, kind: ItemKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight.max(0.0);
        self
    }

    pub fn with_restore(mut self, hunger: f32, thirst: f32) -> Self {
        self.hunger_restore = hunger.max(0.0);
        self.thirst_restore = thirst.max(0.0);
        self
    }

    pub fn is_consumable(&self) -> bool {
        matches!(self.kind, ItemKind::Food | ItemKind::Beverage)
    }

    /// Key identifier this item grants, if it is a key.
    pub fn granted_key(&self) -> Option<&str> {
        if self.kind != ItemKind::Key {
            return None;
        }
        match self.key_id.as_deref() {
            Some(key) if !key.is_empty() => Some(key),
            _ if !self.id.is_empty() => Some(self.id.as_str()),
            _ => None,
        }
    }

    /// Clamp numeric fields into their valid ranges.
    pub fn sanitized(mut self) -> Self {
        self.weight = self.weight.max(0.0);
        self.hunger_restore = self.hunger_restore.max(0.0);
        self.thirst_restore = self.thirst_restore.max(0.0);
        self.backpack_slots = self.backpack_slots.max(1);
        self.backpack_weight_limit = self.backpack_weight_limit.max(1.0);
        self
    }
}
