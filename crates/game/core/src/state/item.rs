//! Item instances and inventories.

use std::sync::Arc;

use crate::config::CombatConfig;
use crate::env::ItemDefinition;
use crate::error::{BuildError, Rejection};

/// Identity of one item instance. Also the modifier source of its bonuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

/// A concrete item: an identity plus its shared catalog definition.
#[derive(Clone, Debug)]
pub struct Item {
    id: ItemId,
    definition: Arc<ItemDefinition>,
}

impl Item {
    /// Creates an instance after checking the definition's slot layout.
    pub fn new(id: ItemId, definition: Arc<ItemDefinition>) -> Result<Self, BuildError> {
        definition.validate()?;
        Ok(Self { id, definition })
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn definition(&self) -> &ItemDefinition {
        &self.definition
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn weight(&self) -> f64 {
        self.definition.weight
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Hands out unique item ids.
#[derive(Clone, Copy, Debug, Default)]
pub struct ItemIds {
    next: u32,
}

impl ItemIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> ItemId {
        let id = ItemId(self.next);
        self.next += 1;
        id
    }

    /// Instantiates a definition under a fresh id.
    pub fn spawn(&mut self, definition: Arc<ItemDefinition>) -> Result<Item, BuildError> {
        Item::new(self.next_id(), definition)
    }
}

/// An item that could not be stored, handed back with the reason.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{reason}")]
pub struct Refused {
    pub item: Item,
    pub reason: Rejection,
}

/// Items carried but not necessarily equipped.
#[derive(Clone, Debug, PartialEq)]
pub struct Inventory {
    items: Vec<Item>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_capacity(CombatConfig::INVENTORY_CAPACITY)
    }
}

impl Inventory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// # Errors
    ///
    /// `InventoryFull` once `capacity` items are carried; the item comes back
    /// inside the error.
    pub fn add(&mut self, item: Item) -> Result<(), Refused> {
        if self.is_full() {
            return Err(Refused {
                item,
                reason: Rejection::InventoryFull,
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let position = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(position))
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EquipSlot;

    #[test]
    fn inventory_rejects_overflow() {
        let mut ids = ItemIds::new();
        let ring = Arc::new(ItemDefinition::new("Ring", vec![EquipSlot::Ring1]));
        let mut inventory = Inventory::with_capacity(1);

        let first = ids.spawn(Arc::clone(&ring)).unwrap();
        let first_id = first.id();
        inventory.add(first).unwrap();
        let second = ids.spawn(ring).unwrap();
        assert_ne!(second.id(), first_id);
        let refused = inventory.add(second).unwrap_err();
        assert_eq!(refused.reason, Rejection::InventoryFull);
        assert_ne!(refused.item.id(), first_id);
        assert!(inventory.is_full());

        assert!(inventory.remove(first_id).is_some());
        assert!(inventory.is_empty());
    }

    #[test]
    fn invalid_definitions_cannot_be_instantiated() {
        let broken = Arc::new(ItemDefinition::new("Broken", vec![]));
        assert!(Item::new(ItemId(0), broken).is_err());
    }
}
