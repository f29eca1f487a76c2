//! Item definitions and the item oracle.
//!
//! Definitions are immutable catalog records shared by every instance of an
//! item through `Arc`. Bonuses are stored with a stat target and turned into
//! modifiers sourced by the concrete item id when the item is attached.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::BuildError;
use crate::state::EquipSlot;
use crate::stats::{DamageType, ModifierKind, Scaling, StatTarget};

/// Read-only access to item definitions by catalog key.
pub trait ItemOracle: Send + Sync {
    fn definition(&self, key: &str) -> Option<Arc<ItemDefinition>>;
}

/// One stat bonus an item grants while equipped.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusSpec {
    /// `"strength"`, `"hp"`, `"resist:fire"`, ...
    pub target: StatTarget,
    pub kind: ModifierKind,
    pub value: f64,
}

impl BonusSpec {
    pub fn new(target: impl Into<StatTarget>, kind: ModifierKind, value: f64) -> Self {
        Self {
            target: target.into(),
            kind,
            value,
        }
    }
}

/// Attack reach in tiles. `None` is melee.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct WeaponRange(pub Option<u32>);

impl WeaponRange {
    pub const MELEE: Self = Self(None);

    /// Range in tiles; at least 1.
    pub fn tiles(self) -> u32 {
        self.0.unwrap_or(1).max(1)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeaponProfile {
    pub attack: Scaling,
    pub damage: Vec<(DamageType, Scaling)>,
    pub range: WeaponRange,
    /// Attack cost as a fraction of a full initiative bar; config default if absent.
    pub init_cost_ratio: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmorProfile {
    pub defense: Scaling,
}

/// Catalog record for an equippable item.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub name: String,
    /// One slot, or `[MainHand, OffHand]` for two-handed weapons.
    pub slots: Vec<EquipSlot>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bonuses: Vec<BonusSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weapon: Option<WeaponProfile>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub armor: Option<ArmorProfile>,
}

impl ItemDefinition {
    const WEAPON_LAYOUTS: [&'static [EquipSlot]; 3] = [
        &[EquipSlot::MainHand],
        &[EquipSlot::OffHand],
        &[EquipSlot::MainHand, EquipSlot::OffHand],
    ];

    pub fn new(name: impl Into<String>, slots: Vec<EquipSlot>) -> Self {
        Self {
            name: name.into(),
            slots,
            weight: 0.0,
            bonuses: Vec::new(),
            weapon: None,
            armor: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_bonus(mut self, bonus: BonusSpec) -> Self {
        self.bonuses.push(bonus);
        self
    }

    pub fn with_weapon(mut self, weapon: WeaponProfile) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn with_armor(mut self, armor: ArmorProfile) -> Self {
        self.armor = Some(armor);
        self
    }

    pub fn is_two_handed(&self) -> bool {
        self.slots.len() > 1
            && self.slots.contains(&EquipSlot::MainHand)
            && self.slots.contains(&EquipSlot::OffHand)
    }

    /// Checks the declared slot layout.
    ///
    /// # Errors
    ///
    /// `InvalidSlotLayout` when:
    /// - no slot or more than two slots are declared, or a slot repeats
    /// - a multi-slot layout is anything other than main hand + off hand
    /// - a weapon declares a non-hand slot
    /// - armor declares anything but a single head/torso/legs/feet slot
    pub fn validate(&self) -> Result<(), BuildError> {
        let invalid = |reason| BuildError::InvalidSlotLayout {
            item: self.name.clone(),
            reason,
        };

        match self.slots.as_slice() {
            [] => return Err(invalid("no equip slot declared")),
            [_] => {}
            [a, b] if a != b && self.is_two_handed() => {}
            _ => return Err(invalid("only main hand + off hand may be combined")),
        }

        let hand_layout = Self::WEAPON_LAYOUTS
            .iter()
            .any(|layout| *layout == self.slots.as_slice());
        if self.weapon.is_some() && !hand_layout {
            return Err(invalid("weapons go in the main hand, the off hand, or both"));
        }

        if self.armor.is_some() {
            let single_body_slot = matches!(
                self.slots.as_slice(),
                [slot] if slot.body_part().is_some()
            );
            if !single_body_slot {
                return Err(invalid("armor goes in exactly one head, torso, legs or feet slot"));
            }
        }

        Ok(())
    }
}

/// In-memory [`ItemOracle`] keyed by catalog id.
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    items: BTreeMap<String, Arc<ItemDefinition>>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and inserts a definition, replacing any previous one with the same key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        definition: ItemDefinition,
    ) -> Result<Arc<ItemDefinition>, BuildError> {
        definition.validate()?;
        let definition = Arc::new(definition);
        self.items.insert(key.into(), Arc::clone(&definition));
        Ok(definition)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }
}

impl ItemOracle for ItemCatalog {
    fn definition(&self, key: &str) -> Option<Arc<ItemDefinition>> {
        self.items.get(key).cloned()
    }
}
