//! Equipment slots and the equipment resolver.
//!
//! [`Equipment`] maps every [`EquipSlot`] to the item occupying it. A
//! two-handed item occupies both hand slots at once and is always cleared
//! from both together.
//!
//! Attaching an item adds its bonuses to the owner's [`StatSet`] sourced by
//! the item's id; detaching removes everything with that source. Encumbrance
//! current tracks the weight of what is worn.

use arrayvec::ArrayVec;
use strum::{EnumCount, IntoEnumIterator};
use tracing::debug;

use super::item::{Item, ItemId};
use crate::env::{ArmorProfile, WeaponProfile};
use crate::error::Rejection;
use crate::stats::{BodyPart, ModifierSource, ResourceKind, StatSet};

/// Slots an item may occupy.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EquipSlot {
    MainHand,
    OffHand,
    Head,
    Torso,
    Legs,
    Feet,
    Face,
    Back,
    Arms,
    Waist,
    Necklace,
    Earring1,
    Earring2,
    Ring1,
    Ring2,
    Accessory1,
    Accessory2,
    Accessory3,
    Accessory4,
    Essence,
}

/// Slots an item may land in when declaring any one of them.
pub type SlotLayout = ArrayVec<EquipSlot, 2>;

impl EquipSlot {
    pub const COUNT: usize = <Self as EnumCount>::COUNT;

    const EARRINGS: &'static [EquipSlot] = &[Self::Earring1, Self::Earring2];
    const RINGS: &'static [EquipSlot] = &[Self::Ring1, Self::Ring2];
    const ACCESSORIES: &'static [EquipSlot] = &[
        Self::Accessory1,
        Self::Accessory2,
        Self::Accessory3,
        Self::Accessory4,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Interchangeable slots this one belongs to, if any.
    pub fn family(self) -> Option<&'static [EquipSlot]> {
        match self {
            Self::Earring1 | Self::Earring2 => Some(Self::EARRINGS),
            Self::Ring1 | Self::Ring2 => Some(Self::RINGS),
            Self::Accessory1 | Self::Accessory2 | Self::Accessory3 | Self::Accessory4 => {
                Some(Self::ACCESSORIES)
            }
            _ => None,
        }
    }

    /// Body part whose defense an armor piece in this slot provides.
    pub fn body_part(self) -> Option<BodyPart> {
        match self {
            Self::Head => Some(BodyPart::Head),
            Self::Torso => Some(BodyPart::Torso),
            Self::Legs => Some(BodyPart::Legs),
            Self::Feet => Some(BodyPart::Feet),
            _ => None,
        }
    }

    pub fn for_body_part(part: BodyPart) -> Self {
        match part {
            BodyPart::Head => Self::Head,
            BodyPart::Torso => Self::Torso,
            BodyPart::Legs => Self::Legs,
            BodyPart::Feet => Self::Feet,
        }
    }
}

/// Result of a successful [`Equipment::toggle`].
#[derive(Clone, Debug, PartialEq)]
pub enum ToggleOutcome {
    Equipped { item: Item, displaced: Vec<Item> },
    Unequipped(Item),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Equipment {
    slots: [Option<Item>; EquipSlot::COUNT],
}

impl Default for Equipment {
    fn default() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== queries =====

    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        self.slots[slot.index()].as_ref()
    }

    pub fn is_free(&self, slot: EquipSlot) -> bool {
        self.slots[slot.index()].is_none()
    }

    pub fn is_equipped(&self, id: ItemId) -> bool {
        self.slots.iter().flatten().any(|item| item.id() == id)
    }

    /// Slots currently holding the item with `id`.
    pub fn slots_of(&self, id: ItemId) -> SlotLayout {
        EquipSlot::iter()
            .filter(|slot| self.get(*slot).is_some_and(|item| item.id() == id))
            .take(2)
            .collect()
    }

    /// Every equipped item once, in slot order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let item = slot.as_ref()?;
                // a two-handed item shows up in both hands; report it once
                let first = self.slots[..index]
                    .iter()
                    .flatten()
                    .all(|earlier| earlier.id() != item.id());
                first.then_some(item)
            })
    }

    /// Total weight of equipped items.
    pub fn weight(&self) -> f64 {
        self.items().map(Item::weight).sum()
    }

    /// Slots the item's definition declares.
    pub fn occupied_slots(item: &Item) -> SlotLayout {
        item.definition().slots.iter().copied().take(2).collect()
    }

    /// Where `item` would go right now. Never fails.
    ///
    /// - multi-slot items take their full declared layout
    /// - a main-hand item takes the main hand if free, else the off hand if
    ///   free, else the main hand (swapping out the occupant)
    /// - a family slot item takes the first free family member, else its
    ///   declared slot
    pub fn find_slot_for(&self, item: &Item) -> SlotLayout {
        let declared = Self::occupied_slots(item);
        let [nominal] = declared.as_slice() else {
            return declared;
        };

        let chosen = match (*nominal, nominal.family()) {
            (EquipSlot::MainHand, _) => {
                if self.is_free(EquipSlot::MainHand) {
                    EquipSlot::MainHand
                } else if self.is_free(EquipSlot::OffHand) {
                    EquipSlot::OffHand
                } else {
                    EquipSlot::MainHand
                }
            }
            (_, Some(family)) => family
                .iter()
                .copied()
                .find(|slot| self.is_free(*slot))
                .unwrap_or(*nominal),
            (slot, None) => slot,
        };

        let mut layout = SlotLayout::new();
        layout.push(chosen);
        layout
    }

    /// Main and off hand hold the same item, which declares both.
    pub fn is_two_handing(&self) -> bool {
        match (self.get(EquipSlot::MainHand), self.get(EquipSlot::OffHand)) {
            (Some(main), Some(off)) => main.id() == off.id() && main.definition().is_two_handed(),
            _ => false,
        }
    }

    /// Main and off hand hold two different one-handed items.
    pub fn is_dual_wielding(&self) -> bool {
        match (self.get(EquipSlot::MainHand), self.get(EquipSlot::OffHand)) {
            (Some(main), Some(off)) => {
                main.id() != off.id()
                    && !main.definition().is_two_handed()
                    && !off.definition().is_two_handed()
            }
            _ => false,
        }
    }

    /// The weapon used to attack: main hand first, then off hand.
    pub fn weapon(&self) -> Option<(&Item, &WeaponProfile)> {
        [EquipSlot::MainHand, EquipSlot::OffHand]
            .into_iter()
            .filter_map(|slot| self.get(slot))
            .find_map(|item| item.definition().weapon.as_ref().map(|profile| (item, profile)))
    }

    /// Armor covering `part`, if the item in that slot defines any.
    pub fn armor(&self, part: BodyPart) -> Option<&ArmorProfile> {
        self.get(EquipSlot::for_body_part(part))?
            .definition()
            .armor
            .as_ref()
    }

    // ===== mutation =====

    fn attach(item: &Item, stats: &mut StatSet) {
        let source = ModifierSource::Item(item.id());
        for bonus in &item.definition().bonuses {
            stats.add_bonus(bonus.target, bonus.kind, bonus.value, source);
        }
        stats.modify(ResourceKind::Encumbrance, item.weight(), true);
    }

    fn detach(item: &Item, stats: &mut StatSet) {
        stats.remove_all_from_source(ModifierSource::Item(item.id()));
        stats.modify(ResourceKind::Encumbrance, -item.weight(), true);
    }

    /// Attaches `item`, frees its target slots and assigns it.
    ///
    /// Returns the items that had to be unequipped to make room. Re-equipping
    /// an item that is already worn moves it.
    pub fn equip(&mut self, item: Item, stats: &mut StatSet) -> Vec<Item> {
        if self.is_equipped(item.id()) {
            self.unequip_item(item.id(), stats);
        }

        Self::attach(&item, stats);
        let targets = self.find_slot_for(&item);

        let mut displaced = Vec::new();
        for slot in &targets {
            if let Some(occupant) = self.unequip(*slot, stats) {
                displaced.push(occupant);
            }
        }
        for slot in &targets {
            self.slots[slot.index()] = Some(item.clone());
        }

        debug!(
            target: "crawl::equipment",
            item = item.name(),
            slots = ?targets,
            displaced = displaced.len(),
            "equipped"
        );
        displaced
    }

    /// Detaches whatever occupies `slot` and clears every slot it holds.
    pub fn unequip(&mut self, slot: EquipSlot, stats: &mut StatSet) -> Option<Item> {
        let id = self.get(slot)?.id();
        self.unequip_item(id, stats)
    }

    fn unequip_item(&mut self, id: ItemId, stats: &mut StatSet) -> Option<Item> {
        let mut removed = None;
        for slot in self.slots.iter_mut() {
            if slot.as_ref().is_some_and(|item| item.id() == id) {
                removed = slot.take();
            }
        }
        let item = removed?;
        Self::detach(&item, stats);
        debug!(target: "crawl::equipment", item = item.name(), "unequipped");
        Some(item)
    }

    /// Unequips `item` if worn, otherwise equips it if the weight allows.
    ///
    /// # Errors
    ///
    /// `TooHeavy` when current encumbrance plus the item's weight exceeds the
    /// maximum. Nothing is mutated in that case.
    pub fn toggle(&mut self, item: Item, stats: &mut StatSet) -> Result<ToggleOutcome, Rejection> {
        if self.is_equipped(item.id()) {
            return Ok(self
                .unequip_item(item.id(), stats)
                .map_or(ToggleOutcome::Unequipped(item), ToggleOutcome::Unequipped));
        }

        let current = stats.current(ResourceKind::Encumbrance);
        let max = stats.max_value(ResourceKind::Encumbrance);
        if current + item.weight() > max {
            return Err(Rejection::TooHeavy {
                item: item.name().to_owned(),
                weight: item.weight(),
                available: (max - current).max(0.0),
            });
        }

        let displaced = self.equip(item.clone(), stats);
        Ok(ToggleOutcome::Equipped { item, displaced })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::CombatConfig;
    use crate::env::{BonusSpec, ItemDefinition};
    use crate::stats::{Attribute, ModifierKind, Scaling, StatKey, StatTemplate};

    fn stats(strength: f64) -> StatSet {
        StatSet::new(
            &StatTemplate::with_attributes([strength, 10.0, 10.0, 10.0, 10.0, 10.0]),
            &CombatConfig::default(),
        )
        .unwrap()
    }

    fn item(id: u32, name: &str, slots: Vec<EquipSlot>, weight: f64) -> Item {
        Item::new(
            ItemId(id),
            Arc::new(ItemDefinition::new(name, slots).with_weight(weight)),
        )
        .unwrap()
    }

    fn weapon(id: u32, name: &str, slots: Vec<EquipSlot>) -> Item {
        let definition = ItemDefinition::new(name, slots)
            .with_weight(1.0)
            .with_weapon(WeaponProfile {
                attack: Scaling::of(Attribute::Strength, 1.0),
                ..WeaponProfile::default()
            });
        Item::new(ItemId(id), Arc::new(definition)).unwrap()
    }

    #[test]
    fn bonuses_attach_on_equip_and_detach_on_unequip() {
        let mut set = stats(10.0);
        let mut equipment = Equipment::new();
        let definition = ItemDefinition::new("Belt of Might", vec![EquipSlot::Waist])
            .with_weight(2.0)
            .with_bonus(BonusSpec::new(StatKey::Strength, ModifierKind::Flat, 3.0));
        let belt = Item::new(ItemId(1), Arc::new(definition)).unwrap();

        equipment.equip(belt, &mut set);
        assert_eq!(set.attribute(Attribute::Strength), 13.0);
        assert_eq!(set.current(ResourceKind::Encumbrance), 2.0);

        let removed = equipment.unequip(EquipSlot::Waist, &mut set).unwrap();
        assert_eq!(removed.id(), ItemId(1));
        assert_eq!(set.attribute(Attribute::Strength), 10.0);
        assert_eq!(set.current(ResourceKind::Encumbrance), 0.0);
        assert!(equipment.unequip(EquipSlot::Waist, &mut set).is_none());
    }

    #[test]
    fn toggle_rejects_overweight_items_without_mutation() {
        // STR 20 → carrying capacity 200 → encumbrance max 100
        let mut set = stats(20.0);
        let mut equipment = Equipment::new();
        assert_eq!(set.max_value(ResourceKind::Encumbrance), 100.0);

        equipment.toggle(item(1, "Plate", vec![EquipSlot::Torso], 80.0), &mut set).unwrap();
        assert_eq!(set.current(ResourceKind::Encumbrance), 80.0);

        let anvil = Item::new(
            ItemId(2),
            Arc::new(
                ItemDefinition::new("Anvil Helm", vec![EquipSlot::Head])
                    .with_weight(30.0)
                    .with_bonus(BonusSpec::new(StatKey::Hp, ModifierKind::Flat, 50.0)),
            ),
        )
        .unwrap();
        let hp_before = set.max_value(ResourceKind::Hp);
        let err = equipment.toggle(anvil, &mut set).unwrap_err();
        assert!(matches!(err, Rejection::TooHeavy { weight, available, .. } if weight == 30.0 && available == 20.0));

        assert!(equipment.is_free(EquipSlot::Head));
        assert_eq!(set.max_value(ResourceKind::Hp), hp_before);
        assert_eq!(set.current(ResourceKind::Encumbrance), 80.0);
    }

    #[test]
    fn toggle_unequips_worn_items() {
        let mut set = stats(10.0);
        let mut equipment = Equipment::new();
        let cloak = item(1, "Cloak", vec![EquipSlot::Back], 1.0);

        assert!(matches!(
            equipment.toggle(cloak.clone(), &mut set),
            Ok(ToggleOutcome::Equipped { .. })
        ));
        assert!(matches!(
            equipment.toggle(cloak, &mut set),
            Ok(ToggleOutcome::Unequipped(_))
        ));
        assert!(equipment.is_free(EquipSlot::Back));
    }

    #[test]
    fn two_handed_weapons_fill_both_hands() {
        let mut set = stats(10.0);
        let mut equipment = Equipment::new();
        let greatsword = weapon(1, "Greatsword", vec![EquipSlot::MainHand, EquipSlot::OffHand]);

        equipment.equip(greatsword, &mut set);
        assert!(equipment.is_two_handing());
        assert!(!equipment.is_dual_wielding());
        assert_eq!(equipment.items().count(), 1);
        assert_eq!(equipment.slots_of(ItemId(1)).len(), 2);

        let removed = equipment.unequip(EquipSlot::OffHand, &mut set).unwrap();
        assert_eq!(removed.id(), ItemId(1));
        assert!(equipment.is_free(EquipSlot::MainHand));
        assert!(equipment.is_free(EquipSlot::OffHand));
    }

    #[test]
    fn two_one_handers_dual_wield() {
        let mut set = stats(10.0);
        let mut equipment = Equipment::new();
        equipment.equip(weapon(1, "Sword", vec![EquipSlot::MainHand]), &mut set);
        equipment.equip(weapon(2, "Dagger", vec![EquipSlot::MainHand]), &mut set);

        assert_eq!(equipment.get(EquipSlot::MainHand).map(Item::id), Some(ItemId(1)));
        assert_eq!(equipment.get(EquipSlot::OffHand).map(Item::id), Some(ItemId(2)));
        assert!(equipment.is_dual_wielding());
        assert!(!equipment.is_two_handing());

        // both hands busy: a third one-hander swaps out the main hand
        let displaced = equipment.equip(weapon(3, "Mace", vec![EquipSlot::MainHand]), &mut set);
        assert_eq!(displaced.iter().map(Item::id).collect::<Vec<_>>(), vec![ItemId(1)]);
        assert_eq!(equipment.get(EquipSlot::MainHand).map(Item::id), Some(ItemId(3)));
    }

    #[test]
    fn two_hander_displaces_both_hands() {
        let mut set = stats(10.0);
        let mut equipment = Equipment::new();
        equipment.equip(weapon(1, "Sword", vec![EquipSlot::MainHand]), &mut set);
        equipment.equip(weapon(2, "Shield", vec![EquipSlot::OffHand]), &mut set);

        let displaced = equipment.equip(
            weapon(3, "Halberd", vec![EquipSlot::MainHand, EquipSlot::OffHand]),
            &mut set,
        );
        assert_eq!(displaced.len(), 2);
        assert!(equipment.is_two_handing());
        assert_eq!(set.current(ResourceKind::Encumbrance), 1.0);
    }

    #[test]
    fn family_slots_fill_the_first_free_member() {
        let mut set = stats(10.0);
        let mut equipment = Equipment::new();
        for id in 1..=3 {
            equipment.equip(item(id, "Ring", vec![EquipSlot::Ring1], 0.1), &mut set);
        }
        // third ring found both slots busy and replaced the nominal slot
        assert_eq!(equipment.get(EquipSlot::Ring1).map(Item::id), Some(ItemId(3)));
        assert_eq!(equipment.get(EquipSlot::Ring2).map(Item::id), Some(ItemId(2)));

        let charm = item(9, "Charm", vec![EquipSlot::Accessory3], 0.0);
        assert_eq!(equipment.find_slot_for(&charm).as_slice(), &[EquipSlot::Accessory1]);
    }

    #[test]
    fn weapon_lookup_prefers_the_main_hand() {
        let mut set = stats(10.0);
        let mut equipment = Equipment::new();
        assert!(equipment.weapon().is_none());

        equipment.equip(weapon(2, "Parrying Dagger", vec![EquipSlot::OffHand]), &mut set);
        assert_eq!(equipment.weapon().map(|(item, _)| item.id()), Some(ItemId(2)));

        equipment.equip(weapon(1, "Sword", vec![EquipSlot::MainHand]), &mut set);
        assert_eq!(equipment.weapon().map(|(item, _)| item.id()), Some(ItemId(1)));
    }
}
