//! A combatant: stats, gear, progression and who controls it.
//!
//! Derived combat values (attack, damage, range, defense, action costs)
//! resolve through the equipment first and fall back to the innate values of
//! the [`StatSet`] when no weapon or armor covers them.

use tracing::{info, warn};

use super::equipment::{Equipment, ToggleOutcome};
use super::item::{Inventory, Item, ItemId, ItemIds, Refused};
use super::progression::Progression;
use crate::config::CombatConfig;
use crate::env::{ActorDefinition, ItemOracle, MessageSink, Tone, WeaponRange, capitalize};
use crate::error::{BuildError, Rejection};
use crate::stats::{
    BodyPart, DamageVector, ModifierKind, ModifierSource, ResourceKind, SpeedAxis, StatKey,
    StatSet, scale_cost,
};

/// Stable identity of a combatant within a roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl CombatantId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who decides what a combatant does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Control {
    /// Interactive; the turn engine hands control back to the host.
    Player,
    /// Driven by a registered controller.
    Ai,
    /// No controller. Never scheduled and never dies.
    Inert,
}

/// The attack used when no weapon is held.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NaturalWeapon {
    pub range: WeaponRange,
    pub init_cost_ratio: Option<f64>,
}

#[derive(Debug)]
pub struct Combatant {
    id: CombatantId,
    name: String,
    pub stats: StatSet,
    pub equipment: Equipment,
    pub inventory: Inventory,
    pub progression: Progression,
    natural: NaturalWeapon,
    control: Control,
    alive: bool,
}

impl Combatant {
    pub const PLAYER_BONUS_HP: f64 = 10.0;

    pub fn new(id: CombatantId, name: impl Into<String>, stats: StatSet, control: Control) -> Self {
        let mut combatant = Self {
            id,
            name: name.into(),
            stats,
            equipment: Equipment::new(),
            inventory: Inventory::default(),
            progression: Progression::default(),
            natural: NaturalWeapon::default(),
            control,
            alive: true,
        };
        if control == Control::Player {
            combatant.stats.add_bonus(
                StatKey::Hp.into(),
                ModifierKind::Flat,
                Self::PLAYER_BONUS_HP,
                ModifierSource::Innate,
            );
            combatant.stats.maximize(ResourceKind::Hp);
        }
        combatant
    }

    /// Builds a combatant from its definition, equipping and carrying the
    /// listed catalog items.
    ///
    /// # Errors
    ///
    /// Any [`BuildError`] from the stat template, or `UnknownItem` for a
    /// catalog key the oracle does not know.
    pub fn spawn(
        id: CombatantId,
        definition: &ActorDefinition,
        control: Control,
        config: &CombatConfig,
        items: &dyn ItemOracle,
        ids: &mut ItemIds,
    ) -> Result<Self, BuildError> {
        let stats = StatSet::new(&definition.stats, config)?;
        let mut combatant = Self::new(id, definition.name.clone(), stats, control);
        combatant.natural = NaturalWeapon {
            range: definition.natural_range,
            init_cost_ratio: definition.natural_attack_cost_ratio,
        };
        combatant.progression = Progression::new(
            definition.level_up_base,
            definition.level_up_factor,
            definition.xp_given,
        );

        let mut instantiate = |key: &String| -> Result<Item, BuildError> {
            let item_definition = items
                .definition(key)
                .ok_or_else(|| BuildError::UnknownItem(key.clone()))?;
            ids.spawn(item_definition)
        };

        for key in &definition.equipment {
            let item = instantiate(key)?;
            combatant.stow(item.clone());
            combatant.equipment.equip(item, &mut combatant.stats);
        }
        for key in &definition.inventory {
            let item = instantiate(key)?;
            combatant.stow(item);
        }
        Ok(combatant)
    }

    /// Adds a starting item without capacity or weight checks.
    fn stow(&mut self, item: Item) {
        let weight = item.weight();
        let name = item.name().to_owned();
        match self.inventory.add(item) {
            Ok(()) => {
                self.stats.modify(ResourceKind::CarryingCapacity, weight, true);
            }
            Err(refused) => {
                warn!(target: "crawl::combatant", combatant = %self.name, item = %name, rejection = %refused.reason, "starting item dropped");
            }
        }
    }

    // ===== identity =====

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn control(&self) -> Control {
        self.control
    }

    pub fn is_player(&self) -> bool {
        self.control == Control::Player
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn natural_weapon(&self) -> NaturalWeapon {
        self.natural
    }

    // ===== derived combat values =====

    /// Attack rating of the held weapon, or the innate attack.
    pub fn attack(&self) -> f64 {
        match self.equipment.weapon() {
            Some((_, weapon)) => self.stats.evaluate(&weapon.attack),
            None => self.stats.natural_attack(),
        }
    }

    /// Raw outgoing damage per type, before boosts and resistances.
    pub fn damage(&self) -> DamageVector {
        match self.equipment.weapon() {
            Some((_, weapon)) => weapon
                .damage
                .iter()
                .map(|(damage_type, scaling)| (*damage_type, self.stats.evaluate(scaling)))
                .collect(),
            None => self.stats.natural_damage(),
        }
    }

    pub fn attack_range(&self) -> u32 {
        match self.equipment.weapon() {
            Some((_, weapon)) => weapon.range.tiles(),
            None => self.natural.range.tiles(),
        }
    }

    /// Defense of one body part: worn armor if it defines any, else innate.
    pub fn defense(&self, part: BodyPart) -> f64 {
        match self.equipment.armor(part) {
            Some(armor) => self.stats.evaluate(&armor.defense),
            None => self.stats.natural_defense(part),
        }
    }

    pub fn total_defense(&self) -> f64 {
        BodyPart::all().map(|part| self.defense(part)).sum()
    }

    /// Initiative spent by one attack, after attack speed.
    pub fn attack_cost(&self, config: &CombatConfig) -> i64 {
        let ratio = match self.equipment.weapon() {
            Some((_, weapon)) => weapon.init_cost_ratio,
            None => self.natural.init_cost_ratio,
        }
        .unwrap_or(config.default_attack_cost_ratio);
        scale_cost(config.init_units(ratio), self.stats.speed(SpeedAxis::Attack))
    }

    /// Initiative spent by one step, after movement speed.
    pub fn move_cost(&self, config: &CombatConfig) -> i64 {
        scale_cost(
            config.init_units(config.move_cost_ratio),
            self.stats.speed(SpeedAxis::Movement),
        )
    }

    // ===== items =====

    /// Puts an item into the inventory.
    ///
    /// # Errors
    ///
    /// `InventoryFull`, or `TooHeavyToCarry` when the carried weight would
    /// exceed the carrying capacity. The item is handed back in either case.
    pub fn pick_up(&mut self, item: Item, sink: &mut dyn MessageSink) -> Result<(), Refused> {
        let carried = self.stats.current(ResourceKind::CarryingCapacity);
        if carried + item.weight() > self.stats.max_value(ResourceKind::CarryingCapacity) {
            let reason = Rejection::TooHeavyToCarry {
                item: item.name().to_owned(),
            };
            return Err(Refused { item, reason });
        }
        let weight = item.weight();
        let message = format!("You picked up the {}!", item.name());
        self.inventory.add(item)?;
        self.stats.modify(ResourceKind::CarryingCapacity, weight, true);
        sink.push(message, Tone::Neutral);
        Ok(())
    }

    /// Removes an item from the inventory, taking it off first if worn.
    pub fn drop_item(&mut self, id: ItemId, sink: &mut dyn MessageSink) -> Option<Item> {
        if self.equipment.is_equipped(id) {
            for slot in self.equipment.slots_of(id) {
                self.equipment.unequip(slot, &mut self.stats);
            }
        }
        let item = self.inventory.remove(id)?;
        self.stats
            .modify(ResourceKind::CarryingCapacity, -item.weight(), true);
        sink.push(format!("You dropped the {}.", item.name()), Tone::Neutral);
        Some(item)
    }

    /// Equips or removes a carried item.
    ///
    /// # Errors
    ///
    /// `NotCarried` if the item is not in the inventory, `TooHeavy` if
    /// wearing it would exceed the encumbrance limit.
    pub fn toggle_equip(
        &mut self,
        id: ItemId,
        sink: &mut dyn MessageSink,
    ) -> Result<ToggleOutcome, Rejection> {
        let item = self.inventory.get(id).cloned().ok_or(Rejection::NotCarried)?;
        let outcome = self.equipment.toggle(item, &mut self.stats)?;
        match &outcome {
            ToggleOutcome::Equipped { item, displaced } => {
                for removed in displaced {
                    sink.push(format!("You remove the {}.", removed.name()), Tone::Equipment);
                }
                sink.push(format!("You equip the {}.", item.name()), Tone::Equipment);
            }
            ToggleOutcome::Unequipped(item) => {
                sink.push(format!("You remove the {}.", item.name()), Tone::Equipment);
            }
        }
        Ok(outcome)
    }

    // ===== death =====

    /// Fires the death transition once HP is at or below zero.
    ///
    /// Returns the xp this combatant is worth the first time it dies; `None`
    /// if it is still alive, already dead, or has no controller.
    pub fn check_death(&mut self, sink: &mut dyn MessageSink) -> Option<u32> {
        if !self.alive || self.control == Control::Inert || self.stats.hp() > 0.0 {
            return None;
        }
        self.alive = false;

        if self.is_player() {
            sink.push("You died!".to_owned(), Tone::PlayerDeath);
        } else {
            sink.push(format!("{} is dead!", capitalize(&self.name)), Tone::EnemyDeath);
            self.name = format!("remains of {}", self.name);
            self.control = Control::Inert;
        }
        info!(target: "crawl::combatant", id = %self.id, name = %self.name, "died");
        Some(self.progression.xp_given)
    }
}
