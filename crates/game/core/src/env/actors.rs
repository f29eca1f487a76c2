//! Actor definitions and oracle interface.
//!
//! `ActorDefinition` is the data-driven description of a combatant: base
//! stats and damage tables, innate weapon, starting equipment and the xp it
//! is worth. Definitions load from RON and are spawned into
//! [`crate::state::Combatant`] instances.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::stats::{DamageType, Scaling, StatKey, StatTemplate};

use super::items::WeaponRange;

/// Built-in controller an AI combatant is spawned with.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AiKind {
    /// Attacks the player while it lives.
    #[default]
    MeleeBrute,
    /// Waits forever.
    Idle,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorDefinition {
    pub name: String,

    /// Attributes, derived-stat overrides, damage tables and innate combat scalings.
    pub stats: StatTemplate,

    /// Reach of the innate attack.
    #[cfg_attr(feature = "serde", serde(default))]
    pub natural_range: WeaponRange,

    /// Innate attack cost as a fraction of a full initiative bar.
    #[cfg_attr(feature = "serde", serde(default))]
    pub natural_attack_cost_ratio: Option<f64>,

    /// Item catalog keys equipped at spawn.
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: Vec<String>,

    /// Item catalog keys carried at spawn.
    #[cfg_attr(feature = "serde", serde(default))]
    pub inventory: Vec<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub ai: AiKind,

    /// Experience awarded to the player on death.
    #[cfg_attr(feature = "serde", serde(default))]
    pub xp_given: u32,

    #[cfg_attr(feature = "serde", serde(default = "ActorDefinition::default_level_up_base"))]
    pub level_up_base: u32,

    #[cfg_attr(feature = "serde", serde(default = "ActorDefinition::default_level_up_factor"))]
    pub level_up_factor: u32,
}

impl ActorDefinition {
    pub const DEFAULT_LEVEL_UP_BASE: u32 = 1;
    pub const DEFAULT_LEVEL_UP_FACTOR: u32 = 2;

    #[cfg(feature = "serde")]
    fn default_level_up_base() -> u32 {
        Self::DEFAULT_LEVEL_UP_BASE
    }

    #[cfg(feature = "serde")]
    fn default_level_up_factor() -> u32 {
        Self::DEFAULT_LEVEL_UP_FACTOR
    }

    pub fn builder(name: impl Into<String>) -> ActorDefinitionBuilder {
        ActorDefinitionBuilder::new(name)
    }
}

/// Builder for constructing actor definitions in code.
#[derive(Clone, Debug)]
pub struct ActorDefinitionBuilder {
    definition: ActorDefinition,
}

impl ActorDefinitionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            definition: ActorDefinition {
                name: name.into(),
                stats: StatTemplate::with_attributes([10.0; 6]),
                natural_range: WeaponRange::MELEE,
                natural_attack_cost_ratio: None,
                equipment: Vec::new(),
                inventory: Vec::new(),
                ai: AiKind::default(),
                xp_given: 0,
                level_up_base: ActorDefinition::DEFAULT_LEVEL_UP_BASE,
                level_up_factor: ActorDefinition::DEFAULT_LEVEL_UP_FACTOR,
            },
        }
    }

    /// STR, DEX, CON, INT, CUN, WIL.
    pub fn attributes(mut self, values: [f64; 6]) -> Self {
        let overrides = std::mem::take(&mut self.definition.stats.base)
            .into_iter()
            .filter(|(key, _)| key.attribute().is_none());
        let mut template = StatTemplate::with_attributes(values);
        template.base.extend(overrides);
        template.resists = std::mem::take(&mut self.definition.stats.resists);
        template.amps = std::mem::take(&mut self.definition.stats.amps);
        template.masteries = std::mem::take(&mut self.definition.stats.masteries);
        template.natural_attack = self.definition.stats.natural_attack.take();
        template.natural_damage = self.definition.stats.natural_damage.take();
        template.natural_defense = self.definition.stats.natural_defense.take();
        self.definition.stats = template;
        self
    }

    pub fn stat(mut self, key: StatKey, value: f64) -> Self {
        self.definition.stats.base.insert(key, value);
        self
    }

    pub fn resist(mut self, damage_type: DamageType, value: f64) -> Self {
        self.definition.stats.resists.insert(damage_type, value);
        self
    }

    pub fn amp(mut self, damage_type: DamageType, value: f64) -> Self {
        self.definition.stats.amps.insert(damage_type, value);
        self
    }

    pub fn mastery(mut self, damage_type: DamageType, value: f64) -> Self {
        self.definition.stats.masteries.insert(damage_type, value);
        self
    }

    pub fn natural_attack(mut self, scaling: Scaling) -> Self {
        self.definition.stats.natural_attack = Some(scaling);
        self
    }

    pub fn natural_damage(mut self, damage: Vec<(DamageType, Scaling)>) -> Self {
        self.definition.stats.natural_damage = Some(damage);
        self
    }

    pub fn natural_defense(mut self, scaling: Scaling) -> Self {
        self.definition.stats.natural_defense = Some(scaling);
        self
    }

    pub fn natural_range(mut self, range: WeaponRange) -> Self {
        self.definition.natural_range = range;
        self
    }

    pub fn natural_attack_cost_ratio(mut self, ratio: f64) -> Self {
        self.definition.natural_attack_cost_ratio = Some(ratio);
        self
    }

    pub fn equip(mut self, item_key: impl Into<String>) -> Self {
        self.definition.equipment.push(item_key.into());
        self
    }

    pub fn carry(mut self, item_key: impl Into<String>) -> Self {
        self.definition.inventory.push(item_key.into());
        self
    }

    pub fn ai(mut self, ai: AiKind) -> Self {
        self.definition.ai = ai;
        self
    }

    pub fn xp_given(mut self, xp: u32) -> Self {
        self.definition.xp_given = xp;
        self
    }

    pub fn level_up(mut self, base: u32, factor: u32) -> Self {
        self.definition.level_up_base = base;
        self.definition.level_up_factor = factor;
        self
    }

    pub fn build(self) -> ActorDefinition {
        self.definition
    }
}

/// Read-only access to actor definitions by catalog key.
pub trait ActorOracle: Send + Sync {
    fn definition(&self, key: &str) -> Option<Arc<ActorDefinition>>;
}

/// In-memory [`ActorOracle`].
#[derive(Clone, Debug, Default)]
pub struct ActorCatalog {
    actors: BTreeMap<String, Arc<ActorDefinition>>,
}

impl ActorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, definition: ActorDefinition) -> Arc<ActorDefinition> {
        let definition = Arc::new(definition);
        self.actors.insert(key.into(), Arc::clone(&definition));
        definition
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.actors.keys().map(String::as_str)
    }
}

impl ActorOracle for ActorCatalog {
    fn definition(&self, key: &str) -> Option<Arc<ActorDefinition>> {
        self.actors.get(key).cloned()
    }
}
