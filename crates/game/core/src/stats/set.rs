//! Per-combatant stat set.
//!
//! Owns the combatant's [`StatGraph`] and the handles into it: six
//! attributes, five resources, three regen rates, four speed axes, the
//! resist/amp/mastery tables and the innate attack, damage and per-body-part
//! defense used when no equipment provides them.
//!
//! # Default formulas
//!
//! | Stat               | Formula                                  |
//! |--------------------|------------------------------------------|
//! | HP max             | 500% CON                                 |
//! | Energy max         | 10 + 25% STR + 25% DEX + 50% CON         |
//! | Mana max           | 10 + 250% INT                            |
//! | Carrying capacity  | 1000% STR                                |
//! | Encumbrance max    | `encumbrance_ratio` × carrying capacity  |
//! | HP regen           | 0.04% CON + 0.01% WIL                    |
//! | Energy regen       | 4% CON + 1% WIL                          |
//! | Mana regen         | 0.4% INT + 0.1% WIL                      |
//! | Innate defense     | 25% DEX per body part                    |
//! | Innate attack      | 50% STR + 50% DEX                        |
//! | Innate damage      | bludgeoning 25% STR                      |
//!
//! A value supplied in [`StatTemplate::base`] for a derived key replaces the
//! formula entirely.

use std::collections::BTreeMap;

use super::damage_tables::{DamageTable, DamageVector};
use super::graph::{Bound, NodeId, StatGraph};
use super::keys::{Attribute, BodyPart, DamageCategory, DamageType, StatKey, StatTarget};
use super::modifiers::{Formula, Modifier, ModifierKind, ModifierSource};
use super::resources::{Initiative, Resource};
use super::scaling::Scaling;
use super::speed::{SpeedAxis, SpeedMultipliers};
use crate::config::CombatConfig;
use crate::error::{BuildError, GraphError};

/// Construction input for a [`StatSet`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatTemplate {
    /// Attribute values (all six required) plus optional derived overrides.
    pub base: BTreeMap<StatKey, f64>,
    pub resists: BTreeMap<DamageType, f64>,
    pub amps: BTreeMap<DamageType, f64>,
    pub masteries: BTreeMap<DamageType, f64>,
    pub natural_attack: Option<Scaling>,
    pub natural_damage: Option<Vec<(DamageType, Scaling)>>,
    pub natural_defense: Option<Scaling>,
}

impl StatTemplate {
    /// Template with the six attributes set, everything else defaulted.
    pub fn with_attributes(values: [f64; 6]) -> Self {
        let base = Attribute::all()
            .zip(values)
            .map(|(attribute, value)| (StatKey::from(attribute), value))
            .collect();
        Self {
            base,
            ..Self::default()
        }
    }

    pub fn set(mut self, key: StatKey, value: f64) -> Self {
        self.base.insert(key, value);
        self
    }
}

/// Resources tracked by a [`StatSet`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceKind {
    Hp,
    Energy,
    Mana,
    CarryingCapacity,
    Encumbrance,
}

#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatSet {
    graph: StatGraph,
    attributes: Vec<NodeId>,

    hp: Resource,
    energy: Resource,
    mana: Resource,
    carrying_capacity: Resource,
    encumbrance: Resource,

    hp_regen: NodeId,
    energy_regen: NodeId,
    mana_regen: NodeId,

    resist_cap: NodeId,
    resists: DamageTable,
    amps: DamageTable,
    masteries: DamageTable,

    natural_attack: NodeId,
    natural_damage: DamageTable,
    natural_defense: Vec<NodeId>,

    speed: SpeedMultipliers,
    initiative: Initiative,
}

impl StatSet {
    /// Builds the graph for one combatant.
    ///
    /// # Errors
    ///
    /// `MissingBaseStat` if any of the six attributes is absent.
    pub fn new(template: &StatTemplate, config: &CombatConfig) -> Result<Self, BuildError> {
        let mut graph = StatGraph::new();

        let attributes = Attribute::all()
            .map(|attribute| {
                template
                    .base
                    .get(&StatKey::from(attribute))
                    .map(|value| graph.scalar(*value))
                    .ok_or(BuildError::MissingBaseStat(attribute))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let attr = |attribute: Attribute| attributes[attribute.index()];
        let weighted =
            |terms: &[(Attribute, f64)]| Scaling::weighted(terms.iter().copied()).to_formula(attr);

        let derived = |graph: &mut StatGraph,
                       key: StatKey,
                       constant: f64,
                       formula: Formula|
         -> Result<NodeId, GraphError> {
            if let Some(value) = template.base.get(&key) {
                return Ok(graph.scalar(*value));
            }
            let id = graph.scalar(constant);
            graph.add_modifier(id, Modifier::functional(formula, ModifierSource::Innate))?;
            Ok(id)
        };

        use Attribute::*;
        let hp_max = derived(&mut graph, StatKey::Hp, 0.0, weighted(&[(Constitution, 5.0)]))?;
        let energy_max = derived(
            &mut graph,
            StatKey::Energy,
            10.0,
            weighted(&[(Strength, 0.25), (Dexterity, 0.25), (Constitution, 0.5)]),
        )?;
        let mana_max = derived(&mut graph, StatKey::Mana, 10.0, weighted(&[(Intelligence, 2.5)]))?;
        let capacity_max = derived(
            &mut graph,
            StatKey::CarryingCapacity,
            0.0,
            weighted(&[(Strength, 10.0)]),
        )?;
        let encumbrance_max = derived(
            &mut graph,
            StatKey::Encumbrance,
            0.0,
            Formula::Scaled {
                source: capacity_max,
                factor: config.encumbrance_ratio,
            },
        )?;

        let hp_regen = derived(
            &mut graph,
            StatKey::HpRegen,
            0.0,
            weighted(&[(Constitution, 4e-4), (Willpower, 1e-4)]),
        )?;
        let energy_regen = derived(
            &mut graph,
            StatKey::EnergyRegen,
            0.0,
            weighted(&[(Constitution, 4e-2), (Willpower, 1e-2)]),
        )?;
        let mana_regen = derived(
            &mut graph,
            StatKey::ManaRegen,
            0.0,
            weighted(&[(Intelligence, 4e-3), (Willpower, 1e-3)]),
        )?;

        let resist_cap = graph.scalar(config.resist_cap);
        let resists = DamageTable::build(
            &mut graph,
            &DamageVector::from_pairs(template.resists.iter().map(|(k, v)| (*k, *v))),
            Some(Bound::Node(resist_cap)),
        )?;
        let amps = DamageTable::build(
            &mut graph,
            &DamageVector::from_pairs(template.amps.iter().map(|(k, v)| (*k, *v))),
            None,
        )?;
        let masteries = DamageTable::build(
            &mut graph,
            &DamageVector::from_pairs(template.masteries.iter().map(|(k, v)| (*k, *v))),
            None,
        )?;

        let attack_scaling = template
            .natural_attack
            .clone()
            .unwrap_or_else(|| Scaling::weighted([(Strength, 0.5), (Dexterity, 0.5)]));
        let natural_attack = graph.scalar(0.0);
        graph.add_modifier(
            natural_attack,
            Modifier::functional(attack_scaling.to_formula(attr), ModifierSource::Innate),
        )?;

        let damage_scaling = template
            .natural_damage
            .clone()
            .unwrap_or_else(|| vec![(DamageType::Bludgeoning, Scaling::of(Strength, 0.25))]);
        let natural_damage = DamageTable::build(&mut graph, &DamageVector::zero(), None)?;
        for (damage_type, scaling) in &damage_scaling {
            graph.add_modifier(
                natural_damage.node(*damage_type),
                Modifier::functional(scaling.to_formula(attr), ModifierSource::Innate),
            )?;
        }

        let defense_scaling = template
            .natural_defense
            .clone()
            .unwrap_or_else(|| Scaling::of(Dexterity, 0.25));
        let natural_defense = BodyPart::all()
            .map(|_| {
                let id = graph.scalar(0.0);
                graph
                    .add_modifier(
                        id,
                        Modifier::functional(defense_scaling.to_formula(attr), ModifierSource::Innate),
                    )
                    .map(|_| id)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let speed_override = |key| template.base.get(&key).copied();
        let speed = SpeedMultipliers::build(
            &mut graph,
            attr(Dexterity),
            config.speed_falloff,
            [
                speed_override(StatKey::GlobalSpeed),
                speed_override(StatKey::AttackSpeed),
                speed_override(StatKey::MovementSpeed),
                speed_override(StatKey::CastingSpeed),
            ],
        )?;

        Ok(Self {
            hp: Resource::new(&graph, hp_max),
            energy: Resource::new(&graph, energy_max),
            mana: Resource::new(&graph, mana_max),
            carrying_capacity: Resource::empty(capacity_max),
            encumbrance: Resource::empty(encumbrance_max),
            hp_regen,
            energy_regen,
            mana_regen,
            resist_cap,
            resists,
            amps,
            masteries,
            natural_attack,
            natural_damage,
            natural_defense,
            speed,
            initiative: Initiative::full(config.max_init),
            attributes,
            graph,
        })
    }

    // ===== graph access =====

    pub fn graph(&self) -> &StatGraph {
        &self.graph
    }

    /// Resolves a stat target to its node. Resources resolve to their maximum.
    pub fn get_stat(&self, target: StatTarget) -> NodeId {
        match target {
            StatTarget::Stat(key) => self.stat_node(key),
            StatTarget::Damage(category, damage_type) => {
                self.damage_table(category).node(damage_type)
            }
        }
    }

    fn stat_node(&self, key: StatKey) -> NodeId {
        match key {
            StatKey::Strength => self.attribute_node(Attribute::Strength),
            StatKey::Dexterity => self.attribute_node(Attribute::Dexterity),
            StatKey::Constitution => self.attribute_node(Attribute::Constitution),
            StatKey::Intelligence => self.attribute_node(Attribute::Intelligence),
            StatKey::Cunning => self.attribute_node(Attribute::Cunning),
            StatKey::Willpower => self.attribute_node(Attribute::Willpower),
            StatKey::Hp => self.hp.max_node(),
            StatKey::Energy => self.energy.max_node(),
            StatKey::Mana => self.mana.max_node(),
            StatKey::CarryingCapacity => self.carrying_capacity.max_node(),
            StatKey::Encumbrance => self.encumbrance.max_node(),
            StatKey::HpRegen => self.hp_regen,
            StatKey::EnergyRegen => self.energy_regen,
            StatKey::ManaRegen => self.mana_regen,
            StatKey::GlobalSpeed => self.speed.global,
            StatKey::AttackSpeed => self.speed.attack,
            StatKey::MovementSpeed => self.speed.movement,
            StatKey::CastingSpeed => self.speed.casting,
        }
    }

    pub fn attribute_node(&self, attribute: Attribute) -> NodeId {
        self.attributes[attribute.index()]
    }

    /// Current value of a stat target.
    pub fn value(&self, target: impl Into<StatTarget>) -> f64 {
        self.graph.value(self.get_stat(target.into()))
    }

    pub fn attribute(&self, attribute: Attribute) -> f64 {
        self.graph.value(self.attribute_node(attribute))
    }

    pub fn damage_table(&self, category: DamageCategory) -> &DamageTable {
        match category {
            DamageCategory::Resist => &self.resists,
            DamageCategory::Amp => &self.amps,
            DamageCategory::Mastery => &self.masteries,
        }
    }

    pub fn damage_value(&self, category: DamageCategory, damage_type: DamageType) -> f64 {
        self.damage_table(category).value(&self.graph, damage_type)
    }

    // ===== modifiers =====

    /// Attaches a modifier to a stat target.
    ///
    /// # Errors
    ///
    /// `Cycle` if the modifier reads a node that already depends on the target.
    pub fn add_modifier(&mut self, target: StatTarget, modifier: Modifier) -> Result<(), GraphError> {
        let node = self.get_stat(target);
        self.graph.add_modifier(node, modifier)
    }

    /// Attaches a constant modifier; constants can never form a cycle.
    pub fn add_bonus(
        &mut self,
        target: StatTarget,
        kind: ModifierKind,
        value: f64,
        source: ModifierSource,
    ) {
        let node = self.get_stat(target);
        self.graph.add_scalar_modifier(node, value, kind, source);
    }

    pub fn remove_modifier(&mut self, target: StatTarget, modifier: &Modifier) -> bool {
        let node = self.get_stat(target);
        self.graph.remove_modifier(node, modifier)
    }

    /// Removes everything contributed by `source` from every stat.
    pub fn remove_all_from_source(&mut self, source: ModifierSource) -> usize {
        self.graph.purge_source(source)
    }

    /// Value `target` would have with one more flat point.
    ///
    /// Leaves the set unchanged (the preview modifier is removed before returning).
    pub fn preview_value(&mut self, target: impl Into<StatTarget>) -> f64 {
        let target = target.into();
        self.add_bonus(target, ModifierKind::Flat, 1.0, ModifierSource::Preview);
        let preview = self.value(target);
        let node = self.get_stat(target);
        self.graph.remove_all_from_source(node, ModifierSource::Preview);
        preview
    }

    // ===== resources =====

    pub fn resource(&self, kind: ResourceKind) -> &Resource {
        match kind {
            ResourceKind::Hp => &self.hp,
            ResourceKind::Energy => &self.energy,
            ResourceKind::Mana => &self.mana,
            ResourceKind::CarryingCapacity => &self.carrying_capacity,
            ResourceKind::Encumbrance => &self.encumbrance,
        }
    }

    fn resource_mut(&mut self, kind: ResourceKind) -> (&mut Resource, &StatGraph) {
        let resource = match kind {
            ResourceKind::Hp => &mut self.hp,
            ResourceKind::Energy => &mut self.energy,
            ResourceKind::Mana => &mut self.mana,
            ResourceKind::CarryingCapacity => &mut self.carrying_capacity,
            ResourceKind::Encumbrance => &mut self.encumbrance,
        };
        (resource, &self.graph)
    }

    pub fn current(&self, kind: ResourceKind) -> f64 {
        self.resource(kind).value()
    }

    pub fn max_value(&self, kind: ResourceKind) -> f64 {
        self.resource(kind).max_value(&self.graph)
    }

    /// See [`Resource::modify`]. Returns the applied delta.
    pub fn modify(&mut self, kind: ResourceKind, amount: f64, sudo: bool) -> f64 {
        let (resource, graph) = self.resource_mut(kind);
        resource.modify(graph, amount, sudo)
    }

    pub fn maximize(&mut self, kind: ResourceKind) {
        let (resource, graph) = self.resource_mut(kind);
        resource.maximize(graph);
    }

    pub fn minimize(&mut self, kind: ResourceKind) {
        self.resource_mut(kind).0.minimize();
    }

    pub fn hp(&self) -> f64 {
        self.hp.value()
    }

    pub fn is_alive(&self) -> bool {
        self.hp.value() > 0.0
    }

    // ===== time =====

    pub fn initiative(&self) -> &Initiative {
        &self.initiative
    }

    pub fn initiative_mut(&mut self) -> &mut Initiative {
        &mut self.initiative
    }

    /// Advances initiative by `diff` and regenerates HP, energy and mana by
    /// `diff / max_init` of their per-bar regen rate.
    pub fn regenerate(&mut self, diff: i64) {
        self.initiative.advance(diff);
        let time_factor = diff as f64 / self.initiative.max() as f64;

        let hp_rate = self.graph.value(self.hp_regen);
        let energy_rate = self.graph.value(self.energy_regen);
        let mana_rate = self.graph.value(self.mana_regen);
        self.hp.regenerate(&self.graph, time_factor, hp_rate);
        self.energy.regenerate(&self.graph, time_factor, energy_rate);
        self.mana.regenerate(&self.graph, time_factor, mana_rate);
    }

    pub fn speed(&self, axis: SpeedAxis) -> f64 {
        self.speed.value(&self.graph, axis)
    }

    // ===== innate combat values =====

    pub fn natural_attack(&self) -> f64 {
        self.graph.value(self.natural_attack)
    }

    pub fn natural_damage(&self) -> DamageVector {
        self.natural_damage.values(&self.graph)
    }

    pub fn natural_defense(&self, part: BodyPart) -> f64 {
        self.graph.value(self.natural_defense[part.index()])
    }

    /// Evaluates an item scaling against this set's current attributes.
    pub fn evaluate(&self, scaling: &Scaling) -> f64 {
        scaling.evaluate(|attribute| self.attribute(attribute))
    }

    pub fn resist_cap(&self) -> f64 {
        self.graph.value(self.resist_cap)
    }

    // ===== persistence =====

    /// Encodes the whole set, graph included, with bincode.
    #[cfg(feature = "serde")]
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}
