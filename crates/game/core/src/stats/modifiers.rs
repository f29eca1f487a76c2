//! Modifiers attached to stat graph nodes.
//!
//! A modifier contributes to a node's value through one of five kinds,
//! applied in a fixed calculation order:
//!
//! ```text
//! flat      = base + Σ Flat + Σ Functional
//! result    = flat × (1 + Σ PercentAdd) × Π PercentMult + Σ RigidFlat
//! ```
//!
//! `RigidFlat` contributions land after the multiplicative stage and are never
//! scaled by percentages.

use super::graph::NodeId;
use crate::state::ItemId;

/// How a modifier's value is folded into its target node.
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
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ModifierKind {
    /// Added to the base before percentages.
    Flat,
    /// Summed, then applied as `(1 + sum)`.
    PercentAdd,
    /// Multiplied together.
    PercentMult,
    /// Added after every multiplier.
    RigidFlat,
    /// Evaluated from its dependencies and added to the base like `Flat`.
    Functional,
}

/// Identity used to remove every modifier contributed by one origin.
///
/// Sources are never compared by magnitude; they only group modifiers for bulk
/// removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierSource {
    /// Default formulas wired at construction.
    Innate,
    /// Bonuses of an equipped item.
    Item(ItemId),
    /// Attribute point bought at the given level.
    LevelUp(u32),
    /// Temporary modifier used to preview a level-up.
    Preview,
}

/// Non-linear contributions evaluated by [`super::StatGraph`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Formula {
    /// `source × factor`
    Scaled { source: NodeId, factor: f64 },
    /// `Σ node × weight`
    WeightedSum(Vec<(NodeId, f64)>),
    /// `1 - base^source`; approaches 1 as the source grows.
    DiminishingReturns { source: NodeId, base: f64 },
}

impl Formula {
    pub fn dependencies(&self) -> impl Iterator<Item = NodeId> + '_ {
        let (single, many) = match self {
            Self::Scaled { source, .. } | Self::DiminishingReturns { source, .. } => {
                (Some(*source), &[][..])
            }
            Self::WeightedSum(terms) => (None, terms.as_slice()),
        };
        single.into_iter().chain(many.iter().map(|(id, _)| *id))
    }

    /// Evaluates the formula given a node reader.
    pub fn evaluate(&self, read: impl Fn(NodeId) -> f64) -> f64 {
        match self {
            Self::Scaled { source, factor } => read(*source) * factor,
            Self::WeightedSum(terms) => terms.iter().map(|(id, weight)| read(*id) * weight).sum(),
            Self::DiminishingReturns { source, base } => 1.0 - base.powf(read(*source)),
        }
    }
}

/// Where a modifier's magnitude comes from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierValue {
    Scalar(f64),
    Node(NodeId),
    Formula(Formula),
}

impl ModifierValue {
    pub fn dependencies(&self) -> Box<dyn Iterator<Item = NodeId> + '_> {
        match self {
            Self::Scalar(_) => Box::new(core::iter::empty()),
            Self::Node(id) => Box::new(core::iter::once(*id)),
            Self::Formula(formula) => Box::new(formula.dependencies()),
        }
    }
}

impl From<f64> for ModifierValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<NodeId> for ModifierValue {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<Formula> for ModifierValue {
    fn from(formula: Formula) -> Self {
        Self::Formula(formula)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub value: ModifierValue,
    pub kind: ModifierKind,
    pub source: ModifierSource,
}

impl Modifier {
    pub fn new(value: impl Into<ModifierValue>, kind: ModifierKind, source: ModifierSource) -> Self {
        Self {
            value: value.into(),
            kind,
            source,
        }
    }

    pub fn flat(value: impl Into<ModifierValue>, source: ModifierSource) -> Self {
        Self::new(value, ModifierKind::Flat, source)
    }

    pub fn percent_add(value: impl Into<ModifierValue>, source: ModifierSource) -> Self {
        Self::new(value, ModifierKind::PercentAdd, source)
    }

    pub fn percent_mult(value: impl Into<ModifierValue>, source: ModifierSource) -> Self {
        Self::new(value, ModifierKind::PercentMult, source)
    }

    pub fn rigid_flat(value: impl Into<ModifierValue>, source: ModifierSource) -> Self {
        Self::new(value, ModifierKind::RigidFlat, source)
    }

    pub fn functional(formula: Formula, source: ModifierSource) -> Self {
        Self::new(formula, ModifierKind::Functional, source)
    }

    pub fn dependencies(&self) -> Box<dyn Iterator<Item = NodeId> + '_> {
        self.value.dependencies()
    }
}

/// Running totals of one node recomputation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Accumulator {
    flat: f64,
    percent_add: f64,
    percent_mult: f64,
    flat_rigid: f64,
}

impl Accumulator {
    pub(crate) fn new(base: f64) -> Self {
        Self {
            flat: base,
            percent_add: 0.0,
            percent_mult: 1.0,
            flat_rigid: 0.0,
        }
    }

    pub(crate) fn apply(&mut self, kind: ModifierKind, value: f64) {
        match kind {
            ModifierKind::Flat | ModifierKind::Functional => self.flat += value,
            ModifierKind::PercentAdd => self.percent_add += value,
            ModifierKind::PercentMult => self.percent_mult *= value,
            ModifierKind::RigidFlat => self.flat_rigid += value,
        }
    }

    pub(crate) fn finish(self) -> f64 {
        self.flat * (1.0 + self.percent_add) * self.percent_mult + self.flat_rigid
    }
}
