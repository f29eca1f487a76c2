//! Speed multipliers and action cost scaling.
//!
//! Each axis starts at `1.0` and receives dexterity through a
//! diminishing-returns curve in its percent-additive stage:
//!
//! ```text
//! multiplier = 1 × (1 + (1 - falloff^DEX) + Σ other PercentAdd) × …
//! final_cost = base_cost / max(multiplier, MIN_SPEED_MULTIPLIER)
//! ```
//!
//! Higher multiplier = faster = cheaper actions.

use super::graph::{NodeId, StatGraph};
use super::modifiers::{Formula, Modifier, ModifierKind, ModifierSource};
use crate::config::CombatConfig;
use crate::error::GraphError;

/// The kind of speed an action draws on.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpeedAxis {
    Global,
    Attack,
    Movement,
    Casting,
}

/// Handles of the four speed nodes of one combatant.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedMultipliers {
    pub global: NodeId,
    pub attack: NodeId,
    pub movement: NodeId,
    pub casting: NodeId,
}

impl SpeedMultipliers {
    /// Builds the four axes in [`SpeedAxis`] order.
    ///
    /// An axis with an override becomes a plain node holding that value;
    /// the others follow dexterity.
    pub fn build(
        graph: &mut StatGraph,
        dexterity: NodeId,
        falloff: f64,
        overrides: [Option<f64>; 4],
    ) -> Result<Self, GraphError> {
        let mut axis = |value: Option<f64>| -> Result<NodeId, GraphError> {
            if let Some(value) = value {
                return Ok(graph.scalar(value));
            }
            let id = graph.scalar(1.0);
            graph.add_modifier(
                id,
                Modifier::new(
                    Formula::DiminishingReturns {
                        source: dexterity,
                        base: falloff,
                    },
                    ModifierKind::PercentAdd,
                    ModifierSource::Innate,
                ),
            )?;
            Ok(id)
        };

        let [global, attack, movement, casting] = overrides;
        Ok(Self {
            global: axis(global)?,
            attack: axis(attack)?,
            movement: axis(movement)?,
            casting: axis(casting)?,
        })
    }

    pub fn node(&self, axis: SpeedAxis) -> NodeId {
        match axis {
            SpeedAxis::Global => self.global,
            SpeedAxis::Attack => self.attack,
            SpeedAxis::Movement => self.movement,
            SpeedAxis::Casting => self.casting,
        }
    }

    pub fn value(&self, graph: &StatGraph, axis: SpeedAxis) -> f64 {
        graph.value(self.node(axis))
    }
}

/// Scales a base cost in initiative units by a speed multiplier.
///
/// # Examples
/// - cost 500_000 at multiplier 1.0 → 500_000
/// - cost 500_000 at multiplier 2.0 → 250_000
/// - cost 500_000 at multiplier 0.0 → 5_000_000 (floored at 0.1)
pub fn scale_cost(base_cost: i64, multiplier: f64) -> i64 {
    let multiplier = multiplier.max(CombatConfig::MIN_SPEED_MULTIPLIER);
    (base_cost as f64 / multiplier).round() as i64
}
