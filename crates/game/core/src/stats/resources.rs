//! Resource pools and the initiative counter.
//!
//! A [`Resource`] pairs a maximum (a node in the owner's [`StatGraph`]) with a
//! stored current amount. Maximums are derived; current amounts are state.
//!
//! [`Initiative`] is kept apart from resources: it is an integer counter at
//! `CombatConfig::MAX_INIT` resolution and is only ever moved with overdraft
//! allowed.

use super::graph::{NodeId, StatGraph};
use crate::config::CombatConfig;

/// Current/maximum pair such as HP or encumbrance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resource {
    max: NodeId,
    current: f64,
}

impl Resource {
    /// Creates a resource that starts full.
    pub fn new(graph: &StatGraph, max: NodeId) -> Self {
        Self {
            max,
            current: graph.value(max),
        }
    }

    /// Creates a resource that starts empty.
    pub fn empty(max: NodeId) -> Self {
        Self { max, current: 0.0 }
    }

    /// Node holding the maximum; modifiers target this.
    pub fn max_node(&self) -> NodeId {
        self.max
    }

    pub fn value(&self) -> f64 {
        self.current
    }

    pub fn max_value(&self, graph: &StatGraph) -> f64 {
        graph.value(self.max)
    }

    /// Adds `amount` and returns the delta actually applied.
    ///
    /// Without `sudo` the result is clamped into `[0, max]`; with `sudo` any
    /// result is accepted, including negative or above-max values.
    pub fn modify(&mut self, graph: &StatGraph, amount: f64, sudo: bool) -> f64 {
        let next = if sudo {
            self.current + amount
        } else {
            (self.current + amount).min(self.max_value(graph)).max(0.0)
        };
        let applied = next - self.current;
        self.current = next;
        applied
    }

    pub fn maximize(&mut self, graph: &StatGraph) {
        self.current = self.max_value(graph);
    }

    pub fn minimize(&mut self) {
        self.current = 0.0;
    }

    /// Clamped gain of `time_factor × rate`.
    pub fn regenerate(&mut self, graph: &StatGraph, time_factor: f64, rate: f64) -> f64 {
        self.modify(graph, time_factor * rate, false)
    }

    /// Sets the current amount without clamping.
    pub fn set(&mut self, value: f64) {
        self.current = value;
    }
}

/// Per-combatant turn counter in raw initiative units.
///
/// A combatant may act once the counter reaches `max`. Costs may drive the
/// counter negative; regeneration pays the debt down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Initiative {
    current: i64,
    max: i64,
}

impl Initiative {
    /// A full bar: ready to act immediately.
    pub fn full(max: i64) -> Self {
        Self { current: max, max }
    }

    pub fn at(current: i64, max: i64) -> Self {
        Self { current, max }
    }

    pub fn value(&self) -> i64 {
        self.current
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Units still missing before the combatant may act (never negative).
    pub fn remaining(&self) -> i64 {
        (self.max - self.current).max(0)
    }

    pub fn is_ready(&self) -> bool {
        self.current >= self.max
    }

    pub fn advance(&mut self, diff: i64) {
        self.current += diff;
    }

    /// Subtracts an action cost; the balance may go negative.
    pub fn apply_cost(&mut self, cost: i64) {
        self.current -= cost;
    }

    /// Value in display units (`max` shows as 100 with default config).
    pub fn display(&self, config: &CombatConfig) -> i64 {
        self.current / config.init_display_factor.max(1)
    }
}
