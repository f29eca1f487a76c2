//! Per-damage-type values and tables.

use core::ops::{Index, IndexMut};

use super::graph::{Bound, Bounds, NodeBase, NodeId, StatGraph};
use super::keys::DamageType;
use crate::error::GraphError;

/// A value for every damage type; absent types are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageVector([f64; DamageType::COUNT]);

impl DamageVector {
    pub const fn zero() -> Self {
        Self([0.0; DamageType::COUNT])
    }

    pub fn single(damage_type: DamageType, value: f64) -> Self {
        let mut vector = Self::zero();
        vector[damage_type] = value;
        vector
    }

    /// Builds a full vector from a partial list; repeated types accumulate.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (DamageType, f64)>) -> Self {
        let mut vector = Self::zero();
        for (damage_type, value) in pairs {
            vector[damage_type] += value;
        }
        vector
    }

    pub fn iter(&self) -> impl Iterator<Item = (DamageType, f64)> + '_ {
        DamageType::all().map(|damage_type| (damage_type, self[damage_type]))
    }

    /// Entries with a non-zero value, in damage type order.
    pub fn nonzero(&self) -> impl Iterator<Item = (DamageType, f64)> + '_ {
        self.iter().filter(|(_, value)| *value != 0.0)
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Multiplies each entry by `factor(type)`.
    pub fn scale_by(&mut self, mut factor: impl FnMut(DamageType) -> f64) {
        for damage_type in DamageType::all() {
            self[damage_type] *= factor(damage_type);
        }
    }
}

impl Index<DamageType> for DamageVector {
    type Output = f64;

    fn index(&self, damage_type: DamageType) -> &f64 {
        &self.0[damage_type.index()]
    }
}

impl IndexMut<DamageType> for DamageVector {
    fn index_mut(&mut self, damage_type: DamageType) -> &mut f64 {
        &mut self.0[damage_type.index()]
    }
}

impl FromIterator<(DamageType, f64)> for DamageVector {
    fn from_iter<T: IntoIterator<Item = (DamageType, f64)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

/// One independently modifiable node per damage type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageTable {
    nodes: Vec<NodeId>,
}

impl DamageTable {
    /// Allocates one node per type seeded from `initial`, optionally capped by `cap`.
    pub fn build(
        graph: &mut StatGraph,
        initial: &DamageVector,
        cap: Option<Bound>,
    ) -> Result<Self, GraphError> {
        let bounds = Bounds {
            lower: None,
            upper: cap,
        };
        let nodes = initial
            .iter()
            .map(|(_, value)| graph.add_node(NodeBase::Scalar(value), bounds))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { nodes })
    }

    pub fn node(&self, damage_type: DamageType) -> NodeId {
        self.nodes[damage_type.index()]
    }

    pub fn value(&self, graph: &StatGraph, damage_type: DamageType) -> f64 {
        graph.value(self.node(damage_type))
    }

    pub fn values(&self, graph: &StatGraph) -> DamageVector {
        DamageType::all()
            .map(|damage_type| (damage_type, self.value(graph, damage_type)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{Modifier, ModifierSource};

    #[test]
    fn vectors_are_always_complete() {
        let vector = DamageVector::from_pairs([
            (DamageType::Fire, 3.0),
            (DamageType::Slashing, 2.0),
            (DamageType::Fire, 1.0),
        ]);
        assert_eq!(vector[DamageType::Fire], 4.0);
        assert_eq!(vector[DamageType::Eldritch], 0.0);
        assert_eq!(vector.iter().count(), DamageType::COUNT);
        assert_eq!(vector.total(), 6.0);
        assert_eq!(
            vector.nonzero().collect::<Vec<_>>(),
            vec![(DamageType::Slashing, 2.0), (DamageType::Fire, 4.0)]
        );
    }

    #[test]
    fn capped_tables_clamp_each_entry_independently() {
        let mut graph = StatGraph::new();
        let cap = graph.scalar(0.75);
        let resists = DamageTable::build(
            &mut graph,
            &DamageVector::single(DamageType::Ice, 0.5),
            Some(Bound::Node(cap)),
        )
        .unwrap();
        let amps = DamageTable::build(&mut graph, &DamageVector::zero(), None).unwrap();

        for _ in 0..5 {
            let bonus = Modifier::flat(0.3, ModifierSource::LevelUp(1));
            graph.add_modifier(resists.node(DamageType::Ice), bonus.clone()).unwrap();
            graph.add_modifier(amps.node(DamageType::Ice), bonus).unwrap();
        }

        assert_eq!(resists.value(&graph, DamageType::Ice), 0.75);
        assert_eq!(resists.value(&graph, DamageType::Fire), 0.0);
        assert!((amps.value(&graph, DamageType::Ice) - 1.5).abs() < 1e-12);
    }
}
