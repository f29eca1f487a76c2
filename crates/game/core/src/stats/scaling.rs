use super::graph::NodeId;
use super::keys::Attribute;
use super::modifiers::Formula;

/// Weighted sum of base attributes, e.g. `100% STR` or `50% STR + 50% DEX`.
///
/// Used by weapon and armor profiles and by innate attack/damage/defense.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Scaling(pub Vec<(Attribute, f64)>);

impl Scaling {
    pub fn of(attribute: Attribute, factor: f64) -> Self {
        Self(vec![(attribute, factor)])
    }

    pub fn weighted(terms: impl IntoIterator<Item = (Attribute, f64)>) -> Self {
        Self(terms.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Evaluates against attribute values read through `attribute`.
    pub fn evaluate(&self, attribute: impl Fn(Attribute) -> f64) -> f64 {
        self.0.iter().map(|(a, factor)| attribute(*a) * factor).sum()
    }

    /// Turns the scaling into a graph formula over the given attribute nodes.
    pub fn to_formula(&self, attribute_node: impl Fn(Attribute) -> NodeId) -> Formula {
        Formula::WeightedSum(
            self.0
                .iter()
                .map(|(a, factor)| (attribute_node(*a), *factor))
                .collect(),
        )
    }
}
