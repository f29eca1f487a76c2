//! Arena-backed stat graph.
//!
//! Every modifiable number on a combatant is a [`NodeId`] into one
//! [`StatGraph`]. Nodes own a base (scalar or another node), an ordered list of
//! [`Modifier`]s, optional clamping [`Bounds`], and the handles of the nodes
//! that read from them (`dependents`).
//!
//! # Invalidation
//!
//! Values are cached and recomputed lazily on read. Any mutation marks the
//! node dirty and walks its dependents; a node that is already dirty stops the
//! walk, because a dirty node's dependents are always dirty as well. Reads take
//! `&self` and refresh the cache through [`Cell`]s.
//!
//! Wiring that would make a node depend on itself is refused with
//! [`GraphError::Cycle`].

use core::cell::Cell;

use super::modifiers::{Accumulator, Modifier, ModifierKind, ModifierSource, ModifierValue};
use crate::error::GraphError;

/// Handle of a node inside one [`StatGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Starting value of a node before modifiers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeBase {
    Scalar(f64),
    Node(NodeId),
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bound {
    Fixed(f64),
    Node(NodeId),
}

/// Optional clamp applied after the modifier stack. Lower is applied first.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

impl Bounds {
    pub const NONE: Self = Self {
        lower: None,
        upper: None,
    };

    pub const fn upper(bound: Bound) -> Self {
        Self {
            lower: None,
            upper: Some(bound),
        }
    }

    pub const fn between(lower: Bound, upper: Bound) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    fn dependencies(&self) -> impl Iterator<Item = NodeId> {
        [self.lower, self.upper].into_iter().flatten().filter_map(|bound| match bound {
            Bound::Node(id) => Some(id),
            Bound::Fixed(_) => None,
        })
    }
}

#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Node {
    base: NodeBase,
    modifiers: Vec<Modifier>,
    bounds: Bounds,
    dependents: Vec<NodeId>,
    cached: Cell<f64>,
    dirty: Cell<bool>,
}

impl Node {
    fn new(base: NodeBase, bounds: Bounds) -> Self {
        Self {
            base,
            modifiers: Vec::new(),
            bounds,
            dependents: Vec::new(),
            cached: Cell::new(0.0),
            dirty: Cell::new(true),
        }
    }

    /// Every node this one reads from, possibly with repeats.
    fn dependencies(&self) -> impl Iterator<Item = NodeId> + '_ {
        let base = match self.base {
            NodeBase::Node(id) => Some(id),
            NodeBase::Scalar(_) => None,
        };
        base.into_iter()
            .chain(self.bounds.dependencies())
            .chain(self.modifiers.iter().flat_map(Modifier::dependencies))
    }
}

/// Arena of lazily evaluated nodes belonging to one combatant.
///
/// Nodes are never removed or copied; handles stay valid for the graph's
/// lifetime. Handles from another graph must not be passed in.
#[derive(Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatGraph {
    nodes: Vec<Node>,
}

impl StatGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    // ===== construction =====

    /// Adds an unbounded node with a constant base.
    pub fn scalar(&mut self, value: f64) -> NodeId {
        self.push(Node::new(NodeBase::Scalar(value), Bounds::NONE))
    }

    /// Adds a node, registering it with every node its base or bounds read.
    pub fn add_node(&mut self, base: NodeBase, bounds: Bounds) -> Result<NodeId, GraphError> {
        let node = Node::new(base, bounds);
        let dependencies: Vec<NodeId> = node.dependencies().collect();
        self.ensure_known(&dependencies)?;

        let id = self.push(node);
        for dependency in dependencies {
            self.link(dependency, id);
        }
        Ok(id)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn ensure_known(&self, ids: &[NodeId]) -> Result<(), GraphError> {
        match ids.iter().find(|id| !self.contains(**id)) {
            Some(id) => Err(GraphError::UnknownNode(*id)),
            None => Ok(()),
        }
    }

    fn link(&mut self, dependency: NodeId, dependent: NodeId) {
        let dependents = &mut self.nodes[dependency.index()].dependents;
        if !dependents.contains(&dependent) {
            dependents.push(dependent);
        }
    }

    /// Drops `dependent` from the dependents of each `candidate` it no longer reads.
    fn unlink_stale(&mut self, dependent: NodeId, candidates: Vec<NodeId>) {
        for candidate in candidates {
            let still_read = self.nodes[dependent.index()]
                .dependencies()
                .any(|id| id == candidate);
            if !still_read {
                self.nodes[candidate.index()]
                    .dependents
                    .retain(|id| *id != dependent);
            }
        }
    }

    /// True if `to` is reachable from `from` by following dependents.
    fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == to {
                return true;
            }
            if core::mem::replace(&mut visited[id.index()], true) {
                continue;
            }
            stack.extend(self.nodes[id.index()].dependents.iter().copied());
        }
        false
    }

    // ===== modifiers =====

    /// Appends a modifier to `target` and invalidates it.
    ///
    /// # Errors
    ///
    /// `UnknownNode` for foreign handles, `Cycle` if any node the modifier
    /// reads already depends on `target`.
    pub fn add_modifier(&mut self, target: NodeId, modifier: Modifier) -> Result<(), GraphError> {
        let dependencies: Vec<NodeId> = modifier.dependencies().collect();
        self.ensure_known(&[target])?;
        self.ensure_known(&dependencies)?;

        if let Some(via) = dependencies.iter().find(|dep| self.reaches(target, **dep)) {
            return Err(GraphError::Cycle { node: target, via: *via });
        }

        for dependency in dependencies {
            self.link(dependency, target);
        }
        self.nodes[target.index()].modifiers.push(modifier);
        self.mark_dirty(target);
        Ok(())
    }

    /// Appends a constant modifier. Constants read no nodes, so this cannot fail.
    pub fn add_scalar_modifier(
        &mut self,
        target: NodeId,
        value: f64,
        kind: ModifierKind,
        source: ModifierSource,
    ) {
        self.nodes[target.index()]
            .modifiers
            .push(Modifier::new(value, kind, source));
        self.mark_dirty(target);
    }

    /// Removes the first modifier equal to `modifier`. Returns whether one was found.
    pub fn remove_modifier(&mut self, target: NodeId, modifier: &Modifier) -> bool {
        let modifiers = &mut self.nodes[target.index()].modifiers;
        let Some(position) = modifiers.iter().position(|m| m == modifier) else {
            return false;
        };
        let removed = modifiers.remove(position);
        self.unlink_stale(target, removed.dependencies().collect());
        self.mark_dirty(target);
        true
    }

    /// Removes every modifier on `target` contributed by `source`.
    ///
    /// Returns how many were dropped; the node is only invalidated if that is
    /// non-zero.
    pub fn remove_all_from_source(&mut self, target: NodeId, source: ModifierSource) -> usize {
        let modifiers = &mut self.nodes[target.index()].modifiers;
        let before = modifiers.len();
        let mut released = Vec::new();
        modifiers.retain(|m| {
            if m.source == source {
                released.extend(m.dependencies());
                false
            } else {
                true
            }
        });
        let removed = before - modifiers.len();

        if removed > 0 {
            self.unlink_stale(target, released);
            self.mark_dirty(target);
        }
        removed
    }

    /// Removes `source` modifiers from every node. Returns how many were dropped.
    pub fn purge_source(&mut self, source: ModifierSource) -> usize {
        (0..self.nodes.len() as u32)
            .map(|raw| self.remove_all_from_source(NodeId(raw), source))
            .sum()
    }

    pub fn modifiers(&self, id: NodeId) -> &[Modifier] {
        &self.nodes[id.index()].modifiers
    }

    pub fn dependents(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].dependents
    }

    pub fn base(&self, id: NodeId) -> NodeBase {
        self.nodes[id.index()].base
    }

    // ===== evaluation =====

    /// Marks `id` and everything downstream of it for recomputation.
    pub fn mark_dirty(&self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let node = &self.nodes[current.index()];
            if node.dirty.replace(true) {
                continue;
            }
            pending.extend(node.dependents.iter().copied());
        }
    }

    /// True if the node, its base, or anything a modifier reads is stale.
    pub fn is_dirty(&self, id: NodeId) -> bool {
        let node = &self.nodes[id.index()];
        node.dirty.get() || node.dependencies().any(|dep| self.is_dirty(dep))
    }

    /// Returns the node's value, recomputing it first if stale.
    pub fn value(&self, id: NodeId) -> f64 {
        let node = &self.nodes[id.index()];
        if node.dirty.get() {
            node.cached.set(self.compute(node));
            node.dirty.set(false);
        }
        node.cached.get()
    }

    fn compute(&self, node: &Node) -> f64 {
        let base = match node.base {
            NodeBase::Scalar(value) => value,
            NodeBase::Node(id) => self.value(id),
        };

        let mut acc = Accumulator::new(base);
        for modifier in &node.modifiers {
            let value = match &modifier.value {
                ModifierValue::Scalar(value) => *value,
                ModifierValue::Node(id) => self.value(*id),
                ModifierValue::Formula(formula) => formula.evaluate(|id| self.value(id)),
            };
            acc.apply(modifier.kind, value);
        }

        let mut value = acc.finish();
        if let Some(lower) = node.bounds.lower {
            value = value.max(self.bound_value(lower));
        }
        if let Some(upper) = node.bounds.upper {
            value = value.min(self.bound_value(upper));
        }
        value
    }

    fn bound_value(&self, bound: Bound) -> f64 {
        match bound {
            Bound::Fixed(value) => value,
            Bound::Node(id) => self.value(id),
        }
    }
}
