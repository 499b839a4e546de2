//! Player actions.
//!
//! An attacker action maps each struck node to the set of edges used: empty
//! for an AND strike (the node itself is attacked), one edge per OR strike.
//! Striking several edges into the same OR node is allowed; each edge is an
//! independent activation attempt. A defender action is just the set of
//! nodes protected this step.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::graph::{EdgeId, NodeId};

/// One attacker move: AND-node strikes and edge-to-OR strikes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttackerAction {
    strikes: FxHashMap<NodeId, SmallVec<[EdgeId; 2]>>,
}

impl AttackerAction {
    /// The empty attack (legal at every state).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether nothing is struck.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }

    /// Strike an AND node directly.
    pub fn add_and_strike(&mut self, node: NodeId) {
        self.strikes.entry(node).or_default();
    }

    /// Strike one in-edge of an OR node.
    pub fn add_or_strike(&mut self, node: NodeId, edge: EdgeId) {
        self.strikes.entry(node).or_default().push(edge);
    }

    /// Struck nodes and the edges used against each (empty slice = AND).
    pub fn strikes(&self) -> impl Iterator<Item = (NodeId, &[EdgeId])> {
        self.strikes.iter().map(|(&node, edges)| (node, edges.as_slice()))
    }

    /// IDs of AND nodes struck directly, ascending.
    #[must_use]
    pub fn attacked_and_node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .strikes
            .iter()
            .filter(|(_, edges)| edges.is_empty())
            .map(|(&node, _)| node)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// IDs of OR nodes with at least one struck in-edge, ascending.
    #[must_use]
    pub fn attacked_or_node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .strikes
            .iter()
            .filter(|(_, edges)| !edges.is_empty())
            .map(|(&node, _)| node)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// IDs of all struck edges, ascending.
    #[must_use]
    pub fn attacked_edge_ids(&self) -> Vec<EdgeId> {
        let mut ids: Vec<EdgeId> = self
            .strikes
            .values()
            .flat_map(|edges| edges.iter().copied())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Total number of strike units (AND nodes plus edges).
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.strikes
            .values()
            .map(|edges| edges.len().max(1))
            .sum()
    }
}

/// One defender move: the set of nodes protected this step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefenderAction {
    nodes: BTreeSet<NodeId>,
}

impl DefenderAction {
    /// The empty defense (protect nothing).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether nothing is protected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node to protect.
    pub fn add(&mut self, node: NodeId) {
        self.nodes.insert(node);
    }

    /// Whether a node is protected by this action.
    #[must_use]
    pub fn protects(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Protected node IDs in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Number of protected nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl FromIterator<NodeId> for DefenderAction {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}
