//! Legal one-unit attack moves at a given state.
//!
//! For every INACTIVE node: an AND node with all parents ACTIVE is a node
//! candidate; every in-edge of an OR node whose source is ACTIVE is an edge
//! candidate. Once all targets are ACTIVE there is nothing left worth
//! attacking and the candidate set is empty by definition.

use crate::graph::{DependencyGraph, EdgeId, NodeId};

use super::state::GameState;

/// The legal strike units for the attacker, ascending within each kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttackCandidates {
    pub and_nodes: Vec<NodeId>,
    pub or_edges: Vec<EdgeId>,
}

impl AttackCandidates {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.and_nodes.is_empty() && self.or_edges.is_empty()
    }

    /// Total number of candidate units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.and_nodes.len() + self.or_edges.len()
    }
}

/// Whether an AND node can be struck: INACTIVE with every parent ACTIVE.
#[must_use]
pub fn is_attackable_and_node(graph: &DependencyGraph, state: &GameState, id: NodeId) -> bool {
    match graph.node(id) {
        Some(node) if node.is_and() && !state.is_enabled(id) => graph
            .incoming_edges_of(id)
            .all(|edge| state.is_enabled(edge.source)),
        _ => false,
    }
}

/// Whether an edge into an OR node can be struck: source ACTIVE, target
/// INACTIVE.
#[must_use]
pub fn is_attackable_or_edge(graph: &DependencyGraph, state: &GameState, id: EdgeId) -> bool {
    match graph.edge(id) {
        Some(edge) => {
            graph.node(edge.target).map(|n| n.is_or()).unwrap_or(false)
                && state.is_enabled(edge.source)
                && !state.is_enabled(edge.target)
        }
        None => false,
    }
}

/// Enumerate the legal attack set at `state`.
#[must_use]
pub fn attack_candidates(graph: &DependencyGraph, state: &GameState) -> AttackCandidates {
    // All targets ACTIVE: the attacker is done.
    if graph.target_set().iter().all(|&t| state.is_enabled(t)) {
        return AttackCandidates::default();
    }

    let mut candidates = AttackCandidates::default();
    for node in graph.nodes() {
        if state.is_enabled(node.id) {
            continue;
        }
        if node.is_and() {
            if graph
                .incoming_edges_of(node.id)
                .all(|edge| state.is_enabled(edge.source))
            {
                candidates.and_nodes.push(node.id);
            }
        } else {
            for edge in graph.incoming_edges_of(node.id) {
                if state.is_enabled(edge.source) {
                    candidates.or_edges.push(edge.id);
                }
            }
        }
    }
    candidates.and_nodes.sort_unstable();
    candidates.or_edges.sort_unstable();
    candidates
}
