//! The dependency graph: a validated, immutable DAG over nodes and edges.
//!
//! Backed by a `petgraph` directed graph plus stable-id lookup maps. Once
//! built the graph never changes; episodes borrow it and keep their own
//! activation state elsewhere.

use petgraph::algo::{connected_components, is_cyclic_directed};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::{GameError, GameResult};

use super::edge::{Edge, EdgeId};
use super::mincut;
use super::node::{Node, NodeId};

/// Validated attack-surface DAG.
///
/// Node IDs are the contiguous range `1..=N`; topological positions are a
/// permutation of `0..N` consistent with the edges. The vertex min-cut is
/// computed (or accepted from the graph file) at construction and cached.
#[derive(Clone, Debug)]
pub struct DependencyGraph {
    inner: DiGraph<Node, Edge>,
    node_index: FxHashMap<NodeId, NodeIndex>,
    edge_index: FxHashMap<EdgeId, EdgeIndex>,
    /// Node IDs indexed by topological position.
    topo_order: Vec<NodeId>,
    /// Target node IDs, ascending.
    targets: Vec<NodeId>,
    /// Vertex min-cut separating non-targets from targets, ascending.
    min_cut: Vec<NodeId>,
}

impl DependencyGraph {
    /// Build and validate a graph from its parts.
    ///
    /// `min_cut` is honored when a graph file embeds one; otherwise the cut
    /// is computed here so it behaves as an immutable graph attribute.
    pub fn from_parts(
        mut nodes: Vec<Node>,
        mut edges: Vec<Edge>,
        min_cut: Option<Vec<NodeId>>,
    ) -> GameResult<Self> {
        if nodes.is_empty() {
            return Err(GameError::graph("graph has no nodes"));
        }

        nodes.sort_by_key(|n| n.id);
        edges.sort_by_key(|e| e.id);

        // Node IDs must be exactly 1..=N so action spaces can index by ID.
        for (i, node) in nodes.iter().enumerate() {
            let expected = NodeId::new(i as u32 + 1);
            if node.id != expected {
                return Err(GameError::graph(format!(
                    "node IDs must be contiguous from 1; expected {expected}, found {}",
                    node.id
                )));
            }
        }

        let mut seen_edges = FxHashSet::default();
        for edge in &edges {
            if !seen_edges.insert(edge.id) {
                return Err(GameError::graph(format!("duplicate edge ID {}", edge.id)));
            }
        }

        let mut inner = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut node_index = FxHashMap::default();
        let mut edge_index = FxHashMap::default();

        for node in nodes {
            let id = node.id;
            node_index.insert(id, inner.add_node(node));
        }
        for edge in edges {
            let source = *node_index.get(&edge.source).ok_or_else(|| {
                GameError::graph(format!("edge {} has dangling source {}", edge.id, edge.source))
            })?;
            let target = *node_index.get(&edge.target).ok_or_else(|| {
                GameError::graph(format!("edge {} has dangling target {}", edge.id, edge.target))
            })?;
            let id = edge.id;
            edge_index.insert(id, inner.add_edge(source, target, edge));
        }

        let mut graph = Self {
            inner,
            node_index,
            edge_index,
            topo_order: Vec::new(),
            targets: Vec::new(),
            min_cut: Vec::new(),
        };
        graph.validate()?;

        graph.topo_order = {
            let mut order = vec![NodeId::new(0); graph.node_count()];
            for node in graph.nodes() {
                order[node.topo_position] = node.id;
            }
            order
        };
        graph.targets = graph
            .nodes()
            .filter(|n| n.is_target())
            .map(|n| n.id)
            .collect();

        graph.min_cut = match min_cut {
            Some(ids) => {
                let mut ids = ids;
                ids.sort_unstable();
                for id in &ids {
                    if !graph.node_index.contains_key(id) {
                        return Err(GameError::graph(format!(
                            "embedded min-cut references unknown node {id}"
                        )));
                    }
                }
                ids
            }
            None => mincut::vertex_min_cut(&graph),
        };

        log::debug!(
            "built dependency graph: {} nodes, {} edges, {} targets, min-cut size {}",
            graph.node_count(),
            graph.edge_count(),
            graph.targets.len(),
            graph.min_cut.len()
        );
        Ok(graph)
    }

    /// Structural validation: connected DAG, consistent topological
    /// positions, reachable targets, AND in-degrees, OR edge probabilities,
    /// and numeric ranges.
    fn validate(&self) -> GameResult<()> {
        if is_cyclic_directed(&self.inner) {
            return Err(GameError::graph("graph contains a cycle"));
        }
        if connected_components(&self.inner) != 1 {
            return Err(GameError::graph("graph is not connected"));
        }

        let n = self.node_count();
        let mut positions = vec![false; n];
        for node in self.nodes() {
            if node.topo_position >= n {
                return Err(GameError::graph(format!(
                    "node {} has topological position {} outside 0..{n}",
                    node.id, node.topo_position
                )));
            }
            if positions[node.topo_position] {
                return Err(GameError::graph(format!(
                    "duplicate topological position {}",
                    node.topo_position
                )));
            }
            positions[node.topo_position] = true;

            if !(0.0..=1.0).contains(&node.act_prob)
                || !(0.0..=1.0).contains(&node.p_active)
                || !(0.0..=1.0).contains(&node.p_inactive)
            {
                return Err(GameError::graph(format!(
                    "node {} has a probability outside [0, 1]",
                    node.id
                )));
            }
            if node.a_cost > 0.0 || node.d_cost > 0.0 || node.d_penalty > 0.0 {
                return Err(GameError::graph(format!(
                    "node {} has a positive cost or penalty",
                    node.id
                )));
            }
        }

        for edge in self.edges() {
            let source = self.node(edge.source).expect("endpoint checked at build");
            let target = self.node(edge.target).expect("endpoint checked at build");
            if source.topo_position >= target.topo_position {
                return Err(GameError::graph(format!(
                    "edge {} violates topological order ({} -> {})",
                    edge.id, edge.source, edge.target
                )));
            }
            if edge.a_cost > 0.0 {
                return Err(GameError::graph(format!("edge {} has a positive cost", edge.id)));
            }
            if !(0.0..=1.0).contains(&edge.act_prob) {
                return Err(GameError::graph(format!(
                    "edge {} has activation probability outside [0, 1]",
                    edge.id
                )));
            }
            if target.is_or() && edge.act_prob <= 0.0 {
                return Err(GameError::graph(format!(
                    "edge {} into OR node {} has non-positive activation probability",
                    edge.id, edge.target
                )));
            }
        }

        for node in self.nodes() {
            if node.is_and() && self.in_degree(node.id) == 0 {
                return Err(GameError::graph(format!(
                    "AND node {} has no in-edges",
                    node.id
                )));
            }
        }

        // Every target must be reachable from an entry point (a node with
        // no parents or one that starts ACTIVE).
        let mut reachable = FxHashSet::default();
        let mut frontier: Vec<NodeId> = self
            .nodes()
            .filter(|n| self.in_degree(n.id) == 0 || n.starts_active())
            .map(|n| n.id)
            .collect();
        while let Some(id) = frontier.pop() {
            if !reachable.insert(id) {
                continue;
            }
            for edge in self.outgoing_edges_of(id) {
                frontier.push(edge.target);
            }
        }
        for node in self.nodes() {
            if node.is_target() && !reachable.contains(&node.id) {
                return Err(GameError::graph(format!(
                    "target {} is unreachable from every entry point",
                    node.id
                )));
            }
        }

        Ok(())
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Look up a node by ID.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|&idx| &self.inner[idx])
    }

    /// Look up an edge by ID.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_index.get(&id).map(|&idx| &self.inner[idx])
    }

    /// Iterate over nodes in ascending ID order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.inner.node_weights()
    }

    /// Iterate over edges in ascending ID order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.inner.edge_weights()
    }

    /// In-edges of a node.
    pub fn incoming_edges_of(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
        let idx = self.node_index[&id];
        self.inner
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.weight())
    }

    /// Out-edges of a node.
    pub fn outgoing_edges_of(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
        let idx = self.node_index[&id];
        self.inner
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.weight())
    }

    /// Number of in-edges of a node.
    #[must_use]
    pub fn in_degree(&self, id: NodeId) -> usize {
        let idx = self.node_index[&id];
        self.inner.edges_directed(idx, Direction::Incoming).count()
    }

    /// Target node IDs, ascending.
    #[must_use]
    pub fn target_set(&self) -> &[NodeId] {
        &self.targets
    }

    /// The cached vertex min-cut, ascending.
    #[must_use]
    pub fn min_cut(&self) -> &[NodeId] {
        &self.min_cut
    }

    /// Node IDs indexed by topological position.
    ///
    /// Children never precede parents; this is checked at construction.
    #[must_use]
    pub fn topological_order(&self) -> &[NodeId] {
        &self.topo_order
    }

    /// IDs of AND nodes, ascending.
    #[must_use]
    pub fn and_node_ids(&self) -> Vec<NodeId> {
        self.nodes().filter(|n| n.is_and()).map(|n| n.id).collect()
    }

    /// IDs of edges pointing into OR nodes, ascending.
    #[must_use]
    pub fn edge_to_or_node_ids(&self) -> Vec<EdgeId> {
        self.edges()
            .filter(|e| self.node(e.target).map(Node::is_or).unwrap_or(false))
            .map(|e| e.id)
            .collect()
    }

    /// IDs of nodes that start the game ACTIVE.
    pub fn initially_active(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().filter(|n| n.starts_active()).map(|n| n.id)
    }
}
