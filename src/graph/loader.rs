//! Graph file serialization.
//!
//! The on-disk format is a JSON object with `nodes` and `edges` lists and
//! an optional embedded `minCut` (node IDs). Graphs missing the cut get it
//! computed at load time; either way the loaded value is immutable.

use serde::{Deserialize, Serialize};

use crate::core::{GameError, GameResult};

use super::edge::Edge;
use super::graph::DependencyGraph;
use super::node::{Node, NodeId};

#[derive(Serialize, Deserialize)]
struct GraphFile {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(rename = "minCut", default, skip_serializing_if = "Option::is_none")]
    min_cut: Option<Vec<u32>>,
}

/// Parse and validate a graph from its JSON text.
pub fn from_json(text: &str) -> GameResult<DependencyGraph> {
    let file: GraphFile = serde_json::from_str(text)
        .map_err(|e| GameError::graph(format!("malformed graph file: {e}")))?;
    let min_cut = file
        .min_cut
        .map(|ids| ids.into_iter().map(NodeId::new).collect());
    DependencyGraph::from_parts(file.nodes, file.edges, min_cut)
}

/// Serialize a graph back to its JSON file form, embedding the min-cut.
pub fn to_json(graph: &DependencyGraph) -> GameResult<String> {
    let file = GraphFile {
        nodes: graph.nodes().cloned().collect(),
        edges: graph.edges().cloned().collect(),
        min_cut: Some(graph.min_cut().iter().map(|id| id.raw()).collect()),
    };
    serde_json::to_string_pretty(&file)
        .map_err(|e| GameError::state(format!("graph serialization failed: {e}")))
}

/// Load a graph from a file path.
pub fn load_json(path: impl AsRef<std::path::Path>) -> GameResult<DependencyGraph> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| GameError::graph(format!("cannot read {}: {e}", path.display())))?;
    log::debug!("loading dependency graph from {}", path.display());
    from_json(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_graphs;

    #[test]
    fn test_round_trip_preserves_everything() {
        let graph = test_graphs::and_or_mix();
        let json = to_json(&graph).unwrap();
        let again = from_json(&json).unwrap();

        assert_eq!(graph.node_count(), again.node_count());
        assert_eq!(graph.edge_count(), again.edge_count());
        assert_eq!(graph.topological_order(), again.topological_order());
        assert_eq!(graph.min_cut(), again.min_cut());
        for (a, b) in graph.nodes().zip(again.nodes()) {
            assert_eq!(a, b);
        }
        for (a, b) in graph.edges().zip(again.edges()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_embedded_min_cut_survives_round_trip() {
        let json = to_json(&test_graphs::diamond()).unwrap();
        // The diamond's computed cut is node 1; a reload must not recompute
        // a different one.
        let again = from_json(&json).unwrap();
        assert_eq!(again.min_cut(), &[NodeId::new(1)]);
    }

    #[test]
    fn test_malformed_json_is_invalid_graph() {
        let err = from_json("{ not json").unwrap_err();
        assert!(matches!(err, GameError::InvalidGraph(_)));
    }
}
