//! Graph construction, validation, and file-format integration tests.

use attackgraph::graph::{loader, test_graphs};
use attackgraph::{DependencyGraph, GameError, NodeId};

// =============================================================================
// File Format
// =============================================================================

const SMALL_GRAPH_JSON: &str = r#"{
    "nodes": [
        {"id": 1, "topoPosition": 0, "activationType": "OR", "nodeType": "NON_TARGET",
         "state": "ACTIVE", "aReward": 0.0, "dPenalty": 0.0, "aCost": -0.2,
         "dCost": -0.4, "actProb": 1.0, "pActive": 0.9, "pInactive": 0.1},
        {"id": 2, "topoPosition": 1, "activationType": "AND", "nodeType": "NON_TARGET",
         "state": "INACTIVE", "aReward": 0.0, "dPenalty": 0.0, "aCost": -0.3,
         "dCost": -0.5, "actProb": 0.7},
        {"id": 3, "topoPosition": 2, "activationType": "OR", "nodeType": "TARGET",
         "state": "INACTIVE", "aReward": 15.0, "dPenalty": -12.0, "aCost": -0.1,
         "dCost": -0.6, "actProb": 1.0}
    ],
    "edges": [
        {"id": 1, "sourceId": 1, "targetId": 2, "aCost": -0.5, "actProb": 0.8},
        {"id": 2, "sourceId": 2, "targetId": 3, "aCost": -0.4, "actProb": 0.6}
    ]
}"#;

#[test]
fn test_load_small_graph() {
    let graph = loader::from_json(SMALL_GRAPH_JSON).unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.target_set(), &[NodeId::new(3)]);

    let node2 = graph.node(NodeId::new(2)).unwrap();
    assert!(node2.is_and());
    assert_eq!(node2.act_prob, 0.7);
    // Observation rates were absent: perfect observation.
    assert_eq!(node2.p_active, 1.0);
    assert_eq!(node2.p_inactive, 0.0);

    let node1 = graph.node(NodeId::new(1)).unwrap();
    assert_eq!(node1.p_active, 0.9);
    assert!(node1.starts_active());
}

#[test]
fn test_round_trip_preserves_fields_and_order() {
    let graph = loader::from_json(SMALL_GRAPH_JSON).unwrap();
    let json = loader::to_json(&graph).unwrap();
    let again = loader::from_json(&json).unwrap();

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
fn test_load_from_file_path() {
    let path = std::env::temp_dir().join("attackgraph_loader_test.json");
    std::fs::write(&path, SMALL_GRAPH_JSON).unwrap();

    let graph = loader::load_json(&path).unwrap();
    assert_eq!(graph.node_count(), 3);

    std::fs::remove_file(&path).ok();
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_reject_topo_position_against_edges() {
    // Swap the topo positions so the edge runs backwards.
    let json = SMALL_GRAPH_JSON
        .replace("\"id\": 1, \"topoPosition\": 0", "\"id\": 1, \"topoPosition\": 1")
        .replace("\"id\": 2, \"topoPosition\": 1", "\"id\": 2, \"topoPosition\": 0");
    let err = loader::from_json(&json).unwrap_err();
    assert!(matches!(err, GameError::InvalidGraph(_)));
}

#[test]
fn test_reject_non_contiguous_ids() {
    let json = SMALL_GRAPH_JSON.replace("{\"id\": 3,", "{\"id\": 7,");
    assert!(loader::from_json(&json).is_err());
}

#[test]
fn test_reject_or_edge_with_zero_probability() {
    let json = SMALL_GRAPH_JSON.replace(
        "{\"id\": 2, \"sourceId\": 2, \"targetId\": 3, \"aCost\": -0.4, \"actProb\": 0.6}",
        "{\"id\": 2, \"sourceId\": 2, \"targetId\": 3, \"aCost\": -0.4, \"actProb\": 0.0}",
    );
    let err = loader::from_json(&json).unwrap_err();
    assert!(err.to_string().contains("non-positive"));
}

// =============================================================================
// Topological Order
// =============================================================================

#[test]
fn test_topological_order_is_a_permutation() {
    let graph = test_graphs::and_or_mix();
    let order = graph.topological_order();

    assert_eq!(order.len(), graph.node_count());
    let mut seen: Vec<NodeId> = order.to_vec();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), graph.node_count());
}

#[test]
fn test_parents_precede_children() {
    for graph in [
        test_graphs::or_chain(6),
        test_graphs::diamond(),
        test_graphs::and_or_mix(),
    ] {
        for edge in graph.edges() {
            let source_pos = graph.node(edge.source).unwrap().topo_position;
            let target_pos = graph.node(edge.target).unwrap().topo_position;
            assert!(source_pos < target_pos);
        }
    }
}

// =============================================================================
// Min-Cut
// =============================================================================

#[test]
fn test_min_cut_is_subset_of_non_targets() {
    for graph in [
        test_graphs::or_chain(5),
        test_graphs::diamond(),
        test_graphs::and_or_mix(),
    ] {
        for id in graph.min_cut() {
            let node = graph.node(*id).unwrap();
            assert!(!node.is_target(), "min-cut contains target {id}");
        }
    }
}

#[test]
fn test_embedded_min_cut_wins_over_computation() {
    // Splice an explicit cut into the file; the loader must keep it even
    // though the computed cut would differ.
    let json = SMALL_GRAPH_JSON.replacen("\"nodes\"", "\"minCut\": [2],\n    \"nodes\"", 1);
    let reloaded = loader::from_json(&json).unwrap();
    assert_eq!(reloaded.min_cut(), &[NodeId::new(2)]);
}

#[test]
fn test_min_cut_never_empty_for_separable_graphs() {
    let graph: DependencyGraph = test_graphs::diamond();
    assert!(!graph.min_cut().is_empty());
}
