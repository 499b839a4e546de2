//! Canned graphs shared by the unit and integration test suites.
//!
//! Kept in the library (rather than duplicated per test crate) so the
//! integration tests and benches can build the same fixtures.

use super::edge::{Edge, EdgeId};
use super::graph::DependencyGraph;
use super::node::{ActivationType, Node, NodeId, NodeState, NodeType};

/// A non-target OR node with neutral constants.
#[must_use]
pub fn or_node(id: u32, topo: usize) -> Node {
    Node {
        id: NodeId::new(id),
        topo_position: topo,
        activation_type: ActivationType::Or,
        node_type: NodeType::NonTarget,
        state: NodeState::Inactive,
        a_reward: 0.0,
        d_penalty: 0.0,
        a_cost: -0.5,
        d_cost: -1.0,
        act_prob: 1.0,
        p_active: 1.0,
        p_inactive: 0.0,
    }
}

/// A non-target AND node with neutral constants.
#[must_use]
pub fn and_node(id: u32, topo: usize, act_prob: f64) -> Node {
    Node {
        activation_type: ActivationType::And,
        act_prob,
        ..or_node(id, topo)
    }
}

/// Mark a node as a target worth `reward` to the attacker.
#[must_use]
pub fn as_target(mut node: Node, reward: f64, penalty: f64) -> Node {
    node.node_type = NodeType::Target;
    node.a_reward = reward;
    node.d_penalty = penalty;
    node
}

/// An OR-activation edge with the test-suite default constants.
#[must_use]
pub fn or_edge(id: u32, source: u32, target: u32) -> Edge {
    Edge {
        id: EdgeId::new(id),
        source: NodeId::new(source),
        target: NodeId::new(target),
        a_cost: -1.0,
        act_prob: 0.5,
    }
}

/// Nodes of an OR chain `1 -> 2 -> ... -> n`; the last node is the target.
#[must_use]
pub fn or_chain_nodes(n: u32) -> Vec<Node> {
    (1..=n)
        .map(|id| {
            let node = or_node(id, (id - 1) as usize);
            if id == n {
                as_target(node, 10.0, -10.0)
            } else if id == 1 {
                Node {
                    state: NodeState::Active,
                    ..node
                }
            } else {
                node
            }
        })
        .collect()
}

/// An OR chain `1 -> 2 -> ... -> n` with edge `act_prob = 0.5`,
/// `a_cost = -1`. Node 1 starts ACTIVE; node `n` is the target.
#[must_use]
pub fn or_chain(n: u32) -> DependencyGraph {
    let nodes = or_chain_nodes(n);
    let edges = (1..n).map(|i| or_edge(i, i, i + 1)).collect();
    DependencyGraph::from_parts(nodes, edges, None).expect("chain fixture is valid")
}

/// A diamond: `1 -> {2, 3} -> 4`, with 2 an AND node, 3 an OR node, and 4
/// an AND target. Node 1 starts ACTIVE.
#[must_use]
pub fn diamond() -> DependencyGraph {
    let nodes = vec![
        Node {
            state: NodeState::Active,
            ..or_node(1, 0)
        },
        and_node(2, 1, 0.8),
        or_node(3, 2),
        as_target(and_node(4, 3, 0.9), 20.0, -15.0),
    ];
    let edges = vec![
        or_edge(1, 1, 2),
        or_edge(2, 1, 3),
        or_edge(3, 2, 4),
        or_edge(4, 3, 4),
    ];
    DependencyGraph::from_parts(nodes, edges, None).expect("diamond fixture is valid")
}

/// A five-node mix exercising both activation types:
/// `1 -> {2 (AND), 3 (OR)}`, `2 -> 4 (OR)`, `3 -> 5 (AND)`, `4 -> 5`.
/// Node 5 is the target; node 1 starts ACTIVE.
#[must_use]
pub fn and_or_mix() -> DependencyGraph {
    let nodes = vec![
        Node {
            state: NodeState::Active,
            ..or_node(1, 0)
        },
        and_node(2, 1, 0.7),
        or_node(3, 2),
        or_node(4, 3),
        as_target(and_node(5, 4, 0.6), 12.0, -9.0),
    ];
    let edges = vec![
        or_edge(1, 1, 2),
        or_edge(2, 1, 3),
        or_edge(3, 2, 4),
        or_edge(4, 3, 5),
        or_edge(5, 4, 5),
    ];
    DependencyGraph::from_parts(nodes, edges, None).expect("mix fixture is valid")
}
