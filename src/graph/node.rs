//! Nodes of the attack surface.
//!
//! A node carries its activation semantics (AND/OR), whether it is a target,
//! its initial state, and the reward/cost/probability constants the oracle
//! and the payoff accounting read. Field names in the serialized form match
//! the graph file format.

use serde::{Deserialize, Serialize};

/// Stable node identifier, `1..=N` for a graph with `N` nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// How a node activates when attacked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationType {
    /// Activates only when all in-edge sources are ACTIVE and the node
    /// itself is struck; one Bernoulli trial with the node's `act_prob`.
    #[serde(rename = "AND")]
    And,
    /// Activates when any struck in-edge from an ACTIVE source succeeds;
    /// each edge carries its own probability.
    #[serde(rename = "OR")]
    Or,
}

/// Whether activating the node pays the attacker and costs the defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "TARGET")]
    Target,
    #[serde(rename = "NON_TARGET")]
    NonTarget,
}

/// Activation state of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeState {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "INACTIVE")]
    Inactive,
}

fn default_p_active() -> f64 {
    1.0
}

fn default_p_inactive() -> f64 {
    0.0
}

/// One node of the dependency graph.
///
/// The `state` field is the node's *initial* state; per-episode state lives
/// in the engine's `GameState`, the loaded graph is never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    /// Unique position in a topological ordering, `0..N`.
    #[serde(rename = "topoPosition")]
    pub topo_position: usize,

    #[serde(rename = "activationType")]
    pub activation_type: ActivationType,

    #[serde(rename = "nodeType")]
    pub node_type: NodeType,

    pub state: NodeState,

    /// Attacker reward when this target becomes ACTIVE.
    #[serde(rename = "aReward")]
    pub a_reward: f64,

    /// Defender penalty while this target is ACTIVE, at most 0.
    #[serde(rename = "dPenalty")]
    pub d_penalty: f64,

    /// Attacker cost to strike this node (AND activation), at most 0.
    #[serde(rename = "aCost")]
    pub a_cost: f64,

    /// Defender cost to protect this node, at most 0.
    #[serde(rename = "dCost")]
    pub d_cost: f64,

    /// AND activation probability when all parents are ACTIVE.
    #[serde(rename = "actProb")]
    pub act_prob: f64,

    /// Probability the defender observes this node as ACTIVE when it is.
    /// Absent in older graph files, which means perfect observation.
    #[serde(rename = "pActive", default = "default_p_active")]
    pub p_active: f64,

    /// Probability the defender observes this node as ACTIVE when it is not.
    #[serde(rename = "pInactive", default = "default_p_inactive")]
    pub p_inactive: f64,
}

impl Node {
    #[must_use]
    pub fn is_target(&self) -> bool {
        self.node_type == NodeType::Target
    }

    #[must_use]
    pub fn is_and(&self) -> bool {
        self.activation_type == ActivationType::And
    }

    #[must_use]
    pub fn is_or(&self) -> bool {
        self.activation_type == ActivationType::Or
    }

    #[must_use]
    pub fn starts_active(&self) -> bool {
        self.state == NodeState::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_node() -> Node {
        Node {
            id: NodeId::new(4),
            topo_position: 3,
            activation_type: ActivationType::And,
            node_type: NodeType::Target,
            state: NodeState::Inactive,
            a_reward: 10.0,
            d_penalty: -8.0,
            a_cost: -0.5,
            d_cost: -1.0,
            act_prob: 0.8,
            p_active: 0.9,
            p_inactive: 0.05,
        }
    }

    #[test]
    fn test_node_predicates() {
        let node = sample_node();
        assert!(node.is_target());
        assert!(node.is_and());
        assert!(!node.is_or());
        assert!(!node.starts_active());
    }

    #[test]
    fn test_node_json_field_names() {
        let node = sample_node();
        let json = serde_json::to_string(&node).unwrap();

        assert!(json.contains("\"topoPosition\":3"));
        assert!(json.contains("\"activationType\":\"AND\""));
        assert!(json.contains("\"nodeType\":\"TARGET\""));
        assert!(json.contains("\"state\":\"INACTIVE\""));
        assert!(json.contains("\"aReward\":10.0"));

        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }

    #[test]
    fn test_missing_observation_rates_mean_perfect_observation() {
        let json = r#"{
            "id": 1, "topoPosition": 0,
            "activationType": "OR", "nodeType": "NON_TARGET", "state": "ACTIVE",
            "aReward": 0.0, "dPenalty": 0.0, "aCost": 0.0, "dCost": -1.0,
            "actProb": 1.0
        }"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.p_active, 1.0);
        assert_eq!(node.p_inactive, 0.0);
    }
}
