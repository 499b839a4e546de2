//! Edges of the attack surface.
//!
//! Edges only matter for OR activation: striking an edge whose source is
//! ACTIVE gives one Bernoulli trial at activating the edge's target. AND
//! nodes are governed by their own node-level probability, so their in-edges
//! carry structure but no activation constants the oracle reads.

use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// Stable edge identifier, `1..=E` for a graph with `E` edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl EdgeId {
    /// Create a new edge ID.
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

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// One directed dependency edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,

    #[serde(rename = "sourceId")]
    pub source: NodeId,

    #[serde(rename = "targetId")]
    pub target: NodeId,

    /// Attacker cost to strike this edge, at most 0.
    #[serde(rename = "aCost")]
    pub a_cost: f64,

    /// Per-edge activation probability (OR targets only).
    #[serde(rename = "actProb")]
    pub act_prob: f64,
}
