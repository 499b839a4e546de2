//! The attack-surface dependency graph: nodes, edges, validation, min-cut,
//! and the JSON file format.

pub mod edge;
#[allow(clippy::module_inception)]
pub mod graph;
pub mod loader;
pub mod mincut;
pub mod node;
pub mod test_graphs;

pub use edge::{Edge, EdgeId};
pub use graph::DependencyGraph;
pub use node::{ActivationType, Node, NodeId, NodeState, NodeType};
