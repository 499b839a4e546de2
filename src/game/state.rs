//! Per-episode activation state.
//!
//! A `GameState` is just the set of currently ACTIVE nodes. It uses an `im`
//! persistent set so the engine can keep one snapshot per committed step
//! without copying the whole set each time, and it exposes a content hash
//! that is stable for equal ACTIVE sets regardless of insertion order.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use im::HashSet as ImHashSet;

use crate::graph::{DependencyGraph, NodeId};

/// The set of ACTIVE nodes at one point in an episode.
#[derive(Clone, Debug, Default)]
pub struct GameState {
    enabled: ImHashSet<NodeId>,
}

impl GameState {
    /// An empty state (nothing ACTIVE).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The episode-start state: exactly the graph's initially ACTIVE nodes.
    #[must_use]
    pub fn initial(graph: &DependencyGraph) -> Self {
        let mut state = Self::new();
        for id in graph.initially_active() {
            state.enable(id);
        }
        state
    }

    /// Mark a node ACTIVE.
    pub fn enable(&mut self, id: NodeId) {
        self.enabled.insert(id);
    }

    /// Mark a node INACTIVE.
    pub fn disable(&mut self, id: NodeId) {
        self.enabled.remove(&id);
    }

    /// Whether a node is ACTIVE.
    #[must_use]
    pub fn is_enabled(&self, id: NodeId) -> bool {
        self.enabled.contains(&id)
    }

    /// Number of ACTIVE nodes.
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.enabled.len()
    }

    /// Iterate over the ACTIVE set (unspecified order).
    pub fn enabled(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.enabled.iter().copied()
    }

    /// ACTIVE node IDs in ascending order.
    #[must_use]
    pub fn enabled_sorted(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.enabled().collect();
        ids.sort_unstable();
        ids
    }

    /// Order-independent content hash; equal ACTIVE sets hash equally.
    #[must_use]
    pub fn identity(&self) -> u64 {
        let mut acc: u64 = 0;
        for id in self.enabled() {
            let mut hasher = DefaultHasher::new();
            id.hash(&mut hasher);
            acc = acc.wrapping_add(hasher.finish());
        }
        acc
    }
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.enabled == other.enabled
    }
}

impl Eq for GameState {}
