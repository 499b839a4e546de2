//! What each player sees after a step.
//!
//! The defender sees a noisy ACTIVE set: each node reports "observed
//! ACTIVE" with its own true/false-positive rates. The attacker sees its
//! own last strikes, the currently legal strike units, and a bounded
//! history of the true ACTIVE sets.

use std::collections::BTreeSet;

use crate::graph::{EdgeId, NodeId};

/// Number of historical ACTIVE-set frames in an attacker observation.
pub const ATTACKER_OBS_LENGTH: usize = 10;

/// The defender's noisy view of one step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefenderObservation {
    observed_active: BTreeSet<NodeId>,
    time_steps_left: u32,
}

impl DefenderObservation {
    #[must_use]
    pub fn new(observed_active: BTreeSet<NodeId>, time_steps_left: u32) -> Self {
        Self {
            observed_active,
            time_steps_left,
        }
    }

    /// Whether a node was observed ACTIVE this step.
    #[must_use]
    pub fn observed(&self, node: NodeId) -> bool {
        self.observed_active.contains(&node)
    }

    /// Observed-ACTIVE node IDs in ascending order.
    pub fn observed_active(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.observed_active.iter().copied()
    }

    #[must_use]
    pub fn time_steps_left(&self) -> u32 {
        self.time_steps_left
    }
}

/// The attacker's view of one step.
///
/// `active_history` holds the most recent `ATTACKER_OBS_LENGTH` true
/// ACTIVE sets, most recent first, left-padded with empty frames early in
/// the episode. The ascending unit-ID lists are carried along so encoders
/// can index without re-deriving them from the graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttackerObservation {
    pub attacked_and_node_ids: Vec<NodeId>,
    pub attacked_edge_ids: Vec<EdgeId>,
    pub legal_and_node_ids: Vec<NodeId>,
    pub legal_edge_ids: Vec<EdgeId>,
    pub active_history: Vec<Vec<NodeId>>,
    pub time_steps_left: u32,
    pub and_node_ids: Vec<NodeId>,
    pub edge_to_or_node_ids: Vec<EdgeId>,
}

impl AttackerObservation {
    /// Build the bounded history window from the full per-step history:
    /// most recent first, padded with empty frames to the fixed length.
    #[must_use]
    pub fn window_history(full_history: &[Vec<NodeId>]) -> Vec<Vec<NodeId>> {
        let mut frames: Vec<Vec<NodeId>> = full_history
            .iter()
            .rev()
            .take(ATTACKER_OBS_LENGTH)
            .cloned()
            .collect();
        frames.resize(ATTACKER_OBS_LENGTH, Vec::new());
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defender_observation_lookup() {
        let obs = DefenderObservation::new(
            [NodeId::new(2), NodeId::new(5)].into_iter().collect(),
            4,
        );
        assert!(obs.observed(NodeId::new(2)));
        assert!(!obs.observed(NodeId::new(3)));
        assert_eq!(obs.time_steps_left(), 4);
        let ids: Vec<NodeId> = obs.observed_active().collect();
        assert_eq!(ids, vec![NodeId::new(2), NodeId::new(5)]);
    }

    #[test]
    fn test_window_history_pads_left() {
        let full = vec![vec![NodeId::new(1)], vec![NodeId::new(1), NodeId::new(2)]];
        let window = AttackerObservation::window_history(&full);

        assert_eq!(window.len(), ATTACKER_OBS_LENGTH);
        // Most recent first.
        assert_eq!(window[0], vec![NodeId::new(1), NodeId::new(2)]);
        assert_eq!(window[1], vec![NodeId::new(1)]);
        // Remainder is padding.
        assert!(window[2..].iter().all(Vec::is_empty));
    }

    #[test]
    fn test_window_history_truncates_old_frames() {
        let full: Vec<Vec<NodeId>> = (1..=15).map(|i| vec![NodeId::new(i)]).collect();
        let window = AttackerObservation::window_history(&full);

        assert_eq!(window.len(), ATTACKER_OBS_LENGTH);
        assert_eq!(window[0], vec![NodeId::new(15)]);
        assert_eq!(window[9], vec![NodeId::new(6)]);
    }
}
