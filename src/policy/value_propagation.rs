//! Discounted value propagation over the dependency DAG.
//!
//! Scores every candidate strike by the discounted expected reward it can
//! unlock within the remaining horizon. A 3-D table
//! `r[target][horizon][node]` is filled by a reverse-topological walk:
//! each INACTIVE node pulls value back from its INACTIVE children, paying
//! the child's activation probability and cost on the way. AND children
//! additionally split the pulled value across their still-INACTIVE parents,
//! since all of them must be won before the child can fire.
//!
//! Entries are kept monotone in the horizon: one extra step of lookahead
//! never lowers a node's value.

use crate::game::{AttackCandidates, GameState};
use crate::graph::{DependencyGraph, Node};

/// Exponent applied to an AND child's INACTIVE in-degree when splitting
/// pulled-back value across its parents.
pub const PROPAGATION_PARAM: f64 = 0.5;

/// Collapse rule: take the best `(target, horizon)` entry per node. The sum
/// variant (accumulate strictly positive contributions instead) is kept but
/// disabled.
pub const USE_MAX_ONLY: bool = true;

/// Number of in-edges of `node` whose source is INACTIVE.
fn inactive_in_edge_count(graph: &DependencyGraph, state: &GameState, node: &Node) -> usize {
    graph
        .incoming_edges_of(node.id)
        .filter(|edge| !state.is_enabled(edge.source))
        .count()
}

/// Score every candidate unit (AND nodes first, then OR edges, matching the
/// candidate ordering).
///
/// `cur_time_step` is 1-based; the horizon is the number of steps after the
/// current one, `num_time_step - cur_time_step`.
#[must_use]
pub fn candidate_values(
    graph: &DependencyGraph,
    state: &GameState,
    candidates: &AttackCandidates,
    cur_time_step: u32,
    num_time_step: u32,
    disc_fact: f64,
) -> Vec<f64> {
    let n = graph.node_count();
    let horizon = num_time_step.saturating_sub(cur_time_step) as usize;

    let inactive_targets: Vec<&Node> = graph
        .target_set()
        .iter()
        .map(|&id| graph.node(id).expect("target set comes from the graph"))
        .filter(|node| !state.is_enabled(node.id))
        .collect();

    // r[target][horizon][topo position]
    let mut r = vec![vec![vec![0.0f64; n]; horizon + 1]; inactive_targets.len()];
    for (ti, target) in inactive_targets.iter().enumerate() {
        r[ti][0][target.topo_position] = target.a_reward;
    }

    for k in (0..n).rev() {
        let node_id = graph.topological_order()[k];
        if state.is_enabled(node_id) {
            continue;
        }
        let pos = graph.node(node_id).expect("topo order is complete").topo_position;

        for edge in graph.outgoing_edges_of(node_id) {
            let child = graph.node(edge.target).expect("edge endpoints are validated");
            if state.is_enabled(child.id) {
                continue;
            }
            let child_pos = child.topo_position;

            // Constants of this (node, child) pull, independent of (t, h).
            let (prob, cost, split) = if child.is_or() {
                (edge.act_prob, edge.a_cost, 1.0)
            } else {
                let degree = inactive_in_edge_count(graph, state, child).max(1);
                (
                    child.act_prob,
                    child.a_cost,
                    (degree as f64).powf(PROPAGATION_PARAM),
                )
            };

            for target_row in r.iter_mut() {
                for h in 1..=horizon {
                    let r_hat = (target_row[h - 1][child_pos] * prob + cost) / split;
                    if USE_MAX_ONLY {
                        let entry = &mut target_row[h][pos];
                        *entry = entry.max(disc_fact * r_hat);
                    } else if r_hat > 0.0 {
                        target_row[h][pos] += disc_fact * r_hat;
                    }
                }
            }
        }

        // A longer horizon can only help: carry the best value forward.
        for target_row in r.iter_mut() {
            for h in 1..=horizon {
                let prev = target_row[h - 1][pos];
                let entry = &mut target_row[h][pos];
                *entry = entry.max(prev);
            }
        }
    }

    // Collapse across (target, horizon).
    let mut score = vec![0.0f64; n];
    for target_row in &r {
        for row in target_row {
            for (i, &value) in row.iter().enumerate() {
                if USE_MAX_ONLY {
                    score[i] = score[i].max(value);
                } else {
                    score[i] += value;
                }
            }
        }
    }

    let discount = disc_fact.powi(cur_time_step as i32 - 1);
    let mut values = Vec::with_capacity(candidates.len());
    for &id in &candidates.and_nodes {
        let node = graph.node(id).expect("candidates come from the graph");
        values.push(discount * (node.a_cost + node.act_prob * score[node.topo_position]));
    }
    for &id in &candidates.or_edges {
        let edge = graph.edge(id).expect("candidates come from the graph");
        let target = graph.node(edge.target).expect("edge endpoints are validated");
        values.push(discount * (edge.a_cost + edge.act_prob * score[target.topo_position]));
    }
    values
}

/// Quantal-response choice distribution over candidate values.
///
/// Values are min-max normalized to `[0, 1]` (an all-equal slate maps to
/// zeros, which makes the distribution uniform), then softmaxed with
/// sharpness `qr_param`: 0 is uniform, large values approach greedy.
#[must_use]
pub fn quantal_response(values: &[f64], qr_param: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);

    let normalized: Vec<f64> = if max > min {
        values.iter().map(|v| (v - min) / (max - min)).collect()
    } else {
        vec![0.0; values.len()]
    };

    let weights: Vec<f64> = normalized.iter().map(|v| (qr_param * v).exp()).collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::attack_candidates;
    use crate::graph::test_graphs;
    use crate::graph::{DependencyGraph, NodeId};

    /// Two-node OR chain with node 1 ACTIVE: one edge candidate whose value
    /// is `cost + prob * reward`.
    #[test]
    fn test_single_edge_candidate_value() {
        let graph = test_graphs::or_chain(2);
        let state = GameState::initial(&graph);
        let candidates = attack_candidates(&graph, &state);
        assert_eq!(candidates.len(), 1);

        let values = candidate_values(&graph, &state, &candidates, 1, 2, 1.0);
        // -1 + 0.5 * 10
        assert_eq!(values, vec![4.0]);

        let probs = quantal_response(&values, 0.0);
        assert_eq!(probs, vec![1.0]);
    }

    /// Three-node OR chain, everything INACTIVE, horizon 2: value reaches
    /// the head of the chain through two pulls.
    #[test]
    fn test_chain_propagation_depth_two() {
        let graph = test_graphs::or_chain(3);
        let mut state = GameState::new();
        // Node 1 active so edge (1 -> 2) is a candidate; nodes 2, 3 inactive.
        state.enable(NodeId::new(1));

        let candidates = attack_candidates(&graph, &state);
        assert_eq!(candidates.or_edges.len(), 1);

        let values = candidate_values(&graph, &state, &candidates, 1, 3, 1.0);
        // score(node 2) = 0.5 * 10 - 1 = 4; edge (1 -> 2) = -1 + 0.5 * 4 = 1.
        assert_eq!(values, vec![1.0]);
    }

    /// Monotonicity in the horizon: growing `num_time_step` never lowers a
    /// candidate's score.
    #[test]
    fn test_longer_horizon_never_hurts() {
        let graph = test_graphs::or_chain(4);
        let mut state = GameState::new();
        state.enable(NodeId::new(1));
        let candidates = attack_candidates(&graph, &state);

        let mut last = f64::NEG_INFINITY;
        for num_time_step in 1..8 {
            let values = candidate_values(&graph, &state, &candidates, 1, num_time_step, 1.0);
            assert!(
                values[0] >= last - 1e-12,
                "horizon {num_time_step} lowered the score: {} < {last}",
                values[0]
            );
            last = values[0];
        }
    }

    /// A candidate whose only downstream target is ACTIVE scores pure cost.
    #[test]
    fn test_active_target_leaves_pure_cost() {
        // 1 -> 2 -> 3 (target) plus 1 -> 4 (target). With 3 already ACTIVE,
        // the branch through 2 has nothing left to earn.
        let nodes = vec![
            test_graphs::or_node(1, 0),
            test_graphs::or_node(2, 1),
            test_graphs::as_target(test_graphs::or_node(3, 2), 10.0, -10.0),
            test_graphs::as_target(test_graphs::or_node(4, 3), 10.0, -10.0),
        ];
        let edges = vec![
            test_graphs::or_edge(1, 1, 2),
            test_graphs::or_edge(2, 2, 3),
            test_graphs::or_edge(3, 1, 4),
        ];
        let graph = DependencyGraph::from_parts(nodes, edges, None).unwrap();

        let mut state = GameState::new();
        state.enable(NodeId::new(1));
        state.enable(NodeId::new(3));

        let candidates = attack_candidates(&graph, &state);
        assert_eq!(candidates.or_edges.len(), 2);

        let values = candidate_values(&graph, &state, &candidates, 1, 5, 1.0);
        // Edge (1 -> 2): pure cost. Edge (1 -> 4): cost + prob * reward.
        assert_eq!(values[0], -1.0);
        assert_eq!(values[1], 4.0);
    }

    /// The time-step discount applies to the whole candidate value.
    #[test]
    fn test_cur_time_step_discount() {
        let graph = test_graphs::or_chain(2);
        let state = GameState::initial(&graph);
        let candidates = attack_candidates(&graph, &state);

        let at_step_1 = candidate_values(&graph, &state, &candidates, 1, 3, 0.5);
        let at_step_2 = candidate_values(&graph, &state, &candidates, 2, 3, 0.5);
        assert!((at_step_2[0] - 0.5 * at_step_1[0]).abs() < 1e-12);
    }

    /// AND children split pulled-back value across INACTIVE parents.
    #[test]
    fn test_and_split_penalizes_unwon_parents() {
        // 1 -> {2, 3} -> 4 (AND target, act_prob 0.9, reward 20).
        let graph = test_graphs::diamond();
        let mut state = GameState::new();
        state.enable(NodeId::new(1));

        let candidates = attack_candidates(&graph, &state);
        // AND node 2 and edge (1 -> 3).
        assert_eq!(candidates.and_nodes, vec![NodeId::new(2)]);
        assert_eq!(candidates.or_edges.len(), 1);

        let values = candidate_values(&graph, &state, &candidates, 1, 3, 1.0);

        // Node 4 pulls 20 * 0.9 - 0.5 = 17.5, split by sqrt(2) for its two
        // INACTIVE parents: 12.374...; node 2's own strike then pays
        // -0.5 + 0.8 * 12.374.
        let pulled = (20.0f64 * 0.9 - 0.5) / 2.0f64.sqrt();
        let expected_node2 = -0.5 + 0.8 * pulled;
        assert!((values[0] - expected_node2).abs() < 1e-9);
    }

    #[test]
    fn test_quantal_response_uniform_at_zero() {
        let probs = quantal_response(&[4.0, 1.0, -3.0], 0.0);
        assert_eq!(probs.len(), 3);
        for p in &probs {
            assert!((p - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_quantal_response_sharpens_with_lambda() {
        let probs = quantal_response(&[4.0, 1.0, -3.0], 10.0);
        assert!(probs[0] > 0.95);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_quantal_response_equal_values_are_uniform() {
        let probs = quantal_response(&[2.5, 2.5, 2.5, 2.5], 100.0);
        for p in &probs {
            assert!((p - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_values_cover_all_candidates_in_order() {
        let graph: DependencyGraph = test_graphs::and_or_mix();
        let mut state = GameState::new();
        state.enable(NodeId::new(1));
        state.enable(NodeId::new(2));

        let candidates = attack_candidates(&graph, &state);
        let values = candidate_values(&graph, &state, &candidates, 1, 6, 0.9);
        assert_eq!(values.len(), candidates.len());
        assert!(values.iter().all(|v| v.is_finite()));
    }
}
