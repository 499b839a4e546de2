//! The stochastic state-transition and observation oracle.
//!
//! Both functions are pure given the RNG: node outcomes are independent
//! Bernoulli trials, evaluated in a single pass over the attacker's strikes
//! against the *pre-step* state. Protection wins every race: a protected
//! node ends the step INACTIVE no matter what.

use std::collections::BTreeSet;

use crate::core::GameRng;
use crate::graph::DependencyGraph;

use super::action::{AttackerAction, DefenderAction};
use super::observation::DefenderObservation;
use super::state::GameState;

/// Apply one joint step: `(state, attack, defense) -> next state`.
///
/// Rules, per node:
/// - protected nodes end the step INACTIVE and are immune to activation;
/// - a struck AND node activates with its `act_prob` iff every parent was
///   ACTIVE before the step;
/// - each struck edge into an OR node is an independent trial with the
///   edge's `act_prob`, counted only if its source was ACTIVE; any success
///   activates the node;
/// - everything already ACTIVE stays ACTIVE unless protected.
#[must_use]
pub fn transition(
    graph: &DependencyGraph,
    state: &GameState,
    attack: &AttackerAction,
    defense: &DefenderAction,
    rng: &mut GameRng,
) -> GameState {
    let mut next = state.clone();

    for (node_id, edges) in attack.strikes() {
        if defense.protects(node_id) || state.is_enabled(node_id) {
            continue;
        }
        let node = match graph.node(node_id) {
            Some(node) => node,
            None => continue,
        };

        if edges.is_empty() {
            // AND strike: one trial gated on all parents being ACTIVE.
            let parents_active = graph
                .incoming_edges_of(node_id)
                .all(|edge| state.is_enabled(edge.source));
            if parents_active && rng.gen_bool(node.act_prob) {
                next.enable(node_id);
                log::trace!("AND strike activated {node_id}");
            }
        } else {
            // OR strikes: independent trial per struck in-edge.
            let mut activated = false;
            for &edge_id in edges {
                let edge = match graph.edge(edge_id) {
                    Some(edge) => edge,
                    None => continue,
                };
                if state.is_enabled(edge.source) && rng.gen_bool(edge.act_prob) {
                    activated = true;
                }
            }
            if activated {
                next.enable(node_id);
                log::trace!("OR strike activated {node_id}");
            }
        }
    }

    // Protection forces INACTIVE this step, including previously ACTIVE nodes.
    for node_id in defense.nodes() {
        next.disable(node_id);
    }

    next
}

/// Sample the defender's noisy observation of `state`.
///
/// Each node reports "observed ACTIVE" with its `p_active` rate when truly
/// ACTIVE and its `p_inactive` rate otherwise.
#[must_use]
pub fn observe_defender(
    graph: &DependencyGraph,
    state: &GameState,
    time_steps_left: u32,
    rng: &mut GameRng,
) -> DefenderObservation {
    let mut observed = BTreeSet::new();
    for node in graph.nodes() {
        let rate = if state.is_enabled(node.id) {
            node.p_active
        } else {
            node.p_inactive
        };
        if rng.gen_bool(rate) {
            observed.insert(node.id);
        }
    }
    DefenderObservation::new(observed, time_steps_left)
}
