//! Attacker policies.
//!
//! A closed set of variants behind one dispatch method, built from string
//! descriptors by the factory in `descriptor`.

use crate::core::{GameError, GameRng, GameResult};
use crate::game::{attack_candidates, AttackCandidates, AttackerAction, GameState};
use crate::graph::DependencyGraph;

use super::select_count;
use super::value_propagation::{candidate_values, quantal_response};

/// Uniform random attacker: `k` distinct candidate units, chosen uniformly.
#[derive(Clone, Debug, PartialEq)]
pub struct UniformAttacker {
    min_num: usize,
    max_num: usize,
    ratio: f64,
}

impl UniformAttacker {
    pub fn new(min_num: usize, max_num: usize, ratio: f64) -> GameResult<Self> {
        validate_selection(min_num, max_num, ratio)?;
        Ok(Self {
            min_num,
            max_num,
            ratio,
        })
    }

    fn sample(
        &self,
        graph: &DependencyGraph,
        state: &GameState,
        rng: &mut GameRng,
    ) -> AttackerAction {
        let candidates = attack_candidates(graph, state);
        if candidates.is_empty() {
            return AttackerAction::empty();
        }
        let k = select_count(candidates.len(), self.min_num, self.max_num, self.ratio, 0.0);
        let picked = rng.sample_distinct_uniform(k, candidates.len());
        action_from_units(graph, &candidates, &picked)
    }
}

/// Value-propagation attacker: scores candidates by discounted expected
/// reward, then draws from a quantal-response distribution.
#[derive(Clone, Debug, PartialEq)]
pub struct ValuePropagationAttacker {
    min_num: usize,
    max_num: usize,
    ratio: f64,
    qr_param: f64,
    disc_fact: f64,
    num_cand_stdev: f64,
}

impl ValuePropagationAttacker {
    pub fn new(
        min_num: usize,
        max_num: usize,
        ratio: f64,
        qr_param: f64,
        disc_fact: f64,
        num_cand_stdev: f64,
    ) -> GameResult<Self> {
        validate_selection(min_num, max_num, ratio)?;
        if qr_param < 0.0 || !qr_param.is_finite() {
            return Err(GameError::config(format!(
                "qrParam must be non-negative, got {qr_param}"
            )));
        }
        if !(disc_fact > 0.0 && disc_fact <= 1.0) {
            return Err(GameError::config(format!(
                "discFact must be in (0, 1], got {disc_fact}"
            )));
        }
        if num_cand_stdev < 0.0 || !num_cand_stdev.is_finite() {
            return Err(GameError::config(format!(
                "stdev must be non-negative, got {num_cand_stdev}"
            )));
        }
        Ok(Self {
            min_num,
            max_num,
            ratio,
            qr_param,
            disc_fact,
            num_cand_stdev,
        })
    }

    fn sample(
        &self,
        graph: &DependencyGraph,
        state: &GameState,
        cur_time_step: u32,
        num_time_step: u32,
        rng: &mut GameRng,
    ) -> AttackerAction {
        let candidates = attack_candidates(graph, state);
        if candidates.is_empty() {
            return AttackerAction::empty();
        }

        let values = candidate_values(
            graph,
            state,
            &candidates,
            cur_time_step,
            num_time_step,
            self.disc_fact,
        );
        let probs = quantal_response(&values, self.qr_param);

        let noise = rng.sample_normal(0.0, self.num_cand_stdev);
        let k = select_count(
            candidates.len(),
            self.min_num,
            self.max_num,
            self.ratio,
            noise,
        );
        let picked = rng.sample_distinct_weighted(k, &probs);
        action_from_units(graph, &candidates, &picked)
    }
}

/// The attacker policy space.
#[derive(Clone, Debug, PartialEq)]
pub enum Attacker {
    Uniform(UniformAttacker),
    ValuePropagation(ValuePropagationAttacker),
}

impl Attacker {
    /// Draw one attack for the current state.
    pub fn sample_action(
        &self,
        graph: &DependencyGraph,
        state: &GameState,
        cur_time_step: u32,
        num_time_step: u32,
        rng: &mut GameRng,
    ) -> AttackerAction {
        match self {
            Attacker::Uniform(policy) => policy.sample(graph, state, rng),
            Attacker::ValuePropagation(policy) => {
                policy.sample(graph, state, cur_time_step, num_time_step, rng)
            }
        }
    }
}

/// Translate picked candidate indices (AND nodes first, then OR edges)
/// into an action.
fn action_from_units(
    graph: &DependencyGraph,
    candidates: &AttackCandidates,
    picked: &[usize],
) -> AttackerAction {
    let mut action = AttackerAction::empty();
    for &unit in picked {
        if unit < candidates.and_nodes.len() {
            action.add_and_strike(candidates.and_nodes[unit]);
        } else {
            let edge_id = candidates.or_edges[unit - candidates.and_nodes.len()];
            let edge = graph.edge(edge_id).expect("candidates come from the graph");
            action.add_or_strike(edge.target, edge_id);
        }
    }
    action
}

fn validate_selection(min_num: usize, max_num: usize, ratio: f64) -> GameResult<()> {
    if min_num > max_num {
        return Err(GameError::config(format!(
            "minNum {min_num} exceeds maxNum {max_num}"
        )));
    }
    if !(0.0..=1.0).contains(&ratio) {
        return Err(GameError::config(format!(
            "ratio must be in [0, 1], got {ratio}"
        )));
    }
    Ok(())
}
