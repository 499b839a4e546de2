//! Greedy step-based environment for training an attacker.
//!
//! Mirrors the defender environment's commit logic with the attacker's
//! composite action space: unit actions name AND nodes first (ascending
//! ID), then edges into OR nodes (ascending ID), and the final index
//! passes. Legality of the pending set is judged at commit time against
//! the current state.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::core::GameResult;
use crate::game::{AttackerAction, SimulationEngine, ATTACKER_OBS_LENGTH};
use crate::graph::{DependencyGraph, EdgeId, NodeId};
use crate::policy::{Defender, MixedStrategy};

use super::{GreedyConfig, StepResult};

/// Attacker-side greedy environment.
///
/// Action space: `1..=A` are AND nodes, `A+1..=A+E` are edges to OR nodes,
/// `A+E+1` passes.
pub struct AttackerEnv {
    engine: SimulationEngine,
    opponents: MixedStrategy<Defender>,
    current_opponent: usize,
    config: GreedyConfig,
    /// Pending unit action indices (1-based).
    pending: BTreeSet<usize>,
    done: bool,
}

impl AttackerEnv {
    pub fn new(
        graph: Arc<DependencyGraph>,
        num_time_step: u32,
        disc_fact: f64,
        opponents: MixedStrategy<Defender>,
        config: GreedyConfig,
        seed: u64,
    ) -> GameResult<Self> {
        config.validate()?;
        let engine = SimulationEngine::new(graph, num_time_step, disc_fact, seed)?;
        let mut env = Self {
            engine,
            opponents,
            current_opponent: 0,
            config,
            pending: BTreeSet::new(),
            done: false,
        };
        env.draw_opponent();
        Ok(env)
    }

    fn unit_count(&self) -> usize {
        self.engine.and_node_ids().len() + self.engine.edge_to_or_node_ids().len()
    }

    /// The pass action index for this graph.
    #[must_use]
    pub fn pass_action(&self) -> usize {
        self.unit_count() + 1
    }

    /// Begin a fresh episode and return its first observation.
    pub fn reset(&mut self) -> Vec<f64> {
        self.engine.reset();
        self.pending.clear();
        self.done = false;
        self.draw_opponent();
        self.encode_observation()
    }

    fn draw_opponent(&mut self) {
        let weights: Vec<f64> = self.opponents.entries().iter().map(|(_, w)| *w).collect();
        self.current_opponent = self
            .engine
            .rng_mut()
            .choose_weighted(&weights)
            .expect("mixture weights validated positive");
        log::debug!("attacker env opponent {} drawn", self.current_opponent);
    }

    /// One RL micro-step; see `DefenderEnv::step` for the commit rules.
    ///
    /// # Panics
    ///
    /// Panics when called after `done` without an intervening `reset`.
    pub fn step(&mut self, action: usize) -> StepResult {
        assert!(!self.done, "step after episode end; call reset first");

        let units = self.unit_count();
        let is_pass = action == units + 1;
        let is_unit = (1..=units).contains(&action);
        let in_pending = is_unit && self.pending.contains(&action);

        let commit = is_pass
            || (!self.pending.is_empty() && self.engine.rng_mut().gen_bool(self.config.prob_greedy_selection_cutoff))
            || (in_pending && !self.config.lose_if_repeat);

        if commit {
            return self.commit();
        }

        if !is_unit || (in_pending && self.config.lose_if_repeat) {
            self.done = true;
            let reward = self.engine.worst_remaining_attacker_reward();
            return StepResult {
                observation: self.encode_observation(),
                reward,
                done: true,
            };
        }

        self.pending.insert(action);
        StepResult {
            observation: self.encode_observation(),
            reward: 0.0,
            done: false,
        }
    }

    /// Split the pending unit indices into node and edge IDs.
    fn pending_ids(&self) -> (Vec<NodeId>, Vec<EdgeId>) {
        let and_ids = self.engine.and_node_ids();
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        for &unit in &self.pending {
            if unit <= and_ids.len() {
                nodes.push(and_ids[unit - 1]);
            } else {
                edges.push(self.engine.edge_to_or_node_ids()[unit - 1 - and_ids.len()]);
            }
        }
        (nodes, edges)
    }

    fn commit(&mut self) -> StepResult {
        let (nodes, edges) = self.pending_ids();
        if !self.engine.is_valid_attack_move(&nodes, &edges) {
            self.done = true;
            let reward = self.engine.worst_remaining_attacker_reward();
            return StepResult {
                observation: self.encode_observation(),
                reward,
                done: true,
            };
        }

        let mut attack = AttackerAction::empty();
        for id in nodes {
            attack.add_and_strike(id);
        }
        for id in edges {
            let target = self
                .engine
                .graph()
                .edge(id)
                .expect("unit lists come from the graph")
                .target;
            attack.add_or_strike(target, id);
        }

        let defender = self.opponents.entries()[self.current_opponent].0.clone();
        let graph = Arc::clone(self.engine.graph());
        let defense = defender.sample_action(&graph, self.engine.rng_mut());

        self.engine
            .step(&attack, &defense)
            .expect("pending set validated before commit");
        self.pending.clear();
        self.done = self.engine.is_game_over();

        StepResult {
            observation: self.encode_observation(),
            reward: self.engine.attacker_marginal_payoff(),
            done: self.done,
        }
    }

    /// Dense observation: pending indicators over units, legality
    /// indicators over units, `ATTACKER_OBS_LENGTH` historical ACTIVE
    /// frames (most recent first), then the remaining-step count.
    #[must_use]
    pub fn encode_observation(&self) -> Vec<f64> {
        let obs = self.engine.attacker_observation();
        let and_ids = &obs.and_node_ids;
        let edge_ids = &obs.edge_to_or_node_ids;
        let n = self.engine.graph().node_count();
        let units = and_ids.len() + edge_ids.len();
        let mut out = Vec::with_capacity(2 * units + n * ATTACKER_OBS_LENGTH + 1);

        for unit in 1..=units {
            out.push(if self.pending.contains(&unit) { 1.0 } else { 0.0 });
        }

        for id in and_ids {
            let legal = obs.legal_and_node_ids.binary_search(id).is_ok();
            out.push(if legal { 1.0 } else { 0.0 });
        }
        for id in edge_ids {
            let legal = obs.legal_edge_ids.binary_search(id).is_ok();
            out.push(if legal { 1.0 } else { 0.0 });
        }

        for frame in &obs.active_history {
            let mut indicators = vec![0.0; n];
            for id in frame {
                indicators[(id.raw() - 1) as usize] = 1.0;
            }
            out.extend(indicators);
        }

        out.push(f64::from(obs.time_steps_left));
        out
    }

    /// Length of the observation vector.
    #[must_use]
    pub fn observation_len(&self) -> usize {
        let n = self.engine.graph().node_count();
        2 * self.unit_count() + n * ATTACKER_OBS_LENGTH + 1
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Index into the opponent mixture drawn for the current episode.
    #[must_use]
    pub fn opponent_index(&self) -> usize {
        self.current_opponent
    }

    #[must_use]
    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    /// Human-readable snapshot.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = self.engine.render();
        out.push_str(&format!(
            "pending attack units: {:?}\n",
            self.pending.iter().collect::<Vec<_>>()
        ));
        out
    }
}
