//! Greedy step-based environment for training a defender.
//!
//! One committed defense is built over several RL micro-steps: each step
//! either adds one node to the pending protection set or commits it (a
//! "pass", a stochastic early-commit draw, or a benign repeat). On commit
//! the opponent attacker is sampled, the oracle advances the game, and the
//! marginal payoff becomes the reward. Illegal micro-actions end the
//! episode at the worst-case remaining reward so a learner is pushed away
//! from them.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::core::GameResult;
use crate::game::{DefenderAction, SimulationEngine};
use crate::graph::{DependencyGraph, NodeId};
use crate::policy::{Attacker, MixedStrategy};

use super::{GreedyConfig, StepResult};

/// Defender-side greedy environment.
///
/// Action space: `1..=N` adds node `i` to the pending set; `N + 1` passes.
pub struct DefenderEnv {
    engine: SimulationEngine,
    opponents: MixedStrategy<Attacker>,
    current_opponent: usize,
    config: GreedyConfig,
    pending: BTreeSet<NodeId>,
    done: bool,
}

impl DefenderEnv {
    pub fn new(
        graph: Arc<DependencyGraph>,
        num_time_step: u32,
        disc_fact: f64,
        opponents: MixedStrategy<Attacker>,
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

    /// The pass action index for this graph.
    #[must_use]
    pub fn pass_action(&self) -> usize {
        self.engine.graph().node_count() + 1
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
        log::debug!("defender env opponent {} drawn", self.current_opponent);
    }

    /// One RL micro-step.
    ///
    /// # Panics
    ///
    /// Panics when called after `done` without an intervening `reset`;
    /// that is a driver bug, not a recoverable move error.
    pub fn step(&mut self, action: usize) -> StepResult {
        assert!(!self.done, "step after episode end; call reset first");

        let n = self.engine.graph().node_count();
        let is_pass = action == n + 1;
        let is_unit = (1..=n).contains(&action);
        let node = NodeId::new(action as u32);
        let in_pending = is_unit && self.pending.contains(&node);

        let commit = is_pass
            || (!self.pending.is_empty() && self.engine.rng_mut().gen_bool(self.config.prob_greedy_selection_cutoff))
            || (in_pending && !self.config.lose_if_repeat);

        if commit {
            return self.commit();
        }

        if !is_unit || (in_pending && self.config.lose_if_repeat) {
            self.done = true;
            let reward = self.engine.worst_remaining_defender_reward();
            return StepResult {
                observation: self.encode_observation(),
                reward,
                done: true,
            };
        }

        self.pending.insert(node);
        StepResult {
            observation: self.encode_observation(),
            reward: 0.0,
            done: false,
        }
    }

    fn commit(&mut self) -> StepResult {
        if !self.engine.is_valid_defense_move(self.pending.iter()) {
            self.done = true;
            let reward = self.engine.worst_remaining_defender_reward();
            return StepResult {
                observation: self.encode_observation(),
                reward,
                done: true,
            };
        }

        let attacker = self.opponents.entries()[self.current_opponent].0.clone();
        let graph = Arc::clone(self.engine.graph());
        let state = self.engine.game_state().clone();
        let cur = self.engine.cur_time_step();
        let total = self.engine.num_time_step();
        let attack = attacker.sample_action(&graph, &state, cur, total, self.engine.rng_mut());

        let defense: DefenderAction = self.pending.iter().copied().collect();
        self.engine
            .step(&attack, &defense)
            .expect("pending set validated before commit");
        self.pending.clear();
        self.done = self.engine.is_game_over();

        StepResult {
            observation: self.encode_observation(),
            reward: self.engine.defender_marginal_payoff(),
            done: self.done,
        }
    }

    /// Dense observation: four blocks of `N` entries — observed-ACTIVE
    /// indicators, protected-last-step indicators, pending indicators, and
    /// copies of the remaining-step count.
    #[must_use]
    pub fn encode_observation(&self) -> Vec<f64> {
        let n = self.engine.graph().node_count();
        let mut out = Vec::with_capacity(4 * n);

        let obs = self.engine.defender_observation();
        for i in 1..=n {
            out.push(if obs.observed(NodeId::new(i as u32)) { 1.0 } else { 0.0 });
        }

        let last = self.engine.last_defense();
        for i in 1..=n {
            let protected = last
                .map(|d| d.protects(NodeId::new(i as u32)))
                .unwrap_or(false);
            out.push(if protected { 1.0 } else { 0.0 });
        }

        for i in 1..=n {
            out.push(if self.pending.contains(&NodeId::new(i as u32)) { 1.0 } else { 0.0 });
        }

        let left = f64::from(self.engine.time_steps_left());
        out.extend(std::iter::repeat(left).take(n));
        out
    }

    /// Length of the observation vector.
    #[must_use]
    pub fn observation_len(&self) -> usize {
        4 * self.engine.graph().node_count()
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
            "pending defense: {:?}\n",
            self.pending.iter().map(|id| id.raw()).collect::<Vec<_>>()
        ));
        out
    }
}
