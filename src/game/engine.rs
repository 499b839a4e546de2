//! The turn engine: state, clock, payoff accounting, histories.
//!
//! One engine runs one episode at a time over a shared immutable graph.
//! `reset` rewinds everything; `step` consumes one joint action pair,
//! advances the clock, and accrues discounted payoffs for both players.
//! The engine owns the episode RNG, so a seed pins the whole trajectory.

use std::sync::Arc;

use crate::core::{GameError, GameRng, GameResult};
use crate::graph::{DependencyGraph, EdgeId, NodeId};

use super::action::{AttackerAction, DefenderAction};
use super::candidates::{self, attack_candidates};
use super::observation::{AttackerObservation, DefenderObservation};
use super::oracle;
use super::state::GameState;

/// Turn-based episode driver over a dependency graph.
pub struct SimulationEngine {
    graph: Arc<DependencyGraph>,
    num_time_step: u32,
    disc_fact: f64,
    rng: GameRng,

    game_state: GameState,
    time_steps_left: u32,

    attacker_total_payoff: f64,
    attacker_marginal_payoff: f64,
    defender_total_payoff: f64,
    defender_marginal_payoff: f64,

    defender_obs_history: Vec<DefenderObservation>,
    /// True ACTIVE set after each point in the episode (index 0 = initial).
    active_history: Vec<Vec<NodeId>>,
    attack_history: Vec<AttackerAction>,
    defense_history: Vec<DefenderAction>,

    /// Ascending AND-node IDs, cached from the graph.
    and_node_ids: Vec<NodeId>,
    /// Ascending edge-to-OR IDs, cached from the graph.
    edge_to_or_node_ids: Vec<EdgeId>,

    /// Worst possible single-step payoffs, used for illegal-move penalties.
    worst_attacker_step: f64,
    worst_defender_step: f64,
}

impl SimulationEngine {
    /// Create an engine for `num_time_step` steps with discount `disc_fact`.
    pub fn new(
        graph: Arc<DependencyGraph>,
        num_time_step: u32,
        disc_fact: f64,
        seed: u64,
    ) -> GameResult<Self> {
        if num_time_step == 0 {
            return Err(GameError::config("numTimeStep must be at least 1"));
        }
        if !(disc_fact > 0.0 && disc_fact <= 1.0) {
            return Err(GameError::config(format!(
                "discFact must be in (0, 1], got {disc_fact}"
            )));
        }

        let and_node_ids = graph.and_node_ids();
        let edge_to_or_node_ids = graph.edge_to_or_node_ids();

        let worst_attacker_step = graph.nodes().map(|n| n.a_cost).sum::<f64>()
            + graph.edges().map(|e| e.a_cost).sum::<f64>();
        let worst_defender_step = graph
            .nodes()
            .map(|n| n.d_penalty.min(n.d_cost))
            .sum::<f64>();

        let mut engine = Self {
            graph,
            num_time_step,
            disc_fact,
            rng: GameRng::new(seed),
            game_state: GameState::new(),
            time_steps_left: num_time_step,
            attacker_total_payoff: 0.0,
            attacker_marginal_payoff: 0.0,
            defender_total_payoff: 0.0,
            defender_marginal_payoff: 0.0,
            defender_obs_history: Vec::new(),
            active_history: Vec::new(),
            attack_history: Vec::new(),
            defense_history: Vec::new(),
            and_node_ids,
            edge_to_or_node_ids,
            worst_attacker_step,
            worst_defender_step,
        };
        engine.reset();
        Ok(engine)
    }

    /// Rewind to the start of a fresh episode.
    ///
    /// The RNG is *not* reseeded: consecutive episodes continue the stream,
    /// so an engine seed pins a whole sequence of episodes.
    pub fn reset(&mut self) {
        self.game_state = GameState::initial(&self.graph);
        self.time_steps_left = self.num_time_step;
        self.attacker_total_payoff = 0.0;
        self.attacker_marginal_payoff = 0.0;
        self.defender_total_payoff = 0.0;
        self.defender_marginal_payoff = 0.0;
        self.attack_history.clear();
        self.defense_history.clear();
        self.active_history.clear();
        self.active_history.push(self.game_state.enabled_sorted());
        self.defender_obs_history.clear();
        let obs = oracle::observe_defender(
            &self.graph,
            &self.game_state,
            self.time_steps_left,
            &mut self.rng,
        );
        self.defender_obs_history.push(obs);
        log::debug!(
            "episode reset: {} steps, {} initially active",
            self.num_time_step,
            self.game_state.enabled_count()
        );
    }

    /// Commit one joint step.
    ///
    /// Fails with `InvalidMove` if the episode is over or an action
    /// references a nonexistent or wrongly-typed node or edge; the state is
    /// untouched in that case.
    pub fn step(&mut self, attack: &AttackerAction, defense: &DefenderAction) -> GameResult<()> {
        if self.is_game_over() {
            return Err(GameError::invalid_move("episode is over; call reset"));
        }
        self.validate_attack(attack)?;
        self.validate_defense(defense)?;

        let t = (self.num_time_step - self.time_steps_left) as i32;
        let discount = self.disc_fact.powi(t);

        let next = oracle::transition(&self.graph, &self.game_state, attack, defense, &mut self.rng);

        let mut defender_step = 0.0;
        let mut attacker_step = 0.0;
        for node in self.graph.nodes() {
            if node.is_target() && next.is_enabled(node.id) {
                defender_step += node.d_penalty;
                attacker_step += node.a_reward;
            }
        }
        for id in defense.nodes() {
            defender_step += self.graph.node(id).expect("validated above").d_cost;
        }
        for id in attack.attacked_and_node_ids() {
            attacker_step += self.graph.node(id).expect("validated above").a_cost;
        }
        for id in attack.attacked_edge_ids() {
            attacker_step += self.graph.edge(id).expect("validated above").a_cost;
        }

        self.defender_marginal_payoff = discount * defender_step;
        self.attacker_marginal_payoff = discount * attacker_step;
        self.defender_total_payoff += self.defender_marginal_payoff;
        self.attacker_total_payoff += self.attacker_marginal_payoff;

        self.attack_history.push(attack.clone());
        self.defense_history.push(defense.clone());
        self.game_state = next;
        self.active_history.push(self.game_state.enabled_sorted());
        self.time_steps_left -= 1;

        let obs = oracle::observe_defender(
            &self.graph,
            &self.game_state,
            self.time_steps_left,
            &mut self.rng,
        );
        self.defender_obs_history.push(obs);

        log::debug!(
            "step {}: {} active, attacker {:+.3}, defender {:+.3}",
            t + 1,
            self.game_state.enabled_count(),
            self.attacker_marginal_payoff,
            self.defender_marginal_payoff,
        );
        Ok(())
    }

    fn validate_attack(&self, attack: &AttackerAction) -> GameResult<()> {
        for (node_id, edges) in attack.strikes() {
            let node = self
                .graph
                .node(node_id)
                .ok_or_else(|| GameError::invalid_move(format!("unknown node {node_id}")))?;
            if edges.is_empty() {
                if !node.is_and() {
                    return Err(GameError::invalid_move(format!(
                        "node strike on non-AND node {node_id}"
                    )));
                }
            } else {
                for &edge_id in edges {
                    let edge = self.graph.edge(edge_id).ok_or_else(|| {
                        GameError::invalid_move(format!("unknown edge {edge_id}"))
                    })?;
                    if edge.target != node_id {
                        return Err(GameError::invalid_move(format!(
                            "edge {edge_id} does not point at {node_id}"
                        )));
                    }
                    if !node.is_or() {
                        return Err(GameError::invalid_move(format!(
                            "edge strike on non-OR node {node_id}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_defense(&self, defense: &DefenderAction) -> GameResult<()> {
        for id in defense.nodes() {
            if self.graph.node(id).is_none() {
                return Err(GameError::invalid_move(format!("unknown node {id}")));
            }
        }
        Ok(())
    }

    // === Clock and payoffs ===

    /// Whether the episode has used all its steps.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.time_steps_left == 0
    }

    #[must_use]
    pub fn time_steps_left(&self) -> u32 {
        self.time_steps_left
    }

    /// 1-based index of the step about to be played.
    #[must_use]
    pub fn cur_time_step(&self) -> u32 {
        self.num_time_step - self.time_steps_left + 1
    }

    #[must_use]
    pub fn num_time_step(&self) -> u32 {
        self.num_time_step
    }

    #[must_use]
    pub fn disc_fact(&self) -> f64 {
        self.disc_fact
    }

    #[must_use]
    pub fn attacker_total_payoff(&self) -> f64 {
        self.attacker_total_payoff
    }

    #[must_use]
    pub fn attacker_marginal_payoff(&self) -> f64 {
        self.attacker_marginal_payoff
    }

    #[must_use]
    pub fn defender_total_payoff(&self) -> f64 {
        self.defender_total_payoff
    }

    #[must_use]
    pub fn defender_marginal_payoff(&self) -> f64 {
        self.defender_marginal_payoff
    }

    /// Discounted sum of the worst possible attacker step payoff over the
    /// remaining steps. Used to penalize illegal moves in the RL wrappers.
    #[must_use]
    pub fn worst_remaining_attacker_reward(&self) -> f64 {
        self.worst_attacker_step * self.remaining_discount_mass()
    }

    /// Defender counterpart of `worst_remaining_attacker_reward`.
    #[must_use]
    pub fn worst_remaining_defender_reward(&self) -> f64 {
        self.worst_defender_step * self.remaining_discount_mass()
    }

    fn remaining_discount_mass(&self) -> f64 {
        let from = (self.num_time_step - self.time_steps_left) as i32;
        let to = self.num_time_step as i32;
        (from..to).map(|tau| self.disc_fact.powi(tau)).sum()
    }

    // === Validity predicates ===

    /// Whether `id` names a node of the graph.
    #[must_use]
    pub fn is_valid_id(&self, id: NodeId) -> bool {
        self.graph.node(id).is_some()
    }

    /// Whether `id` names an AND node.
    #[must_use]
    pub fn is_valid_and_node_id(&self, id: NodeId) -> bool {
        self.graph.node(id).map(|n| n.is_and()).unwrap_or(false)
    }

    /// Whether `id` names an edge into an OR node.
    #[must_use]
    pub fn is_valid_edge_to_or_node_id(&self, id: EdgeId) -> bool {
        self.graph
            .edge(id)
            .and_then(|e| self.graph.node(e.target))
            .map(|n| n.is_or())
            .unwrap_or(false)
    }

    /// Whether an AND node can be struck right now.
    #[must_use]
    pub fn is_attackable_and_node_id(&self, id: NodeId) -> bool {
        candidates::is_attackable_and_node(&self.graph, &self.game_state, id)
    }

    /// Whether an edge to an OR node can be struck right now.
    #[must_use]
    pub fn is_attackable_edge_to_or_node_id(&self, id: EdgeId) -> bool {
        candidates::is_attackable_or_edge(&self.graph, &self.game_state, id)
    }

    /// Whether a defense set is committable: every ID names a node.
    #[must_use]
    pub fn is_valid_defense_move<'a>(&self, nodes: impl IntoIterator<Item = &'a NodeId>) -> bool {
        nodes.into_iter().all(|&id| self.is_valid_id(id))
    }

    /// Whether an attack set is committable: every unit is attackable now.
    #[must_use]
    pub fn is_valid_attack_move(&self, and_nodes: &[NodeId], edges: &[EdgeId]) -> bool {
        and_nodes.iter().all(|&id| self.is_attackable_and_node_id(id))
            && edges.iter().all(|&id| self.is_attackable_edge_to_or_node_id(id))
    }

    // === Views ===

    #[must_use]
    pub fn graph(&self) -> &Arc<DependencyGraph> {
        &self.graph
    }

    #[must_use]
    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    /// Episode RNG, shared with policies and the greedy wrappers.
    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    /// Ascending AND-node IDs.
    #[must_use]
    pub fn and_node_ids(&self) -> &[NodeId] {
        &self.and_node_ids
    }

    /// Ascending edge-to-OR IDs.
    #[must_use]
    pub fn edge_to_or_node_ids(&self) -> &[EdgeId] {
        &self.edge_to_or_node_ids
    }

    /// The defender's latest noisy observation.
    #[must_use]
    pub fn defender_observation(&self) -> &DefenderObservation {
        self.defender_obs_history
            .last()
            .expect("reset seeds the history")
    }

    /// Defense committed last step, if any.
    #[must_use]
    pub fn last_defense(&self) -> Option<&DefenderAction> {
        self.defense_history.last()
    }

    /// Attack committed last step, if any.
    #[must_use]
    pub fn last_attack(&self) -> Option<&AttackerAction> {
        self.attack_history.last()
    }

    /// Assemble the attacker's view of the current step.
    #[must_use]
    pub fn attacker_observation(&self) -> AttackerObservation {
        let legal = attack_candidates(&self.graph, &self.game_state);
        let (attacked_and, attacked_edges) = match self.attack_history.last() {
            Some(attack) => (attack.attacked_and_node_ids(), attack.attacked_edge_ids()),
            None => (Vec::new(), Vec::new()),
        };
        AttackerObservation {
            attacked_and_node_ids: attacked_and,
            attacked_edge_ids: attacked_edges,
            legal_and_node_ids: legal.and_nodes,
            legal_edge_ids: legal.or_edges,
            active_history: AttackerObservation::window_history(&self.active_history),
            time_steps_left: self.time_steps_left,
            and_node_ids: self.and_node_ids.clone(),
            edge_to_or_node_ids: self.edge_to_or_node_ids.clone(),
        }
    }

    /// Human-readable snapshot of the episode.
    #[must_use]
    pub fn render(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "step {}/{} ({} left)",
            self.num_time_step - self.time_steps_left,
            self.num_time_step,
            self.time_steps_left
        );
        let active = self.game_state.enabled_sorted();
        let _ = writeln!(
            out,
            "active ({}): {}",
            active.len(),
            active
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        );
        if let Some(attack) = self.attack_history.last() {
            let _ = writeln!(
                out,
                "last attack: nodes {:?}, edges {:?}",
                attack
                    .attacked_and_node_ids()
                    .iter()
                    .map(|id| id.raw())
                    .collect::<Vec<_>>(),
                attack
                    .attacked_edge_ids()
                    .iter()
                    .map(|id| id.raw())
                    .collect::<Vec<_>>(),
            );
        }
        if let Some(defense) = self.defense_history.last() {
            let _ = writeln!(
                out,
                "last defense: {:?}",
                defense.nodes().map(|id| id.raw()).collect::<Vec<_>>()
            );
        }
        let _ = writeln!(
            out,
            "payoffs: attacker {:+.3}, defender {:+.3}",
            self.attacker_total_payoff, self.defender_total_payoff
        );
        out
    }
}
