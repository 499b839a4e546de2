//! Step-based RL wrapper environments and the gateway facade.
//!
//! A *macro-action* is one committed move of the underlying game; a
//! *micro-action* is one RL step that either extends the pending action set
//! by a unit or commits it. The greedy construction and its termination
//! rules live in the two env types; the gateway flattens everything to
//! numeric vectors for external learners.

pub mod attacker_env;
pub mod defender_env;
pub mod gateway;

pub use attacker_env::AttackerEnv;
pub use defender_env::DefenderEnv;
pub use gateway::{Gateway, GatewayEnv};

use crate::core::{GameError, GameResult};

/// Shared wrapper knobs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GreedyConfig {
    /// Probability of committing early on each unit step while the pending
    /// set is non-empty. Must be in `[0, 1)`.
    pub prob_greedy_selection_cutoff: f64,

    /// Whether re-selecting a pending unit ends the episode as a loss
    /// (`true`) or commits the pending set (`false`).
    pub lose_if_repeat: bool,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            prob_greedy_selection_cutoff: 0.1,
            lose_if_repeat: false,
        }
    }
}

impl GreedyConfig {
    pub fn validate(&self) -> GameResult<()> {
        if !(0.0..1.0).contains(&self.prob_greedy_selection_cutoff) {
            return Err(GameError::config(format!(
                "probGreedySelectionCutOff must be in [0, 1), got {}",
                self.prob_greedy_selection_cutoff
            )));
        }
        Ok(())
    }
}

/// What one micro-step hands back to the learner.
#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    pub observation: Vec<f64>,
    pub reward: f64,
    pub done: bool,
}
