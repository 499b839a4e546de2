//! Simulation configuration.
//!
//! A simulation spec names the graph to play on, the episode length, the
//! discount factor, and the two player strategies as string descriptors.
//! Specs arrive as JSON from an external driver; the engine only validates
//! and consumes them.

use serde::{Deserialize, Serialize};

use super::error::{GameError, GameResult};

/// One simulation run: graph identity, horizon, discounting, strategies.
///
/// Strategy strings use the `"Name:key1=val1,key2=val2"` descriptor format
/// understood by the policy factory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationSpec {
    /// Number of nodes the referenced graph must have.
    #[serde(rename = "numNode")]
    pub num_node: usize,

    /// Number of edges the referenced graph must have.
    #[serde(rename = "numEdge")]
    pub num_edge: usize,

    /// Number of target nodes the referenced graph must have.
    #[serde(rename = "numTarget")]
    pub num_target: usize,

    /// Identifier of the graph file this spec refers to.
    #[serde(rename = "graphID")]
    pub graph_id: i64,

    /// Episode length in time steps.
    #[serde(rename = "numTimeStep")]
    pub num_time_step: u32,

    /// Per-step discount factor, in `(0, 1]`.
    #[serde(rename = "discFact")]
    pub disc_fact: f64,

    /// Defender strategy descriptor.
    #[serde(rename = "defenderString")]
    pub defender_string: String,

    /// Attacker strategy descriptor.
    #[serde(rename = "attackerString")]
    pub attacker_string: String,
}

impl SimulationSpec {
    /// Parse a spec from JSON and validate it.
    pub fn from_json(text: &str) -> GameResult<Self> {
        let spec: SimulationSpec = serde_json::from_str(text)
            .map_err(|e| GameError::config(format!("malformed simulation spec: {e}")))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check the numeric ranges the engine depends on.
    pub fn validate(&self) -> GameResult<()> {
        if self.num_time_step == 0 {
            return Err(GameError::config("numTimeStep must be at least 1"));
        }
        if !(self.disc_fact > 0.0 && self.disc_fact <= 1.0) {
            return Err(GameError::config(format!(
                "discFact must be in (0, 1], got {}",
                self.disc_fact
            )));
        }
        Ok(())
    }
}
