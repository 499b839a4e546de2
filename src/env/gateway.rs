//! Flat-array facade for external learning runtimes.
//!
//! A `Gateway` owns one wrapper environment (defender- or attacker-side)
//! and marshals everything through dense `Vec<f64>` values: `reset` returns
//! the observation, `step` returns observation ‖ reward ‖ done-flag. The
//! gateway is an owned value handed to whatever bridge hosts it; there is
//! no process-wide instance. When wrapped as a CLI, conventional exit codes
//! are 0 (clean shutdown), 1 (invalid arguments), 2 (invalid spec or
//! graph).

use super::attacker_env::AttackerEnv;
use super::defender_env::DefenderEnv;

/// Which side the learning agent plays.
pub enum GatewayEnv {
    Defender(DefenderEnv),
    Attacker(AttackerEnv),
}

/// Dense-vector facade over one wrapper environment.
pub struct Gateway {
    env: GatewayEnv,
}

impl Gateway {
    #[must_use]
    pub fn new(env: GatewayEnv) -> Self {
        Self { env }
    }

    /// Start an episode; returns the observation vector.
    pub fn reset(&mut self) -> Vec<f64> {
        match &mut self.env {
            GatewayEnv::Defender(env) => env.reset(),
            GatewayEnv::Attacker(env) => env.reset(),
        }
    }

    /// Apply one micro-action; returns observation ‖ reward ‖ done (0/1).
    pub fn step(&mut self, action: usize) -> Vec<f64> {
        let result = match &mut self.env {
            GatewayEnv::Defender(env) => env.step(action),
            GatewayEnv::Attacker(env) => env.step(action),
        };
        let mut out = result.observation;
        out.push(result.reward);
        out.push(if result.done { 1.0 } else { 0.0 });
        out
    }

    /// Human-readable snapshot of the underlying episode.
    #[must_use]
    pub fn render(&self) -> String {
        match &self.env {
            GatewayEnv::Defender(env) => env.render(),
            GatewayEnv::Attacker(env) => env.render(),
        }
    }

    /// Observation length (the step vector is two entries longer).
    #[must_use]
    pub fn observation_len(&self) -> usize {
        match &self.env {
            GatewayEnv::Defender(env) => env.observation_len(),
            GatewayEnv::Attacker(env) => env.observation_len(),
        }
    }

    /// The pass action index of the wrapped environment.
    #[must_use]
    pub fn pass_action(&self) -> usize {
        match &self.env {
            GatewayEnv::Defender(env) => env.pass_action(),
            GatewayEnv::Attacker(env) => env.pass_action(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::env::GreedyConfig;
    use crate::graph::test_graphs;
    use crate::policy::{Attacker, MixedStrategy, UniformAttacker};

    fn gateway() -> Gateway {
        let graph = Arc::new(test_graphs::or_chain(3));
        let opponents =
            MixedStrategy::pure(Attacker::Uniform(UniformAttacker::new(1, 1, 0.5).unwrap()));
        let env = DefenderEnv::new(
            graph,
            3,
            0.9,
            opponents,
            GreedyConfig::default(),
            7,
        )
        .unwrap();
        Gateway::new(GatewayEnv::Defender(env))
    }

    #[test]
    fn test_step_vector_layout() {
        let mut gateway = gateway();
        let obs = gateway.reset();
        assert_eq!(obs.len(), gateway.observation_len());

        let out = gateway.step(gateway.pass_action());
        assert_eq!(out.len(), gateway.observation_len() + 2);

        let done = out[out.len() - 1];
        assert!(done == 0.0 || done == 1.0);
        let reward = out[out.len() - 2];
        assert!(reward.is_finite());
    }

    #[test]
    fn test_full_episode_through_gateway() {
        let mut gateway = gateway();
        gateway.reset();

        let mut steps = 0;
        loop {
            let out = gateway.step(gateway.pass_action());
            steps += 1;
            if out[out.len() - 1] == 1.0 {
                break;
            }
            assert!(steps < 50);
        }
        assert_eq!(steps, 3);
    }

    #[test]
    fn test_render_is_nonempty() {
        let mut gateway = gateway();
        gateway.reset();
        assert!(gateway.render().contains("active"));
    }
}
