//! # attackgraph
//!
//! A two-player, turn-based security game on a dependency DAG, built for
//! RL training. An attacker tries to activate target nodes; a defender
//! protects nodes; both accrue discounted rewards over a fixed horizon.
//!
//! ## Design Principles
//!
//! 1. **Immutable graph, per-episode state**: the loaded DAG never changes;
//!    each episode keeps its own ACTIVE set and clock.
//!
//! 2. **Deterministic episodes**: one engine-owned seeded RNG drives every
//!    stochastic outcome, so a seed pins a whole trajectory.
//!
//! 3. **Errors at the boundary**: configuration and graph problems fail at
//!    construction; move errors inside the RL wrappers become end-of-episode
//!    losses a learner can be trained away from.
//!
//! ## Modules
//!
//! - `core`: RNG, error kinds, simulation spec
//! - `graph`: nodes, edges, validated DAG, min-cut, JSON loader
//! - `game`: episode state, actions, observations, oracle, turn engine
//! - `policy`: uniform/min-cut/value-propagation policies and descriptors
//! - `env`: greedy RL wrapper environments and the gateway facade
//! - `python`: pyo3 bindings (feature = "python")

pub mod core;
pub mod env;
pub mod game;
pub mod graph;
pub mod policy;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{GameError, GameResult, GameRng, SimulationSpec};

pub use crate::graph::{
    ActivationType, DependencyGraph, Edge, EdgeId, Node, NodeId, NodeState, NodeType,
};

pub use crate::game::{
    attack_candidates, AttackCandidates, AttackerAction, AttackerObservation, DefenderAction,
    DefenderObservation, GameState, SimulationEngine, ATTACKER_OBS_LENGTH,
};

pub use crate::policy::{
    attacker_from_descriptor, defender_from_descriptor, parse_mixed_attackers,
    parse_mixed_defenders, Attacker, Defender, MinCutDefender, MixedStrategy, StrategyDescriptor,
    UniformAttacker, UniformDefender, ValuePropagationAttacker,
};

pub use crate::env::{
    AttackerEnv, DefenderEnv, Gateway, GatewayEnv, GreedyConfig, StepResult,
};
