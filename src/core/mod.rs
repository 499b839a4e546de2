//! Core building blocks: RNG, error kinds, simulation configuration.
//!
//! Everything here is game-shape-agnostic; the dependency graph and the
//! turn engine build on top of these.

pub mod config;
pub mod error;
pub mod rng;

pub use config::SimulationSpec;
pub use error::{GameError, GameResult};
pub use rng::GameRng;
