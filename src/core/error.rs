//! Error kinds for construction-time and move-time failures.
//!
//! Configuration and graph errors fail loudly when a value is built.
//! Move errors are fatal when the engine is driven directly; the RL
//! wrappers convert them into end-of-episode losses instead so a learning
//! agent can be trained to avoid them.

use thiserror::Error;

/// Errors surfaced at public boundaries.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// A parameter is out of range, or mixed-strategy weights do not sum to 1.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The dependency graph is not a valid connected DAG.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// An action references a nonexistent or illegal node or edge.
    #[error("invalid move: {0}")]
    InvalidMove(String),

    /// A numeric invariant was breached (e.g. a distribution not summing to 1).
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Convenience alias used throughout the crate.
pub type GameResult<T> = Result<T, GameError>;

impl GameError {
    /// Shorthand for an `InvalidConfig` with a formatted message.
    pub fn config(msg: impl Into<String>) -> Self {
        GameError::InvalidConfig(msg.into())
    }

    /// Shorthand for an `InvalidGraph` with a formatted message.
    pub fn graph(msg: impl Into<String>) -> Self {
        GameError::InvalidGraph(msg.into())
    }

    /// Shorthand for an `InvalidMove` with a formatted message.
    pub fn invalid_move(msg: impl Into<String>) -> Self {
        GameError::InvalidMove(msg.into())
    }

    /// Shorthand for an `InvalidState` with a formatted message.
    pub fn state(msg: impl Into<String>) -> Self {
        GameError::InvalidState(msg.into())
    }
}
