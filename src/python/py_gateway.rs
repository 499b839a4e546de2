//! Gateway bindings.

use numpy::{IntoPyArray, PyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use std::sync::Arc;

use crate::core::GameError;
use crate::env::{AttackerEnv, DefenderEnv, Gateway, GatewayEnv, GreedyConfig};
use crate::graph::loader;
use crate::policy::{parse_mixed_attackers, parse_mixed_defenders};

fn to_py_err(err: GameError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Python wrapper for the RL gateway.
///
/// Builds a defender- or attacker-side environment from a graph JSON
/// string and a newline-delimited opponent mixture, then exposes the
/// `reset`/`step`/`render` surface as numpy arrays.
#[pyclass(name = "Gateway")]
pub struct PyGateway {
    inner: Gateway,
}

#[pymethods]
impl PyGateway {
    #[new]
    #[pyo3(signature = (
        graph_json,
        role,
        opponent_mix,
        num_time_step,
        disc_fact,
        seed,
        prob_greedy_selection_cutoff = 0.1,
        lose_if_repeat = false,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        graph_json: &str,
        role: &str,
        opponent_mix: &str,
        num_time_step: u32,
        disc_fact: f64,
        seed: u64,
        prob_greedy_selection_cutoff: f64,
        lose_if_repeat: bool,
    ) -> PyResult<Self> {
        let graph = Arc::new(loader::from_json(graph_json).map_err(to_py_err)?);
        let config = GreedyConfig {
            prob_greedy_selection_cutoff,
            lose_if_repeat,
        };

        let env = match role {
            "defender" => {
                let opponents = parse_mixed_attackers(opponent_mix).map_err(to_py_err)?;
                GatewayEnv::Defender(
                    DefenderEnv::new(graph, num_time_step, disc_fact, opponents, config, seed)
                        .map_err(to_py_err)?,
                )
            }
            "attacker" => {
                let opponents = parse_mixed_defenders(opponent_mix).map_err(to_py_err)?;
                GatewayEnv::Attacker(
                    AttackerEnv::new(graph, num_time_step, disc_fact, opponents, config, seed)
                        .map_err(to_py_err)?,
                )
            }
            other => {
                return Err(PyValueError::new_err(format!(
                    "role must be \"defender\" or \"attacker\", got {other:?}"
                )))
            }
        };

        Ok(Self {
            inner: Gateway::new(env),
        })
    }

    /// Start an episode; returns the observation vector.
    fn reset<'py>(&mut self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.reset().into_pyarray_bound(py)
    }

    /// Apply one micro-action; returns observation + [reward, done].
    fn step<'py>(&mut self, py: Python<'py>, action: usize) -> Bound<'py, PyArray1<f64>> {
        self.inner.step(action).into_pyarray_bound(py)
    }

    /// Human-readable snapshot.
    fn render(&self) -> String {
        self.inner.render()
    }

    /// Observation length (the step vector is two entries longer).
    #[getter]
    fn observation_len(&self) -> usize {
        self.inner.observation_len()
    }

    /// The pass action index.
    #[getter]
    fn pass_action(&self) -> usize {
        self.inner.pass_action()
    }
}
