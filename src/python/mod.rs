//! Python bindings for the dependency-graph game gateway.
//!
//! # Quick Start
//!
//! ```python
//! import attackgraph
//!
//! with open("graph.json") as f:
//!     gateway = attackgraph.Gateway(
//!         graph_json=f.read(),
//!         role="defender",
//!         opponent_mix="Uniform:minNum=1,maxNum=3,ratio=0.5\t1.0",
//!         num_time_step=10,
//!         disc_fact=0.9,
//!         seed=42,
//!     )
//!
//! obs = gateway.reset()
//! out = gateway.step(3)          # obs + [reward, done]
//! ```

use pyo3::prelude::*;

mod py_gateway;

pub use py_gateway::*;

/// attackgraph: a dependency-graph security game for RL training.
#[pymodule]
fn attackgraph(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGateway>()?;
    Ok(())
}
