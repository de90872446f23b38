//! Pheromone Net Core - Physarum-style trail-diffusion kernel
//!
//! Agents sense a multi-channel trail field, steer toward the strongest
//! reading, move and deposit; the field then diffuses, decays and drifts.
//! Obstacles, food and editor commands are applied between ticks.

pub mod core;
pub mod swarm;
pub mod utils;

pub use crate::core::config::{BrushConfig, FlowVector, SimulationConfig, SpawnPattern};
pub use crate::core::error::{ConfigError, SimError, SimResult};
pub use swarm::{
    AgentPool, EditCommand, FrameView, Renderer, SharedSimulation, Simulation, SimulationStats,
    SpeciesMask, TrailGrid,
};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Initialize tracing for the library.
#[cfg_attr(feature = "python", pyfunction)]
pub fn setup_logging(level: Option<String>) {
    let filter = level.unwrap_or_else(|| "info".to_string());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Python module initialization
#[cfg(feature = "python")]
#[pymodule]
fn pheromone_net_core(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<swarm::py_api::PySimulation>()?;
    m.add_class::<utils::benchmark::BenchmarkReport>()?;
    m.add_function(wrap_pyfunction!(setup_logging, m)?)?;
    Ok(())
}
