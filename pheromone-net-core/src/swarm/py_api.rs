use super::commands::EditCommand;
use super::master_pipeline::Simulation;
use super::pheromone::SpeciesMask;
use crate::core::config::SimulationConfig;
use crate::core::error::SimError;
use crate::utils::benchmark::{BenchmarkReport, TickBenchmark};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

fn py_err(e: impl Into<SimError>) -> PyErr {
    PyValueError::new_err(e.into().to_string())
}

#[pyclass]
pub struct PySimulation {
    engine: Simulation,
}

#[pymethods]
impl PySimulation {
    /// Build from a JSON configuration; omitted fields take their defaults.
    #[new]
    #[pyo3(signature = (config_json = None))]
    pub fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => SimulationConfig::from_json_str(json).map_err(py_err)?,
            None => SimulationConfig::default(),
        };
        Ok(Self {
            engine: Simulation::new(config).map_err(py_err)?,
        })
    }

    /// Advance by 1 tick. Returns False while paused.
    pub fn tick(&mut self) -> bool {
        self.engine.tick()
    }

    pub fn run(&mut self, ticks: u64) -> u64 {
        self.engine.run(ticks)
    }

    /// Apply a JSON array of edit commands in order.
    pub fn edits(&mut self, script_json: &str) -> PyResult<usize> {
        let cmds = EditCommand::parse_script(script_json).map_err(py_err)?;
        let n = cmds.len();
        for cmd in cmds {
            self.engine.apply(cmd).map_err(py_err)?;
        }
        Ok(n)
    }

    #[pyo3(signature = (x, y, radius = None))]
    pub fn add_obstacle(&mut self, x: f32, y: f32, radius: Option<f32>) -> PyResult<()> {
        self.engine
            .apply(EditCommand::AddObstacle { x, y, radius })
            .map_err(py_err)
    }

    #[pyo3(signature = (x, y, radius = None, intensity = None, mask = 0xFF))]
    pub fn add_food(&mut self, x: f32, y: f32, radius: Option<f32>, intensity: Option<f32>, mask: u8) {
        self.engine
            .add_food(x, y, radius, intensity, SpeciesMask::from_bits(mask));
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.engine.set_paused(paused);
    }

    pub fn get_value(&self, x: f32, y: f32, species: usize) -> f32 {
        self.engine.grid().get_value(x, y, species)
    }

    /// One channel as a flat row-major list, or None for an unknown species.
    pub fn channel(&self, species: usize) -> Option<Vec<f32>> {
        self.engine.grid().channel(species).map(|c| c.to_vec())
    }

    pub fn agent_positions(&self) -> Vec<(f32, f32)> {
        let agents = self.engine.agents();
        agents.x().iter().copied().zip(agents.y().iter().copied()).collect()
    }

    pub fn agent_species(&self) -> Vec<u8> {
        self.engine.agents().species().to_vec()
    }

    pub fn stats_json(&self) -> String {
        self.engine.stats().to_json()
    }

    /// Macro-state metrics for plotting from Python.
    pub fn get_macro_state(&self, py: Python<'_>) -> PyResult<PyObject> {
        let stats = self.engine.stats();
        let dict = PyDict::new_bound(py);
        dict.set_item("tick", stats.tick)?;
        dict.set_item("paused", stats.paused)?;
        dict.set_item("population", stats.population)?;
        dict.set_item("blocked", stats.blocked)?;
        dict.set_item("obstacle_cells", stats.obstacle_cells)?;
        let mass: Vec<f64> = stats.channels.iter().map(|c| c.mass).collect();
        dict.set_item("channel_mass", mass)?;
        Ok(dict.into())
    }

    #[pyo3(signature = (ticks, warmup = 10))]
    pub fn benchmark(&mut self, ticks: u64, warmup: u64) -> BenchmarkReport {
        TickBenchmark::new(warmup).run(&mut self.engine, ticks)
    }
}
