pub mod config;
pub mod error;

pub use config::{BrushConfig, FlowVector, SimulationConfig, SpawnPattern, MAX_SPECIES};
pub use error::{ConfigError, SimError, SimResult};
