//! Trail Engine
//!
//! Multi-species slime-mould kernel: a flat multi-channel trail field, an
//! SoA agent pool that senses and deposits into it, and the orchestrator
//! that ticks both in a fixed order.

pub mod agents;
pub mod collaborators;
pub mod commands;
pub mod master_pipeline;
pub mod pheromone;
pub mod shared;
pub mod stats;
pub mod steering;

#[cfg(feature = "python")]
pub mod py_api;

mod scale_test;
mod scenario_test;

pub use agents::{AgentPool, AgentTickSummary};
pub use collaborators::{FoodPatch, FoodPatches, FoodSource, FrameView, NoFood, NoPredator, Predator, Renderer};
pub use commands::EditCommand;
pub use master_pipeline::Simulation;
pub use pheromone::{SpeciesMask, TrailGrid, OBSTACLE_SENTINEL};
pub use shared::SharedSimulation;
pub use stats::{ChannelStats, SimulationStats};
pub use steering::{SensorReading, Turn};
