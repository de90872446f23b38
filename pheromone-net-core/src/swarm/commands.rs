//! Editor commands, applied between ticks.

use super::pheromone::SpeciesMask;
use crate::core::config::SimulationConfig;
use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

fn all_channels() -> SpeciesMask {
    SpeciesMask::ALL
}

/// A discrete edit from a UI, script or host thread. Omitted radii and
/// intensities fall back to the configured brush.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    AddObstacle {
        x: f32,
        y: f32,
        #[serde(default)]
        radius: Option<f32>,
    },
    RemoveObstacle {
        x: f32,
        y: f32,
        #[serde(default)]
        radius: Option<f32>,
    },
    AddFood {
        x: f32,
        y: f32,
        #[serde(default)]
        radius: Option<f32>,
        #[serde(default)]
        intensity: Option<f32>,
        #[serde(default = "all_channels")]
        mask: SpeciesMask,
    },
    ClearTrails,
    ClearObstacles,
    Respawn,
    Resize {
        width: usize,
        height: usize,
    },
    SetPaused {
        paused: bool,
    },
    UpdateConfig {
        config: Box<SimulationConfig>,
    },
}

impl EditCommand {
    /// Parse a JSON array of commands.
    pub fn parse_script(json: &str) -> Result<Vec<EditCommand>, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
