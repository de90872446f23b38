use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::path::Path;

/// Upper bound on species channels (one bit per species in `SpeciesMask`).
pub const MAX_SPECIES: usize = 8;

/// Constant ambient current added to every agent's movement each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowVector {
    pub x: f32,
    pub y: f32,
}

impl FlowVector {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Initial placement of a freshly spawned population.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnPattern {
    /// Uniform over the whole grid, uniform random headings.
    Uniform,
    /// Uniform inside a centred disc, headings pointing outward.
    Disc { radius: f32 },
    /// Normal distribution around the grid centre.
    Gaussian { std_dev: f32 },
}

impl Default for SpawnPattern {
    fn default() -> Self {
        SpawnPattern::Uniform
    }
}

/// Editor brush defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub obstacle_radius: f32,
    pub food_radius: f32,
    pub food_intensity: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        BrushConfig {
            obstacle_radius: 6.0,
            food_radius: 8.0,
            food_intensity: 50.0,
        }
    }
}

/// Simulation hyperparameters, read once per tick.
///
/// Unknown fields in JSON are rejected; missing fields fall back to
/// [`SimulationConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub width: usize,
    pub height: usize,
    pub agent_count: usize,
    pub species_count: usize,

    /// Distance from the agent to each of its three sensors.
    pub sensor_distance: f32,
    /// Angular offset of the side sensors (radians).
    pub sensor_angle: f32,
    /// Heading change per steering decision (radians).
    pub turn_speed: f32,
    pub move_speed: f32,
    pub deposit_amount: f32,

    /// Multiplicative evaporation per tick, `[0, 1)`.
    pub decay_rate: f32,
    /// Blend between no spread (0) and a full 3x3 box blur (1).
    pub diffusion_rate: f32,
    /// Clamp applied to every deposit and food write.
    pub max_concentration: f32,
    pub flow: FlowVector,

    /// Half-width of the random heading jitter after a rejected move.
    pub reflect_jitter: f32,
    pub spawn: SpawnPattern,
    /// Scales movement and flow for one tick.
    pub time_step: f32,
    pub seed: Option<u64>,
    pub brush: BrushConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            width: 256,
            height: 256,
            agent_count: 4_000,
            species_count: 2,
            sensor_distance: 9.0,
            sensor_angle: PI / 4.0,
            turn_speed: PI / 8.0,
            move_speed: 1.0,
            deposit_amount: 5.0,
            decay_rate: 0.95,
            diffusion_rate: 0.5,
            max_concentration: 100.0,
            flow: FlowVector::default(),
            reflect_jitter: 0.3,
            spawn: SpawnPattern::default(),
            time_step: 1.0,
            seed: None,
            brush: BrushConfig::default(),
        }
    }
}

fn check(
    ok: bool,
    field: &'static str,
    value: impl ToString,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(field, value, expected))
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
    check(v.is_finite() && v >= 0.0, field, v, "finite and >= 0")
}

impl SimulationConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: SimulationConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Range checks for every option. Runs at the configuration boundary,
    /// never inside a tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(self.width >= 3, "width", self.width, ">= 3")?;
        check(self.height >= 3, "height", self.height, ">= 3")?;
        check(
            (1..=MAX_SPECIES).contains(&self.species_count),
            "species_count",
            self.species_count,
            "1..=8",
        )?;

        check(
            self.sensor_distance.is_finite() && self.sensor_distance > 0.0,
            "sensor_distance",
            self.sensor_distance,
            "finite and > 0",
        )?;
        check(
            (0.0..=PI).contains(&self.sensor_angle),
            "sensor_angle",
            self.sensor_angle,
            "0 <= x <= pi",
        )?;
        non_negative("turn_speed", self.turn_speed)?;
        non_negative("move_speed", self.move_speed)?;
        non_negative("deposit_amount", self.deposit_amount)?;
        non_negative("reflect_jitter", self.reflect_jitter)?;

        check(
            (0.0..1.0).contains(&self.decay_rate),
            "decay_rate",
            self.decay_rate,
            "0 <= x < 1",
        )?;
        check(
            (0.0..=1.0).contains(&self.diffusion_rate),
            "diffusion_rate",
            self.diffusion_rate,
            "0 <= x <= 1",
        )?;
        check(
            self.max_concentration.is_finite() && self.max_concentration > 0.0,
            "max_concentration",
            self.max_concentration,
            "finite and > 0",
        )?;
        check(
            self.flow.x.is_finite() && self.flow.y.is_finite(),
            "flow",
            format!("({}, {})", self.flow.x, self.flow.y),
            "finite components",
        )?;
        check(
            self.time_step.is_finite() && self.time_step > 0.0,
            "time_step",
            self.time_step,
            "finite and > 0",
        )?;

        match self.spawn {
            SpawnPattern::Uniform => {}
            SpawnPattern::Disc { radius } => check(
                radius.is_finite() && radius > 0.0,
                "spawn.radius",
                radius,
                "finite and > 0",
            )?,
            SpawnPattern::Gaussian { std_dev } => check(
                std_dev.is_finite() && std_dev > 0.0,
                "spawn.std_dev",
                std_dev,
                "finite and > 0",
            )?,
        }

        non_negative("brush.obstacle_radius", self.brush.obstacle_radius)?;
        non_negative("brush.food_radius", self.brush.food_radius)?;
        non_negative("brush.food_intensity", self.brush.food_intensity)?;
        Ok(())
    }
}
