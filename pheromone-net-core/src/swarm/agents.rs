//! Agent population in Struct-of-Arrays layout.
//!
//! `x`, `y`, `heading` and `species` are index aligned. Lengths only change
//! through [`AgentPool::push`] and [`AgentPool::remove`], which touch every
//! column together.

use super::pheromone::TrailGrid;
use super::steering::{apply_turn, decide, sense};
use crate::core::config::{SimulationConfig, SpawnPattern, MAX_SPECIES};
use crate::core::error::{ConfigError, SimResult};
use crate::utils::alloc::try_with_capacity;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::f32::consts::{PI, TAU};
use tracing::info;

/// Rejection-sampling budget for landing a spawn outside obstacles.
const SPAWN_ATTEMPTS: usize = 32;

/// Per-tick movement counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AgentTickSummary {
    pub moved: usize,
    pub blocked: usize,
}

pub struct AgentPool {
    x: Vec<f32>,
    y: Vec<f32>,
    heading: Vec<f32>,
    species: Vec<u8>,
}

impl AgentPool {
    pub fn new() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            heading: Vec::new(),
            species: Vec::new(),
        }
    }

    pub fn with_capacity(n_agents: usize) -> SimResult<Self> {
        Ok(Self {
            x: try_with_capacity("agent x", n_agents)?,
            y: try_with_capacity("agent y", n_agents)?,
            heading: try_with_capacity("agent heading", n_agents)?,
            species: try_with_capacity("agent species", n_agents)?,
        })
    }

    /// Spawn a batch of `count` agents. Species are assigned round-robin over
    /// at most [`MAX_SPECIES`] ids.
    pub fn spawn<R: Rng + ?Sized>(
        count: usize,
        species_count: usize,
        grid: &TrailGrid,
        pattern: SpawnPattern,
        rng: &mut R,
    ) -> SimResult<Self> {
        let mut pool = Self::with_capacity(count)?;
        let sampler = SpawnSampler::new(pattern, grid)?;
        let species_count = species_count.clamp(1, MAX_SPECIES);

        for i in 0..count {
            let (x, y, heading) = sampler.sample(grid, rng);
            pool.push(x, y, heading, (i % species_count) as u8);
        }

        info!(
            "[AgentPool] Spawned {} agents across {} species ({:?})",
            count, species_count, pattern
        );
        Ok(pool)
    }

    pub fn push(&mut self, x: f32, y: f32, heading: f32, species: u8) {
        self.x.push(x);
        self.y.push(y);
        self.heading.push(heading);
        self.species.push(species);
    }

    /// Swap-remove agent `i`; the last agent takes its slot.
    pub fn remove(&mut self, i: usize) -> bool {
        if i >= self.len() {
            return false;
        }
        self.x.swap_remove(i);
        self.y.swap_remove(i);
        self.heading.swap_remove(i);
        self.species.swap_remove(i);
        true
    }

    /// Move agent `i`, clamped into the grid.
    pub fn relocate(&mut self, i: usize, x: f32, y: f32, grid: &TrailGrid) -> bool {
        if i >= self.len() {
            return false;
        }
        self.x[i] = x.clamp(0.0, (grid.width() - 1) as f32);
        self.y[i] = y.clamp(0.0, (grid.height() - 1) as f32);
        true
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[f32] {
        &self.x
    }

    pub fn y(&self) -> &[f32] {
        &self.y
    }

    pub fn heading(&self) -> &[f32] {
        &self.heading
    }

    pub fn species(&self) -> &[u8] {
        &self.species
    }

    /// Mutable position columns. Slices cannot change length, so alignment holds.
    pub fn positions_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.x, &mut self.y)
    }

    pub fn species_population(&self, species_count: usize) -> Vec<usize> {
        let mut counts = vec![0; species_count];
        for s in &self.species {
            if let Some(c) = counts.get_mut(*s as usize) {
                *c += 1;
            }
        }
        counts
    }

    /// One sense / steer / move / deposit pass over the whole population,
    /// in index order. Deposits are visible to agents later in the same pass.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        grid: &mut TrailGrid,
        cfg: &SimulationConfig,
        rng: &mut R,
        dt: f32,
    ) -> AgentTickSummary {
        let w = grid.width() as f32;
        let h = grid.height() as f32;
        let step = cfg.move_speed * dt;
        let (flow_x, flow_y) = (cfg.flow.x * dt, cfg.flow.y * dt);
        let jitter = cfg.reflect_jitter;
        let mut summary = AgentTickSummary::default();

        for i in 0..self.x.len() {
            let (x, y) = (self.x[i], self.y[i]);
            let species = self.species[i] as usize;

            let reading = sense(
                grid,
                x,
                y,
                self.heading[i],
                cfg.sensor_distance,
                cfg.sensor_angle,
                species,
            );
            let mut heading = apply_turn(self.heading[i], decide(reading), cfg.turn_speed, rng);

            let nx = x + heading.cos() * step + flow_x;
            let ny = y + heading.sin() * step + flow_y;
            let in_bounds = nx >= 0.0 && ny >= 0.0 && nx < w && ny < h;

            if in_bounds && !grid.is_obstacle(nx, ny) {
                self.x[i] = nx;
                self.y[i] = ny;
                grid.deposit(nx, ny, cfg.deposit_amount, species);
                summary.moved += 1;
            } else {
                // Reflect and jitter; stay put, no deposit.
                let j = if jitter > 0.0 {
                    rng.gen_range(-jitter..=jitter)
                } else {
                    0.0
                };
                heading += PI + j;
                if !in_bounds {
                    self.x[i] = x.clamp(0.0, w - 1.0);
                    self.y[i] = y.clamp(0.0, h - 1.0);
                }
                summary.blocked += 1;
            }

            self.heading[i] = heading.rem_euclid(TAU);
        }

        summary
    }
}

impl Default for AgentPool {
    fn default() -> Self {
        Self::new()
    }
}

struct SpawnSampler {
    pattern: SpawnPattern,
    normal: Option<Normal<f32>>,
    cx: f32,
    cy: f32,
    w: f32,
    h: f32,
}

impl SpawnSampler {
    fn new(pattern: SpawnPattern, grid: &TrailGrid) -> SimResult<Self> {
        let normal = match pattern {
            SpawnPattern::Gaussian { std_dev } => Some(Normal::new(0.0, std_dev).map_err(|_| {
                ConfigError::out_of_range("spawn.std_dev", std_dev, "finite and > 0")
            })?),
            _ => None,
        };
        let (w, h) = (grid.width() as f32, grid.height() as f32);
        Ok(Self {
            pattern,
            normal,
            cx: w / 2.0,
            cy: h / 2.0,
            w,
            h,
        })
    }

    fn candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> (f32, f32, f32) {
        let (x, y, heading) = match (self.pattern, &self.normal) {
            (SpawnPattern::Disc { radius }, _) => {
                let a = rng.gen_range(0.0..TAU);
                let d = radius * rng.gen::<f32>().sqrt();
                (self.cx + a.cos() * d, self.cy + a.sin() * d, a)
            }
            (SpawnPattern::Gaussian { .. }, Some(normal)) => (
                self.cx + normal.sample(rng),
                self.cy + normal.sample(rng),
                rng.gen_range(0.0..TAU),
            ),
            _ => (
                rng.gen_range(0.0..self.w),
                rng.gen_range(0.0..self.h),
                rng.gen_range(0.0..TAU),
            ),
        };
        (x.clamp(0.0, self.w - 1.0), y.clamp(0.0, self.h - 1.0), heading)
    }

    fn sample<R: Rng + ?Sized>(&self, grid: &TrailGrid, rng: &mut R) -> (f32, f32, f32) {
        let mut c = self.candidate(rng);
        for _ in 1..SPAWN_ATTEMPTS {
            if !grid.is_obstacle(c.0, c.1) {
                break;
            }
            c = self.candidate(rng);
        }
        c
    }
}
