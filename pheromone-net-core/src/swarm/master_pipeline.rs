use super::agents::{AgentPool, AgentTickSummary};
use super::collaborators::{FoodSource, FrameView, NoFood, NoPredator, Predator, Renderer};
use super::commands::EditCommand;
use super::pheromone::{SpeciesMask, TrailGrid};
use super::stats::SimulationStats;
use crate::core::config::SimulationConfig;
use crate::core::error::SimResult;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{debug, info};

/// Tick interval for the periodic progress log.
const LOG_EVERY: u64 = 100;

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Owns every piece of per-run state and runs ticks in a fixed order:
/// food → agents → predator → diffusion. Rendering happens after the tick
/// through a read-only [`FrameView`].
///
/// All mutators take `&mut self`, so edits can only land between ticks.
pub struct Simulation {
    config: SimulationConfig,
    grid: TrailGrid,
    agents: AgentPool,
    rng: StdRng,
    food: Box<dyn FoodSource>,
    predator: Box<dyn Predator>,
    paused: bool,
    global_tick: u64,
    last_summary: AgentTickSummary,
}

impl Simulation {
    /// Validate `config`, allocate the grid and spawn the population.
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        let mut rng = make_rng(config.seed);
        let (grid, agents) = Self::build_world(&config, &mut rng)?;

        info!(
            "[Simulation] Ready: {}x{} grid, {} agents, {} species, seed {:?}",
            config.width, config.height, config.agent_count, config.species_count, config.seed
        );

        Ok(Self {
            config,
            grid,
            agents,
            rng,
            food: Box::new(NoFood),
            predator: Box::new(NoPredator),
            paused: false,
            global_tick: 0,
            last_summary: AgentTickSummary::default(),
        })
    }

    pub fn with_food(mut self, food: impl FoodSource + 'static) -> Self {
        self.food = Box::new(food);
        self
    }

    pub fn with_predator(mut self, predator: impl Predator + 'static) -> Self {
        self.predator = Box::new(predator);
        self
    }

    fn build_world(cfg: &SimulationConfig, rng: &mut StdRng) -> SimResult<(TrailGrid, AgentPool)> {
        let grid = TrailGrid::new(cfg.width, cfg.height, cfg.species_count, cfg.max_concentration)?;
        let agents = AgentPool::spawn(cfg.agent_count, cfg.species_count, &grid, cfg.spawn, rng)?;
        Ok((grid, agents))
    }

    /// Advance one tick. Returns `false` (and does nothing) while paused.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }
        let start_time = Instant::now();
        self.global_tick += 1;
        let dt = self.config.time_step;

        // 1. External food sources
        self.food.update(&mut self.grid, dt);

        // 2. Sense / steer / move / deposit
        self.last_summary = self
            .agents
            .update(&mut self.grid, &self.config, &mut self.rng, dt);

        // 3. Predator pass over positions
        self.predator
            .update(&mut self.agents, &self.grid, &mut self.rng);

        // 4. Diffusion and decay
        let cfg = &self.config;
        self.grid
            .update(cfg.decay_rate, cfg.diffusion_rate, cfg.flow.x, cfg.flow.y);

        if self.global_tick % LOG_EVERY == 0 {
            debug!(
                "Tick {}: {} agents ({} blocked) in {:?}",
                self.global_tick,
                self.agents.len(),
                self.last_summary.blocked,
                start_time.elapsed()
            );
        }
        true
    }

    /// Tick (unless paused), then hand the renderer a read-only view.
    pub fn frame<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> bool {
        let ticked = self.tick();
        renderer.draw(&self.view());
        ticked
    }

    /// Run up to `ticks` ticks; returns how many actually ran.
    pub fn run(&mut self, ticks: u64) -> u64 {
        (0..ticks).filter(|_| self.tick()).count() as u64
    }

    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            grid: &self.grid,
            agents: &self.agents,
            tick: self.global_tick,
        }
    }

    pub fn apply(&mut self, cmd: EditCommand) -> SimResult<()> {
        let brush = &self.config.brush;
        match cmd {
            EditCommand::AddObstacle { x, y, radius } => {
                self.grid
                    .add_obstacle(x, y, radius.unwrap_or(brush.obstacle_radius));
            }
            EditCommand::RemoveObstacle { x, y, radius } => {
                self.grid
                    .remove_obstacle(x, y, radius.unwrap_or(brush.obstacle_radius));
            }
            EditCommand::AddFood {
                x,
                y,
                radius,
                intensity,
                mask,
            } => self.add_food(x, y, radius, intensity, mask),
            EditCommand::ClearTrails => self.grid.clear_trails(),
            EditCommand::ClearObstacles => self.grid.clear_obstacles(),
            EditCommand::Respawn => self.respawn()?,
            EditCommand::Resize { width, height } => self.resize(width, height)?,
            EditCommand::SetPaused { paused } => self.set_paused(paused),
            EditCommand::UpdateConfig { config } => self.set_config(*config)?,
        }
        Ok(())
    }

    pub fn add_food(
        &mut self,
        x: f32,
        y: f32,
        radius: Option<f32>,
        intensity: Option<f32>,
        mask: SpeciesMask,
    ) {
        let brush = &self.config.brush;
        self.grid.add_food(
            x,
            y,
            radius.unwrap_or(brush.food_radius),
            intensity.unwrap_or(brush.food_intensity),
            mask,
        );
    }

    /// Replace the population with a fresh batch. Trail and obstacles stay.
    pub fn respawn(&mut self) -> SimResult<()> {
        let cfg = &self.config;
        self.agents = AgentPool::spawn(
            cfg.agent_count,
            cfg.species_count,
            &self.grid,
            cfg.spawn,
            &mut self.rng,
        )?;
        Ok(())
    }

    /// Destructive: grid and agents are rebuilt, trail and obstacles are lost.
    /// On failure the previous world is kept intact.
    pub fn resize(&mut self, width: usize, height: usize) -> SimResult<()> {
        let mut cfg = self.config.clone();
        cfg.width = width;
        cfg.height = height;
        self.rebuild(cfg)?;
        info!("[Simulation] Resized to {}x{}", width, height);
        Ok(())
    }

    /// Swap in a new configuration. Dimension or species changes rebuild the
    /// world; population or spawn changes respawn agents.
    pub fn set_config(&mut self, cfg: SimulationConfig) -> SimResult<()> {
        cfg.validate()?;
        let old = &self.config;
        if cfg.width != old.width || cfg.height != old.height || cfg.species_count != old.species_count {
            return self.rebuild(cfg);
        }

        let respawn = cfg.agent_count != old.agent_count || cfg.spawn != old.spawn;
        if cfg.max_concentration != old.max_concentration {
            self.grid.set_max_concentration(cfg.max_concentration)?;
        }
        self.config = cfg;
        if respawn {
            self.respawn()?;
        }
        info!("[Simulation] Configuration updated");
        Ok(())
    }

    fn rebuild(&mut self, cfg: SimulationConfig) -> SimResult<()> {
        cfg.validate()?;
        let (grid, agents) = Self::build_world(&cfg, &mut self.rng)?;
        self.grid = grid;
        self.agents = agents;
        self.config = cfg;
        Ok(())
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn global_tick(&self) -> u64 {
        self.global_tick
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &TrailGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut TrailGrid {
        &mut self.grid
    }

    pub fn agents(&self) -> &AgentPool {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut AgentPool {
        &mut self.agents
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats::collect(
            &self.grid,
            &self.agents,
            self.global_tick,
            self.paused,
            self.last_summary,
        )
    }
}
