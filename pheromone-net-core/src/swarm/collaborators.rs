//! Seams for subsystems that live outside the kernel: food placement,
//! predators and rendering.

use super::agents::AgentPool;
use super::pheromone::{SpeciesMask, TrailGrid};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Read-only snapshot handed to renderers once per frame.
pub struct FrameView<'a> {
    pub grid: &'a TrailGrid,
    pub agents: &'a AgentPool,
    pub tick: u64,
}

pub trait Renderer {
    fn draw(&mut self, frame: &FrameView<'_>);
}

/// Runs first in every tick; may only write through [`TrailGrid::add_food`].
pub trait FoodSource: Send {
    fn update(&mut self, grid: &mut TrailGrid, dt: f32);
}

/// Runs after the agent pass. Sees positions only; may relocate or remove agents.
pub trait Predator: Send {
    fn update(&mut self, agents: &mut AgentPool, grid: &TrailGrid, rng: &mut dyn RngCore);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoFood;

impl FoodSource for NoFood {
    fn update(&mut self, _grid: &mut TrailGrid, _dt: f32) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoPredator;

impl Predator for NoPredator {
    fn update(&mut self, _agents: &mut AgentPool, _grid: &TrailGrid, _rng: &mut dyn RngCore) {}
}

/// A food source that keeps emitting into a disc every tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodPatch {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Concentration added per unit of `dt`.
    pub intensity: f32,
    pub mask: SpeciesMask,
}

/// Static set of emitting patches.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodPatches {
    pub patches: Vec<FoodPatch>,
}

impl FoodPatches {
    pub fn new(patches: Vec<FoodPatch>) -> Self {
        Self { patches }
    }
}

impl FoodSource for FoodPatches {
    fn update(&mut self, grid: &mut TrailGrid, dt: f32) {
        for p in &self.patches {
            grid.add_food(p.x, p.y, p.radius, p.intensity * dt, p.mask);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn food_patches_emit_each_update() {
        let mut grid = TrailGrid::new(20, 20, 2, 100.0).unwrap();
        let mut food = FoodPatches::new(vec![FoodPatch {
            x: 10.0,
            y: 10.0,
            radius: 1.0,
            intensity: 4.0,
            mask: SpeciesMask::CHANNEL_1,
        }]);
        food.update(&mut grid, 1.0);
        food.update(&mut grid, 0.5);
        assert_eq!(grid.get_value(10.0, 10.0, 1), 6.0);
        assert_eq!(grid.get_value(10.0, 10.0, 0), 0.0);
    }
}
