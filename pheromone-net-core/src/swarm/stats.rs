use super::agents::{AgentPool, AgentTickSummary};
use super::pheromone::TrailGrid;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub species: usize,
    pub population: usize,
    /// Sum of concentration over the channel.
    pub mass: f64,
    pub peak: f32,
}

/// Macro-state snapshot for stats graphs and headless runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub tick: u64,
    pub paused: bool,
    pub population: usize,
    /// Agents that moved / bounced during the last tick.
    pub moved: usize,
    pub blocked: usize,
    pub obstacle_cells: usize,
    pub channels: Vec<ChannelStats>,
}

impl SimulationStats {
    pub fn collect(
        grid: &TrailGrid,
        agents: &AgentPool,
        tick: u64,
        paused: bool,
        last: AgentTickSummary,
    ) -> Self {
        let populations = agents.species_population(grid.channels());
        let channels = populations
            .into_iter()
            .enumerate()
            .map(|(species, population)| ChannelStats {
                species,
                population,
                mass: grid.channel_mass(species),
                peak: grid.channel_peak(species),
            })
            .collect();

        SimulationStats {
            tick,
            paused,
            population: agents.len(),
            moved: last.moved,
            blocked: last.blocked,
            obstacle_cells: grid.obstacle_count(),
            channels,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
