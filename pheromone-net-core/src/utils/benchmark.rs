use crate::swarm::master_pipeline::Simulation;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Timing summary for a batch of ticks.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "python", pyclass(get_all))]
pub struct BenchmarkReport {
    pub ticks: u64,
    pub agents: usize,
    pub cells: usize,
    pub total_ms: f64,
    pub mean_tick_ms: f64,
    pub worst_tick_ms: f64,
    pub ticks_per_sec: f64,
}

impl BenchmarkReport {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Times ticks on a simulation it borrows.
pub struct TickBenchmark {
    warmup: u64,
}

impl Default for TickBenchmark {
    fn default() -> Self {
        Self { warmup: 10 }
    }
}

impl TickBenchmark {
    pub fn new(warmup: u64) -> Self {
        Self { warmup }
    }

    /// Run `warmup` untimed ticks, then `ticks` timed ones. A paused
    /// simulation is unpaused for the run and re-paused afterwards.
    pub fn run(&self, sim: &mut Simulation, ticks: u64) -> BenchmarkReport {
        let was_paused = sim.is_paused();
        sim.set_paused(false);
        sim.run(self.warmup);

        info!(
            "📊 Benchmarking {} ticks ({} agents, {}x{} grid)...",
            ticks,
            sim.agents().len(),
            sim.grid().width(),
            sim.grid().height()
        );

        let mut worst = Duration::ZERO;
        let start = Instant::now();
        for _ in 0..ticks {
            let t0 = Instant::now();
            sim.tick();
            worst = worst.max(t0.elapsed());
        }
        let total = start.elapsed();
        sim.set_paused(was_paused);

        let total_ms = total.as_secs_f64() * 1e3;
        let report = BenchmarkReport {
            ticks,
            agents: sim.agents().len(),
            cells: sim.grid().width() * sim.grid().height(),
            total_ms,
            mean_tick_ms: if ticks > 0 { total_ms / ticks as f64 } else { 0.0 },
            worst_tick_ms: worst.as_secs_f64() * 1e3,
            ticks_per_sec: if total_ms > 0.0 {
                ticks as f64 / total.as_secs_f64()
            } else {
                0.0
            },
        };

        info!(
            "📈 Benchmark Complete. {:.3} ms/tick mean, {:.3} ms worst, {:.1} ticks/s",
            report.mean_tick_ms, report.worst_tick_ms, report.ticks_per_sec
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;

    #[test]
    fn reports_cover_the_timed_ticks_only() {
        let cfg = SimulationConfig {
            width: 32,
            height: 32,
            agent_count: 50,
            seed: Some(3),
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::new(cfg).unwrap();
        sim.set_paused(true);

        let report = TickBenchmark::new(5).run(&mut sim, 20);
        assert_eq!(report.ticks, 20);
        assert_eq!(report.cells, 1024);
        assert_eq!(report.agents, 50);
        assert_eq!(sim.global_tick(), 25);
        assert!(sim.is_paused());
        assert!(report.worst_tick_ms <= report.total_ms);
        assert!(report.to_json().contains("\"ticks\":20"));
    }
}
