//! Throughput tests at production grid sizes.
//!
//! These allocate full-size trail fields, run real ticks with obstacles in
//! place and report timing and RSS from /proc/self/status.
//!
//! Run: cargo test --release -- --nocapture --ignored

#[cfg(test)]
mod tests {
    use crate::core::config::SimulationConfig;
    use crate::swarm::commands::EditCommand;
    use crate::swarm::master_pipeline::Simulation;
    use crate::swarm::pheromone::SpeciesMask;
    use crate::utils::benchmark::TickBenchmark;
    use std::time::Instant;

    fn get_rss_mb() -> f64 {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            for line in status.lines() {
                if line.starts_with("VmRSS:") {
                    let kb: f64 = line
                        .split_whitespace()
                        .nth(1)
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(0.0);
                    return kb / 1024.0;
                }
            }
        }
        0.0
    }

    /// 1024x1024 field, 250k agents, a ring of walls.
    #[test]
    #[ignore]
    fn scale_1m_cell_field() {
        let sep = "=".repeat(72);
        println!("\n{}", sep);
        println!("  PHEROMONE NET - 1024x1024 FIELD, 250K AGENTS");
        println!("{}\n", sep);

        let rss_before = get_rss_mb();
        println!("[1/3] Baseline RSS: {:.1} MB", rss_before);

        let cfg = SimulationConfig {
            width: 1024,
            height: 1024,
            agent_count: 250_000,
            seed: Some(42),
            ..SimulationConfig::default()
        };
        let t0 = Instant::now();
        let mut sim = Simulation::new(cfg).unwrap();
        for k in 0..16 {
            let a = k as f32 * std::f32::consts::TAU / 16.0;
            sim.apply(EditCommand::AddObstacle {
                x: 512.0 + 300.0 * a.cos(),
                y: 512.0 + 300.0 * a.sin(),
                radius: Some(20.0),
            })
            .unwrap();
        }
        println!("\n[2/3] Built world in {:?}  |  RSS: {:.1} MB", t0.elapsed(), get_rss_mb());

        println!("\n[3/3] Timing 100 ticks...");
        let report = TickBenchmark::new(5).run(&mut sim, 100);

        println!("\n{}", sep);
        println!("  {:<20} {:>12}", "Metric", "Value");
        println!("  {}", "-".repeat(34));
        println!("  {:<20} {:>12}", "agents", report.agents);
        println!("  {:<20} {:>12}", "cells", report.cells);
        println!("  {:<20} {:>12.3}", "mean ms/tick", report.mean_tick_ms);
        println!("  {:<20} {:>12.3}", "worst ms/tick", report.worst_tick_ms);
        println!("  {:<20} {:>12.1}", "ticks/s", report.ticks_per_sec);
        println!("  {:<20} {:>12.1}", "RSS MB", get_rss_mb());
        println!("{}\n", sep);

        assert_eq!(report.ticks, 100);
        assert_eq!(report.agents, 250_000);
        let stats = sim.stats();
        assert!(stats.channels.iter().all(|c| c.peak <= 100.0));
    }

    /// Grid cost in isolation across sizes, no agents.
    #[test]
    #[ignore]
    fn scale_diffusion_sweep() {
        println!("\n  {:>6} {:>12} {:>12}", "side", "ms/tick", "ns/cell");
        for side in [128usize, 256, 512, 1024, 2048] {
            let cfg = SimulationConfig {
                width: side,
                height: side,
                agent_count: 0,
                seed: Some(1),
                ..SimulationConfig::default()
            };
            let mut sim = Simulation::new(cfg).unwrap();
            sim.add_food(side as f32 / 2.0, side as f32 / 2.0, Some(10.0), Some(80.0), SpeciesMask::ALL);
            let report = TickBenchmark::new(2).run(&mut sim, 20);
            let ns_per_cell = report.mean_tick_ms * 1e6 / (side * side) as f64;
            println!("  {:>6} {:>12.3} {:>12.2}", side, report.mean_tick_ms, ns_per_cell);
            assert_eq!(report.cells, side * side);
        }
    }
}
