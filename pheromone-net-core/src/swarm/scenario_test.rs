//! Whole-kernel properties: boundary containment, mass bound, obstacle and
//! species invariants, seeded determinism and the reference scenarios.

#[cfg(test)]
mod tests {
    use crate::core::config::{FlowVector, SimulationConfig, SpawnPattern};
    use crate::swarm::commands::EditCommand;
    use crate::swarm::master_pipeline::Simulation;
    use crate::swarm::agents::AgentPool;
    use crate::swarm::pheromone::{SpeciesMask, TrailGrid, OBSTACLE_SENTINEL};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn busy_config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            width: 80,
            height: 60,
            agent_count: 1_500,
            species_count: 2,
            deposit_amount: 12.0,
            max_concentration: 40.0,
            flow: FlowVector::new(0.3, -0.2),
            seed: Some(seed),
            ..SimulationConfig::default()
        }
    }

    fn with_walls(sim: &mut Simulation) {
        for cmd in [
            EditCommand::AddObstacle {
                x: 40.0,
                y: 30.0,
                radius: Some(8.0),
            },
            EditCommand::AddObstacle {
                x: 0.0,
                y: 0.0,
                radius: Some(5.0),
            },
            EditCommand::AddFood {
                x: 20.0,
                y: 20.0,
                radius: Some(4.0),
                intensity: Some(30.0),
                mask: SpeciesMask::BOTH,
            },
        ] {
            sim.apply(cmd).unwrap();
        }
    }

    /// Scenario A: a lone agent heading east moves one cell and marks it,
    /// and nothing else on the grid changes.
    #[test]
    fn scenario_single_agent_step() {
        let cfg = SimulationConfig {
            width: 100,
            height: 100,
            species_count: 1,
            move_speed: 1.0,
            deposit_amount: 5.0,
            flow: FlowVector::default(),
            ..SimulationConfig::default()
        };
        let mut grid = TrailGrid::new(100, 100, 1, cfg.max_concentration).unwrap();
        let mut agents = AgentPool::new();
        agents.push(50.0, 50.0, 0.0, 0);
        let mut expected = grid.channel(0).unwrap().to_vec();
        let mut rng = StdRng::seed_from_u64(1);

        agents.update(&mut grid, &cfg, &mut rng, 1.0);

        assert!((agents.x()[0] - 51.0).abs() < 1e-5);
        assert!((agents.y()[0] - 50.0).abs() < 1e-5);
        assert_eq!(grid.get_value(51.0, 50.0, 0), cfg.deposit_amount);
        expected[50 * 100 + 51] = cfg.deposit_amount;
        assert_eq!(grid.channel(0).unwrap(), expected.as_slice());
    }

    /// Scenario B: a wall placed over trail hides it behind the sentinel.
    #[test]
    fn scenario_obstacle_over_trail() {
        let cfg = SimulationConfig {
            width: 100,
            height: 100,
            agent_count: 0,
            seed: Some(2),
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::new(cfg).unwrap();
        sim.grid_mut().deposit(50.0, 50.0, 9.0, 0);
        assert_eq!(sim.grid().get_value(50.0, 50.0, 0), 9.0);

        sim.apply(EditCommand::AddObstacle {
            x: 50.0,
            y: 50.0,
            radius: Some(5.0),
        })
        .unwrap();
        assert!(sim.grid().is_obstacle(50.0, 50.0));
        assert_eq!(sim.grid().get_value(50.0, 50.0, 0), OBSTACLE_SENTINEL);

        sim.apply(EditCommand::RemoveObstacle {
            x: 50.0,
            y: 50.0,
            radius: Some(5.0),
        })
        .unwrap();
        assert_eq!(sim.grid().get_value(50.0, 50.0, 0), 0.0);
    }

    #[test]
    fn agents_stay_inside_grid() {
        let mut sim = Simulation::new(busy_config(21)).unwrap();
        with_walls(&mut sim);
        let (w, h) = (80.0, 60.0);

        for _ in 0..150 {
            sim.tick();
            let agents = sim.agents();
            for i in 0..agents.len() {
                let (x, y) = (agents.x()[i], agents.y()[i]);
                assert!(x >= 0.0 && x < w && y >= 0.0 && y < h, "agent {} at ({}, {})", i, x, y);
            }
        }
    }

    #[test]
    fn concentration_never_exceeds_clamp() {
        let mut sim = Simulation::new(busy_config(22)).unwrap();
        with_walls(&mut sim);
        for _ in 0..100 {
            sim.apply(EditCommand::AddFood {
                x: 60.0,
                y: 45.0,
                radius: Some(3.0),
                intensity: Some(25.0),
                mask: SpeciesMask::ALL,
            })
            .unwrap();
            sim.tick();
            for ch in 0..2 {
                assert!(sim.grid().channel_peak(ch) <= 40.0);
                assert!(sim.grid().channel(ch).unwrap().iter().all(|v| *v >= 0.0));
            }
        }
    }

    #[test]
    fn obstacle_cells_stay_empty_every_tick() {
        let mut sim = Simulation::new(busy_config(23)).unwrap();
        with_walls(&mut sim);
        for t in 0..80 {
            if t == 40 {
                sim.apply(EditCommand::AddObstacle {
                    x: 20.0,
                    y: 20.0,
                    radius: Some(3.0),
                })
                .unwrap();
            }
            sim.tick();
            let grid = sim.grid();
            for ch in 0..grid.channels() {
                let data = grid.channel(ch).unwrap();
                for (v, wall) in data.iter().zip(grid.obstacle_map()) {
                    if *wall {
                        assert_eq!(*v, 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn species_only_write_their_own_channel() {
        let mut cfg = busy_config(24);
        cfg.species_count = 2;
        cfg.agent_count = 400;
        let mut sim = Simulation::new(cfg).unwrap();

        // Drop every species-1 agent: channel 1 must stay empty.
        let mut i = 0;
        while i < sim.agents().len() {
            if sim.agents().species()[i] == 1 {
                sim.agents_mut().remove(i);
            } else {
                i += 1;
            }
        }
        sim.run(60);
        assert!(sim.grid().channel_mass(0) > 0.0);
        assert_eq!(sim.grid().channel_mass(1), 0.0);

        // Shared food is the one path into both channels.
        sim.add_food(10.0, 10.0, Some(2.0), Some(5.0), SpeciesMask::BOTH);
        assert!(sim.grid().channel_mass(1) > 0.0);
    }

    #[test]
    fn same_seed_same_world() {
        let run = |seed: u64| {
            let mut cfg = busy_config(seed);
            cfg.spawn = SpawnPattern::Gaussian { std_dev: 12.0 };
            let mut sim = Simulation::new(cfg).unwrap();
            with_walls(&mut sim);
            sim.run(40);
            sim.apply(EditCommand::Respawn).unwrap();
            sim.run(20);
            (
                sim.agents().x().to_vec(),
                sim.agents().y().to_vec(),
                sim.agents().heading().to_vec(),
                sim.grid().channel(0).unwrap().to_vec(),
                sim.grid().channel(1).unwrap().to_vec(),
            )
        };

        assert_eq!(run(77), run(77));
        assert_ne!(run(77).0, run(78).0);
    }

    #[test]
    fn trails_form_and_fade_once_deposits_stop() {
        let mut sim = Simulation::new(busy_config(25)).unwrap();
        sim.run(50);
        let mass = sim.grid().channel_mass(0) + sim.grid().channel_mass(1);
        assert!(mass > 0.0);

        let mut cfg = sim.config().clone();
        cfg.deposit_amount = 0.0;
        sim.set_config(cfg).unwrap();
        sim.run(300);
        let faded = sim.grid().channel_mass(0) + sim.grid().channel_mass(1);
        assert!(faded < mass * 1e-3);
    }
}
