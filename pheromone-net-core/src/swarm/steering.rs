//! Three-sensor sensing and steering rule.

use super::pheromone::TrailGrid;
use rand::Rng;

/// Samples taken left, ahead and right of an agent on its own channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorReading {
    pub left: f32,
    pub forward: f32,
    pub right: f32,
}

/// Outcome of one steering decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    Straight,
    Random,
    Left,
    Right,
}

#[inline]
fn probe(grid: &TrailGrid, x: f32, y: f32, angle: f32, dist: f32, species: usize) -> f32 {
    grid.get_value(x + angle.cos() * dist, y + angle.sin() * dist, species)
}

/// Read the agent's own channel at `sensor_distance` along
/// `heading - sensor_angle`, `heading` and `heading + sensor_angle`.
#[inline]
pub fn sense(
    grid: &TrailGrid,
    x: f32,
    y: f32,
    heading: f32,
    sensor_distance: f32,
    sensor_angle: f32,
    species: usize,
) -> SensorReading {
    SensorReading {
        left: probe(grid, x, y, heading - sensor_angle, sensor_distance, species),
        forward: probe(grid, x, y, heading, sensor_distance, species),
        right: probe(grid, x, y, heading + sensor_angle, sensor_distance, species),
    }
}

/// Arms are evaluated in order. An equal left/right pair never reaches the
/// last two arms with finite readings: it is caught by `Straight` (forward
/// not beaten) or `Random` (both sides beat forward). The final `Right` only
/// sees unordered input.
#[inline]
pub fn decide(r: SensorReading) -> Turn {
    if r.forward >= r.left && r.forward >= r.right {
        Turn::Straight
    } else if r.forward < r.left && r.forward < r.right {
        Turn::Random
    } else if r.left > r.right {
        Turn::Left
    } else {
        Turn::Right
    }
}

/// New heading after `turn`. Left is toward `heading - sensor_angle`.
#[inline]
pub fn apply_turn<R: Rng + ?Sized>(heading: f32, turn: Turn, turn_speed: f32, rng: &mut R) -> f32 {
    match turn {
        Turn::Straight => heading,
        Turn::Random => heading + rng.gen_range(-turn_speed..=turn_speed),
        Turn::Left => heading - turn_speed,
        Turn::Right => heading + turn_speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swarm::pheromone::OBSTACLE_SENTINEL;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f32::consts::FRAC_PI_2;

    fn reading(left: f32, forward: f32, right: f32) -> SensorReading {
        SensorReading {
            left,
            forward,
            right,
        }
    }

    #[test]
    fn branch_priority() {
        assert_eq!(decide(reading(1.0, 2.0, 1.0)), Turn::Straight);
        assert_eq!(decide(reading(2.0, 2.0, 2.0)), Turn::Straight);
        assert_eq!(decide(reading(0.0, 0.0, 0.0)), Turn::Straight);
        assert_eq!(decide(reading(3.0, 1.0, 2.0)), Turn::Random);
        assert_eq!(decide(reading(3.0, 1.0, 3.0)), Turn::Random);
        assert_eq!(decide(reading(3.0, 2.0, 1.0)), Turn::Left);
        assert_eq!(decide(reading(1.0, 2.0, 3.0)), Turn::Right);
    }

    #[test]
    fn obstacle_sentinel_always_loses() {
        let s = OBSTACLE_SENTINEL;
        assert_eq!(decide(reading(s, s, 0.0)), Turn::Right);
        assert_eq!(decide(reading(0.0, s, s)), Turn::Left);
        assert_eq!(decide(reading(s, 0.0, s)), Turn::Straight);
    }

    #[test]
    fn unordered_reading_falls_through_to_right() {
        assert_eq!(decide(reading(1.0, f32::NAN, 1.0)), Turn::Right);
    }

    #[test]
    fn turns_move_heading_by_turn_speed() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(apply_turn(1.0, Turn::Left, 0.25, &mut rng), 0.75);
        assert_eq!(apply_turn(1.0, Turn::Right, 0.25, &mut rng), 1.25);
        assert_eq!(apply_turn(1.0, Turn::Straight, 0.25, &mut rng), 1.0);
        for _ in 0..100 {
            let h = apply_turn(1.0, Turn::Random, 0.25, &mut rng);
            assert!((0.75..=1.25).contains(&h));
        }
        assert_eq!(apply_turn(1.0, Turn::Random, 0.0, &mut rng), 1.0);
    }

    #[test]
    fn sensors_read_own_channel_at_offsets() {
        let mut grid = TrailGrid::new(40, 40, 2, 100.0).unwrap();
        // Agent at (20,20) facing +y; left sensor is toward +x.
        grid.deposit(20.0, 25.0, 3.0, 0);
        grid.deposit(15.0, 20.0, 7.0, 0);
        grid.deposit(25.0, 20.0, 9.0, 1);

        let r = sense(&grid, 20.0, 20.0, FRAC_PI_2, 5.0, FRAC_PI_2, 0);
        assert_eq!(r, reading(0.0, 3.0, 7.0));
        let r = sense(&grid, 20.0, 20.0, FRAC_PI_2, 5.0, FRAC_PI_2, 1);
        assert_eq!(r, reading(9.0, 0.0, 0.0));
    }
}
