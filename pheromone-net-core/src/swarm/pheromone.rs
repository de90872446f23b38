//! Multi-channel trail field with an obstacle map.
//!
//! One channel per species, stored back to back in a single flat buffer
//! (`channel * width * height + y * width + x`). Diffusion is double
//! buffered: `update` writes the whole next field into `scratch` from the
//! previous tick's values, then swaps.

use crate::core::config::MAX_SPECIES;
use crate::core::error::{ConfigError, SimError, SimResult};
use crate::utils::alloc::try_filled;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Returned by [`TrailGrid::get_value`] for obstacle cells. Strictly below any
/// legitimate concentration so walls lose every sensor comparison.
pub const OBSTACLE_SENTINEL: f32 = -1.0;

/// Set of channels touched by a food write. Bit `n` selects channel `n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesMask(u8);

impl SpeciesMask {
    pub const CHANNEL_0: SpeciesMask = SpeciesMask(0b01);
    pub const CHANNEL_1: SpeciesMask = SpeciesMask(0b10);
    pub const BOTH: SpeciesMask = SpeciesMask(0b11);
    pub const ALL: SpeciesMask = SpeciesMask(0xFF);

    pub fn from_bits(bits: u8) -> Self {
        SpeciesMask(bits)
    }

    pub fn single(species: usize) -> Self {
        if species < MAX_SPECIES {
            SpeciesMask(1 << species)
        } else {
            SpeciesMask(0)
        }
    }

    /// Mask covering the first `channels` channels.
    pub fn all(channels: usize) -> Self {
        let n = channels.min(MAX_SPECIES) as u32;
        SpeciesMask(((1u16 << n) - 1) as u8)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(self, channel: usize) -> bool {
        channel < MAX_SPECIES && self.0 & (1 << channel) != 0
    }
}

/// Row-major indices of the integer cells inside a disc, clipped to the grid.
fn disc_cells(
    width: usize,
    height: usize,
    cx: f32,
    cy: f32,
    r: f32,
) -> impl Iterator<Item = usize> {
    let valid = cx.is_finite() && cy.is_finite();
    let r = if r.is_finite() { r.max(0.0) } else { 0.0 };
    let r2 = r * r;
    let ri = r.ceil() as i64;
    let (cxi, cyi) = (cx.round() as i64, cy.round() as i64);

    let (x0, x1) = (
        cxi.saturating_sub(ri).max(0),
        cxi.saturating_add(ri).min(width as i64 - 1),
    );
    let (y0, y1) = if valid {
        (
            cyi.saturating_sub(ri).max(0),
            cyi.saturating_add(ri).min(height as i64 - 1),
        )
    } else {
        (0, -1)
    };

    (y0..=y1).flat_map(move |y| {
        (x0..=x1).filter_map(move |x| {
            let dx = (x - cxi) as f32;
            let dy = (y - cyi) as f32;
            if dx * dx + dy * dy <= r2 {
                Some(y as usize * width + x as usize)
            } else {
                None
            }
        })
    })
}

#[inline]
fn box_mean(src: &[f32], w: usize, x: usize, y: usize) -> f32 {
    let up = (y - 1) * w + x;
    let mid = y * w + x;
    let down = (y + 1) * w + x;
    let sum = src[up - 1] + src[up] + src[up + 1]
        + src[mid - 1] + src[mid] + src[mid + 1]
        + src[down - 1] + src[down] + src[down + 1];
    sum / 9.0
}

/// Bilinear sample. Corners outside the grid read 0: nothing flows in
/// from beyond the edge.
#[inline]
fn bilinear(src: &[f32], w: usize, h: usize, x: f32, y: f32) -> f32 {
    if !(x > -1.0 && y > -1.0 && x < w as f32 && y < h as f32) {
        return 0.0;
    }
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;
    let at = |cx: i64, cy: i64| -> f32 {
        if cx < 0 || cy < 0 || cx >= w as i64 || cy >= h as i64 {
            0.0
        } else {
            src[cy as usize * w + cx as usize]
        }
    };

    at(x0, y0) * (1.0 - fx) * (1.0 - fy)
        + at(x0 + 1, y0) * fx * (1.0 - fy)
        + at(x0, y0 + 1) * (1.0 - fx) * fy
        + at(x0 + 1, y0 + 1) * fx * fy
}

fn check_max_concentration(max: f32) -> SimResult<()> {
    if max.is_finite() && max > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::out_of_range("max_concentration", max, "finite and > 0").into())
    }
}

/// Diffusive trail field, one channel per species, plus obstacle map.
pub struct TrailGrid {
    data: Box<[f32]>,
    scratch: Box<[f32]>,
    obstacles: Box<[bool]>,
    channels: usize,
    width: usize,
    height: usize,
    max_concentration: f32,
}

impl TrailGrid {
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        max_concentration: f32,
    ) -> SimResult<Self> {
        let too_large = || SimError::GridTooLarge {
            width,
            height,
            channels,
        };
        check_max_concentration(max_concentration)?;
        let cells = width.checked_mul(height).ok_or_else(too_large)?;
        let total = cells.checked_mul(channels).ok_or_else(too_large)?;

        let data = try_filled("trail channels", total, 0.0f32)?;
        let scratch = try_filled("diffusion scratch", total, 0.0f32)?;
        let obstacles = try_filled("obstacle map", cells, false)?;

        info!(
            "[TrailGrid] Allocated {}x{} grid with {} channel(s) ({} floats x2)",
            width, height, channels, total
        );

        Ok(Self {
            data: data.into_boxed_slice(),
            scratch: scratch.into_boxed_slice(),
            obstacles: obstacles.into_boxed_slice(),
            channels,
            width,
            height,
            max_concentration,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn max_concentration(&self) -> f32 {
        self.max_concentration
    }

    /// Lowering the clamp also clips existing trail.
    pub fn set_max_concentration(&mut self, max: f32) -> SimResult<()> {
        check_max_concentration(max)?;
        self.max_concentration = max;
        self.data.iter_mut().for_each(|v| *v = v.min(max));
        Ok(())
    }

    #[inline]
    fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Nearest integer cell for a grid-space point, or `None` when outside.
    #[inline]
    fn cell_index(&self, x: f32, y: f32) -> Option<usize> {
        let cx = x.round();
        let cy = y.round();
        if cx >= 0.0 && cy >= 0.0 && cx < self.width as f32 && cy < self.height as f32 {
            Some(cy as usize * self.width + cx as usize)
        } else {
            None
        }
    }

    /// Concentration at the nearest cell; 0 outside the grid,
    /// [`OBSTACLE_SENTINEL`] on obstacles.
    #[inline]
    pub fn get_value(&self, x: f32, y: f32, species: usize) -> f32 {
        let Some(idx) = self.cell_index(x, y) else {
            return 0.0;
        };
        if self.obstacles[idx] {
            return OBSTACLE_SENTINEL;
        }
        if species >= self.channels {
            return 0.0;
        }
        self.data[species * self.cells() + idx]
    }

    /// Grid edges count as walls.
    #[inline]
    pub fn is_obstacle(&self, x: f32, y: f32) -> bool {
        match self.cell_index(x, y) {
            Some(idx) => self.obstacles[idx],
            None => true,
        }
    }

    #[inline]
    pub fn deposit(&mut self, x: f32, y: f32, amount: f32, species: usize) {
        if species >= self.channels {
            return;
        }
        let Some(idx) = self.cell_index(x, y) else {
            return;
        };
        if self.obstacles[idx] {
            return;
        }
        let off = species * self.cells();
        let v = &mut self.data[off + idx];
        *v = (*v + amount).max(0.0).min(self.max_concentration);
    }

    /// Mark a disc as wall and wipe any trail under it.
    pub fn add_obstacle(&mut self, cx: f32, cy: f32, r: f32) {
        let cells = self.cells();
        for idx in disc_cells(self.width, self.height, cx, cy, r) {
            self.obstacles[idx] = true;
            for ch in 0..self.channels {
                self.data[ch * cells + idx] = 0.0;
                self.scratch[ch * cells + idx] = 0.0;
            }
        }
    }

    pub fn remove_obstacle(&mut self, cx: f32, cy: f32, r: f32) {
        for idx in disc_cells(self.width, self.height, cx, cy, r) {
            self.obstacles[idx] = false;
        }
    }

    /// Raise concentration in a disc on every channel selected by `mask`.
    /// The only write path shared between species.
    pub fn add_food(&mut self, cx: f32, cy: f32, r: f32, intensity: f32, mask: SpeciesMask) {
        let cells = self.cells();
        let max = self.max_concentration;
        for idx in disc_cells(self.width, self.height, cx, cy, r) {
            if self.obstacles[idx] {
                continue;
            }
            for ch in (0..self.channels).filter(|ch| mask.contains(*ch)) {
                let v = &mut self.data[ch * cells + idx];
                *v = (*v + intensity).max(0.0).min(max);
            }
        }
    }

    /// One diffusion-decay pass over every channel.
    ///
    /// Interior cells blend toward their 3x3 mean by `diffuse_rate`; border
    /// cells only decay. The un-blurred term is sampled upstream along the
    /// flow vector (exactly the cell itself when the flow is zero). Obstacle
    /// cells end at 0.
    pub fn update(&mut self, decay_rate: f32, diffuse_rate: f32, flow_x: f32, flow_y: f32) {
        let w = self.width;
        let h = self.height;
        let cells = w * h;
        let keep = 1.0 - diffuse_rate;
        let advect = flow_x != 0.0 || flow_y != 0.0;

        for ch in 0..self.channels {
            let off = ch * cells;
            let src = &self.data[off..off + cells];
            let dst = &mut self.scratch[off..off + cells];
            let obstacles = &self.obstacles;

            for y in 0..h {
                let border_row = y == 0 || y == h - 1;
                for x in 0..w {
                    let idx = y * w + x;
                    if obstacles[idx] {
                        dst[idx] = 0.0;
                        continue;
                    }

                    let old = if advect {
                        bilinear(src, w, h, x as f32 - flow_x, y as f32 - flow_y)
                    } else {
                        src[idx]
                    };

                    dst[idx] = if border_row || x == 0 || x == w - 1 {
                        old * decay_rate
                    } else {
                        let blur = box_mean(src, w, x, y);
                        (old * keep + blur * diffuse_rate) * decay_rate
                    };
                }
            }
        }

        std::mem::swap(&mut self.data, &mut self.scratch);
    }

    /// Read-only view of one channel for renderers.
    pub fn channel(&self, species: usize) -> Option<&[f32]> {
        if species >= self.channels {
            return None;
        }
        let cells = self.cells();
        Some(&self.data[species * cells..(species + 1) * cells])
    }

    pub fn obstacle_map(&self) -> &[bool] {
        &self.obstacles
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.iter().filter(|o| **o).count()
    }

    /// Sum of a channel's concentration.
    pub fn channel_mass(&self, species: usize) -> f64 {
        self.channel(species)
            .map(|c| c.iter().map(|v| *v as f64).sum())
            .unwrap_or(0.0)
    }

    pub fn channel_peak(&self, species: usize) -> f32 {
        self.channel(species)
            .map(|c| c.iter().copied().fold(0.0, f32::max))
            .unwrap_or(0.0)
    }

    pub fn clear_trails(&mut self) {
        self.data.fill(0.0);
        self.scratch.fill(0.0);
    }

    pub fn clear_obstacles(&mut self) {
        self.obstacles.fill(false);
    }
}
