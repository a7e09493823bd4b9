//! Terrain mode: a height grid whose front row is written from the spectrum
//! and scrolls away from the viewer.
//!
//! Columns map across the frequency axis (low on the left). Each new row
//! adds a Perlin ripple proportional to level, and rows already on the grid
//! decay exponentially as they recede.

use glam::Vec3;
use noise::{NoiseFn, Perlin};
use std::collections::VecDeque;

use super::{ModeKind, VisualMode};
use crate::analysis::SpectralBands;
use crate::params::TerrainParams;
use crate::render::{hsv_to_rgb, Canvas, RenderContext};

/// Vertical offset of the flat grid below the camera target (world units)
const BASE_HEIGHT: f32 = -0.6;

pub struct TerrainMode {
    params: TerrainParams,
    /// Height rows, front (newest) first
    rows: VecDeque<Vec<f32>>,
    /// Fraction of a row scrolled since the last row was emitted
    scroll: f32,
    time: f32,
    perlin: Perlin,
}

impl TerrainMode {
    pub fn new(params: TerrainParams) -> Self {
        let rows = (0..params.rows).map(|_| vec![0.0; params.cols]).collect();
        let perlin = Perlin::new(params.noise_seed);
        Self {
            params,
            rows,
            scroll: 0.0,
            time: 0.0,
            perlin,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn cols(&self) -> usize {
        self.params.cols
    }

    /// Height at (row, col); row 0 is the front
    pub fn height(&self, row: usize, col: usize) -> f32 {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(0.0)
    }

    /// Build the newest row from the current spectrum
    fn spectral_row(&self, bands: &SpectralBands, level: f32) -> Vec<f32> {
        let p = &self.params;
        let last = p.cols.saturating_sub(1).max(1) as f32;
        (0..p.cols)
            .map(|col| {
                let energy = bands.sample(col as f32 / last) * p.height_scale;
                let ripple = self.perlin.get([
                    (col as f32 * p.spacing * p.ripple_frequency) as f64,
                    (self.time * p.ripple_frequency) as f64,
                ]) as f32;
                energy + ripple * level.max(0.0) * p.ripple_scale
            })
            .collect()
    }

    /// World position of grid vertex (row, col), including partial scroll
    fn vertex(&self, row: usize, col: usize) -> Vec3 {
        let p = &self.params;
        let half_width = p.cols.saturating_sub(1) as f32 * p.spacing * 0.5;
        let half_depth = p.rows.saturating_sub(1) as f32 * p.spacing * 0.5;
        Vec3::new(
            col as f32 * p.spacing - half_width,
            BASE_HEIGHT + self.height(row, col),
            half_depth - (row as f32 + self.scroll) * p.spacing,
        )
    }

    fn height_color(height: f32) -> [f32; 3] {
        hsv_to_rgb(0.6 - (height * 0.35).clamp(0.0, 0.55), 0.75, 1.0)
    }
}

impl VisualMode for TerrainMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Terrain
    }

    fn update(&mut self, bands: &SpectralBands, level: f32, dt: f32) {
        self.time += dt;

        let decay = (-self.params.row_decay * dt).exp();
        for row in self.rows.iter_mut() {
            row.iter_mut().for_each(|h| *h *= decay);
        }

        self.scroll += self.params.scroll_speed * dt;
        let steps = self.scroll.floor();
        self.scroll -= steps;

        // Rows beyond the grid depth would be pushed straight off again
        let steps = (steps as usize).min(self.params.rows);
        if steps > 0 {
            let row = self.spectral_row(bands, level);
            for _ in 0..steps {
                self.rows.pop_back();
                self.rows.push_front(row.clone());
            }
        }
    }

    fn render(&self, ctx: &RenderContext, canvas: &mut Canvas) {
        let (rows, cols) = (self.rows(), self.cols());
        for row in 0..rows {
            // Fade toward the horizon
            let fade = 1.0 - row as f32 / rows as f32;
            for col in 0..cols {
                let here = self.vertex(row, col);
                let color = Self::height_color(self.height(row, col));
                if col + 1 < cols {
                    ctx.line(canvas, here, self.vertex(row, col + 1), color, 0.6 * fade);
                }
                if row + 1 < rows {
                    ctx.line(canvas, here, self.vertex(row + 1, col), color, 0.35 * fade);
                }
            }
        }
    }

    fn rest_deviation(&self) -> f32 {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .fold(0.0f32, |acc, h| acc.max(h.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> TerrainParams {
        TerrainParams {
            rows: 4,
            cols: 5,
            scroll_speed: 10.0,
            ..TerrainParams::default()
        }
    }

    #[test]
    fn test_front_row_maps_low_bands_left() {
        let mut mode = TerrainMode::new(small());
        let bands = SpectralBands::new(vec![1.0, 0.0]);
        mode.update(&bands, 0.0, 0.1);

        assert!((mode.height(0, 0) - small().height_scale).abs() < 1e-4);
        assert!(mode.height(0, 4).abs() < 1e-6);
        assert!(mode.height(0, 0) > mode.height(0, 2));
    }

    #[test]
    fn test_rows_scroll_back_and_decay() {
        let mut mode = TerrainMode::new(small());
        let loud = SpectralBands::new(vec![1.0; 3]);
        let silent = SpectralBands::zeros(3);

        mode.update(&loud, 0.0, 0.1);
        let front = mode.height(0, 2);
        mode.update(&silent, 0.0, 0.1);

        assert_eq!(mode.height(0, 2), 0.0);
        let receded = mode.height(1, 2);
        assert!(receded > 0.0 && receded < front);
    }

    #[test]
    fn test_ripple_is_silent_at_zero_level() {
        let mut mode = TerrainMode::new(small());
        let silent = SpectralBands::zeros(3);
        for _ in 0..10 {
            mode.update(&silent, 0.0, 0.05);
        }
        assert_eq!(mode.rest_deviation(), 0.0);
    }

    #[test]
    fn test_huge_dt_is_bounded() {
        let mut mode = TerrainMode::new(small());
        mode.update(&SpectralBands::new(vec![1.0]), 0.0, 1000.0);
        assert_eq!(mode.rows(), 4);
    }
}
