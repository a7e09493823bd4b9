//! Visualization mode parameters.

use serde::Deserialize;

/// Vortex mode: spiral of rotating arms driven by spectral bands
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VortexParams {
    /// Radius of the innermost arm (world units)
    pub inner_radius: f32,

    /// Radial spacing between consecutive arms (world units)
    pub radius_step: f32,

    /// Angular offset between consecutive arms (radians)
    pub spiral_step_rad: f32,

    /// Depth offset between consecutive arms (world units, along -Z)
    pub depth_step: f32,

    /// Arm extension per unit band energy (radians of arc)
    pub length_scale: f32,

    /// Maximum arm extension (radians of arc)
    pub max_length_rad: f32,

    /// Time constant for arm extension smoothing (seconds)
    pub response_s: f32,

    /// Rotation speed with no signal (rad/s)
    pub idle_spin: f32,

    /// Additional rotation speed per unit level (rad/s)
    pub spin_gain: f32,
}

impl Default for VortexParams {
    fn default() -> Self {
        Self {
            inner_radius: 0.6,
            radius_step: 0.12,
            spiral_step_rad: 0.4,
            depth_step: 0.15,
            length_scale: 6.0,
            max_length_rad: std::f32::consts::TAU * 0.9,
            response_s: 0.08,
            idle_spin: 0.25,
            spin_gain: 3.0,
        }
    }
}

/// Terrain mode: scrolling height grid fed by spectral energy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Grid rows (depth direction)
    pub rows: usize,

    /// Grid columns (frequency axis)
    pub cols: usize,

    /// Spacing between grid vertices (world units)
    pub spacing: f32,

    /// Height per unit band energy (world units)
    pub height_scale: f32,

    /// Scroll speed (rows per second)
    pub scroll_speed: f32,

    /// Exponential decay rate of rows already on the grid (1/s)
    pub row_decay: f32,

    /// Perlin ripple height per unit level (world units)
    pub ripple_scale: f32,

    /// Perlin ripple spatial frequency (cycles per world unit)
    pub ripple_frequency: f32,

    /// Perlin noise seed
    pub noise_seed: u32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            rows: 48,
            cols: 48,
            spacing: 0.12,
            height_scale: 1.2,
            scroll_speed: 24.0,
            row_decay: 0.6,
            ripple_scale: 0.15,
            ripple_frequency: 1.7,
            noise_seed: 42,
        }
    }
}

/// Droplet mode: concentric rings pulsing with level
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DropletParams {
    /// Number of concentric rings
    pub ring_count: usize,

    /// Radius of the innermost ring at rest (world units)
    pub base_radius: f32,

    /// Radial spacing between rings at rest (world units)
    pub ring_spacing: f32,

    /// Fractional radius growth at full envelope
    pub radius_gain: f32,

    /// Natural frequency of the critically damped decay (rad/s)
    pub decay_omega: f32,

    /// Level that fires a pulse on a rising edge
    pub pulse_threshold: f32,

    /// Fraction of the threshold the level must fall below to re-arm
    pub rearm_ratio: f32,

    /// Line segments per ring
    pub segments: usize,
}

impl Default for DropletParams {
    fn default() -> Self {
        Self {
            ring_count: 8,
            base_radius: 0.3,
            ring_spacing: 0.18,
            radius_gain: 0.6,
            decay_omega: 6.0,
            pulse_threshold: 0.08,
            rearm_ratio: 0.6,
            segments: 96,
        }
    }
}
