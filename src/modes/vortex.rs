//! Vortex mode: one spiral arm per spectral band, spinning faster with level.

use glam::Vec3;
use std::f32::consts::TAU;

use super::{ModeKind, VisualMode};
use crate::analysis::{Smoother, SpectralBands};
use crate::params::VortexParams;
use crate::render::{hsv_to_rgb, Canvas, RenderContext};

/// Arc resolution when tessellating an arm (radians per segment)
const ARC_STEP_RAD: f32 = 0.05;

/// Arc drawn for an arm with no energy, so the idle vortex stays visible
const IDLE_ARC_RAD: f32 = 0.15;

pub struct VortexMode {
    params: VortexParams,
    /// Smoothed arc extension per arm (radians)
    extensions: Vec<Smoother>,
    rotation: f32,
    spin: f32,
}

impl VortexMode {
    pub fn new(params: VortexParams, arm_count: usize) -> Self {
        let extensions = vec![Smoother::new(params.response_s); arm_count.max(1)];
        let spin = params.idle_spin;
        Self {
            params,
            extensions,
            rotation: 0.0,
            spin,
        }
    }

    pub fn arm_count(&self) -> usize {
        self.extensions.len()
    }

    /// Current arc extension of arm `index` (radians)
    pub fn extension(&self, index: usize) -> f32 {
        self.extensions.get(index).map_or(0.0, Smoother::value)
    }

    /// Current rotation speed (rad/s)
    pub fn spin(&self) -> f32 {
        self.spin
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Polyline of arm `index` in model space
    fn arm_points(&self, index: usize) -> Vec<Vec3> {
        let p = &self.params;
        let radius = p.inner_radius + index as f32 * p.radius_step;
        let z = -(index as f32) * p.depth_step;
        let start = self.rotation + index as f32 * p.spiral_step_rad;
        let arc = self.extension(index).max(IDLE_ARC_RAD);
        let segments = (arc / ARC_STEP_RAD).ceil().max(1.0) as usize;

        (0..=segments)
            .map(|s| {
                let angle = start + arc * s as f32 / segments as f32;
                Vec3::new(radius * angle.cos(), radius * angle.sin(), z)
            })
            .collect()
    }
}

impl VisualMode for VortexMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Vortex
    }

    fn update(&mut self, bands: &SpectralBands, level: f32, dt: f32) {
        let (length_scale, max_length) = (self.params.length_scale, self.params.max_length_rad);
        for (index, extension) in self.extensions.iter_mut().enumerate() {
            let target = (bands.get(index) * length_scale).clamp(0.0, max_length);
            extension.update(target, dt);
        }

        self.spin = self.params.idle_spin + level.max(0.0) * self.params.spin_gain;
        self.rotation = (self.rotation + self.spin * dt).rem_euclid(TAU);
    }

    fn render(&self, ctx: &RenderContext, canvas: &mut Canvas) {
        let arms = self.arm_count();
        for index in 0..arms {
            let fill = self.extension(index) / self.params.max_length_rad;
            let color = hsv_to_rgb(index as f32 / arms as f32, 0.8, 1.0);
            ctx.polyline(canvas, &self.arm_points(index), color, 0.35 + 0.65 * fill);
        }
    }

    fn rest_deviation(&self) -> f32 {
        let extension = self
            .extensions
            .iter()
            .map(Smoother::value)
            .fold(0.0f32, f32::max);
        extension + (self.spin - self.params.idle_spin).abs()
    }
}
