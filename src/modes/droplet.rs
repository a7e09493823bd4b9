//! Droplet mode: concentric rings excited by level pulses.
//!
//! A pulse fires when the level rises through the threshold and re-arms only
//! after it falls below `threshold * rearm_ratio`. Each pulse excites the next
//! ring in round-robin order; a ring's envelope then follows a critically
//! damped decay `A (1 + wt) e^(-wt)`, which never increases between pulses.

use glam::Vec3;
use std::f32::consts::TAU;

use super::{ModeKind, VisualMode};
use crate::analysis::SpectralBands;
use crate::params::DropletParams;
use crate::render::{hsv_to_rgb, Canvas, RenderContext};

/// Outline intensity of a ring with no envelope
const REST_INTENSITY: f32 = 0.06;

#[derive(Debug, Clone, Copy, Default)]
struct Ring {
    amplitude: f32,
    /// Seconds since this ring was last excited
    age: f32,
}

pub struct DropletMode {
    params: DropletParams,
    rings: Vec<Ring>,
    next_ring: usize,
    armed: bool,
    pulses: u64,
}

impl DropletMode {
    pub fn new(params: DropletParams) -> Self {
        let rings = vec![Ring::default(); params.ring_count.max(1)];
        Self {
            params,
            rings,
            next_ring: 0,
            armed: true,
            pulses: 0,
        }
    }

    /// Total pulses fired since construction
    pub fn pulse_count(&self) -> u64 {
        self.pulses
    }

    fn envelope(&self, ring: &Ring) -> f32 {
        let wt = self.params.decay_omega * ring.age;
        ring.amplitude * (1.0 + wt) * (-wt).exp()
    }

    /// Current opacity of each ring, innermost first
    pub fn opacities(&self) -> Vec<f32> {
        self.rings.iter().map(|ring| self.envelope(ring)).collect()
    }

    fn fire(&mut self, level: f32) {
        let ring = &mut self.rings[self.next_ring];
        ring.amplitude = level.min(1.0);
        ring.age = 0.0;
        self.next_ring = (self.next_ring + 1) % self.rings.len();
        self.pulses += 1;
    }
}

impl VisualMode for DropletMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Droplet
    }

    fn update(&mut self, _bands: &SpectralBands, level: f32, dt: f32) {
        for ring in self.rings.iter_mut() {
            ring.age += dt.max(0.0);
        }

        let threshold = self.params.pulse_threshold;
        if self.armed && level >= threshold {
            self.fire(level);
            self.armed = false;
        } else if !self.armed && level < threshold * self.params.rearm_ratio {
            self.armed = true;
        }
    }

    fn render(&self, ctx: &RenderContext, canvas: &mut Canvas) {
        let p = &self.params;
        let segments = p.segments.max(3);
        let count = self.rings.len();

        for (index, ring) in self.rings.iter().enumerate() {
            let envelope = self.envelope(ring);
            let radius = (p.base_radius + index as f32 * p.ring_spacing) * (1.0 + p.radius_gain * envelope);
            let points: Vec<Vec3> = (0..=segments)
                .map(|s| {
                    let angle = TAU * s as f32 / segments as f32;
                    Vec3::new(radius * angle.cos(), radius * angle.sin(), 0.0)
                })
                .collect();
            let color = hsv_to_rgb(0.55 + 0.35 * index as f32 / count as f32, 0.7, 1.0);
            ctx.polyline(canvas, &points, color, REST_INTENSITY + envelope);
        }
    }

    fn rest_deviation(&self) -> f32 {
        self.opacities().into_iter().fold(0.0f32, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent() -> SpectralBands {
        SpectralBands::zeros(4)
    }

    #[test]
    fn test_pulse_fires_once_per_rising_edge() {
        let mut mode = DropletMode::new(DropletParams::default());
        for _ in 0..10 {
            mode.update(&silent(), 0.5, 1.0 / 60.0);
        }
        assert_eq!(mode.pulse_count(), 1);

        // Dips that stay above the re-arm level do not re-trigger
        mode.update(&silent(), 0.06, 1.0 / 60.0);
        mode.update(&silent(), 0.5, 1.0 / 60.0);
        assert_eq!(mode.pulse_count(), 1);

        mode.update(&silent(), 0.0, 1.0 / 60.0);
        mode.update(&silent(), 0.5, 1.0 / 60.0);
        assert_eq!(mode.pulse_count(), 2);
    }

    #[test]
    fn test_pulses_cycle_rings_and_clamp_amplitude() {
        let params = DropletParams {
            ring_count: 2,
            ..DropletParams::default()
        };
        let mut mode = DropletMode::new(params);

        mode.update(&silent(), 3.0, 0.0);
        assert_eq!(mode.opacities(), vec![1.0, 0.0]);

        mode.update(&silent(), 0.0, 0.0);
        mode.update(&silent(), 0.4, 0.0);
        let opacities = mode.opacities();
        assert_eq!(opacities[0], 1.0);
        assert!((opacities[1] - 0.4).abs() < 1e-6);

        mode.update(&silent(), 0.0, 0.0);
        mode.update(&silent(), 0.2, 0.0);
        assert!((mode.opacities()[0] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_opacity_never_rises_between_pulses() {
        let mut mode = DropletMode::new(DropletParams::default());
        let levels = [0.9, 0.7, 0.3, 0.0, 0.05, 0.6, 0.6, 0.02, 0.0, 1.0, 0.5, 0.0];

        let mut previous = mode.opacities();
        let mut pulses = mode.pulse_count();
        for step in 0..240 {
            mode.update(&silent(), levels[step % levels.len()], 1.0 / 60.0);
            let current = mode.opacities();
            if mode.pulse_count() == pulses {
                for (before, after) in previous.iter().zip(&current) {
                    assert!(after <= before, "opacity rose from {} to {}", before, after);
                }
            }
            previous = current;
            pulses = mode.pulse_count();
        }
        assert!(pulses > 1);
    }
}
