//! Per-frame render context shared by all modes.

use glam::{Mat3, Vec3};

use super::canvas::{Canvas, Projector, Rgb};
use crate::camera::CameraState;
use crate::effects::EffectConfig;
use crate::params::EffectParams;

/// Everything a mode needs to draw one frame
///
/// Applies the geometry effects (expand, revolve, highlight) so individual
/// modes only describe their own shapes.
pub struct RenderContext<'a> {
    pub camera: &'a CameraState,
    pub effects: &'a EffectConfig,
    pub projector: Projector,
    effect_params: &'a EffectParams,
    level: f32,
    revolve_angle: f32,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        camera: &'a CameraState,
        effects: &'a EffectConfig,
        effect_params: &'a EffectParams,
        projector: Projector,
        level: f32,
        revolve_angle: f32,
    ) -> Self {
        Self {
            camera,
            effects,
            projector,
            effect_params,
            level,
            revolve_angle,
        }
    }

    /// Geometry scale applied by the expand effect
    pub fn scale(&self) -> f32 {
        if self.effects.expand {
            1.0 + self.level * self.effect_params.expand_gain
        } else {
            1.0
        }
    }

    /// Intensity after the highlight effect
    pub fn intensity(&self, base: f32) -> f32 {
        if self.effects.highlight {
            base * (1.0 + self.level * self.effect_params.highlight_gain)
        } else {
            base
        }
    }

    /// Model transform: expand scale, then revolve about the vertical axis
    pub fn transform(&self, point: Vec3) -> Vec3 {
        let scaled = point * self.scale();
        if self.effects.revolve {
            Mat3::from_rotation_y(self.revolve_angle) * scaled
        } else {
            scaled
        }
    }

    /// Draw a model-space segment
    pub fn line(&self, canvas: &mut Canvas, a: Vec3, b: Vec3, color: Rgb, intensity: f32) {
        self.projector.line(
            canvas,
            self.transform(a),
            self.transform(b),
            color,
            self.intensity(intensity),
        );
    }

    /// Draw a model-space polyline
    pub fn polyline(&self, canvas: &mut Canvas, points: &[Vec3], color: Rgb, intensity: f32) {
        for pair in points.windows(2) {
            self.line(canvas, pair[0], pair[1], color, intensity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraController;
    use crate::params::CameraParams;

    #[test]
    fn test_geometry_effects_follow_toggles() {
        let camera = CameraController::new(CameraParams::default());
        let params = EffectParams::default();
        let projector = Projector::new(camera.view_proj(1.0), 10, 10);

        let off = EffectConfig::default();
        let ctx = RenderContext::new(camera.state(), &off, &params, projector, 1.0, 1.0);
        assert_eq!(ctx.transform(Vec3::X), Vec3::X);
        assert_eq!(ctx.intensity(0.5), 0.5);

        let on = EffectConfig {
            highlight: true,
            expand: true,
            revolve: true,
            ..EffectConfig::default()
        };
        let ctx = RenderContext::new(camera.state(), &on, &params, projector, 1.0, std::f32::consts::FRAC_PI_2);
        let moved = ctx.transform(Vec3::X);
        assert!((moved.length() - (1.0 + params.expand_gain)).abs() < 1e-5);
        assert!(moved.x.abs() < 1e-5);
        assert!(ctx.intensity(0.5) > 0.5);
    }
}
