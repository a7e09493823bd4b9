//! Pixel passes: blur, particle overlay, invert.

use super::particles::ParticleField;
use super::EffectConfig;
use crate::params::EffectParams;
use crate::render::Canvas;

/// Separable box blur of the RGB channels with clamped edges
pub fn box_blur(canvas: &mut Canvas, radius: u32) {
    if radius == 0 {
        return;
    }
    let width = canvas.width() as usize;
    let height = canvas.height() as usize;
    let radius = radius as usize;
    let window = (2 * radius + 1) as u32;

    let mut temp = vec![[0u8; 3]; width * height];
    let image = canvas.image_mut();

    // Horizontal pass into temp
    for y in 0..height {
        for c in 0..3 {
            let at = |x: usize| image.get_pixel(x as u32, y as u32).0[c] as u32;
            let mut sum: u32 = (0..=2 * radius)
                .map(|i| at(i.saturating_sub(radius).min(width - 1)))
                .sum();
            for x in 0..width {
                temp[y * width + x][c] = (sum / window) as u8;
                let leaving = at(x.saturating_sub(radius));
                let entering = at((x + radius + 1).min(width - 1));
                sum = sum + entering - leaving;
            }
        }
    }

    // Vertical pass back into the canvas
    for x in 0..width {
        for c in 0..3 {
            let at = |y: usize| temp[y * width + x][c] as u32;
            let mut sum: u32 = (0..=2 * radius)
                .map(|i| at(i.saturating_sub(radius).min(height - 1)))
                .sum();
            for y in 0..height {
                image.get_pixel_mut(x as u32, y as u32).0[c] = (sum / window) as u8;
                let leaving = at(y.saturating_sub(radius));
                let entering = at((y + radius + 1).min(height - 1));
                sum = sum + entering - leaving;
            }
        }
    }
}

/// Invert RGB channels, leaving alpha opaque
pub fn invert(canvas: &mut Canvas) {
    for pixel in canvas.image_mut().pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            *channel = 255 - *channel;
        }
    }
}

/// Runs the enabled pixel passes in their fixed order
///
/// Blur runs on the scene before particles are composited so particles stay
/// sharp; invert runs last on the final composited pixels.
pub struct EffectPipeline {
    blur_radius: u32,
    particles: ParticleField,
}

impl EffectPipeline {
    pub fn new(params: &EffectParams) -> Self {
        Self {
            blur_radius: params.blur_radius,
            particles: ParticleField::new(params),
        }
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn apply(&mut self, canvas: &mut Canvas, config: &EffectConfig, level: f32, dt: f32) {
        if config.blur {
            box_blur(canvas, self.blur_radius);
        }

        if config.particle {
            self.particles.update(level, dt);
            self.particles.draw(canvas);
        } else {
            self.particles.clear();
        }

        if config.invert {
            invert(canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn dot_canvas() -> Canvas {
        let mut canvas = Canvas::new(9, 9);
        canvas.add_pixel(4, 4, [1.0, 1.0, 1.0], 1.0);
        canvas
    }

    #[test]
    fn test_box_blur_spreads_and_preserves_flat_regions() {
        let mut canvas = dot_canvas();
        box_blur(&mut canvas, 1);
        assert_eq!(canvas.pixel(4, 4)[0], 255 / 9);
        assert_eq!(canvas.pixel(3, 3)[0], 255 / 9);
        assert_eq!(canvas.pixel(0, 0)[0], 0);

        let mut flat = Canvas::new(5, 5);
        for y in 0..5 {
            for x in 0..5 {
                flat.add_pixel(x, y, [0.5, 0.5, 0.5], 1.0);
            }
        }
        let before = flat.pixel(2, 2);
        box_blur(&mut flat, 2);
        assert_eq!(flat.pixel(0, 0), before);
        assert_eq!(flat.pixel(4, 2), before);
    }

    #[test]
    fn test_invert_is_last_step() {
        let params = EffectParams::default();
        let config = EffectConfig {
            blur: true,
            invert: true,
            ..EffectConfig::default()
        };

        let mut piped = dot_canvas();
        EffectPipeline::new(&params).apply(&mut piped, &config, 0.0, 0.016);

        let mut manual = dot_canvas();
        box_blur(&mut manual, params.blur_radius);
        invert(&mut manual);

        assert_eq!(piped.as_bytes(), manual.as_bytes());
        assert_eq!(piped.pixel(0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_particles_are_not_blurred() {
        let params = EffectParams::default();
        let config = EffectConfig {
            blur: true,
            particle: true,
            ..EffectConfig::default()
        };

        let mut pipeline = EffectPipeline::new(&params);
        let mut canvas = Canvas::new(64, 64);
        pipeline.apply(&mut canvas, &config, 1.0, 0.05);
        assert!(!pipeline.particles().particles().is_empty());

        // Each live particle is drawn at full strength on an otherwise black scene
        let particle = pipeline.particles().particles()[0];
        let center = particle.position * Vec2::splat(64.0);
        let pixel = canvas.pixel(center.x.round() as u32, center.y.round() as u32);
        assert!(pixel[0] > 200 || pixel[1] > 200 || pixel[2] > 200);
    }

    #[test]
    fn test_disabling_particles_clears_field() {
        let params = EffectParams::default();
        let mut pipeline = EffectPipeline::new(&params);
        let mut canvas = Canvas::new(32, 32);

        let on = EffectConfig {
            particle: true,
            ..EffectConfig::default()
        };
        pipeline.apply(&mut canvas, &on, 1.0, 0.05);
        assert!(!pipeline.particles().particles().is_empty());

        pipeline.apply(&mut canvas, &EffectConfig::default(), 1.0, 0.05);
        assert!(pipeline.particles().particles().is_empty());
    }
}
