//! Software RGBA canvas the modes draw into.

use glam::{Mat4, Vec2, Vec3};
use image::{Rgba, RgbaImage};
use std::path::Path;

use crate::error::VisualizerError;

/// Linear RGB color with components in [0, 1]
pub type Rgb = [f32; 3];

/// Convert HSV (all components in [0, 1]) to RGB
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let h = h.rem_euclid(1.0) * 6.0;
    let c = v * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m]
}

/// Per-frame pixel buffer
///
/// Drawing is additive so overlapping light accumulates on the black
/// background; alpha is always opaque.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width() as f32 / self.height() as f32
    }

    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 255]);
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    /// Raw RGBA8 bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Add `color * intensity` to the pixel at (x, y); out-of-bounds is ignored
    pub fn add_pixel(&mut self, x: i32, y: i32, color: Rgb, intensity: f32) {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        for (channel, component) in pixel.0.iter_mut().take(3).zip(color) {
            let added = *channel as f32 + component * intensity.max(0.0) * 255.0;
            *channel = added.round().min(255.0) as u8;
        }
    }

    /// Draw an anti-alias-free line between two screen points
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgb, intensity: f32) {
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
        // Guard against absurd spans from near-plane projections
        if steps > 8 * (self.width() + self.height()) as usize {
            return;
        }
        for i in 0..=steps {
            let p = from + delta * (i as f32 / steps as f32);
            self.add_pixel(p.x.round() as i32, p.y.round() as i32, color, intensity);
        }
    }

    /// Filled square dot centered on `center`
    pub fn draw_dot(&mut self, center: Vec2, radius: i32, color: Rgb, intensity: f32) {
        let cx = center.x.round() as i32;
        let cy = center.y.round() as i32;
        for y in (cy - radius)..=(cy + radius) {
            for x in (cx - radius)..=(cx + radius) {
                self.add_pixel(x, y, color, intensity);
            }
        }
    }

    /// Write the canvas to a PNG file
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), VisualizerError> {
        self.image.save(path.as_ref())?;
        Ok(())
    }
}

/// Maps world-space points to canvas pixels through a view-projection matrix
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    view_proj: Mat4,
    width: f32,
    height: f32,
}

impl Projector {
    pub fn new(view_proj: Mat4, width: u32, height: u32) -> Self {
        Self {
            view_proj,
            width: width as f32,
            height: height as f32,
        }
    }

    /// Screen position of `world`, or `None` when it lies behind the camera
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_proj * world.extend(1.0);
        if clip.w <= 1e-4 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }
        Some(Vec2::new(
            (ndc.x * 0.5 + 0.5) * self.width,
            (0.5 - ndc.y * 0.5) * self.height,
        ))
    }

    /// Project and draw a world-space segment; skipped if either end is clipped
    pub fn line(&self, canvas: &mut Canvas, a: Vec3, b: Vec3, color: Rgb, intensity: f32) {
        if let (Some(pa), Some(pb)) = (self.project(a), self.project(b)) {
            canvas.draw_line(pa, pb, color, intensity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas_is_opaque_black() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.as_bytes().len(), 4 * 3 * 4);
        assert!(canvas.image().pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn test_add_pixel_saturates_and_ignores_out_of_bounds() {
        let mut canvas = Canvas::new(2, 2);
        canvas.add_pixel(0, 0, [1.0, 0.5, 0.0], 1.0);
        canvas.add_pixel(0, 0, [1.0, 0.5, 0.0], 1.0);
        assert_eq!(canvas.pixel(0, 0), [255, 255, 0, 255]);

        canvas.add_pixel(-1, 0, [1.0; 3], 1.0);
        canvas.add_pixel(5, 5, [1.0; 3], 1.0);
        assert_eq!(canvas.pixel(1, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn test_draw_line_covers_endpoints() {
        let mut canvas = Canvas::new(10, 10);
        canvas.draw_line(Vec2::new(1.0, 1.0), Vec2::new(8.0, 5.0), [1.0, 1.0, 1.0], 1.0);
        assert_eq!(canvas.pixel(1, 1)[0], 255);
        assert_eq!(canvas.pixel(8, 5)[0], 255);
        assert_eq!(canvas.pixel(8, 1)[0], 0);
    }

    #[test]
    fn test_projector_centers_origin_and_clips_behind() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(60f32.to_radians(), 1.0, 0.1, 100.0);
        let projector = Projector::new(proj * view, 100, 100);

        let center = projector.project(Vec3::ZERO).unwrap();
        assert!((center.x - 50.0).abs() < 1e-3 && (center.y - 50.0).abs() < 1e-3);

        // Up in world is up on screen (smaller y)
        assert!(projector.project(Vec3::Y).unwrap().y < 50.0);

        assert!(projector.project(Vec3::new(0.0, 0.0, 10.0)).is_none());
    }

    #[test]
    fn test_hsv_primaries() {
        let red = hsv_to_rgb(0.0, 1.0, 1.0);
        assert!((red[0] - 1.0).abs() < 1e-6 && red[1].abs() < 1e-6);
        let blue = hsv_to_rgb(2.0 / 3.0, 1.0, 1.0);
        assert!((blue[2] - 1.0).abs() < 1e-5 && blue[0].abs() < 1e-5);
    }
}
