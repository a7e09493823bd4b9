//! Rendering, effect, and recording configuration.

use serde::Deserialize;

/// Rendering configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Software canvas width (pixels); scaled to the window by the presenter
    pub canvas_width: u32,

    /// Software canvas height (pixels)
    pub canvas_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            canvas_width: 960,
            canvas_height: 540,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.canvas_width as f32 / self.canvas_height as f32
    }
}

/// Effect strengths (toggles themselves live in `EffectConfig`)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EffectParams {
    /// Brightness boost per unit level when highlight is on
    pub highlight_gain: f32,

    /// Geometry scale per unit level when expand is on
    pub expand_gain: f32,

    /// Scene rotation rate when revolve is on (rad/s)
    pub revolve_rate: f32,

    /// Box blur radius (pixels)
    pub blur_radius: u32,

    /// Particles emitted per second per unit level
    pub particle_rate: f32,

    /// Particle lifetime (seconds)
    pub particle_life_s: f32,

    /// Maximum live particles
    pub max_particles: usize,

    /// Seed for the particle field
    pub particle_seed: u64,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            highlight_gain: 1.5,
            expand_gain: 0.5,
            revolve_rate: 0.6,
            blur_radius: 2,
            particle_rate: 600.0,
            particle_life_s: 1.2,
            max_particles: 2000,
            particle_seed: 7,
        }
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames and audio
    pub output_dir: String,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32, output_dir: impl Into<String>) -> Self {
        Self {
            duration_secs,
            output_dir: output_dir.into(),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Fixed timestep between recorded frames (seconds)
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps as f32
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> String {
        format!("{}/frames", self.output_dir)
    }

    /// Audio file path
    pub fn audio_path(&self) -> String {
        format!("{}/audio.wav", self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_frame_count() {
        let config = RecordingConfig::new(2.5, "out");
        assert_eq!(config.total_frames(), 150);
        assert_eq!(config.frames_dir(), "out/frames");
        assert_eq!(config.audio_path(), "out/audio.wav");
    }
}
