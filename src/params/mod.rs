//! Parameter definitions with units and documented semantics.
//!
//! All tunables live here with:
//! - Units (seconds, Hz, radians, world units, pixels)
//! - Documented ranges and meanings
//! - Defaults usable without a config file

mod audio;
mod camera;
mod modes;
mod render;

use serde::Deserialize;
use std::path::Path;

use crate::error::VisualizerError;

// Re-export all types
pub use audio::{FFTConfig, InputConfig};
pub use camera::CameraParams;
pub use modes::{DropletParams, TerrainParams, VortexParams};
pub use render::{EffectParams, RecordingConfig, RenderConfig};

/// Complete visualizer configuration, loadable from TOML
///
/// Missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub fft: FFTConfig,
    pub input: InputConfig,
    pub vortex: VortexParams,
    pub terrain: TerrainParams,
    pub droplet: DropletParams,
    pub camera: CameraParams,
    pub effects: EffectParams,
    pub render: RenderConfig,
}

impl VisualizerConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, VisualizerError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VisualizerError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<(), VisualizerError> {
        self.fft.validate()?;

        if self.terrain.rows < 2 || self.terrain.cols < 2 {
            return Err(VisualizerError::Config(
                "Terrain grid needs at least 2x2 vertices".to_string(),
            ));
        }
        if self.terrain.scroll_speed <= 0.0 {
            return Err(VisualizerError::Config(
                "Terrain scroll speed must be > 0".to_string(),
            ));
        }
        if self.droplet.ring_count == 0 || self.droplet.segments < 3 {
            return Err(VisualizerError::Config(
                "Droplet needs at least one ring and three segments".to_string(),
            ));
        }
        if self.droplet.decay_omega <= 0.0 || self.vortex.response_s <= 0.0 {
            return Err(VisualizerError::Config(
                "Decay rates and response times must be > 0".to_string(),
            ));
        }
        if !(self.effects.particle_life_s > 0.0) {
            return Err(VisualizerError::Config(format!(
                "Particle lifetime must be > 0, got {}",
                self.effects.particle_life_s
            )));
        }
        if self.render.canvas_width == 0 || self.render.canvas_height == 0 {
            return Err(VisualizerError::Config(
                "Canvas dimensions must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = VisualizerConfig::from_toml_str(
            r#"
            [fft]
            band_count = 12

            [camera]
            auto_pan_rate = 1.0
            "#,
        )
        .unwrap();

        assert_eq!(config.fft.band_count, 12);
        assert_eq!(config.fft.fft_size, FFTConfig::default().fft_size);
        assert_eq!(config.camera.auto_pan_rate, 1.0);
        assert_eq!(config.droplet.ring_count, DropletParams::default().ring_count);
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        let err = VisualizerConfig::from_toml_str("[fft]\nfft_size = 1000\n").unwrap_err();
        assert!(matches!(err, VisualizerError::Config(_)));

        let err = VisualizerConfig::from_toml_str("[fft]\nfft_size = \"big\"\n").unwrap_err();
        assert!(matches!(err, VisualizerError::Config(_)));
    }

    #[test]
    fn test_zero_particle_life_rejected() {
        let err = VisualizerConfig::from_toml_str("[effects]\nparticle_life_s = 0.0\n").unwrap_err();
        assert!(matches!(err, VisualizerError::Config(_)));

        let err = VisualizerConfig::from_toml_str("[effects]\nparticle_life_s = -1.0\n").unwrap_err();
        assert!(matches!(err, VisualizerError::Config(_)));

        assert!(VisualizerConfig::from_toml_str("[effects]\nparticle_life_s = 0.5\n").is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[render]\ncanvas_width = 320\ncanvas_height = 200").unwrap();

        let config = VisualizerConfig::load(file.path()).unwrap();
        assert_eq!(config.render.canvas_width, 320);
        assert_eq!(config.render.canvas_height, 200);
    }
}
