//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use crate::audio::DeviceSelector;
use crate::camera::CameraView;
use crate::effects::EffectKind;
use crate::error::VisualizerError;
use crate::modes::ModeKind;
use crate::params::{RecordingConfig, VisualizerConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "animus")]
#[command(about = "Real-time audio-reactive visualizer", long_about = None)]
pub struct Args {
    /// Input device name (see --list-devices)
    #[arg(long, value_name = "NAME", conflicts_with = "device_index")]
    pub device: Option<String>,

    /// Input device index (see --list-devices)
    #[arg(long, value_name = "N")]
    pub device_index: Option<usize>,

    /// Print available input devices and exit
    #[arg(long)]
    pub list_devices: bool,

    /// Play a WAV file instead of capturing a device
    #[arg(long, value_name = "PATH", conflicts_with_all = ["device", "device_index"])]
    pub wav: Option<PathBuf>,

    /// Initial mode: vortex (default), terrain, droplet
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Initial camera: front (default), rear, top, mouse, pan
    #[arg(long, value_name = "VIEW")]
    pub camera: Option<String>,

    /// Sensitivity gain applied to audio level
    #[arg(long, value_name = "GAIN")]
    pub sensitivity: Option<f32>,

    /// Effects enabled at startup, comma separated (e.g. blur,invert)
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub effects: Vec<String>,

    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Record headless to PNG frames and WAV (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Output directory for recordings
    #[arg(long, value_name = "DIR", default_value = "recording")]
    pub output: String,
}

impl Args {
    /// Which input device to open
    pub fn device_selector(&self) -> DeviceSelector {
        match (&self.device, self.device_index) {
            (Some(name), _) => DeviceSelector::Name(name.clone()),
            (None, Some(index)) => DeviceSelector::Index(index),
            (None, None) => DeviceSelector::Default,
        }
    }

    /// Configuration file contents, or defaults when no file was given
    pub fn load_config(&self) -> Result<VisualizerConfig, VisualizerError> {
        match &self.config {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                VisualizerConfig::load(path)
            }
            None => Ok(VisualizerConfig::default()),
        }
    }

    /// Parse the requested starting mode
    pub fn initial_mode(&self) -> Result<Option<ModeKind>, VisualizerError> {
        self.mode.as_deref().map(str::parse).transpose()
    }

    /// Parse the requested starting camera view
    pub fn initial_camera(&self) -> Result<Option<CameraView>, VisualizerError> {
        self.camera
            .as_deref()
            .map(|s| s.parse().map_err(VisualizerError::Config))
            .transpose()
    }

    /// Parse the effects to enable at startup
    pub fn initial_effects(&self) -> Result<Vec<EffectKind>, VisualizerError> {
        self.effects
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse().map_err(VisualizerError::Config))
            .collect()
    }

    /// Create recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.record
            .map(|duration| RecordingConfig::new(duration, self.output.clone()))
    }
}
