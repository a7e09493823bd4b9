//! Error types for audio input, rendering, and configuration.

use thiserror::Error;

/// Errors raised by audio sources
#[derive(Debug, Error)]
pub enum AudioError {
    /// Selected device disappeared or stopped delivering frames (recoverable)
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),

    /// No device matched the selector
    #[error("no audio input device found: {0}")]
    NoDevice(String),

    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("audio stream error: {0}")]
    Stream(String),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),
}

impl AudioError {
    /// Whether the frame loop should fall back to silence rather than stop
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AudioError::DeviceUnavailable(_) | AudioError::Stream(_))
    }
}

impl From<cpal::DevicesError> for AudioError {
    fn from(err: cpal::DevicesError) -> Self {
        AudioError::NoDevice(format!("failed to enumerate devices: {}", err))
    }
}

impl From<cpal::DeviceNameError> for AudioError {
    fn from(err: cpal::DeviceNameError) -> Self {
        AudioError::DeviceUnavailable(format!("failed to get device name: {}", err))
    }
}

impl From<cpal::DefaultStreamConfigError> for AudioError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        AudioError::DeviceUnavailable(format!("failed to get default stream config: {}", err))
    }
}

impl From<cpal::BuildStreamError> for AudioError {
    fn from(err: cpal::BuildStreamError) -> Self {
        match err {
            cpal::BuildStreamError::DeviceNotAvailable => {
                AudioError::DeviceUnavailable("device not available".to_string())
            }
            other => AudioError::Stream(format!("failed to build input stream: {}", other)),
        }
    }
}

impl From<cpal::PlayStreamError> for AudioError {
    fn from(err: cpal::PlayStreamError) -> Self {
        match err {
            cpal::PlayStreamError::DeviceNotAvailable => {
                AudioError::DeviceUnavailable("device not available".to_string())
            }
            other => AudioError::Stream(format!("failed to start input stream: {}", other)),
        }
    }
}

/// Top-level visualizer errors
#[derive(Debug, Error)]
pub enum VisualizerError {
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// Unknown mode name or index reached the mode switcher
    #[error("invalid mode transition: {0}")]
    InvalidModeTransition(String),

    /// Surface was lost or outdated; the frame is skipped and retried next tick
    #[error("render surface lost")]
    RenderSurfaceLost,

    #[error("render error: {0}")]
    Render(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl VisualizerError {
    /// Whether the frame loop can continue after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            VisualizerError::Audio(e) => e.is_recoverable(),
            VisualizerError::RenderSurfaceLost => true,
            _ => false,
        }
    }
}

impl From<toml::de::Error> for VisualizerError {
    fn from(err: toml::de::Error) -> Self {
        VisualizerError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VisualizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(VisualizerError::RenderSurfaceLost.is_recoverable());
        assert!(VisualizerError::from(AudioError::DeviceUnavailable("gone".into())).is_recoverable());
        assert!(!VisualizerError::InvalidModeTransition("bogus".into()).is_recoverable());
        assert!(!VisualizerError::Config("bad".into()).is_recoverable());
    }
}
