//! Audio input: live devices, WAV playback, and the silent-fallback adapter.
//!
//! Producers (the cpal callback or a WAV pacing thread) publish complete
//! frames into a [`FrameSlot`]; the render thread reads the latest one without
//! blocking on capture.

mod adapter;
mod device;
mod frame;
mod slot;
mod wav;

use std::time::Duration;

use crate::error::AudioError;

// Re-export public types
pub use adapter::{AudioInputAdapter, InputStatus};
pub use device::{list_input_devices, open_device, DeviceSelector, DeviceSource};
pub use frame::{AudioFrame, FrameAssembler};
pub use slot::{FrameSlot, SlotRead, SlotReader};
pub use wav::{read_wav_mono, WavSource};

/// Anything that can deliver audio frames to the adapter
pub trait FrameSource {
    /// Human-readable description for logs and warnings
    fn describe(&self) -> String;

    fn sample_rate(&self) -> u32;

    /// Wait up to `wait` for a new frame; `Ok(None)` if none arrived
    fn next_frame(&mut self, wait: Duration) -> Result<Option<AudioFrame>, AudioError>;

    /// Start collecting every new sample the producer emits; `false` if unsupported
    fn start_tap(&mut self) -> bool {
        false
    }

    /// Samples collected since the last drain, or `None` when no tap is running
    fn drain_tap(&mut self) -> Option<Vec<f32>> {
        None
    }
}

/// Source producing zero-filled frames
#[derive(Debug, Clone)]
pub struct SilentSource {
    frame_size: usize,
    sample_rate: u32,
}

impl SilentSource {
    pub fn new(frame_size: usize, sample_rate: u32) -> Self {
        Self {
            frame_size,
            sample_rate,
        }
    }
}

impl FrameSource for SilentSource {
    fn describe(&self) -> String {
        "silence".to_string()
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn next_frame(&mut self, _wait: Duration) -> Result<Option<AudioFrame>, AudioError> {
        Ok(Some(AudioFrame::silent(self.frame_size, self.sample_rate)))
    }
}
