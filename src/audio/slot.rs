//! Latest-frame handoff between a capture producer and the render thread.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::frame::AudioFrame;
use crate::error::AudioError;

#[derive(Debug, Default)]
struct SlotState {
    latest: Option<AudioFrame>,
    seq: u64,
    disconnected: Option<String>,
    /// New samples of every published frame, collected while a tap is running
    tap: Option<Vec<f32>>,
}

/// Result of waiting on a [`FrameSlot`]
#[derive(Debug)]
pub enum SlotRead {
    Frame { frame: AudioFrame, seq: u64 },
    Empty,
    Disconnected(String),
}

/// Lock-protected slot holding the most recent complete frame
///
/// The producer overwrites; the consumer never sees a partially written frame
/// and older unread frames are dropped.
#[derive(Debug, Default)]
pub struct FrameSlot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl FrameSlot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn publish(&self, frame: AudioFrame) {
        let mut state = self.state.lock();
        if let Some(tap) = state.tap.as_mut() {
            // Frames overlap by half; only the trailing half is new audio
            let samples = frame.samples();
            tap.extend_from_slice(&samples[samples.len() / 2..]);
        }
        state.latest = Some(frame);
        state.seq += 1;
        self.ready.notify_all();
    }

    /// Mark the producer as gone; waiting readers wake immediately
    pub fn disconnect(&self, reason: impl Into<String>) {
        let mut state = self.state.lock();
        state.disconnected = Some(reason.into());
        self.ready.notify_all();
    }

    /// Start collecting every published hop, including frames the reader never sees
    pub fn start_tap(&self) {
        self.state.lock().tap.get_or_insert_with(Vec::new);
    }

    /// Samples collected since the last drain, or `None` if no tap is running
    pub fn drain_tap(&self) -> Option<Vec<f32>> {
        self.state.lock().tap.as_mut().map(std::mem::take)
    }

    /// Wait up to `timeout` for a frame newer than `after_seq`
    pub fn wait_newer(&self, after_seq: u64, timeout: Duration) -> SlotRead {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();

        loop {
            if let Some(reason) = &state.disconnected {
                return SlotRead::Disconnected(reason.clone());
            }
            if state.seq > after_seq {
                if let Some(frame) = &state.latest {
                    return SlotRead::Frame {
                        frame: frame.clone(),
                        seq: state.seq,
                    };
                }
            }
            if Instant::now() >= deadline {
                return SlotRead::Empty;
            }
            self.ready.wait_until(&mut state, deadline);
        }
    }
}

/// Consumer side of a [`FrameSlot`] with stall detection
///
/// Once frames have started arriving, a gap longer than `stall_timeout` is
/// reported as `DeviceUnavailable` (virtual devices can vanish without an
/// error callback).
#[derive(Debug)]
pub struct SlotReader {
    slot: Arc<FrameSlot>,
    last_seq: u64,
    last_frame_at: Option<Instant>,
    stall_timeout: Duration,
}

impl SlotReader {
    pub fn new(slot: Arc<FrameSlot>, stall_timeout: Duration) -> Self {
        Self {
            slot,
            last_seq: 0,
            last_frame_at: None,
            stall_timeout,
        }
    }

    pub fn next(&mut self, wait: Duration) -> Result<Option<AudioFrame>, AudioError> {
        match self.slot.wait_newer(self.last_seq, wait) {
            SlotRead::Frame { frame, seq } => {
                self.last_seq = seq;
                self.last_frame_at = Some(Instant::now());
                Ok(Some(frame))
            }
            SlotRead::Empty => match self.last_frame_at {
                Some(at) if at.elapsed() > self.stall_timeout => {
                    Err(AudioError::DeviceUnavailable(format!(
                        "no audio received for {:?}",
                        at.elapsed()
                    )))
                }
                _ => Ok(None),
            },
            SlotRead::Disconnected(reason) => Err(AudioError::DeviceUnavailable(reason)),
        }
    }

    pub fn start_tap(&self) {
        self.slot.start_tap();
    }

    pub fn drain_tap(&self) -> Option<Vec<f32>> {
        self.slot.drain_tap()
    }
}
