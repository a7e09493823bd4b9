//! Audio input adapter with silent fallback.

use std::time::Duration;
use tracing::{info, warn};

use super::frame::AudioFrame;
use super::FrameSource;
use crate::error::AudioError;

/// Whether the adapter is reading a source or substituting silence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStatus {
    Live,
    Silent,
}

/// Wraps a [`FrameSource`] so the frame loop never stalls or fails on audio
///
/// Per-tick polls never wait and blocking reads wait at most one frame
/// period. Source failures switch the adapter to zero-filled frames and
/// leave a warning for the UI layer.
pub struct AudioInputAdapter {
    source: Option<Box<dyn FrameSource>>,
    frame_size: usize,
    sample_rate: u32,
    frame_period: Duration,
    last_frame: AudioFrame,
    status: InputStatus,
    warning: Option<String>,
}

impl AudioInputAdapter {
    /// Start reading `source`, waiting at most `grace` for its first frame
    pub fn start(source: Box<dyn FrameSource>, frame_size: usize, grace: Duration) -> Self {
        let sample_rate = source.sample_rate();
        let description = source.describe();
        let mut adapter = Self {
            source: Some(source),
            ..Self::silent(frame_size, sample_rate)
        };
        adapter.status = InputStatus::Live;

        let first = match adapter.source.as_mut() {
            Some(source) => source.next_frame(grace),
            None => Ok(None),
        };
        match first {
            Ok(Some(frame)) => {
                info!("Receiving audio from {}", description);
                adapter.last_frame = frame;
            }
            Ok(None) => adapter.fall_back(AudioError::DeviceUnavailable(format!(
                "{} produced no audio within {:?}",
                description, grace
            ))),
            Err(err) => adapter.fall_back(err),
        }

        adapter
    }

    /// Adapter with no source; every read yields silence
    pub fn silent(frame_size: usize, sample_rate: u32) -> Self {
        let frame_period = Duration::from_secs_f32(frame_size as f32 / sample_rate.max(1) as f32);
        Self {
            source: None,
            frame_size,
            sample_rate,
            frame_period,
            last_frame: AudioFrame::silent(frame_size, sample_rate),
            status: InputStatus::Silent,
            warning: None,
        }
    }

    /// Adapter for a source that could not be opened; the failure becomes the pending warning
    pub fn unavailable(err: AudioError, frame_size: usize, sample_rate: u32) -> Self {
        let mut adapter = Self::silent(frame_size, sample_rate);
        adapter.fall_back(err);
        adapter
    }

    /// Latest fresh frame without waiting, or `None` if nothing new has been published
    ///
    /// In silent fallback every call returns a zero-filled frame.
    pub fn poll_frame(&mut self) -> Option<AudioFrame> {
        self.next_within(Duration::ZERO)
    }

    /// Blocking read (at most one frame period); repeats the previous frame when nothing new arrived
    pub fn read_frame(&mut self) -> AudioFrame {
        match self.next_within(self.frame_period) {
            Some(frame) => frame,
            None => self.last_frame.clone(),
        }
    }

    fn next_within(&mut self, wait: Duration) -> Option<AudioFrame> {
        let Some(source) = self.source.as_mut() else {
            return Some(self.last_frame.clone());
        };

        match source.next_frame(wait) {
            Ok(Some(frame)) => {
                self.last_frame = frame.clone();
                Some(frame)
            }
            Ok(None) => None,
            Err(err) => {
                self.fall_back(err);
                Some(self.last_frame.clone())
            }
        }
    }

    /// Ask the source to keep every sample it produces for recording
    ///
    /// Returns `false` when there is no live source or it cannot tap.
    pub fn start_tap(&mut self) -> bool {
        self.source.as_mut().is_some_and(|source| source.start_tap())
    }

    /// Samples tapped since the last drain; `None` once the source is gone
    pub fn drain_tap(&mut self) -> Option<Vec<f32>> {
        self.source.as_mut().and_then(|source| source.drain_tap())
    }

    fn fall_back(&mut self, err: AudioError) {
        let message = match self.source.as_ref() {
            Some(source) => format!("{}: {}; continuing with silence", source.describe(), err),
            None => format!("{}; continuing with silence", err),
        };
        warn!("{}", message);

        self.source = None;
        self.status = InputStatus::Silent;
        self.last_frame = AudioFrame::silent(self.frame_size, self.sample_rate);
        self.warning = Some(message);
    }

    /// Pending recoverable warning for the UI layer (cleared on read)
    pub fn take_warning(&mut self) -> Option<String> {
        self.warning.take()
    }

    pub fn status(&self) -> InputStatus {
        self.status
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn frame_period(&self) -> Duration {
        self.frame_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::Instant;

    /// Replays a fixed script of source results
    struct ScriptedSource {
        script: VecDeque<Result<Option<AudioFrame>, AudioError>>,
    }

    impl ScriptedSource {
        fn boxed(script: Vec<Result<Option<AudioFrame>, AudioError>>) -> Box<dyn FrameSource> {
            Box::new(Self {
                script: script.into(),
            })
        }
    }

    impl FrameSource for ScriptedSource {
        fn describe(&self) -> String {
            "scripted".to_string()
        }

        fn sample_rate(&self) -> u32 {
            1000
        }

        fn next_frame(&mut self, _wait: Duration) -> Result<Option<AudioFrame>, AudioError> {
            self.script.pop_front().unwrap_or(Ok(None))
        }
    }

    fn tone(value: f32) -> AudioFrame {
        AudioFrame::new(vec![value; 8], 1000)
    }

    #[test]
    fn test_live_source_frames_pass_through() {
        let mut adapter = AudioInputAdapter::start(
            ScriptedSource::boxed(vec![Ok(Some(tone(0.1))), Ok(Some(tone(0.2))), Ok(None)]),
            8,
            Duration::from_millis(10),
        );

        assert_eq!(adapter.status(), InputStatus::Live);
        assert_eq!(adapter.poll_frame(), Some(tone(0.2)));
        assert_eq!(adapter.poll_frame(), None);
        // No fresh frame: read_frame repeats the last one
        assert_eq!(adapter.read_frame(), tone(0.2));
        assert!(adapter.take_warning().is_none());
    }

    /// Sleeps for the whole wait on every call after the first frame
    struct StalledSource {
        started: bool,
    }

    impl FrameSource for StalledSource {
        fn describe(&self) -> String {
            "stalled".to_string()
        }

        fn sample_rate(&self) -> u32 {
            1000
        }

        fn next_frame(&mut self, wait: Duration) -> Result<Option<AudioFrame>, AudioError> {
            if !self.started {
                self.started = true;
                return Ok(Some(tone(0.1)));
            }
            std::thread::sleep(wait);
            Ok(None)
        }
    }

    #[test]
    fn test_poll_does_not_wait_on_stalled_source() {
        // 512 samples at 1 kHz: a blocking read would take half a second
        let mut adapter = AudioInputAdapter::start(
            Box::new(StalledSource { started: false }),
            512,
            Duration::from_millis(10),
        );

        let start = Instant::now();
        for _ in 0..10 {
            assert_eq!(adapter.poll_frame(), None);
        }
        assert!(start.elapsed() < Duration::from_millis(100));
        assert_eq!(adapter.status(), InputStatus::Live);
    }

    #[test]
    fn test_tap_unavailable_without_source() {
        let mut adapter = AudioInputAdapter::silent(8, 1000);
        assert!(!adapter.start_tap());
        assert!(adapter.drain_tap().is_none());

        let mut scripted = AudioInputAdapter::start(
            ScriptedSource::boxed(vec![Ok(Some(tone(0.1)))]),
            8,
            Duration::from_millis(10),
        );
        assert!(!scripted.start_tap());
    }

    #[test]
    fn test_no_first_frame_falls_back_to_silence() {
        let mut adapter = AudioInputAdapter::start(
            ScriptedSource::boxed(vec![Ok(None)]),
            8,
            Duration::from_millis(10),
        );

        assert_eq!(adapter.status(), InputStatus::Silent);
        assert!(adapter.take_warning().is_some());
        assert!(adapter.read_frame().is_silent());
    }

    #[test]
    fn test_disconnect_mid_run_yields_silence() {
        let mut adapter = AudioInputAdapter::start(
            ScriptedSource::boxed(vec![
                Ok(Some(tone(0.5))),
                Err(AudioError::DeviceUnavailable("unplugged".to_string())),
            ]),
            8,
            Duration::from_millis(10),
        );
        assert_eq!(adapter.status(), InputStatus::Live);

        let frame = adapter.read_frame();
        assert!(frame.is_silent());
        assert_eq!(frame.len(), 8);
        assert_eq!(adapter.status(), InputStatus::Silent);

        let warning = adapter.take_warning().unwrap();
        assert!(warning.contains("unplugged"));
        assert!(adapter.take_warning().is_none());

        for _ in 0..100 {
            assert!(adapter.poll_frame().unwrap().is_silent());
        }
    }

    #[test]
    fn test_unavailable_source_reports_warning() {
        let mut adapter =
            AudioInputAdapter::unavailable(AudioError::NoDevice("nothing plugged in".into()), 16, 8000);
        assert_eq!(adapter.status(), InputStatus::Silent);
        assert!(adapter.take_warning().unwrap().contains("nothing plugged in"));
        assert_eq!(adapter.read_frame().len(), 16);
    }
}
