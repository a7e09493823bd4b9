//! Headless recording: one PNG per tick plus the input audio as WAV.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::engine::Engine;
use crate::error::{AudioError, VisualizerError};
use crate::params::RecordingConfig;
use crate::render::Canvas;

/// Writes captured frames and audio to the recording directory
pub struct Recorder {
    config: RecordingConfig,
    wav: hound::WavWriter<BufWriter<File>>,
    frames_written: usize,
    samples_written: usize,
}

impl Recorder {
    /// Create output directories and the WAV writer
    pub fn create(config: &RecordingConfig, sample_rate: u32) -> Result<Self, VisualizerError> {
        std::fs::create_dir_all(config.frames_dir())?;

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let wav = hound::WavWriter::create(config.audio_path(), spec).map_err(AudioError::from)?;

        Ok(Self {
            config: config.clone(),
            wav,
            frames_written: 0,
            samples_written: 0,
        })
    }

    /// Save the canvas as the next numbered frame
    pub fn capture(&mut self, canvas: &Canvas) -> Result<PathBuf, VisualizerError> {
        let path = PathBuf::from(self.config.frames_dir())
            .join(format!("frame_{:05}.png", self.frames_written));
        canvas.save_png(&path)?;
        self.frames_written += 1;
        Ok(path)
    }

    /// Append input samples to the audio track
    pub fn write_samples(&mut self, samples: &[f32]) -> Result<(), VisualizerError> {
        for &sample in samples {
            self.wav.write_sample(sample).map_err(AudioError::from)?;
        }
        self.samples_written += samples.len();
        Ok(())
    }

    /// Pad the audio track with silence up to `total` samples
    pub fn pad_to(&mut self, total: usize) -> Result<(), VisualizerError> {
        while self.samples_written < total {
            self.wav.write_sample(0.0f32).map_err(AudioError::from)?;
            self.samples_written += 1;
        }
        Ok(())
    }

    /// Flush and close the WAV file
    pub fn finish(self) -> Result<RecordingSummary, VisualizerError> {
        self.wav.finalize().map_err(AudioError::from)?;
        Ok(RecordingSummary {
            frames: self.frames_written,
            audio_samples: self.samples_written,
            output_dir: PathBuf::from(&self.config.output_dir),
        })
    }
}

/// What a finished recording produced
#[derive(Debug, Clone)]
pub struct RecordingSummary {
    pub frames: usize,
    pub audio_samples: usize,
    pub output_dir: PathBuf,
}

/// Drive `engine` at the recording frame rate and capture every tick
///
/// Ticks are paced to wall-clock time so live input lines up with the frames.
/// Audio comes from the input's sample tap so hops between ticks are kept;
/// without a tap the track is filled with silence.
pub fn record(engine: &mut Engine, config: &RecordingConfig) -> Result<RecordingSummary, VisualizerError> {
    let total = config.total_frames();
    let dt = config.frame_dt();
    let sample_rate = engine.sample_rate();
    info!(
        "Recording {} frames at {} fps into {}",
        total, config.fps, config.output_dir
    );

    let mut recorder = Recorder::create(config, sample_rate)?;
    if !engine.start_audio_tap() {
        debug!("Input has no sample tap; audio track will be silent");
    }
    // Samples the track must hold once `frames` frames have been captured
    let samples_for =
        |frames: usize| (frames as f64 * dt as f64 * sample_rate as f64).round() as usize;

    let start = Instant::now();
    for index in 0..total {
        sleep_until(start + Duration::from_secs_f32(index as f32 * dt));

        let canvas = engine.tick(dt);
        recorder.capture(canvas)?;
        match engine.drain_audio_tap() {
            Some(samples) => recorder.write_samples(&samples)?,
            None => recorder.pad_to(samples_for(index + 1))?,
        }

        if index % config.fps.max(1) as usize == 0 {
            debug!("Recorded frame {}/{}", index + 1, total);
        }
    }

    // Collect the audio played during the last frame, then cover any shortfall
    sleep_until(start + Duration::from_secs_f32(total as f32 * dt));
    if let Some(samples) = engine.drain_audio_tap() {
        recorder.write_samples(&samples)?;
    }
    recorder.pad_to(samples_for(total))?;

    let summary = recorder.finish()?;
    info!(
        "Recording complete: {} frames, {:.1}s of audio",
        summary.frames,
        summary.audio_samples as f32 / sample_rate.max(1) as f32
    );
    Ok(summary)
}

fn sleep_until(deadline: Instant) {
    if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
        thread::sleep(wait);
    }
}
