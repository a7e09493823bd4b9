//! WAV file playback as an audio source.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::frame::{AudioFrame, FrameAssembler};
use super::slot::{FrameSlot, SlotReader};
use super::FrameSource;
use crate::error::AudioError;

/// Decode a WAV file into mono `f32` samples
pub fn read_wav_mono(path: impl AsRef<Path>) -> Result<(Vec<f32>, u32), AudioError> {
    let reader = hound::WavReader::open(path.as_ref())?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    let mono = interleaved
        .chunks(channels)
        .map(|c| c.iter().sum::<f32>() / c.len() as f32)
        .collect();

    Ok((mono, spec.sample_rate))
}

/// Plays a WAV file in real time (looping) through a [`FrameSlot`]
pub struct WavSource {
    name: String,
    sample_rate: u32,
    reader: SlotReader,
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl WavSource {
    pub fn open(
        path: impl AsRef<Path>,
        frame_size: usize,
        stall_timeout: Duration,
    ) -> Result<Self, AudioError> {
        let path = path.as_ref();
        let (samples, sample_rate) = read_wav_mono(path)?;
        if samples.is_empty() {
            return Err(AudioError::Stream(format!(
                "{} contains no samples",
                path.display()
            )));
        }

        info!(
            "Audio input: {} @ {}Hz, {:.1}s",
            path.display(),
            sample_rate,
            samples.len() as f32 / sample_rate as f32
        );

        let slot = FrameSlot::new();
        let stop = Arc::new(AtomicBool::new(false));
        let thread = spawn_playback_thread(
            samples,
            sample_rate,
            frame_size,
            Arc::clone(&slot),
            Arc::clone(&stop),
        );

        Ok(Self {
            name: path.display().to_string(),
            sample_rate,
            reader: SlotReader::new(slot, stall_timeout),
            stop,
            thread: Some(thread),
        })
    }
}

/// Feed the file into the slot one hop at a time, paced against the start time
fn spawn_playback_thread(
    samples: Vec<f32>,
    sample_rate: u32,
    frame_size: usize,
    slot: Arc<FrameSlot>,
    stop: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let hop = (frame_size / 2).max(1);
        let hop_duration = Duration::from_secs_f32(hop as f32 / sample_rate as f32);
        let mut assembler = FrameAssembler::new(frame_size, 1, sample_rate);
        let mut chunk = Vec::with_capacity(hop);
        let mut position = 0;
        let start = Instant::now();
        let mut hops: u32 = 0;

        while !stop.load(Ordering::Relaxed) {
            chunk.clear();
            for _ in 0..hop {
                chunk.push(samples[position]);
                position = (position + 1) % samples.len();
            }
            assembler.push_interleaved(&chunk, |frame| slot.publish(frame));

            // Sleep to an absolute deadline so playback does not drift behind real time
            hops += 1;
            let deadline = start + hop_duration * hops;
            if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
                thread::sleep(wait);
            }
        }
        debug!("WAV playback thread stopped");
    })
}

impl FrameSource for WavSource {
    fn describe(&self) -> String {
        format!("file '{}'", self.name)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn next_frame(&mut self, wait: Duration) -> Result<Option<AudioFrame>, AudioError> {
        self.reader.next(wait)
    }

    fn start_tap(&mut self) -> bool {
        self.reader.start_tap();
        true
    }

    fn drain_tap(&mut self) -> Option<Vec<f32>> {
        self.reader.drain_tap()
    }
}

impl Drop for WavSource {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}
