//! Live input devices via cpal.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::frame::{AudioFrame, FrameAssembler};
use super::slot::{FrameSlot, SlotReader};
use super::FrameSource;
use crate::error::AudioError;

/// Which input device to open
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeviceSelector {
    #[default]
    Default,
    Name(String),
    Index(usize),
}

/// Names of the available input devices, in host order
pub fn list_input_devices() -> Result<Vec<String>, AudioError> {
    let host = cpal::default_host();
    let names = host
        .input_devices()?
        .map(|d| d.name().unwrap_or_else(|_| "Unknown".to_string()))
        .collect();
    Ok(names)
}

fn find_device(selector: &DeviceSelector) -> Result<cpal::Device, AudioError> {
    let host = cpal::default_host();
    match selector {
        DeviceSelector::Default => host
            .default_input_device()
            .ok_or_else(|| AudioError::NoDevice("no default input device".to_string())),
        DeviceSelector::Name(name) => host
            .input_devices()?
            .find(|d| d.name().map(|n| n == *name).unwrap_or(false))
            .ok_or_else(|| AudioError::NoDevice(format!("no input device named '{}'", name))),
        DeviceSelector::Index(index) => host
            .input_devices()?
            .nth(*index)
            .ok_or_else(|| AudioError::NoDevice(format!("no input device at index {}", index))),
    }
}

/// Open an input device and start capturing frames of `frame_size` samples
pub fn open_device(
    selector: &DeviceSelector,
    frame_size: usize,
    stall_timeout: Duration,
) -> Result<DeviceSource, AudioError> {
    let device = find_device(selector)?;
    let name = device.name()?;

    let supported = device.default_input_config()?;
    let sample_rate = supported.sample_rate().0;
    let channels = supported.channels() as usize;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.config();

    info!(
        "Audio input: {} @ {}Hz, {} channel(s), {:?}",
        name, sample_rate, channels, sample_format
    );

    let slot = FrameSlot::new();
    let assembler = FrameAssembler::new(frame_size, channels, sample_rate);

    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, assembler, &slot)?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, assembler, &slot)?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, assembler, &slot)?,
        other => return Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
    };
    stream.play()?;

    Ok(DeviceSource {
        name,
        sample_rate,
        reader: SlotReader::new(slot, stall_timeout),
        _stream: stream,
    })
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut assembler: FrameAssembler,
    slot: &Arc<FrameSlot>,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let data_slot = Arc::clone(slot);
    let error_slot = Arc::clone(slot);
    let mut scratch: Vec<f32> = Vec::new();

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            scratch.clear();
            scratch.extend(data.iter().map(|&s| f32::from_sample(s)));
            assembler.push_interleaved(&scratch, |frame| data_slot.publish(frame));
        },
        move |err| match err {
            cpal::StreamError::DeviceNotAvailable => {
                warn!("Audio input device disappeared");
                error_slot.disconnect("device not available");
            }
            other => warn!("Audio stream error: {}", other),
        },
        None,
    )?;

    Ok(stream)
}

/// Capturing input device
pub struct DeviceSource {
    name: String,
    sample_rate: u32,
    reader: SlotReader,

    /// Input stream (kept alive; dropping it closes the device)
    _stream: cpal::Stream,
}

impl FrameSource for DeviceSource {
    fn describe(&self) -> String {
        format!("device '{}'", self.name)
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
