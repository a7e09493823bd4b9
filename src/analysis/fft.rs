//! Windowed FFT and band extraction.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::ops::Range;
use std::sync::Arc;
use tracing::debug;

use super::bands::SpectralBands;
use crate::audio::AudioFrame;
use crate::params::FFTConfig;

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

/// Turns audio frames into [`SpectralBands`]
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    /// Scale so a full-scale sinusoid reads ~1.0 in its bin
    magnitude_scale: f32,
    band_bins: Vec<Range<usize>>,
    buffer: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl SpectrumAnalyzer {
    pub fn new(config: &FFTConfig) -> Self {
        let size = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);

        let window: Vec<f32> = (0..size).map(|i| hann_window(i, size)).collect();
        let window_sum: f32 = window.iter().sum();
        let band_bins = config.band_bins();

        debug!(
            "SpectrumAnalyzer: fft_size={}, sample_rate={}, bands={:?}",
            size, config.sample_rate_hz, band_bins
        );

        Self {
            fft,
            window,
            magnitude_scale: 2.0 / window_sum,
            band_bins,
            buffer: vec![Complex::new(0.0, 0.0); size],
            magnitudes: vec![0.0; config.bin_count()],
        }
    }

    /// Normalized magnitudes of the positive-frequency bins from the last analysis
    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    /// Analyze one frame; short frames are zero-padded, long ones truncated
    pub fn analyze(&mut self, frame: &AudioFrame) -> SpectralBands {
        let samples = frame.samples();
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = samples.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.buffer);

        for (mag, bin) in self.magnitudes.iter_mut().zip(&self.buffer) {
            *mag = bin.norm() * self.magnitude_scale;
        }

        let energies = self
            .band_bins
            .iter()
            .map(|bins| {
                let slice = &self.magnitudes[bins.clone()];
                slice.iter().sum::<f32>() / slice.len() as f32
            })
            .collect();

        SpectralBands::new(energies)
    }
}
