//! Audio input and spectral analysis configuration.

use serde::Deserialize;
use std::ops::Range;
use std::time::Duration;

use crate::error::VisualizerError;

/// FFT analysis configuration with spectral band layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FFTConfig {
    /// Nominal sample rate (Hz); replaced by the device rate once a source is open
    pub sample_rate_hz: u32,

    /// FFT window size, also the audio frame size (must be power of 2)
    pub fft_size: usize,

    /// Number of spectral bands handed to the visual modes
    pub band_count: usize,

    /// Lowest band edge (Hz)
    pub min_hz: f32,

    /// Highest band edge (Hz)
    pub max_hz: f32,

    /// Exponential smoothing time constant (seconds)
    /// 0.12 s keeps bass hits readable without frame-to-frame flicker
    pub smoothing_s: f32,

    /// Initial sensitivity gain
    pub default_gain: f32,

    /// Upper bound for sensitivity gain
    pub max_gain: f32,
}

impl Default for FFTConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 1024,
            band_count: 24,
            min_hz: 40.0,
            max_hz: 12000.0,
            smoothing_s: 0.12,
            default_gain: 1.0,
            max_gain: 10.0,
        }
    }
}

impl FFTConfig {
    /// Convert frequency (Hz) to FFT bin index
    pub fn hz_to_bin(&self, hz: f32) -> usize {
        ((hz * self.fft_size as f32) / self.sample_rate_hz as f32) as usize
    }

    /// Number of usable (positive frequency) bins
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// FFT bin ranges for each band, log-spaced between `min_hz` and `max_hz`
    ///
    /// Every band covers at least one bin; narrow low bands may share a bin.
    pub fn band_bins(&self) -> Vec<Range<usize>> {
        let last_bin = self.bin_count().saturating_sub(1);
        let ratio = self.max_hz / self.min_hz;

        (0..self.band_count)
            .map(|i| {
                let lo_hz = self.min_hz * ratio.powf(i as f32 / self.band_count as f32);
                let hi_hz = self.min_hz * ratio.powf((i + 1) as f32 / self.band_count as f32);
                let start = self.hz_to_bin(lo_hz).min(last_bin);
                let end = self.hz_to_bin(hi_hz).clamp(start + 1, last_bin + 1);
                start..end
            })
            .collect()
    }

    /// Copy of this layout for a source running at `sample_rate`
    ///
    /// `max_hz` is clamped to the Nyquist frequency; above it every band
    /// would collapse onto the last bin.
    pub fn for_sample_rate(&self, sample_rate: u32) -> Self {
        let nyquist = sample_rate as f32 / 2.0;
        Self {
            sample_rate_hz: sample_rate,
            max_hz: self.max_hz.min(nyquist),
            ..self.clone()
        }
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), VisualizerError> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 64 {
            return Err(VisualizerError::Config(format!(
                "FFT size must be a power of 2 >= 64, got {}",
                self.fft_size
            )));
        }
        if self.sample_rate_hz == 0 {
            return Err(VisualizerError::Config("Sample rate must be > 0".to_string()));
        }
        if self.band_count == 0 {
            return Err(VisualizerError::Config("Band count must be > 0".to_string()));
        }
        if !(self.min_hz > 0.0 && self.min_hz < self.max_hz) {
            return Err(VisualizerError::Config(format!(
                "Band range must satisfy 0 < min_hz < max_hz, got {}..{}",
                self.min_hz, self.max_hz
            )));
        }
        if self.smoothing_s <= 0.0 {
            return Err(VisualizerError::Config(
                "Smoothing time constant must be > 0".to_string(),
            ));
        }
        if self.max_gain <= 0.0 {
            return Err(VisualizerError::Config("Max gain must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Audio input timing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Bounded wait for the first frame at startup (milliseconds)
    pub grace_period_ms: u64,

    /// A live source silent for this long is treated as disconnected (milliseconds)
    pub stall_timeout_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: 2000,
            stall_timeout_ms: 1500,
        }
    }
}

impl InputConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn stall_timeout(&self) -> Duration {
        Duration::from_millis(self.stall_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fft_config_hz_to_bin() {
        let config = FFTConfig::default();

        // 44100 / 1024 ≈ 43.07 Hz per bin
        assert_eq!(config.hz_to_bin(0.0), 0);
        assert_eq!(config.hz_to_bin(43.07), 1);
        assert_eq!(config.hz_to_bin(100.0), 2);
    }

    #[test]
    fn test_band_bins_cover_range_in_order() {
        let config = FFTConfig::default();
        let bins = config.band_bins();

        assert_eq!(bins.len(), config.band_count);
        for range in &bins {
            assert!(!range.is_empty());
            assert!(range.end <= config.bin_count());
        }
        for pair in bins.windows(2) {
            assert!(pair[1].start >= pair[0].start);
        }
        assert_eq!(bins.last().unwrap().end, config.hz_to_bin(config.max_hz));
    }

    #[test]
    fn test_low_rate_keeps_top_bands_distinct() {
        let config = FFTConfig::default().for_sample_rate(16_000);
        assert_eq!(config.sample_rate_hz, 16_000);
        assert_eq!(config.max_hz, 8000.0);

        let bins = config.band_bins();
        let n = bins.len();
        assert_ne!(bins[n - 1], bins[n - 2]);
        assert_ne!(bins[n - 2], bins[n - 3]);

        // Rates with headroom leave the range alone
        assert_eq!(FFTConfig::default().for_sample_rate(48_000).max_hz, 12000.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = FFTConfig::default();
        assert!(config.validate().is_ok());

        config.fft_size = 1000;
        assert!(config.validate().is_err());

        let config = FFTConfig {
            min_hz: 5000.0,
            max_hz: 100.0,
            ..FFTConfig::default()
        };
        assert!(config.validate().is_err());

        let config = FFTConfig {
            smoothing_s: 0.0,
            ..FFTConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
