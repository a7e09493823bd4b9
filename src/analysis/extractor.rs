//! Per-frame feature extraction: bands, smoothing, and sensitivity gain.

use tracing::debug;

use super::bands::SpectralBands;
use super::fft::SpectrumAnalyzer;
use super::smoothing::Smoother;
use crate::audio::AudioFrame;
use crate::params::FFTConfig;

/// Features consumed by the visual modes each frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Features {
    /// Smoothed, gain-scaled band energies
    pub bands: SpectralBands,

    /// Smoothed, gain-scaled overall level (frame RMS before scaling)
    pub level: f32,
}

impl Features {
    pub fn silent(band_count: usize) -> Self {
        Self {
            bands: SpectralBands::zeros(band_count),
            level: 0.0,
        }
    }
}

/// Converts audio frames into smoothed [`Features`]
///
/// Smoothing runs on the raw signal; gain is applied last so the output is
/// exactly linear in gain.
pub struct FeatureExtractor {
    analyzer: SpectrumAnalyzer,
    band_smoothers: Vec<Smoother>,
    level_smoother: Smoother,
    gain: f32,
    max_gain: f32,
    features: Features,
}

impl FeatureExtractor {
    /// Create an extractor for audio at `sample_rate` (overrides the config's nominal rate)
    pub fn new(config: &FFTConfig, sample_rate: u32) -> Self {
        let requested_max_hz = config.max_hz;
        let config = config.for_sample_rate(sample_rate);
        if config.max_hz < requested_max_hz {
            debug!(
                "Top band edge lowered from {} Hz to Nyquist ({} Hz)",
                requested_max_hz, config.max_hz
            );
        }

        let mut extractor = Self {
            analyzer: SpectrumAnalyzer::new(&config),
            band_smoothers: vec![Smoother::new(config.smoothing_s); config.band_count],
            level_smoother: Smoother::new(config.smoothing_s),
            gain: 0.0,
            max_gain: config.max_gain,
            features: Features::silent(config.band_count),
        };
        extractor.set_sensitivity(config.default_gain);
        extractor
    }

    /// Set the sensitivity gain, clamped to `[0, max_gain]`; returns the applied value
    pub fn set_sensitivity(&mut self, gain: f32) -> f32 {
        self.gain = if gain.is_nan() {
            0.0
        } else {
            gain.clamp(0.0, self.max_gain)
        };
        debug!("Sensitivity gain set to {:.2}", self.gain);
        self.gain
    }

    pub fn sensitivity(&self) -> f32 {
        self.gain
    }

    /// Analyze a fresh frame, advancing smoothing by `dt` seconds
    pub fn process(&mut self, frame: &AudioFrame, dt: f32) -> &Features {
        let raw = self.analyzer.analyze(frame);

        let bands = raw
            .iter()
            .zip(self.band_smoothers.iter_mut())
            .map(|(energy, smoother)| smoother.update(energy, dt) * self.gain)
            .collect();
        let level = self.level_smoother.update(frame.rms(), dt) * self.gain;

        self.features = Features {
            bands: SpectralBands::new(bands),
            level,
        };
        &self.features
    }

    /// Features from the last processed frame, unchanged
    pub fn hold(&self) -> &Features {
        &self.features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn loud_frame(config: &FFTConfig, amplitude: f32) -> AudioFrame {
        let samples = (0..config.fft_size)
            .map(|i| (i as f32 * 0.07).sin() * amplitude)
            .collect();
        AudioFrame::new(samples, config.sample_rate_hz)
    }

    #[test]
    fn test_zero_gain_gives_zero_level() {
        let config = FFTConfig::default();
        let mut extractor = FeatureExtractor::new(&config, config.sample_rate_hz);
        extractor.set_sensitivity(0.0);

        for _ in 0..10 {
            let features = extractor.process(&loud_frame(&config, 1.0), 1.0 / 60.0);
            assert_eq!(features.level, 0.0);
            assert!(features.bands.iter().all(|e| e == 0.0));
        }
    }

    #[test]
    fn test_gain_is_clamped() {
        let config = FFTConfig::default();
        let mut extractor = FeatureExtractor::new(&config, config.sample_rate_hz);

        assert_eq!(extractor.set_sensitivity(-3.0), 0.0);
        assert_eq!(extractor.set_sensitivity(1000.0), config.max_gain);
        assert_eq!(extractor.set_sensitivity(f32::NAN), 0.0);
    }

    #[test]
    fn test_smoothing_prevents_instant_jump() {
        let config = FFTConfig::default();
        let mut extractor = FeatureExtractor::new(&config, config.sample_rate_hz);
        let frame = loud_frame(&config, 1.0);

        let first = extractor.process(&frame, 1.0 / 60.0).level;
        assert!(first > 0.0 && first < frame.rms());

        let mut level = first;
        for _ in 0..120 {
            level = extractor.process(&frame, 1.0 / 60.0).level;
        }
        assert!((level - frame.rms()).abs() < 1e-3);
    }

    #[test]
    fn test_hold_returns_previous_features() {
        let config = FFTConfig::default();
        let mut extractor = FeatureExtractor::new(&config, config.sample_rate_hz);
        let processed = extractor.process(&loud_frame(&config, 0.5), 0.02).clone();
        assert_eq!(extractor.hold(), &processed);
    }

    proptest! {
        #[test]
        fn prop_level_linear_in_gain(
            gain_a in 0.01f32..10.0,
            gain_b in 0.01f32..10.0,
            amplitude in 0.01f32..1.0,
        ) {
            let config = FFTConfig::default();
            let frame = loud_frame(&config, amplitude);

            let mut a = FeatureExtractor::new(&config, config.sample_rate_hz);
            let mut b = FeatureExtractor::new(&config, config.sample_rate_hz);
            a.set_sensitivity(gain_a);
            b.set_sensitivity(gain_b);

            let level_a = a.process(&frame, 0.05).level;
            let level_b = b.process(&frame, 0.05).level;

            prop_assert!((level_a / gain_a - level_b / gain_b).abs() < 1e-5);
        }
    }
}
