//! Signal feature extraction: FFT bands, smoothing, sensitivity.

mod bands;
mod extractor;
mod fft;
mod smoothing;

// Re-export public types
pub use bands::SpectralBands;
pub use extractor::{FeatureExtractor, Features};
pub use fft::{hann_window, SpectrumAnalyzer};
pub use smoothing::Smoother;
