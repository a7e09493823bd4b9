//! Spectral band energies handed to the visual modes.

/// Band energies ordered low to high frequency
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpectralBands(Vec<f32>);

impl SpectralBands {
    pub fn new(energies: Vec<f32>) -> Self {
        Self(energies)
    }

    pub fn zeros(count: usize) -> Self {
        Self(vec![0.0; count])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Energy of band `index`, 0.0 when out of range
    pub fn get(&self, index: usize) -> f32 {
        self.0.get(index).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.0.iter().copied()
    }

    /// Linearly interpolated energy at `position` in [0, 1] across the band axis
    pub fn sample(&self, position: f32) -> f32 {
        match self.0.len() {
            0 => 0.0,
            1 => self.0[0],
            n => {
                let x = position.clamp(0.0, 1.0) * (n - 1) as f32;
                let lo = x.floor() as usize;
                let hi = (lo + 1).min(n - 1);
                let t = x - lo as f32;
                self.0[lo] * (1.0 - t) + self.0[hi] * t
            }
        }
    }

    pub fn max(&self) -> f32 {
        self.0.iter().copied().fold(0.0f32, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_interpolates_between_bands() {
        let bands = SpectralBands::new(vec![0.0, 1.0, 0.0]);
        assert_eq!(bands.sample(0.0), 0.0);
        assert_eq!(bands.sample(0.5), 1.0);
        assert!((bands.sample(0.25) - 0.5).abs() < 1e-6);
        assert_eq!(bands.sample(2.0), 0.0);
        assert_eq!(SpectralBands::default().sample(0.5), 0.0);
    }

    #[test]
    fn test_get_out_of_range_is_zero() {
        let bands = SpectralBands::new(vec![0.3]);
        assert_eq!(bands.get(0), 0.3);
        assert_eq!(bands.get(5), 0.0);
    }
}
