//! Frame-rate independent exponential smoothing.

/// Exponential smoother with a time constant in seconds
///
/// After `tau` seconds the value has covered ~63% of the distance to a
/// constant target, regardless of how the time was split into frames.
#[derive(Debug, Clone, Copy)]
pub struct Smoother {
    value: f32,
    time_constant_s: f32,
}

impl Smoother {
    pub fn new(time_constant_s: f32) -> Self {
        Self {
            value: 0.0,
            time_constant_s,
        }
    }

    /// Move toward `target` over `dt` seconds and return the new value
    pub fn update(&mut self, target: f32, dt: f32) -> f32 {
        if dt > 0.0 {
            let alpha = 1.0 - (-dt / self.time_constant_s).exp();
            self.value += (target - self.value) * alpha;
        }
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self, value: f32) {
        self.value = value;
    }
}
