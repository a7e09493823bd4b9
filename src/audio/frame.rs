//! Fixed-size mono sample frames.

/// One time slice of mono samples
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioFrame {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Zero-filled frame used when no device is delivering audio
    pub fn silent(len: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Root-mean-square amplitude
    pub fn rms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f32 = self.samples.iter().map(|s| s * s).sum();
        (sum_sq / self.samples.len() as f32).sqrt()
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
    }

    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|&s| s == 0.0)
    }
}

/// Downmixes interleaved input and cuts it into overlapping frames
///
/// Frames overlap by 50%: a frame is emitted every `frame_size / 2` samples.
#[derive(Debug)]
pub struct FrameAssembler {
    frame_size: usize,
    hop_size: usize,
    channels: usize,
    sample_rate: u32,
    pending: Vec<f32>,
}

impl FrameAssembler {
    pub fn new(frame_size: usize, channels: usize, sample_rate: u32) -> Self {
        Self {
            frame_size,
            hop_size: (frame_size / 2).max(1),
            channels: channels.max(1),
            sample_rate,
            pending: Vec::with_capacity(frame_size * 2),
        }
    }

    /// Push interleaved samples; `emit` is called for every completed frame
    pub fn push_interleaved<F>(&mut self, data: &[f32], mut emit: F)
    where
        F: FnMut(AudioFrame),
    {
        for chunk in data.chunks(self.channels) {
            let mono = chunk.iter().sum::<f32>() / chunk.len() as f32;
            self.pending.push(mono);

            if self.pending.len() >= self.frame_size {
                emit(AudioFrame::new(
                    self.pending[..self.frame_size].to_vec(),
                    self.sample_rate,
                ));
                self.pending.drain(0..self.hop_size);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_and_peak() {
        let frame = AudioFrame::new(vec![0.5, -0.5, 0.5, -0.5], 44100);
        assert!((frame.rms() - 0.5).abs() < 1e-6);
        assert_eq!(frame.peak(), 0.5);
        assert!(!frame.is_silent());

        let silent = AudioFrame::silent(8, 44100);
        assert_eq!(silent.rms(), 0.0);
        assert!(silent.is_silent());
    }

    #[test]
    fn test_assembler_downmixes_and_overlaps() {
        let mut assembler = FrameAssembler::new(4, 2, 48000);
        let mut frames = Vec::new();

        // Stereo pairs average to 1.0, 2.0, ... 8.0
        let data: Vec<f32> = (1..=8)
            .flat_map(|v| [v as f32 - 0.5, v as f32 + 0.5])
            .collect();
        assembler.push_interleaved(&data, |f| frames.push(f));

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].samples(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(frames[1].samples(), &[3.0, 4.0, 5.0, 6.0]);
        assert_eq!(frames[2].samples(), &[5.0, 6.0, 7.0, 8.0]);
        assert_eq!(frames[0].sample_rate(), 48000);
    }
}
