use tracing::debug;

use crate::audio::types::{seconds_to_frames, AudioData};
use crate::error::Result;

/// Fixed-length mixing buffer
///
/// Clips are converted to the mixer's format and summed at their start offsets. Anything
/// running past the end of the buffer is dropped; unfilled space stays silent.
pub struct Mixer {
    buffer: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl Mixer {
    pub fn new(sample_rate: u32, channels: u16, duration: f64) -> Self {
        let channels = channels.max(1);
        let frames = seconds_to_frames(duration, sample_rate);
        Self {
            buffer: vec![0.0; frames * channels as usize],
            sample_rate,
            channels,
        }
    }

    pub fn duration(&self) -> f64 {
        (self.buffer.len() / self.channels as usize) as f64 / self.sample_rate as f64
    }

    /// Sum `clip` into the buffer starting at `at` seconds
    pub fn place(&mut self, clip: &AudioData, at: f64) -> Result<()> {
        let clip = clip.to_format(self.sample_rate, self.channels)?;
        let offset = seconds_to_frames(at, self.sample_rate) * self.channels as usize;

        if offset >= self.buffer.len() {
            debug!("Clip at {:.2}s starts past the {:.2}s buffer, skipping", at, self.duration());
            return Ok(());
        }

        let available = self.buffer.len() - offset;
        if clip.samples.len() > available {
            debug!(
                "Truncating clip at {:.2}s ({:.2}s) to fit buffer",
                at, clip.duration
            );
        }

        for (dst, src) in self.buffer[offset..].iter_mut().zip(clip.samples.iter()) {
            *dst += *src;
        }

        Ok(())
    }

    /// Clamp and return the mixed track
    pub fn finish(self) -> AudioData {
        let samples = self.buffer.into_iter().map(|s| s.clamp(-1.0, 1.0)).collect();
        AudioData::from_samples(samples, self.sample_rate, self.channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_is_silence_padded() {
        let mut mixer = Mixer::new(10, 1, 2.0);
        mixer.place(&AudioData::from_samples(vec![0.5; 5], 10, 1), 0.0).unwrap();

        let track = mixer.finish();
        assert_eq!(track.frame_count(), 20);
        assert_eq!(track.samples[4], 0.5);
        assert_eq!(track.samples[5], 0.0);
        assert_eq!(track.samples[19], 0.0);
    }

    #[test]
    fn test_overlapping_clips_sum_and_clamp() {
        let mut mixer = Mixer::new(10, 1, 1.0);
        mixer.place(&AudioData::from_samples(vec![0.6; 10], 10, 1), 0.0).unwrap();
        mixer.place(&AudioData::from_samples(vec![0.1; 2], 10, 1), 0.5).unwrap();
        mixer.place(&AudioData::from_samples(vec![0.9; 1], 10, 1), 0.9).unwrap();

        let track = mixer.finish();
        assert!((track.samples[5] - 0.7).abs() < 1e-6);
        assert!((track.samples[4] - 0.6).abs() < 1e-6);
        assert_eq!(track.samples[9], 1.0);
    }

    #[test]
    fn test_overflow_is_truncated() {
        let mut mixer = Mixer::new(10, 1, 1.0);
        mixer.place(&AudioData::from_samples(vec![0.2; 30], 10, 1), 0.5).unwrap();
        mixer.place(&AudioData::from_samples(vec![0.2; 30], 10, 1), 4.0).unwrap();

        let track = mixer.finish();
        assert_eq!(track.frame_count(), 10);
        assert_eq!(track.samples[4], 0.0);
        assert!((track.samples[9] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_clips_are_converted_to_mixer_format() {
        let mut mixer = Mixer::new(20, 2, 1.0);
        mixer.place(&AudioData::from_samples(vec![0.4; 10], 10, 1), 0.0).unwrap();

        let track = mixer.finish();
        assert_eq!(track.channels, 2);
        assert_eq!(track.frame_count(), 20);
        assert!((track.samples[0] - 0.4).abs() < 1e-6);
        assert!((track.samples[1] - 0.4).abs() < 1e-6);
    }
}
