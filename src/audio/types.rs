use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AudioError, Result};

/// Decoded audio with metadata
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Audio samples (interleaved for stereo, mono for single channel)
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Duration in seconds
    pub duration: f64,

    /// File the audio was decoded from, if any
    pub source: Option<PathBuf>,

    /// Audio format information
    pub format: AudioFormat,
}

impl AudioData {
    /// Wrap interleaved samples produced in memory
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        let channels = channels.max(1);
        let duration = if sample_rate == 0 {
            0.0
        } else {
            (samples.len() / channels as usize) as f64 / sample_rate as f64
        };

        Self {
            samples,
            sample_rate,
            channels,
            duration,
            source: None,
            format: AudioFormat::pcm(),
        }
    }

    /// Silence of the given length
    pub fn silence(sample_rate: u32, channels: u16, seconds: f64) -> Self {
        let frames = seconds_to_frames(seconds, sample_rate);
        Self::from_samples(vec![0.0; frames * channels.max(1) as usize], sample_rate, channels)
    }

    /// Number of sample frames (one sample per channel)
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    /// Get mono mix of all channels
    pub fn mono_samples(&self) -> Vec<f32> {
        if self.channels == 1 {
            return self.samples.clone();
        }

        let mut mono = Vec::with_capacity(self.frame_count());

        for chunk in self.samples.chunks(self.channels as usize) {
            let sum: f32 = chunk.iter().sum();
            mono.push(sum / self.channels as f32);
        }

        mono
    }

    /// Convert to the given rate and channel count
    ///
    /// Channels are mixed down to mono and duplicated back up as needed, then the
    /// result is linearly resampled.
    pub fn to_format(&self, sample_rate: u32, channels: u16) -> Result<Self> {
        if sample_rate == 0 || channels == 0 {
            return Err(AudioError::InvalidParameters {
                details: format!("target format {} Hz, {} channels", sample_rate, channels),
            }
            .into());
        }

        if self.sample_rate == sample_rate && self.channels == channels {
            return Ok(self.clone());
        }

        let mono = self.mono_samples();
        let mono = if self.sample_rate == sample_rate {
            mono
        } else {
            resample_linear(&mono, self.sample_rate, sample_rate)
        };

        let samples = if channels == 1 {
            mono
        } else {
            mono.iter()
                .flat_map(|&s| std::iter::repeat(s).take(channels as usize))
                .collect()
        };

        let mut converted = Self::from_samples(samples, sample_rate, channels);
        converted.source = self.source.clone();
        Ok(converted)
    }

    /// Copy out the span between `start` and `end` seconds, clamped to the clip
    pub fn slice(&self, start: f64, end: f64) -> Self {
        let ch = self.channels.max(1) as usize;
        let total = self.frame_count();
        let first = seconds_to_frames(start.max(0.0), self.sample_rate).min(total);
        let last = seconds_to_frames(end.max(0.0), self.sample_rate).clamp(first, total);

        let mut sliced =
            Self::from_samples(self.samples[first * ch..last * ch].to_vec(), self.sample_rate, self.channels);
        sliced.source = self.source.clone();
        sliced
    }

    /// Scale every sample by `factor`
    pub fn gain(mut self, factor: f32) -> Self {
        for sample in &mut self.samples {
            *sample *= factor;
        }
        self
    }

    /// Append tracks end to end; all must share one format
    pub fn concat(tracks: &[AudioData]) -> Result<Self> {
        let first = tracks.first().ok_or_else(|| AudioError::InvalidParameters {
            details: "nothing to concatenate".to_string(),
        })?;

        let mut samples = Vec::with_capacity(tracks.iter().map(|t| t.samples.len()).sum());
        for track in tracks {
            if track.sample_rate != first.sample_rate || track.channels != first.channels {
                return Err(AudioError::InvalidParameters {
                    details: format!(
                        "cannot join {} Hz/{}ch with {} Hz/{}ch",
                        first.sample_rate, first.channels, track.sample_rate, track.channels
                    ),
                }
                .into());
            }
            samples.extend_from_slice(&track.samples);
        }

        Ok(Self::from_samples(samples, first.sample_rate, first.channels))
    }

    /// Write as 16-bit PCM WAV
    pub fn write_wav<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let write_failed = |e: hound::Error| AudioError::WriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(path, spec).map_err(write_failed)?;
        for &sample in &self.samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
            writer.write_sample(value).map_err(write_failed)?;
        }
        writer.finalize().map_err(write_failed)?;

        Ok(())
    }
}

pub(crate) fn seconds_to_frames(seconds: f64, sample_rate: u32) -> usize {
    (seconds.max(0.0) * sample_rate as f64).round() as usize
}

fn resample_linear(input: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if input.is_empty() || from_rate == 0 {
        return Vec::new();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = ((input.len() as f64) / ratio).round() as usize;
    let last = input.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let idx = (pos.floor() as usize).min(last);
            let next = (idx + 1).min(last);
            let frac = (pos - idx as f64) as f32;
            input[idx] * (1.0 - frac) + input[next] * frac
        })
        .collect()
}

/// Audio file format information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFormat {
    /// File extension (wav, mp3, flac, etc.)
    pub extension: String,

    /// Bit depth (16, 24, 32, etc.)
    pub bit_depth: Option<u16>,

    /// Compression type (if any)
    pub compression: Option<String>,
}

impl AudioFormat {
    /// In-memory PCM
    pub fn pcm() -> Self {
        Self {
            extension: "wav".to_string(),
            bit_depth: None,
            compression: None,
        }
    }
}
