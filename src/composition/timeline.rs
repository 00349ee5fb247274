use serde::Serialize;

use crate::config::TimingConfig;

/// Durations of the two phases of a reel, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhasePlan {
    /// Prompt phase: the word alone
    pub prompt: f64,

    /// Reveal phase: heading, meaning and example
    pub reveal: f64,
}

/// Where the tick sound sits inside the prompt phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPlacement {
    pub start: f64,
    pub length: f64,
    pub volume: f32,
}

impl PhasePlan {
    /// Size both phases around the measured speech
    ///
    /// The prompt lasts the spoken word plus padding but never less than the configured
    /// minimum. The reveal lasts the narration plus padding.
    pub fn new(word_audio: f64, narration_audio: f64, timing: &TimingConfig) -> Self {
        let word_audio = word_audio.max(0.0);
        let narration_audio = narration_audio.max(0.0);

        let prompt = timing.prompt_min.max(word_audio + timing.prompt_padding);
        let mut reveal = narration_audio + timing.reveal_padding;
        if reveal <= 0.0 {
            // Zero padding with silent narration would leave an empty phase
            reveal = timing.prompt_min;
        }

        Self { prompt, reveal }
    }

    pub fn total(&self) -> f64 {
        self.prompt + self.reveal
    }

    /// Offset of the reveal within the video
    pub fn reveal_start(&self) -> f64 {
        self.prompt
    }

    /// Tick placement clipped to the prompt phase, or None if it would start too late
    pub fn tick(&self, timing: &TimingConfig) -> Option<TickPlacement> {
        if timing.tick_offset >= self.prompt || timing.tick_length <= 0.0 || timing.tick_volume <= 0.0 {
            return None;
        }

        Some(TickPlacement {
            start: timing.tick_offset,
            length: timing.tick_length.min(self.prompt - timing.tick_offset),
            volume: timing.tick_volume,
        })
    }
}
