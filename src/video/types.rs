use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Video encoding parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoParams {
    /// Output frame rate
    pub fps: f64,

    /// Output resolution (width, height)
    pub resolution: (u32, u32),

    /// FFmpeg video encoder
    pub codec: String,

    /// FFmpeg audio encoder
    pub audio_codec: String,

    /// Quality setting (0-100, higher is better)
    pub quality: u8,
}

impl Default for VideoParams {
    fn default() -> Self {
        Self {
            fps: 24.0,
            resolution: (1080, 1920),
            codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            quality: 65,
        }
    }
}

/// A still image held on screen for a number of seconds
#[derive(Debug, Clone, PartialEq)]
pub struct Still {
    pub path: PathBuf,
    pub duration: f64,
}

impl Still {
    pub fn new<P: Into<PathBuf>>(path: P, duration: f64) -> Self {
        Self {
            path: path.into(),
            duration,
        }
    }
}

/// Represents an encoded video output
#[derive(Debug, Clone)]
pub struct EncodedVideo {
    pub path: PathBuf,
    pub duration: f64,
    pub frame_count: usize,
    pub file_size: u64,
}
