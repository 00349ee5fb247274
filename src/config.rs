use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::{
    audio::AudioLoader,
    error::{ConfigError, Result},
    video::VideoParams,
};

/// Main configuration for vocab-reel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Speech synthesis settings
    pub tts: TtsConfig,

    /// Phase duration settings
    pub timing: TimingConfig,

    /// Video encoding settings
    pub video: VideoConfig,

    /// Still rendering settings
    pub render: RenderConfig,

    /// Mixed soundtrack settings
    pub audio: AudioConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.tts.validate()?;
        self.timing.validate()?;
        self.video.validate()?;
        self.audio.validate()?;
        Ok(())
    }
}

fn invalid<K: Into<String>, V: ToString>(key: K, value: V) -> crate::error::ReelError {
    ConfigError::InvalidValue {
        key: key.into(),
        value: value.to_string(),
    }
    .into()
}

/// Which speech backend to use and how to reach it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Backend name: google, system or cloud
    pub backend: String,

    /// Voice for the word in the prompt phase
    pub prompt_voice: String,

    /// Voice for the reveal narration
    pub narration_voice: String,

    /// Extra attempts after a transient failure
    pub retries: u32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    pub google: GoogleTtsConfig,
    pub system: SystemTtsConfig,
    pub cloud: CloudTtsConfig,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            backend: "google".to_string(),
            prompt_voice: "en".to_string(),
            narration_voice: "zh-CN".to_string(),
            retries: 2,
            timeout_secs: 30,
            google: GoogleTtsConfig::default(),
            system: SystemTtsConfig::default(),
            cloud: CloudTtsConfig::default(),
        }
    }
}

impl TtsConfig {
    pub const BACKENDS: [&'static str; 3] = ["google", "system", "cloud"];

    fn validate(&self) -> Result<()> {
        if !Self::BACKENDS.contains(&self.backend.as_str()) {
            return Err(invalid("tts.backend", &self.backend));
        }

        if self.timeout_secs == 0 {
            return Err(invalid("tts.timeout_secs", self.timeout_secs));
        }

        if self.google.chunk_chars < 10 {
            return Err(invalid("tts.google.chunk_chars", self.google.chunk_chars));
        }

        if self.system.program.trim().is_empty() {
            return Err(invalid("tts.system.program", "<empty>"));
        }

        // The cloud response is decoded by extension
        if !AudioLoader::is_format_supported(&self.cloud.format) {
            return Err(invalid("tts.cloud.format", &self.cloud.format));
        }

        Ok(())
    }
}

/// Public translate TTS endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleTtsConfig {
    /// Endpoint host, e.g. translate.google.com
    pub host: String,

    /// Maximum characters per request
    pub chunk_chars: usize,

    /// Use the slower speaking rate
    pub slow: bool,
}

impl Default for GoogleTtsConfig {
    fn default() -> Self {
        Self {
            host: "translate.google.com".to_string(),
            chunk_chars: 100,
            slow: false,
        }
    }
}

/// Local speech program
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemTtsConfig {
    /// espeak-ng, espeak or say
    pub program: String,

    /// Extra arguments placed before the text
    pub extra_args: Vec<String>,
}

impl Default for SystemTtsConfig {
    fn default() -> Self {
        let program = if cfg!(target_os = "macos") { "say" } else { "espeak-ng" };
        Self {
            program: program.to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// Neural voices behind an OpenAI-compatible speech endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudTtsConfig {
    pub base_url: String,
    pub model: String,

    /// Environment variable holding the bearer token
    pub api_key_env: String,

    /// Response format: mp3, wav or flac
    pub format: String,
}

impl Default for CloudTtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "tts-1".to_string(),
            api_key_env: "VOCAB_REEL_TTS_KEY".to_string(),
            format: "mp3".to_string(),
        }
    }
}

/// Phase duration arithmetic, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Shortest allowed prompt phase
    pub prompt_min: f64,

    /// Silence after the spoken word before the reveal
    pub prompt_padding: f64,

    /// Silence after the narration
    pub reveal_padding: f64,

    /// When the tick starts within the prompt phase
    pub tick_offset: f64,

    /// Longest stretch of the tick file used
    pub tick_length: f64,

    /// Tick gain (0.0-1.0)
    pub tick_volume: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            prompt_min: 3.5,
            prompt_padding: 2.5,
            reveal_padding: 1.0,
            tick_offset: 0.5,
            tick_length: 3.0,
            tick_volume: 0.3,
        }
    }
}

impl TimingConfig {
    fn validate(&self) -> Result<()> {
        if !(self.prompt_min > 0.0) || !self.prompt_min.is_finite() {
            return Err(invalid("timing.prompt_min", self.prompt_min));
        }

        for (key, value) in [
            ("timing.prompt_padding", self.prompt_padding),
            ("timing.reveal_padding", self.reveal_padding),
            ("timing.tick_offset", self.tick_offset),
            ("timing.tick_length", self.tick_length),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(invalid(key, value));
            }
        }

        if !(0.0..=1.0).contains(&self.tick_volume) {
            return Err(invalid("timing.tick_volume", self.tick_volume));
        }

        Ok(())
    }
}

/// Video encoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Encoder parameters
    pub params: VideoParams,

    /// Encoder threads
    pub threads: usize,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            params: VideoParams::default(),
            threads: num_cpus::get(),
        }
    }
}

impl VideoConfig {
    fn validate(&self) -> Result<()> {
        if !(self.params.fps > 0.0) || !self.params.fps.is_finite() {
            return Err(invalid("video.params.fps", self.params.fps));
        }

        let (w, h) = self.params.resolution;
        if w == 0 || h == 0 {
            return Err(invalid("video.params.resolution", format!("{}x{}", w, h)));
        }

        // yuv420p needs even dimensions
        if w % 2 != 0 || h % 2 != 0 {
            return Err(invalid("video.params.resolution", format!("{}x{}", w, h)));
        }

        if self.params.quality > 100 {
            return Err(invalid("video.params.quality", self.params.quality));
        }

        if self.threads == 0 {
            return Err(invalid("video.threads", self.threads));
        }

        Ok(())
    }
}

/// How a background image is fitted to the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundFit {
    /// Scale to the exact frame size, ignoring aspect ratio
    #[default]
    Stretch,
    /// Scale to fill, cropping the overflow
    Cover,
}

/// Still rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub theme: String,

    /// TTF/OTF font; discovered from system paths when unset
    pub font: Option<PathBuf>,

    pub background_fit: BackgroundFit,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            theme: "classic".to_string(),
            font: None,
            background_fit: BackgroundFit::default(),
        }
    }
}

/// Mixed soundtrack format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 1,
        }
    }
}

impl AudioConfig {
    fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(invalid("audio.sample_rate", self.sample_rate));
        }

        if !(1..=2).contains(&self.channels) {
            return Err(invalid("audio.channels", self.channels));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let mut original_config = Config::default();
        original_config.tts.backend = "system".to_string();
        original_config.render.background_fit = BackgroundFit::Cover;

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(loaded_config.tts.backend, "system");
        assert_eq!(loaded_config.render.background_fit, BackgroundFit::Cover);
        assert_eq!(original_config.video.params.fps, loaded_config.video.params.fps);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[timing]\nprompt_min = 5.0\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.timing.prompt_min, 5.0);
        assert_eq!(config.timing.reveal_padding, 1.0);
        assert_eq!(config.tts.backend, "google");
        assert_eq!(config.video.params.resolution, (1080, 1920));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let mut config = Config::default();
        config.tts.backend = "festival".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_timing() {
        let mut config = Config::default();
        config.timing.tick_volume = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.timing.reveal_padding = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_odd_resolution_rejected() {
        let mut config = Config::default();
        config.video.params.resolution = (1081, 1920);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_each_bad_value_names_its_key() {
        let cases: &[(&str, fn(&mut Config))] = &[
            ("video.params.fps", |c| c.video.params.fps = 0.0),
            ("video.params.fps", |c| c.video.params.fps = f64::NAN),
            ("video.params.resolution", |c| c.video.params.resolution = (0, 1920)),
            ("video.params.quality", |c| c.video.params.quality = 101),
            ("video.threads", |c| c.video.threads = 0),
            ("timing.prompt_min", |c| c.timing.prompt_min = 0.0),
            ("timing.prompt_min", |c| c.timing.prompt_min = f64::NAN),
            ("timing.tick_offset", |c| c.timing.tick_offset = -1.0),
            ("timing.tick_length", |c| c.timing.tick_length = -1.0),
            ("timing.tick_volume", |c| c.timing.tick_volume = f32::NAN),
            ("tts.timeout_secs", |c| c.tts.timeout_secs = 0),
            ("tts.google.chunk_chars", |c| c.tts.google.chunk_chars = 5),
            ("tts.system.program", |c| c.tts.system.program = String::new()),
            ("tts.cloud.format", |c| c.tts.cloud.format = "opus".to_string()),
            ("audio.sample_rate", |c| c.audio.sample_rate = 0),
            ("audio.channels", |c| c.audio.channels = 0),
            ("audio.channels", |c| c.audio.channels = 3),
        ];

        for &(expected, break_it) in cases {
            let mut config = Config::default();
            break_it(&mut config);
            match config.validate() {
                Err(crate::error::ReelError::Config(ConfigError::InvalidValue { key, .. })) => {
                    assert_eq!(key, expected)
                }
                other => panic!("expected {} to be rejected, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_cloud_formats_accepted() {
        for format in ["mp3", "wav", "flac", "aac"] {
            let mut config = Config::default();
            config.tts.cloud.format = format.to_string();
            assert!(config.validate().is_ok(), "{} should be accepted", format);
        }
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("/nonexistent/vocab-reel.toml");
        assert!(matches!(
            result,
            Err(crate::error::ReelError::Config(ConfigError::FileNotFound { .. }))
        ));
    }
}
