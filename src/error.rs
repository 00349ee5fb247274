use thiserror::Error;

/// Main error type for the vocab-reel library
#[derive(Error, Debug)]
pub enum ReelError {
    #[error("Card error: {0}")]
    Card(#[from] CardError),

    #[error("Speech synthesis error: {0}")]
    Tts(#[from] TtsError),

    #[error("Audio processing error: {0}")]
    Audio(#[from] AudioError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Video processing error: {0}")]
    Video(#[from] VideoError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Card input errors
#[derive(Error, Debug)]
pub enum CardError {
    #[error("Card is missing a word")]
    EmptyWord,

    #[error("Failed to parse card file: {path} - {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Unsupported card file format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Deck contains no cards: {path}")]
    EmptyDeck { path: String },
}

/// Text-to-speech errors
#[derive(Error, Debug)]
pub enum TtsError {
    #[error("Unknown TTS backend: {name}")]
    UnknownBackend { name: String },

    #[error("Nothing to synthesize")]
    EmptyText,

    #[error("Could not reach TTS service: {reason}")]
    ConnectionFailed { reason: String },

    #[error("TTS request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("TTS service returned {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("TTS request rejected ({status}): {body}")]
    RequestRejected { status: u16, body: String },

    #[error("Missing credentials: set the {env_var} environment variable")]
    MissingCredentials { env_var: String },

    #[error("Speech program '{program}' failed: {reason}")]
    ProgramFailed { program: String, reason: String },

    #[error("TTS backend produced no audio for: {text}")]
    NoAudio { text: String },
}

/// Audio-specific errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to load audio file: {path}")]
    LoadFailed { path: String },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Failed to write audio file: {path} - {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("Invalid audio parameters: {details}")]
    InvalidParameters { details: String },
}

/// Still rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to load font: {path}")]
    FontLoadFailed { path: String },

    #[error("No usable font found; pass --font with a TTF/OTF file")]
    NoFontFound,

    #[error("Failed to load background image: {path}")]
    BackgroundLoadFailed { path: String },

    #[error("Theme not found: {name} (available: {available})")]
    ThemeNotFound { name: String, available: String },

    #[error("Failed to save still: {path} - {reason}")]
    SaveFailed { path: String, reason: String },
}

/// Video-specific errors
#[derive(Error, Debug)]
pub enum VideoError {
    #[error("FFmpeg not found. Please install FFmpeg.")]
    FfmpegMissing,

    #[error("Video encoding failed: {reason}")]
    EncodingFailed { reason: String },

    #[error("Invalid video parameters: {details}")]
    InvalidParameters { details: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using ReelError
pub type Result<T> = std::result::Result<T, ReelError>;

impl ReelError {
    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Tts(e) if e.is_recoverable())
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Card(CardError::EmptyWord) => {
                "Please enter a word before generating a video.".to_string()
            }
            Self::Tts(TtsError::MissingCredentials { env_var }) => {
                format!("The cloud voice backend needs an API key in ${}.", env_var)
            }
            Self::Tts(e) => format!("Speech generation failed: {}", e),
            Self::Render(RenderError::ThemeNotFound { name, available }) => {
                format!("Theme '{}' not found. Available themes: {}", name, available)
            }
            Self::Video(VideoError::FfmpegMissing) => {
                "FFmpeg was not found on PATH. Install it to encode videos.".to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

impl TtsError {
    /// Transient failures worth another attempt
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::Timeout { .. } | Self::ServerError { .. }
        )
    }
}
