//! # Speech Synthesis
//!
//! Backends that turn text into an audio file. Each one implements [`TextToSpeech`] and is
//! picked by name from [`TtsConfig::backend`](crate::config::TtsConfig):
//!
//! - **google**: the public translate TTS endpoint (MP3, voice = language code)
//! - **system**: a local speech program such as `espeak-ng` or `say` (WAV)
//! - **cloud**: neural voices behind an OpenAI-compatible speech endpoint

pub mod cloud;
pub mod google;
pub mod system;

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::TtsConfig;
use crate::error::{ReelError, Result, TtsError};

pub use cloud::CloudTts;
pub use google::GoogleTts;
pub use system::SystemTts;

/// A speech backend
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Short backend name used in logs and config
    fn name(&self) -> &str;

    /// Synthesize `text` with `voice` next to `path`
    ///
    /// The backend picks the file extension matching the audio it produces, so the path
    /// actually written is returned.
    async fn save(&self, text: &str, voice: &str, path: &Path) -> Result<PathBuf>;
}

/// Build the backend named in the configuration
pub fn create_engine(config: &TtsConfig) -> Result<Box<dyn TextToSpeech>> {
    let timeout = Duration::from_secs(config.timeout_secs);

    match config.backend.as_str() {
        "google" => Ok(Box::new(GoogleTts::new(config.google.clone(), timeout)?)),
        "system" => Ok(Box::new(SystemTts::new(config.system.clone(), timeout))),
        "cloud" => Ok(Box::new(CloudTts::new(config.cloud.clone(), timeout)?)),
        other => Err(TtsError::UnknownBackend { name: other.to_string() }.into()),
    }
}

/// Synthesize, retrying transient failures with linear backoff
pub async fn synthesize_with_retry(
    engine: &dyn TextToSpeech,
    text: &str,
    voice: &str,
    path: &Path,
    retries: u32,
) -> Result<PathBuf> {
    if text.trim().is_empty() {
        return Err(TtsError::EmptyText.into());
    }

    let mut attempt = 0;
    loop {
        match engine.save(text, voice, path).await {
            Ok(written) => {
                debug!("{} wrote {:?} (voice {})", engine.name(), written, voice);
                return Ok(written);
            }
            Err(e) if attempt < retries && e.is_recoverable() => {
                attempt += 1;
                warn!(
                    "{} attempt {}/{} failed: {}",
                    engine.name(),
                    attempt,
                    retries + 1,
                    e
                );
                tokio::time::sleep(Duration::from_millis(500 * attempt as u64)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

pub(crate) fn map_reqwest_error(e: reqwest::Error, timeout: Duration) -> ReelError {
    if e.is_timeout() {
        TtsError::Timeout { seconds: timeout.as_secs() }.into()
    } else {
        TtsError::ConnectionFailed { reason: e.to_string() }.into()
    }
}

/// Turn a non-success HTTP status into the matching error
pub(crate) fn status_error(status: reqwest::StatusCode, body: String) -> ReelError {
    let body: String = body.chars().take(200).collect();
    if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        TtsError::ServerError { status: status.as_u16(), body }.into()
    } else {
        TtsError::RequestRejected { status: status.as_u16(), body }.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Clone, Copy)]
    enum Failure {
        Transient,
        Rejected,
        Disk,
    }

    struct FlakyTts {
        failures: u32,
        calls: AtomicU32,
        failure: Failure,
    }

    #[async_trait]
    impl TextToSpeech for FlakyTts {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn save(&self, _text: &str, _voice: &str, path: &Path) -> Result<PathBuf> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(match self.failure {
                    Failure::Transient => TtsError::ConnectionFailed { reason: "reset".to_string() }.into(),
                    Failure::Rejected => TtsError::RequestRejected { status: 400, body: String::new() }.into(),
                    Failure::Disk => std::io::Error::new(std::io::ErrorKind::Other, "disk full").into(),
                });
            }
            Ok(path.to_path_buf())
        }
    }

    fn flaky(failures: u32, failure: Failure) -> FlakyTts {
        FlakyTts {
            failures,
            calls: AtomicU32::new(0),
            failure,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_from_transient_failures() {
        let engine = flaky(2, Failure::Transient);
        let path = Path::new("word.mp3");

        let written = synthesize_with_retry(&engine, "hello", "en", path, 2).await.unwrap();
        assert_eq!(written, path);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_gives_up_after_budget() {
        let engine = flaky(5, Failure::Transient);
        let result = synthesize_with_retry(&engine, "hello", "en", Path::new("w.mp3"), 1).await;

        assert!(result.is_err());
        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let engine = flaky(1, Failure::Rejected);
        let result = synthesize_with_retry(&engine, "hello", "en", Path::new("w.mp3"), 3).await;

        assert!(result.is_err());
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_write_failure_is_not_retried() {
        let engine = flaky(1, Failure::Disk);
        let result = synthesize_with_retry(&engine, "hello", "en", Path::new("w.mp3"), 3).await;

        assert!(matches!(result, Err(ReelError::Io(_))));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_text_rejected_without_request() {
        let engine = flaky(0, Failure::Transient);
        let result = synthesize_with_retry(&engine, "  ", "en", Path::new("w.mp3"), 3).await;

        assert!(matches!(result, Err(ReelError::Tts(TtsError::EmptyText))));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_create_engine_by_name() {
        let mut config = TtsConfig::default();
        assert_eq!(create_engine(&config).unwrap().name(), "google");

        config.backend = "system".to_string();
        assert_eq!(create_engine(&config).unwrap().name(), "system");

        config.backend = "festival".to_string();
        assert!(matches!(
            create_engine(&config),
            Err(ReelError::Tts(TtsError::UnknownBackend { .. }))
        ));
    }

    #[test]
    fn test_status_error_classification() {
        let err = status_error(reqwest::StatusCode::BAD_GATEWAY, "oops".to_string());
        assert!(err.is_recoverable());

        let err = status_error(reqwest::StatusCode::UNAUTHORIZED, "no".to_string());
        assert!(!err.is_recoverable());
    }
}
