//! Local speech synthesis through an installed program.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::config::SystemTtsConfig;
use crate::error::{Result, TtsError};
use crate::tts::TextToSpeech;

/// Command-line conventions of the supported programs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    /// espeak-ng / espeak
    Espeak,
    /// macOS say
    Say,
}

impl Flavor {
    fn detect(program: &str) -> Self {
        let stem = Path::new(program)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(program);

        if stem == "say" {
            Self::Say
        } else {
            Self::Espeak
        }
    }
}

/// Speech through espeak-ng, espeak or say; text is fed on stdin
pub struct SystemTts {
    config: SystemTtsConfig,
    flavor: Flavor,
    timeout: Duration,
}

impl SystemTts {
    pub fn new(config: SystemTtsConfig, timeout: Duration) -> Self {
        let flavor = Flavor::detect(&config.program);
        Self { config, flavor, timeout }
    }

    fn build_args(&self, voice: &str, out: &Path) -> Vec<String> {
        let mut args = self.config.extra_args.clone();
        let out = out.display().to_string();

        match self.flavor {
            Flavor::Espeak => {
                if !voice.is_empty() {
                    args.extend(["-v".to_string(), voice.to_string()]);
                }
                args.extend(["-w".to_string(), out, "--stdin".to_string()]);
            }
            Flavor::Say => {
                if !voice.is_empty() {
                    args.extend(["-v".to_string(), voice.to_string()]);
                }
                args.extend([
                    "-o".to_string(),
                    out,
                    "--data-format=LEI16@22050".to_string(),
                    "-f".to_string(),
                    "-".to_string(),
                ]);
            }
        }

        args
    }
}

#[async_trait]
impl TextToSpeech for SystemTts {
    fn name(&self) -> &str {
        "system"
    }

    async fn save(&self, text: &str, voice: &str, path: &Path) -> Result<PathBuf> {
        let out = path.with_extension("wav");
        let args = self.build_args(voice, &out);
        let program = self.config.program.clone();
        let failed = |reason: String| TtsError::ProgramFailed {
            program: program.clone(),
            reason,
        };

        debug!("Running {} {:?}", program, args);

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| failed(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| TtsError::Timeout { seconds: self.timeout.as_secs() })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(failed(format!("{} {}", output.status, stderr)).into());
        }

        let written = tokio::fs::metadata(&out).await.map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(TtsError::NoAudio { text: text.to_string() }.into());
        }

        Ok(out)
    }
}
