//! Neural voices behind an OpenAI-compatible `/v1/audio/speech` endpoint.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::CloudTtsConfig;
use crate::error::{Result, TtsError};
use crate::tts::{map_reqwest_error, status_error, TextToSpeech};

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

pub struct CloudTts {
    config: CloudTtsConfig,
    client: reqwest::Client,
    timeout: Duration,
}

impl CloudTts {
    pub fn new(config: CloudTtsConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TtsError::ConnectionFailed { reason: e.to_string() })?;

        Ok(Self { config, client, timeout })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/audio/speech", self.config.base_url.trim_end_matches('/'))
    }

    fn api_key(&self) -> Result<String> {
        std::env::var(&self.config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                TtsError::MissingCredentials {
                    env_var: self.config.api_key_env.clone(),
                }
                .into()
            })
    }
}

#[async_trait]
impl TextToSpeech for CloudTts {
    fn name(&self) -> &str {
        "cloud"
    }

    async fn save(&self, text: &str, voice: &str, path: &Path) -> Result<PathBuf> {
        let key = self.api_key()?;
        let request = SpeechRequest {
            model: &self.config.model,
            input: text,
            voice,
            response_format: &self.config.format,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(key)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        if audio.is_empty() {
            return Err(TtsError::NoAudio { text: text.to_string() }.into());
        }

        let out = path.with_extension(&self.config.format);
        tokio::fs::write(&out, &audio).await?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReelError;

    fn engine(env: &str) -> CloudTts {
        CloudTts::new(
            CloudTtsConfig {
                base_url: "https://tts.example.com/".to_string(),
                api_key_env: env.to_string(),
                ..CloudTtsConfig::default()
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(engine("X").endpoint(), "https://tts.example.com/v1/audio/speech");
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(SpeechRequest {
            model: "tts-1",
            input: "hello",
            voice: "alloy",
            response_format: "mp3",
        })
        .unwrap();

        assert_eq!(body["model"], "tts-1");
        assert_eq!(body["input"], "hello");
        assert_eq!(body["voice"], "alloy");
        assert_eq!(body["response_format"], "mp3");
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let tts = engine("VOCAB_REEL_TEST_KEY_THAT_IS_NEVER_SET");
        let result = tts.save("hello", "alloy", Path::new("word")).await;

        if let Err(ReelError::Tts(TtsError::MissingCredentials { env_var })) = result {
            assert_eq!(env_var, "VOCAB_REEL_TEST_KEY_THAT_IS_NEVER_SET");
        } else {
            panic!("Expected MissingCredentials error");
        }
    }
}
