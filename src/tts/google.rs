//! Public translate TTS endpoint.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::GoogleTtsConfig;
use crate::error::{Result, TtsError};
use crate::tts::{map_reqwest_error, status_error, TextToSpeech};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Google translate speech, one MP3 per chunk stitched together
pub struct GoogleTts {
    config: GoogleTtsConfig,
    client: reqwest::Client,
    timeout: Duration,
}

impl GoogleTts {
    pub fn new(config: GoogleTtsConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TtsError::ConnectionFailed { reason: e.to_string() })?;

        Ok(Self { config, client, timeout })
    }

    fn endpoint(&self) -> String {
        format!("https://{}/translate_tts", self.config.host)
    }

    async fn fetch_chunk(&self, chunk: &str, lang: &str, idx: usize, total: usize) -> Result<Vec<u8>> {
        let speed = if self.config.slow { "0.3" } else { "1" };
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", lang),
                ("client", "tw-ob"),
                ("ttsspeed", speed),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl TextToSpeech for GoogleTts {
    fn name(&self) -> &str {
        "google"
    }

    async fn save(&self, text: &str, voice: &str, path: &Path) -> Result<PathBuf> {
        let chunks = split_text(text, self.config.chunk_chars);
        if chunks.is_empty() {
            return Err(TtsError::EmptyText.into());
        }

        debug!("Requesting {} chunk(s) in '{}'", chunks.len(), voice);

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, voice, idx, chunks.len()).await?);
        }

        if audio.is_empty() {
            return Err(TtsError::NoAudio { text: text.to_string() }.into());
        }

        let out = path.with_extension("mp3");
        tokio::fs::write(&out, audio).await?;
        Ok(out)
    }
}

/// Full-width marks and newlines always end a clause
fn is_hard_break(ch: char) -> bool {
    matches!(ch, '。' | '，' | '；' | '：' | '！' | '？' | '、' | '…' | '\n')
}

/// ASCII marks end a clause only before whitespace, so `3.5` and `3,000` stay whole
fn is_soft_break(ch: char) -> bool {
    matches!(ch, '.' | ',' | ';' | ':' | '!' | '?')
}

fn is_punctuation(ch: char) -> bool {
    is_hard_break(ch) || is_soft_break(ch)
}

/// Split text into pieces of at most `max_chars` characters
///
/// Text is cut into clauses at punctuation, clauses that are still too long are split at
/// whitespace (or cut hard as a last resort), and neighbours are then packed back together
/// so each piece is as full as the limit allows. Blank pieces are dropped.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);

    let chars: Vec<char> = text.chars().collect();
    let mut clauses = Vec::new();
    let mut current = String::new();
    for (i, &ch) in chars.iter().enumerate() {
        current.push(ch);
        let ends = is_hard_break(ch)
            || (is_soft_break(ch) && chars.get(i + 1).map_or(true, |next| next.is_whitespace()));
        if ends {
            clauses.push(std::mem::take(&mut current));
        }
    }
    clauses.push(current);

    let mut pieces = Vec::new();
    for clause in clauses {
        let clause = clause.trim();
        if clause.is_empty() || clause.chars().all(is_punctuation) {
            continue;
        }
        split_long(clause, max_chars, &mut pieces);
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for piece in pieces {
        let piece_len = piece.chars().count();
        if !current.is_empty() && current_len + 1 + piece_len <= max_chars {
            current.push(' ');
            current.push_str(&piece);
            current_len += 1 + piece_len;
        } else {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            current = piece;
            current_len = piece_len;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn split_long(sentence: &str, max_chars: usize, out: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0;

    for word in sentence.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                out.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            out.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        out.push(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(split_text("hello", 100), vec!["hello"]);
    }

    #[test]
    fn test_splits_on_punctuation() {
        let chunks = split_text("apple... 苹果... An apple a day.", 20);
        assert_eq!(chunks, vec!["apple... 苹果...", "An apple a day."]);
    }

    #[test]
    fn test_short_clauses_are_packed() {
        let text = "apple... 苹果... An apple a day.";
        assert_eq!(split_text(text, 100), vec![text]);
    }

    #[test]
    fn test_numbers_are_not_split() {
        let text = "It costs 3.5 dollars, about 3,000 yen.";
        assert_eq!(split_text(text, 100), vec![text]);
        assert_eq!(
            split_text(text, 25),
            vec!["It costs 3.5 dollars,", "about 3,000 yen."]
        );
    }

    #[test]
    fn test_time_and_ratio_stay_whole() {
        let chunks = split_text("Meet at 10:30. Mix 1:2", 14);
        assert_eq!(chunks, vec!["Meet at 10:30.", "Mix 1:2"]);
    }

    #[test]
    fn test_long_sentence_splits_on_whitespace() {
        let chunks = split_text("one two three four five", 9);
        assert_eq!(chunks, vec!["one two", "three", "four five"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 9));
    }

    #[test]
    fn test_unbroken_text_is_cut_hard() {
        let text = "意外发现珍宝的运气意外发现珍宝的运气";
        let chunks = split_text(text, 5);
        assert!(chunks.iter().all(|c| c.chars().count() <= 5));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_blank_text_has_no_chunks() {
        assert!(split_text("  ... ", 100).is_empty());
    }
}
