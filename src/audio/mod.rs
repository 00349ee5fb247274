//! # Audio Module
//!
//! Decodes synthesized speech and sound effects, measures their length, and mixes the
//! two-phase soundtrack that goes under the video.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vocab_reel::audio::{AudioLoader, Mixer};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let word = AudioLoader::load("word.mp3").await?;
//!
//! let mut mixer = Mixer::new(44100, 1, word.duration + 2.5);
//! mixer.place(&word, 0.0)?;
//! mixer.finish().write_wav("prompt.wav")?;
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod mixer;
pub mod types;

pub use loader::AudioLoader;
pub use mixer::Mixer;
pub use types::{AudioData, AudioFormat};
