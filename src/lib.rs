//! # Vocab-Reel
//!
//! Turn vocabulary cards into short vertical "ask, then reveal" videos.
//!
//! Each reel has two phases. The prompt shows the word alone while it is spoken and a tick
//! counts down. The reveal shows the pronunciation, meaning and an example sentence while a
//! narration reads them out.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vocab_reel::{
//!     card::VocabCard,
//!     composition::{Assets, ReelEngine},
//!     config::Config,
//!     render::FontFace,
//!     themes::ThemeRegistry,
//!     tts::create_engine,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let theme = ThemeRegistry::new().get_theme("classic").unwrap();
//! let tts = create_engine(&config.tts)?;
//!
//! let card = VocabCard::new("serendipity")
//!     .with_ipa("/ˌserənˈdɪpəti/")
//!     .with_meaning("机缘巧合")
//!     .with_sentence("Meeting her was pure serendipity.");
//!
//! let engine = ReelEngine::new(config, theme, tts);
//! engine
//!     .render_card(&card, &Assets::new(FontFace::discover()?), "serendipity.mp4")
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`card`] - Vocabulary cards and decks
//! - [`tts`] - Speech synthesis backends
//! - [`audio`] - Decoding, measuring and mixing speech
//! - [`render`] - Canvases, fonts and text layout
//! - [`themes`] - Layouts for the prompt and reveal stills
//! - [`video`] - FFmpeg encoding
//! - [`composition`] - Phase timing and the reel pipeline
//! - [`config`] - Configuration management

pub mod audio;
pub mod card;
pub mod composition;
pub mod config;
pub mod error;
pub mod render;
pub mod themes;
pub mod tts;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    card::{Deck, VocabCard},
    composition::{Assets, ReelEngine},
    config::Config,
    error::{ReelError, Result},
    themes::{Theme, ThemeRegistry},
    tts::TextToSpeech,
};
