//! # Theme System
//!
//! Layouts and palettes for the two stills of a reel. Each theme is self-contained and
//! decides where the word, IPA, meaning and example go.
//!
//! ## Built-in Themes
//!
//! - **classic**: white word, yellow heading, grey example on black or an image
//! - **card**: a drawn flash card on a gradient
//! - **paper**: dark ink on an off-white page
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vocab_reel::{card::VocabCard, render::FontFace, themes::ThemeRegistry};
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = ThemeRegistry::new();
//! let theme = registry.get_theme("paper").unwrap();
//!
//! let font = FontFace::discover()?;
//! let card = VocabCard::new("serendipity").with_meaning("机缘巧合");
//! let mut frame = theme.background(1080, 1920);
//! theme.render_reveal(&mut frame, &card, &font)?;
//! frame.save_png("reveal.png")?;
//! # Ok(())
//! # }
//! ```

pub mod registry;
pub mod traits;

pub mod card;
pub mod classic;
pub mod paper;

pub use registry::ThemeRegistry;
pub use traits::{LayoutScale, Theme};

pub use card::CardTheme;
pub use classic::ClassicTheme;
pub use paper::PaperTheme;
