//! # Still Rendering
//!
//! Canvases, fonts and text layout used by the themes to draw the prompt and reveal stills.

pub mod font;
pub mod frame;
pub mod text;

pub use font::FontFace;
pub use frame::Frame;
pub use text::{Anchor, Shadow, TextBlock, TextLayout};
