use crate::{
    card::VocabCard,
    error::Result,
    render::{FontFace, Frame},
};

/// Frame width the built-in layouts are specified against
pub const REFERENCE_WIDTH: f32 = 1080.0;

/// Core trait that all layouts must implement
///
/// A theme draws the two stills of a reel: the prompt (word only) and the reveal (word,
/// IPA, meaning and example). Both are drawn onto a copy of the same base frame.
pub trait Theme: Send + Sync {
    /// Returns the unique name of this theme
    fn name(&self) -> &str;

    /// Returns a human-readable description of this theme
    fn description(&self) -> &str;

    /// Whether the theme draws its own backdrop and ignores a background image
    fn paints_background(&self) -> bool {
        false
    }

    /// Base frame used when there is no background image
    fn background(&self, width: u32, height: u32) -> Frame {
        Frame::new_black(width, height)
    }

    /// Draw the prompt phase
    fn render_prompt(&self, frame: &mut Frame, card: &VocabCard, font: &FontFace) -> Result<()>;

    /// Draw the reveal phase
    fn render_reveal(&self, frame: &mut Frame, card: &VocabCard, font: &FontFace) -> Result<()>;
}

/// Converts reference-layout pixels to pixels on a given frame
#[derive(Debug, Clone, Copy)]
pub struct LayoutScale(f32);

impl LayoutScale {
    pub fn for_frame(frame: &Frame) -> Self {
        Self(frame.width() as f32 / REFERENCE_WIDTH)
    }

    pub fn size(&self, px: f32) -> f32 {
        px * self.0
    }

    pub fn px(&self, px: u32) -> u32 {
        (px as f32 * self.0).round() as u32
    }

    pub fn y(&self, px: i32) -> i32 {
        (px as f32 * self.0).round() as i32
    }
}
