use crate::{
    card::VocabCard,
    error::Result,
    render::{Anchor, FontFace, Frame, Shadow, TextBlock},
    themes::traits::{LayoutScale, Theme},
};

const GRADIENT_TOP: [u8; 3] = [58, 70, 160];
const GRADIENT_BOTTOM: [u8; 3] = [34, 148, 150];
const PANEL: [u8; 3] = [252, 252, 250];
const PANEL_SHADOW: [u8; 3] = [30, 40, 80];
const ACCENT: [u8; 3] = [240, 128, 60];
const INK: [u8; 3] = [33, 37, 41];
const MUTED: [u8; 3] = [96, 102, 112];

// Panel geometry in reference pixels
const PANEL_X: i32 = 90;
const PANEL_Y: i32 = 260;
const PANEL_W: u32 = 900;
const PANEL_H: u32 = 1400;
const PANEL_RADIUS: u32 = 48;
const TEXT_WIDTH: u32 = 780;

/// A drawn flash card on a gradient
pub struct CardTheme;

impl CardTheme {
    pub fn new() -> Self {
        Self
    }

    fn draw_panel(&self, frame: &mut Frame) {
        let s = LayoutScale::for_frame(frame);
        let (x, y) = (s.y(PANEL_X), s.y(PANEL_Y));
        let (w, h) = (s.px(PANEL_W), s.px(PANEL_H));
        let radius = s.px(PANEL_RADIUS);
        let drop = s.y(14);

        frame.fill_rounded_rect(x + drop, y + drop, w, h, radius, PANEL_SHADOW);
        frame.fill_rounded_rect(x, y, w, h, radius, PANEL);
        frame.fill_rect(x + radius as i32, y + s.y(36), w - 2 * radius, s.px(12), ACCENT);
    }
}

impl Default for CardTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for CardTheme {
    fn name(&self) -> &str {
        "card"
    }

    fn description(&self) -> &str {
        "Rounded flash card with an accent bar on a blue-teal gradient"
    }

    fn paints_background(&self) -> bool {
        true
    }

    fn background(&self, width: u32, height: u32) -> Frame {
        let mut frame = Frame::vertical_gradient(width, height, GRADIENT_TOP, GRADIENT_BOTTOM);
        self.draw_panel(&mut frame);
        frame
    }

    fn render_prompt(&self, frame: &mut Frame, card: &VocabCard, font: &FontFace) -> Result<()> {
        let s = LayoutScale::for_frame(frame);

        TextBlock::label(card.word.trim(), s.size(140.0), INK)
            .with_shadow(Shadow {
                offset: (0, s.y(4)),
                color: [200, 200, 200],
                opacity: 0.8,
            })
            .draw(frame, font);
        Ok(())
    }

    fn render_reveal(&self, frame: &mut Frame, card: &VocabCard, font: &FontFace) -> Result<()> {
        let s = LayoutScale::for_frame(frame);

        TextBlock::label(card.reveal_heading(), s.size(96.0), ACCENT)
            .at(Anchor::Top(s.y(PANEL_Y + 120)))
            .with_line_spacing(1.1)
            .draw(frame, font);

        TextBlock::caption(card.meaning.trim(), s.size(66.0), INK, s.px(TEXT_WIDTH)).draw(frame, font);

        TextBlock::caption(card.example_block(), s.size(46.0), MUTED, s.px(TEXT_WIDTH))
            .at(Anchor::Top(s.y(1220)))
            .with_line_spacing(1.15)
            .draw(frame, font);

        Ok(())
    }
}
