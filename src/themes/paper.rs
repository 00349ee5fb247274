use crate::{
    card::VocabCard,
    error::Result,
    render::{Anchor, FontFace, Frame, TextBlock},
    themes::traits::{LayoutScale, Theme},
};

const PAPER: [u8; 3] = [250, 246, 238];
const INK: [u8; 3] = [40, 40, 40];
const RED_INK: [u8; 3] = [176, 58, 46];
const PENCIL: [u8; 3] = [110, 110, 110];

/// Dark ink on off-white paper
pub struct PaperTheme;

impl PaperTheme {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PaperTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for PaperTheme {
    fn name(&self) -> &str {
        "paper"
    }

    fn description(&self) -> &str {
        "Light palette: ink heading with a rule, red meaning, pencil-grey example"
    }

    fn background(&self, width: u32, height: u32) -> Frame {
        Frame::new_filled(width, height, PAPER)
    }

    fn render_prompt(&self, frame: &mut Frame, card: &VocabCard, font: &FontFace) -> Result<()> {
        let s = LayoutScale::for_frame(frame);

        TextBlock::label(card.word.trim(), s.size(150.0), INK).draw(frame, font);
        Ok(())
    }

    fn render_reveal(&self, frame: &mut Frame, card: &VocabCard, font: &FontFace) -> Result<()> {
        let s = LayoutScale::for_frame(frame);

        let heading = TextBlock::label(card.reveal_heading(), s.size(100.0), INK)
            .at(Anchor::Top(s.y(400)))
            .draw(frame, font);

        // Rule under the heading
        let rule_w = s.px(600);
        let rule_x = (frame.width().saturating_sub(rule_w) / 2) as i32;
        let rule_y = s.y(400) + heading.height as i32 + s.y(30);
        frame.fill_rect(rule_x, rule_y, rule_w, s.px(4).max(1), INK);

        TextBlock::caption(card.meaning.trim(), s.size(70.0), RED_INK, s.px(900)).draw(frame, font);

        TextBlock::caption(card.example_block(), s.size(50.0), PENCIL, s.px(900))
            .at(Anchor::Top(s.y(1300)))
            .draw(frame, font);

        Ok(())
    }
}
