use crate::{
    card::VocabCard,
    error::Result,
    render::{Anchor, FontFace, Frame, TextBlock},
    themes::traits::{LayoutScale, Theme},
};

const WHITE: [u8; 3] = [255, 255, 255];
const YELLOW: [u8; 3] = [255, 255, 0];
const LIGHT_GREY: [u8; 3] = [211, 211, 211];

/// White, yellow and grey type over a black frame or a background image
pub struct ClassicTheme;

impl ClassicTheme {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClassicTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for ClassicTheme {
    fn name(&self) -> &str {
        "classic"
    }

    fn description(&self) -> &str {
        "Large white word, then yellow heading with IPA, meaning and grey example"
    }

    fn render_prompt(&self, frame: &mut Frame, card: &VocabCard, font: &FontFace) -> Result<()> {
        let s = LayoutScale::for_frame(frame);

        TextBlock::label(card.word.trim(), s.size(150.0), WHITE).draw(frame, font);
        Ok(())
    }

    fn render_reveal(&self, frame: &mut Frame, card: &VocabCard, font: &FontFace) -> Result<()> {
        let s = LayoutScale::for_frame(frame);

        TextBlock::label(card.reveal_heading(), s.size(100.0), YELLOW)
            .at(Anchor::Top(s.y(400)))
            .draw(frame, font);

        TextBlock::caption(card.meaning.trim(), s.size(70.0), WHITE, s.px(900)).draw(frame, font);

        TextBlock::caption(card.example_block(), s.size(50.0), LIGHT_GREY, s.px(900))
            .at(Anchor::Top(s.y(1300)))
            .draw(frame, font);

        Ok(())
    }
}
