use ab_glyph::{point, Font, ScaleFont};

use crate::render::{font::FontFace, frame::Frame};

/// Horizontal breathing room kept when shrinking labels to fit
const LABEL_MARGIN: u32 = 40;

/// Vertical placement of a text block
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// Block centered on the frame
    Center,
    /// Top edge of the block at this y
    Top(i32),
}

/// Offset drop shadow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub offset: (i32, i32),
    pub color: [u8; 3],
    pub opacity: f32,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            offset: (4, 4),
            color: [0, 0, 0],
            opacity: 0.6,
        }
    }
}

/// A horizontally centered block of text
///
/// Without a wrap width the block behaves like a label: only explicit newlines break
/// lines, and the size shrinks if the widest line would not fit the frame. With a wrap
/// width every paragraph is greedy-wrapped to it.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub text: String,
    pub size: f32,
    pub color: [u8; 3],
    pub wrap_width: Option<u32>,
    pub anchor: Anchor,
    pub line_spacing: f32,
    pub shadow: Option<Shadow>,
}

/// Result of laying out a [`TextBlock`]
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<String>,
    /// Font size after any shrink-to-fit
    pub size: f32,
    pub line_height: f32,
    pub width: u32,
    pub height: u32,
}

impl TextBlock {
    /// Single-line style block, no wrapping
    pub fn label<S: Into<String>>(text: S, size: f32, color: [u8; 3]) -> Self {
        Self {
            text: text.into(),
            size,
            color,
            wrap_width: None,
            anchor: Anchor::Center,
            line_spacing: 1.0,
            shadow: None,
        }
    }

    /// Paragraph block wrapped to `width`
    pub fn caption<S: Into<String>>(text: S, size: f32, color: [u8; 3], width: u32) -> Self {
        Self {
            wrap_width: Some(width),
            ..Self::label(text, size, color)
        }
    }

    pub fn at(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Break into lines and size the block for a frame `frame_width` wide
    pub fn layout(&self, font: &FontFace, frame_width: u32) -> TextLayout {
        let mut size = self.size;

        let lines: Vec<String> = match self.wrap_width {
            Some(width) => self
                .text
                .lines()
                .flat_map(|para| wrap_paragraph(font, para, size, width as f32))
                .collect(),
            None => {
                let lines: Vec<String> = self.text.lines().map(|l| l.trim().to_string()).collect();
                let available = frame_width.saturating_sub(2 * LABEL_MARGIN).max(1) as f32;
                let widest = widest_line(font, &lines, size);
                if widest > available {
                    size *= available / widest;
                }
                lines
            }
        };

        let lines: Vec<String> = lines.into_iter().filter(|l| !l.is_empty()).collect();
        let line_height = font.line_height(size) * self.line_spacing;
        let width = widest_line(font, &lines, size).ceil() as u32;
        let height = (line_height * lines.len() as f32).ceil() as u32;

        TextLayout {
            lines,
            size,
            line_height,
            width,
            height,
        }
    }

    /// Rasterize onto `frame`, returning the layout used
    pub fn draw(&self, frame: &mut Frame, font: &FontFace) -> TextLayout {
        let layout = self.layout(font, frame.width());
        if layout.lines.is_empty() {
            return layout;
        }

        let top = match self.anchor {
            Anchor::Center => (frame.height() as f32 - layout.height as f32) / 2.0,
            Anchor::Top(y) => y as f32,
        };
        let ascent = font.ascent(layout.size);

        for (i, line) in layout.lines.iter().enumerate() {
            let line_width = font.line_width(line, layout.size);
            let x = (frame.width() as f32 - line_width) / 2.0;
            let baseline = top + i as f32 * layout.line_height + ascent;

            if let Some(shadow) = self.shadow {
                draw_line(
                    frame,
                    font,
                    line,
                    layout.size,
                    (x + shadow.offset.0 as f32, baseline + shadow.offset.1 as f32),
                    shadow.color,
                    shadow.opacity,
                );
            }
            draw_line(frame, font, line, layout.size, (x, baseline), self.color, 1.0);
        }

        layout
    }
}

fn widest_line(font: &FontFace, lines: &[String], size: f32) -> f32 {
    lines
        .iter()
        .map(|l| font.line_width(l, size))
        .fold(0.0, f32::max)
}

fn draw_line(
    frame: &mut Frame,
    face: &FontFace,
    text: &str,
    size: f32,
    origin: (f32, f32),
    color: [u8; 3],
    opacity: f32,
) {
    let font = face.font();
    let scaled = face.scaled(size);
    let scale = scaled.scale;
    let (mut caret, baseline) = origin;
    let mut prev = None;

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = prev {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, baseline));
        caret += scaled.h_advance(id);
        prev = Some(id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                frame.blend_pixel(
                    bounds.min.x as i32 + gx as i32,
                    bounds.min.y as i32 + gy as i32,
                    color,
                    coverage * opacity,
                );
            });
        }
    }
}

/// Scripts written without spaces between words
fn is_cjk(ch: char) -> bool {
    matches!(ch as u32,
        0x3000..=0x303F    // CJK punctuation
        | 0x3040..=0x30FF  // kana
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xAC00..=0xD7AF  // hangul
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFFEF) // fullwidth forms
}

enum Token<'a> {
    Word(&'a str),
    Space,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() || is_cjk(ch) {
            if let Some(start) = word_start.take() {
                tokens.push(Token::Word(&text[start..idx]));
            }
            if ch.is_whitespace() {
                tokens.push(Token::Space);
            } else {
                tokens.push(Token::Word(&text[idx..idx + ch.len_utf8()]));
            }
        } else if word_start.is_none() {
            word_start = Some(idx);
        }
    }

    if let Some(start) = word_start {
        tokens.push(Token::Word(&text[start..]));
    }

    tokens
}

/// Greedy line breaking
///
/// Latin words are kept whole unless a single word is wider than the line; CJK characters
/// are individual break opportunities.
pub fn wrap_paragraph(font: &FontFace, text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut pending_space = false;

    for token in tokenize(text) {
        match token {
            Token::Space => pending_space = !line.is_empty(),
            Token::Word(word) => {
                let candidate = if pending_space {
                    format!("{} {}", line, word)
                } else {
                    format!("{}{}", line, word)
                };
                pending_space = false;

                if font.line_width(&candidate, size) <= max_width {
                    line = candidate;
                    continue;
                }

                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }

                if font.line_width(word, size) <= max_width {
                    line = word.to_string();
                } else {
                    for ch in word.chars() {
                        line.push(ch);
                        if font.line_width(&line, size) > max_width && line.chars().count() > 1 {
                            line.pop();
                            lines.push(std::mem::take(&mut line));
                            line.push(ch);
                        }
                    }
                }
            }
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font() -> Option<FontFace> {
        FontFace::discover().ok()
    }

    #[test]
    fn test_tokenize_mixed_scripts() {
        let words: Vec<String> = tokenize("I love 苹果 pie")
            .into_iter()
            .filter_map(|t| match t {
                Token::Word(w) => Some(w.to_string()),
                Token::Space => None,
            })
            .collect();
        assert_eq!(words, vec!["I", "love", "苹", "果", "pie"]);
    }

    #[test]
    fn test_caption_lines_fit_width() {
        let Some(font) = font() else { return };
        let text = "Finding this little café on a rainy afternoon was pure serendipity for both of us.";

        let lines = wrap_paragraph(&font, text, 50.0, 600.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(font.line_width(line, 50.0) <= 600.0, "line too wide: {}", line);
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_label_shrinks_to_fit() {
        let Some(font) = font() else { return };
        let block = TextBlock::label("incomprehensibilities", 150.0, [255, 255, 255]);

        let layout = block.layout(&font, 1080);
        assert!(layout.size < 150.0);
        assert!(layout.width <= 1080 - 2 * LABEL_MARGIN + 1);
        assert_eq!(layout.lines.len(), 1);
    }

    #[test]
    fn test_label_keeps_explicit_lines() {
        let Some(font) = font() else { return };
        let block = TextBlock::label("cat\n/kæt/", 100.0, [255, 255, 0]);

        let layout = block.layout(&font, 1080);
        assert_eq!(layout.lines, vec!["cat", "/kæt/"]);
        assert_eq!(layout.size, 100.0);
    }

    #[test]
    fn test_draw_centers_text() {
        let Some(font) = font() else { return };
        let mut frame = Frame::new_black(400, 400);
        TextBlock::label("H", 120.0, [255, 255, 255]).draw(&mut frame, &font);

        let lit: Vec<(u32, u32)> = (0..400)
            .flat_map(|y| (0..400).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.get_pixel(x, y)[0] > 128)
            .collect();
        assert!(!lit.is_empty());

        let cx = lit.iter().map(|p| p.0 as f32).sum::<f32>() / lit.len() as f32;
        let cy = lit.iter().map(|p| p.1 as f32).sum::<f32>() / lit.len() as f32;
        assert!((cx - 200.0).abs() < 25.0);
        assert!((cy - 200.0).abs() < 60.0);
    }

    #[test]
    fn test_empty_block_draws_nothing() {
        let Some(font) = font() else { return };
        let mut frame = Frame::new_black(50, 50);
        let layout = TextBlock::caption("", 40.0, [255, 255, 255], 40).draw(&mut frame, &font);

        assert!(layout.lines.is_empty());
        assert_eq!(layout.height, 0);
    }
}
