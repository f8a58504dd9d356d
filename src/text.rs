//! Greedy line breaking against real font metrics.
//!
//! Both the PDF canvas and any other [`Canvas`](crate::canvas::Canvas)
//! implementation measure through here, so a block measured before a page-break
//! decision is exactly as tall as the block drawn afterwards.

use crate::canvas::TextStyle;
use crate::fonts::{FontBook, FontEntry};

#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub width: f32,
}

fn finish_line(words: &mut Vec<(String, f32)>, space_w: f32) -> TextLine {
    let width = words.iter().map(|(_, w)| *w).sum::<f32>()
        + space_w * words.len().saturating_sub(1) as f32;
    let text = words
        .drain(..)
        .map(|(w, _)| w)
        .collect::<Vec<_>>()
        .join(" ");
    TextLine { text, width }
}

/// Split a word that is wider than the line on its own into line-sized pieces.
fn split_long_word(
    word: &str,
    entry: &FontEntry,
    font_size: f32,
    max_width: f32,
) -> Vec<(String, f32)> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_w = 0.0f32;
    for ch in word.chars() {
        let cw = entry.char_width_1000(ch) * font_size / 1000.0;
        if !current.is_empty() && current_w + cw > max_width {
            pieces.push((std::mem::take(&mut current), current_w));
            current_w = 0.0;
        }
        current.push(ch);
        current_w += cw;
    }
    if !current.is_empty() {
        pieces.push((current, current_w));
    }
    pieces
}

/// Break `text` into lines no wider than `max_width`. Explicit newlines always
/// start a new line; `None` disables wrapping entirely.
pub fn wrap_lines(
    entry: &FontEntry,
    text: &str,
    font_size: f32,
    max_width: Option<f32>,
) -> Vec<TextLine> {
    let space_w = entry.space_width(font_size);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let Some(max_width) = max_width else {
            let trimmed = paragraph.trim();
            lines.push(TextLine {
                text: trimmed.to_string(),
                width: entry.text_width(trimmed, font_size),
            });
            continue;
        };

        let mut current: Vec<(String, f32)> = Vec::new();
        let mut current_x = 0.0f32;

        for word in paragraph.split_whitespace() {
            let ww = entry.text_width(word, font_size);
            let pieces = if ww > max_width {
                split_long_word(word, entry, font_size, max_width)
            } else {
                vec![(word.to_string(), ww)]
            };

            for (piece, pw) in pieces {
                let proposed_x = if current.is_empty() {
                    0.0
                } else {
                    current_x + space_w
                };
                if !current.is_empty() && proposed_x + pw > max_width {
                    lines.push(finish_line(&mut current, space_w));
                    current_x = pw;
                } else {
                    current_x = proposed_x + pw;
                }
                current.push((piece, pw));
            }
        }

        if current.is_empty() {
            lines.push(TextLine {
                text: String::new(),
                width: 0.0,
            });
        } else {
            lines.push(finish_line(&mut current, space_w));
        }
    }

    // Trailing blank lines take no room.
    while lines.last().is_some_and(|l| l.text.is_empty()) {
        lines.pop();
    }
    lines
}

/// Height `text` occupies when drawn with `style` inside `width`.
pub fn measure(fonts: &FontBook, text: &str, width: Option<f32>, style: &TextStyle) -> f32 {
    let entry = fonts.entry(style.face);
    let lines = wrap_lines(entry, text, style.size, width);
    lines.len() as f32 * entry.line_height(style.size)
}

/// Wrapped lines of `text`, without their widths.
pub fn wrap(fonts: &FontBook, text: &str, width: Option<f32>, style: &TextStyle) -> Vec<String> {
    wrap_lines(fonts.entry(style.face), text, style.size, width)
        .into_iter()
        .map(|line| line.text)
        .collect()
}
