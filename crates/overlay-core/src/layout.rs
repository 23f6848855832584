//! Right-to-left token placement
//!
//! The drawing surface only lays characters out left to right. A phrase that
//! reads right to left is therefore split into tokens that are drawn in
//! reverse order, each token as-is, advancing the cursor by the token width
//! plus one space.

use cert_types::DrawInstruction;

use crate::font::FontMetrics;

/// Split a phrase on whitespace, keeping reading order
pub fn tokenize(phrase: &str) -> Vec<&str> {
    phrase.split_whitespace().collect()
}

/// Reverse reading order into drawing order. Applying it twice is a no-op.
pub fn visual_order<S: AsRef<str>>(tokens: &[S]) -> Vec<&str> {
    tokens.iter().rev().map(AsRef::as_ref).collect()
}

/// Place `tokens` (in reading order) on the baseline `y`, starting at `start_x`
/// and moving right.
pub fn layout_rtl<S, F>(
    tokens: &[S],
    start_x: f64,
    y: f64,
    font: &F,
    size: f64,
) -> Vec<DrawInstruction>
where
    S: AsRef<str>,
    F: FontMetrics + ?Sized,
{
    let space_width = font.width_of_text_at_size(" ", size);
    let mut cursor = start_x;
    let mut instructions = Vec::with_capacity(tokens.len());

    for (index, token) in visual_order(tokens).into_iter().enumerate() {
        let width = font.width_of_text_at_size(token, size);
        tracing::debug!(
            "Part {}: {:?} at x={}, width={}",
            index,
            token,
            cursor,
            width
        );
        instructions.push(DrawInstruction {
            text: token.to_string(),
            x: cursor,
            y,
            size,
            font: font.name().to_string(),
        });
        cursor += width + space_width;
    }

    instructions
}

/// A single run drawn exactly as given
pub fn layout_literal<F>(text: &str, x: f64, y: f64, font: &F, size: f64) -> DrawInstruction
where
    F: FontMetrics + ?Sized,
{
    DrawInstruction {
        text: text.to_string(),
        x,
        y,
        size,
        font: font.name().to_string(),
    }
}
