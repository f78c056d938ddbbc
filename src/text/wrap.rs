use crate::layout::table::{LayoutScale, PosterSize, TextBlockSpec};
use crate::text::font::FontSpec;

/// Marker appended to the last visible line of clamped text.
pub const ELLIPSIS: &str = "...";

/// Text measurement capability: rendered advance width of `text` in `font`.
pub trait TextMeasure {
    /// Width in pixels of `text` laid out on a single line.
    fn measure(&mut self, text: &str, font: &FontSpec) -> f32;
}

/// Greedy word wrap on whitespace-separated tokens.
///
/// A token wider than `max_width` is kept on its own line unmodified.
pub fn wrap_to_width(
    measure: &mut dyn TextMeasure,
    text: &str,
    font: &FontSpec,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for token in text.split_whitespace() {
        let candidate = if current.is_empty() {
            token.to_string()
        } else {
            format!("{current} {token}")
        };
        if measure.measure(&candidate, font) > max_width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, token.to_string()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Limit `lines` to `max_lines`, marking truncation on the last kept line.
pub fn clamp_lines(mut lines: Vec<String>, max_lines: usize) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        let kept = last.trim_end_matches('.').len();
        last.truncate(kept);
        last.push_str(ELLIPSIS);
    }
    lines
}

/// A wrapped and clamped block, at reference scale.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    /// Visible lines, top to bottom.
    pub lines: Vec<String>,
    /// Font the lines were measured with.
    pub font: FontSpec,
    /// Distance between consecutive line tops.
    pub line_advance: f64,
}

impl TextBlock {
    /// Total block height at reference scale.
    pub fn height(&self) -> f64 {
        self.line_advance * self.lines.len() as f64
    }

    /// Whether the block has nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Wrap then clamp `text` for `spec`.
///
/// Measurement happens at reference scale so every output size (and the preview) breaks lines
/// at the same words; callers multiply positions by a [`LayoutScale`] afterwards.
pub fn layout_block(
    measure: &mut dyn TextMeasure,
    text: &str,
    spec: &TextBlockSpec,
    size: PosterSize,
) -> TextBlock {
    let font = LayoutScale::REFERENCE.font(spec.font);
    let lines = wrap_to_width(measure, text, &font, spec.max_width as f32);
    TextBlock {
        lines: clamp_lines(lines, spec.max_lines_for(size)),
        font,
        line_advance: f64::from(font.size_px * spec.line_height),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
