use super::*;
use crate::text::font::FontWeight;

/// Every character advances 10px regardless of font.
struct FixedAdvance;

impl TextMeasure for FixedAdvance {
    fn measure(&mut self, text: &str, _font: &FontSpec) -> f32 {
        text.chars().count() as f32 * 10.0
    }
}

fn font() -> FontSpec {
    FontSpec::new(20.0, FontWeight::Regular)
}

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn wraps_between_words_when_two_fit() {
    // "one two" is 70px wide; adding " three" would be 130px.
    let lines = wrap_to_width(&mut FixedAdvance, "one two three", &font(), 80.0);
    assert_eq!(lines, strings(&["one two", "three"]));
}

#[test]
fn overlong_token_stays_whole_on_its_own_line() {
    let lines = wrap_to_width(&mut FixedAdvance, "a supercalifragilistic b", &font(), 50.0);
    assert_eq!(lines, strings(&["a", "supercalifragilistic", "b"]));
}

#[test]
fn whitespace_runs_collapse_and_empty_input_yields_no_lines() {
    let lines = wrap_to_width(&mut FixedAdvance, "  one \n\t two  ", &font(), 1000.0);
    assert_eq!(lines, strings(&["one two"]));
    assert!(wrap_to_width(&mut FixedAdvance, "   ", &font(), 1000.0).is_empty());
}

#[test]
fn clamp_keeps_short_input_unchanged() {
    let lines = strings(&["a", "b"]);
    assert_eq!(clamp_lines(lines.clone(), 2), lines);
    assert_eq!(clamp_lines(lines.clone(), 5), lines);
}

#[test]
fn clamp_truncates_and_marks_last_line() {
    let out = clamp_lines(strings(&["a", "b", "c", "d"]), 2);
    assert_eq!(out.len(), 2);
    assert_eq!(out[1], "b...");
    assert!(out[1].ends_with(ELLIPSIS));
}

#[test]
fn clamp_strips_trailing_periods_before_ellipsis() {
    let out = clamp_lines(strings(&["first line", "ends here..", "gone"]), 2);
    assert_eq!(out[1], "ends here...");
    assert!(!out[1].ends_with("...."));
}

#[test]
fn clamp_to_zero_lines_is_empty() {
    assert!(clamp_lines(strings(&["a", "b"]), 0).is_empty());
}

#[test]
fn layout_block_uses_story_clamp_and_reference_font() {
    let spec = TextBlockSpec {
        font: FontSpec::new(20.0, FontWeight::Bold),
        line_height: 1.5,
        max_width: 30.0,
        max_lines: 2,
        story_max_lines: 3,
    };
    let text = "aa bb cc dd";
    let portrait = layout_block(&mut FixedAdvance, text, &spec, PosterSize::Portrait);
    let story = layout_block(&mut FixedAdvance, text, &spec, PosterSize::Story);
    assert_eq!(portrait.lines, strings(&["aa", "bb..."]));
    assert_eq!(story.lines, strings(&["aa", "bb", "cc..."]));
    assert_eq!(story.line_advance, 30.0);
    assert_eq!(story.height(), 90.0);
    assert_eq!(story.font, spec.font);
}
