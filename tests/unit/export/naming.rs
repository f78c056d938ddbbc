use super::*;

#[test]
fn collapses_punctuation_runs() {
    assert_eq!(slugify("Plant 1,000 Trees!!  Now"), "plant-1-000-trees-now");
}

#[test]
fn trims_leading_and_trailing_separators() {
    assert_eq!(slugify("  --Hello, World--  "), "hello-world");
}

#[test]
fn non_ascii_letters_become_separators() {
    assert_eq!(slugify("Café Ñandú"), "caf-and");
}

#[test]
fn truncates_without_trailing_dash() {
    let label = format!("{} tail", "a".repeat(47));
    let slug = slugify(&label);
    assert_eq!(slug, "a".repeat(47));
    assert!(slug.len() <= SLUG_MAX_CHARS);
}

#[test]
fn empty_label_falls_back() {
    assert_eq!(slugify("!!!"), FALLBACK_SLUG);
    assert_eq!(slugify(""), FALLBACK_SLUG);
}

#[test]
fn file_name_carries_size() {
    assert_eq!(
        file_name_for("Asha Rao", PosterSize::Portrait),
        "asha-rao-portrait.png"
    );
    assert_eq!(file_name_for("", PosterSize::Story), "story-card-story.png");
}
