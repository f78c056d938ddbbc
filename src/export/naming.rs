use crate::layout::table::PosterSize;

/// Longest slug kept in a file name.
pub const SLUG_MAX_CHARS: usize = 48;

/// Slug used when the label has no alphanumeric content.
pub const FALLBACK_SLUG: &str = "story-card";

/// Lowercase, collapse every non-alphanumeric run to one `-`, trim and truncate.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;
    for ch in label.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    if slug.len() > SLUG_MAX_CHARS {
        slug.truncate(SLUG_MAX_CHARS);
        let trimmed = slug.trim_end_matches('-').len();
        slug.truncate(trimmed);
    }
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// `{slug}-{size}.png`.
pub fn file_name_for(label: &str, size: PosterSize) -> String {
    format!("{}-{}.png", slugify(label), size.as_str())
}

#[cfg(test)]
#[path = "../../tests/unit/export/naming.rs"]
mod tests;
