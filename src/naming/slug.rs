use crate::constants::SLUG_MAX_LEN;

/// Punctuation spelled out as its own word before collapsing, so titles
/// like "Why?" and "Why" get different slugs. Everything else collapses.
const SPELLED_PUNCTUATION: &[(char, &str)] = &[('?', "q")];

/// Convert transliterated text into a lowercase, underscore-delimited token.
///
/// The result matches `^[a-z0-9](_?[a-z0-9]+)*$` or is empty, is at most
/// [`SLUG_MAX_LEN`] characters long, and `slugify(slugify(x)) == slugify(x)`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut separator = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if separator && !slug.is_empty() {
                slug.push('_');
            }
            separator = false;
            slug.push(c);
        } else if let Some(word) = spelled_word(c) {
            if !slug.is_empty() {
                slug.push('_');
            }
            slug.push_str(word);
            separator = true;
        } else {
            separator = true;
        }
    }

    truncate_slug(slug)
}

fn spelled_word(c: char) -> Option<&'static str> {
    SPELLED_PUNCTUATION
        .iter()
        .find(|(punct, _)| *punct == c)
        .map(|(_, word)| *word)
}

fn truncate_slug(mut slug: String) -> String {
    // slug is pure ASCII here, so byte and char positions agree
    if slug.len() > SLUG_MAX_LEN {
        slug.truncate(SLUG_MAX_LEN);
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}
