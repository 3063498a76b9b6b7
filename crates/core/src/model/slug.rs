//! Slug and content-key derivation.

/// Derive a URL slug from a vocabulary phrase.
///
/// Lowercases the phrase, turns spaces into hyphens and drops `#`
/// (hashtag-style phrases such as `#Foo Bar` become `foo-bar`).
pub fn slugify(phrase: &str) -> String {
    phrase
        .to_lowercase()
        .chars()
        .filter(|c| *c != '#')
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

/// Derive a URL slug from an item title.
///
/// Keeps only `[a-z0-9 ]` after lowercasing and turns spaces into hyphens.
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

/// Content key for a slug: lowercase hex md5 digest.
pub fn content_key(slug: &str) -> String {
    format!("{:x}", md5::compute(slug.as_bytes()))
}
