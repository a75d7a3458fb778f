// src/utils/slug.rs

use std::sync::LazyLock;

use regex::Regex;

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern compiles"));

/// Lowercase ASCII words joined by single hyphens, e.g. `projectile-motion`.
pub fn is_valid_slug(candidate: &str) -> bool {
    SLUG_PATTERN.is_match(candidate)
}

/// Validator hook for DTO fields carrying a slug.
pub fn validate_slug(candidate: &str) -> Result<(), validator::ValidationError> {
    if !is_valid_slug(candidate) {
        return Err(validator::ValidationError::new("invalid_slug"));
    }
    Ok(())
}

/// Derives a slug from a display title.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for word in title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(&word.to_ascii_lowercase());
    }
    slug
}
