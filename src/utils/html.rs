// src/utils/html.rs

/// Escapes user-supplied text for embedding in HTML element content
/// or in quoted attribute values.
///
/// Uses ammonia's text escaper rather than its sanitizer: every character
/// that could open markup is entity-encoded, nothing is stripped.
pub fn escape_text(input: &str) -> String {
    ammonia::clean_text(input)
}
