//! Filename sanitization for downloaded media.

/// Sanitizes a free-text value into a filename-safe component.
///
/// Illegal filename characters, whitespace runs, and control characters
/// collapse to single underscores; leading/trailing underscores are trimmed.
/// May return an empty string, in which case the caller falls back to a
/// platform ID.
#[must_use]
pub fn sanitize_name(value: &str) -> String {
    let mut out = String::new();
    let mut prev_sep = false;
    for ch in value.chars() {
        let mapped = match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\'' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '#') => c,
            _ => '_',
        };
        if mapped == '_' {
            if !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else {
            out.push(mapped);
            prev_sep = false;
        }
    }
    out.trim_matches('_').to_string()
}
