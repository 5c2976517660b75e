//! Domain name normalization.

/// The domain every unmatched analysis request falls back to.
pub const DEFAULT_DOMAIN: &str = "general";

/// Normalize a display domain into a registry key.
///
/// Lowercases the input and collapses runs of spaces, hyphens, and
/// underscores into a single underscore, so `"Art Style"`, `"Art-Style"`,
/// and `"art_style"` all resolve to the same handler. A missing or blank
/// domain maps to [`DEFAULT_DOMAIN`]. Normalization is idempotent.
pub fn normalize_domain(raw: Option<&str>) -> String {
    let raw = match raw.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => return DEFAULT_DOMAIN.into(),
    };

    let mut key = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for ch in raw.chars() {
        if ch == ' ' || ch == '-' || ch == '_' {
            pending_separator = !key.is_empty();
        } else {
            if pending_separator {
                key.push('_');
                pending_separator = false;
            }
            key.extend(ch.to_lowercase());
        }
    }
    key
}
