//! URL slug derivation.

/// Longest slug the store accepts.
pub const MAX_SLUG_LEN: usize = 250;

/// Transliterate `text` into a lowercase, hyphen-separated ASCII slug.
///
/// Non-Latin scripts are mapped to their closest Latin spelling, any run of
/// characters outside `[a-z0-9]` becomes a single hyphen and the result never
/// starts or ends with one. May return an empty string (e.g. for `"!!!"`).
pub fn slugify(text: &str) -> String {
    let slug = slug::slugify(text);
    if slug.len() <= MAX_SLUG_LEN {
        return slug;
    }

    // Output is pure ASCII, so byte truncation is safe.
    slug[..MAX_SLUG_LEN].trim_end_matches('-').to_string()
}

/// Whether `candidate` is already in slug form.
pub fn is_valid_slug(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.len() <= MAX_SLUG_LEN
        && !candidate.starts_with('-')
        && !candidate.ends_with('-')
        && !candidate.contains("--")
        && candidate
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_ascii_title() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Rust, Tokio & Actix!  "), "rust-tokio-actix");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("Héllo Wörld"), "hello-world");
        assert_eq!(slugify("Привет мир"), "privet-mir");
    }

    #[test]
    fn test_slugify_punctuation_only_is_empty() {
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_truncates_long_titles() {
        let title = "word ".repeat(100);
        let slug = slugify(&title);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
        assert!(is_valid_slug(&slug));
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("hello-world"));
        assert!(is_valid_slug("post-42"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-hello"));
        assert!(!is_valid_slug("hello--world"));
        assert!(!is_valid_slug("Hello"));
        assert!(!is_valid_slug("hello world"));
    }
}
