//! Game slug derivation from a listing page URL.

use url::Url;

/// Longest slug we are willing to interpolate into a candidate URL.
const MAX_SLUG_LEN: usize = 128;

/// Derive the game slug from a page URL.
///
/// Takes the last non-empty path segment, so both
/// `https://site/monster-survivors` and `https://site/monster-survivors/`
/// yield `monster-survivors`. Never fails: an unusable input produces an
/// empty string, which [`is_valid_slug`] rejects.
pub fn derive_slug(page_url: &str) -> String {
    if let Ok(url) = Url::parse(page_url.trim()) {
        if let Some(segments) = url.path_segments() {
            return segments
                .filter(|s| !s.is_empty())
                .last()
                .unwrap_or_default()
                .to_string();
        }
        return String::new();
    }

    // Not an absolute URL; treat it as a bare path.
    let path = page_url
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    path.split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .last()
        .unwrap_or_default()
        .to_string()
}

/// Whether a slug is safe to substitute into a URL path.
///
/// Only ASCII letters, digits, `-`, `_` and `.` are accepted, and the
/// relative segments `.` and `..` are refused.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && slug != "."
        && slug != ".."
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(
            derive_slug("https://www.onlinegames.io/monster-survivors/"),
            "monster-survivors"
        );
    }

    #[test]
    fn last_segment_without_trailing_slash() {
        assert_eq!(
            derive_slug("https://www.onlinegames.io/games/monster-survivors"),
            "monster-survivors"
        );
    }

    #[test]
    fn query_and_fragment_are_ignored() {
        assert_eq!(
            derive_slug("https://www.onlinegames.io/drift-boss/?ref=home#play"),
            "drift-boss"
        );
        assert_eq!(derive_slug("/drift-boss/?ref=home"), "drift-boss");
    }

    #[test]
    fn repeated_slashes_are_skipped() {
        assert_eq!(derive_slug("https://example.com/a//b///"), "b");
    }

    #[test]
    fn root_url_has_empty_slug() {
        assert_eq!(derive_slug("https://example.com/"), "");
        assert_eq!(derive_slug("https://example.com"), "");
        assert_eq!(derive_slug(""), "");
    }

    #[test]
    fn non_hierarchical_url_has_empty_slug() {
        assert_eq!(derive_slug("mailto:someone@example.com"), "");
    }

    #[test]
    fn unexpected_characters_pass_through_derivation() {
        // Derivation does not sanitize; validation is a separate step.
        let slug = derive_slug("https://example.com/some%20game/");
        assert_eq!(slug, "some%20game");
        assert!(!is_valid_slug(&slug));
    }

    #[test]
    fn valid_slugs() {
        assert!(is_valid_slug("monster-survivors"));
        assert!(is_valid_slug("game_2.final"));
        assert!(is_valid_slug("12345"));
    }

    #[test]
    fn invalid_slugs() {
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("."));
        assert!(!is_valid_slug(".."));
        assert!(!is_valid_slug("a b"));
        assert!(!is_valid_slug("../etc"));
        assert!(!is_valid_slug("a?b=c"));
        assert!(!is_valid_slug(&"x".repeat(MAX_SLUG_LEN + 1)));
    }
}
