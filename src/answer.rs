//! Answer Normalization and Matching
//!
//! Pure string helpers for validating puzzle submissions. Both the
//! submitted value and every accepted value go through the same
//! normalizer; a match means normalized equality. No partial credit,
//! no edit-distance fuzz.

/// Normalize an answer for comparison: trim, lowercase, and collapse
/// internal whitespace runs to single spaces.
pub fn normalize(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Stricter unicode-aware normalizer: lowercase, canonicalize curly
/// apostrophes to straight ones, then strip everything that is not a
/// letter, digit, or apostrophe.
///
/// Useful for answers typed on phones, where smart quotes and stray
/// punctuation sneak in.
pub fn normalize_strict(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .filter(|c| c.is_alphanumeric() || *c == '\'')
        .collect()
}

/// Check a submission against one or more accepted answers.
pub fn matches(submitted: &str, accepted: &[String]) -> bool {
    let user = normalize(submitted);
    accepted.iter().any(|a| normalize(a) == user)
}

/// Strict variant of [`matches`] using [`normalize_strict`].
pub fn matches_strict(submitted: &str, accepted: &[String]) -> bool {
    let user = normalize_strict(submitted);
    accepted.iter().any(|a| normalize_strict(a) == user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  Blue   Sky "), "blue sky");
        assert_eq!(normalize("blue sky"), "blue sky");
        assert_eq!(normalize("\tBLUE\n\nSKY\t"), "blue sky");
    }

    #[test]
    fn test_match_is_case_and_whitespace_insensitive() {
        assert!(matches("  Blue   Sky ", &accepted(&["blue sky"])));
        assert!(matches("A Piano", &accepted(&["a piano", "piano"])));
        assert!(!matches("blue skies", &accepted(&["blue sky"])));
    }

    #[test]
    fn test_match_any_of_multiple_accepted() {
        let list = accepted(&["an echo", "echo"]);
        assert!(matches("Echo", &list));
        assert!(matches("AN ECHO", &list));
        assert!(!matches("echoes", &list));
    }

    #[test]
    fn test_empty_submission_never_matches() {
        assert!(!matches("", &accepted(&["echo"])));
        assert!(!matches("   ", &accepted(&["echo"])));
    }

    #[test]
    fn test_normalize_strict_handles_curly_quotes() {
        assert_eq!(normalize_strict("It\u{2019}s blue!"), "it'sblue");
        assert_eq!(normalize_strict("don't"), "don't");
    }

    #[test]
    fn test_normalize_strict_strips_punctuation_and_spaces() {
        assert_eq!(normalize_strict("  a map...  "), "amap");
        assert_eq!(normalize_strict("Caf\u{e9}!"), "caf\u{e9}");
    }

    #[test]
    fn test_matches_strict() {
        assert!(matches_strict("it\u{2019}s blue", &accepted(&["It's Blue"])));
        assert!(matches_strict("pencil-lead", &accepted(&["pencil lead"])));
        assert!(!matches_strict("pen", &accepted(&["pencil lead"])));
    }
}
