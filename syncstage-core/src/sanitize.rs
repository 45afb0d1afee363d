//! Filesystem-safe file names.

use crate::normalize::collapse_whitespace;
use serde::{Deserialize, Serialize};

/// Punctuation that survives sanitization besides letters, digits and whitespace.
pub const SAFE_CHARS: &str = "-_.() []{}@~^+=,";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizeMode {
    /// Delete disallowed characters.
    #[default]
    Drop,
    /// Replace each disallowed character with `_`.
    Underscore,
}

fn is_allowed(c: char) -> bool {
    c.is_whitespace() || (!c.is_control() && (c.is_alphanumeric() || SAFE_CHARS.contains(c)))
}

/// Remove or replace characters that are unsafe in file names, then collapse whitespace.
///
/// ```
/// use syncstage_core::sanitize::{sanitize_filename, SanitizeMode};
///
/// assert_eq!(sanitize_filename("a:b?.txt", SanitizeMode::Drop), "ab.txt");
/// assert_eq!(sanitize_filename("a:b?.txt", SanitizeMode::Underscore), "a_b_.txt");
/// ```
pub fn sanitize_filename(name: &str, mode: SanitizeMode) -> String {
    let cleaned: String = match mode {
        SanitizeMode::Drop => name.chars().filter(|&c| is_allowed(c)).collect(),
        SanitizeMode::Underscore => name
            .chars()
            .map(|c| if is_allowed(c) { c } else { '_' })
            .collect(),
    };
    collapse_whitespace(&cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_invalid_characters() {
        assert_eq!(
            sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j.txt"#, SanitizeMode::Drop),
            "abcdefghij.txt"
        );
    }

    #[test]
    fn test_underscore_mode_replaces_each_character() {
        assert_eq!(
            sanitize_filename("report: final?.pdf", SanitizeMode::Underscore),
            "report_ final_.pdf"
        );
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(sanitize_filename("a\u{7}b\tc.txt", SanitizeMode::Drop), "ab c.txt");
    }

    #[test]
    fn test_safe_punctuation_is_kept() {
        let name = "a-b_c (1) [x] {y} @z ~w ^v +u =t, s.txt";
        assert_eq!(sanitize_filename(name, SanitizeMode::Drop), name);
    }

    #[test]
    fn test_unicode_letters_are_kept() {
        assert_eq!(
            sanitize_filename("รายงาน 観測.txt", SanitizeMode::Drop),
            "รายงาน 観測.txt"
        );
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(sanitize_filename("  a   b  ", SanitizeMode::Drop), "a b");
        assert_eq!(sanitize_filename("???", SanitizeMode::Drop), "");
    }
}
