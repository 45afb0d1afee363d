//! Detection of files that already carry their target name.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Built-in prefix: an 8-digit or ISO date followed by a separator.
pub const DATE_PREFIX_PATTERN: &str = r"^(?:\d{8}|\d{4}-\d{2}-\d{2})[ _-]";

static LEADING_TOKEN_RE: OnceLock<Regex> = OnceLock::new();

/// How the explicit prefix rule is configured.
///
/// In config files this is either a boolean (`true` selects the date preset)
/// or a regular expression string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefixSetting {
    Flag(bool),
    Pattern(String),
}

impl Default for PrefixSetting {
    fn default() -> Self {
        Self::Flag(false)
    }
}

impl PrefixSetting {
    /// Parse a command-line value: `true`/`preset`, `false`/`off`, or a regex.
    pub fn from_arg(value: &str) -> Self {
        match value {
            "true" | "preset" | "default" => Self::Flag(true),
            "false" | "off" | "none" => Self::Flag(false),
            pattern => Self::Pattern(pattern.to_string()),
        }
    }

    fn pattern(&self) -> Option<&str> {
        match self {
            Self::Flag(true) => Some(DATE_PREFIX_PATTERN),
            Self::Flag(false) => None,
            Self::Pattern(p) if p.is_empty() => None,
            Self::Pattern(p) => Some(p),
        }
    }
}

/// Why a candidate was considered already renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlreadyNamed {
    ExactMatch,
    PrefixPattern,
    HeuristicPrefix,
}

#[derive(Debug, Clone, Default)]
pub struct IdempotencyPolicy {
    enabled: bool,
    prefix: Option<Regex>,
}

impl IdempotencyPolicy {
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Build the policy. An invalid pattern leaves only the heuristic rule active.
    pub fn new(enabled: bool, setting: &PrefixSetting) -> Self {
        let prefix = setting.pattern().and_then(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!("ignoring invalid idempotent prefix '{}': {}", pattern, e);
                None
            },
        });
        Self { enabled, prefix }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Decide whether `current` is already in the shape of `computed`.
    pub fn check(&self, current: &str, computed: &str) -> Option<AlreadyNamed> {
        if !self.enabled {
            return None;
        }
        if current == computed {
            return Some(AlreadyNamed::ExactMatch);
        }
        match &self.prefix {
            Some(re) => re
                .find(current)
                .filter(|m| m.start() == 0)
                .map(|_| AlreadyNamed::PrefixPattern),
            None => heuristic_prefix(computed)
                .filter(|token| {
                    current
                        .strip_prefix(*token)
                        .is_some_and(|rest| rest.starts_with([' ', '_', '-']))
                })
                .map(|_| AlreadyNamed::HeuristicPrefix),
        }
    }
}

/// Leading token of a computed name, present only when a separator follows it.
pub fn heuristic_prefix(computed: &str) -> Option<&str> {
    LEADING_TOKEN_RE
        .get_or_init(|| Regex::new(r"^([^\s_\-]+)[\s_\-]+").expect("prefix regex is valid"))
        .captures(computed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_policy_never_skips() {
        let policy = IdempotencyPolicy::disabled();
        assert_eq!(policy.check("a.txt", "a.txt"), None);
    }

    #[test]
    fn test_exact_match() {
        let policy = IdempotencyPolicy::new(true, &PrefixSetting::Flag(true));
        assert_eq!(
            policy.check("b.txt", "b.txt"),
            Some(AlreadyNamed::ExactMatch)
        );
    }

    #[test]
    fn test_date_preset() {
        let policy = IdempotencyPolicy::new(true, &PrefixSetting::Flag(true));
        assert_eq!(
            policy.check("20240101_scan.pdf", "2024-03-05 Scan.pdf"),
            Some(AlreadyNamed::PrefixPattern)
        );
        assert_eq!(
            policy.check("2023-12-31 notes.md", "2024-03-05 Notes.md"),
            Some(AlreadyNamed::PrefixPattern)
        );
        assert_eq!(policy.check("notes.md", "2024-03-05 Notes.md"), None);
    }

    #[test]
    fn test_explicit_pattern_must_match_at_start() {
        let policy =
            IdempotencyPolicy::new(true, &PrefixSetting::Pattern(r"IMG-\d+".to_string()));
        assert_eq!(
            policy.check("IMG-001 beach.jpg", "x.jpg"),
            Some(AlreadyNamed::PrefixPattern)
        );
        assert_eq!(policy.check("beach IMG-001.jpg", "x.jpg"), None);
    }

    #[test]
    fn test_explicit_pattern_disables_heuristic() {
        let policy =
            IdempotencyPolicy::new(true, &PrefixSetting::Pattern("^never".to_string()));
        assert_eq!(
            policy.check("2024-03-05 other.txt", "2024-03-05 Notes.txt"),
            None
        );
    }

    #[test]
    fn test_heuristic_prefix() {
        let policy = IdempotencyPolicy::new(true, &PrefixSetting::Flag(false));
        assert_eq!(
            policy.check("2024-03-05 old name.txt", "2024-03-05 New Name.txt"),
            Some(AlreadyNamed::HeuristicPrefix)
        );
        assert_eq!(
            policy.check("2024_report.txt", "2024 Report.txt"),
            Some(AlreadyNamed::HeuristicPrefix)
        );
        assert_eq!(policy.check("2024report.txt", "2024 Report.txt"), None);
        assert_eq!(policy.check("notes.txt", "Notes.txt"), None);
    }

    #[test]
    fn test_invalid_pattern_falls_back_to_heuristic() {
        let policy = IdempotencyPolicy::new(true, &PrefixSetting::Pattern("([".to_string()));
        assert_eq!(
            policy.check("2024-03-05 a.txt", "2024-03-05 B.txt"),
            Some(AlreadyNamed::HeuristicPrefix)
        );
    }

    #[test]
    fn test_heuristic_token() {
        assert_eq!(heuristic_prefix("2024-03-05 Notes.txt"), Some("2024"));
        assert_eq!(heuristic_prefix("Notes.txt"), None);
    }

    #[test]
    fn test_setting_from_arg() {
        assert_eq!(PrefixSetting::from_arg("true"), PrefixSetting::Flag(true));
        assert_eq!(PrefixSetting::from_arg("off"), PrefixSetting::Flag(false));
        assert_eq!(
            PrefixSetting::from_arg(r"^\d+"),
            PrefixSetting::Pattern(r"^\d+".to_string())
        );
    }
}
