use crate::error::RenameError;
use regex::Regex;

/// Post-normalization substitutions applied to the reassembled name.
///
/// Literal pairs run first, in order, each replacing every occurrence. Regex
/// pairs run next under the same rule; replacements may use `$1`/`${name}`.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    literal: Vec<(String, String)>,
    patterns: Vec<(Regex, String)>,
}

impl Substitutions {
    pub fn new(
        literal: Vec<(String, String)>,
        patterns: &[(String, String)],
    ) -> Result<Self, RenameError> {
        let patterns = patterns
            .iter()
            .map(|(pattern, replacement)| {
                Regex::new(pattern)
                    .map(|re| (re, replacement.clone()))
                    .map_err(|source| RenameError::Pattern {
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { literal, patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.literal.is_empty() && self.patterns.is_empty()
    }

    pub fn apply(&self, name: &str) -> String {
        let mut out = name.to_string();
        for (from, to) in &self.literal {
            if !from.is_empty() {
                out = out.replace(from.as_str(), to);
            }
        }
        for (re, replacement) in &self.patterns {
            out = re.replace_all(&out, replacement.as_str()).into_owned();
        }
        out
    }
}
