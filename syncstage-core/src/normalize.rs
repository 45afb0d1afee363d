//! Stem normalization and casing policies.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Acronyms that smart casing always writes in upper case.
pub const ACRONYMS: &[&str] = &[
    "PDF", "CAD", "RF", "SDR", "STM32", "FPGA", "SAR", "GNSS", "IOT", "CPU", "GPU", "GPS", "USB",
    "I2C", "SPI", "CAN", "AI", "ML",
];

/// Minor words that smart casing lowercases unless first or last.
pub const SMALL_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "from", "in", "of", "on", "or", "the", "to",
    "vs", "via",
];

const DROPPED_SYMBOLS: &[char] = &[
    '"', '\'', '?', '!', '`', '·', '•', '^', '/', '\\', '|', '*', '<', '>',
];

static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    Keep,
    Lower,
    Upper,
    Title,
    #[default]
    Smart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtCase {
    #[default]
    Keep,
    Lower,
    Upper,
}

/// Options controlling [`normalize_stem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub case_mode: CaseMode,
    pub drop_symbols: bool,
    pub convert_underscores: bool,
    pub convert_dashes: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            case_mode: CaseMode::Smart,
            drop_symbols: true,
            convert_underscores: true,
            convert_dashes: false,
        }
    }
}

/// Collapse every whitespace run into one space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE
        .get_or_init(|| Regex::new(r"\s+").expect("whitespace regex is valid"))
        .replace_all(text, " ")
        .trim()
        .to_string()
}

/// Normalize a file stem: NFKC, separators, symbols, whitespace, then casing.
pub fn normalize_stem(stem: &str, options: &NormalizeOptions) -> String {
    let mut s: String = stem.nfkc().collect();
    if options.convert_underscores {
        s = s.replace('_', " ");
    }
    if options.convert_dashes {
        s = s.replace('-', " ");
    }
    if options.drop_symbols {
        s.retain(|c| !DROPPED_SYMBOLS.contains(&c));
    }
    let s = collapse_whitespace(&s);

    match options.case_mode {
        CaseMode::Keep => s,
        CaseMode::Lower => s.to_lowercase(),
        CaseMode::Upper => s.to_uppercase(),
        CaseMode::Title => title_case(&s),
        CaseMode::Smart => smart_title_case(&s),
    }
}

/// Apply an extension casing policy. The leading dot is unaffected.
pub fn apply_ext_case(ext: &str, ext_case: ExtCase) -> String {
    match ext_case {
        ExtCase::Keep => ext.to_string(),
        ExtCase::Lower => ext.to_lowercase(),
        ExtCase::Upper => ext.to_uppercase(),
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Title-case `text` while keeping acronyms upper case and minor words lower case.
///
/// Words are separated by whitespace and `-`; separators are kept as-is.
pub fn smart_title_case(text: &str) -> String {
    let parts = split_keep_separators(text);
    let word_positions: Vec<usize> = parts
        .iter()
        .enumerate()
        .filter(|(_, (_, is_sep))| !is_sep)
        .map(|(i, _)| i)
        .collect();
    let first = word_positions.first().copied();
    let last = word_positions.last().copied();

    let mut out = String::with_capacity(text.len());
    for (i, (part, is_sep)) in parts.iter().enumerate() {
        if *is_sep {
            out.push_str(part);
            continue;
        }
        let core: String = part
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .flat_map(char::to_uppercase)
            .collect();
        if ACRONYMS.contains(&core.as_str()) {
            out.push_str(&core);
            continue;
        }
        let lower = part.to_lowercase();
        let is_edge = Some(i) == first || Some(i) == last;
        if !is_edge && SMALL_WORDS.contains(&lower.as_str()) {
            out.push_str(&lower);
        } else {
            out.push_str(&capitalize(&lower));
        }
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split into `(text, is_separator)` pieces; separators are whitespace runs and single dashes.
fn split_keep_separators(text: &str) -> Vec<(&str, bool)> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();

    while let Some((idx, c)) = iter.next() {
        if c == '-' {
            if idx > start {
                parts.push((&text[start..idx], false));
            }
            parts.push((&text[idx..idx + 1], true));
            start = idx + 1;
        } else if c.is_whitespace() {
            if idx > start {
                parts.push((&text[start..idx], false));
            }
            let mut end = idx + c.len_utf8();
            while let Some(&(next_idx, next)) = iter.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = next_idx + next.len_utf8();
                iter.next();
            }
            parts.push((&text[idx..end], true));
            start = end;
        }
    }
    if start < text.len() {
        parts.push((&text[start..], false));
    }
    parts
}
