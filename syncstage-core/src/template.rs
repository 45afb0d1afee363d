//! Naming templates.
//!
//! A template is literal text interleaved with tokens:
//!
//! - `{created}` / `{created:<strftime>}` - creation time, default `%Y-%m-%d`
//! - `{modified}` / `{modified:<strftime>}` - modification time
//! - `{stem}` - original name without its extension
//! - `{ext}` - original extension including the dot
//! - `{parent}` - name of the containing directory
//! - `{counter}` - `1`, or the collision counter when re-rendering
//!
//! Anything else in braces is kept verbatim.

use crate::candidate::RenameCandidate;
use crate::error::RenameError;
use crate::name::{pad_counter, split_name_ext};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use regex::Regex;
use std::fmt::Write;
use std::sync::OnceLock;

pub const DEFAULT_TEMPLATE: &str = "{created:%Y-%m-%d} {stem}{ext}";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

fn token_re() -> &'static Regex {
    TOKEN_RE.get_or_init(|| {
        Regex::new(r"\{(?:(created|modified)(?::(%[^}]+))?|(stem|ext|parent|counter))\}")
            .expect("token regex is valid")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateKind {
    Created,
    Modified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Date { kind: DateKind, format: String },
    Stem,
    Ext,
    Parent,
    Counter,
}

/// A parsed naming template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in token_re().captures_iter(source) {
            let whole = caps.get(0).expect("group 0 always matches");
            if whole.start() > last {
                segments.push(Segment::Literal(source[last..whole.start()].to_string()));
            }
            let segment = if let Some(kind) = caps.get(1) {
                let kind = if kind.as_str() == "created" {
                    DateKind::Created
                } else {
                    DateKind::Modified
                };
                let format = caps
                    .get(2)
                    .map_or(DEFAULT_DATE_FORMAT, |m| m.as_str())
                    .to_string();
                Segment::Date { kind, format }
            } else {
                match caps.get(3).map(|m| m.as_str()) {
                    Some("stem") => Segment::Stem,
                    Some("ext") => Segment::Ext,
                    Some("parent") => Segment::Parent,
                    _ => Segment::Counter,
                }
            };
            segments.push(segment);
            last = whole.end();
        }
        if last < source.len() {
            segments.push(Segment::Literal(source[last..].to_string()));
        }

        Self {
            source: source.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn has_counter(&self) -> bool {
        self.segments.contains(&Segment::Counter)
    }

    pub fn has_ext(&self) -> bool {
        self.segments.contains(&Segment::Ext)
    }

    /// Render the template for `candidate`.
    ///
    /// `counter` is the collision counter; `None` renders `{counter}` as `1`,
    /// `Some(n)` renders `n` zero-padded to `pad` digits. With `keep_ext` the
    /// original extension is appended when the template has no `{ext}`.
    pub fn render(
        &self,
        candidate: &RenameCandidate,
        counter: Option<u32>,
        pad: usize,
        keep_ext: bool,
    ) -> Result<String, RenameError> {
        let file_name = candidate.file_name();
        let (stem, ext) = split_name_ext(&file_name);
        let mut out = String::with_capacity(self.source.len() + file_name.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Date { kind, format } => {
                    let at = match kind {
                        DateKind::Created => &candidate.timestamps.created,
                        DateKind::Modified => &candidate.timestamps.modified,
                    };
                    format_date(&mut out, at, format)?;
                },
                Segment::Stem => out.push_str(stem),
                Segment::Ext => out.push_str(ext),
                Segment::Parent => out.push_str(&candidate.parent_name()),
                Segment::Counter => match counter {
                    Some(n) => out.push_str(&pad_counter(n, pad)),
                    None => out.push('1'),
                },
            }
        }

        if keep_ext && !self.has_ext() {
            out.push_str(ext);
        }
        Ok(out)
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::parse(DEFAULT_TEMPLATE)
    }
}

fn format_date(out: &mut String, at: &DateTime<Local>, format: &str) -> Result<(), RenameError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(RenameError::Template {
            format: format.to_string(),
        });
    }
    write!(out, "{}", at.format_with_items(items.iter())).map_err(|_| RenameError::Template {
        format: format.to_string(),
    })
}
