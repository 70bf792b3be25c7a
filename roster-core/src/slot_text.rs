//! Parsing and serialization of the free text in one schedule cell.
//!
//! A cell holds a comma separated list of employees, each optionally followed by
//! an explicit time range that overrides the shift's default hours:
//!
//! ```text
//! Alice, Bob 13:00-19:00, -anything after a free standing dash is a comment
//! ```

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{RosterError, RosterResult};
use crate::time::TimeRange;

/// One employee mentioned in a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    Default { name: String },
    Specified { name: String, range: TimeRange },
}

impl Item {
    pub fn named(name: impl Into<String>) -> Self {
        Item::Default { name: name.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Default { name } | Item::Specified { name, .. } => name,
        }
    }

    pub fn range(&self) -> Option<TimeRange> {
        match self {
            Item::Default { .. } => None,
            Item::Specified { range, .. } => Some(*range),
        }
    }

    /// Explicit duration when the cell overrides the shift's hours.
    pub fn duration_minutes(&self) -> Option<u16> {
        self.range().map(|r| r.duration_minutes())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Default { name } => f.write_str(name),
            Item::Specified { name, range } => write!(f, "{name} {range}"),
        }
    }
}

/// Byte offset where a trailing comment starts: the first dash that is not
/// squeezed between two digits (as in `13:00-19:00`).
fn comment_start(text: &str) -> Option<usize> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    chars.iter().enumerate().find_map(|(i, &(offset, c))| {
        if c != '-' {
            return None;
        }
        let digit_before = i > 0 && chars[i - 1].1.is_ascii_digit();
        let digit_after = chars.get(i + 1).is_some_and(|(_, n)| n.is_ascii_digit());
        if digit_before && digit_after { None } else { Some(offset) }
    })
}

fn split_comment(text: &str) -> (&str, &str) {
    match comment_start(text) {
        Some(offset) => text.split_at(offset),
        None => (text, ""),
    }
}

/// Parse the text of one cell. The trailing comment is dropped.
pub fn parse(text: &str) -> RosterResult<Vec<Item>> {
    let (body, _comment) = split_comment(text);

    body.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            let mut parts = token.splitn(2, char::is_whitespace);
            let name = parts.next().unwrap_or_default().to_string();
            match parts.next().map(str::trim).filter(|p| !p.is_empty()) {
                None => Ok(Item::Default { name }),
                Some(range) => {
                    let range = range.parse::<TimeRange>().map_err(|_| RosterError::SlotText {
                        text: text.to_string(),
                        token: token.to_string(),
                    })?;
                    Ok(Item::Specified { name, range })
                }
            }
        })
        .collect()
}

/// Sort items by employee name and drop repeated names (first one wins).
pub fn normalize(mut items: Vec<Item>) -> Vec<Item> {
    items.sort_by(|a, b| a.name().cmp(b.name()));
    items.dedup_by(|b, a| a.name() == b.name());
    items
}

/// Parse and normalize.
pub fn parse_normalized(text: &str) -> RosterResult<Vec<Item>> {
    parse(text).map(normalize)
}

/// Serialize items back into cell text.
pub fn format(items: &[Item]) -> String {
    items
        .iter()
        .map(Item::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

const TIME_PATTERN: &str = r"\d{1,2}(?::\d{2})?\s*-\s*\d{1,2}(?::\d{2})?";

/// Remove the named employees (with their time override) from cell text,
/// keeping everything else, including a trailing comment, as written.
pub fn remove_employees<S: AsRef<str>>(text: &str, names: &[S]) -> String {
    if names.is_empty() {
        return text.to_string();
    }
    let alternation = names
        .iter()
        .map(|n| regex::escape(n.as_ref()))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"(^|,)\s*(?:{alternation})(?:\s+{TIME_PATTERN})?\s*(,|$)");
    // Names are escaped, so the pattern is always valid.
    let Ok(re) = Regex::new(&pattern) else {
        return text.to_string();
    };

    let (body, comment) = split_comment(text);
    let mut body = body.trim_end().to_string();
    // Matches consume the separating comma, so neighbours need another pass.
    while re.is_match(&body) {
        body = re.replace(&body, "$1").into_owned();
    }
    let body = body.trim().trim_matches(',').trim();

    match (body.is_empty(), comment.is_empty()) {
        (_, true) => body.to_string(),
        (true, false) => comment.to_string(),
        (false, false) => format!("{body} {comment}"),
    }
}

/// Append names to cell text that are not already mentioned.
pub fn add_employees<S: AsRef<str>>(text: &str, names: &[S]) -> RosterResult<String> {
    let (body, comment) = split_comment(text);
    let mut items = parse(body)?;
    for name in names {
        if !items.iter().any(|i| i.name() == name.as_ref()) {
            items.push(Item::named(name.as_ref()));
        }
    }
    let body = format(&items);
    Ok(if comment.is_empty() { body } else { format!("{body} {comment}") })
}
