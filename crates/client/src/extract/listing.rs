//! Message listing extraction.
//!
//! A listing page renders one message per line inside a `<pre>` block:
//!
//! ```text
//!   1. 2026-02-24  [1] <a href="?l=git&m=42&w=2">Fix bug</a> <a href="?l=git&w=2">git</a>  Alice
//! ```
//!
//! Lines are processed as raw text. Each field has its own extractor so
//! layout drift breaks one field rather than the whole row.

use std::sync::OnceLock;

use marc_core::MessageStub;
use regex::Regex;

/// Marker the archive prints instead of a listing for unknown lists.
const NO_SUCH_LIST: &str = "No such list";

fn row_regex() -> &'static Regex {
    static ROW: OnceLock<Regex> = OnceLock::new();
    ROW.get_or_init(|| Regex::new(r"^\s*\d+\.\s+\d{4}-\d{2}-\d{2}\s").expect("invalid listing row regex"))
}

fn date_regex() -> &'static Regex {
    static DATE: OnceLock<Regex> = OnceLock::new();
    DATE.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("invalid date regex"))
}

fn message_link_regex() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| Regex::new(r"\?l=([^&]+)&m=(\d+)").expect("invalid message link regex"))
}

/// Whether the page is the archive's "no such list" response.
pub fn is_unknown_list(raw: &str) -> bool {
    raw.contains(NO_SUCH_LIST)
}

/// Whether a line is a numbered, dated listing row.
pub fn is_row(line: &str) -> bool {
    row_regex().is_match(line)
}

/// First ISO date on the line.
pub fn row_date(line: &str) -> Option<&str> {
    date_regex().find(line).map(|m| m.as_str())
}

/// `(list, id)` from the first message link on the line.
pub fn row_message_ref(line: &str) -> Option<(&str, &str)> {
    let caps = message_link_regex().captures(line)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Link text of the first message link, trimmed. Entities are left as-is.
pub fn row_subject(line: &str) -> Option<&str> {
    let link = message_link_regex().find(line)?;
    let rest = &line[link.end()..];
    let text = &rest[rest.find('>')? + 1..];
    let end = text.find("</a>")?;
    Some(text[..end].trim())
}

/// Text after the line's last closing anchor, minus trailing navigation labels.
pub fn row_author(line: &str) -> &str {
    let Some(idx) = line.rfind("</a>") else {
        return "";
    };
    let mut author = line[idx + "</a>".len()..].trim();
    while let Some(rest) = author.strip_suffix("Next").or_else(|| author.strip_suffix("Last")) {
        author = rest.trim_end();
    }
    author
}

/// Extract message stubs from one listing page.
///
/// Every stub carries `list`, whatever list the row's link names. Rows whose
/// message link or subject cannot be located are skipped.
pub fn parse_listing(raw: &str, list: &str) -> Vec<MessageStub> {
    let stubs: Vec<MessageStub> = raw
        .lines()
        .filter(|line| is_row(line))
        .filter_map(|line| parse_row(line, list))
        .collect();

    tracing::debug!(list, count = stubs.len(), "extracted listing");
    stubs
}

fn parse_row(line: &str, list: &str) -> Option<MessageStub> {
    let date = row_date(line)?;
    let (_, id) = row_message_ref(line)?;
    let subject = row_subject(line)?;

    Some(MessageStub {
        id: id.to_string(),
        subject: subject.to_string(),
        author: row_author(line).to_string(),
        date: date.to_string(),
        list: list.to_string(),
    })
}
