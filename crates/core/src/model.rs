//! Records extracted from the archive and memoized in the cache.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A mailing list from the archive catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MailingList {
    /// List identifier as used in archive URLs (e.g. `git`).
    pub name: String,
    /// Catalog group heading; empty when the list precedes every heading.
    pub category: String,
}

/// One row of a message listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MessageStub {
    pub id: String,
    pub subject: String,
    pub author: String,
    pub date: String,
    pub list: String,
}

/// A fully fetched message: stub fields plus headers and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MessageContent {
    #[serde(flatten)]
    pub stub: MessageStub,
    pub body: String,
    /// Raw header map, keys stored exactly as they appeared.
    pub headers: BTreeMap<String, String>,
}

impl MessageContent {
    /// Look up a header by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A search result with a highlighted excerpt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchHit {
    #[serde(flatten)]
    pub stub: MessageStub,
    pub snippet: String,
}

/// Column a search can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Subject,
    Author,
    Body,
}

impl SearchField {
    /// Index column name.
    pub fn column(self) -> &'static str {
        match self {
            SearchField::Subject => "subject",
            SearchField::Author => "author",
            SearchField::Body => "body",
        }
    }

    /// Parse the archive's one-letter search type (`s`, `a`, `b`).
    pub fn from_code(code: &str) -> Result<Self, Error> {
        match code {
            "s" => Ok(SearchField::Subject),
            "a" => Ok(SearchField::Author),
            "b" => Ok(SearchField::Body),
            other => Err(Error::InvalidInput(format!(
                "invalid search_type '{other}': expected 's', 'a' or 'b'"
            ))),
        }
    }
}

/// A calendar month in the archive's `YYYYMM` notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: u16,
    month: u8,
}

impl Month {
    pub fn new(year: u16, month: u8) -> Result<Self, Error> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidInput(format!("month out of range: {month}")));
        }
        Ok(Self { year, month })
    }

    /// The current month in UTC.
    pub fn current() -> Self {
        let now = Utc::now();
        Self { year: now.year() as u16, month: now.month() as u8 }
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidInput(format!("month must be YYYYMM, got '{s}'")));
        }
        let year = s[..4]
            .parse()
            .map_err(|_| Error::InvalidInput(format!("invalid year in '{s}'")))?;
        let month = s[4..]
            .parse()
            .map_err(|_| Error::InvalidInput(format!("invalid month in '{s}'")))?;
        Self::new(year, month)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_with_headers(pairs: &[(&str, &str)]) -> MessageContent {
        MessageContent {
            stub: MessageStub {
                id: "1".into(),
                subject: String::new(),
                author: String::new(),
                date: String::new(),
                list: "git".into(),
            },
            body: String::new(),
            headers: pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let msg = content_with_headers(&[("Message-ID", "<1@example.com>"), ("X-Mailer", "mutt")]);
        assert_eq!(msg.header("message-id"), Some("<1@example.com>"));
        assert_eq!(msg.header("X-MAILER"), Some("mutt"));
        assert_eq!(msg.header("Subject"), None);
        assert!(msg.headers.contains_key("Message-ID"));
    }

    #[test]
    fn test_month_parse_and_display() {
        let month: Month = "202602".parse().unwrap();
        assert_eq!(month.to_string(), "202602");
    }

    #[test]
    fn test_month_rejects_bad_input() {
        assert!("2026-02".parse::<Month>().is_err());
        assert!("202613".parse::<Month>().is_err());
        assert!("202600".parse::<Month>().is_err());
        assert!("20260".parse::<Month>().is_err());
        assert!("abcdef".parse::<Month>().is_err());
    }

    #[test]
    fn test_current_month_round_trips() {
        let month = Month::current();
        assert_eq!(month.to_string().parse::<Month>().unwrap(), month);
    }

    #[test]
    fn test_search_field_codes() {
        assert_eq!(SearchField::from_code("s").unwrap(), SearchField::Subject);
        assert_eq!(SearchField::from_code("a").unwrap(), SearchField::Author);
        assert_eq!(SearchField::from_code("b").unwrap(), SearchField::Body);
        assert!(matches!(SearchField::from_code("x"), Err(Error::InvalidInput(_))));
        assert_eq!(SearchField::Author.column(), "author");
    }

    #[test]
    fn test_message_content_serializes_flat() {
        let msg = content_with_headers(&[("From", "Alice")]);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["list"], "git");
        assert_eq!(value["headers"]["From"], "Alice");
    }
}
