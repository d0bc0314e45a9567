//! Single message extraction.
//!
//! A message page carries the whole message in its first `<pre>` block:
//! a header section, one blank line, then the body. Header continuation
//! lines are not folded back into their header.

use std::collections::BTreeMap;

use marc_core::{Error, MessageContent, MessageStub};
use scraper::{ElementRef, Html};

/// Extract a message from its page.
///
/// Fails with [`Error::ParseFailed`] when the page has no `<pre>` block.
pub fn parse_message(raw: &str, list: &str, id: &str) -> Result<MessageContent, Error> {
    let document = Html::parse_document(raw);
    let pre = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "pre")
        .ok_or_else(|| Error::ParseFailed(format!("message {list}/{id}: page has no <pre> block")))?;

    let text: String = pre.text().collect();
    let message = split_message(&text, list, id);

    tracing::debug!(list, id, headers = message.headers.len(), body_bytes = message.body.len(), "extracted message");
    Ok(message)
}

/// Split decoded `<pre>` text into headers and body.
fn split_message(text: &str, list: &str, id: &str) -> MessageContent {
    let mut stub = MessageStub {
        id: id.to_string(),
        subject: String::new(),
        author: String::new(),
        date: String::new(),
        list: list.to_string(),
    };
    let mut headers = BTreeMap::new();

    let mut lines = text.lines();
    for line in lines.by_ref() {
        if line.trim().is_empty() {
            break;
        }
        let Some((key, value)) = split_header(line) else {
            continue;
        };

        if key.eq_ignore_ascii_case("subject") {
            stub.subject = value.to_string();
        } else if key.eq_ignore_ascii_case("from") {
            stub.author = value.to_string();
        } else if key.eq_ignore_ascii_case("date") {
            stub.date = value.to_string();
        }
        headers.insert(key.to_string(), value.to_string());
    }

    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();

    MessageContent { stub, body, headers }
}

/// `key: value` split at the first colon; lines without a key are not headers.
fn split_header(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html>
<head><title>Message</title></head>
<body>
<pre>
List:       git
Subject:    [PATCH] Fix memory leak
From:       Alice Developer &lt;alice@example.com&gt;
Date:       2026-02-24 10:30:00
Message-ID: <a href="?i=123456">&lt;123456@git.example.com&gt;</a>

This patch fixes a memory leak in the cache module.

The issue was caused by not freeing allocated memory.

Signed-off-by: Alice Developer
</pre>
</body>
</html>"#;

    #[test]
    fn test_parse_message() {
        let msg = parse_message(PAGE, "git", "123456").unwrap();

        assert_eq!(msg.stub.id, "123456");
        assert_eq!(msg.stub.list, "git");
        assert_eq!(msg.stub.subject, "[PATCH] Fix memory leak");
        assert_eq!(msg.stub.author, "Alice Developer <alice@example.com>");
        assert_eq!(msg.stub.date, "2026-02-24 10:30:00");
        assert_eq!(msg.headers.get("Message-ID").map(String::as_str), Some("<123456@git.example.com>"));
        assert_eq!(msg.headers.get("List").map(String::as_str), Some("git"));
        assert_eq!(
            msg.body,
            "This patch fixes a memory leak in the cache module.\n\n\
             The issue was caused by not freeing allocated memory.\n\n\
             Signed-off-by: Alice Developer"
        );
    }

    #[test]
    fn test_header_names_case_insensitive() {
        let page = "<pre>SUBJECT: shouting\nfrom: quiet@example.com\nDaTe: today\n\nbody</pre>";
        let msg = parse_message(page, "test", "1").unwrap();
        assert_eq!(msg.stub.subject, "shouting");
        assert_eq!(msg.stub.author, "quiet@example.com");
        assert_eq!(msg.stub.date, "today");
        assert!(msg.headers.contains_key("SUBJECT"));
        assert_eq!(msg.header("subject"), Some("shouting"));
    }

    #[test]
    fn test_value_split_at_first_colon() {
        let page = "<pre>Date: Mon, 24 Feb 2026 10:30:00 +0000\n\nbody</pre>";
        let msg = parse_message(page, "test", "1").unwrap();
        assert_eq!(msg.stub.date, "Mon, 24 Feb 2026 10:30:00 +0000");
    }

    #[test]
    fn test_lines_without_key_skipped() {
        let page = "<pre>Subject: first\n    folded continuation\n: no key\nFrom: a\n\nbody</pre>";
        let msg = parse_message(page, "test", "1").unwrap();
        assert_eq!(msg.headers.len(), 2);
        assert_eq!(msg.stub.subject, "first");
        assert_eq!(msg.stub.author, "a");
        assert_eq!(msg.body, "body");
    }

    #[test]
    fn test_body_trimmed_only_at_ends() {
        let page = "<pre>Subject: s\n\n\n  indented first line\n\n  second paragraph  \n\n</pre>";
        let msg = parse_message(page, "test", "1").unwrap();
        assert_eq!(msg.body, "indented first line\n\n  second paragraph");
    }

    #[test]
    fn test_headers_only() {
        let msg = parse_message("<pre>Subject: lonely</pre>", "test", "1").unwrap();
        assert_eq!(msg.stub.subject, "lonely");
        assert!(msg.body.is_empty());
    }

    #[test]
    fn test_missing_pre_fails() {
        let result = parse_message("<html><body><p>Not found</p></body></html>", "git", "9");
        assert!(matches!(result, Err(Error::ParseFailed(_))));
    }

    #[test]
    fn test_only_first_pre_used() {
        let page = "<pre>Subject: one\n\nfirst</pre><pre>Subject: two\n\nsecond</pre>";
        let msg = parse_message(page, "test", "1").unwrap();
        assert_eq!(msg.stub.subject, "one");
        assert_eq!(msg.body, "first");
    }
}
