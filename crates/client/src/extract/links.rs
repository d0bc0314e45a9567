//! Query-string helpers for archive hrefs.
//!
//! Archive links are relative query strings such as `?l=git&m=42&w=2`;
//! these read individual parameters without needing a base URL.

use url::form_urlencoded;

/// Decoded value of `key` in an href's query string. Empty values count as absent.
fn query_param(href: &str, key: &str) -> Option<String> {
    let (_, query) = href.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// Mailing list named by an href (`l=`).
pub fn list_param(href: &str) -> Option<String> {
    query_param(href, "l")
}
