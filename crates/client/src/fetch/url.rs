//! Archive request paths.
//!
//! Every page the archive serves is addressed by a query string against the
//! site root, so paths here are relative and always start with `?` (or are
//! empty for the catalog).

use marc_core::{Error, Month};
use url::{Url, form_urlencoded};

/// Path of the catalog page listing every mailing list.
pub fn catalog_path() -> String {
    String::new()
}

/// Path of one page of a list's monthly message listing.
pub fn listing_path(list: &str, month: Month, page: u32) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("l", list)
        .append_pair("b", &month.to_string())
        .append_pair("r", &page.to_string())
        .append_pair("w", "2")
        .finish();
    format!("?{query}")
}

/// Path of a single message page.
pub fn message_path(list: &str, id: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("l", list)
        .append_pair("m", id)
        .append_pair("w", "2")
        .finish();
    format!("?{query}")
}

/// Parse and check the configured archive root.
pub fn parse_base_url(input: &str) -> Result<Url, Error> {
    let url = Url::parse(input.trim()).map_err(|e| Error::InvalidUrl(format!("{input}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::InvalidUrl(format!("unsupported scheme: {scheme}"))),
    }
}

/// Resolve a request path against the archive root.
pub fn resolve(base: &Url, path: &str) -> Result<Url, Error> {
    let mut url = base
        .join(path)
        .map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))?;
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        parse_base_url("https://marc.info/").unwrap()
    }

    #[test]
    fn test_catalog_path_is_root() {
        assert_eq!(resolve(&base(), &catalog_path()).unwrap().as_str(), "https://marc.info/");
    }

    #[test]
    fn test_listing_path() {
        let month: Month = "202602".parse().unwrap();
        assert_eq!(listing_path("git", month, 1), "?l=git&b=202602&r=1&w=2");
        assert_eq!(
            resolve(&base(), &listing_path("git", month, 3)).unwrap().as_str(),
            "https://marc.info/?l=git&b=202602&r=3&w=2"
        );
    }

    #[test]
    fn test_message_path() {
        assert_eq!(message_path("linux-kernel", "174037595823063"), "?l=linux-kernel&m=174037595823063&w=2");
    }

    #[test]
    fn test_values_are_encoded() {
        assert_eq!(message_path("a&b=c", "1"), "?l=a%26b%3Dc&m=1&w=2");
        assert_eq!(message_path("two words", "1"), "?l=two+words&m=1&w=2");
    }

    #[test]
    fn test_resolve_keeps_base_path() {
        let mirror = parse_base_url("http://localhost:8080/marc/").unwrap();
        assert_eq!(
            resolve(&mirror, "?l=git&m=1&w=2").unwrap().as_str(),
            "http://localhost:8080/marc/?l=git&m=1&w=2"
        );
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        assert!(matches!(parse_base_url("file:///etc/passwd"), Err(Error::InvalidUrl(_))));
        assert!(matches!(parse_base_url("not a url"), Err(Error::InvalidUrl(_))));
    }
}
