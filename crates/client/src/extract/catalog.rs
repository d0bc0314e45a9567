//! Catalog extraction from the archive's root index.
//!
//! The index is a flat run of group headings, each a bold element holding a
//! "Group" icon followed by the heading text, interleaved with one link per
//! list. Extraction is a single fold over the elements in document order
//! carrying the most recent heading.

use std::collections::HashSet;

use marc_core::MailingList;
use scraper::{ElementRef, Html};

use super::links::list_param;

/// Extract every mailing list from the catalog page, in document order.
///
/// Lists that appear before the first heading get an empty category. A list
/// linked under several headings keeps its first one.
pub fn parse_catalog(raw: &str) -> Vec<MailingList> {
    let document = Html::parse_document(raw);

    let (_, mut lists) = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .fold((String::new(), Vec::new()), |(category, mut lists), element| {
            match element.value().name() {
                "b" => match group_heading(element) {
                    Some(heading) => (heading, lists),
                    None => (category, lists),
                },
                "a" => {
                    if let Some(name) = element.value().attr("href").and_then(list_link) {
                        lists.push(MailingList { name, category: category.clone() });
                    }
                    (category, lists)
                }
                _ => (category, lists),
            }
        });

    let mut seen = HashSet::new();
    lists.retain(|list: &MailingList| seen.insert(list.name.clone()));

    tracing::debug!(count = lists.len(), "extracted catalog");
    lists
}

/// List name for a relative `?l=` link; absolute and navigation links yield None.
fn list_link(href: &str) -> Option<String> {
    if !href.starts_with('?') {
        return None;
    }
    list_param(href)
}

/// Heading text when `bold` is a group heading.
///
/// Only the bold element's own text children count, so text inside the
/// icon or nested markup is ignored. Empty headings are not headings.
fn group_heading(bold: ElementRef<'_>) -> Option<String> {
    let has_group_icon = bold.children().filter_map(ElementRef::wrap).any(|child| {
        child.value().name() == "img" && child.value().attr("alt").is_some_and(|alt| alt.contains("Group"))
    });
    if !has_group_icon {
        return None;
    }

    let text = bold
        .children()
        .filter_map(|node| node.value().as_text())
        .fold(String::new(), |mut acc, text| {
            acc.push_str(text);
            acc
        });

    let heading = text.trim();
    (!heading.is_empty()).then(|| heading.to_string())
}
