//! Read-through access to the archive.
//!
//! Every lookup checks the cache first. On a miss the page is fetched,
//! extracted and written back before the result is returned. The cache is
//! an accelerator only: read failures count as misses and write failures
//! are logged, so a broken cache degrades to uncached operation.

use marc_core::{CacheDb, Error, MailingList, MessageContent, MessageStub, Month, SearchField, SearchHit};

use crate::extract::{is_unknown_list, parse_catalog, parse_listing, parse_message};
use crate::fetch::{FetchClient, Fetcher, catalog_path, listing_path, message_path};

/// Archive front end combining a page source with the record cache.
pub struct Archive<F = FetchClient> {
    fetcher: F,
    cache: CacheDb,
}

impl<F: Fetcher> Archive<F> {
    pub fn new(fetcher: F, cache: CacheDb) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &CacheDb {
        &self.cache
    }

    /// Every mailing list in the catalog, in catalog order.
    pub async fn list_mailing_lists(&self) -> Result<Vec<MailingList>, Error> {
        if let Some(lists) = cache_read(self.cache.get_mailing_lists().await, "mailing_lists") {
            return Ok(lists);
        }

        let raw = self.fetch(&catalog_path()).await?;
        let lists = parse_catalog(&raw);

        cache_write(self.cache.set_mailing_lists(&lists).await, "mailing_lists");
        Ok(lists)
    }

    /// One page of a list's messages for a month.
    ///
    /// `month` defaults to the current month and `page` to 1. Each page is
    /// cached on its own. `limit` truncates the returned stubs but the whole
    /// page is cached.
    pub async fn list_messages(
        &self, list: &str, month: Option<Month>, page: Option<u32>, limit: Option<usize>,
    ) -> Result<Vec<MessageStub>, Error> {
        let list = require("list", list)?;
        let month = month.unwrap_or_else(Month::current);
        let page = page.unwrap_or(1).max(1);

        if let Some(stubs) = cache_read(self.cache.get_messages(list, month, page).await, "messages") {
            return Ok(truncate(stubs, limit));
        }

        let raw = self.fetch(&listing_path(list, month, page)).await?;
        if is_unknown_list(&raw) {
            return Err(Error::NotFound(format!("no such list: {list}")));
        }

        let stubs = parse_listing(&raw, list);
        cache_write(self.cache.set_messages(month, page, &stubs).await, "messages");
        Ok(truncate(stubs, limit))
    }

    /// A single message with headers and body.
    pub async fn get_message(&self, list: &str, id: &str) -> Result<MessageContent, Error> {
        let list = require("list", list)?;
        let id = require("message_id", id)?;

        if let Some(message) = cache_read(self.cache.get_message_content(list, id).await, "message_content") {
            return Ok(message);
        }

        let raw = self.fetch(&message_path(list, id)).await?;
        let message = parse_message(&raw, list, id)?;

        cache_write(self.cache.set_message_content(&message).await, "message_content");
        Ok(message)
    }

    /// Search messages already held in the cache.
    pub async fn search(
        &self, query: &str, list: Option<&str>, field: Option<SearchField>,
    ) -> Result<Vec<SearchHit>, Error> {
        let query = require("query", query)?;
        let list = list.map(str::trim).filter(|l| !l.is_empty());
        self.cache.search_messages(query, list, field).await
    }

    async fn fetch(&self, path: &str) -> Result<String, Error> {
        let result = self.fetcher.fetch_text(path).await;
        if let Err(e) = &result {
            if e.is_transport() {
                tracing::warn!(path, error = %e, "archive unreachable");
            } else {
                tracing::debug!(path, error = %e, "archive request rejected");
            }
        }
        result
    }
}

fn require<'a>(name: &str, value: &'a str) -> Result<&'a str, Error> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::InvalidInput(format!("{name} cannot be empty")));
    }
    Ok(value)
}

fn truncate(mut stubs: Vec<MessageStub>, limit: Option<usize>) -> Vec<MessageStub> {
    if let Some(limit) = limit.filter(|&n| n > 0) {
        stubs.truncate(limit);
    }
    stubs
}

fn cache_read<T>(result: Result<Option<T>, Error>, family: &str) -> Option<T> {
    match result {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(family, error = %e, "cache read failed; treating as miss");
            None
        }
    }
}

fn cache_write(result: Result<(), Error>, family: &str) {
    if let Err(e) = result {
        tracing::warn!(family, error = %e, "cache write failed");
    }
}
