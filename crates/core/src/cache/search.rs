//! Full-text search over cached messages.
//!
//! Only messages that have been fetched and stored are searchable; the
//! index is never populated ahead of a request.

use super::connection::CacheDb;
use crate::{Error, MessageStub, SearchField, SearchHit};
use tokio_rusqlite::params;

/// Hard cap on returned hits.
pub const SEARCH_LIMIT: i64 = 100;

/// Columns searched when no field is requested. `id` and `list` stay
/// indexed for exact lookups but would match every message of a list.
const DEFAULT_COLUMNS: &str = "{subject author body}";

/// Build an FTS5 MATCH expression from free text.
///
/// Every alphanumeric run becomes a quoted term, so operators and
/// punctuation in user input are never interpreted. Terms are ANDed.
/// Returns None when the query has nothing searchable.
pub fn build_match_expression(query: &str, field: Option<SearchField>) -> Option<String> {
    let columns = field.map_or(DEFAULT_COLUMNS, SearchField::column);
    let terms: Vec<String> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(|term| format!("{columns} : \"{term}\""))
        .collect();

    if terms.is_empty() { None } else { Some(terms.join(" AND ")) }
}

impl CacheDb {
    /// Search cached message content.
    ///
    /// Results are ordered by FTS5 relevance and capped at [`SEARCH_LIMIT`].
    /// `list` restricts hits to one mailing list and `field` to one column.
    /// Rows older than the TTL are not returned.
    pub async fn search_messages(
        &self, query: &str, list: Option<&str>, field: Option<SearchField>,
    ) -> Result<Vec<SearchHit>, Error> {
        let Some(expression) = build_match_expression(query, field) else {
            tracing::debug!(query, "fts search skipped: no searchable terms");
            return Ok(Vec::new());
        };

        let cutoff = self.cutoff_millis();
        let list_name = list.map(str::to_string);

        let hits = self
            .conn
            .call(move |conn| -> Result<Vec<SearchHit>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT mc.id, mc.subject, mc.author, mc.date, mc.list,
                            snippet(messages_fts, -1, '[', ']', '...', 16)
                     FROM messages_fts
                     JOIN message_content mc ON mc.rowid = messages_fts.rowid
                     WHERE messages_fts MATCH ?1
                       AND (?2 IS NULL OR mc.list = ?2)
                       AND mc.updated_at >= ?3
                     ORDER BY rank
                     LIMIT ?4",
                )?;
                let hits = stmt
                    .query_map(params![expression, list_name, cutoff, SEARCH_LIMIT], |row| {
                        Ok(SearchHit {
                            stub: MessageStub {
                                id: row.get(0)?,
                                subject: row.get(1)?,
                                author: row.get(2)?,
                                date: row.get(3)?,
                                list: row.get(4)?,
                            },
                            snippet: row.get(5)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(hits)
            })
            .await
            .map_err(Error::from)?;

        tracing::debug!(query, list, results = hits.len(), "fts search");
        Ok(hits)
    }
}
