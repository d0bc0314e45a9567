//! Message listing storage.

use super::connection::{CacheDb, now_millis};
use crate::{Error, MessageStub, Month};
use tokio_rusqlite::params;

impl CacheDb {
    /// Get the cached stubs of one listing page, most recent first.
    ///
    /// Rows are keyed by the `(list, month, page)` request they were
    /// extracted from. Returns None when that page has no live rows.
    pub async fn get_messages(&self, list: &str, month: Month, page: u32) -> Result<Option<Vec<MessageStub>>, Error> {
        let cutoff = self.cutoff_millis();
        let list_name = list.to_string();
        let month_key = month.to_string();

        let stubs = self
            .conn
            .call(move |conn| -> Result<Vec<MessageStub>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT id, subject, author, date, list FROM messages
                     WHERE list = ?1 AND month = ?2 AND page = ?3 AND updated_at >= ?4
                     ORDER BY date DESC, id DESC",
                )?;
                let stubs = stmt
                    .query_map(params![list_name, month_key, page, cutoff], |row| {
                        Ok(MessageStub {
                            id: row.get(0)?,
                            subject: row.get(1)?,
                            author: row.get(2)?,
                            date: row.get(3)?,
                            list: row.get(4)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(stubs)
            })
            .await
            .map_err(Error::from)?;

        if stubs.is_empty() {
            tracing::debug!(list, month = %month, page, "cache miss: messages");
            return Ok(None);
        }

        tracing::debug!(list, month = %month, page, count = stubs.len(), "cache hit: messages");
        Ok(Some(stubs))
    }

    /// Store the stubs extracted from one listing page, in one transaction.
    ///
    /// A stub already cached under another page moves to this one.
    pub async fn set_messages(&self, month: Month, page: u32, stubs: &[MessageStub]) -> Result<(), Error> {
        if stubs.is_empty() {
            return Ok(());
        }

        let stubs = stubs.to_vec();
        let count = stubs.len();
        let month_key = month.to_string();
        let now = now_millis();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO messages (id, list, subject, author, date, month, page, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                         ON CONFLICT(id) DO UPDATE SET
                            list = excluded.list,
                            subject = excluded.subject,
                            author = excluded.author,
                            date = excluded.date,
                            month = excluded.month,
                            page = excluded.page,
                            updated_at = excluded.updated_at",
                    )?;
                    for stub in &stubs {
                        stmt.execute(params![
                            stub.id,
                            stub.list,
                            stub.subject,
                            stub.author,
                            stub.date,
                            month_key,
                            page,
                            now
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        tracing::debug!(month = %month, page, count, "cache set: messages");
        Ok(())
    }
}
