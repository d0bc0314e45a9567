//! Mailing-list catalog storage.

use super::connection::{CacheDb, now_millis};
use crate::{Error, MailingList};
use tokio_rusqlite::params;

impl CacheDb {
    /// Get the cached catalog in the order it was extracted.
    ///
    /// Returns None when no live rows exist.
    pub async fn get_mailing_lists(&self) -> Result<Option<Vec<MailingList>>, Error> {
        let cutoff = self.cutoff_millis();
        let lists = self
            .conn
            .call(move |conn| -> Result<Vec<MailingList>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT name, category FROM mailing_lists
                     WHERE updated_at >= ?1
                     ORDER BY position ASC, name ASC",
                )?;
                let lists = stmt
                    .query_map(params![cutoff], |row| {
                        Ok(MailingList { name: row.get(0)?, category: row.get(1)? })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(lists)
            })
            .await
            .map_err(Error::from)?;

        if lists.is_empty() {
            tracing::debug!("cache miss: mailing_lists");
            return Ok(None);
        }

        tracing::debug!(count = lists.len(), "cache hit: mailing_lists");
        Ok(Some(lists))
    }

    /// Store a freshly extracted catalog.
    ///
    /// Upserts every list in one transaction, recording its catalog position.
    pub async fn set_mailing_lists(&self, lists: &[MailingList]) -> Result<(), Error> {
        if lists.is_empty() {
            return Ok(());
        }

        let lists = lists.to_vec();
        let count = lists.len();
        let now = now_millis();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO mailing_lists (name, category, position, updated_at)
                         VALUES (?1, ?2, ?3, ?4)
                         ON CONFLICT(name) DO UPDATE SET
                            category = excluded.category,
                            position = excluded.position,
                            updated_at = excluded.updated_at",
                    )?;
                    for (position, list) in lists.iter().enumerate() {
                        stmt.execute(params![list.name, list.category, position as i64, now])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        tracing::debug!(count, "cache set: mailing_lists");
        Ok(())
    }
}
