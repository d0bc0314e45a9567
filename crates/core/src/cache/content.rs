//! Full message storage.
//!
//! Writes to `message_content` are mirrored into `messages_fts` by triggers
//! installed in the search migration, so a single upsert statement updates
//! both or neither.

use std::collections::BTreeMap;

use super::connection::{CacheDb, now_millis};
use crate::{Error, MessageContent, MessageStub};
use tokio_rusqlite::{params, rusqlite};

impl CacheDb {
    /// Get a cached message by list and id.
    ///
    /// Returns None when the row is missing or older than the TTL.
    /// A row whose header map cannot be decoded is reported as
    /// [`Error::CorruptEntry`].
    pub async fn get_message_content(&self, list: &str, id: &str) -> Result<Option<MessageContent>, Error> {
        let cutoff = self.cutoff_millis();
        let list_name = list.to_string();
        let message_id = id.to_string();

        let found = self
            .conn
            .call(move |conn| -> Result<Option<MessageContent>, Error> {
                let result = conn.query_row(
                    "SELECT id, subject, author, date, list, body, headers_json
                     FROM message_content
                     WHERE id = ?1 AND list = ?2 AND updated_at >= ?3",
                    params![message_id, list_name, cutoff],
                    |row| {
                        Ok((
                            MessageStub {
                                id: row.get(0)?,
                                subject: row.get(1)?,
                                author: row.get(2)?,
                                date: row.get(3)?,
                                list: row.get(4)?,
                            },
                            row.get::<_, String>(5)?,
                            row.get::<_, String>(6)?,
                        ))
                    },
                );

                match result {
                    Ok((stub, body, headers_json)) => {
                        let headers: BTreeMap<String, String> = serde_json::from_str(&headers_json)?;
                        Ok(Some(MessageContent { stub, body, headers }))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        match &found {
            Some(_) => tracing::debug!(list, id, "cache hit: message_content"),
            None => tracing::debug!(list, id, "cache miss: message_content"),
        }
        Ok(found)
    }

    /// Insert or update a fetched message.
    ///
    /// Uses `ON CONFLICT DO UPDATE` rather than `REPLACE` so the update
    /// trigger keeps the search index in step with the row.
    pub async fn set_message_content(&self, message: &MessageContent) -> Result<(), Error> {
        let message = message.clone();
        let headers_json = serde_json::to_string(&message.headers)?;
        let now = now_millis();
        let id = message.stub.id.clone();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO message_content (id, list, subject, author, date, body, headers_json, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(id) DO UPDATE SET
                        list = excluded.list,
                        subject = excluded.subject,
                        author = excluded.author,
                        date = excluded.date,
                        body = excluded.body,
                        headers_json = excluded.headers_json,
                        updated_at = excluded.updated_at",
                    params![
                        message.stub.id,
                        message.stub.list,
                        message.stub.subject,
                        message.stub.author,
                        message.stub.date,
                        message.body,
                        headers_json,
                        now,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        tracing::debug!(id, "cache set: message_content");
        Ok(())
    }
}
