//! Bulk removal of expired rows.
//!
//! Reads already treat stale rows as misses, so this only reclaims space.

use super::connection::CacheDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_rusqlite::params;

/// Rows deleted per family by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub mailing_lists: u64,
    pub messages: u64,
    pub message_content: u64,
}

impl CleanupReport {
    pub fn total(&self) -> u64 {
        self.mailing_lists + self.messages + self.message_content
    }
}

impl CacheDb {
    /// Delete rows written more than one TTL ago from every family.
    ///
    /// Runs as a single transaction; index rows for deleted messages are
    /// removed by the delete trigger in the same transaction.
    pub async fn cleanup(&self) -> Result<CleanupReport, Error> {
        let cutoff = self.cutoff_millis();
        let report = self
            .conn
            .call(move |conn| -> Result<CleanupReport, Error> {
                let tx = conn.transaction()?;
                let report = CleanupReport {
                    mailing_lists: tx.execute("DELETE FROM mailing_lists WHERE updated_at < ?1", params![cutoff])?
                        as u64,
                    messages: tx.execute("DELETE FROM messages WHERE updated_at < ?1", params![cutoff])? as u64,
                    message_content: tx
                        .execute("DELETE FROM message_content WHERE updated_at < ?1", params![cutoff])?
                        as u64,
                };
                tx.commit()?;
                Ok(report)
            })
            .await
            .map_err(Error::from)?;

        if report.total() > 0 {
            tracing::debug!(
                mailing_lists = report.mailing_lists,
                messages = report.messages,
                message_content = report.message_content,
                "cleanup removed expired rows"
            );
        }
        Ok(report)
    }
}

/// Run [`CacheDb::cleanup`] immediately and then once per `every`.
///
/// Failures are logged and the loop keeps going; the task only ends when
/// aborted or when the runtime shuts down.
pub fn spawn_cleanup(db: CacheDb, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match db.cleanup().await {
                Ok(report) if report.total() > 0 => {
                    tracing::info!(removed = report.total(), "expired cache rows swept")
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "cache cleanup failed"),
            }
        }
    })
}
