//! SQLite-backed cache for archive records.
//!
//! This module provides persistent, TTL-scoped memoization using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Catalog, listing and message families keyed by natural ids
//! - A full-text index over message content, maintained by triggers
//! - Automatic schema migrations
//! - WAL mode so readers never wait on writers
//! - Bulk sweep of rows older than the TTL

pub mod catalog;
pub mod cleanup;
pub mod connection;
pub mod content;
pub mod listing;
pub mod migrations;
pub mod search;

pub use crate::Error;

pub use cleanup::{CleanupReport, spawn_cleanup};
pub use connection::{CacheDb, DEFAULT_TTL};
