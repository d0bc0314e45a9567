//! Core types and shared functionality for marc-mcp.
//!
//! This crate provides:
//! - Record types extracted from the archive
//! - TTL-scoped cache with SQLite backend and full-text index
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod model;

pub use cache::{CacheDb, CleanupReport, spawn_cleanup};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use model::{MailingList, MessageContent, MessageStub, Month, SearchField, SearchHit};
