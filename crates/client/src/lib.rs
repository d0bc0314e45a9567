//! Client code for marc-mcp.
//!
//! This crate provides the archive fetch pipeline, the page extractors and
//! the read-through [`Archive`] service used by the server.

pub mod archive;
pub mod extract;
pub mod fetch;

pub use archive::Archive;
pub use extract::{parse_catalog, parse_listing, parse_message};
pub use fetch::{FetchClient, FetchConfig, Fetcher};
