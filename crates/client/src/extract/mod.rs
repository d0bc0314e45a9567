//! Record extraction from archive pages.
//!
//! Each page family has its own extractor:
//!
//! - [`catalog`]: root index HTML to mailing lists, walked as a DOM
//! - [`listing`]: listing page text to message stubs, matched line by line
//! - [`message`]: message page HTML to headers and body
//!
//! Extractors are pure functions of the page text; they never fetch.

pub mod catalog;
pub mod links;
pub mod listing;
pub mod message;

pub use catalog::parse_catalog;
pub use links::list_param;
pub use listing::{is_row, is_unknown_list, parse_listing, row_author, row_date, row_message_ref, row_subject};
pub use message::parse_message;
