//! Bug-pattern feed fetching and extraction.
//!
//! The metadata feed is a single XML document listing bug patterns. It is
//! fetched in one GET and parsed leniently as HTML: unknown elements become
//! ordinary nodes, CDATA sections degrade to comments, tag and attribute
//! names are lowercased, and malformed input is recovered from rather than
//! rejected.

mod fetch;
mod parse;

pub use fetch::{FetchOptions, fetch_feed};
pub use parse::parse_feed;
