//! Shared types, error model, and configuration for patterndocs.
//!
//! This crate is the foundation depended on by all other patterndocs crates.
//! It provides:
//! - [`PatternDocsError`] — the unified error type
//! - Domain types ([`PatternRecord`])
//! - Configuration ([`AppConfig`], config loading, default constants)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_FEED_URL, DEFAULT_OUTPUT_DIR, FeedConfig, OutputConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{PatternDocsError, Result};
pub use types::PatternRecord;
