//! Core pipeline orchestration for patterndocs.
//!
//! This crate ties feed fetching, bug-pattern parsing, and Markdown
//! conversion together into the end-to-end `generate` workflow that writes
//! one description file per pattern.

pub mod pipeline;
pub mod writer;
