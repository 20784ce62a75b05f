//! Core domain types for patterndocs.

use crate::error::{PatternDocsError, Result};

// ---------------------------------------------------------------------------
// PatternRecord
// ---------------------------------------------------------------------------

/// One bug-pattern entry extracted from the metadata feed.
///
/// Both fields are optional at the parsing stage: the feed is parsed
/// leniently and real-world entries occasionally lack one or the other.
/// [`PatternRecord::resolve`] turns the gaps into typed errors at the point
/// the pipeline needs both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRecord {
    /// Value of the entry's `type` attribute; `None` when absent or empty.
    pub id: Option<String>,
    /// Inner markup of the entry's first `details` child element, serialized
    /// with tags intact so the converter sees the original structure.
    pub details_html: Option<String>,
}

impl PatternRecord {
    /// Resolve the record into the parts needed to write a description file.
    ///
    /// Returns the pattern id and its details markup, or a typed error when
    /// the feed entry is incomplete.
    pub fn resolve(&self) -> Result<(&str, &str)> {
        let id = self.id.as_deref().ok_or_else(|| {
            PatternDocsError::validation("bug pattern entry has no type attribute")
        })?;
        let details = self
            .details_html
            .as_deref()
            .ok_or_else(|| PatternDocsError::MissingDetails { id: id.to_string() })?;
        Ok((id, details))
    }
}
