//! Post-conversion cleanup passes for Markdown output.
//!
//! Each pass is a function `&str -> String` applied in sequence. The passes
//! are deliberately narrow: apart from the fixes below, converter output is
//! written to disk exactly as produced, with no whitespace normalization and
//! no trailing newline added.

use std::sync::LazyLock;

use regex::Regex;

use crate::ConvertOptions;

/// Known trailing remnant of a CDATA-wrapped details section: the closing
/// `]]>` with its `>` escaped, followed by a space.
pub(crate) const CDATA_ARTIFACT: &str = "]]\\> ";

/// Run the full cleanup pipeline on converted Markdown text.
pub(crate) fn run_pipeline(md: &str, opts: &ConvertOptions) -> String {
    let mut result = md.to_string();

    if opts.github_flavored {
        result = restore_task_list_markers(&result);
    }
    result = strip_cdata_artifact(&result);

    result
}

// ---------------------------------------------------------------------------
// Pass 1: Restore task-list markers
// ---------------------------------------------------------------------------

/// Un-escape task-list markers the base converter treated as literal brackets.
///
/// The pre-processing pass renders checkbox inputs as `[x]`/`[ ]` text, which
/// the converter escapes to `\[x\]`. Undo that, but only directly after a
/// list-item marker.
fn restore_task_list_markers(md: &str) -> String {
    static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?m)^(\s*(?:[-*+]|\d+\.)\s+)\\?\[(x|X| )\\?\]").expect("valid regex")
    });

    MARKER_RE.replace_all(md, "$1[$2]").to_string()
}

// ---------------------------------------------------------------------------
// Pass 2: Strip the CDATA artifact
// ---------------------------------------------------------------------------

/// Strip exactly one trailing occurrence of [`CDATA_ARTIFACT`].
fn strip_cdata_artifact(md: &str) -> String {
    md.strip_suffix(CDATA_ARTIFACT).unwrap_or(md).to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
