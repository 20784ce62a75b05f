//! Description-file output: one `{id}.md` per bug pattern.

use std::path::Path;

use tracing::debug;

use patterndocs_shared::{PatternDocsError, Result};

/// Verify that the output directory already exists.
///
/// The directory belongs to the host project layout and is never created
/// here. A missing directory usually means the tool was started from the
/// wrong working directory, and creating it would silently scatter files.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(PatternDocsError::validation(format!(
            "output directory does not exist: {}",
            dir.display()
        )));
    }
    Ok(())
}

/// Pattern ids become file names as-is, so anything that would traverse
/// out of the output directory is rejected before touching the filesystem.
fn is_safe_id(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\', '\0'])
}

/// Write one pattern description as `{id}.md`, replacing any existing file.
pub fn write_description(out_dir: &Path, id: &str, markdown: &str) -> Result<()> {
    if !is_safe_id(id) {
        return Err(PatternDocsError::validation(format!(
            "pattern type {id:?} is not usable as a file name"
        )));
    }

    let file_path = out_dir.join(format!("{id}.md"));
    std::fs::write(&file_path, markdown)
        .map_err(|e| PatternDocsError::io(&file_path, e))?;

    debug!(path = %file_path.display(), bytes = markdown.len(), "wrote description");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
