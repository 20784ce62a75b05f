//! End-to-end `generate` pipeline: fetch feed → parse → convert → write files.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument, warn};
use url::Url;

use patterndocs_feed::{FetchOptions, fetch_feed, parse_feed};
use patterndocs_markdown::ConvertOptions;
use patterndocs_shared::Result;

use crate::writer;

/// Configuration for the `generate` pipeline.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Feed URL to download.
    pub feed_url: Url,
    /// Directory receiving the `.md` files; must already exist.
    pub output_dir: PathBuf,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

/// Result of the `generate` pipeline.
#[derive(Debug)]
pub struct GenerateReport {
    /// Number of bug-pattern entries found in the feed.
    pub patterns_found: usize,
    /// Number of description files written.
    pub files_written: usize,
    /// Entries that were skipped, in feed order.
    pub skipped: Vec<SkippedPattern>,
    /// Directory the files were written to.
    pub output_dir: PathBuf,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// A feed entry the pipeline could not turn into a description file.
#[derive(Debug, Clone)]
pub struct SkippedPattern {
    /// Pattern id, or a positional label when the entry has none.
    pub label: String,
    /// Why the entry was skipped.
    pub reason: String,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a pattern's description file has been written.
    fn pattern_written(&self, id: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, report: &GenerateReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn pattern_written(&self, _id: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &GenerateReport) {}
}

/// Run the full `generate` pipeline.
///
/// 1. Check that the output directory exists (it is never created)
/// 2. Fetch the metadata feed
/// 3. Parse the bug-pattern entries
/// 4. Convert each details fragment and write `{type}.md`
///
/// Entries without a usable id or details element are skipped with a warning;
/// conversion and write failures abort the run. Files written before an abort
/// stay on disk.
#[instrument(skip_all, fields(url = %config.feed_url))]
pub async fn run_generate(
    config: &GenerateConfig,
    progress: &dyn ProgressReporter,
) -> Result<GenerateReport> {
    let start = Instant::now();

    info!(
        url = %config.feed_url,
        out = %config.output_dir.display(),
        "starting generate pipeline"
    );

    writer::ensure_output_dir(&config.output_dir)?;

    // --- Phase 1: Fetch ---
    progress.phase("Fetching pattern feed");
    let fetch_opts = FetchOptions {
        timeout_secs: config.timeout_secs,
    };
    let body = fetch_feed(&config.feed_url, &fetch_opts).await?;

    // --- Phase 2: Parse ---
    progress.phase("Parsing bug patterns");
    let records = parse_feed(&body)?;
    let total = records.len();

    // --- Phase 3: Convert & write ---
    progress.phase("Writing descriptions");
    let convert_opts = ConvertOptions::default();
    let mut files_written = 0usize;
    let mut skipped: Vec<SkippedPattern> = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let (id, details_html) = match record.resolve() {
            Ok(parts) => parts,
            Err(e) => {
                let label = record
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("entry {}", i + 1));
                warn!(pattern = %label, error = %e, "skipping bug pattern");
                skipped.push(SkippedPattern {
                    label,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let markdown = patterndocs_markdown::convert(details_html, &convert_opts)?;
        writer::write_description(&config.output_dir, id, &markdown)?;
        files_written += 1;
        progress.pattern_written(id, i + 1, total);
    }

    let report = GenerateReport {
        patterns_found: total,
        files_written,
        skipped,
        output_dir: config.output_dir.clone(),
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        patterns_found = report.patterns_found,
        files_written = report.files_written,
        skipped = report.skipped.len(),
        elapsed_ms = report.elapsed.as_millis(),
        "generate pipeline complete"
    );

    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
