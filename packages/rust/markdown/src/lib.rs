//! HTML-to-Markdown conversion for bug-pattern descriptions.
//!
//! Converts the HTML `details` fragment of a bug pattern to GitHub-flavored
//! Markdown using the `htmd` crate. A pre-processing pass supplies the GFM
//! constructs `htmd` 0.1 does not cover (pipe tables, strikethrough,
//! task-list markers) and applies the unknown-tag policy; a cleanup stage
//! strips the CDATA artifact the feed leaves behind.

mod cleanup;
mod preprocess;

use tracing::debug;

use patterndocs_shared::{PatternDocsError, Result};

use crate::preprocess::Segment;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// How to handle elements with no Markdown mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTagPolicy {
    /// Emit the element verbatim, tag syntax preserved.
    #[default]
    PassThrough,
    /// Drop the tags but convert the element's content.
    Bypass,
    /// Drop the element and its content entirely.
    Drop,
}

/// Options for the HTML-to-Markdown conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Handling of elements with no Markdown mapping.
    pub unknown_tags: UnknownTagPolicy,
    /// Produce GitHub-flavored constructs: pipe tables, `~~strikethrough~~`,
    /// task-list markers.
    pub github_flavored: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            unknown_tags: UnknownTagPolicy::PassThrough,
            github_flavored: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

/// Convert an HTML fragment to Markdown.
///
/// This is the main entry point. It:
/// 1. Re-parses the fragment and splits it into HTML segments and ready-made
///    Markdown segments (GFM tables are rendered directly; `htmd` 0.1 has no
///    table support)
/// 2. Converts the HTML segments via `htmd`
/// 3. Runs the cleanup pipeline (task-list marker restoration, CDATA
///    artifact chomp)
///
/// The function is pure: no network, no filesystem, same output for the same
/// input.
pub fn convert(html: &str, opts: &ConvertOptions) -> Result<String> {
    let segments = preprocess::segment_fragment(html, opts);

    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style"])
        .build();

    let mut parts: Vec<String> = Vec::new();
    for segment in segments {
        match segment {
            Segment::Html(chunk) => {
                if chunk.trim().is_empty() {
                    continue;
                }
                let markdown = converter.convert(&chunk).map_err(|e| {
                    PatternDocsError::Conversion(format!("htmd conversion failed: {e}"))
                })?;
                if !markdown.is_empty() {
                    parts.push(markdown);
                }
            }
            Segment::Markdown(markdown) => {
                if !markdown.is_empty() {
                    parts.push(markdown);
                }
            }
        }
    }

    let joined = parts.join("\n\n");
    debug!(
        segments = parts.len(),
        len = joined.len(),
        "htmd conversion complete"
    );

    Ok(cleanup::run_pipeline(&joined, opts))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn gfm() -> ConvertOptions {
        ConvertOptions::default()
    }

    // --- Core conversion tests ---

    #[test]
    fn convert_bold_paragraph() {
        let html = "<p>Do <b>not</b> trust user input.</p>";
        let result = convert(html, &gfm()).unwrap();

        assert!(result.contains("Do **not** trust user input."));
        assert!(!result.contains("<p>"), "output contains <p> tags");
    }

    #[test]
    fn convert_headings_and_paragraphs() {
        let html = "<h3>Vulnerable code</h3><p>An example of misuse.</p>";
        let result = convert(html, &gfm()).unwrap();

        assert!(result.contains("### Vulnerable code"));
        assert!(result.contains("An example of misuse."));
    }

    #[test]
    fn convert_preserves_code_blocks() {
        let html = r#"<p><b>Code at risk:</b></p>
<pre><code class="language-java">String token = Long.toHexString(rand.nextLong());</code></pre>"#;
        let result = convert(html, &gfm()).unwrap();

        assert!(result.contains("```java"));
        assert!(result.contains("Long.toHexString"));
    }

    #[test]
    fn convert_preserves_inline_code_entities() {
        let html = "<p>Avoid <code>&lt;c:out value=\"${param.x}\"/&gt;</code> without escaping.</p>";
        let result = convert(html, &gfm()).unwrap();

        assert!(result.contains("`<c:out value=\"${param.x}\"/>`"));
    }

    #[test]
    fn convert_links_kept_absolute() {
        let html = r#"<p>Prefer <a href="https://example.com/securerandom">SecureRandom</a>.</p>"#;
        let result = convert(html, &gfm()).unwrap();

        assert!(result.contains("[SecureRandom](https://example.com/securerandom)"));
    }

    #[test]
    fn convert_handles_lists() {
        let html = "<ul><li>Move secrets to a vault</li><li>Rotate the value</li></ul>";
        let result = convert(html, &gfm()).unwrap();

        assert!(result.contains("Move secrets to a vault"));
        assert!(result.contains("Rotate the value"));
        assert!(!result.contains("<li>"));
    }

    // --- GitHub-flavored constructs ---

    #[test]
    fn convert_table_to_pipes() {
        let html = r#"<table>
            <thead><tr><th>API</th><th>Risk</th></tr></thead>
            <tbody><tr><td>Random</td><td>predictable</td></tr></tbody>
        </table>"#;
        let result = convert(html, &gfm()).unwrap();

        assert!(result.contains("| API | Risk |"));
        assert!(result.contains("| --- | --- |"));
        assert!(result.contains("| Random | predictable |"));
    }

    #[test]
    fn convert_strikethrough() {
        let html = "<p>Use <del>MD5</del> SHA-256.</p>";
        let result = convert(html, &gfm()).unwrap();

        assert!(result.contains("~~MD5~~"));
    }

    #[test]
    fn convert_task_list_markers() {
        let html = r#"<ul>
            <li><input type="checkbox" checked> Rotate the credential</li>
            <li><input type="checkbox"> Audit access logs</li>
        </ul>"#;
        let result = convert(html, &gfm()).unwrap();

        assert!(result.contains("[x] Rotate the credential"));
        assert!(result.contains("[ ] Audit access logs"));
        assert!(!result.contains("\\[x\\]"));
    }

    // --- Unknown-tag policy ---

    #[test]
    fn convert_unknown_tag_passes_through() {
        let html = r#"<p>See <vuln-note severity="high">the advisory</vuln-note>.</p>"#;
        let result = convert(html, &gfm()).unwrap();

        assert!(result.contains("<vuln-note severity=\"high\">"));
        assert!(result.contains("</vuln-note>"));
        assert!(result.contains("the advisory"));
    }

    #[test]
    fn convert_unknown_tag_bypass_keeps_content() {
        let html = r#"<p>See <vuln-note>the advisory</vuln-note>.</p>"#;
        let opts = ConvertOptions {
            unknown_tags: UnknownTagPolicy::Bypass,
            ..ConvertOptions::default()
        };
        let result = convert(html, &opts).unwrap();

        assert!(!result.contains("vuln-note"));
        assert!(result.contains("the advisory"));
    }

    #[test]
    fn convert_unknown_tag_drop_removes_content() {
        let html = r#"<p>Keep this.</p><vuln-note>Drop this.</vuln-note>"#;
        let opts = ConvertOptions {
            unknown_tags: UnknownTagPolicy::Drop,
            ..ConvertOptions::default()
        };
        let result = convert(html, &opts).unwrap();

        assert!(result.contains("Keep this."));
        assert!(!result.contains("Drop this."));
    }

    // --- Edge cases ---

    #[test]
    fn convert_empty_fragment() {
        let result = convert("", &gfm()).unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn convert_scripts_are_dropped() {
        let html = "<p>Visible.</p><script>alert('x');</script>";
        let result = convert(html, &gfm()).unwrap();

        assert!(result.contains("Visible."));
        assert!(!result.contains("alert"));
    }

    #[test]
    fn convert_cdata_wrapped_fragment() {
        // The CDATA wrapper reaches the parser as a bogus comment plus a
        // leaked `]]>`; the segmenter repairs both.
        let html = "<![CDATA[\n<p>Do <b>not</b> trust user input.</p>\n]]>";
        let result = convert(html, &gfm()).unwrap();

        assert_eq!(result, "Do **not** trust user input.");
    }

    #[test]
    fn convert_keeps_code_span_cdata_closer() {
        let html = "<p>Emit <code>]]></code> to close the section.</p>";
        let result = convert(html, &gfm()).unwrap();

        assert!(result.contains("`]]>`"));
    }

    #[test]
    fn convert_is_deterministic() {
        let html = r#"<p>Mixed <b>content</b>.</p>
            <table><tr><th>A</th></tr><tr><td>1</td></tr></table>
            <p>Tail with <custom-tag kind="x">payload</custom-tag>.</p>"#;
        let first = convert(html, &gfm()).unwrap();
        let second = convert(html, &gfm()).unwrap();

        assert_eq!(first, second);
    }
}
