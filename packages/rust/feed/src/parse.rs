//! Lenient extraction of bug-pattern records from the feed document.

use patterndocs_shared::{PatternDocsError, PatternRecord, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Parse the feed document and extract all bug-pattern records, in document
/// order.
///
/// The payload is XML, but it is parsed as HTML on purpose (see the crate
/// docs). A document with no `bugpattern` elements is a valid, empty feed;
/// malformed input yields whatever records the recovering parser can see.
pub fn parse_feed(text: &str) -> Result<Vec<PatternRecord>> {
    let pattern_sel = Selector::parse("bugpattern")
        .map_err(|e| PatternDocsError::parse(format!("bugpattern selector: {e}")))?;

    let doc = Html::parse_document(text);

    let records: Vec<PatternRecord> = doc
        .select(&pattern_sel)
        .map(|element| extract_record(&element))
        .collect();

    debug!(patterns = records.len(), "feed parsed");

    Ok(records)
}

/// Extract one record from a `bugpattern` element.
///
/// The id comes from the `type` attribute (empty counts as absent). The
/// details markup comes from the first direct child element named `details`,
/// serialized with tags intact. Both stay optional here; the pipeline decides
/// what an incomplete record means.
fn extract_record(element: &ElementRef) -> PatternRecord {
    let id = element
        .value()
        .attr("type")
        .filter(|t| !t.is_empty())
        .map(String::from);

    let details_html = element
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "details")
        .map(|details| details.inner_html());

    PatternRecord { id, details_html }
}
