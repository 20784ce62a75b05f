//! Fragment pre-processing for the converter.
//!
//! Re-parses the details fragment and rebuilds it as a sequence of segments:
//! HTML chunks destined for `htmd`, and ready-made Markdown chunks for the
//! GFM constructs `htmd` 0.1 cannot produce (pipe tables). The rebuild also
//! renders strikethrough and task-list markers inline and applies the
//! unknown-tag policy.
//!
//! The feed wraps details markup in CDATA sections, which the HTML tokenizer
//! mangles into bogus comments. The rebuild repairs those so wrapped markup
//! converts like any other.

use ego_tree::{NodeId, NodeRef};
use scraper::node::{Element, Node};
use scraper::{ElementRef, Html, Selector};

use crate::{ConvertOptions, UnknownTagPolicy};

/// One piece of the rebuilt fragment, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// HTML to run through the base converter.
    Html(String),
    /// Markdown emitted directly, spliced between converted chunks.
    Markdown(String),
}

/// Tags the base converter maps to Markdown, or that the rebuild handles
/// itself. Anything else is subject to the unknown-tag policy.
const KNOWN_TAGS: &[&str] = &[
    "html", "head", "body", "p", "br", "hr", "h1", "h2", "h3", "h4", "h5", "h6", "em", "i",
    "strong", "b", "a", "img", "code", "ul", "ol", "li", "blockquote", "div", "span",
];

/// Void elements have no closing tag.
const VOID_TAGS: &[&str] = &["area", "base", "br", "col", "embed", "hr", "img", "input", "wbr"];

/// Split an HTML fragment into converter segments.
pub(crate) fn segment_fragment(html: &str, opts: &ConvertOptions) -> Vec<Segment> {
    let doc = Html::parse_fragment(html);
    let root = *doc.root_element();
    let mut rebuilder = Rebuilder::new(opts, root);
    rebuilder.walk_children(root);
    rebuilder.finish()
}

/// Find the leaked `]]>` closer of a CDATA section. The tokenizer leaves it
/// as the fragment's final text node; a `]]>` anywhere else is content.
fn trailing_cdata_closer(root: NodeRef<'_, Node>) -> Option<NodeId> {
    let last = root.last_child()?;
    match last.value() {
        Node::Text(text) if text.trim() == "]]>" => Some(last.id()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Rebuilder
// ---------------------------------------------------------------------------

struct Rebuilder<'a> {
    opts: &'a ConvertOptions,
    segments: Vec<Segment>,
    html: String,
    trailing_closer: Option<NodeId>,
}

impl<'a> Rebuilder<'a> {
    fn new(opts: &'a ConvertOptions, root: NodeRef<'_, Node>) -> Self {
        Self {
            opts,
            segments: Vec::new(),
            html: String::new(),
            trailing_closer: trailing_cdata_closer(root),
        }
    }

    fn finish(mut self) -> Vec<Segment> {
        self.flush_html();
        self.segments
    }

    fn flush_html(&mut self) {
        if !self.html.is_empty() {
            self.segments.push(Segment::Html(std::mem::take(&mut self.html)));
        }
    }

    fn walk_children(&mut self, node: NodeRef<'_, Node>) {
        for child in node.children() {
            self.walk(child);
        }
    }

    fn walk(&mut self, node: NodeRef<'_, Node>) {
        match node.value() {
            Node::Text(text) => {
                if self.trailing_closer != Some(node.id()) {
                    self.html.push_str(&escape_text(&text.text));
                }
            }
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(node) {
                    self.element(el);
                }
            }
            Node::Document | Node::Fragment => self.walk_children(node),
            Node::Comment(comment) => self.recover_cdata(comment),
            Node::Doctype(_) | Node::ProcessingInstruction(_) => {}
        }
    }

    /// The tokenizer turns a `<![CDATA[` opener into a bogus comment that
    /// swallows everything through the first `>`. Re-emit the swallowed
    /// markup; ordinary comments are dropped.
    fn recover_cdata(&mut self, comment: &str) {
        let Some(rest) = comment.strip_prefix("[CDATA[") else {
            return;
        };
        match rest.strip_suffix("]]") {
            // The whole section fit in one comment, so its content is text.
            Some(inner) => self.html.push_str(&escape_text(inner)),
            None => {
                self.html.push_str(rest);
                self.html.push('>');
            }
        }
    }

    fn element(&mut self, el: ElementRef<'_>) {
        let name = el.value().name();

        // Raw subtrees: code samples must reach the base converter untouched,
        // and it skips script/style itself.
        if matches!(name, "pre" | "script" | "style") {
            self.html.push_str(&el.html());
            return;
        }

        if self.opts.github_flavored {
            match name {
                "table" => {
                    self.flush_html();
                    let table = table_to_markdown(&el);
                    if !table.is_empty() {
                        self.segments.push(Segment::Markdown(table));
                    }
                    return;
                }
                "del" | "s" | "strike" => {
                    self.html.push_str("~~");
                    self.walk_children(*el);
                    self.html.push_str("~~");
                    return;
                }
                "input" => {
                    let checkbox = el
                        .value()
                        .attr("type")
                        .is_some_and(|t| t.eq_ignore_ascii_case("checkbox"));
                    if checkbox {
                        // Escaped to `\[x\]` by the base converter; the
                        // cleanup stage restores the marker.
                        let marker = if el.value().attr("checked").is_some() {
                            "[x] "
                        } else {
                            "[ ] "
                        };
                        self.html.push_str(marker);
                        return;
                    }
                    // Other inputs fall through to the unknown-tag policy.
                }
                _ => {}
            }
        }

        if KNOWN_TAGS.contains(&name) {
            self.html.push_str(&open_tag(el.value()));
            self.walk_children(*el);
            if !VOID_TAGS.contains(&name) {
                self.html.push_str("</");
                self.html.push_str(name);
                self.html.push('>');
            }
            return;
        }

        match self.opts.unknown_tags {
            UnknownTagPolicy::PassThrough => {
                // Entity-escaped so the tag survives conversion as literal
                // text with its syntax intact.
                self.html.push_str(&passthrough_open(el.value()));
                self.walk_children(*el);
                self.html.push_str("&lt;/");
                self.html.push_str(name);
                self.html.push_str("&gt;");
            }
            UnknownTagPolicy::Bypass => self.walk_children(*el),
            UnknownTagPolicy::Drop => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Tag serialization
// ---------------------------------------------------------------------------

/// Rebuild an element's opening tag.
fn open_tag(el: &Element) -> String {
    let mut tag = String::from("<");
    tag.push_str(el.name());
    for (name, value) in el.attrs() {
        tag.push(' ');
        tag.push_str(name);
        tag.push_str("=\"");
        tag.push_str(&escape_attr(value));
        tag.push('"');
    }
    tag.push('>');
    tag
}

/// Rebuild an opening tag as entity-escaped text.
fn passthrough_open(el: &Element) -> String {
    let mut tag = String::from("&lt;");
    tag.push_str(el.name());
    for (name, value) in el.attrs() {
        tag.push(' ');
        tag.push_str(name);
        tag.push_str("=\"");
        tag.push_str(&escape_attr(value));
        tag.push('"');
    }
    tag.push_str("&gt;");
    tag
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

// ---------------------------------------------------------------------------
// Table rendering
// ---------------------------------------------------------------------------

/// Render a `<table>` element as a GitHub-flavored pipe table.
///
/// `htmd` 0.1 doesn't support table conversion, so tables are rendered here
/// and spliced into the output as ready-made Markdown.
fn table_to_markdown(table: &ElementRef) -> String {
    let tr_sel = Selector::parse("tr").unwrap();
    let th_sel = Selector::parse("th").unwrap();
    let td_sel = Selector::parse("td").unwrap();

    let mut rows: Vec<Vec<String>> = Vec::new();

    for tr in table.select(&tr_sel) {
        let ths: Vec<String> = tr.select(&th_sel).map(|cell| cell_text(&cell)).collect();
        if !ths.is_empty() {
            rows.push(ths);
            continue;
        }

        let tds: Vec<String> = tr.select(&td_sel).map(|cell| cell_text(&cell)).collect();
        if !tds.is_empty() {
            rows.push(tds);
        }
    }

    if rows.is_empty() {
        return String::new();
    }

    let col_count = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    if col_count == 0 {
        return String::new();
    }

    // Normalize all rows to the same number of columns.
    for row in &mut rows {
        while row.len() < col_count {
            row.push(String::new());
        }
    }

    // The first row becomes the header; GFM tables can't omit one.
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("| {} |", rows[0].join(" | ")));
    lines.push(format!("| {} |", vec!["---"; col_count].join(" | ")));
    for row in &rows[1..] {
        lines.push(format!("| {} |", row.join(" | ")));
    }

    lines.join("\n")
}

/// Flatten a table cell to single-line text with pipes escaped.
fn cell_text(cell: &ElementRef) -> String {
    let text: String = cell.text().collect();
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
