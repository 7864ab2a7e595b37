//! Rendering nodes back to source text, and documentation comment lookup.

use lazy_static::lazy_static;
use once_cell::sync::OnceCell;
use regex::Regex;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};

use super::{Dialect, ParsedFile};
use crate::error::Result;

/// How comments inside a printed node are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// Drop every comment. Used for function and method content.
    RemoveComments,
    /// Keep the node text verbatim. Used for import statements.
    PreserveComments,
}

const COMMENT_QUERY: &str = "(comment) @comment";

static TS_COMMENT_QUERY: OnceCell<Query> = OnceCell::new();
static TSX_COMMENT_QUERY: OnceCell<Query> = OnceCell::new();

lazy_static! {
    static ref TAG_LINE_RE: Regex = Regex::new(r"^@\w+").unwrap();
}

fn comment_query(dialect: Dialect) -> Result<&'static Query> {
    let cell = match dialect {
        Dialect::TypeScript => &TS_COMMENT_QUERY,
        Dialect::Tsx => &TSX_COMMENT_QUERY,
    };
    Ok(cell.get_or_try_init(|| Query::new(&dialect.language(), COMMENT_QUERY))?)
}

/// Render a node as source text.
pub(super) fn print(node: Node<'_>, file: &ParsedFile, mode: PrintMode) -> Result<String> {
    match mode {
        PrintMode::PreserveComments => Ok(file.node_text(node).to_string()),
        PrintMode::RemoveComments => strip_comments(node, file),
    }
}

/// Node text with comment ranges cut out.
///
/// A comment that is alone on its line takes its indentation and trailing
/// line break with it, so no blank lines are left behind.
fn strip_comments(node: Node<'_>, file: &ParsedFile) -> Result<String> {
    let query = comment_query(file.dialect)?;
    let source = &file.source[..];
    let start = node.start_byte();
    let end = node.end_byte();

    let mut ranges = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, node, source);
    while let Some(m) = matches.next() {
        for capture in m.captures {
            let comment = capture.node;
            if comment.start_byte() < start || comment.end_byte() > end {
                continue;
            }
            ranges.push(widen_to_line(source, start, end, comment));
        }
    }
    ranges.sort_unstable();
    ranges.dedup();

    let mut out = Vec::with_capacity(end - start);
    let mut pos = start;
    for (from, to) in ranges {
        if from < pos {
            pos = pos.max(to);
            continue;
        }
        out.extend_from_slice(&source[pos..from]);
        pos = to;
    }
    out.extend_from_slice(&source[pos..end]);

    Ok(String::from_utf8_lossy(&out).trim_end().to_string())
}

fn widen_to_line(source: &[u8], start: usize, end: usize, comment: Node<'_>) -> (usize, usize) {
    let mut line_start = comment.start_byte();
    while line_start > start && matches!(source[line_start - 1], b' ' | b'\t') {
        line_start -= 1;
    }
    let mut line_end = comment.end_byte();
    while line_end < end && matches!(source[line_end], b' ' | b'\t' | b'\r') {
        line_end += 1;
    }

    let owns_line = line_start == start || source[line_start - 1] == b'\n';
    if owns_line && line_end < end && source[line_end] == b'\n' {
        (line_start, line_end + 1)
    } else if owns_line {
        (comment.start_byte(), comment.end_byte())
    } else {
        // Trailing comment: keep the code before it and the line break after.
        (line_start, comment.end_byte())
    }
}

/// Documentation comment text for a declaration.
///
/// Collects the `/** ... */` blocks directly preceding the declaration (or
/// the `export` statement wrapping it), keeps each block's description, and
/// joins the blocks with newlines.
pub(super) fn doc_comment(node: Node<'_>, file: &ParsedFile) -> String {
    let anchor = match node.parent() {
        Some(parent) if parent.kind() == "export_statement" => parent,
        _ => node,
    };

    let mut blocks = Vec::new();
    let mut sibling = anchor.prev_sibling();
    while let Some(prev) = sibling {
        if prev.kind() != "comment" {
            break;
        }
        let text = file.node_text(prev);
        if text.starts_with("/**") && !text.starts_with("/**/") {
            let body = doc_body(text);
            if !body.is_empty() {
                blocks.push(body);
            }
        }
        sibling = prev.prev_sibling();
    }

    blocks.reverse();
    blocks.join("\n")
}

/// Description lines of a `/** */` block, stopping at the first tag.
fn doc_body(text: &str) -> String {
    let inner = text
        .trim_start_matches("/**")
        .trim_end_matches("*/");

    let mut lines = Vec::new();
    for line in inner.lines() {
        let line = line.trim();
        let line = line.strip_prefix('*').unwrap_or(line);
        let line = line.strip_prefix(' ').unwrap_or(line).trim_end();
        if TAG_LINE_RE.is_match(line) {
            break;
        }
        lines.push(line);
    }

    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
