//! Header extraction.
//!
//! One line-by-line pass that tracks fenced code state and skips indented
//! code, so headers shown in the TOC and headers given anchor ids always come
//! from the same list.

use serde::Serialize;

use super::{
    kinds::{AtxHeading, CodeSpan, FenceLine, FenceState},
    lines::lines_with_spans,
    span::Span,
};

/// One structurally valid ATX header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderRecord {
    /// Number of leading `#` characters (1-6).
    pub level: u8,
    /// Trimmed header text. Inline markdown is kept verbatim.
    pub text: String,
    /// 0-based line index in the source.
    pub line: usize,
    /// Byte span of the whole header line.
    pub span: Span,
}

pattern!(pub(crate) header_line_regex, AtxHeading::LINE_PATTERN);

/// Matches a single line (no newline) against the ATX header pattern.
///
/// Returns the level and the trimmed text. This is the bare pattern test; it
/// knows nothing about code blocks.
pub(crate) fn match_header_line(line: &str) -> Option<(u8, &str)> {
    let caps = header_line_regex().captures(line)?;
    let marker = caps.get(1)?;
    let text = caps.get(2)?.as_str().trim();
    if text.is_empty() {
        return None;
    }
    // Level is bounded by the pattern's {1,6}
    Some((marker.len() as u8, text))
}

/// Lines indented by four spaces or a tab are indented code.
pub(crate) fn is_indented_code(line: &str) -> bool {
    line.starts_with("    ") || line.starts_with('\t')
}

/// Extracts every genuine header in document order.
///
/// Lines inside fenced code (``` or ~~~, closed only by the same character),
/// indented code lines, and headers whose text is only backticks are skipped.
pub fn extract_headers(source: &str) -> Vec<HeaderRecord> {
    let mut fence = FenceState::new();
    let mut out = Vec::new();

    for line in lines_with_spans(source) {
        let content = line.content();
        if fence.feed(content) != FenceLine::Outside {
            continue;
        }
        if is_indented_code(content) {
            continue;
        }
        // Anchored at column 0, so a `#` inside a code span never matches
        let Some((level, text)) = match_header_line(content) else {
            continue;
        };
        if CodeSpan::is_all_ticks(text) {
            continue;
        }
        out.push(HeaderRecord {
            level,
            text: text.to_string(),
            line: line.index,
            span: line.span,
        });
    }

    out
}

/// Text-only variant of [`extract_headers`].
pub fn extract_header_texts(source: &str) -> Vec<String> {
    extract_headers(source)
        .into_iter()
        .map(|h| h.text)
        .collect()
}
