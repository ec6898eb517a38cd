//! Caret → section resolution.
//!
//! Maps a caret offset in the raw text to the anchor id of the nearest header
//! at or above the caret's line. The backward scan uses the bare header
//! pattern (it does not know about code blocks); a matched line that is not a
//! recorded header only resolves if its text is in the id map.

use super::id_map::HeaderIdMap;
use crate::parsing::{
    headers::match_header_line,
    lines::{LineRef, line_starts, lines_with_spans},
};

/// Resolves `caret` (a byte offset into `source`) to a section slug.
///
/// Returns `None` for a caret at offset 0, when no header line precedes the
/// caret, or when the nearest header is unknown to `ids`. Callers must not
/// scroll on `None`.
pub fn resolve_section<'m>(source: &str, caret: usize, ids: &'m HeaderIdMap) -> Option<&'m str> {
    if caret == 0 {
        return None;
    }
    let lines: Vec<LineRef<'_>> = lines_with_spans(source).collect();
    let current = current_line(&lines, caret);

    let slug = lines[..=current].iter().rev().find_map(|line| {
        match_header_line(line.content()).map(|(_, text)| lookup(ids, line.index, text))
    });

    let resolved = slug.flatten();
    if resolved.is_none() {
        log::debug!("no section for caret {caret} (line {current})");
    }
    resolved
}

/// Line containing `caret`, found by accumulating each line's length plus one
/// for its newline. Carets past the end land on the last line.
fn current_line(lines: &[LineRef<'_>], caret: usize) -> usize {
    let mut count = 0usize;
    for line in lines {
        count += line.text.len() + 1;
        if caret < count {
            return line.index;
        }
    }
    lines.len().saturating_sub(1)
}

/// The header on `line` first, then the first header with the same text.
fn lookup<'m>(ids: &'m HeaderIdMap, line: usize, text: &str) -> Option<&'m str> {
    ids.slug_for_line(line).or_else(|| ids.get(text))
}

/// Precomputed line table for one document version.
///
/// Answers exactly what [`resolve_section`] answers for the same text, with a
/// binary search instead of a forward walk per query.
#[derive(Debug, Clone, Default)]
pub struct SectionIndex {
    line_starts: Vec<usize>,
    /// Lines matching the bare header pattern, with their text.
    header_lines: Vec<(usize, String)>,
}

impl SectionIndex {
    pub fn new(source: &str) -> Self {
        let header_lines = lines_with_spans(source)
            .filter_map(|line| {
                match_header_line(line.content()).map(|(_, text)| (line.index, text.to_string()))
            })
            .collect();
        Self {
            line_starts: line_starts(source),
            header_lines,
        }
    }

    /// 0-based line containing `offset`; offsets past the end map to the last
    /// line.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn resolve<'m>(&self, caret: usize, ids: &'m HeaderIdMap) -> Option<&'m str> {
        if caret == 0 {
            return None;
        }
        let current = self.line_of_offset(caret);
        let idx = self
            .header_lines
            .partition_point(|(line, _)| *line <= current);
        let (line, text) = self.header_lines.get(idx.checked_sub(1)?)?;
        lookup(ids, *line, text)
    }
}
