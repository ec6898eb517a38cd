use std::ops::Range;

use xi_rope::{Rope, delta::Builder};

use crate::anchors::{HeaderIdMap, SectionIndex, resolve_section};
use crate::outline::{TocNode, build_toc};
use crate::parsing::{HeaderRecord, Token, extract_headers, tokenize};
use crate::validation::{ValidationIssue, validate};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Everything derived from one version of the text.
///
/// Built in a single pass so the TOC, the preview ids and the section
/// resolver all read the same [`HeaderIdMap`].
#[derive(Debug, Clone)]
pub struct Analysis {
    pub version: u64,
    pub text: String,
    pub headers: Vec<HeaderRecord>,
    pub ids: HeaderIdMap,
    pub toc: Vec<TocNode>,
    pub index: SectionIndex,
    pub issues: Vec<ValidationIssue>,
}

impl Analysis {
    pub fn build(text: String, version: u64) -> Self {
        let headers = extract_headers(&text);
        let ids = HeaderIdMap::from_headers(&headers);
        let toc = build_toc(&ids);
        let index = SectionIndex::new(&text);
        let issues = validate(&text);
        Self {
            version,
            text,
            headers,
            ids,
            toc,
            index,
            issues,
        }
    }

    /// Section slug for `caret`, answered from the cached line table.
    pub fn resolve_section(&self, caret: usize) -> Option<&str> {
        self.index.resolve(caret, &self.ids)
    }
}

/// An editable markdown document.
///
/// The text lives in an `xi_rope::Rope`. Every edit bumps `version`; the
/// [`Analysis`] is rebuilt lazily the first time it is asked for after a
/// version change.
///
/// Offsets are byte offsets. Out-of-range offsets are clamped to the end and
/// offsets inside a multi-byte character move back to its start.
pub struct Document {
    buffer: Rope,
    version: u64,
    cache: Option<Analysis>,
}

impl Document {
    pub fn new(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            version: 0,
            cache: None,
        }
    }

    /// Create a document from raw bytes, which must be UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Inserts `text` at `at` and returns the offset just past the insertion.
    pub fn insert(&mut self, at: usize, text: &str) -> usize {
        let at = self.snap(at);
        self.edit(at..at, text);
        at + text.len()
    }

    /// Removes `range` and returns the offset where it started.
    pub fn delete(&mut self, range: Range<usize>) -> usize {
        let start = self.snap(range.start);
        let end = self.snap(range.end).max(start);
        if start < end {
            self.edit(start..end, "");
        }
        start
    }

    pub fn replace_all(&mut self, text: &str) {
        let len = self.buffer.len();
        self.edit(0..len, text);
    }

    fn edit(&mut self, range: Range<usize>, text: &str) {
        let mut builder = Builder::new(self.buffer.len());
        if text.is_empty() {
            builder.delete(range);
        } else {
            builder.replace(range, Rope::from(text));
        }
        let delta = builder.build();
        self.buffer = delta.apply(&self.buffer);
        self.version += 1;
    }

    /// Clamps `offset` into the buffer and onto a character boundary.
    fn snap(&self, offset: usize) -> usize {
        let len = self.buffer.len();
        if offset >= len {
            return len;
        }
        let text = self.buffer.to_string();
        let mut at = offset;
        while !text.is_char_boundary(at) {
            at -= 1;
        }
        at
    }

    /// The analysis for the current version, rebuilt if an edit happened
    /// since it was last computed.
    pub fn analysis(&mut self) -> &Analysis {
        if self
            .cache
            .as_ref()
            .is_some_and(|a| a.version != self.version)
        {
            self.cache = None;
        }
        let (buffer, version) = (&self.buffer, self.version);
        self.cache.get_or_insert_with(|| {
            log::debug!("rebuilding analysis for version {version}");
            Analysis::build(buffer.to_string(), version)
        })
    }

    pub fn resolve_section(&mut self, caret: usize) -> Option<&str> {
        self.analysis().resolve_section(caret)
    }

    /// Resolves `caret` with a fresh scan of the text instead of the cached
    /// line table.
    pub fn resolve_section_uncached(&mut self, caret: usize) -> Option<&str> {
        let analysis = self.analysis();
        resolve_section(&analysis.text, caret, &analysis.ids)
    }

    pub fn tokens(&mut self) -> Vec<Token<'_>> {
        tokenize(&self.analysis().text)
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_of_offset(self.buffer.len()) + 1
    }

    /// 0-based `(line, byte column)` of `offset`.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = self.snap(offset);
        let line = self.buffer.line_of_offset(offset);
        (line, offset - self.buffer.offset_of_line(line))
    }

    /// Byte offset where `line` starts; lines past the end map to the end.
    pub fn offset_of_line(&self, line: usize) -> usize {
        if line >= self.line_count() {
            return self.buffer.len();
        }
        self.buffer.offset_of_line(line)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_bytes_rejects_invalid_utf8() {
        let err = Document::from_bytes(&[0x23, 0x20, 0xff]).err();
        assert!(matches!(err, Some(DocumentError::InvalidUtf8(_))));
    }

    #[test]
    fn round_trips_bytes() {
        let src = "# T\r\n\ttabbed\n";
        let doc = Document::from_bytes(src.as_bytes()).unwrap();
        assert_eq!(doc.to_bytes(), src.as_bytes());
    }

    #[test]
    fn edits_bump_version_and_rebuild_analysis() {
        let mut doc = Document::new("# A\ntext");
        assert_eq!(doc.analysis().ids.get("A"), Some("a"));
        assert_eq!(doc.analysis().version, 0);

        let end = doc.len();
        doc.insert(end, "\n## B");
        assert_eq!(doc.version(), 1);
        assert_eq!(doc.text(), "# A\ntext\n## B");
        let analysis = doc.analysis();
        assert_eq!(analysis.version, 1);
        assert_eq!(analysis.ids.get("B"), Some("b"));
        assert_eq!(analysis.toc[0].children[0].id, "b");
    }

    #[test]
    fn delete_and_replace() {
        let mut doc = Document::new("hello world");
        assert_eq!(doc.delete(5..11), 5);
        assert_eq!(doc.text(), "hello");
        doc.replace_all("# New");
        assert_eq!(doc.text(), "# New");
        assert_eq!(doc.version(), 2);
        assert_eq!(doc.analysis().headers[0].text, "New");
    }

    #[test]
    fn offsets_are_clamped_and_snapped() {
        let mut doc = Document::new("é");
        assert_eq!(doc.insert(1, "x"), 1);
        assert_eq!(doc.text(), "xé");
        assert_eq!(doc.insert(99, "!"), 4);
        assert_eq!(doc.text(), "xé!");
        assert_eq!(doc.delete(3..1), 3);
        assert_eq!(doc.text(), "xé!");
    }

    #[test]
    fn cached_and_uncached_resolution_agree() {
        let src = "# A\npara1\n## B\npara2";
        let mut doc = Document::new(src);
        for caret in 0..=src.len() {
            let cached = doc.resolve_section(caret).map(str::to_string);
            let uncached = doc.resolve_section_uncached(caret).map(str::to_string);
            assert_eq!(cached, uncached, "caret {caret}");
        }
        assert_eq!(doc.resolve_section(0), None);
        assert_eq!(doc.resolve_section(src.len()), Some("b"));
    }

    #[test]
    fn line_and_column() {
        let doc = Document::new("ab\ncde\n");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line_col(0), (0, 0));
        assert_eq!(doc.line_col(4), (1, 1));
        assert_eq!(doc.line_col(7), (2, 0));
        assert_eq!(doc.offset_of_line(1), 3);
        assert_eq!(doc.offset_of_line(2), 7);
        assert_eq!(doc.offset_of_line(9), 7);
    }

    #[test]
    fn tokens_follow_edits() {
        let mut doc = Document::new("plain");
        assert!(doc.tokens().is_empty());
        doc.insert(0, "# ");
        let kinds: Vec<_> = doc.tokens().iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![crate::parsing::TokenKind::HeaderMarker, crate::parsing::TokenKind::Header]
        );
    }
}
