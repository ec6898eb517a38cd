//! # Tokenizer
//!
//! Segments raw markdown into typed, positioned spans for syntax highlighting.
//!
//! ## Architecture
//!
//! - **`patterns`**: the compiled regular expressions, one per syntax category
//! - **`scanner`**: the independent passes. Every pass scans the whole source
//!   (not the output of earlier passes) and emits marker and content spans as
//!   separate tokens
//! - **`resolve`**: overlap resolution. Candidates are sorted by
//!   `(start, length)` and kept greedily when they do not overlap a kept
//!   token, so the shorter span wins when two start at the same offset
//!
//! List items get a nested inline-only pass over their text whose offsets are
//! shifted back into document coordinates, so `- **bold** item` highlights.

pub mod patterns;
pub mod resolve;
pub mod scanner;

use serde::Serialize;

use super::span::Span;

pub use resolve::{is_inside_token, resolve_overlaps, segments};
pub use scanner::{scan_candidates, tokenize, tokenize_inline};

/// The closed set of token classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Header,
    HeaderMarker,
    Bold,
    BoldMarker,
    Italic,
    ItalicMarker,
    Code,
    CodeMarker,
    Link,
    LinkText,
    LinkUrl,
    Image,
    ImageAlt,
    ImageUrl,
    ListMarker,
    Blockquote,
    BlockquoteMarker,
    Strikethrough,
    StrikethroughMarker,
    HorizontalRule,
    TableRow,
    Text,
}

impl TokenKind {
    /// Kebab-case tag, used for snapshots and as the highlight class suffix.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Header => "header",
            TokenKind::HeaderMarker => "header-marker",
            TokenKind::Bold => "bold",
            TokenKind::BoldMarker => "bold-marker",
            TokenKind::Italic => "italic",
            TokenKind::ItalicMarker => "italic-marker",
            TokenKind::Code => "code",
            TokenKind::CodeMarker => "code-marker",
            TokenKind::Link => "link",
            TokenKind::LinkText => "link-text",
            TokenKind::LinkUrl => "link-url",
            TokenKind::Image => "image",
            TokenKind::ImageAlt => "image-alt",
            TokenKind::ImageUrl => "image-url",
            TokenKind::ListMarker => "list-marker",
            TokenKind::Blockquote => "blockquote",
            TokenKind::BlockquoteMarker => "blockquote-marker",
            TokenKind::Strikethrough => "strikethrough",
            TokenKind::StrikethroughMarker => "strikethrough-marker",
            TokenKind::HorizontalRule => "horizontal-rule",
            TokenKind::TableRow => "table-row",
            TokenKind::Text => "text",
        }
    }

    /// Delimiter-only kinds (`#`, `**`, backtick runs, `[`, `](`, list bullets...).
    pub fn is_marker(self) -> bool {
        matches!(
            self,
            TokenKind::HeaderMarker
                | TokenKind::BoldMarker
                | TokenKind::ItalicMarker
                | TokenKind::CodeMarker
                | TokenKind::Link
                | TokenKind::Image
                | TokenKind::ListMarker
                | TokenKind::BlockquoteMarker
                | TokenKind::StrikethroughMarker
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified span of source text.
///
/// Tokens borrow their content from the source and live only as long as one
/// tokenization call's input; they are recomputed on every text change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub span: Span,
    /// Always `&source[span.start..span.end]`.
    pub content: &'a str,
}

impl<'a> Token<'a> {
    /// Builds a token whose span is relative to `source`.
    pub fn new(kind: TokenKind, source: &'a str, span: Span) -> Self {
        Self {
            kind,
            span,
            content: &source[span.start..span.end],
        }
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    /// Same token with its span moved right by `base` bytes. The content is
    /// unchanged, which is what nested passes over a sub-slice need.
    #[must_use]
    pub fn shifted(self, base: usize) -> Self {
        Self {
            span: self.span.shifted(base),
            ..self
        }
    }
}
