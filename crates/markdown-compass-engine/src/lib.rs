//! Structural analysis for a markdown viewer/editor.
//!
//! Every entry point takes the full document text and is total over any
//! string input. Each text change re-runs the passes from scratch; nothing is
//! updated incrementally.
//!
//! - [`parsing`]: highlighting tokenizer and code-block-aware header
//!   extraction
//! - [`anchors`]: slugs, the per-document header id map and caret→section
//!   resolution
//! - [`outline`]: the table-of-contents tree
//! - [`render`]: highlight backdrop and preview HTML
//! - [`validation`]: advisory marker-balance checks
//! - [`document`]: rope-backed text with a cached [`Analysis`]

#[macro_use]
mod macros;

pub mod anchors;
pub mod document;
pub mod outline;
pub mod parsing;
pub mod render;
pub mod validation;

pub use anchors::{
    HeaderId, HeaderIdMap, SectionIndex, SlugSet, generate_unique_slug, precompute_header_ids,
    resolve_section, slugify,
};
pub use document::{Analysis, Document, DocumentError};
pub use outline::{TocNode, build_toc, flatten_toc};
pub use parsing::{
    HeaderRecord, Span, Token, TokenKind, extract_header_texts, extract_headers, segments,
    tokenize, tokenize_inline,
};
pub use render::{render_highlight_html, render_preview_html};
pub use validation::{ValidationIssue, validate};
