//! # Parsing
//!
//! Structural scanning of raw markdown text. Nothing here builds a full
//! CommonMark tree: every entry point re-scans the whole document and returns
//! freshly allocated results.
//!
//! ## Modules
//!
//! - **`span`**: `Span` byte ranges shared by every result type
//! - **`lines`**: line iteration with spans (split on `\n` only)
//! - **`cursor`**: byte cursor used by the hand-written scanners
//! - **`kinds`**: delimiter ownership (fences, code spans, headings, emphasis)
//! - **`tokens`**: the highlighting tokenizer
//! - **`headers`**: header extraction that ignores code blocks

pub mod cursor;
pub mod headers;
pub mod kinds;
pub mod lines;
pub mod span;
pub mod tokens;

#[cfg(test)]
mod tests;

pub use headers::{HeaderRecord, extract_header_texts, extract_headers};
pub use span::Span;
pub use tokens::{Token, TokenKind, segments, tokenize, tokenize_inline};
