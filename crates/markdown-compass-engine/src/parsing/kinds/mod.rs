//! # Syntax Kinds
//!
//! Small types that own the delimiters of each markdown construct. Scanners
//! ask these types whether a line or character opens, closes or marks a
//! construct; they never hard-code `` ` ``, `~~~` or `#` themselves.
//!
//! - **`CodeFence`**: fenced code block openers/closers (``` and ~~~)
//! - **`CodeSpan`**: inline backtick runs
//! - **`AtxHeading`**: `#` heading markers and level bounds
//! - **`Emphasis`**: bold/italic/strikethrough delimiters

pub mod code_fence;
pub mod code_span;
pub mod emphasis;
pub mod heading;

pub use code_fence::{CodeFence, FenceKind, FenceLine, FenceSig, FenceState};
pub use code_span::CodeSpan;
pub use emphasis::Emphasis;
pub use heading::AtxHeading;
