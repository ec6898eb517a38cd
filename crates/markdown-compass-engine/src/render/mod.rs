//! # Rendering
//!
//! HTML output for the two views that must agree with the analysis passes.
//!
//! - **`highlight`**: escaped source with token classes, for an editor
//!   backdrop layered under a plain text area
//! - **`preview`**: rendered markdown whose heading ids come from the same
//!   [`HeaderIdMap`](crate::anchors::HeaderIdMap) as the TOC

pub mod highlight;
pub mod preview;

pub use highlight::{CLASS_PREFIX, render_highlight_html};
pub use preview::render_preview_html;
