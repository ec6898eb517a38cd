//! # Anchors
//!
//! Header anchor ids and caret→section mapping.
//!
//! - **`slug`**: `slugify` and collision-free `generate_unique_slug`
//! - **`id_map`**: `precompute_header_ids`, the one id pass per document
//! - **`section`**: `resolve_section` and the cached `SectionIndex`

pub mod id_map;
pub mod section;
pub mod slug;

pub use id_map::{HeaderId, HeaderIdMap, precompute_header_ids};
pub use section::{SectionIndex, resolve_section};
pub use slug::{FALLBACK_SLUG, SlugSet, generate_unique_slug, slugify};
