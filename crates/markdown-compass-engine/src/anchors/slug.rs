//! Slug generation.
//!
//! The steps of [`slugify`] run in a fixed order; changing it would change
//! the anchors of previously generated links.

use std::collections::{HashMap, HashSet};

/// Fallback slug for headers whose text has no ASCII alphanumerics.
pub const FALLBACK_SLUG: &str = "heading";

pattern!(not_slug_char, r"[^a-zA-Z0-9\s-]");
pattern!(hyphen_run, r"-{2,}");
pattern!(whitespace_run, r"\s+");

/// Derives a URL-safe anchor id from header text.
///
/// 1. drop every character that is not `[a-zA-Z0-9]`, whitespace or `-`
/// 2. collapse whitespace runs to one space
/// 3. trim
/// 4. spaces become `-`, then runs of `-` collapse to one
/// 5. lowercase
///
/// Hyphens survive step 1 so that `slugify(slugify(s)) == slugify(s)`.
/// May return an empty string; see [`generate_unique_slug`] for the fallback.
pub fn slugify(text: &str) -> String {
    let kept = not_slug_char().replace_all(text, "");
    let collapsed = whitespace_run().replace_all(&kept, " ");
    let hyphenated = collapsed.trim().replace(' ', "-");
    hyphen_run()
        .replace_all(&hyphenated, "-")
        .to_lowercase()
}

/// Slugs already handed out during one document pass.
///
/// Build a fresh set per pass; reusing one across documents would suppress
/// slugs that should be available.
#[derive(Debug, Default, Clone)]
pub struct SlugSet {
    used: HashSet<String>,
    /// Per base slug, the suffix to try first. Every smaller suffix is taken.
    next_suffix: HashMap<String, usize>,
}

impl SlugSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.used.contains(slug)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Marks `slug` as taken so later generated slugs avoid it.
    pub fn reserve(&mut self, slug: &str) {
        self.used.insert(slug.to_string());
    }

    fn insert(&mut self, slug: String) {
        self.used.insert(slug);
    }
}

/// Slugifies `text` and makes the result unique within `existing`, recording
/// it there.
///
/// The first claimant gets the bare slug; later collisions get `-2`, `-3`, …
/// (the first free integer from 2 up).
pub fn generate_unique_slug(text: &str, existing: &mut SlugSet) -> String {
    let mut base = slugify(text);
    if base.is_empty() {
        base = FALLBACK_SLUG.to_string();
    }

    let slug = if existing.contains(&base) {
        let mut n = existing.next_suffix.get(&base).copied().unwrap_or(2);
        let candidate = loop {
            let candidate = format!("{base}-{n}");
            if !existing.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        existing.next_suffix.insert(base, n + 1);
        candidate
    } else {
        base
    };

    existing.insert(slug.clone());
    slug
}
