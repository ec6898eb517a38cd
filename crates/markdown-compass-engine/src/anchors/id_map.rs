use std::collections::HashSet;

use serde::Serialize;

use super::slug::{SlugSet, generate_unique_slug};
use crate::parsing::headers::{HeaderRecord, extract_headers};

/// One header together with the anchor id assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderId {
    pub text: String,
    pub level: u8,
    /// 0-based source line of the header.
    pub line: usize,
    pub slug: String,
}

/// Header text → slug mapping for one document version.
///
/// Entries are kept per header in document order, so two headers with the
/// same text keep distinct slugs. Text lookups ([`HeaderIdMap::get`]) answer
/// with the first occurrence; occurrence and line lookups reach the others.
/// No two entries share a slug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderIdMap {
    entries: Vec<HeaderId>,
}

impl HeaderIdMap {
    /// Assigns slugs to `headers` in order against a fresh [`SlugSet`].
    pub fn from_headers(headers: &[HeaderRecord]) -> Self {
        let mut used = SlugSet::new();
        let mut seen: HashSet<&str> = HashSet::with_capacity(headers.len());
        let mut entries: Vec<HeaderId> = Vec::with_capacity(headers.len());
        for h in headers {
            if !seen.insert(h.text.as_str()) {
                log::debug!(
                    "header text {:?} repeats on line {}; occurrence gets its own slug",
                    h.text,
                    h.line
                );
            }
            entries.push(HeaderId {
                text: h.text.clone(),
                level: h.level,
                line: h.line,
                slug: generate_unique_slug(&h.text, &mut used),
            });
        }
        Self { entries }
    }

    /// Slug of the first header whose text is exactly `text`.
    pub fn get(&self, text: &str) -> Option<&str> {
        self.get_occurrence(text, 0)
    }

    /// Slug of the `n`-th (0-based) header whose text is exactly `text`.
    pub fn get_occurrence(&self, text: &str, n: usize) -> Option<&str> {
        self.entries
            .iter()
            .filter(|e| e.text == text)
            .nth(n)
            .map(|e| e.slug.as_str())
    }

    /// Slug of the header on source line `line`.
    pub fn slug_for_line(&self, line: usize) -> Option<&str> {
        self.entries
            .binary_search_by_key(&line, |e| e.line)
            .ok()
            .map(|i| self.entries[i].slug.as_str())
    }

    pub fn contains_text(&self, text: &str) -> bool {
        self.entries.iter().any(|e| e.text == text)
    }

    pub fn entries(&self) -> &[HeaderId] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HeaderId> {
        self.entries.iter()
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.slug.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a HeaderIdMap {
    type Item = &'a HeaderId;
    type IntoIter = std::slice::Iter<'a, HeaderId>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Extracts the headers of `source` and assigns each a unique slug.
///
/// This is the single id pass shared by the TOC, the preview renderer and the
/// section resolver.
pub fn precompute_header_ids(source: &str) -> HeaderIdMap {
    HeaderIdMap::from_headers(&extract_headers(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn identical_texts_keep_distinct_slugs() {
        let ids = precompute_header_ids("# Intro\n# Intro");
        assert_eq!(ids.slugs().collect::<Vec<_>>(), vec!["intro", "intro-2"]);
        assert_eq!(ids.get("Intro"), Some("intro"));
        assert_eq!(ids.get_occurrence("Intro", 1), Some("intro-2"));
        assert_eq!(ids.get_occurrence("Intro", 2), None);
    }

    #[test]
    fn many_repeated_titles() {
        let src = "## Notes\ntext\n".repeat(3000);
        let ids = precompute_header_ids(&src);
        assert_eq!(ids.len(), 3000);
        let unique: HashSet<_> = ids.slugs().collect();
        assert_eq!(unique.len(), 3000);
        assert_eq!(ids.slug_for_line(2 * 2999), Some("notes-3000"));
        assert_eq!(ids.get("Notes"), Some("notes"));
    }

    #[test]
    fn slug_collisions_between_different_texts() {
        let ids = precompute_header_ids("# Intro\ntext\n## Intro!");
        assert_eq!(ids.get("Intro"), Some("intro"));
        assert_eq!(ids.get("Intro!"), Some("intro-2"));
    }

    #[test]
    fn lookup_by_line() {
        let ids = precompute_header_ids("# A\n\n```\n# skipped\n```\n## B");
        assert_eq!(ids.slug_for_line(0), Some("a"));
        assert_eq!(ids.slug_for_line(3), None);
        assert_eq!(ids.slug_for_line(5), Some("b"));
    }

    #[test]
    fn slugs_are_pairwise_distinct() {
        let src = "# Setup\n## Setup\n# setup\n# SETUP!\n# Setup 2\n# !!!\n# ???";
        let ids = precompute_header_ids(src);
        let unique: HashSet<_> = ids.slugs().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(ids.len(), 7);
    }

    #[test]
    fn empty_document_has_no_ids() {
        assert!(precompute_header_ids("").is_empty());
        assert!(!precompute_header_ids("just text").contains_text("just text"));
    }
}
