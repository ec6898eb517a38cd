use std::collections::HashSet;

use markdown_compass_engine::{
    Document, SectionIndex, build_toc, flatten_toc, precompute_header_ids, render_preview_html,
    resolve_section, slugify, tokenize,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

const MANUAL: &str = "\
# Overview
Welcome.

## Install
Run the installer.

```sh
# comment, not a header
make install
```

## Usage
### Flags
    # indented code
### Flags
## Overview
Second overview.
";

#[test]
fn toc_and_preview_share_ids() {
    let ids = precompute_header_ids(MANUAL);
    let toc = build_toc(&ids);
    let html = render_preview_html(MANUAL, &ids);

    for (_, node) in flatten_toc(&toc, None) {
        let attr = format!("id=\"{}\"", node.id);
        assert!(html.contains(&attr), "preview lacks {attr}:\n{html}");
    }
    assert_eq!(
        ids.slugs().collect::<Vec<_>>(),
        vec!["overview", "install", "usage", "flags", "flags-2", "overview-2"]
    );
}

#[test]
fn every_caret_resolves_to_a_known_slug() {
    let ids = precompute_header_ids(MANUAL);
    let known: HashSet<&str> = ids.slugs().collect();
    let index = SectionIndex::new(MANUAL);

    for caret in 1..=MANUAL.len() {
        let slug = resolve_section(MANUAL, caret, &ids);
        assert_eq!(slug, index.resolve(caret, &ids), "caret {caret}");
        if let Some(slug) = slug {
            assert!(known.contains(slug), "unknown slug {slug}");
        }
    }
}

#[rstest]
#[case("Welcome.", Some("overview"))]
#[case("Run the installer.", Some("install"))]
#[case("make install", None)]
#[case("# indented code", Some("flags"))]
#[case("Second overview.", Some("overview-2"))]
fn caret_sections(#[case] needle: &str, #[case] expected: Option<&str>) {
    let ids = precompute_header_ids(MANUAL);
    let caret = MANUAL.find(needle).unwrap() + 1;
    assert_eq!(resolve_section(MANUAL, caret, &ids), expected);
}

#[test]
fn ids_are_stable_across_unrelated_edits() {
    let mut doc = Document::new(MANUAL);
    let before: Vec<String> = doc.analysis().ids.slugs().map(str::to_string).collect();

    let at = MANUAL.find("Welcome.").unwrap();
    doc.insert(at, "Some **new** prose. ");
    let after: Vec<String> = doc.analysis().ids.slugs().map(str::to_string).collect();
    assert_eq!(before, after);
}

#[test]
fn slugify_is_idempotent_on_headers() {
    for text in ["Overview", "Install & Setup", "API: v2 -- beta", "  x  y  ", "日本語"] {
        let once = slugify(text);
        assert_eq!(slugify(&once), once);
    }
}

#[test]
fn tokens_cover_without_overlap() {
    let tokens = tokenize(MANUAL);
    let mut prev_end = 0;
    for t in &tokens {
        assert!(t.start() < t.end() && t.end() <= MANUAL.len());
        assert!(t.start() >= prev_end);
        prev_end = t.end();
    }
}
