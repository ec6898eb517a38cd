//! Integration tests for the parsing module.
//!
//! Fixture documents (.md) and their snapshots (.snap) are co-located in
//! `fixtures/`. Snapshots are plain text produced by `normalize`.


use crate::anchors::HeaderIdMap;
use crate::parsing::{extract_header_texts, extract_headers, segments, tokenize};

// Fixture-based snapshot tests

#[test]
fn fixture_headings_and_code() {
    assert_fixture("headings_and_code");
}

#[test]
fn fixture_inline_markup() {
    assert_fixture("inline_markup");
}

#[test]
fn fixture_lists_and_quotes() {
    assert_fixture("lists_and_quotes");
}

fn assert_fixture(name: &str) {
    let fixtures_dir = format!("{}/src/parsing/tests/fixtures", env!("CARGO_MANIFEST_DIR"));
    let md = std::fs::read_to_string(format!("{fixtures_dir}/{name}.md")).unwrap();

    let tokens = tokenize(&md);
    let headers = extract_headers(&md);
    let ids = HeaderIdMap::from_headers(&headers);
    invariants::check_tokens(&md, &tokens);
    invariants::check_headers(&md, &headers, &ids);

    let snap = normalize::normalize(&tokens, &ids);
    insta::with_settings!({
        snapshot_path => fixtures_dir.as_str(),
        prepend_module_to_snapshot => false,
    }, {
        insta::assert_snapshot!(name, snap);
    });
}

// Property tests

const SAMPLES: &[&str] = &[
    "",
    "   \n\t\n",
    "# Title\n\n**bold *and* nested**\n",
    "- [ ] task with `code` and [a](b)\n- *x*\n",
    "```\nunclosed **fence\n",
    "> > nested > quote\n| a |\n---\n",
    "Ünïcödé **ß** _ä_ ~~ö~~ `ü`\n# 日本語\n",
    "***\n* * *\n___x___\n__init__ and snake_case\n",
    "``\n`` ``` `` `a`` [](x) ![](y)\n",
];

#[test]
fn tokens_satisfy_invariants() {
    for src in SAMPLES {
        invariants::check_tokens(src, &tokenize(src));
    }
}

#[test]
fn headers_satisfy_invariants() {
    for src in SAMPLES {
        let headers = extract_headers(src);
        invariants::check_headers(src, &headers, &HeaderIdMap::from_headers(&headers));
    }
}

#[test]
fn analysis_is_deterministic() {
    for src in SAMPLES {
        assert_eq!(tokenize(src), tokenize(src));
        assert_eq!(extract_headers(src), extract_headers(src));
    }
}

#[test]
fn segments_cover_the_source() {
    for src in SAMPLES {
        let joined: String = segments(src).iter().map(|t| t.content).collect();
        assert_eq!(joined, *src);
    }
}

#[test]
fn code_block_exclusion() {
    assert_eq!(
        extract_header_texts("```\n# not a header\n```\n# real header"),
        vec!["real header"]
    );
}

#[test]
fn indented_block_exclusion() {
    assert_eq!(
        extract_header_texts("    # not a header\n# real"),
        vec!["real"]
    );
}

#[test]
fn inline_code_exclusion() {
    assert!(extract_header_texts("`# code`").is_empty());
}

#[test]
fn bold_with_nested_italic_does_not_double_count() {
    let src = "**bold *and* nested**";
    let tokens = tokenize(src);
    invariants::check_tokens(src, &tokens);
    let bold: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == crate::parsing::TokenKind::Bold)
        .collect();
    assert_eq!(bold.len(), 1);
    assert_eq!(bold[0].content, "bold *and* nested");
}
