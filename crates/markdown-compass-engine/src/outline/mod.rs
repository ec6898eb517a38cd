//! Table-of-contents tree built from the header id map.

use serde::Serialize;

use crate::anchors::{HeaderId, HeaderIdMap};

/// One TOC entry; `id` is the header's anchor slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocNode {
    pub id: String,
    pub text: String,
    pub level: u8,
    /// Source line of the header, used to jump the caret.
    pub line: usize,
    pub children: Vec<TocNode>,
}

impl TocNode {
    fn leaf(entry: &HeaderId) -> Self {
        Self {
            id: entry.slug.clone(),
            text: entry.text.clone(),
            level: entry.level,
            line: entry.line,
            children: Vec::new(),
        }
    }
}

/// Nests headers so each node is a child of the nearest preceding node with
/// a lower level. Nodes without such an ancestor are roots.
pub fn build_toc(ids: &HeaderIdMap) -> Vec<TocNode> {
    let mut roots = Vec::new();
    let mut stack: Vec<TocNode> = Vec::new();

    for entry in ids {
        let node = TocNode::leaf(entry);
        // Close every open node that cannot be an ancestor of this one
        while let Some(top) = stack.pop() {
            if top.level < node.level {
                stack.push(top);
                break;
            }
            attach(&mut stack, &mut roots, top);
        }
        stack.push(node);
    }

    while let Some(top) = stack.pop() {
        attach(&mut stack, &mut roots, top);
    }
    roots
}

fn attach(stack: &mut [TocNode], roots: &mut Vec<TocNode>, node: TocNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Depth-first walk in document order as `(depth, node)` pairs.
///
/// Nodes deeper than `max_level` are skipped along with their subtrees.
pub fn flatten_toc(nodes: &[TocNode], max_level: Option<u8>) -> Vec<(usize, &TocNode)> {
    let mut out = Vec::new();
    walk(nodes, 0, max_level, &mut out);
    out
}

fn walk<'a>(
    nodes: &'a [TocNode],
    depth: usize,
    max_level: Option<u8>,
    out: &mut Vec<(usize, &'a TocNode)>,
) {
    for node in nodes {
        if max_level.is_some_and(|max| node.level > max) {
            continue;
        }
        out.push((depth, node));
        walk(&node.children, depth + 1, max_level, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::precompute_header_ids;
    use pretty_assertions::assert_eq;

    fn shape(nodes: &[TocNode]) -> Vec<(usize, String)> {
        flatten_toc(nodes, None)
            .into_iter()
            .map(|(depth, n)| (depth, n.id.clone()))
            .collect()
    }

    #[test]
    fn nests_by_level() {
        let ids = precompute_header_ids("# A\n## B\n### C\n## D\n# E");
        let toc = build_toc(&ids);
        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].children.len(), 2);
        assert_eq!(toc[0].children[0].children[0].id, "c");
        assert_eq!(
            shape(&toc),
            vec![
                (0, "a".to_string()),
                (1, "b".to_string()),
                (2, "c".to_string()),
                (1, "d".to_string()),
                (0, "e".to_string()),
            ]
        );
    }

    #[test]
    fn skipped_levels_still_nest() {
        let ids = precompute_header_ids("# A\n### Deep\n## Mid");
        let toc = build_toc(&ids);
        assert_eq!(toc.len(), 1);
        let kids: Vec<_> = toc[0].children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(kids, vec!["deep", "mid"]);
    }

    #[test]
    fn leading_deep_headers_are_roots() {
        let ids = precompute_header_ids("### Three\n## Two\n# One\n## Child");
        let toc = build_toc(&ids);
        let roots: Vec<_> = toc.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(roots, vec!["three", "two", "one"]);
        assert_eq!(toc[2].children[0].id, "child");
    }

    #[test]
    fn equal_levels_are_siblings() {
        let ids = precompute_header_ids("## A\n## B\n## C");
        let toc = build_toc(&ids);
        assert_eq!(toc.len(), 3);
        assert!(toc.iter().all(|n| n.children.is_empty()));
    }

    #[test]
    fn max_level_hides_deeper_entries() {
        let ids = precompute_header_ids("# A\n## B\n### C\n# D");
        let toc = build_toc(&ids);
        let shallow: Vec<_> = flatten_toc(&toc, Some(2))
            .into_iter()
            .map(|(_, n)| n.id.as_str())
            .collect();
        assert_eq!(shallow, vec!["a", "b", "d"]);
    }

    #[test]
    fn carries_lines_and_duplicate_slugs() {
        let ids = precompute_header_ids("# Intro\ntext\n# Intro");
        let toc = build_toc(&ids);
        assert_eq!(toc[0].line, 0);
        assert_eq!(toc[1].line, 2);
        assert_eq!(toc[1].id, "intro-2");
    }

    #[test]
    fn empty_map_gives_empty_toc() {
        assert!(build_toc(&HeaderIdMap::default()).is_empty());
    }
}
