use super::{Token, TokenKind};
use crate::parsing::span::Span;

/// True when `span` overlaps any token in `tokens`.
///
/// Emphasis passes use this before emitting so that a `*` inside an already
/// tokenized link URL or code span is not re-tokenized as italic.
pub fn is_inside_token(span: Span, tokens: &[Token<'_>]) -> bool {
    tokens.iter().any(|t| t.span.overlaps(span))
}

/// Sorts candidates by `(start, length)` and keeps each one only if it does
/// not overlap a token already kept.
///
/// For two candidates starting at the same offset the shorter one wins; among
/// identical spans the one emitted first wins.
pub fn resolve_overlaps(mut tokens: Vec<Token<'_>>) -> Vec<Token<'_>> {
    tokens.sort_by_key(|t| (t.span.start, t.span.len()));

    let mut kept: Vec<Token<'_>> = Vec::with_capacity(tokens.len());
    // Kept tokens are sorted and disjoint, so only the last end matters
    let mut kept_end = 0usize;
    for tok in tokens {
        if kept.is_empty() || tok.span.start >= kept_end {
            kept_end = tok.span.end;
            kept.push(tok);
        }
    }
    kept
}

/// Gap-free cover of `source`: the resolved tokens with `Text` tokens filling
/// every uncovered range.
pub fn segments(source: &str) -> Vec<Token<'_>> {
    let tokens = super::tokenize(source);
    let mut out = Vec::with_capacity(tokens.len() * 2 + 1);
    let mut pos = 0;
    for tok in tokens {
        if tok.span.start > pos {
            out.push(Token::new(TokenKind::Text, source, Span::new(pos, tok.span.start)));
        }
        pos = tok.span.end;
        out.push(tok);
    }
    if pos < source.len() {
        out.push(Token::new(TokenKind::Text, source, Span::new(pos, source.len())));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tok(kind: TokenKind, src: &str, start: usize, end: usize) -> Token<'_> {
        Token::new(kind, src, Span::new(start, end))
    }

    #[test]
    fn shorter_span_wins_at_same_start() {
        let src = "**bold**";
        let resolved = resolve_overlaps(vec![
            tok(TokenKind::Italic, src, 0, 8),
            tok(TokenKind::BoldMarker, src, 0, 2),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].kind, TokenKind::BoldMarker);
    }

    #[test]
    fn earlier_start_wins_over_nested() {
        let src = "> **x**";
        let resolved = resolve_overlaps(vec![
            tok(TokenKind::Bold, src, 4, 5),
            tok(TokenKind::Blockquote, src, 2, 7),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].kind, TokenKind::Blockquote);
    }

    #[test]
    fn identical_duplicates_collapse() {
        let src = "`a`";
        let resolved = resolve_overlaps(vec![
            tok(TokenKind::Code, src, 1, 2),
            tok(TokenKind::Code, src, 1, 2),
        ]);
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn adjacent_tokens_are_both_kept() {
        let src = "ab";
        let resolved = resolve_overlaps(vec![
            tok(TokenKind::Text, src, 1, 2),
            tok(TokenKind::Text, src, 0, 1),
        ]);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].span.start, 0);
    }

    #[test]
    fn is_inside_uses_overlap() {
        let src = "[a](b*c*)";
        let toks = [tok(TokenKind::LinkUrl, src, 4, 8)];
        assert!(is_inside_token(Span::new(5, 8), &toks));
        assert!(!is_inside_token(Span::new(8, 9), &toks));
    }

    #[test]
    fn segments_cover_the_source() {
        let src = "say **hi** now";
        let segs = segments(src);
        let joined: String = segs.iter().map(|t| t.content).collect();
        assert_eq!(joined, src);
        assert_eq!(segs.first().map(|t| t.kind), Some(TokenKind::Text));
        assert_eq!(segs.last().map(|t| t.content), Some(" now"));
    }
}
