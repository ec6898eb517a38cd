use regex::{Captures, Regex};

use super::{Token, TokenKind, patterns, resolve::resolve_overlaps};
use crate::parsing::{
    cursor::Cursor,
    headers::header_line_regex,
    kinds::{CodeSpan, Emphasis, FenceLine, FenceState},
    lines::{LineRef, lines_with_spans},
    span::Span,
};

/// Collects candidate tokens for one source text.
struct Emitter<'a> {
    src: &'a str,
    tokens: Vec<Token<'a>>,
}

impl<'a> Emitter<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            tokens: Vec::new(),
        }
    }

    /// Empty spans are never emitted.
    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        if start < end {
            self.tokens
                .push(Token::new(kind, self.src, Span { start, end }));
        }
    }

    fn is_inside(&self, span: Span) -> bool {
        super::is_inside_token(span, &self.tokens)
    }
}

/// Tokenizes `source` and resolves overlaps.
///
/// Total: malformed markdown yields fewer tokens, never an error. The result
/// is sorted by start offset and no two tokens overlap.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    resolve_overlaps(scan_candidates(source))
}

/// Runs every pass over `source` and returns the raw, possibly overlapping
/// candidates in emission order.
pub fn scan_candidates(source: &str) -> Vec<Token<'_>> {
    let mut em = Emitter::new(source);
    scan_headers(&mut em);
    scan_fenced_code(&mut em);
    scan_inline_code(&mut em);
    scan_links(&mut em);
    scan_images(&mut em);
    scan_lists(&mut em);
    scan_bold(&mut em);
    scan_italic(&mut em);
    scan_strikethrough(&mut em);
    scan_blockquotes(&mut em);
    scan_horizontal_rules(&mut em);
    scan_tables(&mut em);
    log::trace!(
        "tokenizer produced {} candidates for {} bytes",
        em.tokens.len(),
        source.len()
    );
    em.tokens
}

/// Inline-only tokenization (code, links, images, bold, italic,
/// strikethrough) with overlaps resolved. Offsets are relative to `text`.
pub fn tokenize_inline(text: &str) -> Vec<Token<'_>> {
    resolve_overlaps(scan_inline_candidates(text))
}

fn scan_inline_candidates(text: &str) -> Vec<Token<'_>> {
    let mut em = Emitter::new(text);
    scan_inline_code(&mut em);
    scan_links(&mut em);
    scan_images(&mut em);
    scan_bold(&mut em);
    scan_italic(&mut em);
    scan_strikethrough(&mut em);
    em.tokens
}

/// Calls `accept` for every match of `re` in `text`. A rejected match does not
/// consume its text: scanning restarts one character after its start.
fn for_each_candidate<'t>(re: &Regex, text: &'t str, mut accept: impl FnMut(&Captures<'t>) -> bool) {
    let mut at = 0;
    while at <= text.len() {
        let Some(caps) = re.captures_at(text, at) else {
            break;
        };
        let Some(m) = caps.get(0) else {
            break;
        };
        at = if accept(&caps) && m.end() > m.start() {
            m.end()
        } else {
            m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8)
        };
    }
}

/// Applies a line pattern to every line, handing matches over with the line.
fn for_each_line_match<'t>(
    re: &Regex,
    text: &'t str,
    mut f: impl FnMut(&LineRef<'t>, &Captures<'t>),
) {
    for line in lines_with_spans(text) {
        if let Some(caps) = re.captures(line.content()) {
            f(&line, &caps);
        }
    }
}

fn char_before(text: &str, pos: usize) -> Option<char> {
    text[..pos].chars().next_back()
}

fn char_after(text: &str, pos: usize) -> Option<char> {
    text[pos..].chars().next()
}

/// Emphasis content may not begin or end with whitespace.
fn tight(content: &str) -> bool {
    !content.is_empty()
        && !content.starts_with(char::is_whitespace)
        && !content.ends_with(char::is_whitespace)
}

fn scan_headers(em: &mut Emitter<'_>) {
    for_each_line_match(header_line_regex(), em.src, |line, caps| {
        let (Some(marker), Some(rest)) = (caps.get(1), caps.get(2)) else {
            return;
        };
        let raw = rest.as_str();
        let lead = raw.len() - raw.trim_start().len();
        let text = raw.trim();
        // Lines the extractor rejects get no header tokens either
        if text.is_empty() || CodeSpan::is_all_ticks(text) {
            return;
        }
        let start = line.span.start + rest.start() + lead;
        em.push(
            TokenKind::HeaderMarker,
            line.span.start + marker.start(),
            line.span.start + marker.end(),
        );
        em.push(TokenKind::Header, start, start + text.len());
    });
}

/// Span of the trimmed content of a line, in document coordinates.
fn trimmed_span(line: &LineRef<'_>) -> Span {
    let content = line.content();
    let lead = content.len() - content.trim_start().len();
    let start = line.span.start + lead;
    Span {
        start,
        end: start + content.trim().len(),
    }
}

fn scan_fenced_code(em: &mut Emitter<'_>) {
    let mut fence = FenceState::new();
    let mut opener: Option<Span> = None;
    let mut body: Option<Span> = None;

    for line in lines_with_spans(em.src) {
        match fence.feed(line.content()) {
            FenceLine::Open(_) => {
                opener = Some(trimmed_span(&line));
                body = None;
            }
            FenceLine::Inside => {
                body = Some(match body {
                    Some(b) => Span {
                        start: b.start,
                        end: line.span.end,
                    },
                    None => line.span,
                });
            }
            FenceLine::Close(_) => {
                // Unclosed fences emit nothing, so tokens are pushed on close
                if let Some(open) = opener.take() {
                    em.push(TokenKind::CodeMarker, open.start, open.end);
                    if let Some(b) = body.take() {
                        em.push(TokenKind::Code, b.start, b.end);
                    }
                    let close = trimmed_span(&line);
                    em.push(TokenKind::CodeMarker, close.start, close.end);
                }
            }
            FenceLine::Outside => {}
        }
    }
}

/// Backtick code spans on a single line: an opening run of `n` backticks is
/// closed by the next run of exactly `n`. Unclosed runs are literal text.
fn scan_inline_code(em: &mut Emitter<'_>) {
    let src = em.src;
    let mut cur = Cursor::new(src, 0);
    let mut found = Vec::new();

    while !cur.eof() {
        if cur.peek() != Some(CodeSpan::TICK) {
            cur.bump();
            continue;
        }
        let open_start = cur.pos();
        let n = cur.bump_run(CodeSpan::TICK);
        let inner_start = cur.pos();

        let mut probe = cur.clone();
        let mut close = None;
        loop {
            while let Some(b) = probe.peek() {
                if b == CodeSpan::TICK || b == b'\n' {
                    break;
                }
                probe.bump();
            }
            if probe.peek() != Some(CodeSpan::TICK) {
                break;
            }
            let run_start = probe.pos();
            if probe.bump_run(CodeSpan::TICK) == n {
                close = Some(run_start);
                break;
            }
        }

        if let Some(close_start) = close {
            found.push((open_start, inner_start, close_start, close_start + n));
            cur = probe;
        }
    }

    for (open_start, inner_start, inner_end, close_end) in found {
        em.push(TokenKind::CodeMarker, open_start, inner_start);
        em.push(TokenKind::Code, inner_start, inner_end);
        em.push(TokenKind::CodeMarker, inner_end, close_end);
    }
}

/// Shared shape of `[text](url)` and `![alt](url)`.
fn push_bracketed(
    em: &mut Emitter<'_>,
    caps: &Captures<'_>,
    delim: TokenKind,
    label: TokenKind,
    url: TokenKind,
) {
    let (Some(full), Some(text), Some(target)) = (caps.get(0), caps.get(1), caps.get(2)) else {
        return;
    };
    em.push(delim, full.start(), text.start());
    em.push(label, text.start(), text.end());
    em.push(delim, text.end(), target.start());
    em.push(url, target.start(), target.end());
    em.push(delim, target.end(), full.end());
}

fn scan_links(em: &mut Emitter<'_>) {
    let src = em.src;
    for_each_candidate(patterns::link(), src, |caps| {
        let Some(full) = caps.get(0) else {
            return false;
        };
        if char_before(src, full.start()) == Some('!') {
            return false;
        }
        push_bracketed(
            em,
            caps,
            TokenKind::Link,
            TokenKind::LinkText,
            TokenKind::LinkUrl,
        );
        true
    });
}

fn scan_images(em: &mut Emitter<'_>) {
    let src = em.src;
    for_each_candidate(patterns::image(), src, |caps| {
        push_bracketed(
            em,
            caps,
            TokenKind::Image,
            TokenKind::ImageAlt,
            TokenKind::ImageUrl,
        );
        true
    });
}

fn scan_lists(em: &mut Emitter<'_>) {
    let src = em.src;
    for_each_line_match(patterns::list_item(), src, |line, caps| {
        if patterns::horizontal_rule().is_match(line.content()) {
            return;
        }
        let (Some(marker), Some(rest)) = (caps.get(2), caps.get(5)) else {
            return;
        };
        let base = line.span.start;
        em.push(
            TokenKind::ListMarker,
            base + marker.start(),
            base + marker.end(),
        );

        let mut text_start = rest.start();
        if let Some(task) = caps.get(4) {
            // `[x]` only counts as a checkbox when followed by space or EOL
            if rest.as_str().is_empty() || rest.as_str().starts_with([' ', '\t']) {
                em.push(TokenKind::ListMarker, base + task.start(), base + task.end());
            } else {
                text_start = task.start();
            }
        }

        let content = line.content();
        let item = &content[text_start..];
        let item_text = item.trim_start();
        let item_base = base + text_start + (item.len() - item_text.len());
        let inner = &src[item_base..item_base + item_text.len()];
        em.tokens.extend(
            scan_inline_candidates(inner)
                .into_iter()
                .map(|t| t.shifted(item_base)),
        );
    });
}

/// Emits `open`/content/`close` for an emphasis match whose delimiter is
/// `delim_len` bytes wide on each side.
fn push_delimited(
    em: &mut Emitter<'_>,
    full: Span,
    delim_len: usize,
    marker: TokenKind,
    content: TokenKind,
) {
    em.push(marker, full.start, full.start + delim_len);
    em.push(content, full.start + delim_len, full.end - delim_len);
    em.push(marker, full.end - delim_len, full.end);
}

fn scan_bold(em: &mut Emitter<'_>) {
    let src = em.src;
    for_each_candidate(patterns::bold(), src, |caps| {
        let Some(full) = caps.get(0) else {
            return false;
        };
        let (inner, underscore) = match (caps.get(1), caps.get(2)) {
            (Some(star), _) => (star.as_str(), false),
            (None, Some(under)) => (under.as_str(), true),
            (None, None) => return false,
        };
        if !tight(inner) {
            return false;
        }
        if underscore
            && !Emphasis::underscore_boundary_ok(
                char_before(src, full.start()),
                char_after(src, full.end()),
            )
        {
            return false;
        }
        let span = Span::new(full.start(), full.end());
        if em.is_inside(span) {
            return false;
        }
        push_delimited(
            em,
            span,
            Emphasis::STRONG.len(),
            TokenKind::BoldMarker,
            TokenKind::Bold,
        );
        true
    });
}

fn scan_italic(em: &mut Emitter<'_>) {
    let src = em.src;
    for_each_candidate(patterns::italic(), src, |caps| {
        let Some(full) = caps.get(0) else {
            return false;
        };
        let (inner, delim) = match (caps.get(1), caps.get(2)) {
            (Some(star), _) => (star.as_str(), Emphasis::STAR as char),
            (None, Some(under)) => (under.as_str(), Emphasis::UNDERSCORE as char),
            (None, None) => return false,
        };
        let before = char_before(src, full.start());
        let after = char_after(src, full.end());
        // Part of a longer run such as `**`: not single emphasis
        if before == Some(delim) || after == Some(delim) {
            return false;
        }
        if !tight(inner) {
            return false;
        }
        if delim == Emphasis::UNDERSCORE as char && !Emphasis::underscore_boundary_ok(before, after)
        {
            return false;
        }
        let span = Span::new(full.start(), full.end());
        if em.is_inside(span) {
            return false;
        }
        push_delimited(em, span, 1, TokenKind::ItalicMarker, TokenKind::Italic);
        true
    });
}

fn scan_strikethrough(em: &mut Emitter<'_>) {
    let src = em.src;
    for_each_candidate(patterns::strikethrough(), src, |caps| {
        let Some(full) = caps.get(0) else {
            return false;
        };
        if char_after(src, full.end()) == Some(Emphasis::TILDE as char) {
            return false;
        }
        push_delimited(
            em,
            Span::new(full.start(), full.end()),
            Emphasis::STRIKE.len(),
            TokenKind::StrikethroughMarker,
            TokenKind::Strikethrough,
        );
        true
    });
}

fn scan_blockquotes(em: &mut Emitter<'_>) {
    for_each_line_match(patterns::blockquote(), em.src, |line, caps| {
        let (Some(marker), Some(rest)) = (caps.get(1), caps.get(2)) else {
            return;
        };
        let base = line.span.start;
        let marker_text = marker.as_str().trim_end();
        em.push(
            TokenKind::BlockquoteMarker,
            base + marker.start(),
            base + marker.start() + marker_text.len(),
        );
        let text = rest.as_str().trim_end();
        em.push(
            TokenKind::Blockquote,
            base + rest.start(),
            base + rest.start() + text.len(),
        );
    });
}

fn scan_horizontal_rules(em: &mut Emitter<'_>) {
    for_each_line_match(patterns::horizontal_rule(), em.src, |line, caps| {
        if let Some(rule) = caps.get(1) {
            let base = line.span.start;
            let len = rule.as_str().trim_end().len();
            em.push(
                TokenKind::HorizontalRule,
                base + rule.start(),
                base + rule.start() + len,
            );
        }
    });
}

fn scan_tables(em: &mut Emitter<'_>) {
    for_each_line_match(patterns::table_row(), em.src, |line, caps| {
        if let Some(row) = caps.get(1) {
            let base = line.span.start;
            em.push(TokenKind::TableRow, base + row.start(), base + row.end());
        }
    });
}
