use super::span::Span;

/// A single line of the source with its position.
#[derive(Debug, Clone, Copy)]
pub struct LineRef<'a> {
    /// 0-based line index.
    pub index: usize,
    /// Byte span of the line, excluding the terminating `\n`.
    pub span: Span,
    /// The line text, excluding the terminating `\n` (a trailing `\r` is kept).
    pub text: &'a str,
}

impl<'a> LineRef<'a> {
    /// The line text without a trailing carriage return.
    pub fn content(&self) -> &'a str {
        self.text.strip_suffix('\r').unwrap_or(self.text)
    }
}

/// Returns an iterator over lines with their byte spans.
///
/// Splits on `\n` only, so the iterator always yields `count('\n') + 1` lines
/// and each line's start is the previous line's end plus one. This keeps line
/// arithmetic identical to a plain split of the text.
pub fn lines_with_spans(text: &str) -> impl Iterator<Item = LineRef<'_>> + '_ {
    let mut offset = 0usize;
    text.split('\n').enumerate().map(move |(index, line)| {
        let start = offset;
        offset += line.len() + 1;
        LineRef {
            index,
            span: Span {
                start,
                end: start + line.len(),
            },
            text: line,
        }
    })
}

/// Byte offset of the first character of every line.
///
/// Always contains at least one entry (`0`).
pub fn line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn spans_exclude_newlines() {
        let lines: Vec<_> = lines_with_spans("ab\ncde\n").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].span, Span::new(0, 2));
        assert_eq!(lines[1].span, Span::new(3, 6));
        assert_eq!(lines[2].span, Span::new(7, 7));
        assert_eq!(lines[1].text, "cde");
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let lines: Vec<_> = lines_with_spans("").collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].span.is_empty());
    }

    #[test]
    fn content_strips_carriage_return() {
        let line = lines_with_spans("# Title\r\nbody").next().unwrap();
        assert_eq!(line.text, "# Title\r");
        assert_eq!(line.content(), "# Title");
    }

    #[test]
    fn line_starts_match_spans() {
        let text = "one\ntwo\n\nfour";
        let starts = line_starts(text);
        let from_spans: Vec<_> = lines_with_spans(text).map(|l| l.span.start).collect();
        assert_eq!(starts, from_spans);
    }
}
