//! Advisory marker-balance checks.
//!
//! Purely informational: nothing else in the crate consults these results,
//! and an unbalanced document still tokenizes and renders.

use std::fmt;

use serde::Serialize;

use crate::parsing::{
    cursor::Cursor,
    kinds::{CodeSpan, Emphasis, FenceLine, FenceState},
    lines::lines_with_spans,
    tokens::patterns,
};

/// A data-quality observation about a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationIssue {
    /// Odd number of `**` delimiters.
    UnmatchedBold,
    /// Odd number of single `*` delimiters (list bullets excluded).
    UnmatchedItalic,
    /// A backtick run with no closing run of the same length on its line.
    UnmatchedCode,
    /// A fenced code block still open at the end of the document.
    UnclosedFence { line: usize },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::UnmatchedBold => write!(f, "Unmatched bold markers (**) detected"),
            ValidationIssue::UnmatchedItalic => write!(f, "Unmatched italic markers (*) detected"),
            ValidationIssue::UnmatchedCode => {
                write!(f, "Unmatched inline code markers (`) detected")
            }
            ValidationIssue::UnclosedFence { line } => {
                write!(f, "Unclosed code block starting on line {}", line + 1)
            }
        }
    }
}

/// Delimiter tallies over every line outside fenced code.
#[derive(Debug, Default)]
struct MarkerCounts {
    strong: usize,
    single: usize,
    open_ticks: usize,
}

impl MarkerCounts {
    fn scan_line(&mut self, line: &str) {
        if patterns::horizontal_rule().is_match(line) {
            return;
        }
        // A list bullet is not an emphasis delimiter
        let start = patterns::list_item()
            .captures(line)
            .and_then(|caps| caps.get(2))
            .map_or(0, |m| m.end());

        let mut cur = Cursor::new(&line[start..], 0);
        while let Some(b) = cur.peek() {
            match b {
                b'\\' => {
                    cur.bump();
                    cur.bump();
                }
                CodeSpan::TICK => self.skip_code_span(&mut cur),
                Emphasis::STAR => {
                    let n = cur.bump_run(Emphasis::STAR);
                    self.strong += n / 2;
                    self.single += n % 2;
                }
                _ => {
                    cur.bump();
                }
            }
        }
    }

    /// Consumes a code span including its content, or only the opening run
    /// when it never closes.
    fn skip_code_span(&mut self, cur: &mut Cursor<'_>) {
        let n = cur.bump_run(CodeSpan::TICK);
        let mut probe = cur.clone();
        loop {
            probe.skip_until(CodeSpan::TICK);
            if probe.eof() {
                self.open_ticks += 1;
                return;
            }
            if probe.bump_run(CodeSpan::TICK) == n {
                *cur = probe;
                return;
            }
        }
    }
}

/// Reports unbalanced `**`, `*` and backtick delimiters and an unclosed
/// fenced code block. Fenced content is not inspected.
pub fn validate(source: &str) -> Vec<ValidationIssue> {
    let mut counts = MarkerCounts::default();
    let mut fence = FenceState::new();
    let mut fence_line = 0;

    for line in lines_with_spans(source) {
        match fence.feed(line.content()) {
            FenceLine::Open(_) => fence_line = line.index,
            FenceLine::Outside => counts.scan_line(line.content()),
            FenceLine::Inside | FenceLine::Close(_) => {}
        }
    }

    let mut issues = Vec::new();
    if counts.strong % 2 == 1 {
        issues.push(ValidationIssue::UnmatchedBold);
    }
    if counts.single % 2 == 1 {
        issues.push(ValidationIssue::UnmatchedItalic);
    }
    if counts.open_ticks > 0 {
        issues.push(ValidationIssue::UnmatchedCode);
    }
    if fence.is_open() {
        issues.push(ValidationIssue::UnclosedFence { line: fence_line });
    }
    if !issues.is_empty() {
        log::debug!("validation found {} issue(s)", issues.len());
    }
    issues
}
