//! Compiled patterns, one per syntax category.
//!
//! Block patterns are applied to single lines (no newline, no trailing `\r`).
//! Inline patterns are applied to whole texts; the `regex` crate has no
//! look-around, so the scanner checks neighbouring characters itself.

pattern!(
    /// `[text](url)`; the scanner rejects matches preceded by `!`.
    pub link,
    r"\[([^\]\n]+)\]\(([^)\n]+)\)"
);

pattern!(
    /// `![alt](url)`, alt may be empty.
    pub image,
    r"!\[([^\]\n]*)\]\(([^)\n]+)\)"
);

pattern!(
    /// List item: indent, bullet or ordinal, spacing, optional task box, text.
    pub list_item,
    r"^([ \t]*)([-*+]|\d{1,9}[.)])([ \t]+)(\[[ xX]\])?(.*)$"
);

pattern!(
    /// `**bold**` or `__bold__`, lazily up to the first closing pair.
    pub bold,
    r"\*\*([^\n]+?)\*\*|__([^\n]+?)__"
);

pattern!(
    /// `*italic*` or `_italic_`.
    pub italic,
    r"\*([^*\n]+)\*|_([^_\n]+)_"
);

pattern!(
    /// `~~struck~~`.
    pub strikethrough,
    r"~~([^~\n]+)~~"
);

pattern!(
    /// One or more `>` prefixes followed by the quoted text.
    pub blockquote,
    r"^[ \t]{0,3}((?:>[ \t]?)+)(.*)$"
);

pattern!(
    /// Three or more of the same rule character, optionally spaced.
    pub horizontal_rule,
    r"^[ \t]{0,3}((?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$"
);

pattern!(
    /// A line that starts and ends with a pipe.
    pub table_row,
    r"^[ \t]*(\|.*\|)[ \t]*$"
);
