/// Inline code spans.
///
/// A span opens with a run of one or more backticks and closes with the next
/// run of exactly the same length. Code spans are raw zones: nothing inside
/// them is markdown.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: u8 = b'`';

    /// True when `text` is non-empty and made only of backticks.
    pub fn is_all_ticks(text: &str) -> bool {
        !text.is_empty() && text.bytes().all(|b| b == Self::TICK)
    }
}
