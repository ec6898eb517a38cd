/// ATX headings: a run of `#` followed by whitespace and text.
///
/// Any whitespace except `\n` separates the marker, so a match stays on one
/// line.
pub struct AtxHeading;

impl AtxHeading {
    pub const MAX_LEVEL: u8 = 6;
    /// Pattern shared by the extractor and the resolver's backward scan.
    pub const LINE_PATTERN: &'static str = r"^(#{1,6})[^\S\n]+(.+)$";
}
