/// Emphasis-style delimiters.
pub struct Emphasis;

impl Emphasis {
    pub const STAR: u8 = b'*';
    pub const UNDERSCORE: u8 = b'_';
    pub const TILDE: u8 = b'~';
    pub const STRONG: &'static str = "**";
    pub const STRIKE: &'static str = "~~";

    /// `_` emphasis only counts between non-word characters so that
    /// identifiers like `snake_case_name` stay plain text.
    pub fn underscore_boundary_ok(before: Option<char>, after: Option<char>) -> bool {
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    }
}
