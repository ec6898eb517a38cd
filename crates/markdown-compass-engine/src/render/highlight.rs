use crate::parsing::{TokenKind, segments};

/// Prefix of every highlight class, followed by [`TokenKind::as_str`].
pub const CLASS_PREFIX: &str = "md-";

/// Renders `source` as escaped HTML with one `<span class="md-{kind}">` per
/// non-text token.
///
/// A single trailing newline is appended so the backdrop's height matches a
/// text area whose content ends in a newline.
pub fn render_highlight_html(source: &str) -> String {
    let mut out = String::with_capacity(source.len() * 2);
    for seg in segments(source) {
        let escaped = html_escape::encode_text(seg.content);
        if seg.kind == TokenKind::Text {
            out.push_str(&escaped);
            continue;
        }
        out.push_str("<span class=\"");
        out.push_str(CLASS_PREFIX);
        out.push_str(seg.kind.as_str());
        out.push_str("\">");
        out.push_str(&escaped);
        out.push_str("</span>");
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn header_is_wrapped_and_escaped() {
        assert_eq!(
            render_highlight_html("# Hi <x>"),
            "<span class=\"md-header-marker\">#</span> \
             <span class=\"md-header\">Hi &lt;x&gt;</span>\n"
        );
    }

    #[test]
    fn plain_text_is_only_escaped() {
        assert_eq!(render_highlight_html("a & b"), "a &amp; b\n");
    }

    #[test]
    fn empty_source_is_a_lone_newline() {
        assert_eq!(render_highlight_html(""), "\n");
    }

    #[test]
    fn text_survives_unchanged_once_tags_are_removed() {
        let src = "- **bold** and `code` & [link](http://x)\n> quote";
        let html = render_highlight_html(src);
        let mut stripped = String::new();
        let mut in_tag = false;
        for c in html.chars() {
            match c {
                '<' => in_tag = true,
                '>' if in_tag => in_tag = false,
                _ if !in_tag => stripped.push(c),
                _ => {}
            }
        }
        let unescaped = html_escape::decode_html_entities(&stripped);
        assert_eq!(unescaped.into_owned(), format!("{src}\n"));
    }
}
