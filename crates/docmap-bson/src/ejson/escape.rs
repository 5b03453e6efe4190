/// Appends `s` to `out` as the body of a JSON string literal.
///
/// This function escapes:
/// - Control characters (0x00-0x1F)
/// - Double quote (0x22)
/// - Backslash (0x5C)
///
/// Everything else, `/` and non-ASCII included, is copied verbatim.
pub fn escape_into(out: &mut String, s: &str) {
    let mut last = 0;

    for (i, ch) in s.char_indices() {
        let escaped = match ch {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\u{0008}' => "\\b",
            '\t' => "\\t",
            '\n' => "\\n",
            '\u{000C}' => "\\f",
            '\r' => "\\r",
            c if c < '\u{0020}' => {
                out.push_str(&s[last..i]);
                out.push_str(&format!("\\u{:04x}", c as u32));
                last = i + 1;
                continue;
            }
            _ => continue,
        };
        out.push_str(&s[last..i]);
        out.push_str(escaped);
        last = i + ch.len_utf8();
    }

    out.push_str(&s[last..]);
}

/// Escapes `s` into a fresh string.
///
/// ```
/// use docmap_bson::ejson::escape;
///
/// assert_eq!(escape("hello"), "hello");
/// assert_eq!(escape("say \"hi\""), "say \\\"hi\\\"");
/// assert_eq!(escape("line1\nline2"), "line1\\nline2");
/// ```
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_simple() {
        assert_eq!(escape("plain text"), "plain text");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_escape_quote_and_backslash() {
        assert_eq!(escape(r#"a"b\c"#), r#"a\"b\\c"#);
    }

    #[test]
    fn test_escape_control_characters() {
        assert_eq!(escape("\u{0000}"), "\\u0000");
        assert_eq!(escape("\u{001b}"), "\\u001b");
        assert_eq!(escape("\u{0008}\u{000c}\r\t"), "\\b\\f\\r\\t");
    }

    #[test]
    fn test_escape_leaves_slash_and_unicode() {
        assert_eq!(escape("a/b"), "a/b");
        assert_eq!(escape("καμήλα 🐪"), "καμήλα 🐪");
        assert_eq!(escape("\u{007f}"), "\u{007f}");
    }
}
