//! HTML escaping and plain-text recovery for rendered fragments.

/// Append `text` to `out` with the five significant HTML characters escaped.
pub fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// HTML-escape `text` into a new string.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text);
    out
}

/// Recover plain text from a fragment produced by the decoder: tags are
/// dropped and the entities the encoder emits are unescaped. Anything else
/// passes through untouched, so this stays lossless for decoder output
/// without being a general HTML parser.
#[must_use]
pub fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(pos) = rest.find(['<', '&']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if rest.starts_with('<') {
            match rest.find('>') {
                Some(end) => rest = &rest[end + 1..],
                None => return out, // truncated tag, drop the tail
            }
            continue;
        }

        let entity = [
            ("&amp;", '&'),
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&quot;", '"'),
            ("&#39;", '\''),
        ]
        .iter()
        .find(|(name, _)| rest.starts_with(name));

        match entity {
            Some((name, c)) => {
                out.push(*c);
                rest = &rest[name.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(escape(r#"<b class="x">&'</b>"#), "&lt;b class=&quot;x&quot;&gt;&amp;&#39;&lt;/b&gt;");
        assert_eq!(escape("plain text\n"), "plain text\n");
    }

    #[test]
    fn strip_markup_inverts_escape() {
        let original = r#"a < b & "c" > 'd'"#;
        assert_eq!(strip_markup(&escape(original)), original);
    }

    #[test]
    fn strip_markup_drops_spans() {
        let html = r#"plain <span style="color:#cd0000">red</span> tail"#;
        assert_eq!(strip_markup(html), "plain red tail");
    }

    #[test]
    fn strip_markup_leaves_bare_ampersand() {
        assert_eq!(strip_markup("salt & pepper"), "salt & pepper");
    }
}
