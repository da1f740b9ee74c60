//! Character reference handling for attribute values.
//!
//! Text content is stored verbatim and never passes through here. Attribute
//! values are decoded once at parse time (so selectors compare against what
//! the attribute actually says) and re-escaped only when a value is replaced.

/// Named references recognised in attribute values.
const NAMED: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", "\u{a0}"),
    ("copy", "\u{a9}"),
    ("reg", "\u{ae}"),
];

/// Looks up a named character reference (without `&` and `;`).
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
}

/// Resolves character references in a raw attribute value.
///
/// Unknown or malformed references are kept as written, matching how
/// browsers treat a bare `&`.
pub fn decode_references(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match after.find(';').and_then(|semi| {
            resolve_reference(&after[..semi]).map(|resolved| (resolved, semi))
        }) {
            Some((resolved, semi)) => {
                out.push_str(&resolved);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn resolve_reference(body: &str) -> Option<String> {
    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    lookup_entity(body).map(str::to_string)
}

/// Turns the pre-escaped `&quot;`, `&lt;` and `&gt;` entities a caller may
/// pass in an attribute value back into literal characters, so that
/// serialization escapes them exactly once.
pub fn unescape_markup(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

/// Escapes an attribute value for output inside `quote` delimiters.
///
/// `&` is left alone so that values carrying their own references survive.
pub fn escape_attribute(value: &str, quote: char, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '"' if quote == '"' => out.push_str("&quot;"),
            '\'' if quote == '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Escapes a value for use as literal text content.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_named_and_numeric() {
        assert_eq!(decode_references("a&amp;b"), "a&b");
        assert_eq!(decode_references("&quot;x&quot;"), "\"x\"");
        assert_eq!(decode_references("&#65;&#x42;"), "AB");
    }

    #[test]
    fn test_decode_keeps_unknown_and_bare() {
        assert_eq!(decode_references("a & b"), "a & b");
        assert_eq!(decode_references("&bogus;"), "&bogus;");
        assert_eq!(decode_references("x&"), "x&");
        assert_eq!(decode_references("&#xZZ;"), "&#xZZ;");
    }

    #[test]
    fn test_unescape_markup_only_touches_three_entities() {
        assert_eq!(
            unescape_markup("&quot;a&lt;b&gt;&amp;"),
            "\"a<b>&amp;"
        );
    }

    #[test]
    fn test_escape_attribute_double_quoted() {
        let mut out = String::new();
        escape_attribute("say \"hi\" <now> & 'then'", '"', &mut out);
        assert_eq!(out, "say &quot;hi&quot; &lt;now&gt; & 'then'");
    }

    #[test]
    fn test_escape_attribute_single_quoted() {
        let mut out = String::new();
        escape_attribute("it's \"ok\"", '\'', &mut out);
        assert_eq!(out, "it&#39;s \"ok\"");
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("1 < 2 && 3 > 2"), "1 &lt; 2 &amp;&amp; 3 &gt; 2");
    }
}
