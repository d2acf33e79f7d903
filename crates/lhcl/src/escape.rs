//! Escaping of quoted string content
//!
//! Quoted strings are stored unescaped. Template sequences (`${ ... }` and `%{ ... }`) are kept
//! verbatim in both directions, as are the `$$` / `%%` escapes that stop a template sequence
//! from starting.

/// A piece of string content
#[derive(Debug, PartialEq)]
enum Segment<'a> {
    Text(&'a str),
    /// `${ ... }` or `%{ ... }` including the delimiters
    Template(&'a str),
}

/// Split content into text and template sequences.
///
/// `raw` selects whether backslash escapes are still present (source text) and have to be
/// skipped as a unit.
fn segments(content: &str, raw: bool) -> Vec<Segment<'_>> {
    let bytes = content.as_bytes();
    let mut segments = vec![];
    let mut text_start = 0;
    let mut index = 0;

    while index < bytes.len() {
        match bytes[index] {
            b'\\' if raw => index = (index + 2).min(bytes.len()),
            b'$' | b'%' if bytes.get(index + 1) == Some(&bytes[index]) => index += 2,
            b'$' | b'%' if bytes.get(index + 1) == Some(&b'{') => {
                let Some(length) = template_length(&content[index..]) else {
                    // unterminated, treat the remainder as text
                    break;
                };
                if text_start < index {
                    segments.push(Segment::Text(&content[text_start..index]));
                }
                segments.push(Segment::Template(&content[index..index + length]));
                index += length;
                text_start = index;
            }
            _ => index += 1,
        }
    }

    if text_start < content.len() {
        segments.push(Segment::Text(&content[text_start..]));
    }

    segments
}

/// Length in bytes of the template sequence at the start of `input`
///
/// `input` has to start with `${` or `%{`. Nested braces and quoted strings are skipped.
pub(crate) fn template_length(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut index = 2;

    while index < bytes.len() {
        match bytes[index] {
            b'"' => index += quoted_length(&input[index..])?,
            b'{' => {
                depth += 1;
                index += 1;
            }
            b'}' if depth == 0 => return Some(index + 1),
            b'}' => {
                depth -= 1;
                index += 1;
            }
            _ => index += 1,
        }
    }

    None
}

/// Length in bytes of the quoted string at the start of `input`, including both quotes
pub(crate) fn quoted_length(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut index = 1;

    while index < bytes.len() {
        match bytes[index] {
            b'"' => return Some(index + 1),
            b'\\' => index += 2,
            b'$' | b'%' if bytes.get(index + 1) == Some(&bytes[index]) => index += 2,
            b'$' | b'%' if bytes.get(index + 1) == Some(&b'{') => {
                index += template_length(&input[index..])?
            }
            _ => index += 1,
        }
    }

    None
}

/// Escape string content so it can be placed between quotes
///
/// Template sequences are left untouched.
pub fn escape_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for segment in segments(text, false) {
        match segment {
            Segment::Template(template) => escaped.push_str(template),
            Segment::Text(text) => {
                for c in text.chars() {
                    match c {
                        '\\' => escaped.push_str("\\\\"),
                        '"' => escaped.push_str("\\\""),
                        '\n' => escaped.push_str("\\n"),
                        '\r' => escaped.push_str("\\r"),
                        '\t' => escaped.push_str("\\t"),
                        '\u{07}' => escaped.push_str("\\a"),
                        '\u{08}' => escaped.push_str("\\b"),
                        '\u{0B}' => escaped.push_str("\\v"),
                        '\u{0C}' => escaped.push_str("\\f"),
                        c => escaped.push(c),
                    }
                }
            }
        }
    }

    escaped
}

/// Inverse of [escape_string]
///
/// Unknown escape sequences are kept as written.
pub fn unescape_string(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());

    for segment in segments(text, true) {
        match segment {
            Segment::Template(template) => unescaped.push_str(template),
            Segment::Text(text) => unescape_text(text, &mut unescaped),
        }
    }

    unescaped
}

fn unescape_text(text: &str, out: &mut String) {
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };

        match escaped {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'v' => out.push('\u{0B}'),
            'f' => out.push('\u{0C}'),
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            'u' | 'U' => {
                let digits = if escaped == 'u' { 4 } else { 8 };
                let hex: String = chars.clone().take(digits).collect();
                let decoded = (hex.len() == digits)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);

                match decoded {
                    Some(decoded) => {
                        out.push(decoded);
                        for _ in 0..digits {
                            chars.next();
                        }
                    }
                    None => {
                        out.push('\\');
                        out.push(escaped);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_control_characters_and_quotes() {
        assert_eq!(
            escape_string("say \"hi\"\n\tC:\\dir"),
            r#"say \"hi\"\n\tC:\\dir"#
        );
    }

    #[test]
    fn leaves_interpolation_alone() {
        assert_eq!(
            escape_string(r#"${lookup(var.map, "key")}-"x""#),
            r#"${lookup(var.map, "key")}-\"x\""#
        );
        assert_eq!(
            escape_string("%{ if var.on }\"on\"%{ endif }"),
            "%{ if var.on }\\\"on\\\"%{ endif }"
        );
    }

    #[test]
    fn doubled_dollar_is_not_interpolation() {
        assert_eq!(escape_string("$${\"x\"}"), "$${\\\"x\\\"}");
        assert_eq!(unescape_string("$${x}"), "$${x}");
    }

    #[test]
    fn unescape_reverses_escape() {
        for text in [
            "plain",
            "line\nbreak",
            "quote \" and backslash \\",
            "${var.a}\n${\"nested\"}",
            "bell \u{07} tab \t",
        ] {
            assert_eq!(unescape_string(&escape_string(text)), text);
        }
    }

    #[test]
    fn unicode_escapes() {
        assert_eq!(unescape_string(r"caf\u00e9"), "café");
        assert_eq!(unescape_string(r"\U0001F600"), "😀");
        assert_eq!(unescape_string(r"\uZZZZ"), r"\uZZZZ");
    }

    #[test]
    fn unknown_escape_is_kept() {
        assert_eq!(unescape_string(r"a\qb"), r"a\qb");
        assert_eq!(escape_string(r"a\qb"), r"a\\qb");
    }

    #[test]
    fn template_length_skips_nested_strings() {
        assert_eq!(template_length(r#"${f("}")} tail"#), Some(9));
        assert_eq!(template_length("${unterminated"), None);
    }
}
